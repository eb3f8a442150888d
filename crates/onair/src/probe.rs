//! Host-side camera activity probes.
//!
//! `video-device` walks `/proc/<pid>/fd` looking for open handles on video
//! capture nodes (Linux only). `command` delegates the question to a shell
//! command and reads its exit status.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::trace;

use onair_config::{ProbeKind, ProbeSection};
use onair_core::{ActivityProbe, ProbeError};

use crate::error::CliError;

/// The probe selected by `probe.kind`.
pub enum HostProbe {
    VideoDevice(VideoDeviceProbe),
    Command(CommandProbe),
}

impl HostProbe {
    pub fn from_config(section: &ProbeSection) -> Result<Self, CliError> {
        match section.kind {
            ProbeKind::VideoDevice => {
                if !cfg!(target_os = "linux") {
                    return Err(CliError::Validation {
                        field: "probe.kind".into(),
                        reason: "\"video-device\" is only supported on Linux; use \"command\""
                            .into(),
                    });
                }
                Ok(Self::VideoDevice(VideoDeviceProbe::new(
                    section.devices.clone(),
                )))
            }
            ProbeKind::Command => {
                let command = section
                    .command
                    .clone()
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| CliError::Validation {
                        field: "probe.command".into(),
                        reason: "required when probe.kind is \"command\"".into(),
                    })?;
                Ok(Self::Command(CommandProbe::new(command)))
            }
        }
    }
}

impl ActivityProbe for HostProbe {
    fn in_use(&mut self) -> Result<bool, ProbeError> {
        match self {
            Self::VideoDevice(p) => p.in_use(),
            Self::Command(p) => p.in_use(),
        }
    }
}

// ── /proc scan ──────────────────────────────────────────────────────

pub struct VideoDeviceProbe {
    proc_root: PathBuf,
    /// Empty means any `/dev/video*` node.
    devices: Vec<PathBuf>,
}

impl VideoDeviceProbe {
    pub fn new(devices: Vec<PathBuf>) -> Self {
        Self::with_proc_root("/proc", devices)
    }

    pub fn with_proc_root(proc_root: impl Into<PathBuf>, devices: Vec<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            devices,
        }
    }

    fn is_watched(&self, target: &Path) -> bool {
        if self.devices.is_empty() {
            target
                .to_str()
                .is_some_and(|s| s.starts_with("/dev/video"))
        } else {
            self.devices.iter().any(|d| d == target)
        }
    }
}

impl ActivityProbe for VideoDeviceProbe {
    fn in_use(&mut self) -> Result<bool, ProbeError> {
        for entry in fs::read_dir(&self.proc_root)?.flatten() {
            let is_pid = entry
                .file_name()
                .to_str()
                .is_some_and(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()));
            if !is_pid {
                continue;
            }

            // Processes owned by other users are unreadable; skip them.
            let Ok(fds) = fs::read_dir(entry.path().join("fd")) else {
                continue;
            };
            for fd in fds.flatten() {
                if let Ok(target) = fs::read_link(fd.path()) {
                    if self.is_watched(&target) {
                        trace!(pid = ?entry.file_name(), device = %target.display(), "video device open");
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }
}

// ── Shell command ───────────────────────────────────────────────────

pub struct CommandProbe {
    command: String,
}

impl CommandProbe {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl ActivityProbe for CommandProbe {
    fn in_use(&mut self) -> Result<bool, ProbeError> {
        let (shell, flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        let status = Command::new(shell)
            .arg(flag)
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ProbeError::new(format!("failed to run '{}': {e}", self.command)))?;

        trace!(command = %self.command, code = ?status.code(), "probe command finished");
        Ok(status.success())
    }
}
