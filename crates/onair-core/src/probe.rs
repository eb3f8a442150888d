// ── Camera activity probe ──
//
// The engine only asks one question per poll: is the camera in use right
// now? How that is answered (device scans, helper commands) is up to the
// host binary.

use thiserror::Error;

/// Failure to answer the in-use question.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProbeError {
    message: String,
}

impl ProbeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Reports whether any video capture device is currently in use.
pub trait ActivityProbe: Send {
    fn in_use(&mut self) -> Result<bool, ProbeError>;
}

impl<F> ActivityProbe for F
where
    F: FnMut() -> Result<bool, ProbeError> + Send,
{
    fn in_use(&mut self) -> Result<bool, ProbeError> {
        self()
    }
}
