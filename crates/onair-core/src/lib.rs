//! Camera-activity to light-state synchronization engine.
//!
//! This crate owns the domain logic sitting between `onair-api` (raw bridge
//! calls) and the `onair` binary (config files, OS probes, signals):
//!
//! - **[`establish()`]**: Startup sequence: locate the bridge, pair if no
//!   credential is configured, open a [`BridgeSession`] and resolve the
//!   configured light name to exactly one [`LightIdentity`].
//!
//! - **[`ActivityMachine`]**: Two-state (`Idle` / `Active`) poll loop. On each
//!   edge it captures, applies or restores the light's [`Appearance`] through a
//!   [`LightBridge`], keeping the pre-activation look in a [`SnapshotStore`].
//!   Runs until its `CancellationToken` fires; any bridge failure ends the loop.
//!
//! - **[`ActivityProbe`]**: Seam for the "is the camera in use?" question.
//!   Implementations live with the host.
//!
//! Core never reads config files: the host builds a [`WatchConfig`] and hands it in.

pub mod config;
pub mod convert;
pub mod error;
pub mod machine;
pub mod model;
pub mod probe;
pub mod session;
pub mod snapshot;
pub mod startup;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{BridgeConfig, OnAirLook, WatchConfig};
pub use error::CoreError;
pub use machine::{ActivityMachine, Transition};
pub use model::{ActivityState, Appearance, Chromaticity, LightIdentity};
pub use probe::{ActivityProbe, ProbeError};
pub use session::{BridgeSession, LightBridge};
pub use snapshot::SnapshotStore;
pub use startup::{Established, establish, locate, pair};
