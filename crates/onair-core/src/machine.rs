// ── Activity state machine ──
//
// Polls an `ActivityProbe` and mirrors camera edges onto one light:
//
//   Idle   --in use-->  Active   capture snapshot, apply on-air look
//   Active --free---->  Idle     restore snapshot
//
// Repeated readings of the same state never touch the bridge. A light
// that is off when the camera goes live is left alone for that whole
// cycle: no snapshot, no write, no restore.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::config::OnAirLook;
use crate::error::CoreError;
use crate::model::{ActivityState, Appearance, LightIdentity};
use crate::probe::ActivityProbe;
use crate::session::LightBridge;
use crate::snapshot::SnapshotStore;

/// Outcome of a single poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The reading matched the current state.
    Steady(ActivityState),
    /// Idle to Active. `applied` is `false` when the light was off.
    Activated { applied: bool },
    /// Active to Idle. `restored` is `false` when there was nothing to restore.
    Deactivated { restored: bool },
    /// Cancellation was observed before the cycle's bridge work finished.
    Interrupted,
}

/// Drives one light from camera activity.
pub struct ActivityMachine<B, P> {
    bridge: B,
    probe: P,
    light: LightIdentity,
    look: OnAirLook,
    interval: Duration,
    state: ActivityState,
    snapshot: SnapshotStore,
}

impl<B, P> ActivityMachine<B, P>
where
    B: LightBridge,
    P: ActivityProbe,
{
    pub fn new(
        bridge: B,
        probe: P,
        light: LightIdentity,
        look: OnAirLook,
        interval: Duration,
    ) -> Self {
        Self {
            bridge,
            probe,
            light,
            look,
            interval,
            state: ActivityState::Idle,
            snapshot: SnapshotStore::new(),
        }
    }

    pub fn state(&self) -> ActivityState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&Appearance> {
        self.snapshot.peek()
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn light(&self) -> &LightIdentity {
        &self.light
    }

    // ── Loop ─────────────────────────────────────────────────────────

    /// Poll until `cancel` fires or a cycle fails.
    ///
    /// Each cycle starts one `interval` after the previous one finished,
    /// so a slow bridge stretches the period instead of stacking cycles.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<(), CoreError> {
        info!(
            light = %self.light,
            interval_ms = self.interval.as_millis(),
            "watching camera activity"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }

            if self.tick(cancel).await? == Transition::Interrupted {
                break;
            }
        }

        info!(state = %self.state, "stopped watching");
        Ok(())
    }

    /// Run one poll cycle.
    pub async fn tick(&mut self, cancel: &CancellationToken) -> Result<Transition, CoreError> {
        let in_use = self
            .probe
            .in_use()
            .map_err(|e| CoreError::Probe {
                message: e.to_string(),
            })
            .inspect_err(|e| error!(error = %e, "camera probe failed"))?;

        match (self.state, in_use) {
            (ActivityState::Idle, true) => self.activate(cancel).await,
            (ActivityState::Active, false) => self.deactivate(cancel).await,
            (state, _) => {
                trace!(%state, "no change");
                Ok(Transition::Steady(state))
            }
        }
    }

    // ── Edges ────────────────────────────────────────────────────────

    async fn activate(&mut self, cancel: &CancellationToken) -> Result<Transition, CoreError> {
        info!(light = %self.light, "camera in use");
        if cancel.is_cancelled() {
            return Ok(Transition::Interrupted);
        }

        let current = self
            .bridge
            .get_light(&self.light.id)
            .await
            .inspect_err(|e| error!(light = %self.light.id, operation = "get_light", error = %e, "bridge call failed"))?;
        self.state = ActivityState::Active;

        if current.is_off() {
            info!(light = %self.light, "light is off, leaving it alone");
            self.snapshot.clear();
            return Ok(Transition::Activated { applied: false });
        }

        debug!(snapshot = ?current, "captured appearance");
        self.snapshot.capture(current);

        if cancel.is_cancelled() {
            return Ok(Transition::Interrupted);
        }

        let update = Appearance::on_air(&self.look);
        self.bridge
            .apply_light(&self.light.id, &update)
            .await
            .inspect_err(|e| error!(light = %self.light.id, operation = "apply_light", error = %e, "bridge call failed"))?;

        info!(
            light = %self.light,
            mirek = self.look.mirek,
            brightness = self.look.brightness,
            "on air"
        );
        Ok(Transition::Activated { applied: true })
    }

    async fn deactivate(&mut self, cancel: &CancellationToken) -> Result<Transition, CoreError> {
        info!(light = %self.light, "camera released");
        if cancel.is_cancelled() {
            return Ok(Transition::Interrupted);
        }

        self.state = ActivityState::Idle;

        let Some(snapshot) = self.snapshot.take() else {
            debug!("nothing captured this cycle, skipping restore");
            return Ok(Transition::Deactivated { restored: false });
        };

        let update = snapshot.restoration();
        if update.is_empty() {
            debug!("captured appearance has nothing restorable");
            return Ok(Transition::Deactivated { restored: false });
        }

        self.bridge
            .apply_light(&self.light.id, &update)
            .await
            .inspect_err(|e| error!(light = %self.light.id, operation = "apply_light", error = %e, "bridge call failed"))?;

        info!(light = %self.light, "restored previous appearance");
        Ok(Transition::Deactivated { restored: true })
    }
}
