// ── Snapshot store ──
//
// Single-slot holder for the appearance captured when the camera went
// live. Each activation overwrites it; each deactivation consumes it.

use crate::model::Appearance;

#[derive(Debug, Default)]
pub struct SnapshotStore {
    slot: Option<Appearance>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is stored with `appearance`.
    pub fn capture(&mut self, appearance: Appearance) {
        self.slot = Some(appearance);
    }

    /// Remove and return the stored appearance.
    pub fn take(&mut self) -> Option<Appearance> {
        self.slot.take()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn peek(&self) -> Option<&Appearance> {
        self.slot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(brightness: f64) -> Appearance {
        Appearance {
            brightness: Some(brightness),
            ..Appearance::default()
        }
    }

    #[test]
    fn capture_overwrites() {
        let mut store = SnapshotStore::new();
        store.capture(dim(10.0));
        store.capture(dim(20.0));
        assert_eq!(store.peek(), Some(&dim(20.0)));
    }

    #[test]
    fn take_empties_the_slot() {
        let mut store = SnapshotStore::new();
        store.capture(dim(10.0));
        assert_eq!(store.take(), Some(dim(10.0)));
        assert!(store.peek().is_none());
        assert_eq!(store.take(), None);
    }

    #[test]
    fn clear_discards() {
        let mut store = SnapshotStore::new();
        store.capture(dim(10.0));
        store.clear();
        assert!(store.peek().is_none());
    }
}
