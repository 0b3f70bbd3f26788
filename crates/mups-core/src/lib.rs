pub mod game_trait;
pub mod geometry;
pub mod sampling;
pub mod time;

pub use game_trait::{Simulation, SnapshotError};
pub use geometry::{CONTACT_EPSILON, Rect, Vec2};
pub use sampling::SampledRange;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::time::Duration;

    use crate::game_trait::Simulation;
    use crate::geometry::Rect;

    /// One 60 Hz tick.
    pub const TICK: Duration = Duration::from_nanos(16_666_667);

    /// Run N ticks with the same input, returning all accumulated events.
    pub fn run_ticks<S: Simulation>(
        sim: &mut S,
        input: &S::Input,
        n: usize,
        dt: Duration,
    ) -> Vec<S::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(sim.update(dt, input));
        }
        all_events
    }

    /// Snapshot bytes, panicking with context if encoding fails.
    pub fn snapshot<S: Simulation>(sim: &S) -> Vec<u8> {
        sim.serialize_state()
            .expect("serialize_state() must succeed in tests")
    }

    /// Assert `rect` does not overlap any of `solids` beyond contact tolerance.
    pub fn assert_clear_of(rect: &Rect, solids: &[Rect]) {
        for (i, solid) in solids.iter().enumerate() {
            assert!(
                !rect.intersects(solid),
                "rect {rect:?} overlaps solid #{i} {solid:?}"
            );
        }
    }

    // ================================================================
    // Simulation Contract Tests
    // ================================================================
    // Generic checks every Simulation implementation must pass. Crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// update() with dt>0 must advance state.
    pub fn contract_update_advances_state<S: Simulation>(sim: &mut S, input: &S::Input) {
        let before = snapshot(sim);
        sim.update(TICK, input);
        let after = snapshot(sim);
        assert_ne!(before, after, "update(dt>0) must advance simulation state");
    }

    /// serialize → apply → serialize must be stable.
    pub fn contract_state_roundtrip_preserves<S: Simulation>(sim: &mut S) {
        let state_a = snapshot(sim);
        sim.apply_state(&state_a)
            .expect("apply_state must accept its own snapshot");
        let state_b = snapshot(sim);
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// pause() must freeze updates, resume() must unfreeze them.
    pub fn contract_pause_stops_updates<S: Simulation>(sim: &mut S, input: &S::Input) {
        sim.pause();
        assert!(sim.is_paused());
        let before = snapshot(sim);
        sim.update(TICK, input);
        let during_pause = snapshot(sim);
        assert_eq!(before, during_pause, "State must not change while paused");

        sim.resume();
        assert!(!sim.is_paused());
        sim.update(TICK, input);
        let after_resume = snapshot(sim);
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// apply_state() must reject bytes that are not a snapshot and keep state intact.
    pub fn contract_garbage_snapshot_rejected<S: Simulation>(sim: &mut S) {
        let before = snapshot(sim);
        assert!(
            sim.apply_state(&[0xc1, 0xc1, 0xc1]).is_err(),
            "apply_state must reject garbage"
        );
        assert_eq!(before, snapshot(sim), "Rejected snapshot must not alter state");
    }
}
