use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure to encode or decode a simulation snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// A fixed-tick simulation driven by a single local input source.
///
/// The host owns the loop and timing; the simulation only advances its own
/// state and reports what happened during the tick.
pub trait Simulation {
    type Input;
    type Event;

    /// Advance by one tick of length `dt`.
    fn update(&mut self, dt: Duration, input: &Self::Input) -> Vec<Self::Event>;

    /// Encode the full mutable state as a snapshot.
    fn serialize_state(&self) -> Result<Vec<u8>, SnapshotError>;

    /// Replace the mutable state with a previously encoded snapshot.
    /// On error the current state is left untouched.
    fn apply_state(&mut self, state: &[u8]) -> Result<(), SnapshotError>;

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}

/// MessagePack-encode a snapshot with named fields.
pub fn encode_state<T: Serialize>(state: &T) -> Result<Vec<u8>, SnapshotError> {
    Ok(rmp_serde::to_vec_named(state)?)
}

pub fn decode_state<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SnapshotError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

/// Generates the snapshot and pause methods shared by every `Simulation`:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_paused`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool` fields.
#[macro_export]
macro_rules! simulation_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Result<Vec<u8>, $crate::game_trait::SnapshotError> {
            $crate::game_trait::encode_state(&self.state)
        }

        fn apply_state(&mut self, state: &[u8]) -> Result<(), $crate::game_trait::SnapshotError> {
            self.state = $crate::game_trait::decode_state::<$StateType>(state)?;
            Ok(())
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    };
}
