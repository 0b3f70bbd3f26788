use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::contracts::Contract;
use crate::level_gen::LevelLayout;
use crate::physics::{ControllerEvent, PlayerState};
use crate::progression::Reward;
use crate::scene::GameState;
use crate::shop::{ShopItem, Upgrades};

/// Cursor into an NPC's dialog lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogCursor {
    pub npc: usize,
    pub line: usize,
}

/// Summary shown on the win and game-over screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionOutcome {
    pub contract: String,
    pub success: bool,
    pub reward: Reward,
    pub beacons: u32,
    pub duration: Duration,
    pub reason: Option<String>,
}

/// Events surfaced to the host each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StateChanged { from: GameState, to: GameState },
    ContractsOffered { count: usize },
    ContractAccepted { name: String, lives: u32 },
    DimensionBuilt { index: u32, seed: u64, platforms: usize },
    Player(ControllerEvent),
    DialogLine { npc: String, line: String },
    MissionSucceeded { contract: String, reward: Reward, beacons: u32 },
    MissionFailed { contract: String, reason: String },
    MilestoneReached { deliveries: u32, text: String },
    ItemPurchased { item: ShopItem, credits_left: u64 },
    PurchaseRefused { item: ShopItem, reason: String },
}

/// Everything that changes while playing. Snapshots encode exactly this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub scene: GameState,
    pub player: PlayerState,
    /// Contracts currently on offer at the console.
    pub contracts: Vec<Contract>,
    pub selected_contract: usize,
    /// Accepted contract, if any. Arms the portal.
    pub current_contract: Option<Contract>,
    pub portal_active: bool,
    /// Lives the next dimension starts with.
    pub mission_lives: u32,
    /// Number of dimensions entered this session.
    pub dimension_index: u32,
    pub level: Option<LevelLayout>,
    pub dialog: Option<DialogCursor>,
    pub last_outcome: Option<MissionOutcome>,
    pub elapsed: Duration,
    pub mission_started_at: Option<Duration>,
    /// Highlighted row at the shop counter.
    pub shop_selection: usize,
    pub upgrades: Upgrades,
    seed_cursor: u64,
}

impl SessionState {
    pub fn new(player: PlayerState, seed: u64) -> Self {
        Self {
            scene: GameState::Hub,
            player,
            contracts: Vec::new(),
            selected_contract: 0,
            current_contract: None,
            portal_active: false,
            mission_lives: 0,
            dimension_index: 0,
            level: None,
            dialog: None,
            last_outcome: None,
            elapsed: Duration::ZERO,
            mission_started_at: None,
            shop_selection: 0,
            upgrades: Upgrades::default(),
            seed_cursor: seed,
        }
    }

    /// Draw a fresh seed and advance the session's seed stream.
    pub fn next_seed(&mut self) -> u64 {
        let mut rng = StdRng::seed_from_u64(self.seed_cursor);
        let seed = rng.random();
        self.seed_cursor = rng.random();
        seed
    }

    /// An RNG seeded from the session stream.
    pub fn rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.next_seed())
    }
}

#[cfg(test)]
mod tests {
    use mups_core::Vec2;

    use super::*;
    use crate::physics::ControllerConfig;

    #[test]
    fn seed_stream_is_deterministic_and_advances() {
        let player = PlayerState::new(Vec2::ZERO, 0, &ControllerConfig::default());
        let mut a = SessionState::new(player.clone(), 42);
        let mut b = SessionState::new(player, 42);
        let first = a.next_seed();
        assert_eq!(first, b.next_seed());
        assert_ne!(first, a.next_seed());
    }
}
