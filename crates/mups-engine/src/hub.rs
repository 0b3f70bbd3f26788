use serde::{Deserialize, Serialize};

use mups_core::{Rect, Vec2};

use crate::config::WorldConfig;
use crate::physics::MotionParams;

/// Hub physics and console settings, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub gravity: f32,
    pub jump_strength: f32,
    /// Contracts generated each time the run resets.
    pub contract_offers: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_strength: 9.0,
            contract_offers: crate::contracts::CONTRACT_OPTION_COUNT,
        }
    }
}

impl HubConfig {
    pub fn motion(&self) -> MotionParams {
        MotionParams {
            gravity: self.gravity,
            jump_strength: self.jump_strength,
            wall_jump: false,
        }
    }
}

/// Someone in the hub the player can talk to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub name: String,
    pub rect: Rect,
    pub lines: Vec<String>,
}

impl Npc {
    fn new(name: &str, rect: Rect, lines: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            rect,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn talk_zone(&self) -> Rect {
        self.rect.inflate(90.0, 30.0)
    }
}

/// Fixed geometry of the hub room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubLayout {
    pub width: f32,
    /// The hub floor is solid; falling onto it never costs a life.
    pub floor_y: f32,
    pub portal: Rect,
    pub desk: Rect,
    pub computer: Rect,
    pub shop_counter: Rect,
    pub npcs: Vec<Npc>,
}

impl Default for HubLayout {
    fn default() -> Self {
        Self::new(&WorldConfig::default())
    }
}

impl HubLayout {
    pub fn new(world: &WorldConfig) -> Self {
        Self {
            width: world.screen_width,
            floor_y: world.floor_y,
            portal: Rect::new(620.0, 360.0, 90.0, 160.0),
            desk: Rect::new(60.0, 480.0, 200.0, 40.0),
            computer: Rect::new(100.0, 430.0, 80.0, 50.0),
            shop_counter: Rect::new(310.0, 480.0, 180.0, 40.0),
            npcs: vec![
                Npc::new(
                    "Dispatcher Rae",
                    Rect::new(330.0, 424.0, 44.0, 80.0),
                    &[
                        "Routes keep shifting; I keep the gate tuned to your sprint.",
                        "Tap the console whenever you're ready for a fresh stack of jobs.",
                    ],
                ),
                Npc::new(
                    "Archivist Zell",
                    Rect::new(520.0, 426.0, 40.0, 78.0),
                    &[
                        "I chart the storms you hop across. Bring back interesting data.",
                        "Talk to me if you want lore on the next dimension.",
                    ],
                ),
            ],
        }
    }

    /// Where the player appears after returning from a mission.
    pub fn spawn(&self) -> Vec2 {
        Vec2::new(self.desk.center_x() + 20.0, self.desk.top())
    }

    pub fn console_zone(&self) -> Rect {
        self.computer.inflate(80.0, 80.0)
    }

    pub fn shop_zone(&self) -> Rect {
        self.shop_counter.inflate(80.0, 80.0)
    }

    pub fn near_console(&self, player: &Rect) -> bool {
        player.intersects(&self.console_zone())
    }

    pub fn near_shop(&self, player: &Rect) -> bool {
        player.intersects(&self.shop_zone())
    }

    pub fn touches_portal(&self, player: &Rect) -> bool {
        player.intersects(&self.portal)
    }

    /// Index of the first NPC whose talk zone the player is standing in.
    pub fn nearby_npc(&self, player: &Rect) -> Option<usize> {
        self.npcs
            .iter()
            .position(|npc| player.intersects(&npc.talk_zone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(center_x: f32) -> Rect {
        Rect::from_mid_bottom(center_x, 520.0, 30.0, 30.0)
    }

    #[test]
    fn spawn_is_right_of_desk_center() {
        let hub = HubLayout::default();
        assert_eq!(hub.spawn(), Vec2::new(180.0, 480.0));
    }

    #[test]
    fn console_reachable_from_spawn() {
        let hub = HubLayout::default();
        assert!(hub.near_console(&player_at(180.0)));
        assert!(!hub.near_console(&player_at(700.0)));
    }

    #[test]
    fn npc_talk_zones() {
        let hub = HubLayout::default();
        assert_eq!(hub.nearby_npc(&player_at(352.0)), Some(0));
        assert_eq!(hub.nearby_npc(&player_at(540.0)), Some(1));
        assert_eq!(hub.nearby_npc(&player_at(60.0)), None);
    }

    #[test]
    fn portal_sits_on_floor() {
        let hub = HubLayout::default();
        assert_eq!(hub.portal.bottom(), hub.floor_y);
        assert!(hub.touches_portal(&player_at(665.0)));
    }

    #[test]
    fn hub_motion_has_no_wall_jump() {
        let motion = HubConfig::default().motion();
        assert_eq!(motion.gravity, 0.6);
        assert_eq!(motion.jump_strength, 9.0);
        assert!(!motion.wall_jump);
    }
}
