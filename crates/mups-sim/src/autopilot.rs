use mups_engine::Game;
use mups_engine::input::PlayerInput;
use mups_engine::level_gen::LevelLayout;
use mups_engine::physics::PlayerState;
use mups_engine::scene::GameState;

/// Distance from a platform's right edge at which the bot takes off.
const TAKEOFF_MARGIN: f32 = 6.0;

/// Scripted input source: accepts the first contract, walks to the portal,
/// and hops platform to platform toward the door.
#[derive(Debug, Default)]
pub struct Autopilot {
    tick: u64,
    /// Platform the current jump is aimed at.
    target: Option<usize>,
}

impl Autopilot {
    pub fn next_input(&mut self, game: &Game) -> PlayerInput {
        self.tick += 1;
        // Menu buttons act on press, so alternate between pressed and released.
        let pulse = self.tick % 2 == 0;
        match game.scene() {
            GameState::Hub => self.hub_input(game, pulse),
            GameState::ContractMenu | GameState::Win | GameState::GameOver => PlayerInput {
                confirm: pulse,
                ..Default::default()
            },
            GameState::Dialog | GameState::Shop | GameState::Codex => PlayerInput {
                back: true,
                ..Default::default()
            },
            GameState::Level => match game.level() {
                Some(layout) => self.level_input(layout, game.player()),
                None => PlayerInput::default(),
            },
        }
    }

    fn hub_input(&mut self, game: &Game, pulse: bool) -> PlayerInput {
        self.target = None;
        let rect = game.player().rect;
        let hub = game.hub();
        if game.state().portal_active {
            return PlayerInput::walk_right();
        }
        if hub.near_console(&rect) {
            return PlayerInput {
                interact: pulse,
                ..Default::default()
            };
        }
        if rect.center_x() > hub.console_zone().center_x() {
            PlayerInput::walk_left()
        } else {
            PlayerInput::walk_right()
        }
    }

    fn level_input(&mut self, layout: &LevelLayout, player: &PlayerState) -> PlayerInput {
        let feet = player.rect;
        let mut input = PlayerInput {
            move_right: true,
            sprint: true,
            ..Default::default()
        };

        if player.grounded {
            self.target = None;
            let standing_on = layout.platforms.iter().position(|p| {
                feet.overlaps_horizontally(p) && (feet.bottom() - p.top()).abs() < 1.0
            });
            if let Some(i) = standing_on
                && i + 1 < layout.platforms.len()
                && feet.right() >= layout.platforms[i].right() - TAKEOFF_MARGIN
            {
                input.jump_pressed = true;
                self.target = Some(i + 1);
            }
            return input;
        }

        // Airborne: stop drifting once over the middle of the target.
        if let Some(target) = self.target.and_then(|i| layout.platforms.get(i))
            && feet.center_x() >= target.center_x()
        {
            input.move_right = false;
            input.sprint = false;
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mups_core::Simulation;
    use mups_core::time::tick_duration;
    use mups_engine::config::EngineConfig;

    use super::*;

    fn tick() -> Duration {
        tick_duration(60.0)
    }

    fn drive_to_level(game: &mut Game, pilot: &mut Autopilot) {
        for _ in 0..400 {
            let input = pilot.next_input(game);
            game.update(tick(), &input);
            if game.scene() == GameState::Level {
                return;
            }
        }
    }

    #[test]
    fn autopilot_accepts_a_contract_and_enters_a_dimension() {
        let mut game = Game::new(EngineConfig::default(), 3);
        let mut pilot = Autopilot::default();
        drive_to_level(&mut game, &mut pilot);
        assert_eq!(game.scene(), GameState::Level);
        assert!(game.state().current_contract.is_some());
    }

    #[test]
    fn takes_off_at_the_platform_lip() {
        let mut game = Game::new(EngineConfig::default(), 3);
        let mut pilot = Autopilot::default();
        drive_to_level(&mut game, &mut pilot);
        let layout = game.level().cloned().expect("level");
        let mut player = game.player().clone();
        let start = layout.start();
        player.rect.set_right(start.right() - 2.0);
        let input = pilot.level_input(&layout, &player);
        assert!(input.jump_pressed);
        assert_eq!(pilot.target, Some(1));
    }
}
