use serde::{Deserialize, Serialize};

/// Logical input for one tick. `jump_pressed` and the menu flags are edges
/// (true only on the tick the key went down); the movement flags are levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub move_left: bool,
    pub move_right: bool,
    pub sprint: bool,
    pub jump_pressed: bool,
    pub interact: bool,
    pub confirm: bool,
    pub back: bool,
    pub menu_up: bool,
    pub menu_down: bool,
    pub codex: bool,
}

impl PlayerInput {
    pub fn walk_right() -> Self {
        Self {
            move_right: true,
            ..Self::default()
        }
    }

    pub fn walk_left() -> Self {
        Self {
            move_left: true,
            ..Self::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Self::default()
        }
    }

    /// Horizontal intent: -1, 0 or +1. Holding both directions cancels out.
    pub fn move_axis(&self) -> i8 {
        match (self.move_left, self.move_right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_directions_cancel() {
        let input = PlayerInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(input.move_axis(), 0);
        assert_eq!(PlayerInput::walk_left().move_axis(), -1);
        assert_eq!(PlayerInput::walk_right().move_axis(), 1);
    }
}
