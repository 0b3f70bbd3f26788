use std::time::Duration;

use crate::input::PlayerInput;
use crate::session::GameEvent;

use super::{GameState, SceneContext, SceneHandler};

pub(super) struct ContractMenuScene;

impl ContractMenuScene {
    fn accept(ctx: &mut SceneContext<'_>) {
        let Some(contract) = ctx.state.contracts.get(ctx.state.selected_contract).cloned() else {
            return;
        };
        let bonus = ctx.progression.bonus_lives() + ctx.state.upgrades.bonus_lives();
        let lives = (contract.profile.lives as i32 + bonus).max(1) as u32;
        tracing::info!(
            contract = %contract.name,
            archetype = contract.archetype.key(),
            difficulty = contract.difficulty,
            lives,
            "Contract accepted"
        );
        ctx.events.push(GameEvent::ContractAccepted {
            name: contract.name.clone(),
            lives,
        });
        ctx.state.mission_lives = lives;
        ctx.state.current_contract = Some(contract);
        ctx.state.portal_active = true;
    }
}

impl SceneHandler for ContractMenuScene {
    fn on_tick(
        &self,
        ctx: &mut SceneContext<'_>,
        input: &PlayerInput,
        _dt: Duration,
    ) -> Option<GameState> {
        if input.back {
            return Some(GameState::Hub);
        }
        let count = ctx.state.contracts.len();
        if count == 0 {
            return (input.confirm || input.interact).then_some(GameState::Hub);
        }

        let selected = &mut ctx.state.selected_contract;
        if input.menu_up {
            *selected = (*selected + count - 1) % count;
        }
        if input.menu_down {
            *selected = (*selected + 1) % count;
        }
        if input.confirm || input.interact {
            Self::accept(ctx);
            return Some(GameState::Hub);
        }
        None
    }
}
