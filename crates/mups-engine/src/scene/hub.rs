use std::time::Duration;

use crate::contracts::offer_contracts;
use crate::input::PlayerInput;
use crate::physics::{self, Arena, PlayerState};
use crate::session::{DialogCursor, GameEvent};

use super::{GameState, SceneContext, SceneHandler};

pub(super) struct HubScene;

impl HubScene {
    fn reset_run(ctx: &mut SceneContext<'_>) {
        let mut rng = ctx.state.rng();
        let offers = offer_contracts(ctx.config.hub.contract_offers, &mut rng);
        ctx.events.push(GameEvent::ContractsOffered {
            count: offers.len(),
        });
        tracing::debug!(count = offers.len(), "Contracts offered");

        let state = &mut *ctx.state;
        state.contracts = offers;
        state.selected_contract = 0;
        state.current_contract = None;
        state.portal_active = false;
        state.mission_lives = 0;
        state.level = None;
        state.player = PlayerState::new(ctx.hub.spawn(), 0, &ctx.config.controller);
    }
}

impl SceneHandler for HubScene {
    fn on_enter(&self, ctx: &mut SceneContext<'_>, from: Option<GameState>) -> Option<GameState> {
        match from {
            None | Some(GameState::Win) | Some(GameState::GameOver) => Self::reset_run(ctx),
            // A dimension that never built lands back here with the player
            // still wherever the level left them.
            Some(GameState::Level) => {
                ctx.state.player = PlayerState::new(ctx.hub.spawn(), 0, &ctx.config.controller);
            },
            _ => {},
        }
        None
    }

    fn on_tick(
        &self,
        ctx: &mut SceneContext<'_>,
        input: &PlayerInput,
        dt: Duration,
    ) -> Option<GameState> {
        let motion = ctx.config.hub.motion();
        let events = physics::tick(
            &mut ctx.state.player,
            input,
            Arena::Hub(ctx.hub),
            &motion,
            &ctx.config.controller,
            dt,
        );
        ctx.events.extend(events.into_iter().map(GameEvent::Player));

        let rect = ctx.state.player.rect;
        if ctx.state.portal_active
            && ctx.state.current_contract.is_some()
            && ctx.hub.touches_portal(&rect)
        {
            return Some(GameState::Level);
        }

        if input.codex && ctx.hub.near_console(&rect) {
            return Some(GameState::Codex);
        }

        if !input.interact {
            return None;
        }
        if let Some(npc) = ctx.hub.nearby_npc(&rect) {
            ctx.state.dialog = Some(DialogCursor { npc, line: 0 });
            return Some(GameState::Dialog);
        }
        if ctx.hub.near_shop(&rect) {
            return Some(GameState::Shop);
        }
        if ctx.hub.near_console(&rect) {
            return Some(GameState::ContractMenu);
        }
        None
    }
}
