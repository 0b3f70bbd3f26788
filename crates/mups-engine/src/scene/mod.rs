//! Explicit scene state machine. Each [`GameState`] owns a handler; the
//! driver calls `on_tick` for the active scene and runs `on_exit`/`on_enter`
//! around every transition.

mod hub;
mod level;
mod menu;
mod screens;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::hub::HubLayout;
use crate::input::PlayerInput;
use crate::progression::Progression;
use crate::session::{GameEvent, SessionState};

/// Bound on chained redirects from `on_enter` within one tick.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    Hub,
    ContractMenu,
    Shop,
    Level,
    Win,
    GameOver,
    Dialog,
    Codex,
}

/// Borrowed view of the session handed to scene handlers.
pub struct SceneContext<'a> {
    pub state: &'a mut SessionState,
    pub config: &'a EngineConfig,
    pub hub: &'a HubLayout,
    pub progression: &'a mut dyn Progression,
    pub events: &'a mut Vec<GameEvent>,
}

pub trait SceneHandler {
    /// Called after the scene becomes active. Returning a state redirects
    /// immediately (e.g. a dimension that failed to build).
    fn on_enter(&self, _ctx: &mut SceneContext<'_>, _from: Option<GameState>) -> Option<GameState> {
        None
    }

    /// Called once per tick while active. Returning a state requests a transition.
    fn on_tick(
        &self,
        ctx: &mut SceneContext<'_>,
        input: &PlayerInput,
        dt: Duration,
    ) -> Option<GameState>;

    fn on_exit(&self, _ctx: &mut SceneContext<'_>) {}
}

pub fn handler(state: GameState) -> &'static dyn SceneHandler {
    match state {
        GameState::Hub => &hub::HubScene,
        GameState::ContractMenu => &menu::ContractMenuScene,
        GameState::Shop => &screens::ShopScene,
        GameState::Level => &level::LevelScene,
        GameState::Win => &screens::WinScene,
        GameState::GameOver => &screens::GameOverScene,
        GameState::Dialog => &screens::DialogScene,
        GameState::Codex => &screens::CodexScene,
    }
}

/// Enter the initial scene of a fresh session.
pub fn start(ctx: &mut SceneContext<'_>) {
    let first = ctx.state.scene;
    if let Some(next) = handler(first).on_enter(ctx, None) {
        transition(ctx, next);
    }
}

/// Run one tick of the active scene, applying any requested transition.
pub fn step(ctx: &mut SceneContext<'_>, input: &PlayerInput, dt: Duration) {
    let current = ctx.state.scene;
    if let Some(next) = handler(current).on_tick(ctx, input, dt)
        && next != current
    {
        transition(ctx, next);
    }
}

/// Leave the active scene and enter `next`, following redirects.
pub fn transition(ctx: &mut SceneContext<'_>, next: GameState) {
    let mut next = next;
    for _ in 0..MAX_REDIRECTS {
        let from = ctx.state.scene;
        handler(from).on_exit(ctx);
        ctx.state.scene = next;
        ctx.events.push(GameEvent::StateChanged { from, to: next });
        tracing::info!(?from, to = ?next, "Scene transition");
        match handler(next).on_enter(ctx, Some(from)) {
            Some(redirect) if redirect != next => next = redirect,
            _ => return,
        }
    }
    tracing::warn!(scene = ?ctx.state.scene, "Scene redirect limit reached");
}
