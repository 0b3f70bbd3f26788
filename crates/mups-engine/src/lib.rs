pub mod config;
pub mod contracts;
pub mod hub;
pub mod input;
pub mod level_gen;
pub mod physics;
pub mod profile;
pub mod progression;
pub mod reachability;
pub mod scene;
pub mod session;
pub mod shop;

use std::time::Duration;

use mups_core::Simulation;
use mups_core::simulation_boilerplate;

use config::EngineConfig;
use hub::HubLayout;
use input::PlayerInput;
use level_gen::LevelLayout;
use physics::PlayerState;
use progression::{Ledger, Progression};
use scene::{GameState, SceneContext};
use session::{GameEvent, SessionState};

/// A single-player M.U.P.S session: hub, contract console, and dimensions.
pub struct Game<P: Progression = Ledger> {
    config: EngineConfig,
    hub: HubLayout,
    progression: P,
    state: SessionState,
    paused: bool,
    /// Events raised while entering the first scene, drained by the first update.
    pending: Vec<GameEvent>,
}

impl Game<Ledger> {
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self::with_progression(config, seed, Ledger::default())
    }
}

impl<P: Progression> Game<P> {
    pub fn with_progression(config: EngineConfig, seed: u64, progression: P) -> Self {
        let hub = HubLayout::new(&config.world);
        let player = PlayerState::new(hub.spawn(), 0, &config.controller);
        let mut game = Self {
            config,
            hub,
            progression,
            state: SessionState::new(player, seed),
            paused: false,
            pending: Vec::new(),
        };
        let mut events = Vec::new();
        scene::start(&mut game.context(&mut events));
        game.pending = events;
        game
    }

    fn context<'a>(&'a mut self, events: &'a mut Vec<GameEvent>) -> SceneContext<'a> {
        SceneContext {
            state: &mut self.state,
            config: &self.config,
            hub: &self.hub,
            progression: &mut self.progression,
            events,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn scene(&self) -> GameState {
        self.state.scene
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hub(&self) -> &HubLayout {
        &self.hub
    }

    pub fn player(&self) -> &PlayerState {
        &self.state.player
    }

    pub fn level(&self) -> Option<&LevelLayout> {
        self.state.level.as_ref()
    }

    pub fn progression(&self) -> &P {
        &self.progression
    }

    pub fn progression_mut(&mut self) -> &mut P {
        &mut self.progression
    }
}

impl<P: Progression> Simulation for Game<P> {
    type Input = PlayerInput;
    type Event = GameEvent;

    fn update(&mut self, dt: Duration, input: &PlayerInput) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        let mut events = std::mem::take(&mut self.pending);
        self.state.elapsed += dt;
        scene::step(&mut self.context(&mut events), input, dt);
        events
    }

    fn tick_rate(&self) -> f32 {
        self.config.world.tick_rate_hz
    }

    simulation_boilerplate!(state_type: SessionState);
}
