use std::time::Duration;

use crate::input::PlayerInput;
use crate::level_gen::generate_dimension;
use crate::physics::{self, Arena, ControllerEvent, MotionParams, PlayerState};
use crate::progression::Reward;
use crate::session::{GameEvent, MissionOutcome};

use super::{GameState, SceneContext, SceneHandler};

pub(super) struct LevelScene;

impl LevelScene {
    fn mission_time(ctx: &SceneContext<'_>) -> Duration {
        ctx.state
            .mission_started_at
            .map(|start| ctx.state.elapsed.saturating_sub(start))
            .unwrap_or_default()
    }

    fn succeed(ctx: &mut SceneContext<'_>) {
        let Some(contract) = ctx.state.current_contract.take() else {
            return;
        };
        let beacons = ctx.state.player.beacons_collected();
        let reward = ctx
            .progression
            .reward_for(&contract, beacons, &ctx.state.upgrades);
        let milestones = ctx.progression.record_success(reward);
        let duration = Self::mission_time(ctx);
        tracing::info!(
            contract = %contract.name,
            payout = reward.payout,
            xp = reward.xp,
            beacons,
            secs = duration.as_secs_f32(),
            "Mission complete"
        );
        ctx.events.push(GameEvent::MissionSucceeded {
            contract: contract.name.clone(),
            reward,
            beacons,
        });
        ctx.events.extend(milestones.iter().map(|m| GameEvent::MilestoneReached {
            deliveries: m.deliveries,
            text: m.text.to_string(),
        }));
        ctx.state.last_outcome = Some(MissionOutcome {
            contract: contract.name,
            success: true,
            reward,
            beacons,
            duration,
            reason: None,
        });
        ctx.state.portal_active = false;
    }

    fn fail(ctx: &mut SceneContext<'_>, reason: &str) {
        let Some(contract) = ctx.state.current_contract.take() else {
            return;
        };
        ctx.progression.record_failure();
        let duration = Self::mission_time(ctx);
        tracing::info!(contract = %contract.name, reason, "Mission failed");
        ctx.events.push(GameEvent::MissionFailed {
            contract: contract.name.clone(),
            reason: reason.to_string(),
        });
        ctx.state.last_outcome = Some(MissionOutcome {
            contract: contract.name,
            success: false,
            reward: Reward::default(),
            beacons: ctx.state.player.beacons_collected(),
            duration,
            reason: Some(reason.to_string()),
        });
        ctx.state.portal_active = false;
    }
}

impl SceneHandler for LevelScene {
    fn on_enter(&self, ctx: &mut SceneContext<'_>, _from: Option<GameState>) -> Option<GameState> {
        let Some(profile) = ctx.state.current_contract.as_ref().map(|c| c.profile.clone()) else {
            tracing::warn!("Entered a dimension without an accepted contract");
            return Some(GameState::Hub);
        };
        let seed = ctx.state.next_seed();
        match generate_dimension(&profile, ctx.config, seed) {
            Ok(layout) => {
                ctx.state.dimension_index += 1;
                ctx.events.push(GameEvent::DimensionBuilt {
                    index: ctx.state.dimension_index,
                    seed,
                    platforms: layout.platforms.len(),
                });
                ctx.state.player =
                    PlayerState::for_level(&layout, ctx.state.mission_lives, &ctx.config.controller);
                ctx.state.level = Some(layout);
                ctx.state.mission_started_at = Some(ctx.state.elapsed);
                None
            },
            Err(e) => {
                tracing::error!(seed, "Failed to build dimension: {e}");
                ctx.state.current_contract = None;
                ctx.state.portal_active = false;
                Some(GameState::Hub)
            },
        }
    }

    fn on_tick(
        &self,
        ctx: &mut SceneContext<'_>,
        input: &PlayerInput,
        dt: Duration,
    ) -> Option<GameState> {
        let motion = match ctx.state.current_contract.as_ref() {
            Some(contract) => MotionParams::from(&contract.profile),
            None => return Some(GameState::Hub),
        };
        let state = &mut *ctx.state;
        let Some(layout) = state.level.as_ref() else {
            return Some(GameState::Hub);
        };
        let events = physics::tick(
            &mut state.player,
            input,
            Arena::Level(layout),
            &motion,
            &ctx.config.controller,
            dt,
        );

        let mut next = None;
        for event in events {
            match event {
                ControllerEvent::ReachedDoor => next = Some(GameState::Win),
                ControllerEvent::OutOfLives => next = Some(GameState::GameOver),
                ControllerEvent::LifeLost { remaining } => {
                    tracing::debug!(remaining, "Fell into the pit");
                },
                _ => {},
            }
            ctx.events.push(GameEvent::Player(event));
        }

        match next {
            Some(GameState::Win) => Self::succeed(ctx),
            Some(GameState::GameOver) => Self::fail(ctx, "out of lives"),
            _ => {},
        }
        next
    }

    fn on_exit(&self, ctx: &mut SceneContext<'_>) {
        ctx.state.level = None;
        ctx.state.mission_started_at = None;
    }
}
