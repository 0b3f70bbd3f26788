//! End-to-end mission flow through the public `Game` API: hub, console,
//! portal, dimension, door, and back.

use mups_core::Rect;
use mups_core::Simulation;
use mups_core::game_trait::{decode_state, encode_state};
use mups_core::test_helpers::{TICK, run_ticks, snapshot};

use mups_engine::Game;
use mups_engine::config::EngineConfig;
use mups_engine::input::PlayerInput;
use mups_engine::physics::ControllerEvent;
use mups_engine::progression::{BEACON_CASH_BONUS, Progression};
use mups_engine::scene::GameState;
use mups_engine::session::{GameEvent, SessionState};
use mups_engine::shop::ShopItem;

fn tap(game: &mut Game, input: PlayerInput) -> Vec<GameEvent> {
    let mut events = game.update(TICK, &input);
    events.extend(game.update(TICK, &PlayerInput::default()));
    events
}

fn enter_dimension(game: &mut Game) {
    tap(
        game,
        PlayerInput {
            interact: true,
            ..Default::default()
        },
    );
    tap(
        game,
        PlayerInput {
            confirm: true,
            ..Default::default()
        },
    );
    for _ in 0..300 {
        game.update(TICK, &PlayerInput::walk_right());
        if game.scene() == GameState::Level {
            return;
        }
    }
    panic!("never reached the portal");
}

/// Rewrite the session so the player stands just left of the door with
/// every beacon already collected.
fn stage_at_door(game: &mut Game) {
    let mut state: SessionState = decode_state(&snapshot(game)).expect("decode snapshot");
    let layout = state.level.as_ref().expect("dimension built");
    let door = layout.door;
    let floor = layout.end().top();
    let w = state.player.rect.w;
    let h = state.player.rect.h;
    state.player.rect = Rect::new(door.left() - w - 2.0, floor - h, w, h);
    state.player.beacons.iter_mut().for_each(|b| *b = true);
    let bytes = encode_state(&state).expect("encode snapshot");
    game.apply_state(&bytes).expect("apply staged snapshot");
}

#[test]
fn reaching_the_door_pays_out_and_returns_to_hub() {
    let mut game = Game::new(EngineConfig::default(), 2024);
    enter_dimension(&mut game);
    let contract = game.state().current_contract.clone().expect("contract accepted");
    stage_at_door(&mut game);
    let beacons = game.player().beacons_collected();

    let mut events = Vec::new();
    for _ in 0..30 {
        events.extend(game.update(TICK, &PlayerInput::walk_right()));
        if game.scene() != GameState::Level {
            break;
        }
    }
    assert_eq!(game.scene(), GameState::Win);
    assert!(events.contains(&GameEvent::Player(ControllerEvent::ReachedDoor)));

    let expected = game
        .progression()
        .reward_for(&contract, beacons, &game.state().upgrades);
    assert_eq!(expected.payout, contract.payment + beacons * BEACON_CASH_BONUS);
    assert!(events.contains(&GameEvent::MissionSucceeded {
        contract: contract.name.clone(),
        reward: expected,
        beacons,
    }));
    assert_eq!(game.progression().credits, u64::from(expected.payout));
    assert_eq!(game.progression().deliveries, 1);
    assert!(!game.state().portal_active);

    let events = tap(
        &mut game,
        PlayerInput {
            confirm: true,
            ..Default::default()
        },
    );
    assert_eq!(game.scene(), GameState::Hub);
    assert!(events.contains(&GameEvent::ContractsOffered { count: 3 }));
    assert!(game.state().current_contract.is_none());
    assert_eq!(game.player().rect.center_x(), game.hub().spawn().x);
    assert_eq!(game.player().lives_remaining, 0);
}

#[test]
fn premium_routes_raise_the_payout() {
    let mut game = Game::new(EngineConfig::default(), 2024);
    game.progression_mut().credits = 250;
    run_ticks(&mut game, &PlayerInput::walk_right(), 17, TICK);
    tap(
        &mut game,
        PlayerInput {
            interact: true,
            ..Default::default()
        },
    );
    assert_eq!(game.scene(), GameState::Shop);
    let events = tap(
        &mut game,
        PlayerInput {
            confirm: true,
            ..Default::default()
        },
    );
    assert!(events.contains(&GameEvent::ItemPurchased {
        item: ShopItem::PremiumRoutes,
        credits_left: 0,
    }));
    tap(
        &mut game,
        PlayerInput {
            back: true,
            ..Default::default()
        },
    );
    run_ticks(&mut game, &PlayerInput::walk_left(), 17, TICK);

    enter_dimension(&mut game);
    let contract = game.state().current_contract.clone().expect("contract accepted");
    stage_at_door(&mut game);
    let beacons = game.player().beacons_collected();
    let mut events = Vec::new();
    for _ in 0..30 {
        events.extend(game.update(TICK, &PlayerInput::walk_right()));
        if game.scene() != GameState::Level {
            break;
        }
    }
    assert_eq!(game.scene(), GameState::Win);

    let reward = events
        .iter()
        .find_map(|e| match e {
            GameEvent::MissionSucceeded { reward, .. } => Some(*reward),
            _ => None,
        })
        .expect("mission succeeded");
    let boosted = (contract.payment as f32 * 1.2).round() as u32;
    assert_eq!(reward.payout, boosted + beacons * BEACON_CASH_BONUS);
    assert_eq!(game.progression().credits, u64::from(reward.payout));
    assert!(events.iter().any(|e| matches!(e, GameEvent::MilestoneReached { deliveries: 1, .. })));
}

#[test]
fn second_mission_builds_a_new_dimension() {
    let mut game = Game::new(EngineConfig::default(), 5);
    enter_dimension(&mut game);
    let first_seed = game.level().map(|l| l.seed);
    stage_at_door(&mut game);
    run_ticks(&mut game, &PlayerInput::walk_right(), 30, TICK);
    assert_eq!(game.scene(), GameState::Win);
    tap(
        &mut game,
        PlayerInput {
            confirm: true,
            ..Default::default()
        },
    );

    enter_dimension(&mut game);
    assert_eq!(game.state().dimension_index, 2);
    assert_ne!(game.level().map(|l| l.seed), first_seed);
}

#[test]
fn identical_inputs_replay_identically() {
    let script = [
        PlayerInput {
            interact: true,
            ..Default::default()
        },
        PlayerInput::default(),
        PlayerInput {
            menu_down: true,
            ..Default::default()
        },
        PlayerInput::default(),
        PlayerInput {
            confirm: true,
            ..Default::default()
        },
    ];
    let mut a = Game::new(EngineConfig::default(), 77);
    let mut b = Game::new(EngineConfig::default(), 77);
    for input in script.iter().chain(std::iter::repeat_n(&PlayerInput::walk_right(), 100)) {
        assert_eq!(a.update(TICK, input), b.update(TICK, input));
    }
    assert_eq!(a.scene(), GameState::Level);
    assert_eq!(snapshot(&a), snapshot(&b));
}
