use std::time::Duration;

use serde::{Deserialize, Serialize};

use mups_core::time::{elapsed_since, within_window};
use mups_core::{Rect, Vec2};

use crate::hub::HubLayout;
use crate::input::PlayerInput;
use crate::level_gen::LevelLayout;
use crate::profile::DifficultyProfile;

/// Horizontal walk speed (units per tick).
pub const MOVE_SPEED: f32 = 5.0;
/// Speed multiplier while sprinting.
pub const SPRINT_MULTIPLIER: f32 = 1.7;
/// Player AABB width.
pub const PLAYER_WIDTH: f32 = 30.0;
/// Player AABB height.
pub const PLAYER_HEIGHT: f32 = 30.0;
/// How long a jump press stays buffered.
pub const JUMP_BUFFER_MS: u64 = 140;
/// Grace period after leaving the ground during which a jump still counts.
pub const COYOTE_TIME_MS: u64 = 120;
/// Minimum time between two wall jumps.
pub const WALL_JUMP_COOLDOWN_MS: u64 = 220;
/// Horizontal push away from the wall on a wall jump.
pub const WALL_KICK: f32 = 6.0;
/// Extra reach around a beacon for pickup.
const BEACON_PICKUP_MARGIN: f32 = 6.0;

/// Controller tuning, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub move_speed: f32,
    pub sprint_multiplier: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub jump_buffer_ms: u64,
    pub coyote_time_ms: u64,
    pub wall_jump_cooldown_ms: u64,
    pub wall_kick: f32,
    pub beacon_pickup_margin: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            sprint_multiplier: SPRINT_MULTIPLIER,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            jump_buffer_ms: JUMP_BUFFER_MS,
            coyote_time_ms: COYOTE_TIME_MS,
            wall_jump_cooldown_ms: WALL_JUMP_COOLDOWN_MS,
            wall_kick: WALL_KICK,
            beacon_pickup_margin: BEACON_PICKUP_MARGIN,
        }
    }
}

impl ControllerConfig {
    pub fn jump_buffer(&self) -> Duration {
        Duration::from_millis(self.jump_buffer_ms)
    }

    pub fn coyote_time(&self) -> Duration {
        Duration::from_millis(self.coyote_time_ms)
    }

    pub fn wall_jump_cooldown(&self) -> Duration {
        Duration::from_millis(self.wall_jump_cooldown_ms)
    }

    pub fn sprint_speed(&self) -> f32 {
        self.move_speed * self.sprint_multiplier
    }
}

/// Gravity and jump tuning in effect for the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionParams {
    pub gravity: f32,
    pub jump_strength: f32,
    pub wall_jump: bool,
}

impl From<&DifficultyProfile> for MotionParams {
    fn from(profile: &DifficultyProfile) -> Self {
        Self {
            gravity: profile.gravity,
            jump_strength: profile.jump_strength,
            wall_jump: profile.wall_jump,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Which side of the player is pressed against a wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallContact {
    #[default]
    None,
    Left,
    Right,
}

impl WallContact {
    /// -1 for a wall on the left, +1 on the right, 0 for none.
    pub fn direction(self) -> i8 {
        match self {
            WallContact::None => 0,
            WallContact::Left => -1,
            WallContact::Right => 1,
        }
    }
}

/// Things that happened during one controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerEvent {
    Landed,
    Jumped,
    WallJumped { wall: WallContact },
    BeaconCollected { index: usize },
    LifeLost { remaining: u32 },
    OutOfLives,
    ReachedDoor,
}

/// Where the player is being simulated.
#[derive(Debug, Clone, Copy)]
pub enum Arena<'a> {
    Hub(&'a HubLayout),
    Level(&'a LevelLayout),
}

impl<'a> Arena<'a> {
    fn solids(&self) -> &'a [Rect] {
        match *self {
            Arena::Hub(_) => &[],
            Arena::Level(layout) => &layout.platforms,
        }
    }

    fn x_limit(&self) -> f32 {
        match self {
            Arena::Hub(hub) => hub.width,
            Arena::Level(layout) => layout.hall_length,
        }
    }
}

/// Player state owned by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub rect: Rect,
    pub velocity: Vec2,
    pub facing: Facing,
    pub grounded: bool,
    /// Simulation time, advanced by `dt` every tick.
    pub clock: Duration,
    pub last_grounded: Option<Duration>,
    pub last_jump_request: Option<Duration>,
    pub wall_contact: WallContact,
    pub last_wall_jump: Option<Duration>,
    pub lives_remaining: u32,
    /// Mid-bottom respawn point.
    pub spawn: Vec2,
    /// Collected flag per beacon of the current dimension.
    pub beacons: Vec<bool>,
}

impl PlayerState {
    pub fn new(spawn: Vec2, lives: u32, cfg: &ControllerConfig) -> Self {
        Self {
            rect: Rect::from_mid_bottom(spawn.x, spawn.y, cfg.player_width, cfg.player_height),
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            grounded: true,
            clock: Duration::ZERO,
            last_grounded: Some(Duration::ZERO),
            last_jump_request: None,
            wall_contact: WallContact::None,
            last_wall_jump: None,
            lives_remaining: lives,
            spawn,
            beacons: Vec::new(),
        }
    }

    /// A fresh player standing on the start platform of `layout`.
    pub fn for_level(layout: &LevelLayout, lives: u32, cfg: &ControllerConfig) -> Self {
        let mut player = Self::new(layout.spawn, lives, cfg);
        player.beacons = vec![false; layout.beacons.len()];
        player
    }

    /// Back to the spawn point, at rest, with the jump timers cleared.
    pub fn respawn(&mut self) {
        self.rect = Rect::from_mid_bottom(self.spawn.x, self.spawn.y, self.rect.w, self.rect.h);
        self.velocity = Vec2::ZERO;
        self.grounded = true;
        self.last_grounded = Some(self.clock);
        self.last_jump_request = None;
        self.wall_contact = WallContact::None;
    }

    pub fn beacons_collected(&self) -> u32 {
        self.beacons.iter().filter(|b| **b).count() as u32
    }
}

/// Advance the player by one tick against `arena`.
pub fn tick(
    player: &mut PlayerState,
    input: &PlayerInput,
    arena: Arena<'_>,
    motion: &MotionParams,
    cfg: &ControllerConfig,
    dt: Duration,
) -> Vec<ControllerEvent> {
    let mut events = Vec::new();
    player.clock += dt;
    let now = player.clock;
    if input.jump_pressed {
        player.last_jump_request = Some(now);
    }

    let speed = if input.sprint {
        cfg.sprint_speed()
    } else {
        cfg.move_speed
    };
    player.velocity.x = f32::from(input.move_axis()) * speed;
    match input.move_axis() {
        -1 => player.facing = Facing::Left,
        1 => player.facing = Facing::Right,
        _ => {},
    }
    player.velocity.y += motion.gravity;

    let was_grounded = player.grounded;
    let solids = arena.solids();

    // Horizontal axis first, then vertical.
    player.wall_contact = match sweep_horizontal(&mut player.rect, player.velocity.x, solids) {
        Some(contact) => contact,
        None => static_wall_contact(&player.rect, solids),
    };
    resolve_vertical(player, solids);

    match arena {
        Arena::Level(layout) => {
            collect_beacons(player, layout, cfg, &mut events);
            if player.rect.bottom() >= layout.corridor.floor_y {
                fall_into_pit(player, &mut events);
                return events;
            }
            if player.rect.top() <= layout.corridor.ceiling_y {
                player.rect.set_top(layout.corridor.ceiling_y);
                if player.velocity.y < 0.0 {
                    player.velocity.y = 0.0;
                }
            }
        },
        Arena::Hub(hub) => {
            if player.rect.bottom() >= hub.floor_y {
                player.rect.set_bottom(hub.floor_y);
                if player.velocity.y > 0.0 {
                    player.velocity.y = 0.0;
                }
                player.grounded = true;
            }
        },
    }

    if player.grounded {
        player.last_grounded = Some(now);
        if !was_grounded {
            events.push(ControllerEvent::Landed);
        }
    }

    let in_level = matches!(arena, Arena::Level(_));
    let requested = within_window(now, player.last_jump_request, cfg.jump_buffer());
    let has_coyote = within_window(now, player.last_grounded, cfg.coyote_time());
    let wall_ready = elapsed_since(now, player.last_wall_jump)
        .is_none_or(|since| since >= cfg.wall_jump_cooldown());

    if requested
        && in_level
        && motion.wall_jump
        && player.wall_contact != WallContact::None
        && !player.grounded
        && wall_ready
    {
        let wall = player.wall_contact;
        player.velocity.y = -motion.jump_strength;
        player.last_wall_jump = Some(now);
        player.last_jump_request = None;
        let kick = -f32::from(wall.direction()) * cfg.wall_kick;
        sweep_horizontal(&mut player.rect, kick, solids);
        player.wall_contact = WallContact::None;
        player.last_grounded = None;
        events.push(ControllerEvent::WallJumped { wall });
    } else if requested && (player.grounded || has_coyote) {
        player.velocity.y = -motion.jump_strength;
        player.grounded = false;
        player.last_jump_request = None;
        player.last_grounded = None;
        events.push(ControllerEvent::Jumped);
    }

    if let Arena::Level(layout) = arena
        && player.rect.intersects(&layout.door)
    {
        events.push(ControllerEvent::ReachedDoor);
    }

    let max_x = (arena.x_limit() - player.rect.w).max(0.0);
    player.rect.x = player.rect.x.clamp(0.0, max_x);

    events
}

/// Horizontal scroll offset that keeps the player centered where possible.
pub fn camera_x(player: &PlayerState, hall_length: f32, view_width: f32) -> f32 {
    let max_scroll = (hall_length - view_width).max(0.0);
    (player.rect.center_x() - view_width / 2.0).clamp(0.0, max_scroll)
}

/// Move `rect` by `dx` and snap it out of any solid it entered.
/// Returns the wall side hit, if any.
fn sweep_horizontal(rect: &mut Rect, dx: f32, solids: &[Rect]) -> Option<WallContact> {
    if dx == 0.0 {
        return None;
    }
    rect.x += dx;
    let moved = *rect;
    let hits = solids.iter().filter(|s| moved.intersects(s));
    if dx > 0.0 {
        let wall = hits.map(Rect::left).reduce(f32::min)?;
        rect.set_right(wall);
        Some(WallContact::Right)
    } else {
        let wall = hits.map(Rect::right).reduce(f32::max)?;
        rect.set_left(wall);
        Some(WallContact::Left)
    }
}

/// Wall contact for a player that did not move into a wall this tick.
fn static_wall_contact(rect: &Rect, solids: &[Rect]) -> WallContact {
    if solids.iter().any(|s| rect.touches_left_side_of(s)) {
        WallContact::Right
    } else if solids.iter().any(|s| rect.touches_right_side_of(s)) {
        WallContact::Left
    } else {
        WallContact::None
    }
}

fn resolve_vertical(player: &mut PlayerState, solids: &[Rect]) {
    player.grounded = false;
    let dy = player.velocity.y;
    if dy == 0.0 {
        return;
    }
    player.rect.y += dy;
    let moved = player.rect;
    let hits = solids.iter().filter(|s| moved.intersects(s));
    if dy > 0.0 {
        if let Some(floor) = hits.map(Rect::top).reduce(f32::min) {
            player.rect.set_bottom(floor);
            player.velocity.y = 0.0;
            player.grounded = true;
        }
    } else if let Some(ceiling) = hits.map(Rect::bottom).reduce(f32::max) {
        player.rect.set_top(ceiling);
        player.velocity.y = 0.0;
    }
}

fn collect_beacons(
    player: &mut PlayerState,
    layout: &LevelLayout,
    cfg: &ControllerConfig,
    events: &mut Vec<ControllerEvent>,
) {
    if player.beacons.len() != layout.beacons.len() {
        player.beacons.resize(layout.beacons.len(), false);
    }
    let margin = cfg.beacon_pickup_margin;
    for (index, beacon) in layout.beacons.iter().enumerate() {
        if !player.beacons[index] && player.rect.intersects(&beacon.inflate(margin, margin)) {
            player.beacons[index] = true;
            events.push(ControllerEvent::BeaconCollected { index });
        }
    }
}

fn fall_into_pit(player: &mut PlayerState, events: &mut Vec<ControllerEvent>) {
    player.lives_remaining = player.lives_remaining.saturating_sub(1);
    player.respawn();
    events.push(ControllerEvent::LifeLost {
        remaining: player.lives_remaining,
    });
    if player.lives_remaining == 0 {
        events.push(ControllerEvent::OutOfLives);
    }
}
