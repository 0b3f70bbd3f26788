use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mups_core::{Rect, SampledRange, Vec2};

use crate::config::EngineConfig;
use crate::physics::MotionParams;
use crate::profile::{DifficultyProfile, ProfileError, Span};
use crate::reachability::{self, ReachabilityIssue};

/// Platform thickness.
pub const PLATFORM_THICKNESS: f32 = 18.0;
/// Floor-side space kept clear of platforms.
pub const MIN_FLOOR_ROOM: f32 = 80.0;
/// Ceiling-side space kept clear of platforms.
pub const MIN_CEILING_ROOM: f32 = 60.0;
/// Distance from the end of the hall where the door zone begins.
pub const DOOR_CLEAR_BUFFER: f32 = 320.0;
/// Smallest vertical step ever used, whatever the profile.
pub const MIN_VERTICAL_STEP: u32 = 28;
/// Longest hall the generator will walk.
pub const MAX_HALL_LENGTH: f32 = 100_000.0;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid difficulty profile: {0}")]
    InvalidProfile(#[from] ProfileError),
    #[error("corridor from y={ceiling_y} to y={floor_y} leaves no room for platforms")]
    CorridorTooNarrow { ceiling_y: f32, floor_y: f32 },
    #[error("hall length {hall_length} is shorter than the minimum {required}")]
    HallTooShort { hall_length: f32, required: f32 },
    #[error("hall length {hall_length} exceeds the maximum {max}")]
    HallTooLong { hall_length: f32, max: f32 },
}

/// Layout constants for the dimension generator, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub platform_thickness: f32,
    pub min_floor_room: f32,
    pub min_ceiling_room: f32,
    pub door_clear_buffer: f32,
    pub start_x: f32,
    pub start_width: f32,
    /// Start platform height above the lowest platform row.
    pub start_rise: f32,
    pub min_vertical_step: u32,
    pub vertical_step_factor: f32,
    pub horizontal_step_factor: f32,
    pub end_min_width: u32,
    /// Space left between the end platform and the door zone.
    pub end_margin: f32,
    pub door_width: f32,
    pub door_height: f32,
    pub door_inset: f32,
    /// Minimum gap between the door top and the ceiling.
    pub door_headroom: f32,
    /// Highest screen y the door top may reach.
    pub door_min_top: f32,
    /// Extra corridor height on top of the ceiling and floor room.
    pub corridor_headroom: f32,
    pub corridor_min_ceiling: f32,
    pub corridor_base_factor: f32,
    pub corridor_variation_factor: f32,
    pub corridor_min_variation: u32,
    pub beacon_count: SampledRange<u32>,
    pub beacon_size: f32,
    /// Height of the beacon center above the platform top.
    pub beacon_hover: f32,
    pub beacon_min_platform_width: f32,
    pub beacon_edge_margin: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            platform_thickness: PLATFORM_THICKNESS,
            min_floor_room: MIN_FLOOR_ROOM,
            min_ceiling_room: MIN_CEILING_ROOM,
            door_clear_buffer: DOOR_CLEAR_BUFFER,
            start_x: 60.0,
            start_width: 220.0,
            start_rise: 40.0,
            min_vertical_step: MIN_VERTICAL_STEP,
            vertical_step_factor: 0.6,
            horizontal_step_factor: 1.2,
            end_min_width: 200,
            end_margin: 40.0,
            door_width: 52.0,
            door_height: 150.0,
            door_inset: 10.0,
            door_headroom: 20.0,
            door_min_top: 80.0,
            corridor_headroom: 180.0,
            corridor_min_ceiling: 40.0,
            corridor_base_factor: 0.6,
            corridor_variation_factor: 0.35,
            corridor_min_variation: 24,
            beacon_count: SampledRange::Between(2, 4),
            beacon_size: 16.0,
            beacon_hover: 18.0,
            beacon_min_platform_width: 40.0,
            beacon_edge_margin: 20.0,
        }
    }
}

/// Vertical extent of a dimension: the ceiling line and the pit floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorBounds {
    pub ceiling_y: f32,
    pub floor_y: f32,
}

impl CorridorBounds {
    pub fn height(&self) -> f32 {
        self.floor_y - self.ceiling_y
    }
}

/// Largest per-transition offsets the generator was allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepBounds {
    pub vertical: u32,
    pub horizontal: u32,
}

/// An immutable generated dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Left to right; the first is the start platform, the last the end platform.
    pub platforms: Vec<Rect>,
    pub door: Rect,
    /// Mid-bottom point the player stands on when spawning.
    pub spawn: Vec2,
    pub beacons: Vec<Rect>,
    pub corridor: CorridorBounds,
    pub hall_length: f32,
    pub steps: StepBounds,
    pub gap_range: Span,
    pub seed: u64,
    /// Transitions the post-generation audit flagged; empty when not audited.
    #[serde(default)]
    pub reachability: Vec<ReachabilityIssue>,
}

impl LevelLayout {
    pub fn start(&self) -> Rect {
        self.platforms.first().copied().unwrap_or_default()
    }

    pub fn end(&self) -> Rect {
        self.platforms.last().copied().unwrap_or_default()
    }

    /// Platforms between the start and end platforms.
    pub fn intermediates(&self) -> &[Rect] {
        match self.platforms.len() {
            0..=2 => &[],
            n => &self.platforms[1..n - 1],
        }
    }
}

/// Per-transition step bounds for a validated profile.
pub fn step_bounds(cfg: &GeneratorConfig, profile: &DifficultyProfile) -> StepBounds {
    let apex = f64::from(profile.apex_height());
    let vertical = apex * f64::from(cfg.vertical_step_factor) * f64::from(profile.vertical_bias);
    let horizontal =
        apex * f64::from(cfg.horizontal_step_factor) * f64::from(profile.horizontal_bias);
    // `as` saturates, so an oversized product lands on u32::MAX rather than wrapping.
    StepBounds {
        vertical: (vertical.floor() as u32).max(cfg.min_vertical_step),
        horizontal: (horizontal.floor() as u32)
            .min(profile.gap_range.max)
            .max(profile.gap_range.min),
    }
}

/// Pick a corridor height scaled to the profile's jump height.
pub fn derive_corridor<R: Rng + ?Sized>(
    cfg: &GeneratorConfig,
    profile: &DifficultyProfile,
    floor_y: f32,
    rng: &mut R,
) -> CorridorBounds {
    let apex = f64::from(profile.apex_height());
    let min_corridor =
        f64::from(cfg.min_ceiling_room + cfg.min_floor_room + cfg.corridor_headroom).trunc();
    let max_corridor = f64::from(floor_y - cfg.min_floor_room)
        .trunc()
        .max(min_corridor);
    let base = min_corridor + (apex * f64::from(cfg.corridor_base_factor)).floor();
    let variation = (apex * f64::from(cfg.corridor_variation_factor))
        .floor()
        .max(f64::from(cfg.corridor_min_variation))
        .min(max_corridor)
        .max(0.0) as i64;
    let offset = rng.random_range(-variation..=variation) as f64;
    let height = (base + offset).max(min_corridor).min(max_corridor);
    CorridorBounds {
        ceiling_y: (floor_y - height as f32).max(cfg.corridor_min_ceiling),
        floor_y,
    }
}

/// Generate a dimension with the default generator layout.
pub fn generate(
    profile: &DifficultyProfile,
    corridor: CorridorBounds,
    hall_length: f32,
    seed: u64,
) -> Result<LevelLayout, GenerationError> {
    generate_with_config(&GeneratorConfig::default(), profile, corridor, hall_length, seed)
}

pub fn generate_with_config(
    cfg: &GeneratorConfig,
    profile: &DifficultyProfile,
    corridor: CorridorBounds,
    hall_length: f32,
    seed: u64,
) -> Result<LevelLayout, GenerationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    build_layout(cfg, profile, corridor, hall_length, seed, &mut rng)
}

/// Derive a corridor, generate, and audit a full dimension from one seed.
pub fn generate_dimension(
    profile: &DifficultyProfile,
    config: &EngineConfig,
    seed: u64,
) -> Result<LevelLayout, GenerationError> {
    let profile = profile.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let corridor = derive_corridor(&config.generator, &profile, config.world.floor_y, &mut rng);
    let mut layout = build_layout(
        &config.generator,
        &profile,
        corridor,
        config.world.hall_length,
        seed,
        &mut rng,
    )?;
    tracing::debug!(
        seed,
        platforms = layout.platforms.len(),
        beacons = layout.beacons.len(),
        ceiling = layout.corridor.ceiling_y,
        vertical_step = layout.steps.vertical,
        horizontal_step = layout.steps.horizontal,
        "Generated dimension"
    );
    layout.reachability =
        reachability::audit(&layout, &MotionParams::from(&profile), &config.controller);
    Ok(layout)
}

fn build_layout(
    cfg: &GeneratorConfig,
    profile: &DifficultyProfile,
    corridor: CorridorBounds,
    hall_length: f32,
    seed: u64,
    rng: &mut StdRng,
) -> Result<LevelLayout, GenerationError> {
    let profile = profile.validate()?;

    let min_y = corridor.ceiling_y + cfg.min_ceiling_room;
    let max_y = corridor.floor_y - cfg.min_floor_room;
    if !(min_y.is_finite() && max_y.is_finite()) || min_y > max_y {
        return Err(GenerationError::CorridorTooNarrow {
            ceiling_y: corridor.ceiling_y,
            floor_y: corridor.floor_y,
        });
    }
    let required = cfg.start_x + cfg.start_width + cfg.door_clear_buffer;
    if hall_length.is_nan() || hall_length <= required {
        return Err(GenerationError::HallTooShort {
            hall_length,
            required,
        });
    }
    if hall_length > MAX_HALL_LENGTH {
        return Err(GenerationError::HallTooLong {
            hall_length,
            max: MAX_HALL_LENGTH,
        });
    }

    let steps = step_bounds(cfg, &profile);
    let gaps = Span::new(profile.gap_range.min, steps.horizontal);
    // Offsets larger than the band are clamped away anyway.
    let vertical = (steps.vertical as f32).min((max_y - min_y).floor()) as i32;
    let door_start = hall_length - cfg.door_clear_buffer;
    let thickness = cfg.platform_thickness;

    let start_y = (corridor.floor_y - cfg.min_floor_room - cfg.start_rise).clamp(min_y, max_y);
    let start = Rect::new(cfg.start_x, start_y, cfg.start_width, thickness);
    let mut platforms = vec![start];

    let mut x = start.right() + gaps.sample(rng) as f32;
    let mut y = start_y;
    let limit = door_start - profile.width_range.min as f32 - profile.gap_range.min as f32;
    while x < limit {
        let width = profile.width_range.sample(rng) as f32;
        y = (y + rng.random_range(-vertical..=vertical) as f32).clamp(min_y, max_y);
        platforms.push(Rect::new(x, y, width, thickness));
        x += width + gaps.sample(rng) as f32;
    }

    // The end platform keeps the previous height and a legal final gap.
    let prev = platforms[platforms.len() - 1];
    let end_w = cfg.end_min_width.max(profile.width_range.max) as f32;
    let target_x = door_start - end_w - cfg.end_margin;
    let end_x = target_x.clamp(
        prev.right() + gaps.min as f32,
        prev.right() + gaps.max as f32,
    );
    let end = Rect::new(end_x, prev.top(), end_w, thickness);
    platforms.push(end);

    let hall_length = if end.right() + cfg.end_margin > hall_length {
        tracing::debug!(
            hall_length,
            end_right = end.right(),
            "Extending hall to fit end platform"
        );
        end.right() + cfg.end_margin
    } else {
        hall_length
    };

    let door = place_door(cfg, &end, &corridor);
    let beacons = place_beacons(cfg, &platforms, rng);

    Ok(LevelLayout {
        spawn: start.mid_top(),
        platforms,
        door,
        beacons,
        corridor,
        hall_length,
        steps,
        gap_range: profile.gap_range,
        seed,
        reachability: Vec::new(),
    })
}

fn place_door(cfg: &GeneratorConfig, end: &Rect, corridor: &CorridorBounds) -> Rect {
    let left = (end.center_x() - cfg.door_width / 2.0)
        .max(end.left() + cfg.door_inset)
        .min(end.right() - cfg.door_width - cfg.door_inset);
    let top = (end.top() - cfg.door_height)
        .max(corridor.ceiling_y + cfg.door_headroom)
        .max(cfg.door_min_top)
        .min(end.top());
    Rect::new(left, top, cfg.door_width, end.top() - top)
}

fn place_beacons(cfg: &GeneratorConfig, platforms: &[Rect], rng: &mut StdRng) -> Vec<Rect> {
    let intermediates = match platforms.len() {
        0..=2 => return Vec::new(),
        n => &platforms[1..n - 1],
    };
    let mut candidates: Vec<&Rect> = intermediates
        .iter()
        .filter(|p| p.w > cfg.beacon_min_platform_width)
        .collect();
    candidates.shuffle(rng);
    let target = (cfg.beacon_count.sample(rng) as usize).min(candidates.len());

    let size = cfg.beacon_size;
    let margin = cfg.beacon_edge_margin;
    let mut beacons: Vec<Rect> = candidates[..target]
        .iter()
        .map(|p| {
            let lo = p.left() + margin;
            let hi = (p.right() - margin).max(lo);
            let cx = if hi > lo {
                rng.random_range(lo..=hi).floor()
            } else {
                p.center_x()
            };
            let cy = p.top() - cfg.beacon_hover;
            Rect::new(cx - size / 2.0, cy - size / 2.0, size, size)
        })
        .collect();
    beacons.sort_by(|a, b| a.x.total_cmp(&b.x));
    beacons
}
