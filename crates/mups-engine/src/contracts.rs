use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use mups_core::SampledRange;

use crate::profile::{DifficultyProfile, Span};

/// Number of contracts offered at the console.
pub const CONTRACT_OPTION_COUNT: usize = 3;

const NAME_PREFIXES: &[&str] = &[
    "Aurora", "Nova", "Echo", "Titan", "Quantum", "Lumen", "Vortex", "Atlas", "Stellar", "Gale",
    "Eclipse", "Oracle",
];

const NAME_SUFFIXES: &[&str] = &[
    "Run",
    "Circuit",
    "Relay",
    "Shift",
    "Route",
    "Track",
    "Dash",
    "Spiral",
    "Passage",
    "Traverse",
    "Vector",
    "Expedition",
];

const HAZARD_DESCRIPTORS: &[&str] = &[
    "charged dust lanes",
    "volatile thermal vents",
    "graviton storms",
    "magnetic shear pockets",
    "nebula acid rain",
    "rogue drone fields",
    "unstable warp echoes",
    "fractured bridgework",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractTier {
    Easy,
    Medium,
    Hard,
}

impl ContractTier {
    pub const ALL: [ContractTier; 3] = [ContractTier::Easy, ContractTier::Medium, ContractTier::Hard];
}

/// Numeric knobs an archetype applies on top of the base derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTuning {
    pub difficulty: SampledRange<f32>,
    pub gap_mul: SampledRange<f32>,
    pub width_mul: SampledRange<f32>,
    pub vertical_bias: SampledRange<f32>,
    pub horizontal_bias: SampledRange<f32>,
    pub life_bonus: i32,
    pub gravity_offset: f32,
    pub payout_bonus: f32,
    pub xp_bonus: f32,
    pub wall_jump: bool,
}

impl Default for ArchetypeTuning {
    fn default() -> Self {
        Self {
            difficulty: SampledRange::Between(0.35, 1.05),
            gap_mul: SampledRange::Fixed(1.0),
            width_mul: SampledRange::Fixed(1.0),
            vertical_bias: SampledRange::Fixed(1.0),
            horizontal_bias: SampledRange::Fixed(1.0),
            life_bonus: 0,
            gravity_offset: 0.0,
            payout_bonus: 0.0,
            xp_bonus: 0.0,
            wall_jump: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractArchetype {
    CourierCruise,
    ExpressRelay,
    PrecisionShift,
    SpirelineGauntlet,
    HazardSweep,
}

impl ContractArchetype {
    pub const ALL: [ContractArchetype; 5] = [
        ContractArchetype::CourierCruise,
        ContractArchetype::ExpressRelay,
        ContractArchetype::PrecisionShift,
        ContractArchetype::SpirelineGauntlet,
        ContractArchetype::HazardSweep,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ContractArchetype::CourierCruise => "courier_cruise",
            ContractArchetype::ExpressRelay => "express_dash",
            ContractArchetype::PrecisionShift => "precision_shift",
            ContractArchetype::SpirelineGauntlet => "spireline_gauntlet",
            ContractArchetype::HazardSweep => "hazard_sweep",
        }
    }

    pub fn tier(self) -> ContractTier {
        match self {
            ContractArchetype::CourierCruise => ContractTier::Easy,
            ContractArchetype::ExpressRelay | ContractArchetype::PrecisionShift => {
                ContractTier::Medium
            },
            ContractArchetype::SpirelineGauntlet | ContractArchetype::HazardSweep => {
                ContractTier::Hard
            },
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            ContractArchetype::CourierCruise => "Courier Cruise",
            ContractArchetype::ExpressRelay => "Express Relay",
            ContractArchetype::PrecisionShift => "Precision Shift",
            ContractArchetype::SpirelineGauntlet => "Spireline Contract",
            ContractArchetype::HazardSweep => "Hazard Sweep",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            ContractArchetype::CourierCruise => "Training loop with generous landing pads.",
            ContractArchetype::ExpressRelay => "Rush contracts with long sprints and bonus pay.",
            ContractArchetype::PrecisionShift => "Compact pads that reward careful jumps.",
            ContractArchetype::SpirelineGauntlet => {
                "Vertical shafts carved between floating towers."
            },
            ContractArchetype::HazardSweep => "Toxic fields with premium payout for precision.",
        }
    }

    pub fn traits(self) -> &'static [&'static str] {
        match self {
            ContractArchetype::CourierCruise => &["+1 support drone", "Wide landing pads"],
            ContractArchetype::ExpressRelay => &["+15% payout", "Long sprint sections"],
            ContractArchetype::PrecisionShift => &["Compact pads", "+15% XP bounty"],
            ContractArchetype::SpirelineGauntlet => {
                &["Wall-jump thrusters online", "Vertical shaft routing"]
            },
            ContractArchetype::HazardSweep => &["Tiny pads", "+25% hazard pay", "-1 drone"],
        }
    }

    pub fn tuning(self) -> ArchetypeTuning {
        match self {
            ContractArchetype::CourierCruise => ArchetypeTuning {
                difficulty: SampledRange::Between(0.35, 0.5),
                gap_mul: SampledRange::Between(0.75, 0.9),
                width_mul: SampledRange::Between(1.2, 1.35),
                life_bonus: 1,
                gravity_offset: -0.02,
                ..ArchetypeTuning::default()
            },
            ContractArchetype::ExpressRelay => ArchetypeTuning {
                difficulty: SampledRange::Between(0.55, 0.85),
                gap_mul: SampledRange::Between(1.05, 1.2),
                width_mul: SampledRange::Between(0.9, 1.0),
                horizontal_bias: SampledRange::Fixed(1.25),
                payout_bonus: 0.15,
                ..ArchetypeTuning::default()
            },
            ContractArchetype::PrecisionShift => ArchetypeTuning {
                difficulty: SampledRange::Between(0.65, 0.95),
                gap_mul: SampledRange::Between(1.0, 1.15),
                width_mul: SampledRange::Between(0.75, 0.9),
                xp_bonus: 0.15,
                ..ArchetypeTuning::default()
            },
            ContractArchetype::SpirelineGauntlet => ArchetypeTuning {
                difficulty: SampledRange::Between(0.9, 1.2),
                gap_mul: SampledRange::Between(0.95, 1.05),
                width_mul: SampledRange::Between(0.8, 0.9),
                vertical_bias: SampledRange::Fixed(1.35),
                wall_jump: true,
                ..ArchetypeTuning::default()
            },
            ContractArchetype::HazardSweep => ArchetypeTuning {
                difficulty: SampledRange::Between(1.0, 1.3),
                gap_mul: SampledRange::Between(1.2, 1.35),
                width_mul: SampledRange::Between(0.65, 0.8),
                gravity_offset: 0.04,
                life_bonus: -1,
                payout_bonus: 0.25,
                xp_bonus: 0.1,
                ..ArchetypeTuning::default()
            },
        }
    }
}

/// Visual and narrative theme of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionTheme {
    AuroraShelf,
    EmberWastes,
    MistCascades,
    ObsidianVerge,
    SunkenGrotto,
    PrismBelt,
}

impl DimensionTheme {
    pub const ALL: [DimensionTheme; 6] = [
        DimensionTheme::AuroraShelf,
        DimensionTheme::EmberWastes,
        DimensionTheme::MistCascades,
        DimensionTheme::ObsidianVerge,
        DimensionTheme::SunkenGrotto,
        DimensionTheme::PrismBelt,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DimensionTheme::AuroraShelf => "aurora_shelf",
            DimensionTheme::EmberWastes => "ember_wastes",
            DimensionTheme::MistCascades => "mist_cascades",
            DimensionTheme::ObsidianVerge => "obsidian_verge",
            DimensionTheme::SunkenGrotto => "sunken_grotto",
            DimensionTheme::PrismBelt => "prism_belt",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DimensionTheme::AuroraShelf => "Aurora Shelf",
            DimensionTheme::EmberWastes => "Ember Wastes",
            DimensionTheme::MistCascades => "Mist Cascades",
            DimensionTheme::ObsidianVerge => "Obsidian Verge",
            DimensionTheme::SunkenGrotto => "Sunken Grotto",
            DimensionTheme::PrismBelt => "Prism Belt",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DimensionTheme::AuroraShelf => "Frozen freighters channel aurora currents between jumps.",
            DimensionTheme::EmberWastes => "Charred mesas belch ember fire beneath courier routes.",
            DimensionTheme::MistCascades => "Waterfalls drift upside down among mossy pylons.",
            DimensionTheme::ObsidianVerge => "Blackstone towers scrape storms of magnetized glass.",
            DimensionTheme::SunkenGrotto => "Coral ruins hide crosstide delivery gates.",
            DimensionTheme::PrismBelt => "Refraction fields split every shadow.",
        }
    }

    pub fn hazard(self) -> &'static str {
        match self {
            DimensionTheme::AuroraShelf => "Ion Tide",
            DimensionTheme::EmberWastes => "Volcanic Slurry",
            DimensionTheme::MistCascades => "Mycelium Bloom",
            DimensionTheme::ObsidianVerge => "Shard Mist",
            DimensionTheme::SunkenGrotto => "Brine Surge",
            DimensionTheme::PrismBelt => "Spectral Flux",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLabel {
    Routine,
    Risky,
    HazardSweep,
    Critical,
    Impossible,
}

impl DifficultyLabel {
    /// Label for a difficulty score; thresholds are inclusive upper bounds.
    pub fn for_score(score: f32) -> Self {
        match score {
            s if s <= 0.45 => DifficultyLabel::Routine,
            s if s <= 0.7 => DifficultyLabel::Risky,
            s if s <= 0.95 => DifficultyLabel::HazardSweep,
            s if s <= 1.2 => DifficultyLabel::Critical,
            _ => DifficultyLabel::Impossible,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLabel::Routine => "Routine Route",
            DifficultyLabel::Risky => "Risky Run",
            DifficultyLabel::HazardSweep => "Hazard Sweep",
            DifficultyLabel::Critical => "Critical Gauntlet",
            DifficultyLabel::Impossible => "Impossible Route",
        }
    }
}

/// A job offered at the contract console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    pub description: String,
    pub archetype: ContractArchetype,
    pub tier: ContractTier,
    pub theme: DimensionTheme,
    pub hazard: String,
    pub payment: u32,
    pub xp: u32,
    /// Difficulty score, rounded to two decimals.
    pub difficulty: f32,
    pub label: DifficultyLabel,
    pub traits: Vec<String>,
    pub profile: DifficultyProfile,
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let scale = 10f32.powi(decimals);
    (value * scale).round() / scale
}

fn round_i(value: f32) -> i32 {
    value.round() as i32
}

/// Roll a contract for `archetype`.
pub fn build_contract<R: Rng + ?Sized>(archetype: ContractArchetype, rng: &mut R) -> Contract {
    let tuning = archetype.tuning();
    let d = tuning.difficulty.sample(rng);

    let gravity = round_to(
        (0.45 + d * 0.35 + rng.random_range(-0.02..=0.02) + tuning.gravity_offset).clamp(0.45, 0.9),
        3,
    );
    let target_jump_height = rng
        .random_range((220.0 - d * 60.0)..=(320.0 - d * 20.0))
        .max(160.0);
    let jump_strength = round_to((target_jump_height * 2.0 * gravity).sqrt(), 3);

    let mut gap_min = round_i(60.0 + d * 55.0 + rng.random_range(-8.0..=8.0)).max(50);
    let gap_spread = round_i(50.0 + d * 80.0 + rng.random_range(-12.0..=12.0));
    let mut gap_max = gap_min + gap_spread.max(30);
    let gap_mul = tuning.gap_mul.sample(rng);
    gap_min = round_i(gap_min as f32 * gap_mul).max(40);
    gap_max = round_i(gap_max as f32 * gap_mul).max(gap_min + 20);

    let mut width_max = round_i(260.0 - d * 110.0 + rng.random_range(-12.0..=12.0)).max(140);
    let mut width_min = (width_max - round_i(40.0 + d * 45.0)).max(80);
    let width_mul = tuning.width_mul.sample(rng);
    width_min = round_i(width_min as f32 * width_mul);
    width_max = round_i(width_max as f32 * width_mul);
    if width_min >= width_max {
        width_min = (width_max - 20).max(70);
    }

    let lives = ((5 - (d * 3.0 + rng.random::<f32>()).floor() as i32).max(2) + tuning.life_bonus)
        .max(1);

    let score = (d
        + ((gap_min - 70) as f32 / 140.0).max(0.0)
        + ((200 - width_max) as f32 / 200.0).max(0.0)
        + (5 - lives) as f32 * 0.08)
        .clamp(0.35, 1.6);
    let mut payment = round_i(140.0 + score * 340.0 + rng.random_range(-10.0..=10.0));
    let mut xp = round_i(80.0 + score * 240.0);
    if tuning.payout_bonus != 0.0 {
        payment = round_i(payment as f32 * (1.0 + tuning.payout_bonus));
    }
    if tuning.xp_bonus != 0.0 {
        xp = round_i(xp as f32 * (1.0 + tuning.xp_bonus));
    }

    let label = DifficultyLabel::for_score(score);
    let hazard = HAZARD_DESCRIPTORS
        .choose(rng)
        .copied()
        .unwrap_or("unstable terrain");
    let theme = DimensionTheme::ALL
        .choose(rng)
        .copied()
        .unwrap_or(DimensionTheme::AuroraShelf);
    let prefix = NAME_PREFIXES.choose(rng).copied().unwrap_or("Nova");
    let suffix = NAME_SUFFIXES.choose(rng).copied().unwrap_or("Run");

    let profile = DifficultyProfile {
        gravity,
        jump_strength,
        gap_range: Span::new(gap_min.max(1) as u32, gap_max.max(1) as u32),
        width_range: Span::new(width_min.max(1) as u32, width_max.max(1) as u32),
        vertical_bias: tuning.vertical_bias.sample(rng),
        horizontal_bias: tuning.horizontal_bias.sample(rng),
        wall_jump: tuning.wall_jump,
        lives: lives as u32,
    };

    Contract {
        name: format!("{prefix} {suffix}"),
        description: format!(
            "{}: {} {} Expect {hazard}.",
            archetype.tagline(),
            archetype.summary(),
            theme.description()
        ),
        archetype,
        tier: archetype.tier(),
        theme,
        hazard: hazard.to_string(),
        payment: payment.max(0) as u32,
        xp: xp.max(0) as u32,
        difficulty: round_to(score, 2),
        label,
        traits: archetype.traits().iter().map(|t| t.to_string()).collect(),
        profile,
    }
}

/// Archetypes for a fresh offer: one per tier first, then unused ones,
/// then repeats, in shuffled order.
pub fn pick_archetypes<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<ContractArchetype> {
    let mut selected: Vec<ContractArchetype> = Vec::with_capacity(count);
    for tier in ContractTier::ALL {
        if selected.len() >= count {
            break;
        }
        let options: Vec<ContractArchetype> = ContractArchetype::ALL
            .into_iter()
            .filter(|a| a.tier() == tier && !selected.contains(a))
            .collect();
        if let Some(choice) = options.choose(rng) {
            selected.push(*choice);
        }
    }

    let mut pool: Vec<ContractArchetype> = ContractArchetype::ALL
        .into_iter()
        .filter(|a| !selected.contains(a))
        .collect();
    pool.shuffle(rng);
    while selected.len() < count {
        let Some(choice) = pool.pop() else {
            break;
        };
        selected.push(choice);
    }
    while selected.len() < count {
        match ContractArchetype::ALL.choose(rng) {
            Some(choice) => selected.push(*choice),
            None => break,
        }
    }

    selected.shuffle(rng);
    selected.truncate(count);
    selected
}

/// A full set of contracts for the console.
pub fn offer_contracts<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Contract> {
    pick_archetypes(count, rng)
        .into_iter()
        .map(|archetype| build_contract(archetype, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn one_archetype_per_tier_for_three_offers() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picks = pick_archetypes(CONTRACT_OPTION_COUNT, &mut rng);
            let tiers: HashSet<ContractTier> = picks.iter().map(|a| a.tier()).collect();
            assert_eq!(picks.len(), 3);
            assert_eq!(tiers.len(), 3, "seed {seed}: {picks:?}");
        }
    }

    #[test]
    fn larger_offers_use_every_archetype_before_repeating() {
        let mut rng = StdRng::seed_from_u64(9);
        let picks = pick_archetypes(5, &mut rng);
        let unique: HashSet<_> = picks.iter().collect();
        assert_eq!(unique.len(), 5);

        let picks = pick_archetypes(8, &mut rng);
        assert_eq!(picks.len(), 8);
        let unique: HashSet<_> = picks.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn small_offers_truncate() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_archetypes(1, &mut rng).len(), 1);
        assert!(pick_archetypes(0, &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_contract() {
        let a = build_contract(
            ContractArchetype::PrecisionShift,
            &mut StdRng::seed_from_u64(5),
        );
        let b = build_contract(
            ContractArchetype::PrecisionShift,
            &mut StdRng::seed_from_u64(5),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn spireline_unlocks_wall_jump() {
        let mut rng = StdRng::seed_from_u64(3);
        let c = build_contract(ContractArchetype::SpirelineGauntlet, &mut rng);
        assert!(c.profile.wall_jump);
        assert_eq!(c.profile.vertical_bias, 1.35);
        assert_eq!(c.tier, ContractTier::Hard);

        let c = build_contract(ContractArchetype::HazardSweep, &mut rng);
        assert!(!c.profile.wall_jump);
    }

    #[test]
    fn courier_cruise_is_gentle() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let c = build_contract(ContractArchetype::CourierCruise, &mut rng);
            assert!(c.profile.lives >= 3, "{c:?}");
            assert!(c.profile.gravity <= 0.63);
            assert_eq!(c.profile.horizontal_bias, 1.0);
        }
    }

    #[test]
    fn label_thresholds() {
        assert_eq!(DifficultyLabel::for_score(0.35), DifficultyLabel::Routine);
        assert_eq!(DifficultyLabel::for_score(0.45), DifficultyLabel::Routine);
        assert_eq!(DifficultyLabel::for_score(0.46), DifficultyLabel::Risky);
        assert_eq!(DifficultyLabel::for_score(0.95), DifficultyLabel::HazardSweep);
        assert_eq!(DifficultyLabel::for_score(1.2), DifficultyLabel::Critical);
        assert_eq!(DifficultyLabel::for_score(1.6), DifficultyLabel::Impossible);
    }

    #[test]
    fn description_mentions_theme_and_hazard() {
        let mut rng = StdRng::seed_from_u64(21);
        let c = build_contract(ContractArchetype::ExpressRelay, &mut rng);
        assert!(c.description.starts_with("Express Relay: "));
        assert!(c.description.contains(c.theme.description()));
        assert!(c.description.ends_with(&format!("Expect {}.", c.hazard)));
        assert_eq!(c.traits, vec!["+15% payout", "Long sprint sections"]);
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn contract_profiles_always_validate(seed in any::<u64>(), idx in 0usize..5) {
                let archetype = ContractArchetype::ALL[idx];
                let c = build_contract(archetype, &mut StdRng::seed_from_u64(seed));
                let p = &c.profile;
                prop_assert!(p.validate().is_ok(), "{:?}", p);
                prop_assert_eq!(p.validate().unwrap(), p.clone(), "ranges should already be ordered");
                prop_assert!((0.45..=0.9).contains(&p.gravity));
                prop_assert!(p.apex_height() >= 160.0 - 1.0);
                prop_assert!(p.gap_range.min >= 40);
                prop_assert!(p.gap_range.max >= p.gap_range.min + 20);
                prop_assert!(p.width_range.min < p.width_range.max);
                prop_assert!(p.lives >= 1);
                prop_assert!((0.35..=1.6).contains(&c.difficulty));
                prop_assert!(c.payment > 0 && c.xp > 0);
            }
        }
    }
}
