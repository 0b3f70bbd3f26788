use serde::{Deserialize, Serialize};

use crate::contracts::Contract;
use crate::shop::Upgrades;

/// Credits added per collected beacon.
pub const BEACON_CASH_BONUS: u32 = 30;
/// XP added per collected beacon.
pub const BEACON_XP_BONUS: u32 = 15;
/// XP required for the first rank up.
const FIRST_LEVEL_XP: u32 = 120;

/// What reaching a delivery count unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MilestoneReward {
    Notice,
    /// Compounds onto the career pay multiplier.
    PayBonus(f32),
    LifeBonus(i32),
    Cash(u32),
}

/// A career milestone, unlocked once when `deliveries` is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Milestone {
    pub deliveries: u32,
    pub reward: MilestoneReward,
    pub text: &'static str,
}

pub const MILESTONES: [Milestone; 7] = [
    Milestone {
        deliveries: 1,
        reward: MilestoneReward::Notice,
        text: "First official route logged. Dispatcher noticed.",
    },
    Milestone {
        deliveries: 3,
        reward: MilestoneReward::PayBonus(0.05),
        text: "+5% command stipend applied.",
    },
    Milestone {
        deliveries: 5,
        reward: MilestoneReward::LifeBonus(1),
        text: "Support drone adds +1 life to missions.",
    },
    Milestone {
        deliveries: 8,
        reward: MilestoneReward::Cash(150),
        text: "Express bonus: 150 credits wired.",
    },
    Milestone {
        deliveries: 12,
        reward: MilestoneReward::PayBonus(0.08),
        text: "Hazard stipend upgraded (+8%).",
    },
    Milestone {
        deliveries: 15,
        reward: MilestoneReward::Notice,
        text: "Awarded Solar Courier suit tint.",
    },
    Milestone {
        deliveries: 20,
        reward: MilestoneReward::LifeBonus(1),
        text: "Emergency drone joins (+1 life).",
    },
];

/// What a finished mission pays out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub payout: u32,
    pub xp: u32,
}

/// Economy and upgrade state consulted by the scene flow.
pub trait Progression {
    /// Multiplier applied to every contract payment.
    fn pay_multiplier(&self) -> f32;

    /// Extra lives granted on top of the contract's lives.
    fn bonus_lives(&self) -> i32;

    fn credits(&self) -> u64;

    /// Deduct `amount` credits. Returns false, spending nothing, when short.
    fn spend(&mut self, amount: u32) -> bool;

    /// Payout for completing `contract` with `beacons` collected.
    fn reward_for(&self, contract: &Contract, beacons: u32, upgrades: &Upgrades) -> Reward {
        let multiplier = self.pay_multiplier() * upgrades.pay_multiplier();
        let base = (contract.payment as f32 * multiplier).round().max(0.0) as u32;
        Reward {
            payout: base + beacons * BEACON_CASH_BONUS,
            xp: contract.xp + beacons * BEACON_XP_BONUS,
        }
    }

    /// Bank a successful delivery. Returns the milestones it unlocked.
    fn record_success(&mut self, reward: Reward) -> Vec<Milestone>;

    fn record_failure(&mut self);
}

/// Career wallet and rank track, with milestone perks folded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub credits: u64,
    pub level: u32,
    pub xp: u32,
    pub xp_for_next_level: u32,
    pub deliveries: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub failures: u32,
    pub pay_multiplier: f32,
    pub bonus_lives: i32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            credits: 0,
            level: 1,
            xp: 0,
            xp_for_next_level: FIRST_LEVEL_XP,
            deliveries: 0,
            streak: 0,
            best_streak: 0,
            failures: 0,
            pay_multiplier: 1.0,
            bonus_lives: 0,
        }
    }
}

impl Progression for Ledger {
    fn pay_multiplier(&self) -> f32 {
        self.pay_multiplier
    }

    fn bonus_lives(&self) -> i32 {
        self.bonus_lives
    }

    fn credits(&self) -> u64 {
        self.credits
    }

    fn spend(&mut self, amount: u32) -> bool {
        match self.credits.checked_sub(u64::from(amount)) {
            Some(left) => {
                self.credits = left;
                true
            },
            None => false,
        }
    }

    fn record_success(&mut self, reward: Reward) -> Vec<Milestone> {
        self.credits += u64::from(reward.payout);
        self.xp += reward.xp;
        while self.xp >= self.xp_for_next_level {
            self.xp -= self.xp_for_next_level;
            self.level += 1;
            self.xp_for_next_level = (self.xp_for_next_level + 80)
                .max((self.xp_for_next_level as f32 * 1.2) as u32);
        }
        self.deliveries += 1;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);

        let unlocked: Vec<Milestone> = MILESTONES
            .iter()
            .filter(|m| m.deliveries == self.deliveries)
            .copied()
            .collect();
        for milestone in &unlocked {
            match milestone.reward {
                MilestoneReward::Notice => {},
                MilestoneReward::PayBonus(bonus) => {
                    self.pay_multiplier =
                        (self.pay_multiplier * (1.0 + bonus) * 1000.0).round() / 1000.0;
                },
                MilestoneReward::LifeBonus(lives) => self.bonus_lives += lives,
                MilestoneReward::Cash(cash) => self.credits += u64::from(cash),
            }
            tracing::info!(deliveries = self.deliveries, "{}", milestone.text);
        }
        unlocked
    }

    fn record_failure(&mut self) {
        if self.streak > 0 {
            tracing::info!(streak = self.streak, "Delivery streak reset");
        }
        self.streak = 0;
        self.failures += 1;
    }
}
