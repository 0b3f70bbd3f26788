use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progression::Progression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    PremiumRoutes,
    ExtraLife,
}

impl ShopItem {
    /// Catalogue order at the counter.
    pub const ALL: [ShopItem; 2] = [ShopItem::PremiumRoutes, ShopItem::ExtraLife];

    pub fn key(self) -> &'static str {
        match self {
            ShopItem::PremiumRoutes => "premium_routes",
            ShopItem::ExtraLife => "extra_life",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShopItem::PremiumRoutes => "Premium Routes License",
            ShopItem::ExtraLife => "Auxiliary Drone",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ShopItem::PremiumRoutes => "+20% contract payouts.",
            ShopItem::ExtraLife => "+1 life on every mission.",
        }
    }

    pub fn price(self) -> u32 {
        match self {
            ShopItem::PremiumRoutes => 250,
            ShopItem::ExtraLife => 200,
        }
    }

    pub fn pay_multiplier(self) -> f32 {
        match self {
            ShopItem::PremiumRoutes => 1.2,
            ShopItem::ExtraLife => 1.0,
        }
    }

    pub fn bonus_lives(self) -> i32 {
        match self {
            ShopItem::PremiumRoutes => 0,
            ShopItem::ExtraLife => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("{} is already owned", .0.name())]
    AlreadyOwned(ShopItem),
    #[error("{} costs {price}, only {credits} credits available", item.name())]
    InsufficientFunds {
        item: ShopItem,
        price: u32,
        credits: u64,
    },
}

/// Items bought this session. Every item stacks at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Upgrades {
    owned: Vec<ShopItem>,
}

impl Upgrades {
    pub fn owns(&self, item: ShopItem) -> bool {
        self.owned.contains(&item)
    }

    pub fn items(&self) -> &[ShopItem] {
        &self.owned
    }

    pub fn pay_multiplier(&self) -> f32 {
        self.owned.iter().map(|item| item.pay_multiplier()).product()
    }

    pub fn bonus_lives(&self) -> i32 {
        self.owned.iter().map(|item| item.bonus_lives()).sum()
    }

    /// Buy `item` with credits from `wallet`. Nothing changes on error.
    pub fn purchase(
        &mut self,
        item: ShopItem,
        wallet: &mut dyn Progression,
    ) -> Result<(), PurchaseError> {
        if self.owns(item) {
            return Err(PurchaseError::AlreadyOwned(item));
        }
        let price = item.price();
        if !wallet.spend(price) {
            return Err(PurchaseError::InsufficientFunds {
                item,
                price,
                credits: wallet.credits(),
            });
        }
        self.owned.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Ledger;

    fn ledger_with(credits: u64) -> Ledger {
        Ledger {
            credits,
            ..Ledger::default()
        }
    }

    #[test]
    fn purchase_deducts_and_records() {
        let mut wallet = ledger_with(500);
        let mut upgrades = Upgrades::default();
        upgrades.purchase(ShopItem::ExtraLife, &mut wallet).unwrap();
        assert_eq!(wallet.credits, 300);
        assert!(upgrades.owns(ShopItem::ExtraLife));
        assert_eq!(upgrades.bonus_lives(), 1);
        assert_eq!(upgrades.pay_multiplier(), 1.0);

        upgrades.purchase(ShopItem::PremiumRoutes, &mut wallet).unwrap();
        assert_eq!(wallet.credits, 50);
        assert!((upgrades.pay_multiplier() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn short_funds_are_refused_untouched() {
        let mut wallet = ledger_with(249);
        let mut upgrades = Upgrades::default();
        let err = upgrades
            .purchase(ShopItem::PremiumRoutes, &mut wallet)
            .unwrap_err();
        assert_eq!(
            err,
            PurchaseError::InsufficientFunds {
                item: ShopItem::PremiumRoutes,
                price: 250,
                credits: 249,
            }
        );
        assert_eq!(wallet.credits, 249);
        assert!(upgrades.items().is_empty());
    }

    #[test]
    fn items_stack_once() {
        let mut wallet = ledger_with(1000);
        let mut upgrades = Upgrades::default();
        upgrades.purchase(ShopItem::ExtraLife, &mut wallet).unwrap();
        assert_eq!(
            upgrades.purchase(ShopItem::ExtraLife, &mut wallet),
            Err(PurchaseError::AlreadyOwned(ShopItem::ExtraLife))
        );
        assert_eq!(wallet.credits, 800);
        assert_eq!(upgrades.bonus_lives(), 1);
    }
}
