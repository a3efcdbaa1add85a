//! Carried ammunition.
//!
//! The ledger tracks rounds the character carries outside of any magazine.
//! Reloading moves rounds from here into the equipped weapon.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Type of ammunition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AmmoType {
    /// 9mm rounds.
    NineMm,
    /// Assault rifle rounds.
    AssaultRifle,
}

impl AmmoType {
    /// Short label for HUDs and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NineMm => "9mm",
            Self::AssaultRifle => "AR",
        }
    }
}

/// An ammo box lying in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoPickup {
    /// Type of rounds in the box.
    pub ammo_type: AmmoType,
    /// Number of rounds.
    pub count: u32,
}

impl AmmoPickup {
    /// Create an ammo pickup.
    #[must_use]
    pub const fn new(ammo_type: AmmoType, count: u32) -> Self {
        Self { ammo_type, count }
    }
}

/// Carried rounds per ammo type.
///
/// There is no carry cap: adding saturates at `u32::MAX` and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoLedger {
    ammo: HashMap<AmmoType, u32>,
}

impl AmmoLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with starting stock.
    #[must_use]
    pub fn with_stock(stock: impl IntoIterator<Item = (AmmoType, u32)>) -> Self {
        let mut ledger = Self::new();
        for (ammo_type, count) in stock {
            ledger.add(ammo_type, count);
        }
        ledger
    }

    /// Add rounds of a type.
    pub fn add(&mut self, ammo_type: AmmoType, amount: u32) {
        let count = self.ammo.entry(ammo_type).or_insert(0);
        *count = count.saturating_add(amount);
    }

    /// Take up to `amount` rounds, returns how many were actually taken.
    pub fn take(&mut self, ammo_type: AmmoType, amount: u32) -> u32 {
        let Some(current) = self.ammo.get_mut(&ammo_type) else {
            return 0;
        };
        let taken = amount.min(*current);
        *current -= taken;
        taken
    }

    /// Get carried count.
    #[must_use]
    pub fn count(&self, ammo_type: AmmoType) -> u32 {
        self.ammo.get(&ammo_type).copied().unwrap_or(0)
    }

    /// Check if any rounds of this type are carried.
    #[must_use]
    pub fn has(&self, ammo_type: AmmoType) -> bool {
        self.count(ammo_type) > 0
    }

    /// Get all ammo types with counts.
    pub fn iter(&self) -> impl Iterator<Item = (AmmoType, u32)> + '_ {
        self.ammo.iter().map(|(&ammo_type, &count)| (ammo_type, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_and_count() {
        let mut ledger = AmmoLedger::new();
        assert!(!ledger.has(AmmoType::NineMm));

        ledger.add(AmmoType::NineMm, 85);
        assert_eq!(ledger.count(AmmoType::NineMm), 85);
        assert!(ledger.has(AmmoType::NineMm));
        assert_eq!(ledger.count(AmmoType::AssaultRifle), 0);
    }

    #[test]
    fn test_take_is_bounded_by_stock() {
        let mut ledger = AmmoLedger::with_stock([(AmmoType::AssaultRifle, 5)]);

        assert_eq!(ledger.take(AmmoType::AssaultRifle, 20), 5);
        assert_eq!(ledger.count(AmmoType::AssaultRifle), 0);
        assert!(!ledger.has(AmmoType::AssaultRifle));

        assert_eq!(ledger.take(AmmoType::NineMm, 3), 0);
    }

    #[test]
    fn test_add_saturates() {
        let mut ledger = AmmoLedger::with_stock([(AmmoType::NineMm, u32::MAX - 1)]);
        ledger.add(AmmoType::NineMm, 10);
        assert_eq!(ledger.count(AmmoType::NineMm), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_take_never_exceeds_stock(start in 0u32..10_000, asks in prop::collection::vec(0u32..500, 0..40)) {
            let mut ledger = AmmoLedger::with_stock([(AmmoType::NineMm, start)]);
            let mut taken_total = 0u64;
            for ask in asks {
                let before = ledger.count(AmmoType::NineMm);
                let taken = ledger.take(AmmoType::NineMm, ask);
                prop_assert_eq!(taken, ask.min(before));
                taken_total += u64::from(taken);
            }
            prop_assert_eq!(u64::from(ledger.count(AmmoType::NineMm)) + taken_total, u64::from(start));
        }
    }
}
