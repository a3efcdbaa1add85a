//! Firearms and their magazines.
//!
//! This module provides:
//! - Weapon kinds and their static stat rows
//! - Item lifecycle state (lying in the world, held, equipped, dropped)
//! - Magazine bookkeeping (fire, reload, eligibility)

use outbreak_common::EntityId;
use serde::{Deserialize, Serialize};

use crate::ammo::AmmoType;

/// Kind of weapon, naming a row in the weapon table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// AK-47, chambered for 9mm in this game.
    Ak47,
    /// Assault rifle.
    AssaultRifle,
}

impl WeaponKind {
    /// Row name used by the weapon table.
    #[must_use]
    pub const fn row_name(self) -> &'static str {
        match self {
            Self::Ak47 => "AK47",
            Self::AssaultRifle => "AssaultRifle",
        }
    }
}

/// Lifecycle state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemState {
    /// Lying in the world, waiting to be picked up.
    #[default]
    Pickup,
    /// Flying toward the character after interaction.
    EquipInterping,
    /// Held in the inventory but not in hand.
    PickedUp,
    /// In the character's hand.
    Equipped,
    /// Dropped, falling back into the world.
    Falling,
}

/// Static stats for a weapon kind, one row of the weapon table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Ammo the weapon loads.
    pub ammo_type: AmmoType,
    /// Rounds in the magazine when the weapon spawns.
    pub starting_ammo: u32,
    /// Magazine capacity.
    pub magazine_capacity: u32,
    /// Display name.
    pub name: String,
    /// Inventory icon asset key.
    #[serde(default)]
    pub inventory_icon: Option<String>,
    /// Ammo icon asset key.
    #[serde(default)]
    pub ammo_icon: Option<String>,
    /// Reload montage section to jump to.
    pub reload_montage_section: String,
    /// Seconds between automatic shots (0 = use the character's fire rate).
    #[serde(default)]
    pub auto_fire_rate: f32,
    /// Body-shot damage.
    pub damage: f32,
    /// Headshot damage.
    pub headshot_damage: f32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            ammo_type: AmmoType::NineMm,
            starting_ammo: 30,
            magazine_capacity: 30,
            name: "AK47".to_string(),
            inventory_icon: None,
            ammo_icon: None,
            reload_montage_section: "Reload AK47".to_string(),
            auto_fire_rate: 0.1,
            damage: 20.0,
            headshot_damage: 50.0,
        }
    }
}

/// A weapon entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeaponRecord")]
pub struct Weapon {
    id: EntityId,
    kind: WeaponKind,
    stats: WeaponStats,
    /// Rounds in the magazine.
    ammo: u32,
    state: ItemState,
    slot_index: Option<usize>,
}

/// Serialized form of [`Weapon`], checked before it becomes one.
#[derive(Deserialize)]
struct WeaponRecord {
    id: EntityId,
    kind: WeaponKind,
    stats: WeaponStats,
    ammo: u32,
    state: ItemState,
    slot_index: Option<usize>,
}

impl TryFrom<WeaponRecord> for Weapon {
    type Error = String;

    fn try_from(record: WeaponRecord) -> Result<Self, Self::Error> {
        if record.stats.magazine_capacity == 0 {
            return Err(format!("weapon {} has no magazine capacity", record.id));
        }
        if record.ammo > record.stats.magazine_capacity {
            return Err(format!(
                "weapon {} holds {} rounds in a {} round magazine",
                record.id, record.ammo, record.stats.magazine_capacity
            ));
        }
        Ok(Self {
            id: record.id,
            kind: record.kind,
            stats: record.stats,
            ammo: record.ammo,
            state: record.state,
            slot_index: record.slot_index,
        })
    }
}

impl Weapon {
    /// Create a weapon from its stat row. The magazine starts at
    /// `starting_ammo`, capped to capacity.
    #[must_use]
    pub fn new(id: EntityId, kind: WeaponKind, stats: WeaponStats) -> Self {
        let ammo = stats.starting_ammo.min(stats.magazine_capacity);
        Self {
            id,
            kind,
            stats,
            ammo,
            state: ItemState::Pickup,
            slot_index: None,
        }
    }

    /// Entity ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Weapon kind.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Static stats.
    #[must_use]
    pub const fn stats(&self) -> &WeaponStats {
        &self.stats
    }

    /// Rounds in the magazine.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Magazine capacity.
    #[must_use]
    pub const fn magazine_capacity(&self) -> u32 {
        self.stats.magazine_capacity
    }

    /// Ammo type.
    #[must_use]
    pub const fn ammo_type(&self) -> AmmoType {
        self.stats.ammo_type
    }

    /// Room left in the magazine.
    #[must_use]
    pub const fn magazine_space(&self) -> u32 {
        self.stats.magazine_capacity - self.ammo
    }

    /// Check if the magazine has a round.
    #[must_use]
    pub const fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    /// Remove one round. Saturates at zero.
    pub fn decrement_ammo(&mut self) {
        self.ammo = self.ammo.saturating_sub(1);
    }

    /// Load `amount` rounds into the magazine.
    ///
    /// # Panics
    ///
    /// Panics if the magazine would overflow its capacity. Callers compute
    /// the amount from [`Self::magazine_space`].
    pub fn reload(&mut self, amount: u32) {
        assert!(
            amount <= self.magazine_space(),
            "attempted to reload {amount} rounds into {} of {} capacity",
            self.ammo,
            self.stats.magazine_capacity
        );
        self.ammo += amount;
    }

    /// Damage for a hit.
    #[must_use]
    pub fn damage_for(&self, headshot: bool) -> f32 {
        if headshot {
            self.stats.headshot_damage
        } else {
            self.stats.damage
        }
    }

    /// Item state.
    #[must_use]
    pub const fn state(&self) -> ItemState {
        self.state
    }

    /// Set item state.
    pub fn set_state(&mut self, state: ItemState) {
        self.state = state;
    }

    /// Inventory slot, if held.
    #[must_use]
    pub const fn slot_index(&self) -> Option<usize> {
        self.slot_index
    }

    pub(crate) fn set_slot_index(&mut self, slot: Option<usize>) {
        self.slot_index = slot;
    }
}
