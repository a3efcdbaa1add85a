//! Fixed-capacity weapon inventory.
//!
//! Slot `i` always holds a weapon whose slot index is `i`. At most one slot
//! is equipped (attached to the hand socket); the rest are held.

use serde::{Deserialize, Serialize};

use crate::weapon::{ItemState, Weapon};

/// Number of inventory slots.
pub const INVENTORY_CAPACITY: usize = 6;

/// What happened to a picked-up weapon.
#[derive(Debug, Clone, PartialEq)]
pub enum PickupOutcome {
    /// Stored in a free slot.
    Stored {
        /// Slot index
        slot: usize,
    },
    /// Inventory was full; replaced the equipped weapon, which was dropped.
    Swapped {
        /// Slot the new weapon took
        slot: usize,
        /// Weapon now falling into the world
        dropped: Weapon,
    },
    /// Inventory was full and nothing was equipped. The weapon is handed back.
    Rejected(Weapon),
}

/// A character's weapons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponInventory {
    slots: Vec<Weapon>,
    equipped: Option<usize>,
}

impl WeaponInventory {
    /// Empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(INVENTORY_CAPACITY),
            equipped: None,
        }
    }

    /// Store and equip the spawn weapon. Returns the weapon back if full.
    pub fn equip_default(&mut self, mut weapon: Weapon) -> Result<usize, Weapon> {
        if self.is_full() {
            return Err(weapon);
        }
        let slot = self.slots.len();
        weapon.set_slot_index(Some(slot));
        self.slots.push(weapon);
        if let Some(current) = self.equipped {
            self.slots[current].set_state(ItemState::PickedUp);
        }
        self.equip_slot(slot);
        Ok(slot)
    }

    /// Pick up a weapon: store it if there is room, otherwise swap it with
    /// the equipped one.
    pub fn pickup(&mut self, mut weapon: Weapon) -> PickupOutcome {
        if self.is_full() {
            return self.swap(weapon);
        }
        let slot = self.slots.len();
        weapon.set_slot_index(Some(slot));
        weapon.set_state(ItemState::PickedUp);
        self.slots.push(weapon);
        PickupOutcome::Stored { slot }
    }

    /// Replace the equipped weapon with `weapon`. The old one is detached,
    /// loses its slot and starts falling; the new one takes its slot and is
    /// equipped.
    pub fn swap(&mut self, mut weapon: Weapon) -> PickupOutcome {
        let Some(slot) = self.equipped else {
            return PickupOutcome::Rejected(weapon);
        };
        weapon.set_slot_index(Some(slot));
        weapon.set_state(ItemState::Equipped);
        let mut dropped = std::mem::replace(&mut self.slots[slot], weapon);
        dropped.set_slot_index(None);
        dropped.set_state(ItemState::Falling);
        PickupOutcome::Swapped { slot, dropped }
    }

    /// Unequip the weapon in `current` and equip the one in `new`.
    ///
    /// No-op (returns false) when the indices are equal or `new` is out of
    /// bounds. Whatever slot is actually equipped is unequipped too, so at
    /// most one weapon is ever equipped.
    pub fn exchange(&mut self, current: usize, new: usize) -> bool {
        if current == new || new >= self.slots.len() {
            return false;
        }
        for slot in [Some(current), self.equipped].into_iter().flatten() {
            if let Some(old) = self.slots.get_mut(slot) {
                if old.state() == ItemState::Equipped {
                    old.set_state(ItemState::PickedUp);
                }
            }
        }
        self.equip_slot(new);
        true
    }

    /// Hotkey selection: exchange from the equipped slot to `index`.
    pub fn select_slot(&mut self, index: usize) -> bool {
        match self.equipped {
            Some(current) => self.exchange(current, index),
            None if index < self.slots.len() => {
                self.equip_slot(index);
                true
            },
            None => false,
        }
    }

    fn equip_slot(&mut self, slot: usize) {
        self.slots[slot].set_state(ItemState::Equipped);
        self.equipped = Some(slot);
    }

    /// Equipped slot index.
    #[must_use]
    pub const fn equipped_index(&self) -> Option<usize> {
        self.equipped
    }

    /// Equipped weapon.
    #[must_use]
    pub fn equipped(&self) -> Option<&Weapon> {
        self.equipped.and_then(|slot| self.slots.get(slot))
    }

    /// Equipped weapon, mutably.
    pub fn equipped_mut(&mut self) -> Option<&mut Weapon> {
        self.equipped.and_then(|slot| self.slots.get_mut(slot))
    }

    /// Weapon in a slot.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Weapon> {
        self.slots.get(slot)
    }

    /// Occupied slot count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check if every slot is taken.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= INVENTORY_CAPACITY
    }

    /// Weapons in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Weapon> {
        self.slots.iter()
    }
}
