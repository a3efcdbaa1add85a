//! The player character.
//!
//! Composes the ammo ledger, weapon inventory, combat state machine and
//! health pool. Inputs arrive as method calls; shots are queued for the world
//! to resolve via [`Survivor::take_shots`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use outbreak_common::EntityId;

use crate::ammo::{AmmoLedger, AmmoPickup};
use crate::animation::{AnimationSink, Montage, MontageRequest};
use crate::combat_state::{
    CombatController, CombatState, CombatStep, FireOutcome, ReloadOutcome, ReloadReport,
};
use crate::config::SurvivorConfig;
use crate::events::{CombatEvent, EventSender};
use crate::health::{DamageResult, Health};
use crate::inventory::{PickupOutcome, WeaponInventory};
use crate::weapon::Weapon;
use crate::weapon_table::{WeaponTable, WeaponTableResult};

/// A round on its way. The world decides what it hits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Shooting character
    pub shooter: EntityId,
    /// Weapon fired
    pub weapon: EntityId,
    /// Muzzle position
    pub origin: Vec3,
    /// Damage on a body hit
    pub damage: f32,
    /// Damage on a headshot
    pub headshot_damage: f32,
}

/// Slot hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKey {
    /// F key
    F,
    /// 1 key
    One,
    /// 2 key
    Two,
    /// 3 key
    Three,
    /// 4 key
    Four,
    /// 5 key
    Five,
}

impl SlotKey {
    /// Inventory slot the key selects.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::F => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
        }
    }

    /// Key that selects `slot`.
    #[must_use]
    pub const fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Self::F),
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            5 => Some(Self::Five),
            _ => None,
        }
    }
}

/// The player character.
#[derive(Debug)]
pub struct Survivor {
    id: EntityId,
    config: SurvivorConfig,
    position: Vec3,
    ledger: AmmoLedger,
    inventory: WeaponInventory,
    combat: CombatController,
    health: Health,
    input_enabled: bool,
    shots: Vec<Shot>,
    events: EventSender,
}

impl Survivor {
    /// Create a survivor holding `default_weapon` (equipped in slot 0) and
    /// the configured starting ammo.
    #[must_use]
    pub fn new(
        id: EntityId,
        config: SurvivorConfig,
        default_weapon: Option<Weapon>,
        events: EventSender,
    ) -> Self {
        let mut inventory = WeaponInventory::new();
        if let Some(weapon) = default_weapon {
            let weapon_id = weapon.id();
            if let Ok(slot) = inventory.equip_default(weapon) {
                events.emit(CombatEvent::WeaponEquipped {
                    character: id,
                    weapon: weapon_id,
                    slot,
                    socket: config.hand_socket.clone(),
                });
            }
        }

        Self {
            id,
            ledger: AmmoLedger::with_stock(config.starting_ammo()),
            combat: CombatController::new(config.fire_rate, config.reload_duration),
            health: Health::new(config.max_health),
            config,
            position: Vec3::ZERO,
            inventory,
            input_enabled: true,
            shots: Vec::new(),
            events,
        }
    }

    /// Create a survivor whose default weapon comes from `table`.
    pub fn spawn(
        id: EntityId,
        config: SurvivorConfig,
        table: &WeaponTable,
        events: EventSender,
    ) -> WeaponTableResult<Self> {
        let default_weapon = config
            .default_weapon
            .map(|kind| table.spawn(kind))
            .transpose()?;
        Ok(Self::new(id, config, default_weapon, events))
    }

    /// Entity ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Parameters.
    #[must_use]
    pub const fn config(&self) -> &SurvivorConfig {
        &self.config
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Move to a world position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Carried ammo.
    #[must_use]
    pub const fn ledger(&self) -> &AmmoLedger {
        &self.ledger
    }

    /// Weapons.
    #[must_use]
    pub const fn inventory(&self) -> &WeaponInventory {
        &self.inventory
    }

    /// Equipped weapon.
    #[must_use]
    pub fn equipped(&self) -> Option<&Weapon> {
        self.inventory.equipped()
    }

    /// Combat state.
    #[must_use]
    pub const fn combat_state(&self) -> CombatState {
        self.combat.state()
    }

    /// Health pool.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Check if dead.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Check if inputs are accepted.
    #[must_use]
    pub const fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Fire button pressed.
    pub fn fire_pressed(&mut self, anim: &mut dyn AnimationSink) -> FireOutcome {
        if !self.input_enabled {
            return FireOutcome::Busy(self.combat.state());
        }
        let outcome = self.combat.press_fire(self.inventory.equipped_mut());
        if let FireOutcome::Fired { ammo_left } = outcome {
            self.on_fired(ammo_left, anim);
        }
        outcome
    }

    /// Fire button released.
    pub fn fire_released(&mut self) {
        self.combat.release_fire();
    }

    /// Reload button pressed.
    pub fn reload_pressed(&mut self, anim: &mut dyn AnimationSink) -> ReloadOutcome {
        if !self.input_enabled {
            return ReloadOutcome::Busy(self.combat.state());
        }
        self.start_reload(anim)
    }

    fn start_reload(&mut self, anim: &mut dyn AnimationSink) -> ReloadOutcome {
        let outcome = self.combat.reload(self.inventory.equipped(), &self.ledger);
        if outcome == ReloadOutcome::Started {
            self.on_reload_started(anim);
        }
        outcome
    }

    /// Reload montage finished. Completes the reload early if it is still
    /// running.
    pub fn finish_reloading(&mut self) -> Option<ReloadReport> {
        let report = self
            .combat
            .finish_reload(self.inventory.equipped_mut(), &mut self.ledger)?;
        self.on_reload_finished(report);
        Some(report)
    }

    /// Slot hotkey pressed.
    pub fn slot_key_pressed(&mut self, key: SlotKey) -> bool {
        self.select_slot(key.slot())
    }

    /// Equip the weapon in `slot`. Works in any combat state; a reload in
    /// progress fills whichever weapon is equipped when it completes.
    pub fn select_slot(&mut self, slot: usize) -> bool {
        if !self.input_enabled {
            return false;
        }
        if !self.inventory.select_slot(slot) {
            return false;
        }
        if let Some(weapon) = self.inventory.equipped() {
            debug!("Equipped {} from slot {}", weapon.stats().name, slot);
            self.events.emit(CombatEvent::WeaponEquipped {
                character: self.id,
                weapon: weapon.id(),
                slot,
                socket: self.config.hand_socket.clone(),
            });
        }
        true
    }

    /// Pick up a weapon. Returns whatever ends up back in the world: the
    /// dropped weapon after a swap, or the picked-up weapon if it could not
    /// be taken.
    pub fn pickup_weapon(&mut self, weapon: Weapon) -> Option<Weapon> {
        if !self.input_enabled {
            return Some(weapon);
        }
        let weapon_id = weapon.id();
        match self.inventory.pickup(weapon) {
            PickupOutcome::Stored { slot } => {
                self.events.emit(CombatEvent::WeaponStored {
                    character: self.id,
                    weapon: weapon_id,
                    slot,
                });
                None
            },
            PickupOutcome::Swapped { slot, dropped } => {
                self.events.emit(CombatEvent::WeaponDropped {
                    character: self.id,
                    weapon: dropped.id(),
                });
                self.events.emit(CombatEvent::WeaponEquipped {
                    character: self.id,
                    weapon: weapon_id,
                    slot,
                    socket: self.config.hand_socket.clone(),
                });
                Some(dropped)
            },
            PickupOutcome::Rejected(weapon) => Some(weapon),
        }
    }

    /// Pick up an ammo box. Reloads if the equipped weapon takes this ammo
    /// and its magazine is empty.
    pub fn pickup_ammo(&mut self, pickup: AmmoPickup, anim: &mut dyn AnimationSink) {
        if !self.input_enabled {
            return;
        }
        self.ledger.add(pickup.ammo_type, pickup.count);
        self.events.emit(CombatEvent::AmmoPickedUp {
            character: self.id,
            ammo_type: pickup.ammo_type,
            count: pickup.count,
        });

        let needs_reload = self
            .inventory
            .equipped()
            .is_some_and(|w| w.ammo_type() == pickup.ammo_type && w.ammo() == 0);
        if needs_reload {
            self.start_reload(anim);
        }
    }

    /// Apply damage. Killing damage plays the death montage and releases
    /// the trigger.
    pub fn take_damage(
        &mut self,
        amount: f32,
        source: Option<EntityId>,
        anim: &mut dyn AnimationSink,
    ) -> DamageResult {
        let was_dead = self.health.is_dead();
        let result = self.health.apply_damage(amount);
        if was_dead {
            return result;
        }

        self.events.emit(CombatEvent::Damaged {
            target: self.id,
            amount: result.applied,
            source,
            remaining: self.health.current(),
        });
        if result.killed {
            self.combat.release_fire();
            anim.play_montage(
                MontageRequest::new(self.id, Montage::SurvivorDeath)
                    .with_section(self.config.death_section.as_str()),
            );
            info!("Survivor {} died", self.id);
            self.events.emit(CombatEvent::Died {
                entity: self.id,
                killer: source,
            });
        }
        result
    }

    /// Death montage finished: stop accepting input.
    pub fn finish_death(&mut self) {
        if self.health.is_dead() {
            self.input_enabled = false;
            self.combat.reset();
        }
    }

    /// Advance timers by `dt` seconds (auto-fire, auto-reload, reload
    /// completion).
    pub fn tick(&mut self, dt: f32, anim: &mut dyn AnimationSink) {
        let steps = self
            .combat
            .tick(dt, self.inventory.equipped_mut(), &mut self.ledger);
        for step in steps {
            match step {
                CombatStep::Fired { ammo_left } => self.on_fired(ammo_left, anim),
                CombatStep::ReloadStarted => self.on_reload_started(anim),
                CombatStep::ReloadFinished(report) => self.on_reload_finished(report),
            }
        }
    }

    /// Take the shots fired since the last call.
    pub fn take_shots(&mut self) -> Vec<Shot> {
        std::mem::take(&mut self.shots)
    }

    fn on_fired(&mut self, ammo_left: u32, anim: &mut dyn AnimationSink) {
        let Some(weapon) = self.inventory.equipped() else {
            return;
        };
        anim.play_montage(
            MontageRequest::new(self.id, Montage::HipFire)
                .with_section(self.config.fire_section.as_str()),
        );
        self.shots.push(Shot {
            shooter: self.id,
            weapon: weapon.id(),
            origin: self.position,
            damage: weapon.damage_for(false),
            headshot_damage: weapon.damage_for(true),
        });
        self.events.emit(CombatEvent::ShotFired {
            shooter: self.id,
            weapon: weapon.id(),
            ammo_left,
        });
    }

    fn on_reload_started(&mut self, anim: &mut dyn AnimationSink) {
        let Some(weapon) = self.inventory.equipped() else {
            return;
        };
        anim.play_montage(
            MontageRequest::new(self.id, Montage::Reload)
                .with_section(weapon.stats().reload_montage_section.as_str()),
        );
        self.events.emit(CombatEvent::ReloadStarted {
            character: self.id,
            weapon: weapon.id(),
        });
    }

    fn on_reload_finished(&mut self, report: ReloadReport) {
        if let Some(weapon) = self.inventory.equipped() {
            self.events.emit(CombatEvent::ReloadFinished {
                character: self.id,
                weapon: weapon.id(),
                loaded: report.loaded,
                carried_left: report.carried_left,
            });
        }
    }
}
