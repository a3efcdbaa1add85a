//! Fire and reload arbitration.
//!
//! A character is in exactly one [`CombatState`]. Fire and reload requests
//! are only accepted while `Unoccupied`; anything else is rejected with no
//! side effect. Leaving `FireTimerInProgress` and `Reloading` is driven by
//! timers advanced in [`CombatController::tick`].

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ammo::AmmoLedger;
use crate::timers::Timers;
use crate::weapon::Weapon;

/// Combat mode of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CombatState {
    /// Free to fire or reload.
    #[default]
    Unoccupied,
    /// Waiting out the fire-rate cooldown.
    FireTimerInProgress,
    /// Reload in progress.
    Reloading,
}

/// Timer slots owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CombatTimer {
    /// Fire-rate cooldown.
    FireCooldown,
    /// Reload completes if the animation never reports back.
    ReloadComplete,
}

/// Result of a fire request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A round was fired.
    Fired {
        /// Rounds left in the magazine
        ammo_left: u32,
    },
    /// Not unoccupied.
    Busy(CombatState),
    /// Nothing equipped.
    NoWeapon,
    /// Magazine empty.
    Empty,
}

impl FireOutcome {
    /// Check if a round was fired.
    #[must_use]
    pub const fn fired(self) -> bool {
        matches!(self, Self::Fired { .. })
    }
}

/// Result of a reload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Entered `Reloading`.
    Started,
    /// Not unoccupied.
    Busy(CombatState),
    /// Nothing equipped.
    NoWeapon,
    /// No rounds of the weapon's type are carried.
    NoCarriedAmmo,
}

/// Rounds moved by a finished reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadReport {
    /// Rounds loaded into the magazine
    pub loaded: u32,
    /// Rounds of that type still carried
    pub carried_left: u32,
}

/// Something the controller did on its own during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatStep {
    /// Auto-fire shot.
    Fired {
        /// Rounds left in the magazine
        ammo_left: u32,
    },
    /// Auto-reload started on an empty magazine.
    ReloadStarted,
    /// Reload timer ran out and the reload was completed.
    ReloadFinished(ReloadReport),
}

/// Combat state machine for one character.
#[derive(Debug, Clone)]
pub struct CombatController {
    state: CombatState,
    fire_held: bool,
    fire_rate: f32,
    reload_duration: f32,
    timers: Timers<CombatTimer>,
}

impl Default for CombatController {
    fn default() -> Self {
        Self::new(0.1, 1.5)
    }
}

impl CombatController {
    /// Create an unoccupied controller.
    ///
    /// `fire_rate` is the cooldown used when the weapon has no rate of its
    /// own; `reload_duration` bounds how long a reload can take.
    #[must_use]
    pub fn new(fire_rate: f32, reload_duration: f32) -> Self {
        Self {
            state: CombatState::Unoccupied,
            fire_held: false,
            fire_rate: fire_rate.max(0.0),
            reload_duration: reload_duration.max(0.0),
            timers: Timers::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CombatState {
        self.state
    }

    /// Check if the trigger is held.
    #[must_use]
    pub const fn fire_held(&self) -> bool {
        self.fire_held
    }

    /// Seconds until the pending timer of `slot` fires.
    #[must_use]
    pub fn remaining(&self, slot: CombatTimer) -> Option<f32> {
        self.timers.remaining(slot)
    }

    /// Cooldown between shots of `weapon`.
    #[must_use]
    pub fn cooldown_for(&self, weapon: &Weapon) -> f32 {
        let rate = weapon.stats().auto_fire_rate;
        if rate > 0.0 {
            rate
        } else {
            self.fire_rate
        }
    }

    /// Hold the trigger and try to fire.
    pub fn press_fire(&mut self, weapon: Option<&mut Weapon>) -> FireOutcome {
        self.fire_held = true;
        self.fire(weapon)
    }

    /// Release the trigger. Stops auto-fire at the next cooldown expiry.
    pub fn release_fire(&mut self) {
        self.fire_held = false;
    }

    /// Fire one round: consume it and start the cooldown.
    pub fn fire(&mut self, weapon: Option<&mut Weapon>) -> FireOutcome {
        let Some(weapon) = weapon else {
            return FireOutcome::NoWeapon;
        };
        if self.state != CombatState::Unoccupied {
            trace!("Fire rejected in {:?}", self.state);
            return FireOutcome::Busy(self.state);
        }
        if !weapon.has_ammo() {
            return FireOutcome::Empty;
        }

        weapon.decrement_ammo();
        self.state = CombatState::FireTimerInProgress;
        let cooldown = self.cooldown_for(weapon);
        self.timers.set(CombatTimer::FireCooldown, cooldown);
        FireOutcome::Fired {
            ammo_left: weapon.ammo(),
        }
    }

    /// Start a reload if rounds of the weapon's type are carried.
    pub fn reload(&mut self, weapon: Option<&Weapon>, ledger: &AmmoLedger) -> ReloadOutcome {
        if self.state != CombatState::Unoccupied {
            trace!("Reload rejected in {:?}", self.state);
            return ReloadOutcome::Busy(self.state);
        }
        let Some(weapon) = weapon else {
            return ReloadOutcome::NoWeapon;
        };
        if !ledger.has(weapon.ammo_type()) {
            return ReloadOutcome::NoCarriedAmmo;
        }

        self.state = CombatState::Reloading;
        self.timers
            .set(CombatTimer::ReloadComplete, self.reload_duration);
        debug!("Reload started ({} rounds carried)", ledger.count(weapon.ammo_type()));
        ReloadOutcome::Started
    }

    /// Complete a reload: move `min(magazine space, carried)` rounds from the
    /// ledger into the magazine and return to `Unoccupied`.
    ///
    /// Returns `None` when not reloading. With no weapon equipped the state
    /// still returns to `Unoccupied` but nothing is moved.
    pub fn finish_reload(
        &mut self,
        weapon: Option<&mut Weapon>,
        ledger: &mut AmmoLedger,
    ) -> Option<ReloadReport> {
        if self.state != CombatState::Reloading {
            return None;
        }
        self.state = CombatState::Unoccupied;
        self.timers.clear(CombatTimer::ReloadComplete);

        let weapon = weapon?;
        let ammo_type = weapon.ammo_type();
        let loaded = ledger.take(ammo_type, weapon.magazine_space());
        weapon.reload(loaded);
        let report = ReloadReport {
            loaded,
            carried_left: ledger.count(ammo_type),
        };
        debug!(
            "Reload finished: {} loaded, {} carried",
            report.loaded, report.carried_left
        );
        Some(report)
    }

    /// Fire cooldown elapsed: back to `Unoccupied`, then auto-fire if the
    /// trigger is held and there is ammo, or auto-reload on an empty magazine.
    pub fn on_fire_timer(
        &mut self,
        mut weapon: Option<&mut Weapon>,
        ledger: &AmmoLedger,
    ) -> Option<CombatStep> {
        if self.state != CombatState::FireTimerInProgress {
            return None;
        }
        self.state = CombatState::Unoccupied;

        let has_ammo = weapon.as_deref().is_some_and(Weapon::has_ammo);
        if has_ammo {
            if self.fire_held {
                if let FireOutcome::Fired { ammo_left } = self.fire(weapon.as_deref_mut()) {
                    return Some(CombatStep::Fired { ammo_left });
                }
            }
            None
        } else if self.reload(weapon.as_deref(), ledger) == ReloadOutcome::Started {
            Some(CombatStep::ReloadStarted)
        } else {
            None
        }
    }

    /// Advance timers by `dt` seconds and run whatever expired.
    pub fn tick(
        &mut self,
        dt: f32,
        mut weapon: Option<&mut Weapon>,
        ledger: &mut AmmoLedger,
    ) -> Vec<CombatStep> {
        let mut steps = Vec::new();
        for slot in self.timers.advance(dt) {
            let step = match slot {
                CombatTimer::FireCooldown => self.on_fire_timer(weapon.as_deref_mut(), ledger),
                CombatTimer::ReloadComplete => self
                    .finish_reload(weapon.as_deref_mut(), ledger)
                    .map(CombatStep::ReloadFinished),
            };
            steps.extend(step);
        }
        steps
    }

    /// Drop every pending timer and return to `Unoccupied`.
    pub fn reset(&mut self) {
        self.timers.clear_all();
        self.state = CombatState::Unoccupied;
        self.fire_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ammo::AmmoType;
    use crate::weapon::{WeaponKind, WeaponStats};
    use outbreak_common::EntityId;

    fn rifle(ammo: u32) -> Weapon {
        let stats = WeaponStats {
            starting_ammo: ammo,
            magazine_capacity: 30,
            auto_fire_rate: 0.1,
            ..WeaponStats::default()
        };
        Weapon::new(EntityId::from_raw(1), WeaponKind::Ak47, stats)
    }

    fn ledger(carried: u32) -> AmmoLedger {
        AmmoLedger::with_stock([(AmmoType::NineMm, carried)])
    }

    #[test]
    fn test_fire_with_empty_magazine_keeps_state() {
        let mut combat = CombatController::default();
        let mut weapon = rifle(0);

        assert_eq!(combat.fire(Some(&mut weapon)), FireOutcome::Empty);
        assert_eq!(combat.state(), CombatState::Unoccupied);
    }

    #[test]
    fn test_fire_consumes_one_round() {
        let mut combat = CombatController::default();
        let mut weapon = rifle(10);

        assert_eq!(combat.fire(Some(&mut weapon)), FireOutcome::Fired { ammo_left: 9 });
        assert_eq!(combat.state(), CombatState::FireTimerInProgress);
        assert_eq!(weapon.ammo(), 9);
    }

    #[test]
    fn test_requests_rejected_when_busy() {
        let mut combat = CombatController::default();
        let mut weapon = rifle(10);
        let stock = ledger(40);
        combat.fire(Some(&mut weapon));

        assert_eq!(
            combat.fire(Some(&mut weapon)),
            FireOutcome::Busy(CombatState::FireTimerInProgress)
        );
        assert_eq!(
            combat.reload(Some(&weapon), &stock),
            ReloadOutcome::Busy(CombatState::FireTimerInProgress)
        );
        assert_eq!(weapon.ammo(), 9);
    }

    #[test]
    fn test_no_weapon_is_skipped() {
        let mut combat = CombatController::default();
        assert_eq!(combat.fire(None), FireOutcome::NoWeapon);
        assert_eq!(combat.reload(None, &ledger(10)), ReloadOutcome::NoWeapon);
        assert_eq!(combat.state(), CombatState::Unoccupied);
    }

    #[test]
    fn test_cooldown_without_trigger_returns_to_unoccupied() {
        let mut combat = CombatController::default();
        let mut weapon = rifle(10);
        let mut stock = ledger(40);
        combat.fire(Some(&mut weapon));

        let steps = combat.tick(0.1, Some(&mut weapon), &mut stock);
        assert!(steps.is_empty());
        assert_eq!(combat.state(), CombatState::Unoccupied);
    }

    #[test]
    fn test_auto_fire_while_held() {
        let mut combat = CombatController::default();
        let mut weapon = rifle(10);
        let mut stock = ledger(40);
        combat.press_fire(Some(&mut weapon));

        let steps = combat.tick(0.1, Some(&mut weapon), &mut stock);
        assert_eq!(steps, vec![CombatStep::Fired { ammo_left: 8 }]);
        assert_eq!(combat.state(), CombatState::FireTimerInProgress);

        combat.release_fire();
        combat.tick(0.1, Some(&mut weapon), &mut stock);
        assert_eq!(combat.state(), CombatState::Unoccupied);
        assert_eq!(weapon.ammo(), 8);
    }

    #[test]
    fn test_auto_reload_on_empty_magazine() {
        let mut combat = CombatController::default();
        let mut weapon = rifle(1);
        let mut stock = ledger(40);
        combat.press_fire(Some(&mut weapon));

        let steps = combat.tick(0.1, Some(&mut weapon), &mut stock);
        assert_eq!(steps, vec![CombatStep::ReloadStarted]);
        assert_eq!(combat.state(), CombatState::Reloading);
    }

    #[test]
    fn test_empty_magazine_and_no_carried_ammo_stays_unoccupied() {
        let mut combat = CombatController::default();
        let mut weapon = rifle(1);
        let mut stock = ledger(0);
        combat.press_fire(Some(&mut weapon));

        assert!(combat.tick(0.1, Some(&mut weapon), &mut stock).is_empty());
        assert_eq!(combat.state(), CombatState::Unoccupied);
    }

    #[test]
    fn test_reload_fills_magazine() {
        let mut combat = CombatController::default();
        let mut weapon = rifle(10);
        let mut stock = ledger(40);

        assert_eq!(combat.reload(Some(&weapon), &stock), ReloadOutcome::Started);
        assert_eq!(
            combat.fire(Some(&mut weapon)),
            FireOutcome::Busy(CombatState::Reloading)
        );
        let report = combat.finish_reload(Some(&mut weapon), &mut stock);

        assert_eq!(
            report,
            Some(ReloadReport {
                loaded: 20,
                carried_left: 20
            })
        );
        assert_eq!(weapon.ammo(), 30);
        assert_eq!(stock.count(AmmoType::NineMm), 20);
        assert_eq!(combat.state(), CombatState::Unoccupied);
    }

    #[test]
    fn test_reload_with_short_stock() {
        let mut combat = CombatController::default();
        let mut weapon = rifle(10);
        let mut stock = ledger(5);

        combat.reload(Some(&weapon), &stock);
        combat.finish_reload(Some(&mut weapon), &mut stock);

        assert_eq!(weapon.ammo(), 15);
        assert_eq!(stock.count(AmmoType::NineMm), 0);
    }

    #[test]
    fn test_reload_without_carried_ammo_rejected() {
        let mut combat = CombatController::default();
        let weapon = rifle(10);
        assert_eq!(
            combat.reload(Some(&weapon), &ledger(0)),
            ReloadOutcome::NoCarriedAmmo
        );
        assert_eq!(combat.state(), CombatState::Unoccupied);
    }

    #[test]
    fn test_reload_timer_completes_once() {
        let mut combat = CombatController::new(0.1, 1.0);
        let mut weapon = rifle(0);
        let mut stock = ledger(40);
        combat.reload(Some(&weapon), &stock);

        assert!(combat.tick(0.5, Some(&mut weapon), &mut stock).is_empty());
        let steps = combat.tick(0.5, Some(&mut weapon), &mut stock);
        assert_eq!(
            steps,
            vec![CombatStep::ReloadFinished(ReloadReport {
                loaded: 30,
                carried_left: 10
            })]
        );

        // An explicit completion after the timer is a no-op.
        assert_eq!(combat.finish_reload(Some(&mut weapon), &mut stock), None);
        assert_eq!(stock.count(AmmoType::NineMm), 10);
    }

    #[test]
    fn test_explicit_completion_cancels_timer() {
        let mut combat = CombatController::new(0.1, 1.0);
        let mut weapon = rifle(0);
        let mut stock = ledger(40);
        combat.reload(Some(&weapon), &stock);
        combat.finish_reload(Some(&mut weapon), &mut stock);

        assert_eq!(combat.remaining(CombatTimer::ReloadComplete), None);
        assert!(combat.tick(2.0, Some(&mut weapon), &mut stock).is_empty());
    }
}
