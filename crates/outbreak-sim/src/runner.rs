//! Fixed-timestep encounter loop with a scripted survivor.

use glam::Vec3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::f32::consts::TAU;
use std::fmt;
use tracing::{debug, info, trace};

use outbreak_combat::{
    AmmoPickup, AmmoType, AnimationSink, CombatEvent, CombatState, Encounter, GroundItem,
    MontageRequest, ReloadOutcome, SlotKey, WeaponKind, WeaponTable,
};
use outbreak_common::{EntityId, OutbreakResult};

use crate::config::SimConfig;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Every enemy went down
    Cleared,
    /// The survivor died
    SurvivorDied,
    /// Duration ran out
    TimeUp,
}

/// Totals for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimSummary {
    /// Seed used
    pub seed: u64,
    /// How it ended
    pub outcome: Outcome,
    /// Seconds simulated
    pub elapsed: f32,
    /// Steps taken
    pub steps: u64,
    /// Rounds fired by the survivor
    pub shots_fired: u32,
    /// Rounds that damaged an enemy
    pub enemy_hits: u32,
    /// Damage dealt to enemies
    pub damage_dealt: f32,
    /// Stuns caused
    pub stuns: u32,
    /// Reloads completed
    pub reloads: u32,
    /// Weapons and ammo boxes picked up
    pub pickups: u32,
    /// Enemies spawned
    pub enemies_spawned: u32,
    /// Enemies killed
    pub enemies_killed: u32,
    /// Melee swings started by enemies
    pub enemy_attacks: u32,
    /// Damage taken by the survivor
    pub damage_taken: f32,
    /// Survivor health at the end
    pub survivor_health: f32,
    /// Rounds carried at the end, by ammo label
    pub carried_ammo: BTreeMap<String, u32>,
}

impl SimSummary {
    fn new(seed: u64, enemies_spawned: u32) -> Self {
        Self {
            seed,
            outcome: Outcome::TimeUp,
            elapsed: 0.0,
            steps: 0,
            shots_fired: 0,
            enemy_hits: 0,
            damage_dealt: 0.0,
            stuns: 0,
            reloads: 0,
            pickups: 0,
            enemies_spawned,
            enemies_killed: 0,
            enemy_attacks: 0,
            damage_taken: 0.0,
            survivor_health: 0.0,
            carried_ammo: BTreeMap::new(),
        }
    }

    /// Fold one event into the totals.
    pub fn record(&mut self, event: &CombatEvent, survivor: EntityId) {
        match event {
            CombatEvent::ShotFired { shooter, .. } if *shooter == survivor => {
                self.shots_fired += 1;
            },
            CombatEvent::Damaged { target, amount, .. } => {
                if *target == survivor {
                    self.damage_taken += amount;
                } else {
                    self.enemy_hits += 1;
                    self.damage_dealt += amount;
                }
            },
            CombatEvent::Died { entity, .. } if *entity != survivor => {
                self.enemies_killed += 1;
            },
            CombatEvent::StunChanged { stunned: true, .. } => self.stuns += 1,
            CombatEvent::ReloadFinished { .. } => self.reloads += 1,
            CombatEvent::EnemyAttacked { .. } => self.enemy_attacks += 1,
            CombatEvent::WeaponStored { .. } | CombatEvent::AmmoPickedUp { .. } => {
                self.pickups += 1;
            },
            _ => {},
        }
    }
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Outcome: {:?} after {:.1}s ({} steps, seed {})",
            self.outcome, self.elapsed, self.steps, self.seed
        )?;
        writeln!(
            f,
            "Enemies: {}/{} killed, {} attacks, {} stuns",
            self.enemies_killed, self.enemies_spawned, self.enemy_attacks, self.stuns
        )?;
        writeln!(
            f,
            "Shots: {} fired, {} hits, {:.0} damage dealt, {} reloads",
            self.shots_fired, self.enemy_hits, self.damage_dealt, self.reloads
        )?;
        write!(
            f,
            "Survivor: {:.0} health, {:.0} damage taken, {} pickups",
            self.survivor_health, self.damage_taken, self.pickups
        )?;
        for (label, count) in &self.carried_ammo {
            write!(f, "\n  {label}: {count} rounds carried")?;
        }
        Ok(())
    }
}

/// Logs montage requests at trace level.
#[derive(Debug, Clone, Copy, Default)]
struct TracedAnimation;

impl AnimationSink for TracedAnimation {
    fn play_montage(&mut self, request: MontageRequest) {
        trace!(
            "{} plays {:?} section {:?} at {:.2}",
            request.actor,
            request.montage,
            request.section,
            request.rate
        );
    }
}

/// Place enemies evenly on a ring around the survivor.
fn spawn_ring(encounter: &mut Encounter, config: &SimConfig) {
    let count = config.run.enemy_count;
    for index in 0..count {
        let angle = TAU * index as f32 / count as f32;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * config.run.spawn_distance;
        encounter.spawn_enemy(config.enemy.clone(), position);
    }
}

/// Scripted survivor input for one step: pick up what is in reach, reload
/// or switch weapons on an empty magazine, and hold the trigger while a
/// living enemy is within weapon range.
fn drive_survivor(encounter: &mut Encounter) {
    if !encounter.survivor().input_enabled() {
        return;
    }
    if !encounter.survivor().inventory().is_full() && encounter.interact() {
        return;
    }

    let survivor = encounter.survivor();
    let origin = survivor.position();
    let range = encounter.config().weapon_range;
    let target_in_range = encounter
        .enemies()
        .iter()
        .any(|e| !e.is_dying() && e.position().distance(origin) <= range);
    let unoccupied = survivor.combat_state() == CombatState::Unoccupied;
    let magazine_empty = survivor.equipped().map_or(true, |w| !w.has_ammo());

    if !target_in_range {
        encounter.release_fire();
        return;
    }
    if !unoccupied {
        return;
    }
    if magazine_empty {
        if encounter.press_reload() != ReloadOutcome::Started {
            switch_to_loaded_slot(encounter);
        }
        return;
    }
    encounter.press_fire();
}

fn switch_to_loaded_slot(encounter: &mut Encounter) {
    let survivor = encounter.survivor();
    let equipped = survivor.inventory().equipped_index();
    let ledger = survivor.ledger();
    let candidate = survivor
        .inventory()
        .iter()
        .enumerate()
        .find(|(slot, w)| Some(*slot) != equipped && (w.has_ammo() || ledger.has(w.ammo_type())))
        .map(|(slot, _)| slot);

    if let Some(key) = candidate.and_then(SlotKey::from_slot) {
        debug!("Switching to slot {}", key.slot());
        encounter.press_slot(key);
    }
}

/// Run one encounter to completion.
pub fn run(config: &SimConfig, table: &WeaponTable) -> OutbreakResult<SimSummary> {
    let seed = config.run.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut encounter = Encounter::new(config.encounter.clone(), config.survivor.clone(), table)?
        .with_rng(fastrand::Rng::with_seed(seed))
        .with_animation(TracedAnimation);

    if config.run.ammo_drop > 0 {
        encounter.place_item(
            GroundItem::Ammo(AmmoPickup::new(AmmoType::NineMm, config.run.ammo_drop)),
            Vec3::X,
        );
    }
    if config.run.spare_rifle {
        encounter.place_item(GroundItem::Weapon(table.spawn(WeaponKind::AssaultRifle)?), Vec3::Z);
    }
    spawn_ring(&mut encounter, config);
    info!(
        "Running {} enemies for up to {:.0}s (seed {seed})",
        config.run.enemy_count, config.run.duration
    );

    let survivor_id = encounter.survivor().id();
    let mut summary = SimSummary::new(seed, config.run.enemy_count);
    let dt = config.run.time_step;

    while encounter.elapsed() < config.run.duration {
        drive_survivor(&mut encounter);
        encounter.step(dt);
        summary.steps += 1;
        for event in encounter.drain_events() {
            summary.record(&event, survivor_id);
        }

        if encounter.survivor().is_dead() {
            summary.outcome = Outcome::SurvivorDied;
            break;
        }
        if encounter.enemies().iter().all(|e| e.is_dying()) {
            summary.outcome = Outcome::Cleared;
            break;
        }
    }

    summary.elapsed = encounter.elapsed();
    summary.survivor_health = encounter.survivor().health().current();
    summary.carried_ammo = encounter
        .survivor()
        .ledger()
        .iter()
        .map(|(ammo_type, count)| (ammo_type.label().to_string(), count))
        .collect();
    info!("Encounter finished: {:?}", summary.outcome);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enemies: u32, seed: u64) -> SimConfig {
        let mut config = SimConfig::default();
        config.run.enemy_count = enemies;
        config.run.seed = Some(seed);
        config.run.time_step = 0.05;
        config
    }

    #[test]
    fn test_same_seed_same_summary() {
        let table = WeaponTable::builtin();
        let first = run(&config(3, 11), &table).expect("run");
        let second = run(&config(3, 11), &table).expect("run");
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_enemies_clears_immediately() {
        let summary = run(&config(0, 1), &WeaponTable::builtin()).expect("run");
        assert_eq!(summary.outcome, Outcome::Cleared);
        assert_eq!(summary.steps, 1);
    }

    #[test]
    fn test_survivor_picks_up_nearby_items() {
        let summary = run(&config(1, 5), &WeaponTable::builtin()).expect("run");
        assert_eq!(summary.pickups, 2);
        assert_eq!(summary.enemies_spawned, 1);
    }

    #[test]
    fn test_unarmed_survivor_dies() {
        let mut config = config(2, 9);
        config.survivor.default_weapon = None;
        config.run.spare_rifle = false;
        config.run.duration = 120.0;

        let summary = run(&config, &WeaponTable::builtin()).expect("run");
        assert_eq!(summary.outcome, Outcome::SurvivorDied);
        assert_eq!(summary.shots_fired, 0);
        assert!(summary.damage_taken >= 100.0);
    }

    #[test]
    fn test_record_counts_events() {
        let survivor = EntityId::from_raw(1);
        let zombie = EntityId::from_raw(2);
        let mut summary = SimSummary::new(0, 1);

        summary.record(
            &CombatEvent::Damaged {
                target: zombie,
                amount: 20.0,
                source: Some(survivor),
                remaining: 80.0,
            },
            survivor,
        );
        summary.record(
            &CombatEvent::Died {
                entity: zombie,
                killer: Some(survivor),
            },
            survivor,
        );
        summary.record(
            &CombatEvent::Died {
                entity: survivor,
                killer: Some(zombie),
            },
            survivor,
        );

        assert_eq!(summary.enemy_hits, 1);
        assert_eq!(summary.damage_dealt, 20.0);
        assert_eq!(summary.enemies_killed, 1);
    }
}
