//! End-to-end tests for the combat core.
//!
//! These drive a survivor and enemies through whole fights, the way the
//! simulator does, and check the outcomes a player would notice.

#![cfg(test)]

use glam::Vec3;
use outbreak_common::EntityId;

use crate::prelude::*;

fn survivor_with(config: SurvivorConfig, bus: &EventBus) -> Survivor {
    Survivor::spawn(
        EntityId::new(),
        config,
        &WeaponTable::builtin(),
        bus.sender(),
    )
    .expect("builtin table has every row")
}

/// Firing, auto-fire and reloading through the survivor
mod firing_tests {
    use super::*;

    #[test]
    fn e2e_full_magazine_then_auto_reload_then_fire_again() {
        let bus = EventBus::new(256);
        let mut survivor = survivor_with(SurvivorConfig::default(), &bus);
        let mut anim = RecordedAnimation::new();

        // Hold the trigger for six seconds
        survivor.fire_pressed(&mut anim);
        for _ in 0..60 {
            survivor.tick(0.1, &mut anim);
        }
        survivor.fire_released();

        let shots = survivor.take_shots();
        assert_eq!(shots.len(), 30, "A full AK47 magazine holds 30 rounds");

        // The reload timer completed the reload while the trigger was held
        let equipped = survivor.equipped().expect("weapon");
        assert_eq!(equipped.ammo(), 30, "Auto-reload should refill the magazine");
        assert_eq!(survivor.ledger().count(AmmoType::NineMm), 55);
        assert_eq!(survivor.combat_state(), CombatState::Unoccupied);

        let finished = bus
            .drain()
            .into_iter()
            .filter(|e| matches!(e, CombatEvent::ReloadFinished { loaded: 30, .. }))
            .count();
        assert_eq!(finished, 1);

        assert!(survivor.fire_pressed(&mut anim).fired());
    }

    #[test]
    fn e2e_reload_rejected_mid_cooldown_is_not_queued() {
        let bus = EventBus::new(64);
        let mut survivor = survivor_with(SurvivorConfig::default(), &bus);
        let mut anim = RecordedAnimation::new();

        survivor.fire_pressed(&mut anim);
        survivor.fire_released();
        assert_eq!(
            survivor.reload_pressed(&mut anim),
            ReloadOutcome::Busy(CombatState::FireTimerInProgress)
        );

        survivor.tick(0.1, &mut anim);
        assert_eq!(
            survivor.combat_state(),
            CombatState::Unoccupied,
            "A rejected reload must not start once the cooldown ends"
        );
        assert_eq!(anim.of(Montage::Reload).count(), 0);
    }

    #[test]
    fn e2e_montage_completion_beats_reload_timer() {
        let bus = EventBus::new(64);
        let mut survivor = survivor_with(SurvivorConfig::default(), &bus);
        let mut anim = RecordedAnimation::new();

        for _ in 0..10 {
            survivor.fire_pressed(&mut anim);
            survivor.fire_released();
            survivor.tick(0.1, &mut anim);
        }
        assert_eq!(survivor.reload_pressed(&mut anim), ReloadOutcome::Started);

        let report = survivor.finish_reloading().expect("reloading");
        assert_eq!(report.loaded, 10);
        assert_eq!(report.carried_left, 75);

        // The timer that would have completed it is gone
        survivor.tick(5.0, &mut anim);
        assert_eq!(survivor.ledger().count(AmmoType::NineMm), 75);
    }

    #[test]
    fn e2e_switching_weapons_changes_ammo_pool() {
        let bus = EventBus::new(64);
        let mut survivor = survivor_with(SurvivorConfig::default(), &bus);
        let mut anim = RecordedAnimation::new();
        let rifle = WeaponTable::builtin()
            .spawn(WeaponKind::AssaultRifle)
            .expect("row");

        assert!(survivor.pickup_weapon(rifle).is_none());
        assert!(survivor.slot_key_pressed(SlotKey::One));

        for _ in 0..5 {
            survivor.fire_pressed(&mut anim);
            survivor.fire_released();
            survivor.tick(0.12, &mut anim);
        }
        assert_eq!(survivor.reload_pressed(&mut anim), ReloadOutcome::Started);
        survivor.finish_reloading();

        assert_eq!(survivor.ledger().count(AmmoType::AssaultRifle), 115);
        assert_eq!(survivor.ledger().count(AmmoType::NineMm), 85);
        let reload: Vec<_> = anim.of(Montage::Reload).collect();
        assert_eq!(reload[0].section.as_deref(), Some("Reload AR"));
    }
}

/// Whole encounters
mod encounter_tests {
    use super::*;

    #[test]
    fn e2e_survivor_clears_a_horde() {
        let config = EncounterConfig {
            accuracy: 1.0,
            headshot_chance: 0.0,
            ..EncounterConfig::default()
        };
        let mut encounter = Encounter::new(config, SurvivorConfig::default(), &WeaponTable::builtin())
            .expect("builtin table")
            .with_rng(fastrand::Rng::with_seed(7));

        for x in [12.0, 13.0, 14.0] {
            encounter.spawn_enemy(EnemyConfig::default(), Vec3::new(x, 0.0, 0.0));
        }

        encounter.press_fire();
        let mut steps = 0;
        while !encounter.is_over() && steps < 2_000 {
            encounter.step(0.05);
            steps += 1;
        }

        assert!(encounter.enemies().is_empty(), "Every zombie should be dead and despawned");
        assert!(!encounter.survivor().is_dead());

        let deaths = encounter
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, CombatEvent::Died { .. }))
            .count();
        assert_eq!(deaths, 3);
    }

    #[test]
    fn e2e_unarmed_survivor_is_overrun() {
        let survivor_config = SurvivorConfig {
            default_weapon: None,
            ..SurvivorConfig::default()
        };
        let mut encounter =
            Encounter::new(EncounterConfig::default(), survivor_config, &WeaponTable::builtin())
                .expect("builtin table")
                .with_rng(fastrand::Rng::with_seed(3));
        let zombie = encounter.spawn_enemy(EnemyConfig::default(), Vec3::new(8.0, 0.0, 0.0));

        assert_eq!(encounter.press_fire(), FireOutcome::NoWeapon);
        for _ in 0..400 {
            encounter.step(0.05);
        }

        assert!(encounter.survivor().is_dead());
        assert!(!encounter.survivor().input_enabled());
        let enemy = encounter.enemy(zombie).expect("zombie survives");
        assert!(enemy.blackboard().target_dead());
        assert_eq!(enemy.health().current(), 100.0);
    }
}
