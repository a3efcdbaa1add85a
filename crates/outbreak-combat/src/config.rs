//! Designer-tunable parameters.
//!
//! Every struct deserializes with `#[serde(default)]`, so a config file only
//! needs the values it changes. Call `validate` after loading to clamp values
//! into sensible ranges.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ammo::AmmoType;
use crate::weapon::WeaponKind;

/// Survivor (player character) parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivorConfig {
    /// Maximum health
    pub max_health: f32,
    /// Seconds between shots when the weapon row has no rate of its own
    pub fire_rate: f32,
    /// Seconds a reload takes if the animation never reports completion
    pub reload_duration: f32,
    /// Carried 9mm rounds at spawn
    pub starting_9mm_ammo: u32,
    /// Carried AR rounds at spawn
    pub starting_ar_ammo: u32,
    /// Weapon equipped at spawn
    pub default_weapon: Option<WeaponKind>,
    /// Hand socket weapons attach to
    pub hand_socket: String,
    /// Hip-fire montage section
    pub fire_section: String,
    /// Death montage section
    pub death_section: String,
}

impl Default for SurvivorConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            fire_rate: 0.1,
            reload_duration: 1.5,
            starting_9mm_ammo: 85,
            starting_ar_ammo: 120,
            default_weapon: Some(WeaponKind::Ak47),
            hand_socket: "RightHandSocket".to_string(),
            fire_section: "StartFire".to_string(),
            death_section: "DeathA".to_string(),
        }
    }
}

impl SurvivorConfig {
    /// Starting stock for the ammo ledger.
    #[must_use]
    pub fn starting_ammo(&self) -> [(AmmoType, u32); 2] {
        [
            (AmmoType::NineMm, self.starting_9mm_ammo),
            (AmmoType::AssaultRifle, self.starting_ar_ammo),
        ]
    }

    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.max_health = self.max_health.max(1.0);
        self.fire_rate = self.fire_rate.clamp(0.01, 5.0);
        self.reload_duration = self.reload_duration.clamp(0.1, 10.0);
    }
}

/// Enemy (zombie) parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Maximum health
    pub max_health: f32,
    /// Seconds the health bar stays up after a hit
    pub health_bar_display_time: f32,
    /// Shortest hit-react cooldown
    pub hit_react_time_min: f32,
    /// Longest hit-react cooldown
    pub hit_react_time_max: f32,
    /// Chance (0.0-1.0) a bullet impact stuns
    pub stun_chance: f32,
    /// Hit-react montage section played on stun
    pub hit_react_section: String,
    /// Melee damage
    pub base_damage: f32,
    /// Seconds between attacks
    pub attack_wait_time: f32,
    /// Seconds between death and despawn
    pub death_time: f32,
    /// Bone that counts as a headshot
    pub head_bone: String,
    /// First patrol point, relative to spawn
    pub patrol_point: Vec3,
    /// Second patrol point, relative to spawn
    pub patrol_point_2: Vec3,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            health_bar_display_time: 4.0,
            hit_react_time_min: 0.5,
            hit_react_time_max: 3.0,
            stun_chance: 0.5,
            hit_react_section: "HitReactFront".to_string(),
            base_damage: 20.0,
            attack_wait_time: 1.0,
            death_time: 4.0,
            head_bone: "head".to_string(),
            patrol_point: Vec3::new(5.0, 0.0, 0.0),
            patrol_point_2: Vec3::new(-5.0, 0.0, 0.0),
        }
    }
}

impl EnemyConfig {
    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.max_health = self.max_health.max(1.0);
        self.health_bar_display_time = self.health_bar_display_time.max(0.0);
        self.stun_chance = self.stun_chance.clamp(0.0, 1.0);
        self.hit_react_time_min = self.hit_react_time_min.max(0.0);
        if self.hit_react_time_max < self.hit_react_time_min {
            self.hit_react_time_max = self.hit_react_time_min;
        }
        self.base_damage = self.base_damage.max(0.0);
        self.attack_wait_time = self.attack_wait_time.max(0.0);
        self.death_time = self.death_time.max(0.0);
    }
}

/// World and decision-process parameters for an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Distance at which an enemy notices the survivor
    pub agro_radius: f32,
    /// Distance at which an enemy can swing
    pub attack_range: f32,
    /// Enemy walk speed (units per second)
    pub enemy_speed: f32,
    /// Seconds before the decision process clears a stun
    pub stun_recovery: f32,
    /// Maximum hit-scan distance
    pub weapon_range: f32,
    /// Chance (0.0-1.0) a shot connects
    pub accuracy: f32,
    /// Chance (0.0-1.0) a connecting shot hits the head
    pub headshot_chance: f32,
    /// Distance at which the survivor can pick up a ground item
    pub pickup_radius: f32,
    /// Event bus capacity
    pub event_capacity: usize,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            agro_radius: 15.0,
            attack_range: 1.5,
            enemy_speed: 2.5,
            stun_recovery: 1.0,
            weapon_range: 50.0,
            accuracy: 0.8,
            headshot_chance: 0.2,
            pickup_radius: 2.0,
            event_capacity: 4096,
        }
    }
}

impl EncounterConfig {
    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.agro_radius = self.agro_radius.max(0.0);
        self.attack_range = self.attack_range.max(0.1);
        self.enemy_speed = self.enemy_speed.max(0.0);
        self.stun_recovery = self.stun_recovery.max(0.0);
        self.weapon_range = self.weapon_range.max(0.0);
        self.accuracy = self.accuracy.clamp(0.0, 1.0);
        self.headshot_chance = self.headshot_chance.clamp(0.0, 1.0);
        self.pickup_radius = self.pickup_radius.max(0.0);
        self.event_capacity = self.event_capacity.clamp(16, 1 << 20);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_game() {
        let survivor = SurvivorConfig::default();
        assert_eq!(survivor.starting_9mm_ammo, 85);
        assert_eq!(survivor.starting_ar_ammo, 120);
        assert!((survivor.fire_rate - 0.1).abs() < f32::EPSILON);

        let enemy = EnemyConfig::default();
        assert_eq!(enemy.stun_chance, 0.5);
        assert_eq!(enemy.hit_react_time_min, 0.5);
        assert_eq!(enemy.hit_react_time_max, 3.0);
        assert_eq!(enemy.base_damage, 20.0);
    }

    #[test]
    fn test_enemy_validate() {
        let mut enemy = EnemyConfig {
            stun_chance: 1.7,
            hit_react_time_min: 2.0,
            hit_react_time_max: 1.0,
            ..EnemyConfig::default()
        };
        enemy.validate();
        assert_eq!(enemy.stun_chance, 1.0);
        assert_eq!(enemy.hit_react_time_max, 2.0);
    }

    #[test]
    fn test_encounter_validate() {
        let mut encounter = EncounterConfig {
            accuracy: -1.0,
            attack_range: 0.0,
            ..EncounterConfig::default()
        };
        encounter.validate();
        assert_eq!(encounter.accuracy, 0.0);
        assert!((encounter.attack_range - 0.1).abs() < f32::EPSILON);
    }
}
