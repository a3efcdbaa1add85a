//! A survivor against a group of enemies.
//!
//! The encounter is the world around the characters: it owns positions and
//! ground items, resolves shots through a [`HitScan`], turns distances into
//! overlap calls, runs the enemies' decision process from their blackboards
//! and clears stuns once they have run their course.

use glam::Vec3;
use tracing::{debug, trace};

use outbreak_common::EntityId;

use crate::ammo::AmmoPickup;
use crate::animation::{AnimationSink, NoAnimation};
use crate::blackboard::FactChange;
use crate::combat_state::{FireOutcome, ReloadOutcome, ReloadReport};
use crate::config::{EncounterConfig, EnemyConfig, SurvivorConfig};
use crate::enemy::{AttackOutcome, Enemy};
use crate::events::{CombatEvent, EventBus};
use crate::rng::RandomSource;
use crate::survivor::{Shot, SlotKey, Survivor};
use crate::timers::Timers;
use crate::weapon::{ItemState, Weapon};
use crate::weapon_table::{WeaponTable, WeaponTableResult};

/// Bone reported for hits below the head.
pub const BODY_BONE: &str = "spine_02";

/// Where a bullet landed.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletHit {
    /// Enemy struck
    pub target: EntityId,
    /// Impact point
    pub location: Vec3,
    /// Bone struck
    pub bone: String,
}

/// World/physics collaborator that decides what a shot hits.
pub trait HitScan {
    /// Trace `shot` against `enemies`.
    fn trace(
        &mut self,
        shot: &Shot,
        enemies: &[Enemy],
        rng: &mut dyn RandomSource,
    ) -> Option<BulletHit>;
}

/// Hits the nearest living enemy in range, with an accuracy and a headshot
/// roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestTarget {
    range: f32,
    accuracy: f32,
    headshot_chance: f32,
}

impl NearestTarget {
    /// Create a hit scan.
    #[must_use]
    pub fn new(range: f32, accuracy: f32, headshot_chance: f32) -> Self {
        Self {
            range: range.max(0.0),
            accuracy: accuracy.clamp(0.0, 1.0),
            headshot_chance: headshot_chance.clamp(0.0, 1.0),
        }
    }

    /// Build from encounter parameters.
    #[must_use]
    pub fn from_config(config: &EncounterConfig) -> Self {
        Self::new(config.weapon_range, config.accuracy, config.headshot_chance)
    }
}

impl HitScan for NearestTarget {
    fn trace(
        &mut self,
        shot: &Shot,
        enemies: &[Enemy],
        rng: &mut dyn RandomSource,
    ) -> Option<BulletHit> {
        let target = enemies
            .iter()
            .filter(|e| !e.is_dying())
            .map(|e| (e, e.position().distance(shot.origin)))
            .filter(|(_, distance)| *distance <= self.range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e)?;

        if self.accuracy <= 0.0 || rng.unit() > self.accuracy {
            return None;
        }
        let headshot = self.headshot_chance > 0.0 && rng.unit() <= self.headshot_chance;
        let bone = if headshot {
            target.config().head_bone.clone()
        } else {
            BODY_BONE.to_string()
        };
        Some(BulletHit {
            target: target.id(),
            location: target.position(),
            bone,
        })
    }
}

/// Something lying in the world.
#[derive(Debug, Clone, PartialEq)]
pub enum GroundItem {
    /// A weapon (placed, or dropped by a swap)
    Weapon(Weapon),
    /// An ammo box
    Ammo(AmmoPickup),
}

/// A ground item and where it lies.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundEntry {
    /// Item
    pub item: GroundItem,
    /// World position
    pub position: Vec3,
}

impl GroundEntry {
    /// Ammo can always be taken; weapons only once they stop falling.
    #[must_use]
    pub fn can_pick_up(&self) -> bool {
        match &self.item {
            GroundItem::Weapon(weapon) => weapon.state() != ItemState::Falling,
            GroundItem::Ammo(_) => true,
        }
    }
}

/// A running encounter.
pub struct Encounter {
    config: EncounterConfig,
    survivor: Survivor,
    enemies: Vec<Enemy>,
    ground: Vec<GroundEntry>,
    stun_timers: Timers<EntityId>,
    bus: EventBus,
    rng: Box<dyn RandomSource>,
    hit_scan: Box<dyn HitScan>,
    anim: Box<dyn AnimationSink>,
    elapsed: f32,
}

impl Encounter {
    /// Create an encounter with a freshly spawned survivor at the origin.
    pub fn new(
        config: EncounterConfig,
        survivor_config: SurvivorConfig,
        table: &WeaponTable,
    ) -> WeaponTableResult<Self> {
        let bus = EventBus::new(config.event_capacity);
        let survivor = Survivor::spawn(EntityId::new(), survivor_config, table, bus.sender())?;
        Ok(Self {
            hit_scan: Box::new(NearestTarget::from_config(&config)),
            config,
            survivor,
            enemies: Vec::new(),
            ground: Vec::new(),
            stun_timers: Timers::new(),
            bus,
            rng: Box::new(fastrand::Rng::new()),
            anim: Box::new(NoAnimation),
            elapsed: 0.0,
        })
    }

    /// Use a specific random source.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Use a specific hit scan.
    #[must_use]
    pub fn with_hit_scan(mut self, hit_scan: impl HitScan + 'static) -> Self {
        self.hit_scan = Box::new(hit_scan);
        self
    }

    /// Send montage requests to `anim`.
    #[must_use]
    pub fn with_animation(mut self, anim: impl AnimationSink + 'static) -> Self {
        self.anim = Box::new(anim);
        self
    }

    /// Parameters.
    #[must_use]
    pub const fn config(&self) -> &EncounterConfig {
        &self.config
    }

    /// The survivor.
    #[must_use]
    pub const fn survivor(&self) -> &Survivor {
        &self.survivor
    }

    /// Living (or not yet despawned) enemies.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Enemy by ID.
    #[must_use]
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    /// Items lying in the world.
    #[must_use]
    pub fn ground_items(&self) -> &[GroundEntry] {
        &self.ground
    }

    /// Seconds simulated.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// The survivor is dead or every enemy is gone.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.survivor.is_dead() || self.enemies.is_empty()
    }

    /// Take the events published since the last call.
    pub fn drain_events(&self) -> Vec<CombatEvent> {
        self.bus.drain()
    }

    /// Place an enemy and start it.
    pub fn spawn_enemy(&mut self, config: EnemyConfig, position: Vec3) -> EntityId {
        let id = EntityId::new();
        let mut enemy = Enemy::new(id, config, position, self.bus.sender());
        enemy.begin_play();
        debug!("Spawned enemy {} at {}", id, position);
        self.enemies.push(enemy);
        id
    }

    /// Put an item on the ground.
    pub fn place_item(&mut self, item: GroundItem, position: Vec3) {
        self.ground.push(GroundEntry { item, position });
    }

    /// Move the survivor.
    pub fn move_survivor(&mut self, position: Vec3) {
        if self.survivor.input_enabled() {
            self.survivor.set_position(position);
        }
    }

    /// Fire button pressed.
    pub fn press_fire(&mut self) -> FireOutcome {
        self.survivor.fire_pressed(self.anim.as_mut())
    }

    /// Fire button released.
    pub fn release_fire(&mut self) {
        self.survivor.fire_released();
    }

    /// Reload button pressed.
    pub fn press_reload(&mut self) -> ReloadOutcome {
        self.survivor.reload_pressed(self.anim.as_mut())
    }

    /// Reload montage finished.
    pub fn reload_montage_finished(&mut self) -> Option<ReloadReport> {
        self.survivor.finish_reloading()
    }

    /// Slot hotkey pressed.
    pub fn press_slot(&mut self, key: SlotKey) -> bool {
        self.survivor.slot_key_pressed(key)
    }

    /// Pick up the nearest ground item within reach. Returns true if
    /// something was taken.
    pub fn interact(&mut self) -> bool {
        if !self.survivor.input_enabled() {
            return false;
        }
        let origin = self.survivor.position();
        let nearest = self
            .ground
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.can_pick_up())
            .map(|(index, entry)| (index, entry.position.distance(origin)))
            .filter(|(_, distance)| *distance <= self.config.pickup_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index);
        let Some(index) = nearest else {
            return false;
        };

        let entry = self.ground.swap_remove(index);
        match entry.item {
            GroundItem::Weapon(weapon) => {
                let picked = weapon.id();
                match self.survivor.pickup_weapon(weapon) {
                    Some(back) => {
                        let taken = back.id() != picked;
                        self.place_item(GroundItem::Weapon(back), origin);
                        taken
                    },
                    None => true,
                }
            },
            GroundItem::Ammo(pickup) => {
                self.survivor.pickup_ammo(pickup, self.anim.as_mut());
                true
            },
        }
    }

    /// Advance the world by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.elapsed += dt;
        self.settle_dropped_weapons();

        for id in self.stun_timers.advance(dt) {
            if let Some(enemy) = self.enemies.iter_mut().find(|e| e.id() == id) {
                enemy.set_stunned(false);
            }
        }

        self.survivor.tick(dt, self.anim.as_mut());
        for shot in self.survivor.take_shots() {
            self.resolve_shot(&shot);
        }

        for enemy in &mut self.enemies {
            enemy.tick(dt);
        }
        self.run_decisions(dt);
        self.process_facts();

        self.enemies.retain(|e| !e.is_despawned());
    }

    /// Weapons dropped last step finish falling and become pickups.
    fn settle_dropped_weapons(&mut self) {
        for entry in &mut self.ground {
            if let GroundItem::Weapon(weapon) = &mut entry.item {
                if weapon.state() == ItemState::Falling {
                    weapon.set_state(ItemState::Pickup);
                    trace!("Weapon {} landed at {}", weapon.id(), entry.position);
                    self.bus.publish(CombatEvent::WeaponLanded { weapon: weapon.id() });
                }
            }
        }
    }

    fn resolve_shot(&mut self, shot: &Shot) {
        let Some(hit) = self
            .hit_scan
            .trace(shot, &self.enemies, self.rng.as_mut())
        else {
            trace!("Shot from {} missed", shot.shooter);
            return;
        };
        let Some(enemy) = self.enemies.iter_mut().find(|e| e.id() == hit.target) else {
            return;
        };

        // Impact reaction runs before damage, so a killing shot can still stun.
        enemy.bullet_hit(self.rng.as_mut(), self.anim.as_mut());
        let damage = if enemy.is_head_bone(&hit.bone) {
            shot.headshot_damage
        } else {
            shot.damage
        };
        enemy.take_damage(damage, Some(shot.shooter), self.anim.as_mut());
    }

    fn run_decisions(&mut self, dt: f32) {
        let survivor_id = self.survivor.id();
        for enemy in &mut self.enemies {
            if enemy.is_dying() {
                continue;
            }
            let survivor_position = self.survivor.position();
            let distance = enemy.position().distance(survivor_position);

            if !self.survivor.is_dead()
                && distance <= self.config.agro_radius
                && enemy.blackboard().target().is_none()
            {
                enemy.agro_overlap(survivor_id);
            }
            let in_range = distance <= self.config.attack_range;
            if in_range != enemy.blackboard().in_attack_range() {
                if in_range {
                    enemy.combat_range_begin();
                } else {
                    enemy.combat_range_end();
                }
            }

            let board = enemy.blackboard();
            let chasing = board.target() == Some(survivor_id);
            if !chasing || board.target_dead() || board.stunned() {
                continue;
            }
            if !board.in_attack_range() {
                let direction = (survivor_position - enemy.position()).normalize_or_zero();
                let gap = (distance - self.config.attack_range * 0.5).max(0.0);
                let travel = (self.config.enemy_speed * dt).min(gap);
                enemy.set_position(enemy.position() + direction * travel);
                continue;
            }
            if !board.can_attack() {
                continue;
            }

            let AttackOutcome::Started(section) =
                enemy.attack(self.rng.as_mut(), self.anim.as_mut())
            else {
                continue;
            };
            let arm = section.arm();
            enemy.activate_arm(arm);
            if let Some(damage) = enemy.arm_overlap(arm) {
                let result =
                    self.survivor
                        .take_damage(damage, Some(enemy.id()), self.anim.as_mut());
                if result.killed {
                    enemy.set_target_dead(true);
                    self.survivor.finish_death();
                }
            }
            enemy.deactivate_arm(arm);
        }
    }

    fn process_facts(&mut self) {
        for enemy in &mut self.enemies {
            for change in enemy.blackboard_mut().drain_changes() {
                match change {
                    FactChange::Stunned(true) => {
                        self.stun_timers.set(enemy.id(), self.config.stun_recovery);
                    },
                    FactChange::Dead(true) => {
                        self.stun_timers.clear(enemy.id());
                        enemy.finish_death();
                    },
                    _ => {},
                }
            }
        }
    }
}
