//! The zombie.
//!
//! An enemy reacts to the world through explicit calls (overlaps, bullet
//! hits, damage, animation notifies) and publishes what its decision process
//! needs through its [`Blackboard`]. Delays run on its own [`Timers`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use outbreak_common::EntityId;

use crate::animation::{AnimationSink, Montage, MontageRequest};
use crate::blackboard::Blackboard;
use crate::config::EnemyConfig;
use crate::events::{CombatEvent, EventSender};
use crate::health::{DamageResult, Health};
use crate::hit_react::HitReaction;
use crate::rng::RandomSource;
use crate::timers::Timers;

/// Melee arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arm {
    /// Left arm
    Left,
    /// Right arm
    Right,
}

/// Attack montage sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackSection {
    /// Fast left swing
    LeftFast,
    /// Fast right swing
    RightFast,
    /// Left swing
    Left,
    /// Right swing
    Right,
}

impl AttackSection {
    /// Every section, in roll order.
    pub const ALL: [Self; 4] = [Self::LeftFast, Self::RightFast, Self::Left, Self::Right];

    /// Montage section name.
    #[must_use]
    pub const fn section_name(self) -> &'static str {
        match self {
            Self::LeftFast => "AttackLAFast",
            Self::RightFast => "AttackRAFast",
            Self::Left => "AttackLA",
            Self::Right => "AttackRA",
        }
    }

    /// Arm that swings.
    #[must_use]
    pub const fn arm(self) -> Arm {
        match self {
            Self::LeftFast | Self::Left => Arm::Left,
            Self::RightFast | Self::Right => Arm::Right,
        }
    }
}

/// Timer slots owned by an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnemyTimer {
    /// Hide the health bar.
    HealthBarHide,
    /// Allow the next hit reaction.
    HitReactReset,
    /// Allow the next attack.
    AttackCooldown,
    /// Remove the corpse.
    DeathDespawn,
}

/// Result of an attack request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Swing started.
    Started(AttackSection),
    /// Blocked by a stun.
    Stunned,
    /// Dying enemies do not attack.
    Dying,
    /// Attack cooldown still running.
    OnCooldown,
}

/// A zombie.
#[derive(Debug)]
pub struct Enemy {
    id: EntityId,
    config: EnemyConfig,
    position: Vec3,
    health: Health,
    hit_reaction: HitReaction,
    blackboard: Blackboard,
    timers: Timers<EnemyTimer>,
    health_bar_visible: bool,
    dying: bool,
    despawned: bool,
    left_arm_active: bool,
    right_arm_active: bool,
    events: EventSender,
}

impl Enemy {
    /// Create an enemy at `position`. Call [`Self::begin_play`] once placed.
    #[must_use]
    pub fn new(id: EntityId, config: EnemyConfig, position: Vec3, events: EventSender) -> Self {
        Self {
            id,
            health: Health::new(config.max_health),
            hit_reaction: HitReaction::from_config(&config),
            config,
            position,
            blackboard: Blackboard::new(),
            timers: Timers::new(),
            health_bar_visible: false,
            dying: false,
            despawned: false,
            left_arm_active: false,
            right_arm_active: false,
            events,
        }
    }

    /// Publish initial facts: attacks allowed and world-space patrol points.
    pub fn begin_play(&mut self) {
        self.blackboard.set_can_attack(true);
        self.blackboard.set_patrol_points(
            self.position + self.config.patrol_point,
            self.position + self.config.patrol_point_2,
        );
    }

    /// Entity ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Parameters.
    #[must_use]
    pub const fn config(&self) -> &EnemyConfig {
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

    /// Health pool.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Fact store.
    #[must_use]
    pub const fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    /// Fact store, mutably (to drain changes).
    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    /// Check if dying.
    #[must_use]
    pub const fn is_dying(&self) -> bool {
        self.dying
    }

    /// Check if the corpse has been removed.
    #[must_use]
    pub const fn is_despawned(&self) -> bool {
        self.despawned
    }

    /// Check if stunned.
    #[must_use]
    pub const fn is_stunned(&self) -> bool {
        self.blackboard.stunned()
    }

    /// Check if the health bar is shown.
    #[must_use]
    pub const fn health_bar_visible(&self) -> bool {
        self.health_bar_visible
    }

    /// Check if a bone counts as a headshot.
    #[must_use]
    pub fn is_head_bone(&self, bone: &str) -> bool {
        self.config.head_bone == bone
    }

    /// Seconds until the pending timer of `slot` fires.
    #[must_use]
    pub fn remaining(&self, slot: EnemyTimer) -> Option<f32> {
        self.timers.remaining(slot)
    }

    /// The survivor entered the aggro sphere.
    pub fn agro_overlap(&mut self, target: EntityId) {
        self.blackboard.set_target(Some(target));
    }

    /// The survivor entered melee range.
    pub fn combat_range_begin(&mut self) {
        self.blackboard.set_in_attack_range(true);
    }

    /// The survivor left melee range.
    pub fn combat_range_end(&mut self) {
        self.blackboard.set_in_attack_range(false);
    }

    /// Show the health bar and (re)start its hide timer.
    pub fn show_health_bar(&mut self) {
        self.timers
            .set(EnemyTimer::HealthBarHide, self.config.health_bar_display_time);
        if !self.health_bar_visible {
            self.health_bar_visible = true;
            self.events.emit(CombatEvent::HealthBarChanged {
                enemy: self.id,
                visible: true,
            });
        }
    }

    /// Hide the health bar.
    pub fn hide_health_bar(&mut self) {
        self.timers.clear(EnemyTimer::HealthBarHide);
        if self.health_bar_visible {
            self.health_bar_visible = false;
            self.events.emit(CombatEvent::HealthBarChanged {
                enemy: self.id,
                visible: false,
            });
        }
    }

    /// A bullet struck this enemy. Shows the health bar and rolls for a stun.
    /// Returns true if the hit stunned. Ignored while dying.
    pub fn bullet_hit(&mut self, rng: &mut dyn RandomSource, anim: &mut dyn AnimationSink) -> bool {
        if self.dying {
            return false;
        }
        self.show_health_bar();

        if !self.hit_reaction.roll_stun(rng) {
            return false;
        }
        let section = self.config.hit_react_section.clone();
        self.play_hit_montage(&section, 1.0, rng, anim);
        self.set_stunned(true);
        true
    }

    /// Play a hit reaction if the reaction cooldown allows it.
    pub fn play_hit_montage(
        &mut self,
        section: &str,
        rate: f32,
        rng: &mut dyn RandomSource,
        anim: &mut dyn AnimationSink,
    ) -> bool {
        let Some(cooldown) = self.hit_reaction.try_react(rng) else {
            return false;
        };
        anim.play_montage(
            MontageRequest::new(self.id, Montage::HitReact)
                .with_section(section)
                .with_rate(rate),
        );
        self.timers.set(EnemyTimer::HitReactReset, cooldown);
        true
    }

    /// Check if a hit reaction may play.
    #[must_use]
    pub const fn can_hit_react(&self) -> bool {
        self.hit_reaction.can_react()
    }

    /// Set the stun state.
    pub fn set_stunned(&mut self, stunned: bool) {
        if self.blackboard.set_stunned(stunned) {
            self.events.emit(CombatEvent::StunChanged {
                enemy: self.id,
                stunned,
            });
        }
    }

    /// Apply damage. The causer becomes the target. Killing damage starts
    /// the one-shot death.
    pub fn take_damage(
        &mut self,
        amount: f32,
        causer: Option<EntityId>,
        anim: &mut dyn AnimationSink,
    ) -> DamageResult {
        if let Some(causer) = causer {
            self.blackboard.set_target(Some(causer));
        }

        let was_dead = self.health.is_dead();
        let result = self.health.apply_damage(amount);
        if !was_dead {
            self.events.emit(CombatEvent::Damaged {
                target: self.id,
                amount: result.applied,
                source: causer,
                remaining: self.health.current(),
            });
        }
        if result.killed {
            self.die(causer, anim);
        }
        result
    }

    fn die(&mut self, killer: Option<EntityId>, anim: &mut dyn AnimationSink) {
        if self.dying {
            return;
        }
        self.dying = true;

        self.hide_health_bar();
        self.left_arm_active = false;
        self.right_arm_active = false;
        anim.play_montage(MontageRequest::new(self.id, Montage::EnemyDeath));
        self.blackboard.set_dead(true);
        info!("Enemy {} died", self.id);
        self.events.emit(CombatEvent::Died {
            entity: self.id,
            killer,
        });
    }

    /// Start a melee attack with a random section.
    pub fn attack(
        &mut self,
        rng: &mut dyn RandomSource,
        anim: &mut dyn AnimationSink,
    ) -> AttackOutcome {
        if self.dying {
            return AttackOutcome::Dying;
        }
        if self.is_stunned() {
            return AttackOutcome::Stunned;
        }
        if !self.blackboard.can_attack() {
            return AttackOutcome::OnCooldown;
        }

        let section = AttackSection::ALL[rng.index(AttackSection::ALL.len())];
        anim.play_montage(
            MontageRequest::new(self.id, Montage::Attack).with_section(section.section_name()),
        );
        self.blackboard.set_can_attack(false);
        self.timers
            .set(EnemyTimer::AttackCooldown, self.config.attack_wait_time);
        debug!("Enemy {} attacks with {}", self.id, section.section_name());
        self.events.emit(CombatEvent::EnemyAttacked {
            enemy: self.id,
            section,
        });
        AttackOutcome::Started(section)
    }

    /// Animation notify: arm collision on.
    pub fn activate_arm(&mut self, arm: Arm) {
        if self.dying {
            return;
        }
        match arm {
            Arm::Left => self.left_arm_active = true,
            Arm::Right => self.right_arm_active = true,
        }
    }

    /// Animation notify: arm collision off.
    pub fn deactivate_arm(&mut self, arm: Arm) {
        match arm {
            Arm::Left => self.left_arm_active = false,
            Arm::Right => self.right_arm_active = false,
        }
    }

    /// Check if an arm's collision is on.
    #[must_use]
    pub const fn arm_active(&self, arm: Arm) -> bool {
        match arm {
            Arm::Left => self.left_arm_active,
            Arm::Right => self.right_arm_active,
        }
    }

    /// The survivor overlapped an arm. Returns the damage to deal if the
    /// arm's collision is on.
    #[must_use]
    pub fn arm_overlap(&self, arm: Arm) -> Option<f32> {
        self.arm_active(arm).then_some(self.config.base_damage)
    }

    /// The survivor this enemy fought has died.
    pub fn set_target_dead(&mut self, dead: bool) {
        self.blackboard.set_target_dead(dead);
    }

    /// Death montage finished: start the despawn timer.
    pub fn finish_death(&mut self) {
        if self.dying && !self.timers.is_pending(EnemyTimer::DeathDespawn) {
            self.timers
                .set(EnemyTimer::DeathDespawn, self.config.death_time);
        }
    }

    /// Advance timers by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        for slot in self.timers.advance(dt) {
            match slot {
                EnemyTimer::HealthBarHide => self.hide_health_bar(),
                EnemyTimer::HitReactReset => self.hit_reaction.reset(),
                EnemyTimer::AttackCooldown => {
                    if !self.dying {
                        self.blackboard.set_can_attack(true);
                    }
                },
                EnemyTimer::DeathDespawn => {
                    self.despawned = true;
                    debug!("Enemy {} despawned", self.id);
                    self.events
                        .emit(CombatEvent::Despawned { entity: self.id });
                },
            }
        }
    }
}
