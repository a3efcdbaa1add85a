//! Stun rolls and hit-reaction gating.

use serde::{Deserialize, Serialize};

use crate::config::EnemyConfig;
use crate::rng::RandomSource;

/// Hit reaction state of an enemy.
///
/// A bullet impact stuns when a uniform roll in `[0, 1]` is at or below
/// `stun_chance`. Playing the reaction clears `can_react`; it comes back after
/// a cooldown drawn uniformly from `[cooldown_min, cooldown_max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitReaction {
    stun_chance: f32,
    cooldown_min: f32,
    cooldown_max: f32,
    can_react: bool,
}

impl Default for HitReaction {
    fn default() -> Self {
        Self::new(0.5, 0.5, 3.0)
    }
}

impl HitReaction {
    /// Create a hit reaction that can react immediately.
    #[must_use]
    pub fn new(stun_chance: f32, cooldown_min: f32, cooldown_max: f32) -> Self {
        let cooldown_min = cooldown_min.max(0.0);
        Self {
            stun_chance: stun_chance.clamp(0.0, 1.0),
            cooldown_min,
            cooldown_max: cooldown_max.max(cooldown_min),
            can_react: true,
        }
    }

    /// Build from enemy parameters.
    #[must_use]
    pub fn from_config(config: &EnemyConfig) -> Self {
        Self::new(
            config.stun_chance,
            config.hit_react_time_min,
            config.hit_react_time_max,
        )
    }

    /// Stun chance.
    #[must_use]
    pub const fn stun_chance(&self) -> f32 {
        self.stun_chance
    }

    /// Check if a reaction may play now.
    #[must_use]
    pub const fn can_react(&self) -> bool {
        self.can_react
    }

    /// Roll for a stun.
    pub fn roll_stun(&self, rng: &mut dyn RandomSource) -> bool {
        rng.unit() <= self.stun_chance
    }

    /// Use the reaction if available. Returns the cooldown (seconds) after
    /// which [`Self::reset`] should be called, or `None` when gated.
    pub fn try_react(&mut self, rng: &mut dyn RandomSource) -> Option<f32> {
        if !self.can_react {
            return None;
        }
        self.can_react = false;
        Some(rng.range(self.cooldown_min, self.cooldown_max))
    }

    /// Cooldown elapsed.
    pub fn reset(&mut self) {
        self.can_react = true;
    }
}
