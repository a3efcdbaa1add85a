//! Health and death.

use serde::{Deserialize, Serialize};

/// Result of applying damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Damage actually applied. Equal to the request while alive, zero once
    /// dead; there is no armor or resistance model.
    pub applied: f32,
    /// True only on the hit that caused death.
    pub killed: bool,
}

impl DamageResult {
    const IGNORED: Self = Self {
        applied: 0.0,
        killed: false,
    };
}

/// Health pool with a one-way transition to dead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    /// Full health pool of `max`.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            dead: max <= 0.0,
        }
    }

    /// Current health.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Check if dead.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Apply damage. Dropping to zero or below kills, exactly once; any later
    /// call is a no-op. Negative amounts are treated as zero.
    pub fn apply_damage(&mut self, amount: f32) -> DamageResult {
        if self.dead {
            return DamageResult::IGNORED;
        }

        let amount = amount.max(0.0);
        if self.current - amount <= 0.0 {
            self.current = 0.0;
            self.dead = true;
            DamageResult {
                applied: amount,
                killed: true,
            }
        } else {
            self.current -= amount;
            DamageResult {
                applied: amount,
                killed: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_reduces_health() {
        let mut health = Health::new(100.0);
        let result = health.apply_damage(30.0);
        assert_eq!(result.applied, 30.0);
        assert!(!result.killed);
        assert_eq!(health.current(), 70.0);
    }

    #[test]
    fn test_overkill_clamps_and_kills_once() {
        let mut health = Health::new(100.0);
        health.apply_damage(40.0);

        let result = health.apply_damage(100.0);
        assert!(result.killed);
        assert_eq!(result.applied, 100.0);
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());

        let again = health.apply_damage(100.0);
        assert!(!again.killed);
        assert_eq!(again.applied, 0.0);
        assert_eq!(health.current(), 0.0);
    }

    #[test]
    fn test_exact_lethal_damage_kills() {
        let mut health = Health::new(60.0);
        assert!(health.apply_damage(60.0).killed);
    }

    #[test]
    fn test_negative_damage_is_ignored() {
        let mut health = Health::new(100.0);
        let result = health.apply_damage(-10.0);
        assert_eq!(result.applied, 0.0);
        assert_eq!(health.current(), 100.0);
    }
}
