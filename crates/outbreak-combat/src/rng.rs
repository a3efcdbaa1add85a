//! Random rolls.
//!
//! Stun checks, hit-react cooldowns and attack section choice all draw from a
//! [`RandomSource`]. Games use a seeded [`fastrand::Rng`]; tests and replays
//! use [`ScriptedRolls`].

use std::collections::VecDeque;

/// Source of uniform random values.
pub trait RandomSource {
    /// Uniform value in `[0, 1]`.
    fn unit(&mut self) -> f32;

    /// Uniform value in `[min, max]`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.unit()
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.unit() * len as f32) as usize).min(len - 1)
    }
}

impl RandomSource for fastrand::Rng {
    fn unit(&mut self) -> f32 {
        self.f32()
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.usize(..len)
        }
    }
}

/// Replays a fixed list of unit rolls, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rolls: VecDeque<f32>,
}

impl ScriptedRolls {
    /// Create from rolls in `[0, 1]`. An empty script always rolls 0.
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = f32>) -> Self {
        Self {
            rolls: rolls.into_iter().map(|r| r.clamp(0.0, 1.0)).collect(),
        }
    }
}

impl RandomSource for ScriptedRolls {
    fn unit(&mut self) -> f32 {
        match self.rolls.pop_front() {
            Some(roll) => {
                self.rolls.push_back(roll);
                roll
            },
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_rolls_cycle() {
        let mut rolls = ScriptedRolls::new([0.25, 0.75]);
        assert_eq!(rolls.unit(), 0.25);
        assert_eq!(rolls.unit(), 0.75);
        assert_eq!(rolls.unit(), 0.25);
    }

    #[test]
    fn test_range_and_index() {
        let mut rolls = ScriptedRolls::new([0.5, 1.0, 0.0]);
        assert_eq!(rolls.range(0.5, 3.0), 1.75);
        assert_eq!(rolls.index(4), 3);
        assert_eq!(rolls.index(4), 0);
        assert_eq!(rolls.index(0), 0);
    }

    #[test]
    fn test_seeded_rng_stays_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let v = rng.range(0.5, 3.0);
            assert!((0.5..=3.0).contains(&v));
            assert!(rng.index(4) < 4);
        }
    }
}
