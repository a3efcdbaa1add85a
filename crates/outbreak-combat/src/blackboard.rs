//! Facts an enemy publishes for its decision process.
//!
//! Every setter records a [`FactChange`] when (and only when) the value
//! actually changes. The decision process drains the change log each frame.

use glam::Vec3;
use outbreak_common::EntityId;
use serde::{Deserialize, Serialize};

/// A fact that changed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FactChange {
    /// Current target.
    Target(Option<EntityId>),
    /// Target inside melee range.
    InAttackRange(bool),
    /// Attack cooldown has elapsed.
    CanAttack(bool),
    /// Hit reaction is blocking attacks.
    Stunned(bool),
    /// Enemy is dying.
    Dead(bool),
    /// The survivor this enemy fought has died.
    TargetDead(bool),
    /// Patrol points in world space.
    PatrolPoints(Vec3, Vec3),
}

/// Typed fact store for one enemy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blackboard {
    target: Option<EntityId>,
    in_attack_range: bool,
    can_attack: bool,
    stunned: bool,
    dead: bool,
    target_dead: bool,
    patrol_points: (Vec3, Vec3),
    changes: Vec<FactChange>,
}

fn update<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl Blackboard {
    /// Empty fact store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current target.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Target inside melee range.
    #[must_use]
    pub const fn in_attack_range(&self) -> bool {
        self.in_attack_range
    }

    /// Attack cooldown has elapsed.
    #[must_use]
    pub const fn can_attack(&self) -> bool {
        self.can_attack
    }

    /// Stunned by a hit reaction.
    #[must_use]
    pub const fn stunned(&self) -> bool {
        self.stunned
    }

    /// Dying.
    #[must_use]
    pub const fn dead(&self) -> bool {
        self.dead
    }

    /// Target has died.
    #[must_use]
    pub const fn target_dead(&self) -> bool {
        self.target_dead
    }

    /// Patrol points.
    #[must_use]
    pub const fn patrol_points(&self) -> (Vec3, Vec3) {
        self.patrol_points
    }

    /// Set target.
    pub fn set_target(&mut self, target: Option<EntityId>) -> bool {
        let changed = update(&mut self.target, target);
        if changed {
            self.changes.push(FactChange::Target(target));
        }
        changed
    }

    /// Set in-attack-range.
    pub fn set_in_attack_range(&mut self, value: bool) -> bool {
        let changed = update(&mut self.in_attack_range, value);
        if changed {
            self.changes.push(FactChange::InAttackRange(value));
        }
        changed
    }

    /// Set can-attack.
    pub fn set_can_attack(&mut self, value: bool) -> bool {
        let changed = update(&mut self.can_attack, value);
        if changed {
            self.changes.push(FactChange::CanAttack(value));
        }
        changed
    }

    /// Set stunned.
    pub fn set_stunned(&mut self, value: bool) -> bool {
        let changed = update(&mut self.stunned, value);
        if changed {
            self.changes.push(FactChange::Stunned(value));
        }
        changed
    }

    /// Set dead.
    pub fn set_dead(&mut self, value: bool) -> bool {
        let changed = update(&mut self.dead, value);
        if changed {
            self.changes.push(FactChange::Dead(value));
        }
        changed
    }

    /// Set target-dead.
    pub fn set_target_dead(&mut self, value: bool) -> bool {
        let changed = update(&mut self.target_dead, value);
        if changed {
            self.changes.push(FactChange::TargetDead(value));
        }
        changed
    }

    /// Set patrol points.
    pub fn set_patrol_points(&mut self, first: Vec3, second: Vec3) -> bool {
        let changed = update(&mut self.patrol_points, (first, second));
        if changed {
            self.changes.push(FactChange::PatrolPoints(first, second));
        }
        changed
    }

    /// Take the change log.
    pub fn drain_changes(&mut self) -> Vec<FactChange> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_recorded_once() {
        let mut board = Blackboard::new();
        assert!(board.set_can_attack(true));
        assert!(!board.set_can_attack(true));
        assert!(board.set_stunned(true));

        assert_eq!(
            board.drain_changes(),
            vec![FactChange::CanAttack(true), FactChange::Stunned(true)]
        );
        assert!(board.drain_changes().is_empty());
    }

    #[test]
    fn test_target_and_patrol() {
        let mut board = Blackboard::new();
        let target = EntityId::from_raw(3);
        board.set_target(Some(target));
        board.set_patrol_points(Vec3::X, Vec3::Y);

        assert_eq!(board.target(), Some(target));
        assert_eq!(board.patrol_points(), (Vec3::X, Vec3::Y));
        assert_eq!(board.drain_changes().len(), 2);
    }
}
