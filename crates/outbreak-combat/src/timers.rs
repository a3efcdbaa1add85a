//! Named-slot timers.
//!
//! Each slot holds at most one pending timer. Arming a slot that is already
//! pending replaces the old countdown, which is how fire cooldowns, hit-react
//! resets and health-bar hides are restarted.

use std::collections::HashMap;
use std::hash::Hash;

/// Countdown timers keyed by slot.
#[derive(Debug, Clone)]
pub struct Timers<K: Eq + Hash> {
    pending: HashMap<K, f32>,
}

impl<K: Eq + Hash> Default for Timers<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Ord> Timers<K> {
    /// Create an empty timer set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `slot` to expire after `delay` seconds, replacing any pending timer.
    pub fn set(&mut self, slot: K, delay: f32) {
        self.pending.insert(slot, delay.max(0.0));
    }

    /// Cancel `slot`. Returns true if a timer was pending.
    pub fn clear(&mut self, slot: K) -> bool {
        self.pending.remove(&slot).is_some()
    }

    /// Cancel everything.
    pub fn clear_all(&mut self) {
        self.pending.clear();
    }

    /// Check if `slot` is pending.
    #[must_use]
    pub fn is_pending(&self, slot: K) -> bool {
        self.pending.contains_key(&slot)
    }

    /// Seconds until `slot` expires.
    #[must_use]
    pub fn remaining(&self, slot: K) -> Option<f32> {
        self.pending.get(&slot).copied()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance all timers by `dt` and return the slots that expired, soonest
    /// first. Expired slots are no longer pending when returned, so handlers
    /// may re-arm them.
    pub fn advance(&mut self, dt: f32) -> Vec<K> {
        let mut expired = Vec::new();
        for (&slot, remaining) in &mut self.pending {
            *remaining -= dt;
            if *remaining <= 0.0 {
                expired.push((*remaining, slot));
            }
        }

        // Most negative remaining expired first; ties by slot order.
        expired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        expired
            .into_iter()
            .map(|(_, slot)| {
                self.pending.remove(&slot);
                slot
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Slot {
        A,
        B,
    }

    #[test]
    fn test_fires_once() {
        let mut timers = Timers::new();
        timers.set(Slot::A, 0.5);

        assert!(timers.advance(0.25).is_empty());
        assert_eq!(timers.advance(0.25), vec![Slot::A]);
        assert!(timers.advance(1.0).is_empty());
        assert!(!timers.is_pending(Slot::A));
    }

    #[test]
    fn test_rearm_replaces_pending() {
        let mut timers = Timers::new();
        timers.set(Slot::A, 0.5);
        timers.advance(0.4);
        timers.set(Slot::A, 1.0);

        assert!(timers.advance(0.5).is_empty());
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.advance(0.5), vec![Slot::A]);
    }

    #[test]
    fn test_expiry_order() {
        let mut timers = Timers::new();
        timers.set(Slot::B, 0.1);
        timers.set(Slot::A, 0.3);

        assert_eq!(timers.advance(1.0), vec![Slot::B, Slot::A]);
    }

    #[test]
    fn test_clear_cancels() {
        let mut timers = Timers::new();
        timers.set(Slot::A, 0.1);
        assert!(timers.clear(Slot::A));
        assert!(!timers.clear(Slot::A));
        assert!(timers.advance(1.0).is_empty());
    }
}
