//! Event bus for combat notifications.
//!
//! Characters publish what happened; hosts (HUD, logs, the simulator summary)
//! drain the bus once per frame.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use outbreak_common::EntityId;

use crate::ammo::AmmoType;
use crate::enemy::AttackSection;

/// Events that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A round left the barrel
    ShotFired {
        /// Shooting character
        shooter: EntityId,
        /// Weapon fired
        weapon: EntityId,
        /// Rounds left in the magazine
        ammo_left: u32,
    },
    /// Reload montage started
    ReloadStarted {
        /// Reloading character
        character: EntityId,
        /// Weapon being reloaded
        weapon: EntityId,
    },
    /// Rounds moved from the ledger into the magazine
    ReloadFinished {
        /// Reloading character
        character: EntityId,
        /// Weapon reloaded
        weapon: EntityId,
        /// Rounds loaded
        loaded: u32,
        /// Rounds of that type still carried
        carried_left: u32,
    },
    /// Weapon put into an inventory slot
    WeaponStored {
        /// Owner
        character: EntityId,
        /// Weapon
        weapon: EntityId,
        /// Slot index
        slot: usize,
    },
    /// Weapon attached to the hand socket
    WeaponEquipped {
        /// Owner
        character: EntityId,
        /// Weapon
        weapon: EntityId,
        /// Slot index
        slot: usize,
        /// Socket the weapon is attached to
        socket: String,
    },
    /// Weapon dropped into the world
    WeaponDropped {
        /// Previous owner
        character: EntityId,
        /// Weapon
        weapon: EntityId,
    },
    /// A dropped weapon settled and can be picked up again
    WeaponLanded {
        /// Weapon
        weapon: EntityId,
    },
    /// Ammo box picked up
    AmmoPickedUp {
        /// Character
        character: EntityId,
        /// Ammo type
        ammo_type: AmmoType,
        /// Rounds added
        count: u32,
    },
    /// Entity took damage
    Damaged {
        /// Entity hit
        target: EntityId,
        /// Damage applied
        amount: f32,
        /// Source entity (if any)
        source: Option<EntityId>,
        /// Health left
        remaining: f32,
    },
    /// Entity died
    Died {
        /// Entity
        entity: EntityId,
        /// Entity that landed the killing blow (if any)
        killer: Option<EntityId>,
    },
    /// Enemy stun state changed
    StunChanged {
        /// Enemy
        enemy: EntityId,
        /// New stun state
        stunned: bool,
    },
    /// Enemy health bar visibility changed
    HealthBarChanged {
        /// Enemy
        enemy: EntityId,
        /// Whether the bar is shown
        visible: bool,
    },
    /// Enemy started a melee attack
    EnemyAttacked {
        /// Enemy
        enemy: EntityId,
        /// Montage section chosen
        section: AttackSection,
    },
    /// Entity removed from the world
    Despawned {
        /// Entity
        entity: EntityId,
    },
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<CombatEvent>,
    /// Receiver for collecting events
    receiver: Receiver<CombatEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: CombatEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<CombatEvent> {
        self.receiver.try_iter().collect()
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender(Some(self.sender.clone()))
    }
}

/// Publishing handle held by a character. A detached handle drops events.
#[derive(Debug, Clone, Default)]
pub struct EventSender(Option<Sender<CombatEvent>>);

impl EventSender {
    /// A handle that publishes nowhere.
    #[must_use]
    pub const fn detached() -> Self {
        Self(None)
    }

    /// Publish an event if attached.
    pub fn emit(&self, event: CombatEvent) {
        if let Some(sender) = &self.0 {
            let _ = sender.try_send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(4);
        let sender = bus.sender();
        sender.emit(CombatEvent::Despawned {
            entity: EntityId::from_raw(1),
        });
        bus.publish(CombatEvent::Despawned {
            entity: EntityId::from_raw(2),
        });

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_full_bus_drops() {
        let bus = EventBus::new(1);
        for raw in 0..3 {
            bus.publish(CombatEvent::Despawned {
                entity: EntityId::from_raw(raw),
            });
        }
        assert_eq!(bus.drain().len(), 1);
    }

    #[test]
    fn test_detached_sender_is_silent() {
        EventSender::detached().emit(CombatEvent::Despawned {
            entity: EntityId::NULL,
        });
    }
}
