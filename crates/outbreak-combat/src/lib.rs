//! # Outbreak Combat
//!
//! Combat resource and state-transition core for Project Outbreak.
//!
//! This crate provides everything a survivor and the zombies fighting it need,
//! independent of any engine:
//! - Ammo ledger and weapon magazines
//! - Weapon table loaded from RON
//! - Six-slot weapon inventory with swap and exchange
//! - Fire/reload state machine with auto-fire and auto-reload
//! - Health, death, stun rolls and hit reactions
//! - Enemy blackboard facts for the decision process
//! - Timers, montage requests, random rolls and the event bus
//! - An encounter loop that plays the role of the world

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ammo;
pub mod animation;
pub mod blackboard;
pub mod combat_state;
pub mod config;
pub mod encounter;
pub mod enemy;
pub mod events;
pub mod health;
pub mod hit_react;
pub mod inventory;
pub mod rng;
pub mod survivor;
pub mod timers;
pub mod weapon;
pub mod weapon_table;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ammo::*;
    pub use crate::animation::*;
    pub use crate::blackboard::*;
    pub use crate::combat_state::*;
    pub use crate::config::*;
    pub use crate::encounter::*;
    pub use crate::enemy::*;
    pub use crate::events::*;
    pub use crate::health::*;
    pub use crate::hit_react::*;
    pub use crate::inventory::*;
    pub use crate::rng::*;
    pub use crate::survivor::*;
    pub use crate::timers::*;
    pub use crate::weapon::*;
    pub use crate::weapon_table::*;
}

pub use prelude::*;

mod e2e_tests;
