//! Montage requests.
//!
//! Characters ask the animation system to play a section of a montage and
//! never wait for a result. Completion, where it matters (reloads, deaths),
//! comes back as an explicit call on the character.

use outbreak_common::EntityId;
use serde::{Deserialize, Serialize};

/// Montage assets a character can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Montage {
    /// Survivor hip fire.
    HipFire,
    /// Survivor reload.
    Reload,
    /// Survivor death.
    SurvivorDeath,
    /// Enemy hit reaction.
    HitReact,
    /// Enemy melee attack.
    Attack,
    /// Enemy death.
    EnemyDeath,
}

/// A request to play a montage section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MontageRequest {
    /// Character playing it.
    pub actor: EntityId,
    /// Montage asset.
    pub montage: Montage,
    /// Section to jump to (None plays from the start).
    pub section: Option<String>,
    /// Play rate.
    pub rate: f32,
}

impl MontageRequest {
    /// Play `montage` from the start at normal rate.
    #[must_use]
    pub fn new(actor: EntityId, montage: Montage) -> Self {
        Self {
            actor,
            montage,
            section: None,
            rate: 1.0,
        }
    }

    /// Jump to a named section.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Set play rate.
    #[must_use]
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }
}

/// Receives montage requests. Fire-and-forget.
pub trait AnimationSink {
    /// Play a montage section.
    fn play_montage(&mut self, request: MontageRequest);
}

/// Drops every request (headless hosts with no animation).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnimation;

impl AnimationSink for NoAnimation {
    fn play_montage(&mut self, _request: MontageRequest) {}
}

/// Keeps every request, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordedAnimation {
    /// Requests received so far.
    pub requests: Vec<MontageRequest>,
}

impl RecordedAnimation {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests for one montage.
    pub fn of(&self, montage: Montage) -> impl Iterator<Item = &MontageRequest> + '_ {
        self.requests.iter().filter(move |r| r.montage == montage)
    }

    /// Forget recorded requests.
    pub fn clear(&mut self) {
        self.requests.clear();
    }
}

impl AnimationSink for RecordedAnimation {
    fn play_montage(&mut self, request: MontageRequest) {
        self.requests.push(request);
    }
}
