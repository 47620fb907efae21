//! Combo events (ECS boundary).
//!
//! Входящие: AnimationSignal (markers + completions от animation слоя).
//! Исходящие: PlayClip, AttackMoveTriggered, ComboHitCheck, ComboEnded.

use bevy::prelude::*;

use super::graph::MovementEffect;
use super::machine::ResetReason;

/// Signal emitted by the animation layer for one entity.
///
/// Order of writes within a tick is the order the machine folds them in.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum AnimationSignal {
    /// Named marker crossed on `clip`
    Marker {
        entity: Entity,
        clip: String,
        marker: String,
    },
    /// `clip` played to its end
    Completed {
        entity: Entity,
        clip: String,
        looping: bool,
    },
}

impl AnimationSignal {
    pub fn entity(&self) -> Entity {
        match self {
            AnimationSignal::Marker { entity, .. } | AnimationSignal::Completed { entity, .. } => *entity,
        }
    }
}

/// Request: restart playback of `clip` on `entity`.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayClip {
    pub entity: Entity,
    pub clip: String,
    pub looping: bool,
}

/// Request: apply a displacement for the clip's `Attack_Move` marker.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AttackMoveTriggered {
    pub entity: Entity,
    pub clip: String,
    pub effect: MovementEffect,
}

/// `Hit_Check` reached: hit detection + feedback hooks.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ComboHitCheck {
    pub entity: Entity,
    pub clip: String,
}

/// Combo returned to Idle.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ComboEnded {
    pub entity: Entity,
    pub last_step: u8,
    pub reason: ResetReason,
}
