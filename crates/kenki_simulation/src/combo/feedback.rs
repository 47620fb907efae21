//! Hit feedback hooks (sound cue + camera shake per clip).
//!
//! Fire-and-forget: ECS только публикует запросы, проигрывание звука и тряска
//! камеры живут в presentation слое.

use bevy::prelude::*;
use std::collections::HashMap;

use super::config::{CameraShakeConfig, HitFeedbackConfig};
use super::events::ComboHitCheck;

/// Request: play a one-shot sound at the entity.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SoundCue {
    pub entity: Entity,
    pub cue: String,
}

/// Request: shake the camera.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CameraShake {
    pub intensity: f32,
    pub duration: f32,
}

impl From<CameraShakeConfig> for CameraShake {
    fn from(config: CameraShakeConfig) -> Self {
        Self {
            intensity: config.intensity,
            duration: config.duration,
        }
    }
}

/// Clip → feedback lookup.
#[derive(Resource, Debug, Clone, Default)]
pub struct HitFeedbackTable {
    entries: HashMap<String, HitFeedbackConfig>,
}

impl HitFeedbackTable {
    /// Later entries for the same clip win.
    pub fn new(entries: impl IntoIterator<Item = HitFeedbackConfig>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.clip.clone(), e)).collect(),
        }
    }

    pub fn get(&self, clip: &str) -> Option<&HitFeedbackConfig> {
        self.entries.get(clip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Система: ComboHitCheck → SoundCue / CameraShake
///
/// Клипы без записи в таблице ничего не шлют.
pub fn dispatch_hit_feedback(
    mut hits: EventReader<ComboHitCheck>,
    table: Res<HitFeedbackTable>,
    mut sounds: EventWriter<SoundCue>,
    mut shakes: EventWriter<CameraShake>,
) {
    for hit in hits.read() {
        let Some(feedback) = table.get(&hit.clip) else {
            continue;
        };

        if let Some(cue) = &feedback.sound {
            sounds.write(SoundCue {
                entity: hit.entity,
                cue: cue.clone(),
            });
        }
        if let Some(shake) = feedback.shake {
            shakes.write(shake.into());
        }
    }
}
