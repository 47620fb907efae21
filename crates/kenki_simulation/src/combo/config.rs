//! Combo configuration (RON data file).
//!
//! Единственная внешняя конфигурация combo: имена клипов для фиксированной
//! топологии + таблица (clip → MovementEffect) + hit feedback по клипам.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::graph::MovementEffect;

/// Errors while reading or parsing a RON data file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {source}")]
    Parse {
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Clip names for the nine slots of the fixed topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboClips {
    pub first: String,
    pub second: String,
    pub third: String,
    pub ground_fourth: String,
    pub air_fourth: String,
    pub ground_forward_fifth: String,
    pub ground_reverse_fifth: String,
    pub air_forward_fifth: String,
    pub air_reverse_fifth: String,
}

impl Default for ComboClips {
    fn default() -> Self {
        Self {
            first: "J1".to_string(),
            second: "J2".to_string(),
            third: "J3".to_string(),
            ground_fourth: "A4".to_string(),
            air_fourth: "B4".to_string(),
            ground_forward_fifth: "AA5".to_string(),
            ground_reverse_fifth: "AB5".to_string(),
            air_forward_fifth: "BA5".to_string(),
            air_reverse_fifth: "BB5".to_string(),
        }
    }
}

impl ComboClips {
    /// All nine clip names, topology order.
    pub fn names(&self) -> [&str; 9] {
        [
            self.first.as_str(),
            self.second.as_str(),
            self.third.as_str(),
            self.ground_fourth.as_str(),
            self.air_fourth.as_str(),
            self.ground_forward_fifth.as_str(),
            self.ground_reverse_fifth.as_str(),
            self.air_forward_fifth.as_str(),
            self.air_reverse_fifth.as_str(),
        ]
    }
}

/// One row of the attack movement table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackMoveConfig {
    pub clip: String,
    pub effect: MovementEffect,
}

/// Camera shake request parameters (implementation lives in the camera layer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraShakeConfig {
    pub intensity: f32,
    pub duration: f32,
}

/// Fire-and-forget feedback for a clip's `Hit_Check` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitFeedbackConfig {
    pub clip: String,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub shake: Option<CameraShakeConfig>,
}

impl HitFeedbackConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(sound) = &self.sound {
            if sound.trim().is_empty() {
                return Err("sound cue is empty".to_string());
            }
        }
        if let Some(shake) = &self.shake {
            let valid = |v: f32| v.is_finite() && v >= 0.0;
            if !valid(shake.intensity) || !valid(shake.duration) {
                return Err("camera shake values must be finite and non-negative".to_string());
            }
        }
        Ok(())
    }
}

/// Whole combo configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    pub clips: ComboClips,
    pub moves: Vec<AttackMoveConfig>,
    pub hit_feedback: Vec<HitFeedbackConfig>,
    /// Axis magnitude below this is "no input" (movement cancel + reverse test)
    pub axis_deadzone: f32,
}

impl Default for ComboConfig {
    fn default() -> Self {
        let sound = |clip: &str| HitFeedbackConfig {
            clip: clip.to_string(),
            sound: Some(clip.to_string()),
            shake: None,
        };
        let shaking = |clip: &str, intensity: f32, duration: f32| HitFeedbackConfig {
            shake: Some(CameraShakeConfig { intensity, duration }),
            ..sound(clip)
        };

        Self {
            clips: ComboClips::default(),
            moves: Vec::new(),
            hit_feedback: vec![
                sound("J1"),
                shaking("J2", 0.05, 0.05),
                sound("J3"),
                shaking("A4", 0.08, 0.07),
            ],
            axis_deadzone: 0.1,
        }
    }
}

impl ComboConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        ron::from_str(source).map_err(|source| ConfigError::Parse { source })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }
}
