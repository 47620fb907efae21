//! Clip timelines: length, looping, named markers (RON data file).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::combo::{ConfigError, Marker};

/// Named marker at a point of the clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct TimelineMarker {
    /// Seconds from clip start
    pub time: f32,
    pub name: String,
}

impl TimelineMarker {
    pub fn new(time: f32, name: impl Into<String>) -> Self {
        Self {
            time,
            name: name.into(),
        }
    }
}

/// One clip as the headless animator plays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct ClipTimeline {
    /// Seconds
    pub length: f32,
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub markers: Vec<TimelineMarker>,
}

impl ClipTimeline {
    pub fn new(length: f32, looping: bool, mut markers: Vec<TimelineMarker>) -> Self {
        markers.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            length,
            looping,
            markers,
        }
    }

    /// Attack clip with the usual marker layout (fractions of `length`).
    pub fn attack(length: f32) -> Self {
        let at = |fraction: f32, marker: Marker| TimelineMarker::new(length * fraction, marker.name());
        Self::new(
            length,
            false,
            vec![
                at(0.2, Marker::AttackMove),
                at(0.3, Marker::HitCheck),
                at(0.35, Marker::InputStart),
                at(0.6, Marker::ComboPoint),
                at(0.8, Marker::CanMove),
            ],
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(format!("length {} must be positive", self.length));
        }
        for marker in &self.markers {
            if !(0.0..=self.length).contains(&marker.time) {
                return Err(format!(
                    "marker '{}' at {} is outside [0, {}]",
                    marker.name, marker.time, self.length
                ));
            }
        }
        Ok(())
    }

    /// Markers with `from < time <= to` (`from` inclusive when `include_start`), authored order.
    pub fn markers_between(&self, from: f32, to: f32, include_start: bool) -> impl Iterator<Item = &TimelineMarker> {
        self.markers.iter().filter(move |m| {
            let after_start = if include_start { m.time >= from } else { m.time > from };
            after_start && m.time <= to
        })
    }
}

/// Clip name → timeline.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipLibrary {
    clips: HashMap<String, ClipTimeline>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, name: impl Into<String>, timeline: ClipTimeline) -> Self {
        self.insert(name, timeline);
        self
    }

    /// Same attack layout for every clip name.
    pub fn attack_clips<'a>(names: impl IntoIterator<Item = &'a str>, length: f32) -> Self {
        let mut library = Self::new();
        for name in names {
            library.insert(name, ClipTimeline::attack(length));
        }
        library
    }

    pub fn insert(&mut self, name: impl Into<String>, mut timeline: ClipTimeline) {
        timeline.markers.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.clips.insert(name.into(), timeline);
    }

    pub fn get(&self, name: &str) -> Option<&ClipTimeline> {
        self.clips.get(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let parsed: Self = ron::from_str(source).map_err(|source| ConfigError::Parse { source })?;

        let mut library = Self::new();
        for (name, timeline) in parsed.clips {
            timeline
                .validate()
                .map_err(|reason| ConfigError::Invalid(format!("clip '{}': {}", name, reason)))?;
            library.insert(name, timeline);
        }
        Ok(library)
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
