//! Attack graph: combo tree definition (static data).
//!
//! Fixed topology, clip names and movement effects come from [`ComboConfig`]:
//!
//! ```text
//! 1 → 2 → 3 ─┬─ (no jump) ground 4 ─┬─ forward → ground forward 5
//!            │                       └─ reverse → ground reverse 5
//!            └─ (jump)    air 4    ─┬─ forward → air forward 5
//!                                   └─ reverse → air reverse 5
//! ```
//!
//! Step 6 does not exist: advancing past the fifth step ends the chain.
//! Graph is validated once in [`AttackGraph::from_config`] and is read-only
//! afterwards (Bevy `Resource`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::config::{ComboClips, ComboConfig};

/// Deepest step of every path through the graph.
pub const MAX_COMBO_STEP: u8 = 5;

// ============================================================================
// Movement effects
// ============================================================================

/// How an attack repositions its owner when `Attack_Move` fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum MoveKind {
    #[default]
    None,
    /// Full offset applied in one step
    Instant,
    /// Linear interpolation over `duration` seconds
    Smooth,
}

/// Positional offset along the facing axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Reflect)]
pub struct MovementEffect {
    #[serde(default)]
    pub kind: MoveKind,
    /// Meters along facing (negative = step back)
    #[serde(default)]
    pub distance: f32,
    /// Seconds, only meaningful for `Smooth`
    #[serde(default)]
    pub duration: f32,
}

impl MovementEffect {
    pub const NONE: Self = Self {
        kind: MoveKind::None,
        distance: 0.0,
        duration: 0.0,
    };

    pub fn instant(distance: f32) -> Self {
        Self {
            kind: MoveKind::Instant,
            distance,
            duration: 0.0,
        }
    }

    pub fn smooth(distance: f32, duration: f32) -> Self {
        Self {
            kind: MoveKind::Smooth,
            distance,
            duration,
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == MoveKind::None
    }
}

// ============================================================================
// Steps and slots
// ============================================================================

/// Position in the fixed topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ComboSlot {
    First,
    Second,
    Third,
    GroundFourth,
    AirFourth,
    GroundForwardFifth,
    GroundReverseFifth,
    AirForwardFifth,
    AirReverseFifth,
}

impl ComboSlot {
    pub const ALL: [ComboSlot; 9] = [
        ComboSlot::First,
        ComboSlot::Second,
        ComboSlot::Third,
        ComboSlot::GroundFourth,
        ComboSlot::AirFourth,
        ComboSlot::GroundForwardFifth,
        ComboSlot::GroundReverseFifth,
        ComboSlot::AirForwardFifth,
        ComboSlot::AirReverseFifth,
    ];

    /// 1-based step index of the slot.
    pub fn step(self) -> u8 {
        match self {
            ComboSlot::First => 1,
            ComboSlot::Second => 2,
            ComboSlot::Third => 3,
            ComboSlot::GroundFourth | ComboSlot::AirFourth => 4,
            ComboSlot::GroundForwardFifth
            | ComboSlot::GroundReverseFifth
            | ComboSlot::AirForwardFifth
            | ComboSlot::AirReverseFifth => 5,
        }
    }

    /// Config field name (used in validation errors).
    pub fn name(self) -> &'static str {
        match self {
            ComboSlot::First => "first",
            ComboSlot::Second => "second",
            ComboSlot::Third => "third",
            ComboSlot::GroundFourth => "ground_fourth",
            ComboSlot::AirFourth => "air_fourth",
            ComboSlot::GroundForwardFifth => "ground_forward_fifth",
            ComboSlot::GroundReverseFifth => "ground_reverse_fifth",
            ComboSlot::AirForwardFifth => "air_forward_fifth",
            ComboSlot::AirReverseFifth => "air_reverse_fifth",
        }
    }

    fn index(self) -> usize {
        match self {
            ComboSlot::First => 0,
            ComboSlot::Second => 1,
            ComboSlot::Third => 2,
            ComboSlot::GroundFourth => 3,
            ComboSlot::AirFourth => 4,
            ComboSlot::GroundForwardFifth => 5,
            ComboSlot::GroundReverseFifth => 6,
            ComboSlot::AirForwardFifth => 7,
            ComboSlot::AirReverseFifth => 8,
        }
    }
}

/// One attack clip in the chain.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ComboStep {
    pub clip: String,
    pub step: u8,
    pub movement: MovementEffect,
}

// ============================================================================
// Branch resolution (pure)
// ============================================================================

/// Inputs sampled at the moment a branch is decided.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BranchContext {
    /// Step 4: jump was buffered during step 3. Step 5: air branch was taken at step 4.
    pub air_branch: bool,
    /// Step 5 only: held axis opposes facing
    pub reverse_input: bool,
}

/// True iff the held axis points against the facing direction (beyond the dead zone).
pub fn is_reverse_input(facing_right: bool, axis: f32, deadzone: f32) -> bool {
    if facing_right {
        axis < -deadzone
    } else {
        axis > deadzone
    }
}

/// Slot reached by advancing *into* `next_step`. `None` = chain ends.
pub fn resolve_slot(next_step: u8, ctx: BranchContext) -> Option<ComboSlot> {
    match next_step {
        1 => Some(ComboSlot::First),
        2 => Some(ComboSlot::Second),
        3 => Some(ComboSlot::Third),
        4 if ctx.air_branch => Some(ComboSlot::AirFourth),
        4 => Some(ComboSlot::GroundFourth),
        5 => Some(match (ctx.air_branch, ctx.reverse_input) {
            (false, false) => ComboSlot::GroundForwardFifth,
            (false, true) => ComboSlot::GroundReverseFifth,
            (true, false) => ComboSlot::AirForwardFifth,
            (true, true) => ComboSlot::AirReverseFifth,
        }),
        _ => None,
    }
}

// ============================================================================
// Graph
// ============================================================================

/// Configuration defects found while building the graph.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("combo slot '{slot}' has no clip name")]
    MissingClip { slot: &'static str },

    #[error("movement entry for clip '{clip}' does not match any combo step")]
    UnknownMoveClip { clip: String },

    #[error("clip '{clip}' has more than one movement entry")]
    DuplicateMove { clip: String },

    #[error("invalid movement for clip '{clip}': {reason}")]
    InvalidMove { clip: String, reason: String },

    #[error("invalid hit feedback for clip '{clip}': {reason}")]
    InvalidFeedback { clip: String, reason: String },

    #[error("axis deadzone {0} is outside [0, 1)")]
    InvalidDeadzone(f32),
}

/// Validated combo tree.
#[derive(Resource, Debug, Clone)]
pub struct AttackGraph {
    steps: Vec<ComboStep>,
    moves: HashMap<String, MovementEffect>,
    axis_deadzone: f32,
}

impl AttackGraph {
    pub fn from_config(config: &ComboConfig) -> Result<Self, GraphError> {
        let result = Self::build(config);
        if let Err(err) = &result {
            crate::logger::log_error(&format!("❌ Combo config rejected: {}", err));
        }
        result
    }

    fn build(config: &ComboConfig) -> Result<Self, GraphError> {
        if !(0.0..1.0).contains(&config.axis_deadzone) {
            return Err(GraphError::InvalidDeadzone(config.axis_deadzone));
        }

        let clips = &config.clips;
        let mut names = Vec::with_capacity(ComboSlot::ALL.len());
        for slot in ComboSlot::ALL {
            let clip = clip_for(clips, slot);
            if clip.trim().is_empty() {
                return Err(GraphError::MissingClip { slot: slot.name() });
            }
            names.push(clip.to_string());
        }
        let known: HashSet<&str> = names.iter().map(String::as_str).collect();

        let mut moves = HashMap::new();
        for entry in &config.moves {
            if !known.contains(entry.clip.as_str()) {
                return Err(GraphError::UnknownMoveClip {
                    clip: entry.clip.clone(),
                });
            }
            validate_move(&entry.clip, &entry.effect)?;
            if moves.insert(entry.clip.clone(), entry.effect).is_some() {
                return Err(GraphError::DuplicateMove {
                    clip: entry.clip.clone(),
                });
            }
        }

        for feedback in &config.hit_feedback {
            feedback.validate().map_err(|reason| GraphError::InvalidFeedback {
                clip: feedback.clip.clone(),
                reason,
            })?;
        }

        let steps = ComboSlot::ALL
            .iter()
            .zip(names)
            .map(|(slot, clip)| ComboStep {
                movement: moves.get(&clip).copied().unwrap_or_default(),
                clip,
                step: slot.step(),
            })
            .collect();

        Ok(Self {
            steps,
            moves,
            axis_deadzone: config.axis_deadzone,
        })
    }

    pub fn step(&self, slot: ComboSlot) -> &ComboStep {
        &self.steps[slot.index()]
    }

    /// Next step after advancing into `next_step`, `None` when the chain ends.
    pub fn resolve(&self, next_step: u8, ctx: BranchContext) -> Option<&ComboStep> {
        resolve_slot(next_step, ctx).map(|slot| self.step(slot))
    }

    /// Movement effect for a clip name (`Attack_Move` dispatch).
    pub fn movement_for(&self, clip: &str) -> MovementEffect {
        self.moves.get(clip).copied().unwrap_or_default()
    }

    pub fn axis_deadzone(&self) -> f32 {
        self.axis_deadzone
    }
}

fn clip_for(clips: &ComboClips, slot: ComboSlot) -> &str {
    match slot {
        ComboSlot::First => &clips.first,
        ComboSlot::Second => &clips.second,
        ComboSlot::Third => &clips.third,
        ComboSlot::GroundFourth => &clips.ground_fourth,
        ComboSlot::AirFourth => &clips.air_fourth,
        ComboSlot::GroundForwardFifth => &clips.ground_forward_fifth,
        ComboSlot::GroundReverseFifth => &clips.ground_reverse_fifth,
        ComboSlot::AirForwardFifth => &clips.air_forward_fifth,
        ComboSlot::AirReverseFifth => &clips.air_reverse_fifth,
    }
}

fn validate_move(clip: &str, effect: &MovementEffect) -> Result<(), GraphError> {
    let invalid = |reason: &str| GraphError::InvalidMove {
        clip: clip.to_string(),
        reason: reason.to_string(),
    };

    if !effect.distance.is_finite() {
        return Err(invalid("distance is not finite"));
    }
    if effect.kind == MoveKind::Smooth && !(effect.duration.is_finite() && effect.duration > 0.0) {
        return Err(invalid("smooth move needs a positive duration"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::config::AttackMoveConfig;

    #[test]
    fn test_linear_steps() {
        let ctx = BranchContext::default();
        assert_eq!(resolve_slot(1, ctx), Some(ComboSlot::First));
        assert_eq!(resolve_slot(2, ctx), Some(ComboSlot::Second));
        assert_eq!(resolve_slot(3, ctx), Some(ComboSlot::Third));
    }

    #[test]
    fn test_branch_table() {
        let air = BranchContext { air_branch: true, reverse_input: false };
        let air_rev = BranchContext { air_branch: true, reverse_input: true };
        let ground_rev = BranchContext { air_branch: false, reverse_input: true };

        assert_eq!(resolve_slot(4, BranchContext::default()), Some(ComboSlot::GroundFourth));
        assert_eq!(resolve_slot(4, air), Some(ComboSlot::AirFourth));
        assert_eq!(resolve_slot(5, BranchContext::default()), Some(ComboSlot::GroundForwardFifth));
        assert_eq!(resolve_slot(5, ground_rev), Some(ComboSlot::GroundReverseFifth));
        assert_eq!(resolve_slot(5, air), Some(ComboSlot::AirForwardFifth));
        assert_eq!(resolve_slot(5, air_rev), Some(ComboSlot::AirReverseFifth));
    }

    #[test]
    fn test_chain_ends_after_fifth() {
        assert_eq!(resolve_slot(MAX_COMBO_STEP + 1, BranchContext::default()), None);
        assert_eq!(resolve_slot(0, BranchContext::default()), None);
        for slot in ComboSlot::ALL {
            assert!(slot.step() <= MAX_COMBO_STEP);
        }
    }

    #[test]
    fn test_reverse_input() {
        // Смотрим вправо, держим влево → reverse
        assert!(is_reverse_input(true, -1.0, 0.1));
        assert!(!is_reverse_input(true, 1.0, 0.1));
        assert!(is_reverse_input(false, 0.5, 0.1));
        assert!(!is_reverse_input(false, -0.5, 0.1));
        // Dead zone
        assert!(!is_reverse_input(true, -0.05, 0.1));
        assert!(!is_reverse_input(false, 0.0, 0.1));
    }

    #[test]
    fn test_graph_from_default_config() {
        let graph = AttackGraph::from_config(&ComboConfig::default()).unwrap();

        assert_eq!(graph.step(ComboSlot::First).clip, "J1");
        assert_eq!(graph.step(ComboSlot::AirFourth).clip, "B4");
        assert_eq!(graph.step(ComboSlot::AirReverseFifth).step, 5);
        assert_eq!(graph.resolve(4, BranchContext::default()).unwrap().clip, "A4");
        assert!(graph.resolve(6, BranchContext::default()).is_none());
    }

    #[test]
    fn test_movement_lookup_by_clip() {
        let mut config = ComboConfig::default();
        config.moves = vec![AttackMoveConfig {
            clip: "J2".to_string(),
            effect: MovementEffect::smooth(1.5, 0.2),
        }];
        let graph = AttackGraph::from_config(&config).unwrap();

        assert_eq!(graph.movement_for("J2"), MovementEffect::smooth(1.5, 0.2));
        assert_eq!(graph.step(ComboSlot::Second).movement.kind, MoveKind::Smooth);
        assert!(graph.movement_for("J1").is_none());
        assert!(graph.movement_for("walk").is_none());
    }

    #[test]
    fn test_missing_clip_rejected() {
        let mut config = ComboConfig::default();
        config.clips.air_fourth = "  ".to_string();

        assert_eq!(
            AttackGraph::from_config(&config).unwrap_err(),
            GraphError::MissingClip { slot: "air_fourth" }
        );
    }

    #[test]
    fn test_bad_move_entries_rejected() {
        let mut config = ComboConfig::default();
        config.moves = vec![AttackMoveConfig {
            clip: "run".to_string(),
            effect: MovementEffect::instant(1.0),
        }];
        assert!(matches!(
            AttackGraph::from_config(&config),
            Err(GraphError::UnknownMoveClip { .. })
        ));

        config.moves = vec![
            AttackMoveConfig { clip: "J1".to_string(), effect: MovementEffect::instant(1.0) },
            AttackMoveConfig { clip: "J1".to_string(), effect: MovementEffect::instant(2.0) },
        ];
        assert!(matches!(
            AttackGraph::from_config(&config),
            Err(GraphError::DuplicateMove { .. })
        ));

        config.moves = vec![AttackMoveConfig {
            clip: "J3".to_string(),
            effect: MovementEffect::smooth(1.0, 0.0),
        }];
        assert!(matches!(
            AttackGraph::from_config(&config),
            Err(GraphError::InvalidMove { .. })
        ));

        config.moves = vec![AttackMoveConfig {
            clip: "J3".to_string(),
            effect: MovementEffect::instant(f32::NAN),
        }];
        assert!(matches!(
            AttackGraph::from_config(&config),
            Err(GraphError::InvalidMove { .. })
        ));
    }

    #[test]
    fn test_deadzone_rejected() {
        let mut config = ComboConfig::default();
        config.axis_deadzone = 1.0;
        assert_eq!(
            AttackGraph::from_config(&config).unwrap_err(),
            GraphError::InvalidDeadzone(1.0)
        );
    }
}
