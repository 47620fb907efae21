//! Timeline windows: animation markers → permission state.
//!
//! Клип атаки размечен маркерами, которые делят его на окна:
//!
//! ```text
//! | Startup | Input_Start → Buffering | Combo_Point → Advanceable | Can_Move → Cancelable |
//! ```
//!
//! The tracker never looks at time. Marker stream = ground truth.

use bevy::prelude::*;

/// Named markers authored into attack clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Marker {
    HitCheck,
    InputStart,
    ComboPoint,
    CanMove,
    AttackMove,
}

impl Marker {
    pub const ALL: [Marker; 5] = [
        Marker::HitCheck,
        Marker::InputStart,
        Marker::ComboPoint,
        Marker::CanMove,
        Marker::AttackMove,
    ];

    /// Parse the marker name as emitted by the animation service.
    /// Unknown names are not ours and yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|marker| marker.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Marker::HitCheck => "Hit_Check",
            Marker::InputStart => "Input_Start",
            Marker::ComboPoint => "Combo_Point",
            Marker::CanMove => "Can_Move",
            Marker::AttackMove => "Attack_Move",
        }
    }
}

/// Window of the currently executing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ComboPhase {
    /// Clip just started, nothing permitted
    #[default]
    Startup,
    /// Attack input is buffered
    Buffering,
    /// Buffered advance executes immediately
    Advanceable,
    /// Movement may cancel the recovery, attack input ignored
    Cancelable,
}

/// Flags derived from the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct WindowPermissions {
    pub can_buffer_advance: bool,
    pub can_advance_now: bool,
    pub can_movement_cancel: bool,
}

impl ComboPhase {
    pub fn permissions(self) -> WindowPermissions {
        match self {
            ComboPhase::Startup => WindowPermissions::default(),
            ComboPhase::Buffering => WindowPermissions {
                can_buffer_advance: true,
                ..default()
            },
            ComboPhase::Advanceable => WindowPermissions {
                can_buffer_advance: true,
                can_advance_now: true,
                ..default()
            },
            ComboPhase::Cancelable => WindowPermissions {
                can_movement_cancel: true,
                ..default()
            },
        }
    }
}

/// Tracks the window of one playing clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct TimelineWindow {
    phase: ComboPhase,
}

impl TimelineWindow {
    pub fn phase(&self) -> ComboPhase {
        self.phase
    }

    pub fn permissions(&self) -> WindowPermissions {
        self.phase.permissions()
    }

    /// Apply a window marker. Returns the new phase for window markers,
    /// `None` for markers that do not move the window (`Hit_Check`, `Attack_Move`).
    pub fn apply(&mut self, marker: Marker) -> Option<ComboPhase> {
        let next = match marker {
            Marker::InputStart => ComboPhase::Buffering,
            Marker::ComboPoint => ComboPhase::Advanceable,
            Marker::CanMove => ComboPhase::Cancelable,
            Marker::HitCheck | Marker::AttackMove => return None,
        };
        self.phase = next;
        Some(next)
    }

    /// New clip started: back to Startup.
    pub fn restart(&mut self) {
        self.phase = ComboPhase::Startup;
    }
}
