//! Combo domain: attack graph, timeline windows, input buffer, state machine.
//!
//! ECS ответственность:
//! - Combo rules: 5-step tree, branch selection, buffering windows
//! - Events: PlayClip / AttackMoveTriggered / ComboHitCheck / ComboEnded
//!
//! Animation слой (headless animator или движок) отвечает за playback
//! и шлёт AnimationSignal (markers + completions).

use bevy::prelude::*;

pub mod buffer;
pub mod config;
pub mod events;
pub mod feedback;
pub mod graph;
pub mod machine;
pub mod systems;
pub mod window;

#[cfg(test)]
mod systems_tests;

pub use buffer::InputBuffer;
pub use config::{AttackMoveConfig, CameraShakeConfig, ComboClips, ComboConfig, ConfigError, HitFeedbackConfig};
pub use events::{AnimationSignal, AttackMoveTriggered, ComboEnded, ComboHitCheck, PlayClip};
pub use feedback::{dispatch_hit_feedback, CameraShake, HitFeedbackTable, SoundCue};
pub use graph::{
    is_reverse_input, resolve_slot, AttackGraph, BranchContext, ComboSlot, ComboStep, GraphError, MoveKind,
    MovementEffect, MAX_COMBO_STEP,
};
pub use machine::{
    ComboCommand, ComboEvent, ComboOutput, ComboState, ComboStateMachine, InputSample, InputSource, LifeGate,
    ResetReason,
};
pub use systems::{
    queue_animation_signals, queue_player_input, run_combo_machines, ActorGate, ComboEventQueue, TickInput,
};
pub use window::{ComboPhase, Marker, TimelineWindow, WindowPermissions};

/// System sets of the combo tick (FixedUpdate).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboSet {
    /// Signals + input → per-entity queues, fold
    Machine,
    /// Movement executor + hit feedback
    Effects,
}

/// Combo Plugin
///
/// Граф валидируется один раз при создании plugin'а: битый конфиг
/// возвращается как GraphError, а не паникует посреди симуляции.
///
/// Порядок выполнения (FixedUpdate, `.chain()`):
/// 1. queue_animation_signals — markers/completions с прошлого тика
/// 2. queue_player_input — input sample этого тика
/// 3. run_combo_machines — fold → PlayClip/AttackMoveTriggered/ComboHitCheck/ComboEnded
/// 4. start_attack_moves, tick_attack_moves — movement executor
/// 5. dispatch_hit_feedback — sound/shake запросы
#[derive(Clone)]
pub struct ComboPlugin {
    graph: AttackGraph,
    feedback: HitFeedbackTable,
}

impl ComboPlugin {
    pub fn from_config(config: ComboConfig) -> Result<Self, GraphError> {
        let graph = AttackGraph::from_config(&config)?;
        Ok(Self {
            graph,
            feedback: HitFeedbackTable::new(config.hit_feedback),
        })
    }

    pub fn graph(&self) -> &AttackGraph {
        &self.graph
    }
}

impl Plugin for ComboPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.graph.clone())
            .insert_resource(self.feedback.clone())
            .init_resource::<crate::player::MovementPermission>()
            .register_type::<ComboStateMachine>()
            .register_type::<ComboEventQueue>();

        app.add_event::<AnimationSignal>()
            .add_event::<crate::player::PlayerInputEvent>()
            .add_event::<PlayClip>()
            .add_event::<AttackMoveTriggered>()
            .add_event::<ComboHitCheck>()
            .add_event::<ComboEnded>()
            .add_event::<SoundCue>()
            .add_event::<CameraShake>();

        app.configure_sets(FixedUpdate, (ComboSet::Machine, ComboSet::Effects).chain());

        app.add_systems(
            FixedUpdate,
            (
                (queue_animation_signals, queue_player_input, run_combo_machines)
                    .chain()
                    .in_set(ComboSet::Machine),
                (
                    crate::movement::start_attack_moves,
                    crate::movement::tick_attack_moves,
                    dispatch_hit_feedback,
                )
                    .chain()
                    .in_set(ComboSet::Effects),
            ),
        );

        crate::logger::log_info(&format!(
            "🗡️ ComboPlugin: graph ready (deadzone {:.2}, {} feedback entries)",
            self.graph.axis_deadzone(),
            self.feedback.len()
        ));
    }
}
