//! Combo state machine (orchestrator).
//!
//! # States
//!
//! ```text
//! Idle --attack--> Executing(1, Startup)
//! Executing(n, _) --Input_Start--> Buffering --Combo_Point--> Advanceable --Can_Move--> Cancelable
//! Advanceable + buffered advance --> Executing(n + 1, Startup) | Idle (chain ends)
//! Cancelable + axis --> Idle
//! clip complete | gate closed --> Idle
//! ```
//!
//! Machine is pure: folded over an ordered list of [`ComboEvent`]s, it never
//! reads ambient state. Commands for the animation/movement/hook layers go
//! through a [`ComboOutput`] sink.

use bevy::prelude::*;

use super::buffer::InputBuffer;
use super::graph::{is_reverse_input, AttackGraph, BranchContext, ComboSlot, ComboStep, MovementEffect};
use super::systems::ComboEventQueue;
use super::window::{ComboPhase, Marker, TimelineWindow, WindowPermissions};

// ============================================================================
// Collaborator ports
// ============================================================================

/// Player input source (polled once per tick).
pub trait InputSource {
    fn attack_pressed_this_tick(&self) -> bool;
    fn jump_pressed_this_tick(&self) -> bool;
    /// Horizontal axis in [-1, 1]
    fn horizontal_axis(&self) -> f32;
    fn is_facing_right(&self) -> bool;
}

/// Liveness + global movement permission.
pub trait LifeGate {
    fn is_alive_and_movement_allowed(&self) -> bool;
}

impl LifeGate for bool {
    fn is_alive_and_movement_allowed(&self) -> bool {
        *self
    }
}

/// Snapshot of the input source and gate taken at tick start.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct InputSample {
    pub attack_pressed: bool,
    pub jump_pressed: bool,
    pub horizontal_axis: f32,
    pub facing_right: bool,
    pub gate_open: bool,
}

impl Default for InputSample {
    fn default() -> Self {
        Self {
            attack_pressed: false,
            jump_pressed: false,
            horizontal_axis: 0.0,
            facing_right: true,
            gate_open: true,
        }
    }
}

impl InputSample {
    pub fn poll(input: &impl InputSource, gate: &impl LifeGate) -> Self {
        Self {
            attack_pressed: input.attack_pressed_this_tick(),
            jump_pressed: input.jump_pressed_this_tick(),
            horizontal_axis: input.horizontal_axis().clamp(-1.0, 1.0),
            facing_right: input.is_facing_right(),
            gate_open: gate.is_alive_and_movement_allowed(),
        }
    }
}

/// One entry of the per-tick ordered queue.
#[derive(Debug, Clone, PartialEq)]
pub enum ComboEvent {
    Input(InputSample),
    Marker { clip: String, marker: String },
    Completed { clip: String, looping: bool },
}

/// Why the machine went back to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ResetReason {
    /// Entity died or movement was disallowed
    Interrupted,
    /// Movement input during the Cancelable window
    MovementCancel,
    /// Advance requested after the last step
    ChainCompleted,
    /// Tracked clip finished playing
    ClipFinished,
}

/// Sink for everything the machine asks of its collaborators.
pub trait ComboOutput {
    fn play(&mut self, clip: &str, looping: bool);
    fn attack_move(&mut self, clip: &str, effect: MovementEffect);
    fn hit_check(&mut self, clip: &str);
    fn combo_ended(&mut self, _last_step: u8, _reason: ResetReason) {}
}

/// Recorded output, used by tests and the headless driver.
#[derive(Debug, Clone, PartialEq)]
pub enum ComboCommand {
    Play { clip: String, looping: bool },
    AttackMove { clip: String, effect: MovementEffect },
    HitCheck { clip: String },
    Ended { last_step: u8, reason: ResetReason },
}

impl ComboOutput for Vec<ComboCommand> {
    fn play(&mut self, clip: &str, looping: bool) {
        self.push(ComboCommand::Play { clip: clip.to_string(), looping });
    }

    fn attack_move(&mut self, clip: &str, effect: MovementEffect) {
        self.push(ComboCommand::AttackMove { clip: clip.to_string(), effect });
    }

    fn hit_check(&mut self, clip: &str) {
        self.push(ComboCommand::HitCheck { clip: clip.to_string() });
    }

    fn combo_ended(&mut self, last_step: u8, reason: ResetReason) {
        self.push(ComboCommand::Ended { last_step, reason });
    }
}

// ============================================================================
// Machine
// ============================================================================

/// Observable machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboState {
    Idle,
    Executing { step: u8, phase: ComboPhase },
}

/// Per-entity combo state machine. Owns runtime state and input buffer exclusively.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
#[require(ComboEventQueue)]
pub struct ComboStateMachine {
    /// 0 = idle
    step: u8,
    window: TimelineWindow,
    buffer: InputBuffer,
    air_branch: bool,
    /// Clip this machine started last; markers from other clips are stale
    current_clip: Option<String>,
    /// Latest input sample (axis/facing consulted at branch decisions)
    last_sample: InputSample,
}

impl ComboStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    pub fn is_attacking(&self) -> bool {
        self.step > 0
    }

    pub fn current_combo_step(&self) -> u8 {
        self.step
    }

    pub fn state(&self) -> ComboState {
        if self.is_attacking() {
            ComboState::Executing {
                step: self.step,
                phase: self.window.phase(),
            }
        } else {
            ComboState::Idle
        }
    }

    pub fn phase(&self) -> Option<ComboPhase> {
        self.is_attacking().then(|| self.window.phase())
    }

    pub fn permissions(&self) -> WindowPermissions {
        if self.is_attacking() {
            self.window.permissions()
        } else {
            WindowPermissions::default()
        }
    }

    pub fn air_branch(&self) -> bool {
        self.air_branch
    }

    pub fn buffer(&self) -> InputBuffer {
        self.buffer
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.current_clip.as_deref()
    }

    // --- Event folding ---

    /// Fold an ordered event list into the machine.
    pub fn fold<'a>(
        &mut self,
        graph: &AttackGraph,
        events: impl IntoIterator<Item = &'a ComboEvent>,
        out: &mut impl ComboOutput,
    ) {
        for event in events {
            self.handle(graph, event, out);
        }
    }

    pub fn handle(&mut self, graph: &AttackGraph, event: &ComboEvent, out: &mut impl ComboOutput) {
        match event {
            ComboEvent::Input(sample) => self.on_input(graph, *sample, out),
            ComboEvent::Marker { clip, marker } => self.on_marker(graph, clip, marker, out),
            ComboEvent::Completed { clip, looping } => self.on_completed(clip, *looping, out),
        }
    }

    fn on_input(&mut self, graph: &AttackGraph, sample: InputSample, out: &mut impl ComboOutput) {
        self.last_sample = sample;

        if !sample.gate_open {
            self.reset(ResetReason::Interrupted, out);
            return;
        }

        if sample.attack_pressed {
            self.on_attack_pressed(graph, out);
        }

        // Прыжок нужен только для ветки B4: буферизуем лишь на третьем шаге
        if sample.jump_pressed && self.step == 3 {
            self.buffer.buffer_jump();
        }

        if self.is_attacking()
            && self.window.permissions().can_movement_cancel
            && sample.horizontal_axis.abs() > graph.axis_deadzone()
        {
            self.reset(ResetReason::MovementCancel, out);
        }
    }

    fn on_attack_pressed(&mut self, graph: &AttackGraph, out: &mut impl ComboOutput) {
        if !self.is_attacking() {
            self.start_combo(graph, out);
            return;
        }

        let permissions = self.window.permissions();
        if !permissions.can_buffer_advance {
            // Startup / Cancelable: silent no-op
            return;
        }

        self.buffer.buffer_advance();
        if permissions.can_advance_now {
            self.execute_advance(graph, out);
        }
    }

    fn on_marker(&mut self, graph: &AttackGraph, clip: &str, name: &str, out: &mut impl ComboOutput) {
        let Some(marker) = Marker::from_name(name) else {
            return;
        };
        if !self.is_attacking() || self.current_clip.as_deref() != Some(clip) {
            crate::logger::log(&format!("⏭️ Combo: stale marker {} from clip '{}' ignored", name, clip));
            return;
        }

        match marker {
            Marker::HitCheck => out.hit_check(clip),
            Marker::AttackMove => {
                let effect = graph.movement_for(clip);
                if !effect.is_none() {
                    out.attack_move(clip, effect);
                }
            }
            Marker::InputStart | Marker::ComboPoint | Marker::CanMove => {
                self.window.apply(marker);
                match marker {
                    Marker::ComboPoint if self.buffer.has_advance() => self.execute_advance(graph, out),
                    Marker::CanMove => self.buffer.clear_advance(),
                    _ => {}
                }
            }
        }
    }

    fn on_completed(&mut self, clip: &str, looping: bool, out: &mut impl ComboOutput) {
        // Looping клипы (idle/walk/run) тоже шлют complete — игнорируем
        if looping {
            return;
        }
        if self.is_attacking() && self.current_clip.as_deref() == Some(clip) {
            self.reset(ResetReason::ClipFinished, out);
        }
    }

    // --- Transitions ---

    fn start_combo(&mut self, graph: &AttackGraph, out: &mut impl ComboOutput) {
        self.buffer.clear();
        self.air_branch = false;
        self.step = 1;
        let first = graph.step(ComboSlot::First);
        self.play_step(first, out);
    }

    fn execute_advance(&mut self, graph: &AttackGraph, out: &mut impl ComboOutput) {
        if !self.buffer.take_advance() {
            return;
        }

        self.window.restart();
        self.step += 1;

        let ctx = match self.step {
            4 => {
                self.air_branch = self.buffer.take_jump();
                BranchContext {
                    air_branch: self.air_branch,
                    reverse_input: false,
                }
            }
            5 => BranchContext {
                air_branch: self.air_branch,
                reverse_input: is_reverse_input(
                    self.last_sample.facing_right,
                    self.last_sample.horizontal_axis,
                    graph.axis_deadzone(),
                ),
            },
            _ => BranchContext::default(),
        };

        match graph.resolve(self.step, ctx) {
            Some(next) => self.play_step(next, out),
            None => {
                // Пятый удар был последним
                self.step -= 1;
                self.reset(ResetReason::ChainCompleted, out);
            }
        }
    }

    fn play_step(&mut self, step: &ComboStep, out: &mut impl ComboOutput) {
        self.window.restart();
        self.current_clip = Some(step.clip.clone());
        out.play(&step.clip, false);

        crate::logger::log(&format!(
            "⚔️ Combo: step {} → '{}' (air branch: {})",
            step.step, step.clip, self.air_branch
        ));
    }

    /// Back to Idle. Idempotent: an idle machine is left untouched.
    pub fn reset(&mut self, reason: ResetReason, out: &mut impl ComboOutput) {
        if !self.is_attacking() {
            return;
        }

        let last_step = self.step;
        self.step = 0;
        self.window.restart();
        self.buffer.clear();
        self.air_branch = false;
        self.current_clip = None;
        out.combo_ended(last_step, reason);

        crate::logger::log(&format!("✅ Combo: ended after step {} ({:?})", last_step, reason));
    }
}
