//! Combo systems: signal/input queueing + machine folding.
//!
//! Порядок внутри тика: сначала markers/completions с прошлого тика (в порядке
//! эмиссии), затем input sample этого тика, затем fold.

use bevy::prelude::*;
use std::collections::HashMap;

use super::events::{AnimationSignal, AttackMoveTriggered, ComboEnded, ComboHitCheck, PlayClip};
use super::graph::AttackGraph;
use super::machine::{ComboCommand, ComboEvent, ComboStateMachine, InputSample, InputSource, LifeGate};
use crate::components::{Facing, Health};
use crate::player::{MovementPermission, PlayerInputEvent};

/// Ordered events waiting to be folded into the entity's machine this tick.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct ComboEventQueue {
    #[reflect(ignore)]
    events: Vec<ComboEvent>,
}

impl ComboEventQueue {
    pub fn push(&mut self, event: ComboEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, ComboEvent> {
        self.events.drain(..)
    }
}

/// Система: AnimationSignal → ComboEventQueue
///
/// Signals for entities without a machine are dropped.
pub fn queue_animation_signals(
    mut signals: EventReader<AnimationSignal>,
    mut queues: Query<&mut ComboEventQueue>,
) {
    for signal in signals.read() {
        let Ok(mut queue) = queues.get_mut(signal.entity()) else {
            continue;
        };

        let event = match signal {
            AnimationSignal::Marker { clip, marker, .. } => ComboEvent::Marker {
                clip: clip.clone(),
                marker: marker.clone(),
            },
            AnimationSignal::Completed { clip, looping, .. } => ComboEvent::Completed {
                clip: clip.clone(),
                looping: *looping,
            },
        };
        queue.push(event);
    }
}

/// Input этого тика для одной entity (edges + удерживаемая ось + facing).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub attack: bool,
    pub jump: bool,
    pub axis: f32,
    pub facing: Facing,
}

impl InputSource for TickInput {
    fn attack_pressed_this_tick(&self) -> bool {
        self.attack
    }

    fn jump_pressed_this_tick(&self) -> bool {
        self.jump
    }

    fn horizontal_axis(&self) -> f32 {
        self.axis
    }

    fn is_facing_right(&self) -> bool {
        self.facing.is_right()
    }
}

/// Gate view: здоровье entity (если есть) + глобальный MovementPermission.
#[derive(Debug, Clone, Copy)]
pub struct ActorGate<'a> {
    pub health: Option<&'a Health>,
    pub permission: &'a MovementPermission,
}

impl LifeGate for ActorGate<'_> {
    fn is_alive_and_movement_allowed(&self) -> bool {
        self.health.is_none_or(Health::is_alive) && self.permission.allowed
    }
}

/// Система: PlayerInputEvent + Facing + gate → один InputSample на entity
///
/// Edges (attack/jump) OR-ятся, ось берётся из последнего события.
/// Каждая машина получает sample каждый тик, даже без input (gate проверяется всегда).
pub fn queue_player_input(
    mut inputs: EventReader<PlayerInputEvent>,
    permission: Res<MovementPermission>,
    mut query: Query<(Entity, &mut ComboEventQueue, Option<&Facing>, Option<&Health>)>,
    mut held_axis: Local<HashMap<Entity, f32>>,
) {
    let mut pressed: HashMap<Entity, (bool, bool)> = HashMap::new();
    for input in inputs.read() {
        let edges = pressed.entry(input.entity).or_default();
        edges.0 |= input.attack;
        edges.1 |= input.jump;
        held_axis.insert(input.entity, input.move_axis.clamp(-1.0, 1.0));
    }

    for (entity, mut queue, facing, health) in query.iter_mut() {
        let (attack, jump) = pressed.get(&entity).copied().unwrap_or_default();
        let source = TickInput {
            attack,
            jump,
            axis: held_axis.get(&entity).copied().unwrap_or(0.0),
            facing: facing.copied().unwrap_or_default(),
        };
        let gate = ActorGate {
            health,
            permission: &*permission,
        };

        queue.push(ComboEvent::Input(InputSample::poll(&source, &gate)));
    }

    held_axis.retain(|entity, _| query.contains(*entity));
}

/// Система: fold ComboEventQueue → ComboStateMachine → ECS events
///
/// Entities обрабатываются в порядке Entity index (детерминизм event order).
pub fn run_combo_machines(
    graph: Res<AttackGraph>,
    mut query: Query<(Entity, &mut ComboStateMachine, &mut ComboEventQueue)>,
    mut play: EventWriter<PlayClip>,
    mut moves: EventWriter<AttackMoveTriggered>,
    mut hits: EventWriter<ComboHitCheck>,
    mut ended: EventWriter<ComboEnded>,
) {
    let mut machines: Vec<_> = query.iter_mut().collect();
    machines.sort_by_key(|(entity, _, _)| entity.index());

    for (entity, mut machine, mut queue) in machines {
        if queue.is_empty() {
            continue;
        }

        let events: Vec<ComboEvent> = queue.drain().collect();
        let mut commands: Vec<ComboCommand> = Vec::new();
        machine.fold(&graph, &events, &mut commands);

        for command in commands {
            match command {
                ComboCommand::Play { clip, looping } => {
                    play.write(PlayClip { entity, clip, looping });
                }
                ComboCommand::AttackMove { clip, effect } => {
                    moves.write(AttackMoveTriggered { entity, clip, effect });
                }
                ComboCommand::HitCheck { clip } => {
                    hits.write(ComboHitCheck { entity, clip });
                }
                ComboCommand::Ended { last_step, reason } => {
                    ended.write(ComboEnded { entity, last_step, reason });
                }
            }
        }
    }
}
