//! Attack move executor: MovementEffect → Transform displacement.
//!
//! Смещение всегда вдоль Facing актора в момент применения.
//! Smooth move не привязан к комбо: доезжает до конца даже после reset.

use bevy::prelude::*;

use crate::combo::{AttackMoveTriggered, MoveKind};
use crate::components::Facing;

/// Smooth displacement in flight.
///
/// Invariant: 0 ≤ elapsed ≤ duration. A new smooth move replaces this one.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SmoothAttackMove {
    /// Full offset (world space)
    pub offset: Vec3,
    pub duration: f32,
    pub elapsed: f32,
}

impl SmoothAttackMove {
    pub fn new(offset: Vec3, duration: f32) -> Self {
        Self {
            offset,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advance by `delta` seconds, returns the displacement for this step.
    pub fn advance(&mut self, delta: f32) -> Vec3 {
        let before = self.progress();
        self.elapsed = (self.elapsed + delta).min(self.duration.max(0.0));
        self.offset * (self.progress() - before)
    }
}

/// Система: AttackMoveTriggered → instant offset / SmoothAttackMove
pub fn start_attack_moves(
    mut commands: Commands,
    mut triggers: EventReader<AttackMoveTriggered>,
    mut query: Query<(&mut Transform, Option<&Facing>)>,
) {
    for trigger in triggers.read() {
        let Ok((mut transform, facing)) = query.get_mut(trigger.entity) else {
            continue;
        };

        let effect = trigger.effect;
        let offset = facing.copied().unwrap_or_default().axis() * effect.distance;

        match effect.kind {
            MoveKind::None => {}
            MoveKind::Instant => {
                transform.translation += offset;
                crate::logger::log(&format!(
                    "🏃 AttackMove: {:?} instant {:.2}m ('{}')",
                    trigger.entity, effect.distance, trigger.clip
                ));
            }
            MoveKind::Smooth => {
                commands
                    .entity(trigger.entity)
                    .insert(SmoothAttackMove::new(offset, effect.duration));
                crate::logger::log(&format!(
                    "🏃 AttackMove: {:?} smooth {:.2}m over {:.2}s ('{}')",
                    trigger.entity, effect.distance, effect.duration, trigger.clip
                ));
            }
        }
    }
}

/// Система: продвигает SmoothAttackMove на fixed delta
///
/// Завершённый move удаляется, итоговое смещение = offset.
pub fn tick_attack_moves(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut query: Query<(Entity, &mut Transform, &mut SmoothAttackMove)>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, mut smooth) in query.iter_mut() {
        transform.translation += smooth.advance(delta);

        if smooth.is_finished() {
            commands.entity(entity).remove::<SmoothAttackMove>();
        }
    }
}
