//! Player domain: input events, global movement permission, facing
//!
//! Input layer (движок или скрипт теста) шлёт PlayerInputEvent каждый тик,
//! combo systems собирают из них InputSample.

use bevy::prelude::*;

use crate::combo::{AttackGraph, ComboSet, ComboStateMachine};
use crate::components::Facing;

/// Player input for one entity.
///
/// `attack`/`jump` are press edges of this tick, `move_axis` is the held
/// horizontal axis in [-1, 1].
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerInputEvent {
    pub entity: Entity,
    pub move_axis: f32,
    pub attack: bool,
    pub jump: bool,
}

impl PlayerInputEvent {
    pub fn idle(entity: Entity) -> Self {
        Self {
            entity,
            move_axis: 0.0,
            attack: false,
            jump: false,
        }
    }

    pub fn with_attack(mut self) -> Self {
        self.attack = true;
        self
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    pub fn with_axis(mut self, axis: f32) -> Self {
        self.move_axis = axis;
        self
    }
}

/// Глобальный переключатель управления (пауза, диалоги, катсцены).
///
/// `allowed == false` закрывает gate у всех машин: текущее комбо сбрасывается.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct MovementPermission {
    pub allowed: bool,
}

impl Default for MovementPermission {
    fn default() -> Self {
        Self { allowed: true }
    }
}

/// Dead zone used when no AttackGraph resource is present
const DEFAULT_DEADZONE: f32 = 0.1;

/// Система: поворот по оси движения
///
/// Во время атаки facing заблокирован (reverse input для пятого удара
/// считается относительно него).
pub fn update_facing(
    mut inputs: EventReader<PlayerInputEvent>,
    permission: Res<MovementPermission>,
    graph: Option<Res<AttackGraph>>,
    mut query: Query<(&mut Facing, Option<&ComboStateMachine>)>,
) {
    let deadzone = graph.map_or(DEFAULT_DEADZONE, |g| g.axis_deadzone());

    for input in inputs.read() {
        if !permission.allowed {
            continue;
        }
        let Ok((mut facing, machine)) = query.get_mut(input.entity) else {
            continue;
        };
        if machine.is_some_and(ComboStateMachine::is_attacking) {
            continue;
        }
        if let Some(next) = Facing::from_axis(input.move_axis, deadzone) {
            if *facing != next {
                *facing = next;
            }
        }
    }
}

/// Player Plugin
///
/// update_facing выполняется до combo machines, в том же FixedUpdate.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerInputEvent>()
            .init_resource::<MovementPermission>()
            .register_type::<MovementPermission>()
            .register_type::<Facing>();

        app.add_systems(FixedUpdate, update_facing.before(ComboSet::Machine));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Player;

    fn facing_app() -> App {
        let mut app = App::new();
        app.add_event::<PlayerInputEvent>()
            .init_resource::<MovementPermission>()
            .add_systems(Update, update_facing);
        app
    }

    #[test]
    fn test_axis_flips_facing() {
        let mut app = facing_app();
        let player = app.world_mut().spawn(Player).id();

        app.world_mut().send_event(PlayerInputEvent::idle(player).with_axis(-1.0));
        app.update();
        assert_eq!(app.world().get::<Facing>(player), Some(&Facing::Left));

        // Мёртвая зона не трогает facing
        app.world_mut().send_event(PlayerInputEvent::idle(player).with_axis(0.05));
        app.update();
        assert_eq!(app.world().get::<Facing>(player), Some(&Facing::Left));
    }

    #[test]
    fn test_attacking_locks_facing() {
        let mut app = facing_app();
        let mut machine = ComboStateMachine::new();
        let graph = AttackGraph::from_config(&Default::default()).unwrap();
        let mut out: Vec<crate::combo::ComboCommand> = Vec::new();
        machine.handle(
            &graph,
            &crate::combo::ComboEvent::Input(crate::combo::InputSample {
                attack_pressed: true,
                ..Default::default()
            }),
            &mut out,
        );
        assert!(machine.is_attacking());

        let player = app.world_mut().spawn((Player, machine)).id();
        app.world_mut().send_event(PlayerInputEvent::idle(player).with_axis(-1.0));
        app.update();

        assert_eq!(app.world().get::<Facing>(player), Some(&Facing::Right));
    }

    #[test]
    fn test_permission_blocks_facing() {
        let mut app = facing_app();
        app.insert_resource(MovementPermission { allowed: false });
        let player = app.world_mut().spawn(Player).id();

        app.world_mut().send_event(PlayerInputEvent::idle(player).with_axis(-1.0));
        app.update();

        assert_eq!(app.world().get::<Facing>(player), Some(&Facing::Right));
    }
}
