//! Tests for the attack move executor.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combo::{AttackMoveTriggered, MovementEffect};
    use crate::components::{Actor, Facing};
    use crate::movement::*;

    /// Каждый app.update() = ровно один FixedUpdate тик
    fn movement_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Time::<Fixed>::from_duration(crate::tick_duration()))
            .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(crate::tick_duration()))
            .add_event::<AttackMoveTriggered>()
            .add_systems(FixedUpdate, (start_attack_moves, tick_attack_moves).chain());
        // Первый update только инициализирует Time
        app.update();
        app
    }

    fn trigger(app: &mut App, entity: Entity, effect: MovementEffect) {
        app.world_mut().send_event(AttackMoveTriggered {
            entity,
            clip: "J1".to_string(),
            effect,
        });
    }

    fn x(app: &App, entity: Entity) -> f32 {
        app.world().get::<Transform>(entity).unwrap().translation.x
    }

    #[test]
    fn test_smooth_step_math() {
        let mut smooth = SmoothAttackMove::new(Vec3::X * 2.0, 1.0);

        let first = smooth.advance(0.25);
        assert!((first.x - 0.5).abs() < 1e-6);

        let rest = smooth.advance(5.0); // Clamp к концу
        assert!((rest.x - 1.5).abs() < 1e-6);
        assert!(smooth.is_finished());
        assert_eq!(smooth.advance(1.0), Vec3::ZERO);
    }

    #[test]
    fn test_instant_move_along_facing() {
        let mut app = movement_app();
        let right = app.world_mut().spawn(Actor).id();
        let left = app.world_mut().spawn((Actor, Facing::Left)).id();

        trigger(&mut app, right, MovementEffect::instant(0.5));
        trigger(&mut app, left, MovementEffect::instant(0.5));
        app.update();

        assert!((x(&app, right) - 0.5).abs() < 1e-5);
        assert!((x(&app, left) + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_none_effect_is_noop() {
        let mut app = movement_app();
        let actor = app.world_mut().spawn(Actor).id();

        trigger(&mut app, actor, MovementEffect::NONE);
        app.update();

        assert_eq!(x(&app, actor), 0.0);
        assert!(app.world().get::<SmoothAttackMove>(actor).is_none());
    }

    #[test]
    fn test_smooth_move_reaches_target() {
        let mut app = movement_app();
        let actor = app.world_mut().spawn(Actor).id();

        // 0.5 сек = 30 тиков
        trigger(&mut app, actor, MovementEffect::smooth(1.2, 0.5));
        app.update();
        let after_first = x(&app, actor);
        assert!(after_first > 0.0 && after_first < 1.2);

        for _ in 0..40 {
            app.update();
        }

        assert!((x(&app, actor) - 1.2).abs() < 1e-4);
        assert!(app.world().get::<SmoothAttackMove>(actor).is_none());
    }

    #[test]
    fn test_new_smooth_move_supersedes() {
        let mut app = movement_app();
        let actor = app.world_mut().spawn(Actor).id();

        trigger(&mut app, actor, MovementEffect::smooth(10.0, 1.0));
        for _ in 0..6 {
            app.update();
        }
        let partial = x(&app, actor);
        assert!(partial > 0.0 && partial < 10.0);

        trigger(&mut app, actor, MovementEffect::smooth(1.0, 0.1));
        for _ in 0..20 {
            app.update();
        }

        // Остаток первого move отброшен
        assert!((x(&app, actor) - (partial + 1.0)).abs() < 1e-3);
    }

    #[test]
    fn test_missing_entity_is_ignored() {
        let mut app = movement_app();
        let ghost = app.world_mut().spawn_empty().id();
        app.world_mut().despawn(ghost);

        trigger(&mut app, ghost, MovementEffect::instant(1.0));
        app.update();
    }
}
