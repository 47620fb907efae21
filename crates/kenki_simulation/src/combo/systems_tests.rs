//! Tests for combo ECS systems (queueing order, input aggregation, gate).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combo::*;
    use crate::components::{Facing, Health, Player};
    use crate::player::{MovementPermission, PlayerInputEvent, PlayerPlugin};

    #[derive(Resource, Default)]
    struct Recorded(Vec<ComboEnded>);

    fn record_endings(mut events: EventReader<ComboEnded>, mut recorded: ResMut<Recorded>) {
        recorded.0.extend(events.read().cloned());
    }

    fn combo_app() -> (App, Entity) {
        let mut app = crate::create_headless_app(7);
        let plugin = ComboPlugin::from_config(ComboConfig::default()).unwrap();
        app.add_plugins((plugin, PlayerPlugin))
            .init_resource::<Recorded>()
            .add_systems(FixedUpdate, record_endings.after(ComboSet::Effects));

        let player = app.world_mut().spawn((Player, ComboStateMachine::new())).id();
        // Первый update только заводит часы
        app.update();
        (app, player)
    }

    fn input(app: &mut App, event: PlayerInputEvent) {
        app.world_mut().send_event(event);
    }

    fn signal(app: &mut App, entity: Entity, clip: &str, marker: Marker) {
        app.world_mut().send_event(AnimationSignal::Marker {
            entity,
            clip: clip.to_string(),
            marker: marker.name().to_string(),
        });
    }

    fn machine(app: &App, entity: Entity) -> &ComboStateMachine {
        app.world().get::<ComboStateMachine>(entity).unwrap()
    }

    fn endings(app: &App) -> Vec<(u8, ResetReason)> {
        app.world().resource::<Recorded>().0.iter().map(|e| (e.last_step, e.reason)).collect()
    }

    /// attack → J1, затем маркеры до Can_Move
    fn into_cancel_window(app: &mut App, player: Entity) {
        input(app, PlayerInputEvent::idle(player).with_attack());
        app.update();
        signal(app, player, "J1", Marker::InputStart);
        signal(app, player, "J1", Marker::CanMove);
        app.update();
        assert_eq!(machine(app, player).phase(), Some(ComboPhase::Cancelable));
    }

    #[test]
    fn test_one_update_is_one_machine_tick() {
        let (mut app, player) = combo_app();

        input(&mut app, PlayerInputEvent::idle(player).with_attack());
        app.update();

        assert_eq!(machine(&app, player).current_combo_step(), 1);
        assert_eq!(machine(&app, player).current_clip(), Some("J1"));
        // Очередь полностью свёрнута
        assert!(app.world().get::<ComboEventQueue>(player).unwrap().is_empty());
    }

    #[test]
    fn test_signals_fold_before_input_of_same_tick() {
        let (mut app, player) = combo_app();
        input(&mut app, PlayerInputEvent::idle(player).with_attack());
        app.update();

        // Combo_Point и attack в одном тике: сначала окно открывается, потом атака
        signal(&mut app, player, "J1", Marker::InputStart);
        signal(&mut app, player, "J1", Marker::ComboPoint);
        input(&mut app, PlayerInputEvent::idle(player).with_attack());
        app.update();

        assert_eq!(machine(&app, player).current_combo_step(), 2);
        assert_eq!(machine(&app, player).current_clip(), Some("J2"));
    }

    #[test]
    fn test_held_axis_persists_between_events() {
        let (mut app, player) = combo_app();

        // Ось зажата с первого тика, дальше событий input нет
        input(&mut app, PlayerInputEvent::idle(player).with_attack().with_axis(1.0));
        app.update();
        assert!(machine(&app, player).is_attacking());

        signal(&mut app, player, "J1", Marker::InputStart);
        signal(&mut app, player, "J1", Marker::CanMove);
        app.update();

        assert!(!machine(&app, player).is_attacking());
        assert_eq!(endings(&app), vec![(1, ResetReason::MovementCancel)]);
    }

    #[test]
    fn test_last_axis_of_tick_wins() {
        let (mut app, player) = combo_app();
        into_cancel_window(&mut app, player);

        input(&mut app, PlayerInputEvent::idle(player).with_axis(1.0));
        input(&mut app, PlayerInputEvent::idle(player).with_axis(0.0));
        app.update();

        assert!(machine(&app, player).is_attacking());
        assert!(endings(&app).is_empty());
    }

    #[test]
    fn test_attack_edges_are_ored() {
        let (mut app, player) = combo_app();

        input(&mut app, PlayerInputEvent::idle(player).with_attack());
        input(&mut app, PlayerInputEvent::idle(player));
        app.update();

        assert!(machine(&app, player).is_attacking());
    }

    #[test]
    fn test_tick_input_and_gate_views_poll() {
        let source = TickInput {
            attack: true,
            jump: false,
            axis: -3.0,
            facing: Facing::Left,
        };
        let open = MovementPermission { allowed: true };
        let closed = MovementPermission { allowed: false };
        let mut dead = Health::new(10);
        dead.take_damage(10);

        let sample = InputSample::poll(&source, &ActorGate { health: None, permission: &open });
        assert!(sample.attack_pressed && !sample.jump_pressed);
        assert_eq!(sample.horizontal_axis, -1.0); // clamp
        assert!(!sample.facing_right);
        assert!(sample.gate_open);

        let alive = Health::new(10);
        assert!(ActorGate { health: Some(&alive), permission: &open }.is_alive_and_movement_allowed());
        assert!(!ActorGate { health: Some(&dead), permission: &open }.is_alive_and_movement_allowed());
        assert!(!ActorGate { health: Some(&alive), permission: &closed }.is_alive_and_movement_allowed());
    }

    #[test]
    fn test_death_closes_gate() {
        let (mut app, player) = combo_app();
        input(&mut app, PlayerInputEvent::idle(player).with_attack());
        app.update();

        app.world_mut().get_mut::<Health>(player).unwrap().take_damage(1000);
        app.update();

        assert!(!machine(&app, player).is_attacking());
        assert_eq!(endings(&app), vec![(1, ResetReason::Interrupted)]);

        // Мёртвый актор не начинает новое комбо
        input(&mut app, PlayerInputEvent::idle(player).with_attack());
        app.update();
        assert!(!machine(&app, player).is_attacking());
    }

    #[test]
    fn test_movement_permission_closes_gate() {
        let (mut app, player) = combo_app();
        input(&mut app, PlayerInputEvent::idle(player).with_attack());
        app.update();
        signal(&mut app, player, "J1", Marker::InputStart);
        input(&mut app, PlayerInputEvent::idle(player).with_attack());
        app.update();
        assert!(machine(&app, player).buffer().has_advance());

        app.insert_resource(MovementPermission { allowed: false });
        app.update();

        assert!(!machine(&app, player).is_attacking());
        assert!(machine(&app, player).buffer().is_empty());
    }

    #[test]
    fn test_signals_for_other_entities_are_dropped() {
        let (mut app, player) = combo_app();
        let bystander = app.world_mut().spawn_empty().id();
        input(&mut app, PlayerInputEvent::idle(player).with_attack());
        app.update();

        app.world_mut().send_event(AnimationSignal::Completed {
            entity: bystander,
            clip: "J1".to_string(),
            looping: false,
        });
        app.update();

        assert!(machine(&app, player).is_attacking());
    }
}
