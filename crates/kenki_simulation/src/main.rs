//! Headless симуляция Kenki
//!
//! Загружает config/combo.ron + config/timelines.ron и прогоняет полное
//! пятиударное комбо (воздушная ветка, reverse финиш) на headless animator.

use bevy::prelude::*;
use kenki_simulation::combo::ComboConfig;
use kenki_simulation::{
    create_combo_app, log_error, log_info, ClipLibrary, ComboEnded, ComboPhase, ComboStateMachine, Facing,
    HeadlessAnimator, PlayClip, Player, PlayerInputEvent, MAX_COMBO_STEP,
};

const MAX_TICKS: usize = 600;

fn config_path(file: &str) -> String {
    format!("{}/config/{}", env!("CARGO_MANIFEST_DIR"), file)
}

/// Логирует переходы комбо
fn log_transitions(mut plays: EventReader<PlayClip>, mut ended: EventReader<ComboEnded>) {
    for play in plays.read() {
        log_info(&format!("▶️ {:?} plays '{}'", play.entity, play.clip));
    }
    for end in ended.read() {
        log_info(&format!("⏹️ {:?} combo ended at step {} ({:?})", end.entity, end.last_step, end.reason));
    }
}

/// Скриптованный input: атака в каждом окне буферизации, прыжок на третьем
/// шаге, reverse ось на четвёртом.
fn scripted_input(machine: &ComboStateMachine, tick: usize, player: Entity) -> PlayerInputEvent {
    let mut input = PlayerInputEvent::idle(player);

    match (machine.current_combo_step(), machine.phase()) {
        (0, _) if tick == 1 => input = input.with_attack(),
        (3, Some(ComboPhase::Startup)) => input = input.with_jump(),
        (4, _) => input = input.with_axis(-1.0),
        _ => {}
    }
    // Пятый удар доигрывается до конца клипа
    let step = machine.current_combo_step();
    if step < MAX_COMBO_STEP && machine.phase() == Some(ComboPhase::Buffering) && !machine.buffer().has_advance() {
        input = input.with_attack();
    }
    input
}

fn main() {
    let seed = 42;

    let loaded = ComboConfig::load(config_path("combo.ron"))
        .map_err(|e| e.to_string())
        .and_then(|config| {
            let clips = ClipLibrary::load(config_path("timelines.ron")).map_err(|e| e.to_string())?;
            create_combo_app(seed, config, clips).map_err(|e| e.to_string())
        });

    let mut app = match loaded {
        Ok(app) => app,
        Err(err) => {
            log_error(&format!("❌ Kenki: configuration error: {}", err));
            std::process::exit(1);
        }
    };

    app.add_systems(FixedUpdate, log_transitions);
    let player = app
        .world_mut()
        .spawn((Player, ComboStateMachine::new(), HeadlessAnimator::default()))
        .id();

    log_info(&format!("Starting Kenki headless combo demo (seed: {})", seed));

    // Первый update только заводит часы
    app.update();

    let mut finished_at = None;
    for tick in 1..=MAX_TICKS {
        let Some(machine) = app.world().get::<ComboStateMachine>(player) else {
            break;
        };
        let input = scripted_input(machine, tick, player);
        app.world_mut().send_event(input);
        app.update();

        if tick > 1 && app.world().get::<ComboStateMachine>(player).is_some_and(|m| !m.is_attacking()) {
            finished_at = Some(tick);
            break;
        }
    }

    let position = app.world().get::<Transform>(player).map(|t| t.translation).unwrap_or_default();
    let facing = app.world().get::<Facing>(player).copied().unwrap_or_default();
    match finished_at {
        Some(tick) => log_info(&format!(
            "✅ Combo finished at tick {} (position {:.2?}, facing {:?})",
            tick, position, facing
        )),
        None => log_info(&format!("⏱️ Simulation stopped after {} ticks", MAX_TICKS)),
    }
}
