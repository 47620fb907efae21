//! Kenki Simulation Core
//!
//! ECS-симуляция melee combo на Bevy 0.16 (headless)
//!
//! Слои:
//! - combo: attack graph, timeline windows, input buffer, state machine
//! - movement: attack move executor (Transform displacement)
//! - player: input events, facing, global movement permission
//! - animation: headless clip playback → AnimationSignal
//!
//! Движок (рендер, звук, камера) подключается через events.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod animation;
pub mod combo;
pub mod components;
pub mod logger;
pub mod movement;
pub mod player;

// Re-export базовых типов для удобства
pub use animation::{AnimationPlugin, ClipLibrary, ClipTimeline, HeadlessAnimator, TimelineMarker};
pub use combo::{
    AnimationSignal, AttackGraph, ComboConfig, ComboEnded, ComboHitCheck, ComboPhase, ComboPlugin, ComboStateMachine,
    GraphError, MovementEffect, PlayClip, ResetReason, MAX_COMBO_STEP,
};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use movement::SmoothAttackMove;
pub use player::{MovementPermission, PlayerInputEvent, PlayerPlugin};

/// Fixed simulation rate
pub const TICK_HZ: f64 = 60.0;

/// Length of one fixed tick. Fixed timestep and manual clock step share it.
pub fn tick_duration() -> Duration {
    Duration::from_secs_f64(1.0 / TICK_HZ)
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Clone)]
pub struct SimulationPlugin {
    combo: ComboPlugin,
    animation: AnimationPlugin,
}

impl SimulationPlugin {
    /// Fails if the combo graph cannot be built from `config`.
    pub fn new(config: ComboConfig, clips: ClipLibrary) -> Result<Self, GraphError> {
        Ok(Self {
            combo: ComboPlugin::from_config(config)?,
            animation: AnimationPlugin::new(clips),
        })
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_duration(tick_duration()))
            // Подсистемы
            .add_plugins((self.combo.clone(), PlayerPlugin, self.animation.clone()));

        // Детерминистичный RNG (seed по умолчанию), если не задан снаружи
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную на 1/60 сек за `app.update()`, поэтому каждый
/// update (кроме первого, который только заводит часы) = ровно один FixedUpdate.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(tick_duration()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick_duration()));

    app
}

/// Headless app с полной combo симуляцией.
pub fn create_combo_app(seed: u64, config: ComboConfig, clips: ClipLibrary) -> Result<App, GraphError> {
    let plugin = SimulationPlugin::new(config, clips)?;
    let mut app = create_headless_app(seed);
    app.add_plugins(plugin);
    Ok(app)
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
