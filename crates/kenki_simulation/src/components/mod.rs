//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Actor, Health)
//! - facing: направление взгляда (Facing)
//! - player: player control marker (Player)

pub mod actor;
pub mod facing;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use facing::*;
pub use player::*;
