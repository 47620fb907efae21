//! Player control marker component

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// Input systems используют `With<Player>` filter.
/// В single-player обычно только один entity имеет этот компонент.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(super::Actor)]
pub struct Player;
