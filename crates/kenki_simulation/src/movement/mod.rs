//! Movement domain — attack move executor
//!
//! Содержит:
//! - SmoothAttackMove (displacement in flight)
//! - start_attack_moves / tick_attack_moves (AttackMoveTriggered → Transform)

pub mod attack_move;

#[cfg(test)]
mod attack_move_tests;

pub use attack_move::*;
