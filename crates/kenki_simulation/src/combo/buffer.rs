//! Input buffer: one pending advance + one pending jump.

use bevy::prelude::*;

/// Holds at most one buffered "advance" and one buffered "jump" intent.
///
/// Intents are flags, not counters: pressing attack twice inside a window
/// still produces exactly one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct InputBuffer {
    advance: bool,
    jump: bool,
}

impl InputBuffer {
    pub fn has_advance(&self) -> bool {
        self.advance
    }

    pub fn has_jump(&self) -> bool {
        self.jump
    }

    /// Returns `true` if the flag was newly set.
    pub fn buffer_advance(&mut self) -> bool {
        !std::mem::replace(&mut self.advance, true)
    }

    pub fn buffer_jump(&mut self) {
        self.jump = true;
    }

    /// Consume the advance intent (returns whether one was pending).
    pub fn take_advance(&mut self) -> bool {
        std::mem::take(&mut self.advance)
    }

    /// Consume the jump intent (step-4 branch resolution).
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    pub fn clear_advance(&mut self) {
        self.advance = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        !self.advance && !self.jump
    }
}
