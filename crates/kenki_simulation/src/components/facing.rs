//! Facing direction (side view: right/left along +X/-X)

use bevy::prelude::*;

/// Направление взгляда актора.
///
/// Attack moves смещают актора вдоль `axis()`; reverse input для пятого
/// удара считается относительно facing.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn is_right(self) -> bool {
        self == Facing::Right
    }

    /// World-space unit vector
    pub fn axis(self) -> Vec3 {
        match self {
            Facing::Right => Vec3::X,
            Facing::Left => Vec3::NEG_X,
        }
    }

    /// Facing implied by a horizontal axis value, `None` inside the dead zone.
    pub fn from_axis(axis: f32, deadzone: f32) -> Option<Self> {
        if axis > deadzone {
            Some(Facing::Right)
        } else if axis < -deadzone {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_axis() {
        assert_eq!(Facing::from_axis(0.5, 0.1), Some(Facing::Right));
        assert_eq!(Facing::from_axis(-0.5, 0.1), Some(Facing::Left));
        assert_eq!(Facing::from_axis(0.05, 0.1), None);
    }

    #[test]
    fn test_axis_vector() {
        assert_eq!(Facing::Left.axis(), Vec3::NEG_X);
        assert!(Facing::Right.is_right());
    }
}
