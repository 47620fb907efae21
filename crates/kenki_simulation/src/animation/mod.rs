//! Animation domain (headless): clip timelines + animator
//!
//! ECS комбо не знает про время клипов: оно получает только AnimationSignal.
//! Этот модуль — детерминированный источник сигналов для тестов и demo.

use bevy::prelude::*;

pub mod animator;
pub mod timeline;


pub use animator::{drive_headless_animators, HeadlessAnimator};
pub use timeline::{ClipLibrary, ClipTimeline, TimelineMarker};

use crate::combo::ComboSet;

/// Animation Plugin
///
/// drive_headless_animators выполняется после ComboSet::Effects.
#[derive(Clone)]
pub struct AnimationPlugin {
    library: ClipLibrary,
}

impl AnimationPlugin {
    pub fn new(library: ClipLibrary) -> Self {
        Self { library }
    }
}

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.library.clone())
            .register_type::<HeadlessAnimator>()
            .add_event::<crate::combo::AnimationSignal>()
            .add_event::<crate::combo::PlayClip>();

        app.add_systems(FixedUpdate, drive_headless_animators.after(ComboSet::Effects));
    }
}
