//! Headless animator: plays ClipTimelines on the fixed tick and emits AnimationSignals.
//!
//! Заменяет движковый AnimationTree в тестах и headless demo.
//! Работает после combo systems: markers тика N обрабатываются машиной на тике N+1.

use bevy::prelude::*;

use super::timeline::ClipLibrary;
use crate::combo::{AnimationSignal, PlayClip};

/// Playback state of one entity.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HeadlessAnimator {
    clip: Option<String>,
    time: f32,
    looping: bool,
    /// Clip restarted, markers at t = 0 not emitted yet
    fresh: bool,
}

impl HeadlessAnimator {
    pub fn clip(&self) -> Option<&str> {
        self.clip.as_deref()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_playing(&self) -> bool {
        self.clip.is_some()
    }

    /// Restart playback. The interrupted clip never completes.
    pub fn play(&mut self, clip: impl Into<String>, looping: bool) {
        self.clip = Some(clip.into());
        self.time = 0.0;
        self.looping = looping;
        self.fresh = true;
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Advance by `delta`, pushing crossed markers and completion into `signals`.
    pub fn advance(&mut self, entity: Entity, library: &ClipLibrary, delta: f32, signals: &mut Vec<AnimationSignal>) {
        let Some(clip) = self.clip.clone() else {
            return;
        };
        let Some(timeline) = library.get(&clip) else {
            return;
        };

        let from = self.time;
        let to = from + delta;
        let include_start = std::mem::take(&mut self.fresh);
        let marker = |name: &str| AnimationSignal::Marker {
            entity,
            clip: clip.clone(),
            marker: name.to_string(),
        };

        if to < timeline.length {
            signals.extend(timeline.markers_between(from, to, include_start).map(|m| marker(&m.name)));
            self.time = to;
            return;
        }

        signals.extend(
            timeline
                .markers_between(from, timeline.length, include_start)
                .map(|m| marker(&m.name)),
        );
        signals.push(AnimationSignal::Completed {
            entity,
            clip: clip.clone(),
            looping: self.looping,
        });

        if self.looping {
            let wrapped = (to - timeline.length).min(timeline.length);
            signals.extend(timeline.markers_between(0.0, wrapped, true).map(|m| marker(&m.name)));
            self.time = wrapped;
        } else {
            self.stop();
        }
    }
}

/// Система: PlayClip → restart, затем advance на fixed delta
///
/// Клип, запущенный в этом тике, начинает двигаться со следующего.
/// Неизвестный клип логируется и не играет.
pub fn drive_headless_animators(
    time: Res<Time<Fixed>>,
    library: Res<ClipLibrary>,
    mut plays: EventReader<PlayClip>,
    mut animators: Query<(Entity, &mut HeadlessAnimator)>,
    mut signals: EventWriter<AnimationSignal>,
) {
    let mut started = Vec::new();
    for play in plays.read() {
        let Ok((_, mut animator)) = animators.get_mut(play.entity) else {
            continue;
        };
        if library.get(&play.clip).is_none() {
            crate::logger::log_warning(&format!("⚠️ Animator: unknown clip '{}' for {:?}", play.clip, play.entity));
            animator.stop();
            continue;
        }
        animator.play(play.clip.clone(), play.looping);
        started.push(play.entity);
    }

    let delta = time.delta_secs();
    let mut ordered: Vec<_> = animators.iter_mut().collect();
    ordered.sort_by_key(|(entity, _)| entity.index());

    let mut out = Vec::new();
    for (entity, mut animator) in ordered {
        if started.contains(&entity) || !animator.is_playing() {
            continue;
        }
        animator.advance(entity, &library, delta, &mut out);
    }

    signals.write_batch(out);
}
