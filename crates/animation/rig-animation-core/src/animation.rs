//! Animation: a named set of timelines sharing one playback duration.
//!
//! `apply` and `mix` are the per-tick entry points. Both normalize the playback time
//! (loop wrap) and forward it to every timeline; `apply` is exactly `mix` with
//! `alpha = 1`. Timelines are independent, so dispatch order only matters when two
//! timelines drive the same property, in which case the later one writes last.

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::skeleton::SkeletonPose;
use crate::timeline::Timeline;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnimationDef")]
pub struct Animation {
    name: String,
    timelines: Vec<Timeline>,
    /// Largest timeline duration in seconds.
    duration: f32,
}

impl Animation {
    /// Take ownership of fully populated timelines. The duration is the time of the
    /// latest last keyframe across all timelines (0 for an empty animation).
    pub fn new(name: impl Into<String>, timelines: Vec<Timeline>) -> Self {
        let name = name.into();
        let duration = timelines
            .iter()
            .map(Timeline::duration)
            .fold(0.0f32, f32::max);
        log::debug!(
            "animation '{}': {} timelines, duration {:.3}s",
            name,
            timelines.len(),
            duration
        );
        Self {
            name,
            timelines,
            duration,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn timelines(&self) -> &[Timeline] {
        &self.timelines
    }

    /// Map a playback time onto the animation. Looping wraps into `[0, duration)`;
    /// otherwise, or for non-finite times, the time is passed through and timelines
    /// clamp it.
    #[inline]
    pub fn local_time(&self, time: f32, looping: bool) -> f32 {
        if looping && self.duration > 0.0 && time.is_finite() {
            time.rem_euclid(self.duration)
        } else {
            time
        }
    }

    /// Pose `pose` at `time`, overwriting every animated property.
    pub fn apply<P: SkeletonPose + ?Sized>(&self, pose: &mut P, time: f32, looping: bool) {
        self.mix(pose, time, looping, 1.0);
    }

    /// Blend every animated property toward this animation's value at `time` by
    /// `alpha` (0 leaves the pose untouched, 1 matches [`Animation::apply`]).
    pub fn mix<P: SkeletonPose + ?Sized>(&self, pose: &mut P, time: f32, looping: bool, alpha: f32) {
        let time = self.local_time(time, looping);
        for timeline in &self.timelines {
            timeline.apply(pose, time, alpha);
        }
    }

    /// Validate every timeline. Timelines sharing a target property are allowed and
    /// only reported at debug level.
    pub fn validate(&self) -> Result<()> {
        for (index, timeline) in self.timelines.iter().enumerate() {
            if let Err(err) = timeline.validate() {
                let err = err.in_animation(&self.name, index);
                log::warn!("{err}");
                return Err(err);
            }
        }
        for (index, timeline) in self.timelines.iter().enumerate() {
            let target = (timeline.kind(), timeline.target_index());
            let shadowed = self.timelines[index + 1..]
                .iter()
                .any(|later| (later.kind(), later.target_index()) == target);
            if shadowed {
                log::debug!(
                    "animation '{}': timeline {} ({} on index {}) is overwritten by a later timeline",
                    self.name,
                    index,
                    target.0.as_str(),
                    target.1
                );
            }
        }
        Ok(())
    }
}

/// Deserialized form; `duration` is recomputed and timelines are validated.
#[derive(Deserialize)]
struct AnimationDef {
    name: String,
    #[serde(default)]
    timelines: Vec<Timeline>,
}

impl TryFrom<AnimationDef> for Animation {
    type Error = AnimationError;

    fn try_from(def: AnimationDef) -> Result<Self> {
        let animation = Animation::new(def.name, def.timelines);
        animation.validate()?;
        Ok(animation)
    }
}
