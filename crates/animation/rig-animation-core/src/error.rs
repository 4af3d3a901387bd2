//! Error types for structural validation of timelines and animations.
//!
//! Playback itself never fails; these errors only surface when data that arrived
//! through deserialization (or hand-built buffers) is checked before use.

use thiserror::Error;

/// Crate result type.
pub type Result<T> = std::result::Result<T, AnimationError>;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimationError {
    /// A timeline must hold at least one keyframe.
    #[error("{kind} timeline has no keyframes")]
    EmptyTimeline { kind: &'static str },

    /// Flat frame buffer does not divide evenly into keyframes.
    #[error("{kind} timeline frame buffer of {len} floats is not a multiple of stride {stride}")]
    FrameStride {
        kind: &'static str,
        len: usize,
        stride: usize,
    },

    /// Curve table must hold exactly one entry per keyframe segment.
    #[error("{kind} timeline has {actual} curves for {keyframes} keyframes (expected {expected})")]
    CurveCount {
        kind: &'static str,
        keyframes: usize,
        expected: usize,
        actual: usize,
    },

    /// Attachment names must parallel the keyframe times.
    #[error("attachment timeline has {names} names for {keyframes} keyframes")]
    AttachmentCount { keyframes: usize, names: usize },

    #[error("{kind} timeline keyframe {index} has non-finite time {time}")]
    NonFiniteTime {
        kind: &'static str,
        index: usize,
        time: f32,
    },

    #[error("{kind} timeline keyframe {index} at {time} precedes previous keyframe at {previous}")]
    UnsortedKeyframes {
        kind: &'static str,
        index: usize,
        time: f32,
        previous: f32,
    },

    /// Bezier time control points must lie in [0, 1] to keep x monotonic.
    #[error("{kind} timeline curve {index} has control x {value} outside [0, 1]")]
    CurveControl {
        kind: &'static str,
        index: usize,
        value: f32,
    },

    #[error("timeline {index} of animation '{animation}': {source}")]
    Timeline {
        animation: String,
        index: usize,
        #[source]
        source: Box<AnimationError>,
    },

    #[error("animation not found: {name}")]
    AnimationNotFound { name: String },
}

impl AnimationError {
    /// Wrap a timeline-level error with the owning animation and timeline position.
    pub(crate) fn in_animation(self, animation: &str, index: usize) -> Self {
        Self::Timeline {
            animation: animation.to_string(),
            index,
            source: Box::new(self),
        }
    }
}
