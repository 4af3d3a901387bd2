//! Rig Animation Core
//!
//! Keyframe timelines for bone/slot skeletal rigs. Each timeline drives one property
//! (bone rotation, translation or scale; slot color or attachment), eases between
//! keyframes with linear, stepped or bezier curves, and writes or blends its value
//! into a [`SkeletonPose`]. An [`Animation`] groups timelines under one duration and
//! is the per-tick entry point (`apply` / `mix`); [`AnimationState`] layers automatic
//! crossfades on top.
//!
//! Playback never allocates or fails: times are clamped to the keyframe range and
//! structural problems are caught up front by `validate`.

pub mod animation;
pub mod config;
pub mod curve;
pub mod error;
pub mod math;
pub mod skeleton;
pub mod state;
pub mod timeline;

// Re-exports for consumers (hosts/adapters)
pub use animation::Animation;
pub use config::Config;
pub use curve::{Curve, CurveType, Curves, BEZIER_SEGMENTS};
pub use error::{AnimationError, Result};
pub use skeleton::{Bone, BoneData, Skeleton, SkeletonData, SkeletonPose, Slot, SlotData};
pub use state::{AnimationState, AnimationStateData};
pub use timeline::{
    AttachmentTimeline, ColorTimeline, CurveTimeline, RotateTimeline, ScaleTimeline, Timeline,
    TimelineKind, TranslateTimeline, XyTimeline,
};
