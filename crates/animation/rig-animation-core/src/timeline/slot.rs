//! Slot timelines: tint color and attachment switching.

use serde::{Deserialize, Serialize};

use super::{
    blend, find_segment, validate_attachment, validate_frames, CurveTimeline, Segment,
    TimelineKind,
};
use crate::curve::Curves;
use crate::error::{AnimationError, Result};
use crate::math::lerp_array;
use crate::skeleton::SkeletonPose;

/// Slot RGBA tint. Frames: `[time, r, g, b, a, ...]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorTimelineDef")]
pub struct ColorTimeline {
    pub slot_index: usize,
    frames: Box<[f32]>,
    curves: Curves,
}

impl ColorTimeline {
    pub const STRIDE: usize = 5;

    /// # Panics
    /// If `keyframe_count` is zero.
    pub fn new(slot_index: usize, keyframe_count: usize) -> Self {
        assert!(keyframe_count > 0, "color timeline needs at least one keyframe");
        Self {
            slot_index,
            frames: vec![0.0; keyframe_count * Self::STRIDE].into_boxed_slice(),
            curves: Curves::new(keyframe_count),
        }
    }

    pub fn frames(&self) -> &[f32] {
        &self.frames
    }

    pub fn keyframe_count(&self) -> usize {
        self.frames.len() / Self::STRIDE
    }

    pub fn duration(&self) -> f32 {
        self.frames
            .chunks_exact(Self::STRIDE)
            .last()
            .map_or(0.0, |keyframe| keyframe[0])
    }

    pub fn set_keyframe(&mut self, keyframe_index: usize, time: f32, r: f32, g: f32, b: f32, a: f32) {
        let i = keyframe_index * Self::STRIDE;
        self.frames[i..i + Self::STRIDE].copy_from_slice(&[time, r, g, b, a]);
    }

    #[inline]
    fn keyframe_value(&self, keyframe_index: usize) -> [f32; 4] {
        let i = keyframe_index * Self::STRIDE;
        [
            self.frames[i + 1],
            self.frames[i + 2],
            self.frames[i + 3],
            self.frames[i + 4],
        ]
    }

    pub fn value_at(&self, time: f32) -> [f32; 4] {
        match find_segment(&self.frames, Self::STRIDE, time) {
            Segment::Hold(k) => self.keyframe_value(k),
            Segment::Between { from, percent } => {
                let percent = self.curves.curve_percent(from, percent);
                lerp_array(
                    self.keyframe_value(from),
                    self.keyframe_value(from + 1),
                    percent,
                )
            }
        }
    }

    pub fn apply<P: SkeletonPose + ?Sized>(&self, pose: &mut P, time: f32, alpha: f32) {
        let current = pose.slot_color(self.slot_index);
        let value = blend(current, self.value_at(time), alpha);
        pose.set_slot_color(self.slot_index, value);
    }
}

impl CurveTimeline for ColorTimeline {
    fn curves(&self) -> &Curves {
        &self.curves
    }

    fn curves_mut(&mut self) -> &mut Curves {
        &mut self.curves
    }
}

/// Discrete attachment switches. Frames: `[time, ...]` with a parallel name table;
/// a `None` name clears the slot. Not blendable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AttachmentTimelineDef")]
pub struct AttachmentTimeline {
    pub slot_index: usize,
    frames: Box<[f32]>,
    names: Box<[Option<String>]>,
}

impl AttachmentTimeline {
    pub const STRIDE: usize = 1;

    /// # Panics
    /// If `keyframe_count` is zero.
    pub fn new(slot_index: usize, keyframe_count: usize) -> Self {
        assert!(
            keyframe_count > 0,
            "attachment timeline needs at least one keyframe"
        );
        Self {
            slot_index,
            frames: vec![0.0; keyframe_count].into_boxed_slice(),
            names: vec![None; keyframe_count].into_boxed_slice(),
        }
    }

    pub fn frames(&self) -> &[f32] {
        &self.frames
    }

    pub fn names(&self) -> &[Option<String>] {
        &self.names
    }

    pub fn keyframe_count(&self) -> usize {
        self.frames.len()
    }

    pub fn duration(&self) -> f32 {
        self.frames.last().copied().unwrap_or(0.0)
    }

    pub fn set_keyframe(&mut self, keyframe_index: usize, time: f32, name: Option<&str>) {
        self.frames[keyframe_index] = time;
        self.names[keyframe_index] = name.map(str::to_owned);
    }

    /// Attachment name of the keyframe at or before `time` (the first keyframe when
    /// `time` precedes it).
    pub fn value_at(&self, time: f32) -> Option<&str> {
        let k = match find_segment(&self.frames, Self::STRIDE, time) {
            Segment::Hold(k) => k,
            Segment::Between { from, .. } => from,
        };
        self.names[k].as_deref()
    }

    pub fn apply<P: SkeletonPose + ?Sized>(&self, pose: &mut P, time: f32) {
        pose.set_slot_attachment(self.slot_index, self.value_at(time));
    }
}

#[derive(Deserialize)]
struct ColorTimelineDef {
    slot_index: usize,
    frames: Box<[f32]>,
    curves: Curves,
}

impl TryFrom<ColorTimelineDef> for ColorTimeline {
    type Error = AnimationError;

    fn try_from(def: ColorTimelineDef) -> Result<Self> {
        let kind = TimelineKind::Color;
        validate_frames(kind.as_str(), kind.stride(), &def.frames, Some(&def.curves))?;
        Ok(Self {
            slot_index: def.slot_index,
            frames: def.frames,
            curves: def.curves,
        })
    }
}

#[derive(Deserialize)]
struct AttachmentTimelineDef {
    slot_index: usize,
    frames: Box<[f32]>,
    names: Box<[Option<String>]>,
}

impl TryFrom<AttachmentTimelineDef> for AttachmentTimeline {
    type Error = AnimationError;

    fn try_from(def: AttachmentTimelineDef) -> Result<Self> {
        validate_attachment(&def.frames, &def.names)?;
        Ok(Self {
            slot_index: def.slot_index,
            frames: def.frames,
            names: def.names,
        })
    }
}
