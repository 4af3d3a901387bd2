//! Bone timelines: rotation, translation and scale.

use serde::{Deserialize, Serialize};

use super::{blend, find_segment, validate_frames, CurveTimeline, Segment, TimelineKind};
use crate::curve::Curves;
use crate::error::{AnimationError, Result};
use crate::math::{lerp_array, wrap_degrees};
use crate::skeleton::SkeletonPose;

/// Bone rotation in degrees. Frames: `[time, angle, ...]`.
///
/// Angles interpolate along the shortest arc and blend into the pose the same way,
/// so an animation never spins the long way around.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoneTimelineDef")]
pub struct RotateTimeline {
    pub bone_index: usize,
    frames: Box<[f32]>,
    curves: Curves,
}

impl RotateTimeline {
    pub const STRIDE: usize = 2;

    /// # Panics
    /// If `keyframe_count` is zero.
    pub fn new(bone_index: usize, keyframe_count: usize) -> Self {
        assert!(keyframe_count > 0, "rotate timeline needs at least one keyframe");
        Self {
            bone_index,
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

    pub fn set_keyframe(&mut self, keyframe_index: usize, time: f32, degrees: f32) {
        let i = keyframe_index * Self::STRIDE;
        self.frames[i] = time;
        self.frames[i + 1] = degrees;
    }

    /// Interpolated angle at `time`. Between keyframes the result lies on the short
    /// arc from the earlier keyframe and is not normalized.
    pub fn value_at(&self, time: f32) -> f32 {
        match find_segment(&self.frames, Self::STRIDE, time) {
            Segment::Hold(k) => self.frames[k * Self::STRIDE + 1],
            Segment::Between { from, percent } => {
                let percent = self.curves.curve_percent(from, percent);
                let i = from * Self::STRIDE;
                let start = self.frames[i + 1];
                let end = self.frames[i + Self::STRIDE + 1];
                start + wrap_degrees(end - start) * percent
            }
        }
    }

    pub fn apply<P: SkeletonPose + ?Sized>(&self, pose: &mut P, time: f32, alpha: f32) {
        let value = self.value_at(time);
        let current = pose.bone_rotation(self.bone_index);
        let amount = wrap_degrees(value - current);
        pose.set_bone_rotation(self.bone_index, current + amount * alpha);
    }
}

impl CurveTimeline for RotateTimeline {
    fn curves(&self) -> &Curves {
        &self.curves
    }

    fn curves_mut(&mut self) -> &mut Curves {
        &mut self.curves
    }
}

/// Two-component bone timeline shared by translation and scale.
/// Frames: `[time, x, y, ...]`. The owning [`super::Timeline`] variant decides which
/// pose field is written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoneTimelineDef")]
pub struct XyTimeline {
    pub bone_index: usize,
    frames: Box<[f32]>,
    curves: Curves,
}

/// Bone translation `(x, y)`.
pub type TranslateTimeline = XyTimeline;

/// Bone scale factors `(x, y)`; identity is 1.
pub type ScaleTimeline = XyTimeline;

impl XyTimeline {
    pub const STRIDE: usize = 3;

    /// # Panics
    /// If `keyframe_count` is zero.
    pub fn new(bone_index: usize, keyframe_count: usize) -> Self {
        assert!(keyframe_count > 0, "xy timeline needs at least one keyframe");
        Self {
            bone_index,
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

    pub fn set_keyframe(&mut self, keyframe_index: usize, time: f32, x: f32, y: f32) {
        let i = keyframe_index * Self::STRIDE;
        self.frames[i] = time;
        self.frames[i + 1] = x;
        self.frames[i + 2] = y;
    }

    #[inline]
    fn keyframe_value(&self, keyframe_index: usize) -> [f32; 2] {
        let i = keyframe_index * Self::STRIDE;
        [self.frames[i + 1], self.frames[i + 2]]
    }

    pub fn value_at(&self, time: f32) -> [f32; 2] {
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

    pub fn apply_translate<P: SkeletonPose + ?Sized>(&self, pose: &mut P, time: f32, alpha: f32) {
        let current = pose.bone_translation(self.bone_index);
        let value = blend(current, self.value_at(time), alpha);
        pose.set_bone_translation(self.bone_index, value);
    }

    pub fn apply_scale<P: SkeletonPose + ?Sized>(&self, pose: &mut P, time: f32, alpha: f32) {
        let current = pose.bone_scale(self.bone_index);
        let value = blend(current, self.value_at(time), alpha);
        pose.set_bone_scale(self.bone_index, value);
    }
}

impl CurveTimeline for XyTimeline {
    fn curves(&self) -> &Curves {
        &self.curves
    }

    fn curves_mut(&mut self) -> &mut Curves {
        &mut self.curves
    }
}

/// Deserialized form shared by bone timelines; rejected unless the buffers are
/// playable.
#[derive(Deserialize)]
struct BoneTimelineDef {
    bone_index: usize,
    frames: Box<[f32]>,
    curves: Curves,
}

impl TryFrom<BoneTimelineDef> for RotateTimeline {
    type Error = AnimationError;

    fn try_from(def: BoneTimelineDef) -> Result<Self> {
        let kind = TimelineKind::Rotate;
        validate_frames(kind.as_str(), kind.stride(), &def.frames, Some(&def.curves))?;
        Ok(Self {
            bone_index: def.bone_index,
            frames: def.frames,
            curves: def.curves,
        })
    }
}

impl TryFrom<BoneTimelineDef> for XyTimeline {
    type Error = AnimationError;

    fn try_from(def: BoneTimelineDef) -> Result<Self> {
        validate_frames("xy", Self::STRIDE, &def.frames, Some(&def.curves))?;
        Ok(Self {
            bone_index: def.bone_index,
            frames: def.frames,
            curves: def.curves,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{BoneData, Skeleton, SkeletonData};

    fn one_bone() -> Skeleton {
        Skeleton::new(SkeletonData {
            bones: vec![BoneData::new("root")],
            slots: vec![],
        })
    }

    #[test]
    fn rotate_takes_short_arc_across_wrap() {
        let mut t = RotateTimeline::new(0, 2);
        t.set_keyframe(0, 0.0, 10.0);
        t.set_keyframe(1, 1.0, 350.0);
        let mid = t.value_at(0.5);
        assert!(mid.abs() < 1e-4, "midpoint {mid} should be 0, not 180");
        assert!((t.value_at(0.25) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn rotate_blend_wraps_against_current_pose() {
        let mut t = RotateTimeline::new(0, 1);
        t.set_keyframe(0, 0.0, 350.0);
        let mut sk = one_bone();
        t.apply(&mut sk, 0.0, 0.5);
        assert!((sk.bones[0].rotation + 5.0).abs() < 1e-4);
    }

    #[test]
    fn stepped_rotation_holds_until_next_key() {
        let mut t = RotateTimeline::new(0, 2);
        t.set_keyframe(0, 0.0, 0.0);
        t.set_keyframe(1, 1.0, 90.0);
        t.set_stepped(0);
        assert_eq!(t.value_at(0.999), 0.0);
        assert_eq!(t.value_at(1.0), 90.0);
    }

    #[test]
    fn translate_and_scale_write_separate_fields() {
        let mut t = XyTimeline::new(0, 2);
        t.set_keyframe(0, 0.0, 0.0, 10.0);
        t.set_keyframe(1, 2.0, 4.0, 20.0);
        let mut sk = one_bone();
        t.apply_translate(&mut sk, 1.0, 1.0);
        assert_eq!(sk.bones[0].x, 2.0);
        assert_eq!(sk.bones[0].y, 15.0);
        assert_eq!(sk.bones[0].scale_x, 1.0);

        t.apply_scale(&mut sk, 2.0, 0.5);
        assert!((sk.bones[0].scale_x - 2.5).abs() < 1e-6);
        assert!((sk.bones[0].scale_y - 10.5).abs() < 1e-6);
    }

    #[test]
    fn bezier_curve_eases_translation() {
        let mut t = XyTimeline::new(0, 2);
        t.set_keyframe(0, 0.0, 0.0, 0.0);
        t.set_keyframe(1, 1.0, 100.0, 100.0);
        t.set_curve(0, 0.8, 0.0, 1.0, 1.0);
        let [x, _] = t.value_at(0.25);
        assert!(x < 25.0, "strong ease-in should lag linear, got {x}");
    }

    #[test]
    #[should_panic(expected = "at least one keyframe")]
    fn zero_keyframes_is_a_contract_violation() {
        let _ = RotateTimeline::new(0, 0);
    }
}
