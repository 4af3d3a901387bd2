//! Keyframe timelines: one variant per animated rig property.
//!
//! Model:
//! - Each timeline owns a flat keyframe buffer `[time, field...]` with a fixed stride,
//!   allocated once and mutated only through `set_keyframe`.
//! - Curve-bearing timelines own one easing curve per segment (see [`crate::curve`]).
//! - `apply(pose, time, alpha)` clamps `time` to the keyframe range, locates the
//!   segment by binary search, eases the segment fraction, interpolates each field
//!   and blends the result into the pose: `current + (computed - current) * alpha`.
//! - Attachments are discrete: the keyframe at or before `time` wins and `alpha` is
//!   ignored.

mod bone;
mod slot;

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, Curves};
use crate::error::{AnimationError, Result};
use crate::skeleton::SkeletonPose;

pub use bone::{RotateTimeline, ScaleTimeline, TranslateTimeline, XyTimeline};
pub use slot::{AttachmentTimeline, ColorTimeline};

/// Which property a timeline drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    Rotate,
    Translate,
    Scale,
    Color,
    Attachment,
}

impl TimelineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TimelineKind::Rotate => "rotate",
            TimelineKind::Translate => "translate",
            TimelineKind::Scale => "scale",
            TimelineKind::Color => "color",
            TimelineKind::Attachment => "attachment",
        }
    }

    /// Floats per keyframe in the flat frame buffer.
    pub fn stride(self) -> usize {
        match self {
            TimelineKind::Rotate => RotateTimeline::STRIDE,
            TimelineKind::Translate | TimelineKind::Scale => XyTimeline::STRIDE,
            TimelineKind::Color => ColorTimeline::STRIDE,
            TimelineKind::Attachment => AttachmentTimeline::STRIDE,
        }
    }

    /// True for kinds that address a bone (as opposed to a slot).
    pub fn targets_bone(self) -> bool {
        matches!(
            self,
            TimelineKind::Rotate | TimelineKind::Translate | TimelineKind::Scale
        )
    }
}

/// Shared curve API for timelines that ease between keyframes.
pub trait CurveTimeline {
    fn curves(&self) -> &Curves;
    fn curves_mut(&mut self) -> &mut Curves;

    fn set_linear(&mut self, keyframe_index: usize) {
        self.curves_mut().set_linear(keyframe_index);
    }

    fn set_stepped(&mut self, keyframe_index: usize) {
        self.curves_mut().set_stepped(keyframe_index);
    }

    /// See [`Curves::set_curve`].
    fn set_curve(&mut self, keyframe_index: usize, cx1: f32, cy1: f32, cx2: f32, cy2: f32) {
        self.curves_mut()
            .set_curve(keyframe_index, cx1, cy1, cx2, cy2);
    }

    fn curve_percent(&self, keyframe_index: usize, percent: f32) -> f32 {
        self.curves().curve_percent(keyframe_index, percent)
    }
}

/// A timeline for one property of one bone or slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Timeline {
    Rotate(RotateTimeline),
    Translate(TranslateTimeline),
    Scale(ScaleTimeline),
    Color(ColorTimeline),
    Attachment(AttachmentTimeline),
}

impl Timeline {
    #[inline]
    pub fn kind(&self) -> TimelineKind {
        match self {
            Timeline::Rotate(_) => TimelineKind::Rotate,
            Timeline::Translate(_) => TimelineKind::Translate,
            Timeline::Scale(_) => TimelineKind::Scale,
            Timeline::Color(_) => TimelineKind::Color,
            Timeline::Attachment(_) => TimelineKind::Attachment,
        }
    }

    /// Bone index for bone timelines, slot index for slot timelines.
    pub fn target_index(&self) -> usize {
        match self {
            Timeline::Rotate(t) => t.bone_index,
            Timeline::Translate(t) | Timeline::Scale(t) => t.bone_index,
            Timeline::Color(t) => t.slot_index,
            Timeline::Attachment(t) => t.slot_index,
        }
    }

    /// Time of the last keyframe.
    pub fn duration(&self) -> f32 {
        match self {
            Timeline::Rotate(t) => t.duration(),
            Timeline::Translate(t) | Timeline::Scale(t) => t.duration(),
            Timeline::Color(t) => t.duration(),
            Timeline::Attachment(t) => t.duration(),
        }
    }

    pub fn keyframe_count(&self) -> usize {
        match self {
            Timeline::Rotate(t) => t.keyframe_count(),
            Timeline::Translate(t) | Timeline::Scale(t) => t.keyframe_count(),
            Timeline::Color(t) => t.keyframe_count(),
            Timeline::Attachment(t) => t.keyframe_count(),
        }
    }

    /// Curve table, absent for attachment timelines.
    pub fn curves(&self) -> Option<&Curves> {
        match self {
            Timeline::Rotate(t) => Some(t.curves()),
            Timeline::Translate(t) | Timeline::Scale(t) => Some(t.curves()),
            Timeline::Color(t) => Some(t.curves()),
            Timeline::Attachment(_) => None,
        }
    }

    pub fn curves_mut(&mut self) -> Option<&mut Curves> {
        match self {
            Timeline::Rotate(t) => Some(t.curves_mut()),
            Timeline::Translate(t) | Timeline::Scale(t) => Some(t.curves_mut()),
            Timeline::Color(t) => Some(t.curves_mut()),
            Timeline::Attachment(_) => None,
        }
    }

    /// Write (alpha = 1) or blend (alpha < 1) this timeline's value at `time` into `pose`.
    pub fn apply<P: SkeletonPose + ?Sized>(&self, pose: &mut P, time: f32, alpha: f32) {
        match self {
            Timeline::Rotate(t) => t.apply(pose, time, alpha),
            Timeline::Translate(t) => t.apply_translate(pose, time, alpha),
            Timeline::Scale(t) => t.apply_scale(pose, time, alpha),
            Timeline::Color(t) => t.apply(pose, time, alpha),
            Timeline::Attachment(t) => t.apply(pose, time),
        }
    }

    /// Check buffer shapes, keyframe ordering and curve controls.
    ///
    /// Deserialized timelines are checked on load; this covers hand-built ones.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind();
        let (name, stride) = (kind.as_str(), kind.stride());
        match self {
            Timeline::Rotate(t) => validate_frames(name, stride, t.frames(), Some(t.curves())),
            Timeline::Translate(t) | Timeline::Scale(t) => {
                validate_frames(name, stride, t.frames(), Some(t.curves()))
            }
            Timeline::Color(t) => validate_frames(name, stride, t.frames(), Some(t.curves())),
            Timeline::Attachment(t) => validate_attachment(t.frames(), t.names()),
        }
    }

    /// Wrap a bone translation timeline.
    pub fn translate(t: TranslateTimeline) -> Self {
        Timeline::Translate(t)
    }

    /// Wrap a bone scale timeline.
    pub fn scale(t: ScaleTimeline) -> Self {
        Timeline::Scale(t)
    }
}

impl From<RotateTimeline> for Timeline {
    fn from(t: RotateTimeline) -> Self {
        Timeline::Rotate(t)
    }
}

impl From<ColorTimeline> for Timeline {
    fn from(t: ColorTimeline) -> Self {
        Timeline::Color(t)
    }
}

impl From<AttachmentTimeline> for Timeline {
    fn from(t: AttachmentTimeline) -> Self {
        Timeline::Attachment(t)
    }
}

/// Where `time` falls within a keyframe buffer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Segment {
    /// Outside the keyframe range (or a single keyframe): hold this keyframe.
    Hold(usize),
    /// Between keyframe `from` and `from + 1`, at linear fraction `percent`.
    Between { from: usize, percent: f32 },
}

/// Locate `time` in a flat buffer with `stride` floats per keyframe (time first).
/// Times before the first keyframe (and NaN) clamp to it; times at or after the last
/// clamp to the last. A time equal to an inner keyframe starts that keyframe's segment.
pub(crate) fn find_segment(frames: &[f32], stride: usize, time: f32) -> Segment {
    let count = frames.len() / stride;
    debug_assert!(count > 0, "timeline has no keyframes");
    let last = count - 1;
    if count == 1 || time.is_nan() || time < frames[0] {
        return Segment::Hold(0);
    }
    if time >= frames[last * stride] {
        return Segment::Hold(last);
    }
    // Invariant: frames[low] <= time < frames[high].
    let mut low = 0;
    let mut high = last;
    while high - low > 1 {
        let mid = (low + high) / 2;
        if frames[mid * stride] <= time {
            low = mid;
        } else {
            high = mid;
        }
    }
    let t0 = frames[low * stride];
    let t1 = frames[high * stride];
    let percent = ((time - t0) / (t1 - t0)).clamp(0.0, 1.0);
    Segment::Between { from: low, percent }
}

/// Blend `value` into `current` by `alpha`; alpha = 1 overwrites exactly.
#[inline]
pub(crate) fn blend<const N: usize>(current: [f32; N], value: [f32; N], alpha: f32) -> [f32; N] {
    if alpha == 1.0 {
        value
    } else {
        crate::math::lerp_array(current, value, alpha)
    }
}

/// Shape checks shared by every timeline kind. `name` labels errors.
pub(crate) fn validate_frames(
    name: &'static str,
    stride: usize,
    frames: &[f32],
    curves: Option<&Curves>,
) -> Result<()> {
    if frames.is_empty() {
        return Err(AnimationError::EmptyTimeline { kind: name });
    }
    if frames.len() % stride != 0 {
        return Err(AnimationError::FrameStride {
            kind: name,
            len: frames.len(),
            stride,
        });
    }
    let keyframes = frames.len() / stride;
    let mut previous = f32::NEG_INFINITY;
    for (index, time) in frames.iter().step_by(stride).copied().enumerate() {
        if !time.is_finite() {
            return Err(AnimationError::NonFiniteTime {
                kind: name,
                index,
                time,
            });
        }
        if time < previous {
            return Err(AnimationError::UnsortedKeyframes {
                kind: name,
                index,
                time,
                previous,
            });
        }
        previous = time;
    }
    if let Some(curves) = curves {
        let expected = keyframes - 1;
        if curves.len() != expected {
            return Err(AnimationError::CurveCount {
                kind: name,
                keyframes,
                expected,
                actual: curves.len(),
            });
        }
        for (index, curve) in curves.iter().enumerate() {
            if let Curve::Bezier { control, .. } = curve {
                for value in [control[0], control[2]] {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(AnimationError::CurveControl {
                            kind: name,
                            index,
                            value,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn validate_attachment(frames: &[f32], names: &[Option<String>]) -> Result<()> {
    validate_frames(
        TimelineKind::Attachment.as_str(),
        AttachmentTimeline::STRIDE,
        frames,
        None,
    )?;
    if names.len() != frames.len() {
        return Err(AnimationError::AttachmentCount {
            keyframes: frames.len(),
            names: names.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAMES: [f32; 8] = [0.0, 10.0, 1.0, 20.0, 1.0, 30.0, 3.0, 40.0];

    #[test]
    fn find_segment_clamps_ends() {
        assert_eq!(find_segment(&FRAMES, 2, -1.0), Segment::Hold(0));
        assert_eq!(find_segment(&FRAMES, 2, 3.0), Segment::Hold(3));
        assert_eq!(find_segment(&FRAMES, 2, 99.0), Segment::Hold(3));
        assert_eq!(find_segment(&[5.0, 1.0], 2, 0.0), Segment::Hold(0));
    }

    #[test]
    fn find_segment_starts_at_exact_keyframe() {
        assert_eq!(
            find_segment(&FRAMES, 2, 0.0),
            Segment::Between {
                from: 0,
                percent: 0.0
            }
        );
        // Duplicate times: the later keyframe owns the instant.
        assert_eq!(
            find_segment(&FRAMES, 2, 1.0),
            Segment::Between {
                from: 2,
                percent: 0.0
            }
        );
        assert_eq!(
            find_segment(&FRAMES, 2, 2.0),
            Segment::Between {
                from: 2,
                percent: 0.5
            }
        );
    }

    #[test]
    fn validate_reports_hand_built_errors() {
        let mut rotate = RotateTimeline::new(0, 2);
        rotate.set_keyframe(0, 1.0, 0.0);
        rotate.set_keyframe(1, 0.5, 0.0);
        assert!(matches!(
            Timeline::from(rotate).validate(),
            Err(AnimationError::UnsortedKeyframes { index: 1, .. })
        ));

        let mut color = ColorTimeline::new(0, 2);
        color.set_keyframe(1, f32::NAN, 1.0, 1.0, 1.0, 1.0);
        assert!(matches!(
            Timeline::from(color).validate(),
            Err(AnimationError::NonFiniteTime { index: 1, .. })
        ));
    }

    fn rejected(json: &str) -> String {
        match serde_json::from_str::<Timeline>(json) {
            Ok(t) => panic!("accepted malformed timeline {t:?}"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn deserialize_rejects_malformed_buffers() {
        let msg = rejected(
            r#"{ "type": "rotate", "bone_index": 0, "frames": [0, 0, 1, 5], "curves": [] }"#,
        );
        assert!(msg.contains("0 curves for 2 keyframes"), "{msg}");

        let msg = rejected(r#"{ "type": "rotate", "bone_index": 0, "frames": [], "curves": [] }"#);
        assert!(msg.contains("no keyframes"), "{msg}");

        let msg = rejected(r#"{ "type": "rotate", "bone_index": 0, "frames": [0, 1, 1], "curves": [] }"#);
        assert!(msg.contains("not a multiple of stride 2"), "{msg}");

        let msg = rejected(
            r#"{ "type": "color", "slot_index": 0, "frames": [0,1,1,1,1, 1,0,0,0,0], "curves": [{ "bezier": [1.5, 0, 0.5, 1] }] }"#,
        );
        assert!(msg.contains("control x 1.5"), "{msg}");

        let msg = rejected(r#"{ "type": "attachment", "slot_index": 0, "frames": [0, 1], "names": ["a"] }"#);
        assert!(msg.contains("1 names for 2 keyframes"), "{msg}");

        let msg = rejected(
            r#"{ "type": "scale", "bone_index": 0, "frames": [0, 1, 1, 1, 2, 2], "curves": ["linear", "linear"] }"#,
        );
        assert!(msg.contains("2 curves for 2 keyframes"), "{msg}");
    }

    #[test]
    fn find_segment_holds_first_keyframe_for_nan() {
        assert_eq!(find_segment(&FRAMES, 2, f32::NAN), Segment::Hold(0));
        assert_eq!(find_segment(&FRAMES, 2, f32::INFINITY), Segment::Hold(3));
        assert_eq!(find_segment(&FRAMES, 2, f32::NEG_INFINITY), Segment::Hold(0));
    }

    #[test]
    fn serde_tags_by_kind() {
        let mut scale = ScaleTimeline::new(2, 2);
        scale.set_keyframe(0, 0.0, 1.0, 1.0);
        scale.set_keyframe(1, 0.5, 2.0, 2.0);
        scale.set_stepped(0);
        let t = Timeline::scale(scale);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "scale");
        assert_eq!(json["bone_index"], 2);
        assert_eq!(json["curves"][0], "stepped");
        let back: Timeline = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.kind(), TimelineKind::Scale);
        assert!(back.kind().targets_bone());
    }
}
