//! Per-segment easing curves for keyframe timelines.
//!
//! Every keyframe except the last owns the curve used to travel to the next keyframe.
//! A curve maps the linear time fraction inside a segment to an eased fraction:
//! - Linear: unchanged.
//! - Stepped: holds 0 until the segment ends, producing a discrete jump.
//! - Bezier: cubic ease defined by control points (cx1, cy1) and (cx2, cy2) with
//!   implicit end points (0, 0) and (1, 1).
//!
//! Bezier curves are pre-sampled into forward differences at setup time so playback
//! walks a fixed number of subdivisions with additions only, instead of inverting the
//! cubic per lookup.

use serde::{Deserialize, Serialize};

/// Number of subdivisions used to step a bezier curve.
pub const BEZIER_SEGMENTS: usize = 10;

/// Shape of a single curve segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    Linear,
    Stepped,
    Bezier,
}

/// Easing curve for one keyframe segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CurveDef", into = "CurveDef")]
pub enum Curve {
    #[default]
    Linear,
    Stepped,
    Bezier {
        /// Control points (cx1, cy1, cx2, cy2) as authored.
        control: [f32; 4],
        /// Forward differences (dfx, dfy, ddfx, ddfy, dddfx, dddfy).
        steps: [f32; 6],
    },
}

impl Curve {
    /// Build a bezier ease. `cx1`/`cx2` are time fractions in [0, 1]; `cy1`/`cy2` are
    /// value fractions and may overshoot.
    pub fn bezier(cx1: f32, cy1: f32, cx2: f32, cy2: f32) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&cx1) && (0.0..=1.0).contains(&cx2),
            "bezier control x must be in [0, 1] (got {cx1}, {cx2})"
        );
        let subdiv = 1.0 / BEZIER_SEGMENTS as f32;
        let subdiv2 = subdiv * subdiv;
        let subdiv3 = subdiv2 * subdiv;
        let pre1 = 3.0 * subdiv;
        let pre2 = 3.0 * subdiv2;
        let pre4 = 6.0 * subdiv2;
        let pre5 = 6.0 * subdiv3;
        let tmp1x = -cx1 * 2.0 + cx2;
        let tmp1y = -cy1 * 2.0 + cy2;
        let tmp2x = (cx1 - cx2) * 3.0 + 1.0;
        let tmp2y = (cy1 - cy2) * 3.0 + 1.0;
        Curve::Bezier {
            control: [cx1, cy1, cx2, cy2],
            steps: [
                cx1 * pre1 + tmp1x * pre2 + tmp2x * subdiv3,
                cy1 * pre1 + tmp1y * pre2 + tmp2y * subdiv3,
                tmp1x * pre4 + tmp2x * pre5,
                tmp1y * pre4 + tmp2y * pre5,
                tmp2x * pre5,
                tmp2y * pre5,
            ],
        }
    }

    #[inline]
    pub fn curve_type(&self) -> CurveType {
        match self {
            Curve::Linear => CurveType::Linear,
            Curve::Stepped => CurveType::Stepped,
            Curve::Bezier { .. } => CurveType::Bezier,
        }
    }

    /// Map a linear fraction in [0, 1] to the eased fraction.
    /// Inputs at or beyond the ends return exactly 0 or 1 for every curve kind.
    pub fn percent(&self, percent: f32) -> f32 {
        if percent <= 0.0 {
            return 0.0;
        }
        if percent >= 1.0 {
            return 1.0;
        }
        match *self {
            Curve::Linear => percent,
            Curve::Stepped => 0.0,
            Curve::Bezier { steps, .. } => step_bezier(steps, percent),
        }
    }
}

/// Walk the forward differences until x passes `percent`, then interpolate y
/// linearly inside that subdivision. The final subdivision ends at (1, 1).
fn step_bezier(steps: [f32; 6], percent: f32) -> f32 {
    let [mut dfx, mut dfy, mut ddfx, mut ddfy, dddfx, dddfy] = steps;
    let mut x = dfx;
    let mut y = dfy;
    let mut remaining = BEZIER_SEGMENTS - 2;
    loop {
        if x >= percent {
            let last_x = x - dfx;
            let last_y = y - dfy;
            return last_y + (y - last_y) * (percent - last_x) / (x - last_x);
        }
        if remaining == 0 {
            break;
        }
        remaining -= 1;
        dfx += ddfx;
        dfy += ddfy;
        ddfx += dddfx;
        ddfy += dddfy;
        x += dfx;
        y += dfy;
    }
    y + (1.0 - y) * (percent - x) / (1.0 - x)
}

/// Serialized form: curves travel as their authored description and the
/// forward differences are rebuilt on load.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CurveDef {
    Linear,
    Stepped,
    Bezier([f32; 4]),
}

impl From<CurveDef> for Curve {
    fn from(def: CurveDef) -> Self {
        match def {
            CurveDef::Linear => Curve::Linear,
            CurveDef::Stepped => Curve::Stepped,
            CurveDef::Bezier([cx1, cy1, cx2, cy2]) => {
                // Out-of-range x is reported by validation, not by the debug assertion.
                let mut curve = Curve::bezier(cx1.clamp(0.0, 1.0), cy1, cx2.clamp(0.0, 1.0), cy2);
                if let Curve::Bezier { control, .. } = &mut curve {
                    *control = [cx1, cy1, cx2, cy2];
                }
                curve
            }
        }
    }
}

impl From<Curve> for CurveDef {
    fn from(curve: Curve) -> Self {
        match curve {
            Curve::Linear => CurveDef::Linear,
            Curve::Stepped => CurveDef::Stepped,
            Curve::Bezier { control, .. } => CurveDef::Bezier(control),
        }
    }
}

/// Curve table owned by a curve-bearing timeline: one entry per keyframe segment,
/// sized once at construction. New segments default to linear.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curves {
    segments: Box<[Curve]>,
}

impl Curves {
    /// Curve table for a timeline with `keyframe_count` keyframes.
    pub fn new(keyframe_count: usize) -> Self {
        Self {
            segments: vec![Curve::Linear; keyframe_count.saturating_sub(1)].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn get(&self, keyframe_index: usize) -> &Curve {
        &self.segments[keyframe_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Curve> {
        self.segments.iter()
    }

    pub fn set(&mut self, keyframe_index: usize, curve: Curve) {
        self.segments[keyframe_index] = curve;
    }

    pub fn set_linear(&mut self, keyframe_index: usize) {
        self.set(keyframe_index, Curve::Linear);
    }

    pub fn set_stepped(&mut self, keyframe_index: usize) {
        self.set(keyframe_index, Curve::Stepped);
    }

    /// Set a bezier ease for the segment leaving `keyframe_index`.
    /// `cx1`/`cx2` are the percent of time between the two keyframes, `cy1`/`cy2`
    /// the percent of the difference between their values.
    pub fn set_curve(&mut self, keyframe_index: usize, cx1: f32, cy1: f32, cx2: f32, cy2: f32) {
        self.set(keyframe_index, Curve::bezier(cx1, cy1, cx2, cy2));
    }

    #[inline]
    pub fn curve_type(&self, keyframe_index: usize) -> CurveType {
        self.segments[keyframe_index].curve_type()
    }

    #[inline]
    pub fn curve_percent(&self, keyframe_index: usize, percent: f32) -> f32 {
        self.segments[keyframe_index].percent(percent)
    }
}
