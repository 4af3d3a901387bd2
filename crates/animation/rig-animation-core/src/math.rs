//! Scalar helpers shared by the timeline samplers:
//! - lerp_f32 / lerp_array (component-wise linear interpolation)
//! - wrap_degrees (shortest-arc angle deltas)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise lerp for fixed-size arrays.
#[inline]
pub fn lerp_array<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    let mut out = [0.0f32; N];
    for i in 0..N {
        out[i] = lerp_f32(a[i], b[i], t);
    }
    out
}

/// Wrap an angle delta in degrees into (-180, 180].
///
/// Applied to differences between two angles so that interpolation follows the
/// shortest arc. Values already in range are returned untouched.
#[inline]
pub fn wrap_degrees(delta: f32) -> f32 {
    if delta > -180.0 && delta <= 180.0 {
        return delta;
    }
    let wrapped = delta - 360.0 * (delta / 360.0).round();
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_degrees_picks_short_arc() {
        assert_eq!(wrap_degrees(340.0), -20.0);
        assert_eq!(wrap_degrees(-340.0), 20.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(90.0), 90.0);
        assert!((wrap_degrees(725.0) - 5.0).abs() < 1e-4);
        assert!((wrap_degrees(-1070.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn lerp_array_componentwise() {
        let out = lerp_array([0.0, 2.0, -4.0], [1.0, 4.0, 4.0], 0.5);
        assert_eq!(out, [0.5, 3.0, 0.0]);
    }
}
