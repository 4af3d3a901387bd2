use rig_animation_core::{Curve, CurveType, Curves};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn all_kinds() -> Vec<Curve> {
    vec![
        Curve::Linear,
        Curve::Stepped,
        Curve::bezier(0.42, 0.0, 0.58, 1.0),
        Curve::bezier(0.0, 0.0, 1.0, 1.0),
        Curve::bezier(1.0, 0.0, 0.0, 1.0),
        Curve::bezier(0.3, -0.6, 0.7, 1.6),
    ]
}

#[test]
fn endpoints_are_exact_for_every_kind() {
    for curve in all_kinds() {
        assert_eq!(curve.percent(0.0), 0.0, "{curve:?}");
        assert_eq!(curve.percent(1.0), 1.0, "{curve:?}");
        assert_eq!(curve.percent(-0.5), 0.0, "{curve:?}");
        assert_eq!(curve.percent(1.5), 1.0, "{curve:?}");
    }
}

#[test]
fn stepped_holds_zero_until_segment_end() {
    let curve = Curve::Stepped;
    for i in 0..100 {
        let p = i as f32 / 100.0;
        assert_eq!(curve.percent(p), 0.0, "p={p}");
    }
    assert_eq!(curve.percent(0.99999), 0.0);
    assert_eq!(curve.percent(1.0), 1.0);
}

#[test]
fn linear_passes_through() {
    for i in 0..=10 {
        let p = i as f32 / 10.0;
        assert_eq!(Curve::Linear.percent(p), p);
    }
}

#[test]
fn bezier_stepper_tracks_exact_cubic() {
    // Reference: invert x(t) by bisection and evaluate y(t).
    fn cubic(p1: f32, p2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }
    let (cx1, cy1, cx2, cy2) = (0.25, 0.1, 0.25, 1.0);
    let curve = Curve::bezier(cx1, cy1, cx2, cy2);
    for i in 1..20 {
        let x = i as f32 / 20.0;
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        for _ in 0..40 {
            let mid = 0.5 * (lo + hi);
            if cubic(cx1, cx2, mid) < x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let expected = cubic(cy1, cy2, 0.5 * (lo + hi));
        approx(curve.percent(x), expected, 0.03);
    }
}

#[test]
fn overshooting_controls_leave_unit_range() {
    let curve = Curve::bezier(0.3, -0.6, 0.7, 1.6);
    assert!(curve.percent(0.15) < 0.0);
    assert!(curve.percent(0.85) > 1.0);
}

#[test]
fn table_setters_address_segments() {
    let mut curves = Curves::new(5);
    assert_eq!(curves.len(), 4);
    curves.set_stepped(0);
    curves.set_curve(1, 0.42, 0.0, 0.58, 1.0);
    curves.set_linear(3);

    assert_eq!(curves.curve_type(0), CurveType::Stepped);
    assert_eq!(curves.curve_type(1), CurveType::Bezier);
    assert_eq!(curves.curve_type(2), CurveType::Linear);
    assert_eq!(curves.curve_percent(0, 0.7), 0.0);
    assert_eq!(curves.curve_percent(2, 0.7), 0.7);
    approx(curves.curve_percent(1, 0.5), 0.5, 0.02);
    for segment in 0..curves.len() {
        assert_eq!(curves.curve_percent(segment, 0.0), 0.0);
        assert_eq!(curves.curve_percent(segment, 1.0), 1.0);
    }
}

#[test]
#[should_panic]
fn segment_index_past_table_panics() {
    let curves = Curves::new(2);
    let _ = curves.curve_percent(1, 0.5);
}
