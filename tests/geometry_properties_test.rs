//! Property-based tests for the geometry kernel and pixel conversions.
//!
//! 1. A line through P and Q passes P at scale 0 and Q at scale 1.
//! 2. A plane contains its support point and rejects points off its surface.
//! 3. A vector is parallel to any scaled copy of itself.
//! 4. A cross product is orthogonal to both factors.
//! 5. Points on a screen map into its pixel rectangle; points off it fail.
//! 6. Jitter suppression keeps or replaces each axis, never anything else.
//! 7. Pointer separation reaches the minimum around the shared midpoint.

use body_pointer::{
    constants::GEOMETRY_EPSILON,
    controller::{enforce_separation, suppress_jitter},
    geom::{Line, Plane3D, Point3D, Vector3D},
    screen::{EnvironmentPreset, PixelPos, ScreenEnvironment},
    utils::safe_cast::f64_to_i32_clamp,
    Error,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn point_strategy() -> impl Strategy<Value = Point3D> {
    (-3000.0..3000.0f64, -3000.0..3000.0f64, -3000.0..3000.0f64).prop_map(|(x, y, z)| Point3D::new(x, y, z))
}

fn vector_strategy() -> impl Strategy<Value = Vector3D> {
    (-100.0..100.0f64, -100.0..100.0f64, -100.0..100.0f64)
        .prop_map(|(x, y, z)| Vector3D::new(x, y, z))
        .prop_filter("non-zero", |v| v.magnitude() > 1e-3)
}

fn pixel_strategy() -> impl Strategy<Value = PixelPos> {
    (0..1920i32, 0..1080i32).prop_map(|(x, y)| PixelPos::new(x, y))
}

fn close(a: &Point3D, b: &Point3D) -> bool {
    a.distance(b) < 1e-6
}

// ── 1. Line round trip ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn line_passes_its_defining_points(p in point_strategy(), q in point_strategy()) {
        prop_assume!(p.distance(&q) > 1e-3);
        let line = Line::from_points(&p, &q).unwrap();
        prop_assert!(close(&line.point_at(0.0), &p), "scale 0 gave {}", line.point_at(0.0));
        prop_assert!(close(&line.point_at(1.0), &q), "scale 1 gave {}", line.point_at(1.0));
        prop_assert!(line.check_point_scale_positive_direction(&q, GEOMETRY_EPSILON).unwrap());
    }
}

// ── 2. Plane containment ────────────────────────────────────────────────

proptest! {
    #[test]
    fn plane_contains_support_only(
        support in point_strategy(),
        d1 in vector_strategy(),
        d2 in vector_strategy(),
        offset in 0.01..100.0f64,
    ) {
        let spread = d1.cross(&d2).magnitude() / (d1.magnitude() * d2.magnitude());
        prop_assume!(spread > 0.05);

        let plane = Plane3D::from_vectors(&support.to_vector(), &d1, &d2).unwrap().normalized();
        prop_assert!(plane.contains_point(&support, GEOMETRY_EPSILON));

        let normal = plane.normal();
        let off = Point3D::from_vector(support.to_vector() + normal.scale(offset));
        prop_assert!(!plane.contains_point(&off, GEOMETRY_EPSILON));
    }
}

// ── 3. Parallel detection ───────────────────────────────────────────────

proptest! {
    #[test]
    fn scaled_vector_is_parallel(v in vector_strategy(), factor in prop_oneof![-10.0..-0.1f64, 0.1..10.0f64]) {
        prop_assert!(Vector3D::check_parallel(&v, &v.scale(factor), GEOMETRY_EPSILON));
        prop_assert!(Vector3D::check_parallel(&v, &v.scale(-3.0), GEOMETRY_EPSILON));
    }
}

// ── 4. Orthogonality of the cross product ───────────────────────────────

proptest! {
    #[test]
    fn cross_product_is_orthogonal(v in vector_strategy(), u in vector_strategy()) {
        let w = v.cross(&u);
        prop_assume!(w.magnitude() > 1e-3);
        prop_assert!(Vector3D::check_orthogonal(&v, &w, GEOMETRY_EPSILON));
        prop_assert!(Vector3D::check_orthogonal(&u, &w, GEOMETRY_EPSILON));
    }
}

// ── 5. Screen pixel mapping ─────────────────────────────────────────────

proptest! {
    #[test]
    fn points_on_screen_map_into_its_pixels(x in -825.0..825.0f64, y in -1080.0..-150.0f64) {
        let environment = ScreenEnvironment::preset(EnvironmentPreset::SingleAbove).unwrap();
        let screen = &environment.screens()[0];
        let point = Point3D::new(x, y, 0.0);

        prop_assert!(screen.contains_point(&point));
        let px = screen.coords_to_px(&point).unwrap();
        prop_assert!((0..=1920).contains(&px.x), "x out of range: {}", px);
        prop_assert!((0..=1080).contains(&px.y), "y out of range: {}", px);
    }

    #[test]
    fn points_beside_screen_are_rejected(x in 826.0..5000.0f64, y in -1080.0..-150.0f64, mirror in any::<bool>()) {
        let environment = ScreenEnvironment::preset(EnvironmentPreset::SingleAbove).unwrap();
        let screen = &environment.screens()[0];
        let x = if mirror { -x } else { x };

        let result = screen.coords_to_px(&Point3D::new(x, y, 0.0));
        prop_assert!(matches!(result, Err(Error::NotOnScreen { .. })), "{:?}", result);
    }
}

// ── 6. Jitter suppression ───────────────────────────────────────────────

proptest! {
    #[test]
    fn jitter_keeps_or_replaces_each_axis(raw in pixel_strategy(), previous in pixel_strategy(), threshold in 0..20i32) {
        let out = suppress_jitter(raw, Some(previous), threshold);
        for (out, raw, previous) in [(out.x, raw.x, previous.x), (out.y, raw.y, previous.y)] {
            if (raw - previous).abs() >= threshold {
                prop_assert_eq!(out, raw);
            } else {
                prop_assert_eq!(out, previous);
            }
        }
    }
}

// ── 7. Pointer separation ───────────────────────────────────────────────

proptest! {
    #[test]
    fn separation_reaches_minimum(right in pixel_strategy(), left in pixel_strategy(), min in 1.0..200.0f64) {
        let (r, l) = enforce_separation(right, left, min);
        prop_assert!(r.distance(&l) >= min, "{} and {} closer than {}", r, l, min);

        if right.distance(&left) < min {
            // Midpoint moves by rounding at most
            prop_assert!(((r.x + l.x) - (right.x + left.x)).abs() <= 1);
            prop_assert!(((r.y + l.y) - (right.y + left.y)).abs() <= 1);
        } else {
            prop_assert_eq!((r, l), (right, left));
        }
    }

    #[test]
    fn clamped_cast_stays_in_range(value in any::<f64>(), min in -5000..5000i32, span in 0..5000i32) {
        let out = f64_to_i32_clamp(value, min, min + span);
        prop_assert!(out >= min && out <= min + span);
    }
}
