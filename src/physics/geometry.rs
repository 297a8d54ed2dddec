//! Geometric primitives shared by the collision handlers.

use super::aabb::Aabb;
use super::EPSILON;
use cgmath::{InnerSpace, MetricSpace, Vector3};

/// Result of projecting a point onto a line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Distance from the query point to `closest_point`
    pub distance: f32,
    /// Nearest point on the segment
    pub closest_point: Vector3<f32>,
    /// Clamped segment parameter in `[0, 1]`, 0 at `a` and 1 at `b`
    pub t: f32,
}

/// Finds the point on segment `ab` nearest to `p`.
///
/// A degenerate segment (`a == b` within epsilon) collapses to the point `a`, reported
/// with `t = 0`.
pub fn distance_point_to_segment(
    p: Vector3<f32>,
    a: Vector3<f32>,
    b: Vector3<f32>,
) -> SegmentProjection {
    let ab = b - a;
    let length_sq = ab.magnitude2();

    if length_sq < EPSILON {
        return SegmentProjection {
            distance: p.distance(a),
            closest_point: a,
            t: 0.0,
        };
    }

    let t = ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    let closest_point = a + ab * t;

    SegmentProjection {
        distance: p.distance(closest_point),
        closest_point,
        t,
    }
}

/// Sphere against axis-aligned box.
///
/// The sphere center is clamped into the box per axis; touching counts as a hit.
pub fn sphere_aabb_collision(center: Vector3<f32>, radius: f32, aabb: &Aabb) -> bool {
    aabb.closest_point(center).distance(center) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn v(x: f32, y: f32, z: f32) -> Vector3<f32> {
        Vector3::new(x, y, z)
    }

    #[test]
    fn test_interior_projection_is_perpendicular() {
        let proj = distance_point_to_segment(v(1.0, 2.0, 0.0), v(0.0, 0.0, 0.0), v(4.0, 0.0, 0.0));
        assert!((proj.distance - 2.0).abs() < 1e-6);
        assert!((proj.t - 0.25).abs() < 1e-6);
        assert_eq!(proj.closest_point, v(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_exterior_projection_clamps_to_endpoint() {
        let proj = distance_point_to_segment(v(-3.0, 4.0, 0.0), v(0.0, 0.0, 0.0), v(4.0, 0.0, 0.0));
        assert_eq!(proj.t, 0.0);
        assert!((proj.distance - 5.0).abs() < 1e-6);

        let proj = distance_point_to_segment(v(10.0, 0.0, 0.0), v(0.0, 0.0, 0.0), v(4.0, 0.0, 0.0));
        assert_eq!(proj.t, 1.0);
        assert_eq!(proj.closest_point, v(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_degenerate_segment() {
        let a = v(1.0, 1.0, 1.0);
        let proj = distance_point_to_segment(v(1.0, 4.0, 1.0), a, a);
        assert_eq!(proj.t, 0.0);
        assert_eq!(proj.closest_point, a);
        assert!((proj.distance - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_bounds_randomized() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let mut point = || v(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));
            let (p, a, b) = (point(), point(), point());
            let proj = distance_point_to_segment(p, a, b);
            assert!((0.0..=1.0).contains(&proj.t));
            assert!(proj.distance >= 0.0);
            assert!(proj.distance <= p.distance(a) + 1e-3);
            assert!(proj.distance <= p.distance(b) + 1e-3);
        }
    }

    #[test]
    fn test_sphere_aabb_touching_is_collision() {
        let aabb = Aabb::new(v(0.0, 0.0, 0.0), v(1.0, 1.0, 1.0));
        assert!(sphere_aabb_collision(v(3.0, 0.5, 0.5), 2.0, &aabb));
        assert!(!sphere_aabb_collision(v(3.1, 0.5, 0.5), 2.0, &aabb));
        assert!(sphere_aabb_collision(v(0.5, 0.5, 0.5), 0.1, &aabb));
    }

    #[test]
    fn test_sphere_aabb_translation_invariant() {
        let mut rng = rand::rng();
        let aabb = Aabb::new(v(-1.0, -2.0, -0.5), v(1.0, 2.0, 0.5));
        for _ in 0..200 {
            let center = v(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
            let radius = rng.random_range(0.1..3.0);
            // Integer offsets keep the shifted comparison exact enough in f32
            let offset = v(
                rng.random_range(-20..20) as f32,
                rng.random_range(-20..20) as f32,
                rng.random_range(-20..20) as f32,
            );
            let base = aabb.closest_point(center).distance(center);
            // Skip cases sitting right on the boundary
            if (base - radius).abs() < 1e-3 {
                continue;
            }
            assert_eq!(
                sphere_aabb_collision(center, radius, &aabb),
                sphere_aabb_collision(center + offset, radius, &aabb.translate(offset))
            );
        }
    }
}
