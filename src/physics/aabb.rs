//! Axis-aligned bounding boxes

use cgmath::{Matrix4, Vector3, Vector4};

/// An axis-aligned bounding box in 3D space
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Creates a new AABB from min and max corners
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Creates an AABB that encompasses all the given points.
    /// Returns None if the points slice is empty.
    pub fn from_points(points: &[Vector3<f32>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut min = *first;
        let mut max = *first;

        for point in rest {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            min.z = min.z.min(point.z);

            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
            max.z = max.z.max(point.z);
        }

        Some(Self { min, max })
    }

    /// Returns the 8 corner points of the AABB
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Transforms the box by a 4x4 matrix.
    ///
    /// All 8 corners are transformed and re-enclosed, so a rotated box grows to stay
    /// axis-aligned.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = self.corners().map(|corner| {
            let h = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
            Vector3::new(h.x, h.y, h.z)
        });

        let mut result = Self::new(corners[0], corners[0]);
        for corner in &corners[1..] {
            result = result.expand(*corner);
        }
        result
    }

    /// Expands the AABB to include the given point
    pub fn expand(&self, point: Vector3<f32>) -> Self {
        Self {
            min: Vector3::new(
                self.min.x.min(point.x),
                self.min.y.min(point.y),
                self.min.z.min(point.z),
            ),
            max: Vector3::new(
                self.max.x.max(point.x),
                self.max.y.max(point.y),
                self.max.z.max(point.z),
            ),
        }
    }

    /// Shifts both corners by `offset`
    pub fn translate(&self, offset: Vector3<f32>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Vector3<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Point of the box nearest to `point`, found by clamping each axis
    pub fn closest_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Returns the center point of the AABB
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Matrix4};

    fn unit_box() -> Aabb {
        Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_from_points_empty() {
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points(&[
            Vector3::new(1.0, -2.0, 3.0),
            Vector3::new(-1.0, 4.0, 0.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vector3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn test_transform_translation() {
        let moved = unit_box().transform(&Matrix4::from_translation(Vector3::new(5.0, 0.0, 0.0)));
        assert!((moved.min.x - 4.0).abs() < 1e-6);
        assert!((moved.max.x - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_transform_rotation_grows_box() {
        let rotated = unit_box().transform(&Matrix4::from_angle_z(Deg(45.0)));
        let expected = 2.0_f32.sqrt();
        assert!((rotated.max.x - expected).abs() < 1e-5);
        assert!((rotated.max.y - expected).abs() < 1e-5);
        assert!((rotated.max.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_contains_and_closest_point() {
        let aabb = unit_box();
        assert!(aabb.contains(Vector3::new(1.0, 0.0, -1.0)));
        assert!(!aabb.contains(Vector3::new(1.1, 0.0, 0.0)));
        assert_eq!(
            aabb.closest_point(Vector3::new(3.0, 0.5, -7.0)),
            Vector3::new(1.0, 0.5, -1.0)
        );
    }

    #[test]
    fn test_translate() {
        let shifted = unit_box().translate(Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(shifted.center(), Vector3::new(0.0, 2.0, 0.0));
    }
}
