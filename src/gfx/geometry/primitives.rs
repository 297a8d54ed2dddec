//! # Primitive Shape Generation
//!
//! Y-up primitives sized in scene units. Boxes and cylinders are centered at the origin,
//! so a cylinder of height `h` spans `-h/2..h/2` along Y.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a box centered at the origin
///
/// `width` runs along X, `height` along Y and `depth` along Z.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    // (normal, four corners in counter-clockwise order seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]]),
        ([0.0, 0.0, -1.0], [[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]]),
        ([-1.0, 0.0, 0.0], [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]]),
        ([1.0, 0.0, 0.0], [[hx, -hy, hz], [hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz]]),
        ([0.0, 1.0, 0.0], [[-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz], [-hx, hy, -hz]]),
        ([0.0, -1.0, 0.0], [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]]),
    ];

    for (normal, corners) in faces.iter() {
        let base = data.vertices.len() as u32;
        for corner in corners {
            data.vertices.push(*corner);
            data.normals.push(*normal);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a Y-aligned cylinder
///
/// Different top and bottom radii give a cone frustum. Caps are included.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Side ring pairs: bottom vertex, then top vertex
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();

        data.vertices
            .push([radius_bottom * cos_a, -half_height, radius_bottom * sin_a]);
        data.normals.push([cos_a, 0.0, sin_a]);

        data.vertices.push([radius_top * cos_a, half_height, radius_top * sin_a]);
        data.normals.push([cos_a, 0.0, sin_a]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices
            .extend_from_slice(&[bottom_current, top_current, bottom_next]);
        data.indices.extend_from_slice(&[top_current, top_next, bottom_next]);
    }

    let center_bottom_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);

    let center_top_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, half_height, 0.0]);
    data.normals.push([0.0, 1.0, 0.0]);

    for i in 0..segs {
        let current = i * 2;
        let next = (i + 1) * 2;
        data.indices.extend_from_slice(&[center_bottom_idx, next, current]);
        data.indices
            .extend_from_slice(&[center_top_idx, current + 1, next + 1]);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_box_bounds_match_dimensions() {
        let mut domino = generate_box(0.5, 10.0, 5.0);
        let bounds = domino.compute_bounding_box().unwrap();
        assert!((bounds.min.x + 0.25).abs() < 1e-6);
        assert!((bounds.max.y - 5.0).abs() < 1e-6);
        assert!((bounds.max.z - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_generation() {
        let mut sphere = generate_sphere(2.0, 8, 6);
        assert!(!sphere.vertices.is_empty());
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        let bounds = sphere.compute_bounding_box().unwrap();
        assert!((bounds.max.y - 2.0).abs() < 1e-5);
        assert!((bounds.min.y + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_cylinder_is_y_aligned() {
        let mut bar = generate_cylinder(0.05, 0.05, 5.0, 16);
        let bounds = bar.compute_bounding_box().unwrap();
        assert!((bounds.max.y - 2.5).abs() < 1e-6);
        assert!((bounds.min.y + 2.5).abs() < 1e-6);
        assert!(bounds.max.x <= 0.05 + 1e-6);
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        let mut empty = GeometryData::new();
        assert!(empty.compute_bounding_box().is_none());
        assert!(empty.bounds().is_none());
    }
}
