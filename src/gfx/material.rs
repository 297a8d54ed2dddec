/// Phong material parameters attached to a scene node.
///
/// The simulation only ever rewrites `color`; the coefficients are handed to the shading
/// stage unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
    /// Texture label resolved by the renderer, if any
    pub texture: Option<String>,
}

impl Material {
    pub const DEFAULT_AMBIENT: f32 = 0.2;
    pub const DEFAULT_DIFFUSE: f32 = 0.6;
    pub const DEFAULT_SPECULAR: f32 = 0.8;
    pub const DEFAULT_SHININESS: f32 = 64.0;

    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            ambient: Self::DEFAULT_AMBIENT,
            diffuse: Self::DEFAULT_DIFFUSE,
            specular: Self::DEFAULT_SPECULAR,
            shininess: Self::DEFAULT_SHININESS,
            texture: None,
        }
    }

    /// Material from a `0xRRGGBB` color
    pub fn from_hex(hex: u32) -> Self {
        Self::new(hex_to_rgb(hex))
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn set_color_hex(&mut self, hex: u32) {
        self.color = hex_to_rgb(hex);
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0])
    }
}

/// Splits `0xRRGGBB` into normalized RGB
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb(0xFF0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_rgb(0x00FFFF), [0.0, 1.0, 1.0]);
        let dim = hex_to_rgb(0x111111);
        assert!((dim[0] - 17.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_phong_defaults() {
        let material = Material::from_hex(0x888800).with_texture("concrete");
        assert_eq!(material.ambient, 0.2);
        assert_eq!(material.diffuse, 0.6);
        assert_eq!(material.specular, 0.8);
        assert_eq!(material.shininess, 64.0);
        assert_eq!(material.texture.as_deref(), Some("concrete"));
    }
}
