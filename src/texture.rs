//! Texture storage and sampling for the pixel kernel

use std::path::Path;

use crate::error::SimError;

/// RGB texture with float channels in [0, 1]
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub texels: Vec<[f32; 3]>,
    pub name: String,
}

impl Texture {
    /// Load a texture from an image file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| SimError::Texture(format!("{}: {}", path.display(), e)))?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let texels: Vec<[f32; 3]> = rgb
            .pixels()
            .map(|p| {
                [
                    f32::from(p[0]) / 255.0,
                    f32::from(p[1]) / 255.0,
                    f32::from(p[2]) / 255.0,
                ]
            })
            .collect();

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        log::debug!("loaded texture {} ({}x{})", name, width, height);
        Ok(Self {
            width: width as usize,
            height: height as usize,
            texels,
            name,
        })
    }

    /// Checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, a: [f32; 3], b: [f32; 3]) -> Self {
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                texels.push(if checker { a } else { b });
            }
        }
        Self {
            width,
            height,
            texels,
            name: "checkerboard".to_string(),
        }
    }

    /// Nearest sample with wrap: coordinates are folded into [0, 1) by
    /// absolute value and fractional part before scaling
    pub fn sample(&self, s: f32, t: f32) -> [f32; 3] {
        let s = s.abs().fract();
        let t = t.abs().fract();
        let x = (s * (self.width - 1) as f32 + 0.5) as usize % self.width;
        let y = (t * (self.height - 1) as f32 + 0.5) as usize % self.height;
        self.texels[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_sample() {
        let white = [1.0, 1.0, 1.0];
        let black = [0.0, 0.0, 0.0];
        let tex = Texture::checkerboard(8, 8, white, black);
        assert_eq!(tex.sample(0.0, 0.0), white);
        // one checker cell over
        assert_eq!(tex.sample(0.6, 0.0), black);
    }

    #[test]
    fn test_sample_wraps() {
        let tex = Texture::checkerboard(8, 8, [1.0; 3], [0.0; 3]);
        assert_eq!(tex.sample(0.1, 0.1), tex.sample(1.1, 1.1));
        assert_eq!(tex.sample(0.25, 0.0), tex.sample(-0.25, 0.0));
    }
}
