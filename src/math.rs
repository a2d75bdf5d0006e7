//! Vector math for the rasterization front end
//!
//! Camera-space positions are full f32; screen-space coordinates are
//! IEEE binary16 (`half::f16`), matching the reduced precision the
//! hardware carries after the projector.

use std::ops::{Add, Mul, Sub};

use half::f16;
use serde::{Deserialize, Serialize};

/// 3D vector (camera/world space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Truncate to the screen-space (x, y) pair at binary16 precision
    pub fn to_screen_point(self) -> ScreenPoint {
        ScreenPoint {
            x: f16::from_f32(self.x),
            y: f16::from_f32(self.y),
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// Screen-space point at binary16 precision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f16,
    pub y: f16,
}

impl Default for ScreenPoint {
    fn default() -> Self {
        Self { x: f16::ZERO, y: f16::ZERO }
    }
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: f16::from_f32(x),
            y: f16::from_f32(y),
        }
    }

    /// Componentwise minimum
    pub fn min(self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint {
            x: if other.x < self.x { other.x } else { self.x },
            y: if other.y < self.y { other.y } else { self.y },
        }
    }

    /// Componentwise maximum
    pub fn max(self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint {
            x: if other.x > self.x { other.x } else { self.x },
            y: if other.y > self.y { other.y } else { self.y },
        }
    }
}

/// Invert a 3x3 matrix. Determinant is accumulated in f64 to keep the
/// barycentric setup stable for thin triangles. Returns `None` when the
/// matrix is singular.
pub fn mat3_invert(m: &[[f32; 3]; 3]) -> Option<[[f32; 3]; 3]> {
    let det = f64::from(m[0][0]) * f64::from(m[1][1] * m[2][2] - m[2][1] * m[1][2])
        - f64::from(m[0][1]) * f64::from(m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + f64::from(m[0][2]) * f64::from(m[1][0] * m[2][1] - m[1][1] * m[2][0]);

    if det.abs() < 1e-12 {
        return None;
    }
    let inv_det = (1.0 / det) as f32;

    Some([
        [
            (m[1][1] * m[2][2] - m[2][1] * m[1][2]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[2][0] * m[1][1]) * inv_det,
            (m[2][0] * m[0][1] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[1][0] * m[0][1]) * inv_det,
        ],
    ])
}

/// Barycentric coordinates of `point` with respect to a screen-space
/// triangle, via inversion of the [1; x; y] column matrix.
/// Returns `None` for degenerate triangles.
pub fn barycentric(point: [f32; 2], tri: [[f32; 2]; 3]) -> Option<[f32; 3]> {
    let m = [
        [1.0, 1.0, 1.0],
        [tri[0][0], tri[1][0], tri[2][0]],
        [tri[0][1], tri[1][1], tri[2][1]],
    ];
    let inv = mat3_invert(&m)?;

    let col = [1.0, point[0], point[1]];
    Some([
        inv[0][0] * col[0] + inv[0][1] * col[1] + inv[0][2] * col[2],
        inv[1][0] * col[0] + inv[1][1] * col[1] + inv[1][2] * col[2],
        inv[2][0] * col[0] + inv[2][1] * col[1] + inv[2][2] * col[2],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_relative_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert_relative_eq!(c.z, 1.0);
    }

    #[test]
    fn test_screen_point_min_max() {
        let a = ScreenPoint::new(3.0, -1.0);
        let b = ScreenPoint::new(-2.0, 4.0);
        let lo = a.min(b);
        let hi = a.max(b);
        assert_eq!(lo, ScreenPoint::new(-2.0, -1.0));
        assert_eq!(hi, ScreenPoint::new(3.0, 4.0));
    }

    #[test]
    fn test_mat3_identity_inverse() {
        let id = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let inv = mat3_invert(&id).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert_relative_eq!(inv[r][c], id[r][c], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_mat3_singular() {
        let m = [[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]];
        assert!(mat3_invert(&m).is_none());
    }

    #[test]
    fn test_barycentric_inside() {
        let tri = [[0.0, 0.0], [10.0, 0.0], [5.0, 10.0]];
        let bc = barycentric([5.0, 3.0], tri).unwrap();
        assert!(bc.iter().all(|&l| l >= 0.0));
        assert_relative_eq!(bc[0] + bc[1] + bc[2], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_barycentric_vertex() {
        let tri = [[0.0, 0.0], [10.0, 0.0], [5.0, 10.0]];
        let bc = barycentric([0.0, 0.0], tri).unwrap();
        assert_relative_eq!(bc[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(bc[1], 0.0, epsilon = 1e-4);
        assert_relative_eq!(bc[2], 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_barycentric_degenerate() {
        let tri = [[0.0, 0.0], [5.0, 5.0], [10.0, 10.0]];
        assert!(barycentric([1.0, 2.0], tri).is_none());
    }
}
