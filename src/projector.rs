//! Perspective projection: camera space -> near plane -> NDC -> screen
//!
//! The projector is stateless apart from its construction-time viewport
//! configuration. The camera looks down -z; vertices at or behind the
//! camera plane are rejected before any transform runs so no NaN/Inf can
//! enter the pipeline.

use crate::config::SimConfig;
use crate::error::SimError;
use crate::table::Triangle;

#[derive(Debug, Clone, Copy)]
pub struct Projector {
    width: f32,
    height: f32,
    near: f32,
    far: f32,
    aspect: f32,
}

impl Projector {
    pub fn new(width: u32, height: u32, near: f32, far: f32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            near,
            far,
            aspect: width as f32 / height as f32,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.width, config.height, config.near, config.far)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Project a triangle in place, applying all four steps in order:
    /// near-plane, NDC, depth remap, screen space. Fails without touching
    /// the triangle if any vertex sits at or behind the camera plane.
    pub fn project(&self, tri: &mut Triangle) -> Result<(), SimError> {
        for v in tri.vertices() {
            if v.point.z >= 0.0 {
                return Err(SimError::BehindCamera(v.point.z));
            }
        }
        self.to_near_plane(tri);
        self.to_ndc(tri);
        self.depth(tri);
        self.to_screen_space(tri);
        Ok(())
    }

    /// Step 1: project onto the near plane. Overwrites x and y only; z
    /// stays camera-space so the depth remap can still read it.
    pub fn to_near_plane(&self, tri: &mut Triangle) {
        for v in tri.vertices_mut() {
            let (x, y, z) = (v.point.x, v.point.y, v.point.z);
            v.point.x = (x * self.near) / -z;
            v.point.y = (y * self.near) / -z;
        }
    }

    /// Step 2: normalized device coordinates
    pub fn to_ndc(&self, tri: &mut Triangle) {
        for v in tri.vertices_mut() {
            v.point.x /= self.near * self.aspect;
            v.point.y /= self.near;
        }
    }

    /// Step 3: remap camera-space z to the normalized depth range
    pub fn depth(&self, tri: &mut Triangle) {
        let (near, far) = (self.near, self.far);
        for v in tri.vertices_mut() {
            let z = v.point.z;
            v.point.z =
                -(far + near) / ((far - near) * z) - (2.0 * near * far) / (near - far);
        }
    }

    /// Step 4: NDC -> screen space, through binary16, with the y flip
    /// (NDC up is screen down)
    pub fn to_screen_space(&self, tri: &mut Triangle) {
        for v in tri.vertices_mut() {
            let mut ndc = v.point.to_screen_point();
            let x = ndc.x.to_f32();
            let y = ndc.y.to_f32();
            ndc.x = half::f16::from_f32((x + 1.0) * 0.5 * self.width);
            ndc.y = half::f16::from_f32((1.0 - y) * 0.5 * self.height);
            v.screen = ndc;
        }
    }
}
