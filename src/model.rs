//! Binary mesh loader
//!
//! Little-endian layout: vertex count (i32), four one-byte section flags
//! (coords, colors, normals, texcoords; `'y'` means present), vertex
//! positions as 3 f32 each, color and normal sections skipped when
//! present, optional texcoords as 2 f32 each, triangle count (i32), then
//! index triples as 3 u32 each.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::SimError;
use crate::math::Vec3;

/// One loaded mesh vertex: position plus texture coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelVertex {
    pub point: Vec3,
    pub u: f32,
    pub v: f32,
}

/// Indexed triangle mesh as read from disk
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub vertices: Vec<ModelVertex>,
    pub tris: Vec<[u32; 3]>,
}

fn read_i32<R: Read>(r: &mut R, what: &'static str) -> Result<i32, SimError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)
        .map_err(|_| SimError::ModelTruncated(what))?;
    Ok(i32::from_le_bytes(buf))
}

fn read_f32<R: Read>(r: &mut R, what: &'static str) -> Result<f32, SimError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)
        .map_err(|_| SimError::ModelTruncated(what))?;
    Ok(f32::from_le_bytes(buf))
}

fn read_u32<R: Read>(r: &mut R, what: &'static str) -> Result<u32, SimError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)
        .map_err(|_| SimError::ModelTruncated(what))?;
    Ok(u32::from_le_bytes(buf))
}

fn skip<R: Read>(r: &mut R, bytes: u64, what: &'static str) -> Result<(), SimError> {
    let copied = std::io::copy(&mut r.take(bytes), &mut std::io::sink())?;
    if copied != bytes {
        return Err(SimError::ModelTruncated(what));
    }
    Ok(())
}

impl Model {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let file = File::open(path.as_ref())?;
        Self::read(&mut BufReader::new(file))
    }

    /// Parse a mesh from any byte source
    pub fn read<R: Read>(r: &mut R) -> Result<Self, SimError> {
        let verts_n = read_i32(r, "vertex count")?;
        if verts_n < 0 {
            return Err(SimError::ModelTruncated("vertex count"));
        }
        let verts_n = verts_n as usize;

        let mut flags = [0u8; 4];
        r.read_exact(&mut flags)
            .map_err(|_| SimError::ModelTruncated("section flags"))?;
        let [_has_coords, has_colors, has_normals, has_texcoords] = flags;

        let mut vertices = Vec::with_capacity(verts_n);
        for _ in 0..verts_n {
            let x = read_f32(r, "vertex position")?;
            let y = read_f32(r, "vertex position")?;
            let z = read_f32(r, "vertex position")?;
            vertices.push(ModelVertex {
                point: Vec3::new(x, y, z),
                u: 0.0,
                v: 0.0,
            });
        }

        // colors and normals are not simulated, skip past them
        if has_colors == b'y' {
            skip(r, verts_n as u64 * 12, "color section")?;
        }
        if has_normals == b'y' {
            skip(r, verts_n as u64 * 12, "normal section")?;
        }

        if has_texcoords == b'y' {
            for vertex in &mut vertices {
                vertex.u = read_f32(r, "texcoord section")?;
                vertex.v = read_f32(r, "texcoord section")?;
            }
        }

        let tris_n = read_i32(r, "triangle count")?;
        if tris_n < 0 {
            return Err(SimError::ModelTruncated("triangle count"));
        }
        let mut tris = Vec::with_capacity(tris_n as usize);
        for _ in 0..tris_n {
            let a = read_u32(r, "triangle indices")?;
            let b = read_u32(r, "triangle indices")?;
            let c = read_u32(r, "triangle indices")?;
            tris.push([a, b, c]);
        }

        log::debug!("model loaded: {} vertices, {} triangles", verts_n, tris.len());
        Ok(Self { vertices, tris })
    }

    /// Midpoint of the axis-aligned bounds, for camera framing
    pub fn center(&self) -> Vec3 {
        let mut min = Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        for vertex in &self.vertices {
            let p = vertex.point;
            min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        (min + max).scale(0.5)
    }
}
