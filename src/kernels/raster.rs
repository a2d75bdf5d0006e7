//! Rasterization kernel bodies: per-pixel edge test over a bounding-box
//! tile, and per-pixel texture lookup
//!
//! Both kernels run through the same launch loop as the compute kernels.
//! The triangle kernel writes depth, triangle tag, and affine-interpolated
//! uv into a render target; the pixel kernel resolves tags to texels.

use crate::kernels::dispatch::{run_kernel, Dim3, KernelCtx};
use crate::math::barycentric;
use crate::texture::Texture;

/// Inside-test slack for pixels on a shared edge
const EDGE_SLACK: f32 = -1e-4;

/// Pixel buffers written by the raster kernels
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub width: usize,
    pub height: usize,
    pub depth: Vec<f32>,
    pub tag: Vec<i32>,
    pub uv: Vec<[f32; 2]>,
    pub color: Vec<[f32; 3]>,
}

impl RenderTarget {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: vec![f32::INFINITY; width * height],
            tag: vec![-1; width * height],
            uv: vec![[0.0, 0.0]; width * height],
            color: vec![[0.0, 0.0, 0.0]; width * height],
        }
    }

    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

/// Screen-space triangle payload for one tile launch
pub struct TriangleArgs<'a> {
    /// Screen-space vertices with remapped depth in z
    pub verts: [[f32; 3]; 3],
    pub uvs: [[f32; 2]; 3],
    /// Inclusive tile origin in pixels
    pub bb_start: [usize; 2],
    /// Exclusive tile end
    pub bb_end: [usize; 2],
    pub tag: i32,
    pub target: &'a mut RenderTarget,
}

/// Per-pixel inside/depth test. Threads map onto the bounding-box tile;
/// the pixel center is sampled at +0.5.
pub fn kernel_triangle(ctx: &KernelCtx, args: &mut TriangleArgs<'_>) {
    let x = args.bb_start[0] + ctx.global_x();
    let y = args.bb_start[1] + ctx.global_y();
    if x >= args.bb_end[0] || y >= args.bb_end[1] {
        return;
    }

    let point = [x as f32 + 0.5, y as f32 + 0.5];
    let tri_xy = [
        [args.verts[0][0], args.verts[0][1]],
        [args.verts[1][0], args.verts[1][1]],
        [args.verts[2][0], args.verts[2][1]],
    ];
    let l = match barycentric(point, tri_xy) {
        Some(l) => l,
        None => return,
    };
    if l.iter().any(|&w| w < EDGE_SLACK) {
        return;
    }

    let z = l[0] * args.verts[0][2] + l[1] * args.verts[1][2] + l[2] * args.verts[2][2];
    let idx = args.target.idx(x, y);
    if z >= args.target.depth[idx] {
        return;
    }

    args.target.depth[idx] = z;
    args.target.tag[idx] = args.tag;
    args.target.uv[idx] = [
        l[0] * args.uvs[0][0] + l[1] * args.uvs[1][0] + l[2] * args.uvs[2][0],
        l[0] * args.uvs[0][1] + l[1] * args.uvs[1][1] + l[2] * args.uvs[2][1],
    ];
}

/// Per-pixel texture lookup for tagged pixels
pub struct PixelArgs<'a> {
    pub texture: &'a Texture,
    pub target: &'a mut RenderTarget,
}

pub fn kernel_pixel(ctx: &KernelCtx, args: &mut PixelArgs<'_>) {
    let x = ctx.global_x();
    let y = ctx.global_y();
    if x >= args.target.width || y >= args.target.height {
        return;
    }
    let idx = args.target.idx(x, y);
    if args.target.tag[idx] < 0 {
        return;
    }
    let [u, v] = args.target.uv[idx];
    args.target.color[idx] = args.texture.sample(u, v);
}

/// Host helper: clamp the triangle's bounding box to the target and
/// launch the triangle kernel over that tile in 8x8 blocks
pub fn rasterize_triangle(
    target: &mut RenderTarget,
    verts: [[f32; 3]; 3],
    uvs: [[f32; 2]; 3],
    tag: i32,
) {
    let min_x = verts.iter().map(|v| v[0]).fold(f32::INFINITY, f32::min);
    let max_x = verts.iter().map(|v| v[0]).fold(f32::NEG_INFINITY, f32::max);
    let min_y = verts.iter().map(|v| v[1]).fold(f32::INFINITY, f32::min);
    let max_y = verts.iter().map(|v| v[1]).fold(f32::NEG_INFINITY, f32::max);

    let bb_start = [
        (min_x.floor().max(0.0)) as usize,
        (min_y.floor().max(0.0)) as usize,
    ];
    let bb_end = [
        (max_x.ceil() as usize + 1).min(target.width),
        (max_y.ceil() as usize + 1).min(target.height),
    ];
    if bb_start[0] >= bb_end[0] || bb_start[1] >= bb_end[1] {
        return;
    }

    let block = Dim3::new(8, 8, 1);
    let grid = Dim3::new(
        ((bb_end[0] - bb_start[0]) as u32 + block.x - 1) / block.x,
        ((bb_end[1] - bb_start[1]) as u32 + block.y - 1) / block.y,
        1,
    );

    let mut args = TriangleArgs {
        verts,
        uvs,
        bb_start,
        bb_end,
        tag,
        target,
    };
    run_kernel(grid, block, &mut args, kernel_triangle);
}

/// Host helper: resolve every tagged pixel through the texture
pub fn shade_pixels(target: &mut RenderTarget, texture: &Texture) {
    let block = Dim3::new(16, 16, 1);
    let grid = Dim3::new(
        (target.width as u32 + block.x - 1) / block.x,
        (target.height as u32 + block.y - 1) / block.y,
        1,
    );
    let mut args = PixelArgs { texture, target };
    run_kernel(grid, block, &mut args, kernel_pixel);
}
