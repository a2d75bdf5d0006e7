//! Software kernel launches: a sequential grid/block/thread loop plus
//! the kernel bodies that ride on it

mod compute;
mod dispatch;
mod raster;

pub use compute::{
    bfs, estimate_pi, kernel_add, kernel_bfs_expand, kernel_bfs_update, kernel_monte_carlo_pi,
    kernel_saxpy_int, philox_pair, AddArgs, BfsArgs, BfsNode, MonteCarloPiArgs, SaxpyArgs,
};
pub use dispatch::{run_kernel, Dim3, KernelCtx};
pub use raster::{
    kernel_pixel, kernel_triangle, rasterize_triangle, shade_pixels, PixelArgs, RenderTarget,
    TriangleArgs,
};
