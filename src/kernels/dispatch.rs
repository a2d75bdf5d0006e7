//! Software model of a grid/block/thread kernel launch
//!
//! The launch is a plain nested loop: blocks in x, y, z order, then
//! threads within each block. Indices travel in an explicit context
//! struct passed to every invocation; there is no ambient blockIdx-style
//! global state.

/// Three-component launch dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dim3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Dim3 {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// One-dimensional launch helper
    pub fn linear(x: u32) -> Self {
        Self { x, y: 1, z: 1 }
    }

    pub fn count(&self) -> u64 {
        u64::from(self.x) * u64::from(self.y) * u64::from(self.z)
    }
}

/// Per-invocation thread coordinates
#[derive(Debug, Clone, Copy)]
pub struct KernelCtx {
    pub grid_dim: Dim3,
    pub block_dim: Dim3,
    pub block_idx: Dim3,
    pub thread_idx: Dim3,
}

impl KernelCtx {
    /// Flattened global x index: `block_idx.x * block_dim.x + thread_idx.x`
    pub fn global_x(&self) -> usize {
        (self.block_idx.x * self.block_dim.x + self.thread_idx.x) as usize
    }

    pub fn global_y(&self) -> usize {
        (self.block_idx.y * self.block_dim.y + self.thread_idx.y) as usize
    }
}

/// Run `kernel` once per thread of the launch, sequentially
pub fn run_kernel<A, F>(grid_dim: Dim3, block_dim: Dim3, args: &mut A, mut kernel: F)
where
    F: FnMut(&KernelCtx, &mut A),
{
    let mut ctx = KernelCtx {
        grid_dim,
        block_dim,
        block_idx: Dim3::new(0, 0, 0),
        thread_idx: Dim3::new(0, 0, 0),
    };

    for bx in 0..grid_dim.x {
        for by in 0..grid_dim.y {
            for bz in 0..grid_dim.z {
                ctx.block_idx = Dim3::new(bx, by, bz);
                for tx in 0..block_dim.x {
                    for ty in 0..block_dim.y {
                        for tz in 0..block_dim.z {
                            ctx.thread_idx = Dim3::new(tx, ty, tz);
                            kernel(&ctx, args);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_covers_every_thread_once() {
        let grid = Dim3::new(2, 1, 1);
        let block = Dim3::new(4, 2, 1);
        let mut seen = vec![0u32; (grid.count() * block.count()) as usize];

        run_kernel(grid, block, &mut seen, |ctx, seen| {
            let threads_per_block = ctx.block_dim.count() as usize;
            let block_linear = ctx.block_idx.x as usize;
            let thread_linear = (ctx.thread_idx.y * ctx.block_dim.x + ctx.thread_idx.x) as usize;
            seen[block_linear * threads_per_block + thread_linear] += 1;
        });

        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_global_index() {
        let mut max_seen = 0usize;
        run_kernel(Dim3::linear(3), Dim3::linear(8), &mut max_seen, |ctx, max| {
            *max = (*max).max(ctx.global_x());
        });
        assert_eq!(max_seen, 23);
    }
}
