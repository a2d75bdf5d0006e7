//! Compute kernel bodies: elementwise add, integer SAXPY, BFS frontier
//! expansion, and Monte-Carlo pi over a Philox counter-based generator
//!
//! Each kernel is an independent body invoked through
//! [`run_kernel`](crate::kernels::run_kernel); argument structs stand in
//! for device memory.

use crate::kernels::dispatch::{run_kernel, Dim3, KernelCtx};

// ---- elementwise add ----

pub struct AddArgs<'a> {
    pub a: &'a [i32],
    pub b: &'a [i32],
    pub out: &'a mut [i32],
}

pub fn kernel_add(ctx: &KernelCtx, args: &mut AddArgs<'_>) {
    let i = ctx.global_x();
    if i < args.out.len() {
        args.out[i] = args.a[i] + args.b[i];
    }
}

// ---- integer SAXPY ----

pub struct SaxpyArgs<'a> {
    pub n: usize,
    pub a: i32,
    pub x: &'a [i32],
    pub y: &'a mut [i32],
}

pub fn kernel_saxpy_int(ctx: &KernelCtx, args: &mut SaxpyArgs<'_>) {
    let i = ctx.global_x();
    if i < args.n {
        args.y[i] = args.a * args.x[i] + args.y[i];
    }
}

// ---- BFS frontier expansion ----

/// Compressed adjacency node: offset into the edge list plus edge count
#[derive(Debug, Clone, Copy)]
pub struct BfsNode {
    pub starting: usize,
    pub n_edges: usize,
}

/// Device-side BFS working set
pub struct BfsArgs<'a> {
    pub nodes: &'a [BfsNode],
    pub edges: &'a [usize],
    pub mask: &'a mut [bool],
    pub updating_mask: &'a mut [bool],
    pub visited: &'a mut [bool],
    pub cost: &'a mut [i32],
    pub over: bool,
}

/// Phase 1: relax the neighbors of every masked node
pub fn kernel_bfs_expand(ctx: &KernelCtx, args: &mut BfsArgs<'_>) {
    let tid = ctx.global_x();
    if tid < args.nodes.len() && args.mask[tid] {
        args.mask[tid] = false;

        let start = args.nodes[tid].starting;
        let end = start + args.nodes[tid].n_edges;
        for &neighbor in &args.edges[start..end] {
            if !args.visited[neighbor] {
                args.cost[neighbor] = args.cost[tid] + 1;
                args.updating_mask[neighbor] = true;
            }
        }
    }
}

/// Phase 2: promote the updating mask into the frontier for the next
/// iteration and flag that work remains
pub fn kernel_bfs_update(ctx: &KernelCtx, args: &mut BfsArgs<'_>) {
    let tid = ctx.global_x();
    if tid < args.nodes.len() && args.updating_mask[tid] {
        args.mask[tid] = true;
        args.visited[tid] = true;
        args.over = true;
        args.updating_mask[tid] = false;
    }
}

/// Host loop: breadth-first traversal from `source`, returning the hop
/// count per node (-1 for unreachable nodes)
pub fn bfs(nodes: &[BfsNode], edges: &[usize], source: usize, block_dim: u32) -> Vec<i32> {
    let n = nodes.len();
    let mut mask = vec![false; n];
    let mut updating_mask = vec![false; n];
    let mut visited = vec![false; n];
    let mut cost = vec![-1; n];

    mask[source] = true;
    visited[source] = true;
    cost[source] = 0;

    let grid = Dim3::linear((n as u32 + block_dim - 1) / block_dim);
    let block = Dim3::linear(block_dim);

    loop {
        let mut args = BfsArgs {
            nodes,
            edges,
            mask: &mut mask,
            updating_mask: &mut updating_mask,
            visited: &mut visited,
            cost: &mut cost,
            over: false,
        };
        run_kernel(grid, block, &mut args, kernel_bfs_expand);
        run_kernel(grid, block, &mut args, kernel_bfs_update);
        if !args.over {
            break;
        }
    }
    cost
}

// ---- Monte-Carlo pi via Philox ----

const PHILOX_M: u32 = 0xD251_1F53;
const WEYL_C: u32 = 0x9E37_79B9;
const V1_INIT: u32 = 0x1234_5678;
const PHILOX_ROUNDS: usize = 10;

fn philox_round(v0: u32, v1: u32, key: u32) -> (u32, u32) {
    let prod = u64::from(v0) * u64::from(PHILOX_M);
    let hi = (prod >> 32) as u32;
    let lo = prod as u32;
    (v1 ^ hi ^ key, lo)
}

/// A pair of uniform floats in [0, 1) from one counter value. Counter-
/// based: the same (counter, seed) always yields the same pair.
pub fn philox_pair(counter: u32, seed: u32) -> (f32, f32) {
    let mut v0 = counter;
    let mut v1 = V1_INIT;
    let mut key = seed;
    for _ in 0..PHILOX_ROUNDS {
        let (n0, n1) = philox_round(v0, v1, key);
        v0 = n0;
        v1 = n1;
        key = key.wrapping_add(WEYL_C);
    }
    // 24-bit mantissa mapping
    (
        (v0 & 0x00FF_FFFF) as f32 / 16_777_216.0,
        (v1 & 0x00FF_FFFF) as f32 / 16_777_216.0,
    )
}

pub struct MonteCarloPiArgs<'a> {
    pub hits: &'a mut [u8],
    pub base_seed: u32,
    pub num_points: usize,
}

pub fn kernel_monte_carlo_pi(ctx: &KernelCtx, args: &mut MonteCarloPiArgs<'_>) {
    let i = ctx.global_x();
    if i >= args.num_points {
        return;
    }
    let (x, y) = philox_pair(i as u32 + args.base_seed, args.base_seed);
    if x * x + y * y <= 1.0 {
        args.hits[i] = 1;
    }
}

/// Host side: launch the hit-test kernel and reduce to a pi estimate
pub fn estimate_pi(num_points: usize, base_seed: u32, block_dim: u32) -> f32 {
    let mut hits = vec![0u8; num_points];
    let grid = Dim3::linear((num_points as u32 + block_dim - 1) / block_dim);
    let mut args = MonteCarloPiArgs {
        hits: &mut hits,
        base_seed,
        num_points,
    };
    run_kernel(grid, Dim3::linear(block_dim), &mut args, kernel_monte_carlo_pi);

    let inside: u32 = hits.iter().map(|&h| u32::from(h)).sum();
    4.0 * inside as f32 / num_points as f32
}
