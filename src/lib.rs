//! Cycle-accurate simulator of a pipelined triangle-rasterization front end
//!
//! Triangles are interned into a fixed-capacity vertex table, projected to
//! screen space through binary16, and pushed as handle batches through five
//! hardware-style stages gated by a valid/ready handshake:
//! - Fetch -> BoundingBox -> Dispatch -> PreEdge -> EdgeTest
//! - half-tick clock: combinational evaluation, then latch transfer
//! - pixel work (edge tests, texture lookups) runs as software kernel
//!   launches over an explicit grid/block/thread loop

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod kernels;
pub mod math;
pub mod model;
pub mod pipeline;
pub mod ppm;
pub mod projector;
pub mod table;
pub mod texture;

pub use config::SimConfig;
pub use error::SimError;
pub use pipeline::FrontEnd;
pub use projector::Projector;
pub use table::{Triangle, TriangleRef, Vertex, VertexTable};
