//! Cycle-accurate pipeline front end
//!
//! Five hardware-style stages (Fetch, BoundingBox, Dispatch, PreEdge,
//! EdgeTest) move batches of triangle references one step per clock
//! cycle, gated by a valid/ready handshake per adjacent pair. The design
//! fixes the depth at five stages; Dispatch through EdgeTest carry the
//! relay skeleton only, their pixel-level payload lives in the kernels.

mod clock;
mod front_end;
mod stage;
mod stages;

pub use clock::{Clock, Link};
pub use front_end::FrontEnd;
pub use stage::{Batch, PipelineStage, StageFifo, StageState, BATCH_SIZE};
pub use stages::{BoundingBox, Dispatch, EdgeTest, Fetch, PreEdge, ScreenRect};
