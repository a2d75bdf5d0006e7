//! Stage framework: the FIFO core and the common stage contract
//!
//! Every stage owns one FIFO of triangle references and forwards them in
//! fixed batches of two under the valid/ready discipline. The FIFO is
//! logically unbounded by default; an optional capacity turns the ready
//! wire into real backpressure.

use std::collections::VecDeque;

use crate::pipeline::clock::Link;
use crate::table::{TriangleRef, VertexTable};

/// Triangle references transferred per latch tick
pub const BATCH_SIZE: usize = 2;

/// A full inter-stage batch
pub type Batch = [TriangleRef; BATCH_SIZE];

/// Observable stage state, driven only by queue occupancy and clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    /// Queue empty
    Idle,
    /// Accepting without holding a full batch
    Filling,
    /// A full batch was forwarded on the last latch
    Draining,
}

/// Common contract for the five front-end stages
pub trait PipelineStage {
    fn name(&self) -> &'static str;

    /// Enqueue one triangle reference. Called during a combinational half
    /// while the upstream link's valid holds.
    fn accept(&mut self, tri: TriangleRef, table: &VertexTable);

    /// Apply the latch rule against the downstream link and return the
    /// batch to forward, if any.
    fn advance(&mut self, downstream: &mut Link) -> Option<Batch>;

    /// Capacity policy for the stage's upstream ready wire
    fn ready(&self) -> bool;

    fn state(&self) -> StageState;

    fn pending(&self) -> usize;
}

/// FIFO core shared by every stage implementation
#[derive(Debug, Clone)]
pub struct StageFifo {
    queue: VecDeque<TriangleRef>,
    capacity: Option<usize>,
    state: StageState,
}

impl StageFifo {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            queue: VecDeque::new(),
            capacity,
            state: StageState::Idle,
        }
    }

    pub fn push(&mut self, tri: TriangleRef) {
        self.queue.push_back(tri);
        if self.state != StageState::Draining {
            self.state = StageState::Filling;
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// Ready iff a whole incoming batch still fits. Unbounded FIFOs are
    /// always ready.
    pub fn ready(&self) -> bool {
        match self.capacity {
            Some(cap) => self.queue.len() + BATCH_SIZE <= cap,
            None => true,
        }
    }

    /// The latch rule: with the consumer ready and two references queued,
    /// dequeue exactly two in arrival order and assert valid. With fewer
    /// than two, put back anything speculatively removed and deassert
    /// valid. With the consumer not ready, leave the queue untouched.
    pub fn drain(&mut self, downstream: &mut Link) -> Option<Batch> {
        if !downstream.ready {
            downstream.valid = false;
            self.settle();
            return None;
        }

        let first = match self.queue.pop_front() {
            Some(tri) => tri,
            None => {
                downstream.valid = false;
                self.state = StageState::Idle;
                return None;
            }
        };
        match self.queue.pop_front() {
            Some(second) => {
                downstream.valid = true;
                self.state = StageState::Draining;
                Some([first, second])
            }
            None => {
                // half a batch: restore the queue, nothing leaves
                self.queue.push_front(first);
                downstream.valid = false;
                self.state = StageState::Filling;
                None
            }
        }
    }

    fn settle(&mut self) {
        self.state = if self.queue.is_empty() {
            StageState::Idle
        } else {
            StageState::Filling
        };
    }
}
