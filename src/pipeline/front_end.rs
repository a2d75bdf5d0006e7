//! Front-end driver: owns the clock, the shared vertex table, the five
//! stages, and the links between them
//!
//! Execution is single-threaded and cooperatively scheduled: one `step`
//! runs one half-tick. During the combinational half, carried batches are
//! delivered upstream-to-downstream and every consumer re-asserts its
//! ready wire; during the latch half, stages advance downstream-to-
//! upstream, mirroring synchronous logic evaluation order. The illusion
//! of pipelining comes entirely from this fixed schedule.

use crate::config::SimConfig;
use crate::error::SimError;
use crate::pipeline::clock::{Clock, Link};
use crate::pipeline::stage::{Batch, PipelineStage, StageState};
use crate::pipeline::stages::{BoundingBox, Dispatch, EdgeTest, Fetch, PreEdge, ScreenRect};
use crate::table::{Triangle, TriangleRef, VertexTable};

/// Links indexed by producer stage: fetch=0 .. edge_test=4 (sink link)
const LINKS: usize = 5;

pub struct FrontEnd {
    clock: Clock,
    table: VertexTable,

    fetch: Fetch,
    bounding: BoundingBox,
    dispatch: Dispatch,
    pre_edge: PreEdge,
    edge_test: EdgeTest,

    links: [Link; LINKS],
    carried: [Option<Batch>; LINKS],

    /// Ready wire of the sink consuming EdgeTest's output. Deassert to
    /// apply backpressure from outside the front end.
    sink_ready: bool,
    emitted: Vec<TriangleRef>,
}

impl FrontEnd {
    pub fn new(config: &SimConfig) -> Self {
        let cap = config.fifo_capacity;
        Self {
            clock: Clock::new(),
            table: VertexTable::new(config.table_capacity),
            fetch: Fetch::new(cap),
            bounding: BoundingBox::new(cap),
            dispatch: Dispatch::new(cap),
            pre_edge: PreEdge::new(cap),
            edge_test: EdgeTest::new(cap),
            links: [Link::new(); LINKS],
            carried: [None; LINKS],
            sink_ready: true,
            emitted: Vec::new(),
        }
    }

    /// Intern a projected triangle into the vertex table and enqueue its
    /// reference into Fetch. On a full table the partially inserted
    /// vertices are rolled back and the triangle is rejected whole.
    pub fn feed(&mut self, tri: &Triangle) -> Result<TriangleRef, SimError> {
        let mut handles = [0usize; 3];
        for (i, v) in tri.vertices().into_iter().enumerate() {
            match self.table.insert(*v) {
                Ok(h) => handles[i] = h,
                Err(e) => {
                    for &h in &handles[..i] {
                        self.table.invalidate(h);
                    }
                    return Err(e);
                }
            }
        }
        let tri_ref = TriangleRef(handles);
        self.fetch.accept(tri_ref, &self.table);
        log::debug!("feed: interned {:?}", tri_ref);
        Ok(tri_ref)
    }

    /// Advance one half-tick
    pub fn step(&mut self) {
        if self.clock.is_comb() {
            self.comb();
        } else {
            self.latch();
        }
        self.clock.tick();
    }

    /// Run until every queue and carried batch has drained, or the
    /// half-tick budget runs out. Returns the half-ticks spent.
    pub fn run_until_drained(&mut self, max_half_ticks: u64) -> u64 {
        let mut spent = 0;
        while self.in_flight() > 0 && spent < max_half_ticks {
            self.step();
            spent += 1;
        }
        spent
    }

    /// Combinational half: deliver carried batches and re-assert ready
    /// wires, upstream to downstream
    fn comb(&mut self) {
        if self.links[0].valid {
            if let Some(batch) = self.carried[0].take() {
                for tri in batch {
                    self.bounding.accept(tri, &self.table);
                }
            }
            self.links[0].valid = false;
        }
        if self.links[1].valid {
            if let Some(batch) = self.carried[1].take() {
                for tri in batch {
                    self.dispatch.accept(tri, &self.table);
                }
            }
            self.links[1].valid = false;
        }
        if self.links[2].valid {
            if let Some(batch) = self.carried[2].take() {
                for tri in batch {
                    self.pre_edge.accept(tri, &self.table);
                }
            }
            self.links[2].valid = false;
        }
        if self.links[3].valid {
            if let Some(batch) = self.carried[3].take() {
                for tri in batch {
                    self.edge_test.accept(tri, &self.table);
                }
            }
            self.links[3].valid = false;
        }
        if self.links[4].valid {
            if let Some(batch) = self.carried[4].take() {
                self.emitted.extend_from_slice(&batch);
            }
            self.links[4].valid = false;
        }

        self.links[0].ready = self.bounding.ready();
        self.links[1].ready = self.dispatch.ready();
        self.links[2].ready = self.pre_edge.ready();
        self.links[3].ready = self.edge_test.ready();
        self.links[4].ready = self.sink_ready;
    }

    /// Latch half: stages advance downstream to upstream so each batch
    /// moves exactly one stage per cycle
    fn latch(&mut self) {
        self.carried[4] = self.edge_test.advance(&mut self.links[4]);
        self.carried[3] = self.pre_edge.advance(&mut self.links[3]);
        self.carried[2] = self.dispatch.advance(&mut self.links[2]);
        self.carried[1] = self.bounding.advance(&mut self.links[1]);
        self.carried[0] = self.fetch.advance(&mut self.links[0]);
    }

    /// References still inside the front end (queued or on a link)
    pub fn in_flight(&self) -> usize {
        let queued = self.fetch.pending()
            + self.bounding.pending()
            + self.dispatch.pending()
            + self.pre_edge.pending()
            + self.edge_test.pending();
        let carried: usize = self.carried.iter().filter(|c| c.is_some()).count();
        queued + carried * 2
    }

    /// Oldest pending bounding box from the telemetry tap
    pub fn get_bb(&mut self) -> Option<ScreenRect> {
        self.bounding.get_bb()
    }

    pub fn set_sink_ready(&mut self, ready: bool) {
        self.sink_ready = ready;
    }

    /// Drain the references emitted by EdgeTest so far
    pub fn take_output(&mut self) -> Vec<TriangleRef> {
        std::mem::take(&mut self.emitted)
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn table(&self) -> &VertexTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut VertexTable {
        &mut self.table
    }

    /// Stage states in pipeline order, for inspection and logging
    pub fn stage_states(&self) -> [StageState; 5] {
        [
            self.fetch.state(),
            self.bounding.state(),
            self.dispatch.state(),
            self.pre_edge.state(),
            self.edge_test.state(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::table::Vertex;

    fn demo_triangle(offset: f32) -> Triangle {
        Triangle::new(
            Vertex::new(Vec3::new(-0.5 + offset, 0.5, -2.0)),
            Vertex::new(Vec3::new(0.5 + offset, 0.5, -2.0)),
            Vertex::new(Vec3::new(offset, -0.5, -3.0)),
        )
    }

    #[test]
    fn test_single_pair_traverses_five_stages() {
        let mut fe = FrontEnd::new(&SimConfig::default());
        let r0 = fe.feed(&demo_triangle(0.0)).unwrap();
        let r1 = fe.feed(&demo_triangle(0.1)).unwrap();

        // four stage-to-stage hops plus the sink transfer
        let spent = fe.run_until_drained(64);
        assert!(spent > 0);
        assert_eq!(fe.in_flight(), 0);
        assert_eq!(fe.take_output(), vec![r0, r1]);
        // one batch per cycle through 5 links
        assert_eq!(fe.clock().cycle() as usize, spent as usize / 2);
    }

    #[test]
    fn test_odd_count_leaves_remainder_queued() {
        let mut fe = FrontEnd::new(&SimConfig::default());
        for i in 0..3 {
            fe.feed(&demo_triangle(i as f32 * 0.1)).unwrap();
        }
        fe.run_until_drained(200);
        // a lone reference can never fill a batch, so it stays in Fetch
        assert_eq!(fe.in_flight(), 1);
        assert_eq!(fe.take_output().len(), 2);
        assert_eq!(fe.stage_states()[0], StageState::Filling);
    }

    #[test]
    fn test_sink_backpressure_holds_output() {
        let mut fe = FrontEnd::new(&SimConfig::default());
        let r0 = fe.feed(&demo_triangle(0.0)).unwrap();
        let r1 = fe.feed(&demo_triangle(0.1)).unwrap();

        fe.set_sink_ready(false);
        fe.run_until_drained(100);
        assert!(fe.take_output().is_empty());
        assert_eq!(fe.in_flight(), 2);

        fe.set_sink_ready(true);
        fe.run_until_drained(100);
        assert_eq!(fe.take_output(), vec![r0, r1]);
    }

    #[test]
    fn test_table_full_rolls_back_partial_inserts() {
        let mut config = SimConfig::default();
        config.table_capacity = 4;
        let mut fe = FrontEnd::new(&config);

        fe.feed(&demo_triangle(0.0)).unwrap();
        assert_eq!(fe.table().occupied(), 3);
        // one slot left: the insert of vertex b must fail and undo a
        assert!(fe.feed(&demo_triangle(1.0)).is_err());
        assert_eq!(fe.table().occupied(), 3);
    }
}
