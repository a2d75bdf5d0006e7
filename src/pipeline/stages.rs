//! The five concrete front-end stages
//!
//! Fetch, Dispatch, PreEdge, and EdgeTest are relay stages over the shared
//! FIFO core. BoundingBox additionally computes the screen-space AABB of
//! each accepted triangle and exposes it through a side queue that is not
//! gated by the handshake (a telemetry tap, not a pipeline output).

use std::collections::VecDeque;

use crate::math::ScreenPoint;
use crate::pipeline::clock::Link;
use crate::pipeline::stage::{Batch, PipelineStage, StageFifo, StageState};
use crate::table::{TriangleRef, VertexTable};

/// Screen-space axis-aligned bounding box in binary16
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

macro_rules! relay_stage {
    ($name:ident, $label:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            fifo: StageFifo,
        }

        impl $name {
            pub fn new(capacity: Option<usize>) -> Self {
                Self {
                    fifo: StageFifo::new(capacity),
                }
            }
        }

        impl PipelineStage for $name {
            fn name(&self) -> &'static str {
                $label
            }

            fn accept(&mut self, tri: TriangleRef, _table: &VertexTable) {
                log::trace!("{}: accept {:?}", $label, tri);
                self.fifo.push(tri);
            }

            fn advance(&mut self, downstream: &mut Link) -> Option<Batch> {
                self.fifo.drain(downstream)
            }

            fn ready(&self) -> bool {
                self.fifo.ready()
            }

            fn state(&self) -> StageState {
                self.fifo.state()
            }

            fn pending(&self) -> usize {
                self.fifo.len()
            }
        }
    };
}

relay_stage!(Fetch, "fetch");
relay_stage!(Dispatch, "dispatch");
relay_stage!(PreEdge, "pre_edge");
relay_stage!(EdgeTest, "edge_test");

/// Bounding-box stage: relays references like Fetch, and computes each
/// triangle's screen-space extent at accept time (the combinational half).
/// A stale reference reconstructs as the degenerate triangle, whose box
/// collapses to the zero point.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    fifo: StageFifo,
    boxes: VecDeque<ScreenRect>,
}

impl BoundingBox {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            fifo: StageFifo::new(capacity),
            boxes: VecDeque::new(),
        }
    }

    /// Pop the oldest pending bounding box. Single-consumer semantics:
    /// each box is handed out exactly once.
    pub fn get_bb(&mut self) -> Option<ScreenRect> {
        self.boxes.pop_front()
    }

    pub fn pending_boxes(&self) -> usize {
        self.boxes.len()
    }
}

impl PipelineStage for BoundingBox {
    fn name(&self) -> &'static str {
        "bounding_box"
    }

    fn accept(&mut self, tri: TriangleRef, table: &VertexTable) {
        let rebuilt = table.reconstruct(tri);
        let rect = ScreenRect {
            min: rebuilt.min_screen(),
            max: rebuilt.max_screen(),
        };
        log::trace!(
            "bounding_box: accept {:?} -> ({}, {})..({}, {})",
            tri,
            rect.min.x,
            rect.min.y,
            rect.max.x,
            rect.max.y
        );
        self.boxes.push_back(rect);
        self.fifo.push(tri);
    }

    fn advance(&mut self, downstream: &mut Link) -> Option<Batch> {
        self.fifo.drain(downstream)
    }

    fn ready(&self) -> bool {
        self.fifo.ready()
    }

    fn state(&self) -> StageState {
        self.fifo.state()
    }

    fn pending(&self) -> usize {
        self.fifo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::table::{Vertex, VertexTable};

    fn seeded_table() -> (VertexTable, TriangleRef) {
        let mut table = VertexTable::new(8);
        let mut v = |x: f32, y: f32| {
            let mut vert = Vertex::new(Vec3::new(x, y, -1.0));
            vert.screen = ScreenPoint::new(x, y);
            vert
        };
        let h0 = table.insert(v(10.0, 20.0)).unwrap();
        let h1 = table.insert(v(30.0, 5.0)).unwrap();
        let h2 = table.insert(v(20.0, 40.0)).unwrap();
        (table, TriangleRef([h0, h1, h2]))
    }

    #[test]
    fn test_bounding_box_extent() {
        let (table, tri) = seeded_table();
        let mut stage = BoundingBox::new(None);
        stage.accept(tri, &table);

        let rect = stage.get_bb().unwrap();
        assert_eq!(rect.min, ScreenPoint::new(10.0, 5.0));
        assert_eq!(rect.max, ScreenPoint::new(30.0, 40.0));
        assert!(stage.get_bb().is_none());
    }

    #[test]
    fn test_bounding_box_stale_reference_collapses() {
        let (mut table, tri) = seeded_table();
        table.invalidate(tri.0[1]);

        let mut stage = BoundingBox::new(None);
        stage.accept(tri, &table);

        let rect = stage.get_bb().unwrap();
        assert_eq!(rect.min, ScreenPoint::default());
        assert_eq!(rect.max, ScreenPoint::default());
    }

    #[test]
    fn test_fetch_relays_pairs_in_order() {
        let table = VertexTable::new(4);
        let mut fetch = Fetch::new(None);
        let mut link = Link::new();

        fetch.accept(TriangleRef([0, 1, 2]), &table);
        assert!(fetch.advance(&mut link).is_none());
        fetch.accept(TriangleRef([3, 4, 5]), &table);
        let batch = fetch.advance(&mut link).unwrap();
        assert_eq!(batch, [TriangleRef([0, 1, 2]), TriangleRef([3, 4, 5])]);
        assert_eq!(fetch.state(), StageState::Draining);
    }
}
