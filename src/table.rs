//! Vertex records, triangles, and the fixed-capacity vertex table
//!
//! The table is the one resource shared across pipeline stages. Triangles
//! are interned as three slot handles; stages read records back through
//! [`VertexTable::reconstruct`]. Occupancy is encoded in the color sentinel
//! alone: a record whose color is `[-1, -1, -1]` is an empty slot, and a
//! slot that was invalidated is indistinguishable from one never used.

use crate::error::SimError;
use crate::math::{ScreenPoint, Vec3};

/// Reserved color meaning "slot empty". This sentinel is the sole
/// occupancy indicator; there is no separate flag.
pub const EMPTY_COLOR: [i32; 3] = [-1, -1, -1];

/// Default vertex table capacity
pub const DEFAULT_CAPACITY: usize = 48;

/// One vertex record: camera-space position, binary16 screen-space point
/// (filled by the projector), texture coordinates, and color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub point: Vec3,
    pub screen: ScreenPoint,
    pub u: f32,
    pub v: f32,
    pub color: [i32; 3],
}

impl Default for Vertex {
    /// The empty record: sentinel color, no texture coordinates.
    fn default() -> Self {
        Self {
            point: Vec3::ZERO,
            screen: ScreenPoint::default(),
            u: -1.0,
            v: -1.0,
            color: EMPTY_COLOR,
        }
    }
}

impl Vertex {
    /// A live (occupied) vertex at `point`. White by default so that a
    /// freshly built vertex is never mistaken for an empty slot.
    pub fn new(point: Vec3) -> Self {
        Self {
            color: [255, 255, 255],
            ..Default::default()
        }
        .with_point(point)
    }

    pub fn with_point(mut self, point: Vec3) -> Self {
        self.point = point;
        self
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.u = u;
        self.v = v;
        self
    }

    pub fn with_color(mut self, color: [i32; 3]) -> Self {
        self.color = color;
        self
    }

    /// True if this record holds the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.color == EMPTY_COLOR
    }
}

/// A triangle of three vertex records. `Triangle::default()` is the
/// degenerate triangle returned for stale references.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Triangle {
    pub a: Vertex,
    pub b: Vertex,
    pub c: Vertex,
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [&Vertex; 3] {
        [&self.a, &self.b, &self.c]
    }

    pub fn vertices_mut(&mut self) -> [&mut Vertex; 3] {
        [&mut self.a, &mut self.b, &mut self.c]
    }

    /// Componentwise minimum of the screen-space points
    pub fn min_screen(&self) -> ScreenPoint {
        self.b
            .screen
            .min(self.c.screen)
            .min(self.a.screen)
    }

    /// Componentwise maximum of the screen-space points
    pub fn max_screen(&self) -> ScreenPoint {
        self.b
            .screen
            .max(self.c.screen)
            .max(self.a.screen)
    }

    /// True if any vertex is the empty sentinel (the reconstruct-failure shape)
    pub fn is_degenerate(&self) -> bool {
        self.vertices().iter().any(|v| v.is_empty())
    }
}

/// Three handles into the vertex table identifying a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleRef(pub [usize; 3]);

/// Fixed-capacity store of vertex records
#[derive(Debug, Clone)]
pub struct VertexTable {
    slots: Vec<Vertex>,
}

impl VertexTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Vertex::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// First-fit insertion: scans from slot 0 for the first empty record.
    /// Fails with [`SimError::TableFull`] when every slot is live; the
    /// caller must drop the triangle that owns this vertex.
    pub fn insert(&mut self, vertex: Vertex) -> Result<usize, SimError> {
        for (handle, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_empty() {
                *slot = vertex;
                return Ok(handle);
            }
        }
        Err(SimError::TableFull)
    }

    /// Reset a slot to the empty sentinel. Any triangle still holding this
    /// handle now carries a stale reference.
    pub fn invalidate(&mut self, handle: usize) {
        if let Some(slot) = self.slots.get_mut(handle) {
            *slot = Vertex::default();
        }
    }

    pub fn get(&self, handle: usize) -> Option<&Vertex> {
        self.slots.get(handle).filter(|s| !s.is_empty())
    }

    /// Gather the three records of a triangle. A stale handle (empty slot
    /// or out of range) yields the degenerate default triangle rather than
    /// an error, so late-arriving stale references cannot fault a stage.
    pub fn reconstruct(&self, tri: TriangleRef) -> Triangle {
        let mut verts = [Vertex::default(); 3];
        for (i, &handle) in tri.0.iter().enumerate() {
            match self.get(handle) {
                Some(v) => verts[i] = *v,
                None => return Triangle::default(),
            }
        }
        Triangle::new(verts[0], verts[1], verts[2])
    }
}

impl Default for VertexTable {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_vertex(x: f32) -> Vertex {
        Vertex::new(Vec3::new(x, 0.0, -1.0))
    }

    #[test]
    fn test_insert_until_full() {
        let mut table = VertexTable::new(DEFAULT_CAPACITY);
        let mut handles = Vec::new();
        for i in 0..DEFAULT_CAPACITY {
            handles.push(table.insert(live_vertex(i as f32)).unwrap());
        }
        handles.sort_unstable();
        handles.dedup();
        assert_eq!(handles.len(), DEFAULT_CAPACITY);

        assert!(matches!(
            table.insert(live_vertex(99.0)),
            Err(SimError::TableFull)
        ));
    }

    #[test]
    fn test_invalidate_reuses_slot_first_fit() {
        let mut table = VertexTable::new(8);
        for i in 0..5 {
            table.insert(live_vertex(i as f32)).unwrap();
        }
        table.invalidate(2);
        // first-fit scan hands back the freed slot before extending
        assert_eq!(table.insert(live_vertex(50.0)).unwrap(), 2);
        assert_eq!(table.insert(live_vertex(51.0)).unwrap(), 5);
    }

    #[test]
    fn test_reconstruct_stale_is_degenerate() {
        let mut table = VertexTable::new(8);
        let h0 = table.insert(live_vertex(0.0)).unwrap();
        let h1 = table.insert(live_vertex(1.0)).unwrap();
        let h2 = table.insert(live_vertex(2.0)).unwrap();
        let tri = TriangleRef([h0, h1, h2]);

        assert!(!table.reconstruct(tri).is_degenerate());

        // each of the three handle positions going stale must degrade
        for &stale in &[h0, h1, h2] {
            let mut t = table.clone();
            t.invalidate(stale);
            let rebuilt = t.reconstruct(tri);
            assert_eq!(rebuilt, Triangle::default());
        }
    }

    #[test]
    fn test_reconstruct_out_of_range_is_degenerate() {
        let mut table = VertexTable::new(4);
        let h0 = table.insert(live_vertex(0.0)).unwrap();
        let tri = TriangleRef([h0, 100, h0]);
        assert_eq!(table.reconstruct(tri), Triangle::default());
    }

    #[test]
    fn test_degenerate_bounding_box_is_sentinel_point() {
        let tri = Triangle::default();
        assert_eq!(tri.min_screen(), crate::math::ScreenPoint::default());
        assert_eq!(tri.max_screen(), crate::math::ScreenPoint::default());
    }

    #[test]
    fn test_empty_record_indistinguishable_from_unused() {
        let mut table = VertexTable::new(4);
        let h = table.insert(live_vertex(1.0)).unwrap();
        table.invalidate(h);
        let fresh = VertexTable::new(4);
        assert_eq!(table.slots, fresh.slots);
    }
}
