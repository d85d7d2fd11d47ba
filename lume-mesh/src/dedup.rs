use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::PackedVertex;

pub const POSITION_TOLERANCE: f32 = 0.001;
pub const TEXCOORD_TOLERANCE: f32 = 0.1;
pub const NORMAL_TOLERANCE: f32 = 0.3;

/// Sorted-map key that orders vertices lexicographically with per-axis slack.
///
/// Axes are visited in the order position xyz, texcoord xy, normal xyz. The
/// first axis whose difference reaches its tolerance decides the order; when
/// every axis is within tolerance the keys compare equal. This relation is not
/// transitive, so which vertices end up welded depends on insertion order.
#[derive(Clone, Copy, Debug)]
pub struct VertexKey(pub PackedVertex);

impl VertexKey {
    fn axes(&self) -> [(f32, f32); 8] {
        let v = &self.0;
        [
            (v.position[0], POSITION_TOLERANCE),
            (v.position[1], POSITION_TOLERANCE),
            (v.position[2], POSITION_TOLERANCE),
            (v.tex_coord[0], TEXCOORD_TOLERANCE),
            (v.tex_coord[1], TEXCOORD_TOLERANCE),
            (v.normal[0], NORMAL_TOLERANCE),
            (v.normal[1], NORMAL_TOLERANCE),
            (v.normal[2], NORMAL_TOLERANCE),
        ]
    }
}

impl Ord for VertexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for ((a, tolerance), (b, _)) in self.axes().into_iter().zip(other.axes()) {
            if (a - b).abs() >= tolerance {
                return if a < b { Ordering::Less } else { Ordering::Greater };
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for VertexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VertexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VertexKey {}

/// Welds vertices into an output list, handing back indices into it.
#[derive(Debug, Default)]
pub struct VertexDeduplicator {
    map: BTreeMap<VertexKey, u32>,
}

impl VertexDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of an equivalent vertex already in `vertices`, or of `vertex`
    /// after appending it.
    pub fn insert(&mut self, vertices: &mut Vec<PackedVertex>, vertex: PackedVertex) -> u32 {
        *self.map.entry(VertexKey(vertex)).or_insert_with(|| {
            vertices.push(vertex);
            (vertices.len() - 1) as u32
        })
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
