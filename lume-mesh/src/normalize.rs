use glam::Vec3;

use crate::{BoundingBox, PackedVertex};

/// Rescale positions uniformly so the longest side of `bounds` spans `[-1, 1]`.
///
/// Each position becomes `(p - lower) / half_extent - 1` where `half_extent`
/// is half of the largest side of `bounds`. All axes share the same scale, so
/// proportions are kept and shorter axes end up within `[-1, 1]` as well.
///
/// `bounds` must be non-degenerate: a box of zero extent divides by zero.
pub fn scale_to_unit_box(vertices: &mut [PackedVertex], bounds: &BoundingBox) {
    let lower = bounds.lower_corner();
    let half_extent = bounds.extent().max_element() / 2.0;
    debug_assert!(half_extent > 0.0, "unit box scaling needs a non-degenerate bounding box");

    for vertex in vertices.iter_mut() {
        let position = (vertex.position() - lower) / half_extent - Vec3::ONE;
        vertex.position = position.to_array();
    }
}
