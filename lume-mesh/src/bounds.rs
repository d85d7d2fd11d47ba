use glam::Vec3;

/// Axis-aligned box that only ever grows.
///
/// A fresh box is empty: its corners hold the `+inf`/`-inf` sentinels, so the
/// first merged point becomes both corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    lower: Vec3,
    upper: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    pub fn new() -> Self {
        Self {
            lower: Vec3::splat(f32::INFINITY),
            upper: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut bounds = Self::new();
        for point in points {
            bounds.merge_point(point);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.lower.x > self.upper.x
    }

    pub fn merge_point(&mut self, point: Vec3) {
        self.lower = self.lower.min(point);
        self.upper = self.upper.max(point);
    }

    pub fn merge(&mut self, other: &BoundingBox) {
        self.lower = self.lower.min(other.lower);
        self.upper = self.upper.max(other.upper);
    }

    pub fn lower_corner(&self) -> Vec3 {
        self.lower
    }

    pub fn upper_corner(&self) -> Vec3 {
        self.upper
    }

    /// Size along each axis. Meaningless for an empty box.
    pub fn extent(&self) -> Vec3 {
        self.upper - self.lower
    }

    pub fn center(&self) -> Vec3 {
        (self.lower + self.upper) * 0.5
    }
}
