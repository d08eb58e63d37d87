//! Axis-aligned bounding boxes

use super::math::{Point3, Vec3};

/// Axis-aligned bounding box stored as inclusive min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning the two corners (order-independent).
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Box from a center and a full size (not half extents).
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// The `[0, 1]^3` region visible in normalized viewport space.
    pub fn unit_viewport() -> Self {
        Self::from_center_size(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 1.0, 1.0))
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?.coords;
        let mut bounds = Self { min: first, max: first };
        for point in iter {
            bounds.encapsulate(&point.coords);
        }
        Some(bounds)
    }

    /// Grow the box to include `point`.
    pub fn encapsulate(&mut self, point: &Vec3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Inclusive overlap test: boxes that only touch still intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_viewport_extents() {
        let unit = Aabb::unit_viewport();
        assert_relative_eq!(unit.min, Vec3::zeros());
        assert_relative_eq!(unit.max, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(unit.center(), Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_from_points() {
        let bounds = Aabb::from_points([
            Point3::new(1.0, -2.0, 0.0),
            Point3::new(-1.0, 3.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_relative_eq!(bounds.max, Vec3::new(1.0, 3.0, 0.0));
        assert_relative_eq!(bounds.size(), Vec3::new(2.0, 5.0, 0.0));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_intersects_touching_and_disjoint() {
        let unit = Aabb::unit_viewport();
        let touching = Aabb::new(Vec3::new(1.0, 0.2, 0.0), Vec3::new(2.0, 0.8, 0.0));
        let disjoint = Aabb::new(Vec3::new(-2.0, 0.2, 0.0), Vec3::new(-0.1, 0.8, 0.0));
        let flat_inside = Aabb::new(Vec3::new(0.2, 0.2, 0.0), Vec3::new(0.4, 0.4, 0.0));

        assert!(unit.intersects(&touching));
        assert!(touching.intersects(&unit));
        assert!(!unit.intersects(&disjoint));
        assert!(unit.intersects(&flat_inside));
    }
}
