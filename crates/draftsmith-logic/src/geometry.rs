//! 2D primitives shared by every stage.
//!
//! Plain `Copy` value types in metres (plan space) or millimetres (sheet
//! space). Nothing here allocates.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point2D {
        Point2D::new(self.x + dx, self.y + dy)
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line2D {
    pub start: Point2D,
    pub end: Point2D,
}

impl Line2D {
    pub const fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    pub fn midpoint(&self) -> Point2D {
        self.start.midpoint(self.end)
    }

    /// Unit direction vector, or `(0, 0)` for a degenerate line.
    pub fn direction(&self) -> (f64, f64) {
        let len = self.length();
        if len == 0.0 {
            return (0.0, 0.0);
        }
        ((self.end.x - self.start.x) / len, (self.end.y - self.start.y) / len)
    }

    pub fn is_horizontal(&self) -> bool {
        (self.end.y - self.start.y).abs() < 1e-6
    }

    pub fn is_vertical(&self) -> bool {
        (self.end.x - self.start.x).abs() < 1e-6
    }

    /// Closest point on the segment to `p`.
    pub fn closest_point(&self, p: Point2D) -> Point2D {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.start;
        }
        let t = (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len_sq).clamp(0.0, 1.0);
        Point2D::new(self.start.x + t * dx, self.start.y + t * dy)
    }
}

/// Axis-aligned box. `min` is the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point2D,
    pub max: Point2D,
}

impl BoundingBox {
    pub const fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: Point2D, width: f64, height: f64) -> Self {
        Self::new(origin, origin.offset(width, height))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point2D {
        self.min.midpoint(self.max)
    }

    /// Inclusive containment.
    pub fn contains(&self, p: Point2D) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// True when the boxes share any point, including a touching edge.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.max.x < other.min.x
            || other.max.x < self.min.x
            || self.max.y < other.min.y
            || other.max.y < self.min.y)
    }

    /// True when the interiors overlap by more than `touch` on both axes.
    pub fn overlaps(&self, other: &BoundingBox, touch: f64) -> bool {
        let overlap_x = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let overlap_y = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        overlap_x > touch && overlap_y > touch
    }

    pub fn expanded(&self, amount: f64) -> BoundingBox {
        BoundingBox::new(
            self.min.offset(-amount, -amount),
            self.max.offset(amount, amount),
        )
    }

    /// Grow this box to also cover `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            Point2D::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point2D::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }

    /// Union of all boxes, `None` for an empty iterator.
    pub fn union_all<I: IntoIterator<Item = BoundingBox>>(boxes: I) -> Option<BoundingBox> {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Loose containment: `p` lies within the box grown by `tolerance`.
    pub fn near(&self, p: Point2D, tolerance: f64) -> bool {
        self.expanded(tolerance).contains(p)
    }

    /// The four edges, counter-clockwise from the bottom edge.
    pub fn edges(&self) -> [Line2D; 4] {
        let bl = self.min;
        let br = Point2D::new(self.max.x, self.min.y);
        let tr = self.max;
        let tl = Point2D::new(self.min.x, self.max.y);
        [
            Line2D::new(bl, br),
            Line2D::new(br, tr),
            Line2D::new(tr, tl),
            Line2D::new(tl, bl),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bbox(x0: f64, y0: f64, x1: f64, y1: f64) -> BoundingBox {
        BoundingBox::new(Point2D::new(x0, y0), Point2D::new(x1, y1))
    }

    #[test]
    fn box_derived_values() {
        let b = bbox(1.0, 2.0, 5.0, 4.0);
        assert_relative_eq!(b.width(), 4.0);
        assert_relative_eq!(b.height(), 2.0);
        assert_relative_eq!(b.area(), 8.0);
        assert_eq!(b.center(), Point2D::new(3.0, 3.0));
    }

    #[test]
    fn contains_is_inclusive() {
        let b = bbox(0.0, 0.0, 2.0, 2.0);
        assert!(b.contains(Point2D::new(2.0, 0.0)));
        assert!(!b.contains(Point2D::new(2.01, 0.0)));
    }

    #[test]
    fn touching_boxes_intersect_but_do_not_overlap() {
        let a = bbox(0.0, 0.0, 2.0, 2.0);
        let b = bbox(2.0, 0.0, 4.0, 2.0);
        assert!(a.intersects(&b));
        assert!(!a.overlaps(&b, 1e-6));
        assert!(a.overlaps(&bbox(1.0, 1.0, 3.0, 3.0), 1e-6));
    }

    #[test]
    fn union_all_of_nothing_is_none() {
        assert!(BoundingBox::union_all(Vec::new()).is_none());
        let u = BoundingBox::union_all(vec![bbox(0.0, 0.0, 1.0, 1.0), bbox(3.0, -1.0, 4.0, 0.5)]);
        assert_eq!(u, Some(bbox(0.0, -1.0, 4.0, 1.0)));
    }

    #[test]
    fn line_properties() {
        let l = Line2D::new(Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0));
        assert_relative_eq!(l.length(), 5.0);
        assert_eq!(l.midpoint(), Point2D::new(1.5, 2.0));
        let (dx, dy) = l.direction();
        assert_relative_eq!(dx, 0.6);
        assert_relative_eq!(dy, 0.8);
        assert!(!l.is_horizontal() && !l.is_vertical());
    }

    #[test]
    fn closest_point_is_clamped() {
        let l = Line2D::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0));
        assert_eq!(l.closest_point(Point2D::new(4.0, 3.0)), Point2D::new(4.0, 0.0));
        assert_eq!(l.closest_point(Point2D::new(-5.0, 1.0)), Point2D::new(0.0, 0.0));
    }

    #[test]
    fn edges_run_counter_clockwise() {
        let edges = bbox(0.0, 0.0, 2.0, 1.0).edges();
        assert!(edges[0].is_horizontal());
        assert!(edges[1].is_vertical());
        assert_eq!(edges[2].start, Point2D::new(2.0, 1.0));
        assert_eq!(edges[3].end, Point2D::new(0.0, 0.0));
    }
}
