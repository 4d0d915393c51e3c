//! Wall synthesis from packed room rectangles.
//!
//! Three passes, in order:
//!   1. four exterior walls around the envelope
//!   2. one interior wall on the midline of every shared room edge
//!   3. interior walls on room edges that are neither walled nor on the
//!      perimeter

use crate::constants::Tolerances;
use crate::geometry::{BoundingBox, Line2D, Point2D};
use crate::ids::IdSequence;
use crate::model::{Room, Wall, WallType};
use crate::program::DesignConstraints;

/// Room union grown by the exterior wall thickness.
#[derive(Debug, Clone, Copy)]
pub(super) struct Envelope {
    pub bounds: BoundingBox,
    pub thickness: f64,
}

impl Envelope {
    pub fn around(rooms: &[Room], exterior_thickness: f64) -> Option<Self> {
        let union = BoundingBox::union_all(rooms.iter().map(Room::bounds))?;
        Some(Self {
            bounds: union.expanded(exterior_thickness),
            thickness: exterior_thickness,
        })
    }

    /// Envelope sides in the order bottom, right, top, left.
    fn sides(&self) -> [Line2D; 4] {
        self.bounds.edges()
    }

    /// True when both endpoints of `edge` hug the same envelope side.
    fn on_perimeter(&self, edge: &Line2D, slack: f64) -> bool {
        let reach = self.thickness + slack;
        let b = &self.bounds;
        let near = |a: f64, side: f64| (a - side).abs() < reach;
        (near(edge.start.x, b.min.x) && near(edge.end.x, b.min.x))
            || (near(edge.start.y, b.min.y) && near(edge.end.y, b.min.y))
            || (near(edge.start.x, b.max.x) && near(edge.end.x, b.max.x))
            || (near(edge.start.y, b.max.y) && near(edge.end.y, b.max.y))
    }
}

fn wall(ids: &mut IdSequence, line: Line2D, thickness: f64, height: f64, wall_type: WallType) -> Wall {
    Wall {
        id: ids.issue(),
        start: line.start,
        end: line.end,
        thickness,
        height,
        wall_type,
    }
}

/// The collinear segment two rooms share, placed on the midline of the gap
/// between them. `None` when the rooms are not neighbours.
pub(super) fn shared_edge(a: &BoundingBox, b: &BoundingBox, tolerance: f64) -> Option<Line2D> {
    let y_overlap = (a.min.y.max(b.min.y), a.max.y.min(b.max.y));
    let x_overlap = (a.min.x.max(b.min.x), a.max.x.min(b.max.x));

    // a's right side against b's left side, then the mirror case
    for (left, right) in [(a, b), (b, a)] {
        if (left.max.x - right.min.x).abs() < tolerance && y_overlap.1 > y_overlap.0 {
            let x = (left.max.x + right.min.x) / 2.0;
            return Some(Line2D::new(
                Point2D::new(x, y_overlap.0),
                Point2D::new(x, y_overlap.1),
            ));
        }
    }
    // a's top against b's bottom, then the mirror case
    for (lower, upper) in [(a, b), (b, a)] {
        if (lower.max.y - upper.min.y).abs() < tolerance && x_overlap.1 > x_overlap.0 {
            let y = (lower.max.y + upper.min.y) / 2.0;
            return Some(Line2D::new(
                Point2D::new(x_overlap.0, y),
                Point2D::new(x_overlap.1, y),
            ));
        }
    }
    None
}

/// An edge counts as walled when some wall midpoint lies within
/// `tolerance` plus half the edge length of the edge midpoint.
pub(super) fn edge_has_wall(edge: &Line2D, walls: &[Wall], tolerance: f64) -> bool {
    let mid = edge.midpoint();
    let half = (edge.end.x - edge.start.x)
        .abs()
        .max((edge.end.y - edge.start.y).abs())
        / 2.0;
    walls
        .iter()
        .any(|w| mid.distance_to(w.midpoint()) < tolerance + half)
}

/// Build every wall for the packed rooms. Empty input gives no walls.
pub(super) fn synthesize_walls(
    rooms: &[Room],
    constraints: &DesignConstraints,
    tolerances: &Tolerances,
    ids: &mut IdSequence,
) -> Vec<Wall> {
    let Some(envelope) = Envelope::around(rooms, constraints.exterior_wall_thickness) else {
        return Vec::new();
    };
    let height = constraints.floor_to_floor_height;
    let interior = constraints.wall_thickness;

    let mut walls: Vec<Wall> = envelope
        .sides()
        .into_iter()
        .map(|side| wall(ids, side, envelope.thickness, height, WallType::Exterior))
        .collect();

    let shared_tolerance = interior + tolerances.shared_edge_slack;
    for (i, a) in rooms.iter().enumerate() {
        for b in &rooms[i + 1..] {
            if let Some(line) = shared_edge(&a.bounds(), &b.bounds(), shared_tolerance) {
                walls.push(wall(ids, line, interior, height, WallType::Interior));
            }
        }
    }
    let shared_count = walls.len() - 4;

    for room in rooms {
        for edge in room.bounds().edges() {
            if edge_has_wall(&edge, &walls, tolerances.edge_coverage)
                || envelope.on_perimeter(&edge, tolerances.edge_coverage)
            {
                continue;
            }
            log::debug!("Enclosing open edge of '{}' with an interior wall", room.name);
            walls.push(wall(ids, edge, interior, height, WallType::Interior));
        }
    }

    log::debug!(
        "Walls: 4 exterior, {} shared, {} enclosing",
        shared_count,
        walls.len() - 4 - shared_count
    );
    walls
}
