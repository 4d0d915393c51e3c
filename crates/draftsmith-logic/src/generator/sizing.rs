//! Room sizing: target area plus a seeded aspect ratio gives width and depth.

use rand::Rng;

use crate::constants::{snap, ASPECT_JITTER, DIMENSION_GRID};
use crate::context::PlanRng;
use crate::geometry::Point2D;
use crate::ids::IdSequence;
use crate::model::Room;
use crate::program::RoomRequirement;

/// Width and depth for `area` at the given aspect ratio, snapped to the
/// dimension grid. Neither side drops below one grid step.
pub(super) fn room_dims(area: f64, aspect: f64) -> (f64, f64) {
    let width = (area * aspect).sqrt();
    let depth = area / width;
    (
        snap(width, DIMENSION_GRID).max(DIMENSION_GRID),
        snap(depth, DIMENSION_GRID).max(DIMENSION_GRID),
    )
}

/// Size every requirement in input order. Draws exactly one jitter value
/// per room from `rng`; rooms are unplaced (origin at zero) on return.
pub(super) fn size_rooms(
    requirements: &[RoomRequirement],
    rng: &mut PlanRng,
    ids: &mut IdSequence,
) -> Vec<Room> {
    requirements
        .iter()
        .map(|req| {
            let aspect = 1.0 + rng.gen_range(-ASPECT_JITTER..ASPECT_JITTER);
            let (width, depth) = room_dims(req.area, aspect);
            Room {
                id: ids.issue(),
                name: req.name.clone(),
                function: req.function,
                target_area: req.area,
                min_area: req.min_area,
                max_area: req.max_area,
                origin: Point2D::default(),
                width,
                depth,
                finishes: req.finishes.clone(),
                ceiling_height: req.ceiling_height,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RunContext;
    use crate::program::RoomFunction;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_room_dims() {
        let (w, d) = room_dims(25.0, 1.0);
        assert_relative_eq!(w, 5.0);
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_dims_snap_to_grid() {
        let (w, d) = room_dims(15.0, 1.2);
        // sqrt(18) = 4.243 -> 4.2, 15 / 4.243 = 3.536 -> 3.5
        assert_relative_eq!(w, 4.2, epsilon = 1e-9);
        assert_relative_eq!(d, 3.5, epsilon = 1e-9);
    }

    #[test]
    fn test_tiny_rooms_keep_a_grid_step() {
        let (w, d) = room_dims(0.0001, 1.0);
        assert_relative_eq!(w, DIMENSION_GRID);
        assert_relative_eq!(d, DIMENSION_GRID);
    }

    #[test]
    fn test_sizing_is_seeded() {
        let reqs = vec![
            RoomRequirement::new("A", RoomFunction::Living, 25.0),
            RoomRequirement::new("B", RoomFunction::Kitchen, 12.0),
            RoomRequirement::new("C", RoomFunction::Bedroom, 16.0),
        ];
        let ctx = RunContext::with_seed(99);
        let a = size_rooms(&reqs, &mut ctx.rng(), &mut IdSequence::new());
        let b = size_rooms(&reqs, &mut ctx.rng(), &mut IdSequence::new());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!((x.width, x.depth), (y.width, y.depth));
        }
        assert_eq!(a[2].id.0, 3);
    }

    #[test]
    fn test_sized_area_stays_near_target() {
        let reqs: Vec<_> = (0..20)
            .map(|i| RoomRequirement::new(format!("R{i}"), RoomFunction::Office, 10.0 + i as f64))
            .collect();
        let rooms = size_rooms(&reqs, &mut RunContext::with_seed(5).rng(), &mut IdSequence::new());
        for (room, req) in rooms.iter().zip(&reqs) {
            let ratio = room.actual_area() / req.area;
            assert!((0.9..1.1).contains(&ratio), "{} sized to {:.2}", room.name, ratio);
            let aspect = room.width / room.depth;
            assert!((0.6..1.45).contains(&aspect), "{} aspect {:.2}", room.name, aspect);
        }
    }
}
