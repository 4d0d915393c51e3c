//! Shelf packing of sized rooms into rows.
//!
//! Rooms are placed largest first, left to right, leaving one interior wall
//! thickness between neighbours. A room that would run past the maximum
//! footprint width starts a new row above the tallest room of the current
//! one. Rows never interleave, so placed rooms cannot overlap.

use std::cmp::Ordering;

use crate::constants::round_to;
use crate::geometry::Point2D;
use crate::model::Room;

/// Cursor state while filling rows.
struct Shelf {
    x: f64,
    y: f64,
    row_height: f64,
    gap: f64,
}

impl Shelf {
    fn new(gap: f64) -> Self {
        Self {
            x: gap,
            y: gap,
            row_height: 0.0,
            gap,
        }
    }

    fn wrap(&mut self) {
        self.x = self.gap;
        self.y += self.row_height + self.gap;
        self.row_height = 0.0;
    }
}

/// Order rooms by placed area, largest first. Equal areas keep input order.
pub(super) fn packing_order(rooms: &mut [Room]) {
    rooms.sort_by(|a, b| {
        (b.width * b.depth)
            .partial_cmp(&(a.width * a.depth))
            .unwrap_or(Ordering::Equal)
    });
}

/// Assign origins to every room and return them in packing order.
pub(super) fn pack_rooms(mut rooms: Vec<Room>, gap: f64, max_width: f64) -> Vec<Room> {
    packing_order(&mut rooms);

    let mut shelf = Shelf::new(gap);
    for (placed, room) in rooms.iter_mut().enumerate() {
        if placed > 0 && shelf.x + room.width + gap > max_width {
            shelf.wrap();
        }
        room.origin = Point2D::new(round_to(shelf.x, 2), round_to(shelf.y, 2));
        shelf.x += room.width + gap;
        shelf.row_height = shelf.row_height.max(room.depth);
    }
    rooms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RoomId;
    use crate::program::{Finishes, RoomFunction};
    use approx::assert_relative_eq;

    fn sized(id: u32, w: f64, d: f64) -> Room {
        Room {
            id: RoomId(id),
            name: format!("R{id}"),
            function: RoomFunction::Custom,
            target_area: w * d,
            min_area: 0.0,
            max_area: 0.0,
            origin: Point2D::default(),
            width: w,
            depth: d,
            finishes: Finishes::default(),
            ceiling_height: 3.0,
        }
    }

    #[test]
    fn test_largest_first_with_stable_ties() {
        let mut rooms = vec![sized(1, 2.0, 2.0), sized(2, 4.0, 4.0), sized(3, 1.0, 4.0)];
        packing_order(&mut rooms);
        let ids: Vec<u32> = rooms.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[test]
    fn test_single_row_placement() {
        let rooms = pack_rooms(vec![sized(1, 5.0, 4.0), sized(2, 3.0, 3.0)], 0.2, 30.0);
        assert_eq!(rooms[0].origin, Point2D::new(0.2, 0.2));
        assert_eq!(rooms[1].origin, Point2D::new(5.4, 0.2));
    }

    #[test]
    fn test_wrap_resets_row_height() {
        // Row 1: 6x5. Row 2: 6x3 and 5x3. Row 3 sits on row 2's height of 3, not 5.
        let rooms = pack_rooms(
            vec![
                sized(1, 6.0, 5.0),
                sized(2, 6.0, 3.0),
                sized(3, 5.0, 3.0),
                sized(4, 5.0, 2.0),
            ],
            0.2,
            12.0,
        );
        let by_id = |id: u32| rooms.iter().find(|r| r.id.0 == id).unwrap().origin;
        assert_eq!(by_id(1), Point2D::new(0.2, 0.2));
        assert_eq!(by_id(2), Point2D::new(0.2, 5.4));
        assert_eq!(by_id(3), Point2D::new(6.4, 5.4));
        assert_relative_eq!(by_id(4).y, 8.6, epsilon = 1e-9);
    }

    #[test]
    fn test_oversized_first_room_still_placed() {
        let rooms = pack_rooms(vec![sized(1, 40.0, 2.0), sized(2, 3.0, 3.0)], 0.2, 30.0);
        assert_eq!(rooms[0].origin, Point2D::new(0.2, 0.2));
        assert_relative_eq!(rooms[1].origin.x, 0.2);
        assert_relative_eq!(rooms[1].origin.y, 2.4, epsilon = 1e-9);
    }

    #[test]
    fn test_packed_rooms_never_overlap() {
        let input: Vec<Room> = (0..15)
            .map(|i| sized(i + 1, 2.0 + (i % 4) as f64, 2.5 + (i % 3) as f64))
            .collect();
        let rooms = pack_rooms(input, 0.2, 14.0);
        for i in 0..rooms.len() {
            for j in (i + 1)..rooms.len() {
                assert!(
                    !rooms[i].bounds().overlaps(&rooms[j].bounds(), 1e-6),
                    "{} and {} overlap",
                    rooms[i].name,
                    rooms[j].name
                );
            }
        }
    }
}
