//! Door and window placement on synthesized walls.
//!
//! Doors: one per room pair that shares a non-exterior wall, then a
//! fallback door for every room still without one. Windows: one per
//! habitable room on its nearest exterior wall.

use crate::constants::{snap, Tolerances, DIMENSION_GRID};
use crate::geometry::Point2D;
use crate::ids::{IdSequence, RoomId};
use crate::model::{Door, DoorType, Room, SwingSide, Wall, Window, WindowType};
use crate::program::DesignConstraints;

/// Non-exterior wall whose midpoint lies near both rooms, if any.
pub(super) fn wall_between<'w>(
    walls: &'w [Wall],
    a: &Room,
    b: &Room,
    tolerance: f64,
) -> Option<&'w Wall> {
    let (ab, bb) = (a.bounds(), b.bounds());
    walls.iter().filter(|w| !w.is_exterior()).find(|w| {
        let mid = w.midpoint();
        ab.near(mid, tolerance) && bb.near(mid, tolerance)
    })
}

fn door_on(
    ids: &mut IdSequence,
    wall: &Wall,
    position: Point2D,
    host: RoomId,
    target: Option<RoomId>,
    constraints: &DesignConstraints,
) -> Door {
    Door {
        id: ids.issue(),
        position,
        width: constraints.min_door_width,
        height: constraints.door_height,
        door_type: DoorType::Single,
        swing: SwingSide::Left,
        wall: wall.id,
        host,
        target,
    }
}

/// Place doors. Pairs are visited once each in packing order, so at most
/// one door joins any two rooms.
pub(super) fn place_doors(
    rooms: &[Room],
    walls: &[Wall],
    constraints: &DesignConstraints,
    tolerances: &Tolerances,
    ids: &mut IdSequence,
) -> Vec<Door> {
    let mut doors = Vec::new();

    for (i, a) in rooms.iter().enumerate() {
        for b in &rooms[i + 1..] {
            if let Some(wall) = wall_between(walls, a, b, tolerances.wall_near_room) {
                doors.push(door_on(ids, wall, wall.midpoint(), a.id, Some(b.id), constraints));
            }
        }
    }

    for room in rooms {
        if doors.iter().any(|d| d.connects(room.id)) {
            continue;
        }
        let bounds = room.bounds();
        let interior = walls
            .iter()
            .filter(|w| !w.is_exterior())
            .find(|w| bounds.near(w.midpoint(), tolerances.wall_near_room));
        if let Some(wall) = interior {
            log::debug!("Fallback door for '{}' on wall {}", room.name, wall.id);
            doors.push(door_on(ids, wall, wall.midpoint(), room.id, None, constraints));
            continue;
        }
        // No interior wall nearby: the room opens to the outside.
        let centre = bounds.center();
        let entrance = walls.iter().filter(|w| w.is_exterior()).min_by(|x, y| {
            let dx = x.line().closest_point(centre).distance_to(centre);
            let dy = y.line().closest_point(centre).distance_to(centre);
            dx.total_cmp(&dy)
        });
        match entrance {
            Some(wall) => {
                log::debug!("Entrance door for '{}' on exterior wall {}", room.name, wall.id);
                let position = wall.line().closest_point(centre);
                doors.push(door_on(ids, wall, position, room.id, None, constraints));
            }
            None => log::warn!("Room '{}' has no wall to take a door", room.name),
        }
    }
    doors
}

/// Window width for a room of `area` on a wall of `wall_length`.
pub(super) fn window_width(
    area: f64,
    wall_length: f64,
    constraints: &DesignConstraints,
    tolerances: &Tolerances,
) -> f64 {
    let glazing = area * constraints.min_window_area_ratio / constraints.window_height;
    let width = tolerances
        .min_window_width
        .max(glazing.min(wall_length * tolerances.window_wall_share));
    snap(width, DIMENSION_GRID)
}

/// Place one window per habitable room on its nearest exterior wall.
pub(super) fn place_windows(
    rooms: &[Room],
    walls: &[Wall],
    constraints: &DesignConstraints,
    tolerances: &Tolerances,
    ids: &mut IdSequence,
) -> Vec<Window> {
    let mut windows = Vec::new();
    for room in rooms.iter().filter(|r| r.is_habitable()) {
        let centre = room.bounds().center();
        let nearest = walls.iter().filter(|w| w.is_exterior()).min_by(|x, y| {
            centre
                .distance_to(x.midpoint())
                .total_cmp(&centre.distance_to(y.midpoint()))
        });
        let Some(wall) = nearest else {
            continue;
        };
        if wall.length() < tolerances.min_window_wall {
            log::debug!(
                "No window for '{}': nearest exterior wall is {:.2} long",
                room.name,
                wall.length()
            );
            continue;
        }
        windows.push(Window {
            id: ids.issue(),
            position: wall.midpoint(),
            width: window_width(room.actual_area(), wall.length(), constraints, tolerances),
            height: constraints.window_height,
            sill_height: constraints.window_sill_height,
            window_type: WindowType::Fixed,
            wall: wall.id,
            room: room.id,
        });
    }
    windows
}
