//! Building model produced by the plan generator.
//!
//! Containment is `Project → Site → Building → Level → rooms/walls/doors/
//! windows/zones`. Elements are created in one generation pass and never
//! mutated afterwards; every later stage reads them through shared borrows.

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Line2D, Point2D};
use crate::ids::{DoorId, LevelId, RoomId, WallId, WindowId, ZoneId};
use crate::program::{Finishes, RoomFunction};

/// A placed room. `origin` is the lower-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub function: RoomFunction,
    pub target_area: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub origin: Point2D,
    pub width: f64,
    pub depth: f64,
    pub finishes: Finishes,
    pub ceiling_height: f64,
}

impl Room {
    pub fn actual_area(&self) -> f64 {
        self.width * self.depth
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_origin_size(self.origin, self.width, self.depth)
    }

    pub fn is_habitable(&self) -> bool {
        self.function.is_habitable()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    Exterior,
    Interior,
    Partition,
    Shear,
}

impl WallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallType::Exterior => "exterior",
            WallType::Interior => "interior",
            WallType::Partition => "partition",
            WallType::Shear => "shear",
        }
    }
}

/// A wall segment, drawn along its centreline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: WallId,
    pub start: Point2D,
    pub end: Point2D,
    pub thickness: f64,
    pub height: f64,
    pub wall_type: WallType,
}

impl Wall {
    pub fn line(&self) -> Line2D {
        Line2D::new(self.start, self.end)
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    pub fn midpoint(&self) -> Point2D {
        self.start.midpoint(self.end)
    }

    pub fn is_exterior(&self) -> bool {
        self.wall_type == WallType::Exterior
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorType {
    Single,
    Double,
    Sliding,
    Pocket,
}

impl DoorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoorType::Single => "single",
            DoorType::Double => "double",
            DoorType::Sliding => "sliding",
            DoorType::Pocket => "pocket",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingSide {
    Left,
    Right,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    pub position: Point2D,
    pub width: f64,
    pub height: f64,
    pub door_type: DoorType,
    pub swing: SwingSide,
    pub wall: WallId,
    pub host: RoomId,
    /// `None` for a door that serves a single room.
    pub target: Option<RoomId>,
}

impl Door {
    pub fn connects(&self, room: RoomId) -> bool {
        self.host == room || self.target == Some(room)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    Fixed,
    Casement,
    DoubleHung,
    Sliding,
}

impl WindowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowType::Fixed => "fixed",
            WindowType::Casement => "casement",
            WindowType::DoubleHung => "double_hung",
            WindowType::Sliding => "sliding",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    pub position: Point2D,
    pub width: f64,
    pub height: f64,
    pub sill_height: f64,
    pub window_type: WindowType,
    pub wall: WallId,
    pub room: RoomId,
}

/// A named group of rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub rooms: Vec<RoomId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    pub elevation: f64,
    pub floor_to_floor: f64,
    pub rooms: Vec<Room>,
    pub walls: Vec<Wall>,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
    pub zones: Vec<Zone>,
}

impl Level {
    /// A level with no elements.
    pub fn empty(id: LevelId, name: impl Into<String>, floor_to_floor: f64) -> Self {
        Self {
            id,
            name: name.into(),
            elevation: 0.0,
            floor_to_floor,
            rooms: Vec::new(),
            walls: Vec::new(),
            doors: Vec::new(),
            windows: Vec::new(),
            zones: Vec::new(),
        }
    }

    /// Union of all room bounds, `None` when the level has no rooms.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::union_all(self.rooms.iter().map(Room::bounds))
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    pub fn exterior_walls(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter().filter(|w| w.is_exterior())
    }

    pub fn interior_walls(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter().filter(|w| !w.is_exterior())
    }

    pub fn total_area(&self) -> f64 {
        self.rooms.iter().map(Room::actual_area).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub address: String,
    pub levels: Vec<Level>,
}

impl Building {
    pub fn total_area(&self) -> f64 {
        self.levels.iter().map(Level::total_area).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub buildings: Vec<Building>,
    pub boundary: Vec<Point2D>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub number: String,
    pub client: String,
    pub revision: u32,
    pub site: Site,
}

impl Project {
    pub fn building(&self) -> Option<&Building> {
        self.site.buildings.first()
    }

    /// The populated level: first level of the first building.
    pub fn primary_level(&self) -> Option<&Level> {
        self.building().and_then(|b| b.levels.first())
    }
}
