//! CAD layer table following AIA layer naming.

use serde::Serialize;

use crate::model::{Level, Wall, WallType};

pub const WALL: &str = "A-WALL";
pub const WALL_EXTERIOR: &str = "A-WALL-EXTR";
pub const DOOR: &str = "A-DOOR";
pub const WINDOW: &str = "A-WIND";
pub const ROOM_NAME: &str = "A-ROOM-NAME";
pub const ROOM_AREA: &str = "A-ROOM-AREA";
pub const ROOM_NUMBER: &str = "A-ROOM-NUMB";
pub const DIMENSIONS: &str = "A-DIMS";
pub const ELEVATION_MARKERS: &str = "A-ELEV-IDEN";
pub const SECTION_MARKERS: &str = "A-SECT-IDEN";
pub const TITLE_BLOCK: &str = "G-ANNO-TTLB";

/// AutoCAD colour index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum LayerColor {
    Red = 1,
    Yellow = 2,
    Green = 3,
    Cyan = 4,
    Blue = 5,
    Magenta = 6,
    White = 7,
    Gray = 8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CadLayer {
    pub name: &'static str,
    pub color: LayerColor,
    pub linetype: &'static str,
    /// Millimetres.
    pub lineweight: f64,
    pub description: &'static str,
}

const fn layer(
    name: &'static str,
    color: LayerColor,
    linetype: &'static str,
    lineweight: f64,
    description: &'static str,
) -> CadLayer {
    CadLayer {
        name,
        color,
        linetype,
        lineweight,
        description,
    }
}

const CONTINUOUS: &str = "Continuous";
const DASHED: &str = "DASHED";

pub const LAYERS: &[CadLayer] = &[
    layer(WALL, LayerColor::White, CONTINUOUS, 0.50, "Walls"),
    layer(WALL_EXTERIOR, LayerColor::White, CONTINUOUS, 0.70, "Exterior walls"),
    layer(DOOR, LayerColor::Red, CONTINUOUS, 0.35, "Doors"),
    layer("A-DOOR-SWING", LayerColor::Red, DASHED, 0.18, "Door swings"),
    layer(WINDOW, LayerColor::Cyan, CONTINUOUS, 0.35, "Windows"),
    layer("A-GLAZ", LayerColor::Cyan, CONTINUOUS, 0.25, "Glazing"),
    layer("A-COLS", LayerColor::Green, CONTINUOUS, 0.50, "Columns"),
    layer(ROOM_NAME, LayerColor::Blue, CONTINUOUS, 0.18, "Room names"),
    layer(ROOM_AREA, LayerColor::Blue, CONTINUOUS, 0.18, "Room areas"),
    layer(ROOM_NUMBER, LayerColor::Blue, CONTINUOUS, 0.18, "Room numbers"),
    layer(DIMENSIONS, LayerColor::Yellow, CONTINUOUS, 0.18, "Dimensions"),
    layer("A-ANNO", LayerColor::Green, CONTINUOUS, 0.18, "Annotations"),
    layer("A-ANNO-TAG", LayerColor::Green, CONTINUOUS, 0.25, "Tags"),
    layer(ELEVATION_MARKERS, LayerColor::Magenta, CONTINUOUS, 0.25, "Elevation markers"),
    layer(SECTION_MARKERS, LayerColor::Magenta, CONTINUOUS, 0.25, "Section markers"),
    layer("A-FLOR-PATT", LayerColor::Gray, CONTINUOUS, 0.13, "Floor patterns"),
    layer("A-CEIL-GRID", LayerColor::Gray, DASHED, 0.13, "Ceiling grid"),
    layer(TITLE_BLOCK, LayerColor::White, CONTINUOUS, 0.50, "Title block"),
    layer("G-ANNO-NOTE", LayerColor::White, CONTINUOUS, 0.18, "General notes"),
];

/// Look up a layer by name. Unknown names get a plain white layer.
pub fn get_layer(name: &str) -> CadLayer {
    LAYERS
        .iter()
        .find(|l| l.name == name)
        .copied()
        .unwrap_or(layer("0", LayerColor::White, CONTINUOUS, 0.25, ""))
}

pub fn layer_for_wall(wall: &Wall) -> &'static str {
    match wall.wall_type {
        WallType::Exterior => WALL_EXTERIOR,
        WallType::Interior | WallType::Partition | WallType::Shear => WALL,
    }
}

/// The layers an export of `level` declares: one per wall class present,
/// openings, room tags, annotation layers and the title block. Ordered by
/// first use, no duplicates.
pub fn drawing_layers(level: &Level) -> Vec<CadLayer> {
    let mut names: Vec<&'static str> = Vec::new();
    let mut add = |name: &'static str| {
        if !names.contains(&name) {
            names.push(name);
        }
    };

    for wall in &level.walls {
        add(layer_for_wall(wall));
    }
    if !level.doors.is_empty() {
        add(DOOR);
    }
    if !level.windows.is_empty() {
        add(WINDOW);
    }
    if !level.rooms.is_empty() {
        for name in [
            ROOM_NAME,
            ROOM_AREA,
            ROOM_NUMBER,
            DIMENSIONS,
            ELEVATION_MARKERS,
            SECTION_MARKERS,
        ] {
            add(name);
        }
    }
    add(TITLE_BLOCK);

    names.into_iter().map(get_layer).collect()
}
