//! Annotation engine: dimensions, room tags and view markers for a level.

use serde::Serialize;

use crate::constants::{
    ELEVATION_MARKER_OFFSET, OVERALL_DIMENSION_OFFSET, ROOM_DIMENSION_OFFSET, ROOM_NUMBER_BASE,
};
use crate::geometry::{Line2D, Point2D};
use crate::ids::RoomId;
use crate::layers;
use crate::model::Level;
use crate::views::{section_cut_line, ElevationDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionStyle {
    #[default]
    Linear,
    Aligned,
    Angular,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub start: Point2D,
    pub end: Point2D,
    /// Distance of the dimension line from the measured edge.
    pub offset: f64,
    pub value: f64,
    pub style: DimensionStyle,
    pub layer: &'static str,
}

impl Dimension {
    /// Linear dimension whose value is the distance between its endpoints.
    pub fn new(start: Point2D, end: Point2D, offset: f64) -> Self {
        Self {
            start,
            end,
            offset,
            value: start.distance_to(end),
            style: DimensionStyle::Linear,
            layer: layers::DIMENSIONS,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomTag {
    pub room: RoomId,
    pub position: Point2D,
    pub room_name: String,
    pub room_number: String,
    pub area: f64,
    pub name_layer: &'static str,
    pub area_layer: &'static str,
    pub number_layer: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationMarker {
    pub position: Point2D,
    pub direction: ElevationDirection,
    pub layer: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionMarker {
    pub cut_line: Line2D,
    pub label: String,
    pub layer: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationResult {
    pub dimensions: Vec<Dimension>,
    pub room_tags: Vec<RoomTag>,
    pub elevation_markers: Vec<ElevationMarker>,
    pub section_markers: Vec<SectionMarker>,
}

/// Room number for the room at `index` in level order: 101, 102, ...
pub fn room_number(index: usize) -> String {
    (ROOM_NUMBER_BASE + index + 1).to_string()
}

/// Annotate every room of `level`, plus building-wide dimensions and
/// markers when the level has bounds.
pub fn annotate(level: &Level) -> AnnotationResult {
    let mut result = AnnotationResult::default();

    for (i, room) in level.rooms.iter().enumerate() {
        result.room_tags.push(RoomTag {
            room: room.id,
            position: room.bounds().center(),
            room_name: room.name.clone(),
            room_number: room_number(i),
            area: room.actual_area(),
            name_layer: layers::ROOM_NAME,
            area_layer: layers::ROOM_AREA,
            number_layer: layers::ROOM_NUMBER,
        });
    }

    if let Some(b) = level.bounds() {
        let off = OVERALL_DIMENSION_OFFSET;
        result.dimensions.push(Dimension::new(
            Point2D::new(b.min.x, b.min.y - off),
            Point2D::new(b.max.x, b.min.y - off),
            off,
        ));
        result.dimensions.push(Dimension::new(
            Point2D::new(b.min.x - off, b.min.y),
            Point2D::new(b.min.x - off, b.max.y),
            off,
        ));
    }

    let off = ROOM_DIMENSION_OFFSET;
    for room in &level.rooms {
        let rb = room.bounds();
        result.dimensions.push(
            Dimension::new(
                Point2D::new(rb.min.x, rb.min.y - off),
                Point2D::new(rb.max.x, rb.min.y - off),
                off,
            )
            .with_value(room.width),
        );
        result.dimensions.push(
            Dimension::new(
                Point2D::new(rb.min.x - off, rb.min.y),
                Point2D::new(rb.min.x - off, rb.max.y),
                off,
            )
            .with_value(room.depth),
        );
    }

    if let Some(b) = level.bounds() {
        let c = b.center();
        let reach = ELEVATION_MARKER_OFFSET;
        for direction in ElevationDirection::ALL {
            let position = match direction {
                ElevationDirection::North => Point2D::new(c.x, b.max.y + reach),
                ElevationDirection::South => Point2D::new(c.x, b.min.y - reach),
                ElevationDirection::East => Point2D::new(b.max.x + reach, c.y),
                ElevationDirection::West => Point2D::new(b.min.x - reach, c.y),
            };
            result.elevation_markers.push(ElevationMarker {
                position,
                direction,
                layer: layers::ELEVATION_MARKERS,
            });
        }
        result.section_markers.push(SectionMarker {
            cut_line: section_cut_line(&b),
            label: "A".to_string(),
            layer: layers::SECTION_MARKERS,
        });
    }

    log::info!(
        "Annotated {}: {} dimensions, {} room tags, {} elevation markers",
        level.name,
        result.dimensions.len(),
        result.room_tags.len(),
        result.elevation_markers.len()
    );
    result
}
