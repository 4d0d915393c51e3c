//! Layout constants and heuristic tolerances.
//!
//! Fixed drafting values live here as plain constants. The tolerances used
//! by wall synthesis, door placement and QC are gathered in [`Tolerances`]
//! so callers can tune them per run instead of treating them as algorithmic
//! truth.

use serde::{Deserialize, Serialize};

/// Aspect-ratio jitter applied when sizing rooms: `1.0 ± ASPECT_JITTER`.
pub const ASPECT_JITTER: f64 = 0.3;

/// Room dimensions and window widths snap to this grid (metres).
pub const DIMENSION_GRID: f64 = 0.1;

/// Default min/max area as a share of the target area.
pub const MIN_AREA_FACTOR: f64 = 0.85;
pub const MAX_AREA_FACTOR: f64 = 1.15;

/// Room numbers start at `ROOM_NUMBER_BASE + 1`.
pub const ROOM_NUMBER_BASE: usize = 100;

/// Height above finished floor at which the plan is cut.
pub const PLAN_CUT_HEIGHT: f64 = 1.2;

/// Extra height added above floor-to-floor for elevation and section views.
pub const VIEW_HEADROOM: f64 = 0.5;

/// How far the section cut line runs past the building on each side.
pub const SECTION_OVERRUN: f64 = 1.0;

pub const OVERALL_DIMENSION_OFFSET: f64 = 1.5;
pub const ROOM_DIMENSION_OFFSET: f64 = 0.6;
pub const ELEVATION_MARKER_OFFSET: f64 = 2.0;

/// Sheet margins and title block height, millimetres on paper.
pub const SHEET_MARGIN_MM: f64 = 15.0;
pub const TITLE_BLOCK_HEIGHT_MM: f64 = 60.0;
pub const TITLE_BLOCK_WIDTH_MM: f64 = 180.0;

pub const GENERATOR_NAME: &str = "Draftsmith v0.1.0";

/// Heuristic tolerances for wall, door, window and QC decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Slack added to the interior wall thickness when deciding whether two
    /// room edges are collinear.
    pub shared_edge_slack: f64,
    /// Distance under which a room edge counts as already walled.
    pub edge_coverage: f64,
    /// How far outside a room's bounds a wall midpoint may sit and still
    /// belong to that room.
    pub wall_near_room: f64,
    /// Minimum distance between two door centres.
    pub door_clearance: f64,
    /// Shortest exterior wall that can take a window.
    pub min_window_wall: f64,
    /// Largest share of the host wall a window may occupy.
    pub window_wall_share: f64,
    /// Narrowest window placed.
    pub min_window_width: f64,
    /// Overlap below this amount is treated as touching by the overlap check.
    pub overlap_touch: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            shared_edge_slack: 0.05,
            edge_coverage: 0.1,
            wall_near_room: 0.5,
            door_clearance: 0.9,
            min_window_wall: 1.5,
            window_wall_share: 0.6,
            min_window_width: 1.2,
            overlap_touch: 1e-6,
        }
    }
}

/// Round `value` to the nearest multiple of `grid`.
pub fn snap(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

/// Round to a fixed number of decimals (used for placed coordinates).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_to_decimetre() {
        assert!((snap(4.47, DIMENSION_GRID) - 4.5).abs() < 1e-9);
        assert!((snap(4.44, DIMENSION_GRID) - 4.4).abs() < 1e-9);
    }

    #[test]
    fn round_two_decimals() {
        assert!((round_to(5.456, 2) - 5.46).abs() < 1e-9);
    }

    #[test]
    fn tolerances_partial_json_uses_defaults() {
        let t: Tolerances = serde_json::from_str(r#"{"door_clearance": 1.2}"#).unwrap();
        assert_eq!(t.door_clearance, 1.2);
        assert_eq!(t.edge_coverage, 0.1);
    }
}
