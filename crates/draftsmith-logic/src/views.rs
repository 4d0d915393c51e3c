//! Drawing views derived from a level's bounds.
//!
//! Views only carry what a viewport needs to be placed: identity, scale and
//! extents. Nothing here renders geometry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{PLAN_CUT_HEIGHT, SECTION_OVERRUN, VIEW_HEADROOM};
use crate::error::{DraftError, Result};
use crate::geometry::{BoundingBox, Line2D, Point2D};
use crate::ids::{IdSequence, LevelId, ViewId};
use crate::model::Level;

/// Drawing scale written `N:M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewScale {
    pub numerator: u32,
    pub denominator: u32,
}

impl ViewScale {
    pub const PLAN: ViewScale = ViewScale::new(1, 100);
    pub const SECTION: ViewScale = ViewScale::new(1, 50);

    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn factor(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// True if this scale draws larger than `other`.
    pub fn is_finer_than(&self, other: ViewScale) -> bool {
        u64::from(self.numerator) * u64::from(other.denominator)
            > u64::from(other.numerator) * u64::from(self.denominator)
    }

    /// Section scale for a plan drawn at `plan`: 1:50, or twice the plan
    /// scale when 1:50 would not be finer than the plan.
    pub fn section_for(plan: ViewScale) -> ViewScale {
        if ViewScale::SECTION.is_finer_than(plan) {
            return ViewScale::SECTION;
        }
        if plan.denominator % 2 == 0 {
            ViewScale::new(plan.numerator, plan.denominator / 2)
        } else {
            ViewScale::new(plan.numerator.saturating_mul(2), plan.denominator)
        }
    }
}

impl Default for ViewScale {
    fn default() -> Self {
        Self::PLAN
    }
}

impl fmt::Display for ViewScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

impl FromStr for ViewScale {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DraftError::InvalidScale(s.to_string());
        let (n, m) = s.split_once(':').ok_or_else(invalid)?;
        let numerator: u32 = n.trim().parse().map_err(|_| invalid())?;
        let denominator: u32 = m.trim().parse().map_err(|_| invalid())?;
        if numerator == 0 || denominator == 0 {
            return Err(invalid());
        }
        Ok(Self::new(numerator, denominator))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    FloorPlan,
    #[serde(rename = "reflected_ceiling_plan")]
    Rcp,
    Elevation,
    Section,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationDirection {
    North,
    South,
    East,
    West,
}

impl ElevationDirection {
    pub const ALL: [ElevationDirection; 4] = [
        ElevationDirection::North,
        ElevationDirection::South,
        ElevationDirection::East,
        ElevationDirection::West,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ElevationDirection::North => "North",
            ElevationDirection::South => "South",
            ElevationDirection::East => "East",
            ElevationDirection::West => "West",
        }
    }

    /// Single-letter marker label.
    pub fn letter(&self) -> &'static str {
        &self.title()[..1]
    }

    /// North and south elevations look at the building's width.
    pub fn faces_width(&self) -> bool {
        matches!(self, ElevationDirection::North | ElevationDirection::South)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlanView {
    pub id: ViewId,
    pub name: String,
    pub level: LevelId,
    pub cut_height: f64,
    pub scale: ViewScale,
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcpView {
    pub id: ViewId,
    pub name: String,
    pub level: LevelId,
    pub scale: ViewScale,
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationView {
    pub id: ViewId,
    pub name: String,
    pub direction: ElevationDirection,
    pub level: LevelId,
    pub scale: ViewScale,
    pub height: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionView {
    pub id: ViewId,
    pub name: String,
    pub cut_line: Line2D,
    pub level: LevelId,
    pub scale: ViewScale,
    pub height: f64,
    pub width: f64,
}

/// Every view derived for one level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSet {
    pub floor_plan: Option<FloorPlanView>,
    pub rcp: Option<RcpView>,
    pub elevations: Vec<ElevationView>,
    pub sections: Vec<SectionView>,
}

impl ViewSet {
    pub fn is_empty(&self) -> bool {
        self.view_count() == 0
    }

    pub fn view_count(&self) -> usize {
        usize::from(self.floor_plan.is_some())
            + usize::from(self.rcp.is_some())
            + self.elevations.len()
            + self.sections.len()
    }

    /// Kind and name of the view with `id`, if it belongs to this set.
    pub fn describe(&self, id: ViewId) -> Option<(ViewKind, &str)> {
        if let Some(v) = self.floor_plan.as_ref().filter(|v| v.id == id) {
            return Some((ViewKind::FloorPlan, v.name.as_str()));
        }
        if let Some(v) = self.rcp.as_ref().filter(|v| v.id == id) {
            return Some((ViewKind::Rcp, v.name.as_str()));
        }
        if let Some(v) = self.elevations.iter().find(|v| v.id == id) {
            return Some((ViewKind::Elevation, v.name.as_str()));
        }
        self.sections
            .iter()
            .find(|v| v.id == id)
            .map(|v| (ViewKind::Section, v.name.as_str()))
    }
}

/// Horizontal cut through the vertical centre of `bounds`, overrunning
/// both sides. Shared by the section view and its marker.
pub fn section_cut_line(bounds: &BoundingBox) -> Line2D {
    let cy = bounds.center().y;
    Line2D::new(
        Point2D::new(bounds.min.x - SECTION_OVERRUN, cy),
        Point2D::new(bounds.max.x + SECTION_OVERRUN, cy),
    )
}

/// Derive the view set for `level` at `scale`. A level without rooms
/// yields an empty set.
pub fn generate_views(level: &Level, scale: ViewScale) -> ViewSet {
    let Some(bounds) = level.bounds() else {
        log::warn!("{} has no rooms, no views generated", level.name);
        return ViewSet::default();
    };
    let mut ids = IdSequence::new();
    let height = level.floor_to_floor + VIEW_HEADROOM;

    let floor_plan = FloorPlanView {
        id: ids.issue(),
        name: format!("{} - Floor Plan", level.name),
        level: level.id,
        cut_height: PLAN_CUT_HEIGHT,
        scale,
        bounds,
    };
    let rcp = RcpView {
        id: ids.issue(),
        name: format!("{} - RCP", level.name),
        level: level.id,
        scale,
        bounds,
    };
    let elevations: Vec<ElevationView> = ElevationDirection::ALL
        .iter()
        .map(|&direction| ElevationView {
            id: ids.issue(),
            name: format!("{} Elevation", direction.title()),
            direction,
            level: level.id,
            scale,
            height,
            width: if direction.faces_width() {
                bounds.width()
            } else {
                bounds.height()
            },
        })
        .collect();
    let section = SectionView {
        id: ids.issue(),
        name: "Section A-A".to_string(),
        cut_line: section_cut_line(&bounds),
        level: level.id,
        scale: ViewScale::section_for(scale),
        height,
        width: bounds.width() + 2.0 * SECTION_OVERRUN,
    };

    let views = ViewSet {
        floor_plan: Some(floor_plan),
        rcp: Some(rcp),
        elevations,
        sections: vec![section],
    };
    log::info!("Generated {} views for {}", views.view_count(), level.name);
    views
}
