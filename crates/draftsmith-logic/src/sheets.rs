//! Sheet composition: viewports, title blocks and sheet numbering.
//!
//! All sheet coordinates are millimetres on paper with the origin at the
//! bottom-left corner. Sheets are always laid out landscape.
//!
//! | Number  | Contents                                   |
//! |---------|--------------------------------------------|
//! | `A1.01` | floor plan, north arrow, scale bar         |
//! | `A1.02` | reflected ceiling plan                     |
//! | `A2.0n` | elevations, two per sheet stacked          |
//! | `A3.0n` | one section per sheet at its own scale     |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    GENERATOR_NAME, SHEET_MARGIN_MM, TITLE_BLOCK_HEIGHT_MM, TITLE_BLOCK_WIDTH_MM,
};
use crate::context::IssueDate;
use crate::error::{DraftError, Result};
use crate::geometry::{BoundingBox, Point2D};
use crate::ids::{IdSequence, SheetId, ViewId};
use crate::model::Project;
use crate::views::{ViewScale, ViewSet};

/// Viewport inset from the drawable area.
const VIEWPORT_INSET_MM: f64 = 10.0;
const VIEWPORT_MAX_WIDTH_MM: f64 = 600.0;
const PLAN_VIEWPORT_MAX_HEIGHT_MM: f64 = 400.0;
const ELEVATION_VIEWPORT_MAX_HEIGHT_MM: f64 = 200.0;
const SECTION_VIEWPORT_MAX_HEIGHT_MM: f64 = 300.0;
const ELEVATIONS_PER_SHEET: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    #[serde(rename = "ARCH_D")]
    ArchD,
    #[serde(rename = "ARCH_E")]
    ArchE,
    A1,
    A2,
    A3,
}

impl PaperSize {
    pub const ALL: [PaperSize; 5] = [
        PaperSize::ArchD,
        PaperSize::ArchE,
        PaperSize::A1,
        PaperSize::A2,
        PaperSize::A3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSize::ArchD => "ARCH_D",
            PaperSize::ArchE => "ARCH_E",
            PaperSize::A1 => "A1",
            PaperSize::A2 => "A2",
            PaperSize::A3 => "A3",
        }
    }

    /// Short and long side in millimetres.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PaperSize::ArchD => (610.0, 914.0),
            PaperSize::ArchE => (914.0, 1219.0),
            PaperSize::A1 => (594.0, 841.0),
            PaperSize::A2 => (420.0, 594.0),
            PaperSize::A3 => (297.0, 420.0),
        }
    }

    /// Width and height with the long side horizontal.
    pub fn landscape_mm(&self) -> (f64, f64) {
        let (a, b) = self.dimensions_mm();
        if a > b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaperSize {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self> {
        PaperSize::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DraftError::UnknownPaperSize(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleBlock {
    pub project_name: String,
    pub project_number: String,
    pub sheet_name: String,
    pub sheet_number: String,
    pub drawn_by: String,
    pub checked_by: String,
    pub date: IssueDate,
    pub revision: String,
    pub scale: String,
    pub position: Point2D,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub view: ViewId,
    pub view_name: String,
    /// Bottom-left corner on the sheet.
    pub position: Point2D,
    pub width: f64,
    pub height: f64,
    pub scale: ViewScale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub id: SheetId,
    pub number: String,
    pub name: String,
    pub paper_size: PaperSize,
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin: f64,
    pub viewports: Vec<Viewport>,
    pub title_block: TitleBlock,
}

impl Sheet {
    /// Paper inside the margins.
    pub fn drawable_bounds(&self) -> BoundingBox {
        BoundingBox::new(
            Point2D::new(self.margin, self.margin),
            Point2D::new(self.width_mm - self.margin, self.height_mm - self.margin),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NorthArrow {
    pub position: Point2D,
    /// Degrees from true north.
    pub rotation: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleBar {
    pub position: Point2D,
    pub scale_text: String,
    pub length: f64,
    pub divisions: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetSet {
    pub name: String,
    pub sheets: Vec<Sheet>,
}

impl SheetSet {
    pub fn get_sheet(&self, number: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.number == number)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// A sheet set plus the per-sheet graphics that are not viewports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComposedSheetSet {
    pub sheet_set: SheetSet,
    pub north_arrows: BTreeMap<SheetId, NorthArrow>,
    pub scale_bars: BTreeMap<SheetId, ScaleBar>,
}

/// Paper layout shared by every sheet of one composition.
struct Layout {
    paper: PaperSize,
    width: f64,
    height: f64,
    drawable_w: f64,
    drawable_h: f64,
}

impl Layout {
    fn new(paper: PaperSize) -> Self {
        let (width, height) = paper.landscape_mm();
        Self {
            paper,
            width,
            height,
            drawable_w: width - 2.0 * SHEET_MARGIN_MM,
            drawable_h: height - 2.0 * SHEET_MARGIN_MM - TITLE_BLOCK_HEIGHT_MM,
        }
    }

    /// Lower-left corner of the first viewport, just above the title block.
    fn viewport_origin(&self) -> Point2D {
        Point2D::new(
            SHEET_MARGIN_MM + VIEWPORT_INSET_MM,
            SHEET_MARGIN_MM + TITLE_BLOCK_HEIGHT_MM + VIEWPORT_INSET_MM,
        )
    }

    fn viewport_width(&self) -> f64 {
        (self.drawable_w - 2.0 * VIEWPORT_INSET_MM).min(VIEWPORT_MAX_WIDTH_MM)
    }

    fn viewport_height(&self, cap: f64) -> f64 {
        (self.drawable_h - 2.0 * VIEWPORT_INSET_MM).min(cap)
    }
}

/// Lays views out on sheets for one project.
pub struct SheetComposer<'a> {
    project: &'a Project,
    layout: Layout,
    scale: ViewScale,
    date: IssueDate,
    ids: IdSequence,
}

impl<'a> SheetComposer<'a> {
    pub fn new(project: &'a Project, paper: PaperSize, scale: ViewScale, date: IssueDate) -> Self {
        Self {
            project,
            layout: Layout::new(paper),
            scale,
            date,
            ids: IdSequence::new(),
        }
    }

    fn sheet(&mut self, number: String, name: String, scale: ViewScale) -> Sheet {
        let layout = &self.layout;
        let title_block = TitleBlock {
            project_name: self.project.name.clone(),
            project_number: self.project.number.clone(),
            sheet_name: name.clone(),
            sheet_number: number.clone(),
            drawn_by: GENERATOR_NAME.to_string(),
            checked_by: String::new(),
            date: self.date,
            revision: self.project.revision.to_string(),
            scale: scale.to_string(),
            position: Point2D::new(
                layout.width - SHEET_MARGIN_MM - TITLE_BLOCK_WIDTH_MM,
                SHEET_MARGIN_MM,
            ),
            width: TITLE_BLOCK_WIDTH_MM,
            height: TITLE_BLOCK_HEIGHT_MM,
        };
        Sheet {
            id: self.ids.issue(),
            number,
            name,
            paper_size: layout.paper,
            width_mm: layout.width,
            height_mm: layout.height,
            margin: SHEET_MARGIN_MM,
            viewports: Vec::new(),
            title_block,
        }
    }

    /// Compose every sheet for `views`. An empty view set yields an empty
    /// sheet set.
    pub fn compose(mut self, views: &ViewSet) -> ComposedSheetSet {
        let mut composed = ComposedSheetSet {
            sheet_set: SheetSet {
                name: format!("{} - CD Set", self.project.name),
                sheets: Vec::new(),
            },
            ..Default::default()
        };
        let origin = self.layout.viewport_origin();
        let vp_width = self.layout.viewport_width();

        if let Some(plan) = &views.floor_plan {
            let mut sheet = self.sheet("A1.01".into(), "Floor Plan".into(), self.scale);
            sheet.viewports.push(Viewport {
                view: plan.id,
                view_name: plan.name.clone(),
                position: origin,
                width: vp_width,
                height: self.layout.viewport_height(PLAN_VIEWPORT_MAX_HEIGHT_MM),
                scale: self.scale,
            });
            composed.north_arrows.insert(
                sheet.id,
                NorthArrow {
                    position: Point2D::new(
                        self.layout.width - SHEET_MARGIN_MM - 30.0,
                        self.layout.height - SHEET_MARGIN_MM - 30.0,
                    ),
                    rotation: 0.0,
                    size: 15.0,
                },
            );
            composed.scale_bars.insert(
                sheet.id,
                ScaleBar {
                    position: Point2D::new(
                        SHEET_MARGIN_MM + 20.0,
                        SHEET_MARGIN_MM + TITLE_BLOCK_HEIGHT_MM + 5.0,
                    ),
                    scale_text: self.scale.to_string(),
                    length: 5.0,
                    divisions: 5,
                },
            );
            composed.sheet_set.sheets.push(sheet);
        }

        if let Some(rcp) = &views.rcp {
            let mut sheet = self.sheet(
                "A1.02".into(),
                "Reflected Ceiling Plan".into(),
                self.scale,
            );
            sheet.viewports.push(Viewport {
                view: rcp.id,
                view_name: rcp.name.clone(),
                position: origin,
                width: vp_width,
                height: self.layout.viewport_height(PLAN_VIEWPORT_MAX_HEIGHT_MM),
                scale: self.scale,
            });
            composed.sheet_set.sheets.push(sheet);
        }

        let half = self.layout.drawable_h / 2.0;
        for (n, batch) in views.elevations.chunks(ELEVATIONS_PER_SHEET).enumerate() {
            let names: Vec<&str> = batch.iter().map(|e| e.name.as_str()).collect();
            let mut sheet = self.sheet(
                format!("A2.{:02}", n + 1),
                format!("Elevations - {}", names.join(" / ")),
                self.scale,
            );
            for (j, elevation) in batch.iter().enumerate() {
                sheet.viewports.push(Viewport {
                    view: elevation.id,
                    view_name: elevation.name.clone(),
                    position: Point2D::new(origin.x, origin.y + j as f64 * half),
                    width: vp_width,
                    height: (half - 2.0 * VIEWPORT_INSET_MM).min(ELEVATION_VIEWPORT_MAX_HEIGHT_MM),
                    scale: self.scale,
                });
            }
            composed.sheet_set.sheets.push(sheet);
        }

        for (n, section) in views.sections.iter().enumerate() {
            let mut sheet = self.sheet(
                format!("A3.{:02}", n + 1),
                format!("Section {}", section.name),
                section.scale,
            );
            sheet.viewports.push(Viewport {
                view: section.id,
                view_name: section.name.clone(),
                position: origin,
                width: vp_width,
                height: self.layout.viewport_height(SECTION_VIEWPORT_MAX_HEIGHT_MM),
                scale: section.scale,
            });
            composed.sheet_set.sheets.push(sheet);
        }

        log::info!(
            "Composed {} sheets on {}",
            composed.sheet_set.len(),
            self.layout.paper
        );
        composed
    }
}

/// Compose `views` for `project` on `paper` at `scale`.
pub fn compose_sheets(
    project: &Project,
    views: &ViewSet,
    paper: PaperSize,
    scale: ViewScale,
    date: IssueDate,
) -> ComposedSheetSet {
    SheetComposer::new(project, paper, scale, date).compose(views)
}
