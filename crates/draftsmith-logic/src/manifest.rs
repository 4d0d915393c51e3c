//! Export manifest: the files an exporter has to produce for a sheet set.
//!
//! Nothing is written here. The manifest names every file and the format
//! it must be written in; the export collaborator does the writing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::GENERATOR_NAME;
use crate::context::IssueDate;
use crate::error::{DraftError, Result};
use crate::model::Project;
use crate::sheets::SheetSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Dxf,
    Ifc,
    Pdf,
    Png,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Dxf,
        ExportFormat::Ifc,
        ExportFormat::Pdf,
        ExportFormat::Png,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Dxf => "dxf",
            ExportFormat::Ifc => "ifc",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
        }
    }

    /// Drawing formats produce one file per sheet; IFC is one model file.
    pub fn is_per_sheet(&self) -> bool {
        !matches!(self, ExportFormat::Ifc)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DraftError::UnknownFormat(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportFile {
    pub filename: String,
    pub format: ExportFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_number: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportManifest {
    pub project_name: String,
    pub project_number: String,
    pub revision: u32,
    pub generated_on: IssueDate,
    pub generator: String,
    pub total_sheets: usize,
    pub formats: Vec<ExportFormat>,
    pub files: Vec<ExportFile>,
}

impl ExportManifest {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn files_for(&self, format: ExportFormat) -> impl Iterator<Item = &ExportFile> {
        self.files.iter().filter(move |f| f.format == format)
    }
}

/// Replace path separators, reserved characters and spaces with `_`.
pub fn safe_filename(name: &str) -> String {
    name.replace(
        |c: char| matches!(c, '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*' | ' '),
        "_",
    )
}

/// List every file to export for `sheets` in `formats`. Per-sheet formats
/// come first, in format order then sheet order.
pub fn plan_exports(
    project: &Project,
    sheets: &SheetSet,
    formats: &[ExportFormat],
    date: IssueDate,
) -> ExportManifest {
    let mut files = Vec::new();
    for format in formats.iter().filter(|f| f.is_per_sheet()) {
        for sheet in &sheets.sheets {
            files.push(ExportFile {
                filename: format!(
                    "{}_{}.{}",
                    sheet.number,
                    safe_filename(&sheet.name),
                    format.extension()
                ),
                format: *format,
                sheet_number: Some(sheet.number.clone()),
                description: format!("{} - {}", sheet.number, sheet.name),
            });
        }
    }
    if formats.contains(&ExportFormat::Ifc) {
        files.push(ExportFile {
            filename: format!("{}.ifc", safe_filename(&project.name)),
            format: ExportFormat::Ifc,
            sheet_number: None,
            description: "Building model".to_string(),
        });
    }

    log::info!(
        "Export manifest: {} files for {} sheets",
        files.len(),
        sheets.len()
    );
    ExportManifest {
        project_name: project.name.clone(),
        project_number: project.number.clone(),
        revision: project.revision,
        generated_on: date,
        generator: GENERATOR_NAME.to_string(),
        total_sheets: sheets.len(),
        formats: formats.to_vec(),
        files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{LevelId, RoomId};
    use crate::geometry::Point2D;
    use crate::model::{Building, Level, Room, Site};
    use crate::program::{Finishes, RoomFunction};
    use crate::sheets::{compose_sheets, PaperSize};
    use crate::views::{generate_views, ViewScale};

    fn issue_date() -> IssueDate {
        IssueDate::from_ymd(2024, 1, 2).unwrap()
    }

    fn project(name: &str) -> Project {
        let mut level = Level::empty(LevelId(1), "Level 1", 3.0);
        level.rooms.push(Room {
            id: RoomId(1),
            name: "Studio".to_string(),
            function: RoomFunction::Living,
            target_area: 30.0,
            min_area: 0.0,
            max_area: 0.0,
            origin: Point2D::new(0.2, 0.2),
            width: 6.0,
            depth: 5.0,
            finishes: Finishes::default(),
            ceiling_height: 3.0,
        });
        Project {
            name: name.to_string(),
            number: "P-7".to_string(),
            client: String::new(),
            revision: 1,
            site: Site {
                name: "Site".to_string(),
                buildings: vec![Building {
                    name: name.to_string(),
                    address: String::new(),
                    levels: vec![level],
                }],
                boundary: Vec::new(),
            },
        }
    }

    fn sheets(project: &Project) -> SheetSet {
        let views = generate_views(project.primary_level().unwrap(), ViewScale::PLAN);
        compose_sheets(project, &views, PaperSize::ArchD, ViewScale::PLAN, issue_date()).sheet_set
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!(matches!(
            "svg".parse::<ExportFormat>(),
            Err(DraftError::UnknownFormat(_))
        ));
        assert!(!ExportFormat::Ifc.is_per_sheet());
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("Floor Plan"), "Floor_Plan");
        assert_eq!(
            safe_filename("Elevations - North / South"),
            "Elevations_-_North___South"
        );
        assert_eq!(safe_filename("a:b*c?"), "a_b_c_");
    }

    #[test]
    fn test_files_per_sheet_and_model() {
        let p = project("Lake House");
        let set = sheets(&p);
        let manifest = plan_exports(
            &p,
            &set,
            &[ExportFormat::Dxf, ExportFormat::Ifc, ExportFormat::Pdf],
            issue_date(),
        );
        assert_eq!(manifest.total_sheets, 5);
        assert_eq!(manifest.files.len(), 11);
        assert_eq!(manifest.files[0].filename, "A1.01_Floor_Plan.dxf");
        assert_eq!(manifest.files_for(ExportFormat::Pdf).count(), 5);
        let ifc: Vec<_> = manifest.files_for(ExportFormat::Ifc).collect();
        assert_eq!(ifc.len(), 1);
        assert_eq!(ifc[0].filename, "Lake_House.ifc");
        assert!(ifc[0].sheet_number.is_none());
    }

    #[test]
    fn test_manifest_json() {
        let p = project("Demo");
        let manifest = plan_exports(&p, &sheets(&p), &[ExportFormat::Png], issue_date());
        let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
        assert_eq!(json["project_name"], "Demo");
        assert_eq!(json["generator"], GENERATOR_NAME);
        assert_eq!(json["formats"][0], "png");
        assert_eq!(json["files"][0]["sheet_number"], "A1.01");
        assert_eq!(json["generated_on"], "2024-01-02");
    }

    #[test]
    fn test_no_formats_no_files() {
        let p = project("Empty");
        let manifest = plan_exports(&p, &sheets(&p), &[], issue_date());
        assert!(manifest.files.is_empty());
        assert_eq!(manifest.total_sheets, 5);
    }
}
