//! End-to-end pipeline: program in, drawing set plan out.
//!
//! interpret → generate plan → {views, annotations} → sheets → schedules
//! and export manifest. Every stage takes immutable input and returns a new
//! value; nothing is shared between runs.

use serde::Serialize;
use serde_json::{json, Value};

use crate::annotations::{self, AnnotationResult};
use crate::config::{GenerationConfig, ResolvedConfig};
use crate::context::RunContext;
use crate::error::{DraftError, Result};
use crate::generator::SchematicPlanGenerator;
use crate::interpreter::{self, ProgramInput};
use crate::layers::{self, CadLayer};
use crate::manifest::{self, ExportManifest};
use crate::model::Project;
use crate::qc::{self, Finding};
use crate::schedules::{self, Schedules};
use crate::sheets::{self, ComposedSheetSet};
use crate::views::{self, ViewSet};

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub project: Project,
    pub findings: Vec<Finding>,
    pub views: ViewSet,
    pub annotations: AnnotationResult,
    /// Layers the export must declare, in first-use order.
    pub layers: Vec<CadLayer>,
    pub composed: ComposedSheetSet,
    /// `None` when schedules were switched off.
    pub schedules: Option<Schedules>,
    pub manifest: ExportManifest,
}

/// Counts for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub rooms: usize,
    pub walls: usize,
    pub doors: usize,
    pub windows: usize,
    pub sheets: usize,
    pub files: usize,
    pub qc_issues: usize,
}

impl PipelineOutput {
    pub fn summary(&self) -> Summary {
        let level = self.project.primary_level();
        Summary {
            rooms: level.map_or(0, |l| l.rooms.len()),
            walls: level.map_or(0, |l| l.walls.len()),
            doors: level.map_or(0, |l| l.doors.len()),
            windows: level.map_or(0, |l| l.windows.len()),
            sheets: self.composed.sheet_set.len(),
            files: self.manifest.files.len(),
            qc_issues: self.findings.len(),
        }
    }
}

/// Run the pipeline with a date taken from today.
pub fn run(input: &ProgramInput, config: &GenerationConfig) -> Result<PipelineOutput> {
    let resolved = config.resolve()?;
    let ctx = resolved.run_context();
    run_resolved(input, &resolved, &ctx)
}

/// Run the pipeline with an explicit context. The context's seed wins over
/// the config's.
pub fn run_resolved(
    input: &ProgramInput,
    config: &ResolvedConfig,
    ctx: &RunContext,
) -> Result<PipelineOutput> {
    let program = interpreter::interpret(input)?;
    if program.room_count() == 0 {
        return Err(DraftError::EmptyProgram);
    }
    program.validate()?;

    let plan = SchematicPlanGenerator::new(config.tolerances.clone()).generate(&program, ctx);
    let project = plan.project;
    let findings = qc::filter_findings(plan.findings, config.include_qc);

    let (views, annotations, layers, schedules) = match project.primary_level() {
        Some(level) => (
            views::generate_views(level, config.scale),
            annotations::annotate(level),
            layers::drawing_layers(level),
            config
                .include_schedules
                .then(|| schedules::build_schedules(level)),
        ),
        None => (
            ViewSet::default(),
            AnnotationResult::default(),
            vec![layers::get_layer(layers::TITLE_BLOCK)],
            None,
        ),
    };
    let composed = sheets::compose_sheets(
        &project,
        &views,
        config.paper,
        config.scale,
        ctx.issue_date,
    );
    let manifest = manifest::plan_exports(
        &project,
        &composed.sheet_set,
        &config.formats,
        ctx.issue_date,
    );

    log::info!(
        "Pipeline complete for '{}': {} sheets, {} files, {} QC findings",
        project.name,
        composed.sheet_set.len(),
        manifest.files.len(),
        findings.len()
    );
    Ok(PipelineOutput {
        project,
        findings,
        views,
        annotations,
        layers,
        composed,
        schedules,
        manifest,
    })
}

/// The demo residence program.
pub fn demo_program() -> Value {
    json!({
        "project_name": "Demo Residence",
        "project_number": "DEMO-001",
        "client": "Demo Client",
        "rooms": [
            {"name": "Living Room", "function": "living", "area": 25},
            {"name": "Kitchen", "function": "kitchen", "area": 15},
            {"name": "Bedroom 1", "function": "bedroom", "area": 16},
            {"name": "Bedroom 2", "function": "bedroom", "area": 12},
            {"name": "Bathroom", "function": "bathroom", "area": 6},
            {"name": "Entry", "function": "lobby", "area": 4}
        ],
        "constraints": {
            "max_footprint_width": 20.0,
            "max_footprint_depth": 15.0
        },
        "notes": "Single-storey demo residence"
    })
}

/// Run the demo program with `seed` and default settings otherwise.
pub fn run_demo(seed: u64) -> Result<PipelineOutput> {
    let config = GenerationConfig {
        seed,
        ..Default::default()
    };
    run(&ProgramInput::Structured(demo_program()), &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IssueDate;
    use crate::qc::Severity;

    #[test]
    fn test_demo_pipeline() {
        let out = run_demo(42).unwrap();
        let summary = out.summary();
        assert_eq!(summary.rooms, 6);
        assert!(summary.sheets >= 3);
        assert!(summary.files > 0);
        assert_eq!(out.manifest.project_name, "Demo Residence");
        assert_eq!(out.manifest.project_number, "DEMO-001");
        assert!(out.schedules.is_some());
    }

    #[test]
    fn test_demo_is_reproducible() {
        let a = run_demo(42).unwrap().summary();
        let b = run_demo(42).unwrap().summary();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_structured_program_fails() {
        let input = ProgramInput::Structured(json!({"project_name": "Nothing", "rooms": []}));
        let err = run(&input, &GenerationConfig::default()).unwrap_err();
        assert!(matches!(err, DraftError::EmptyProgram));
    }

    #[test]
    fn test_text_fallback_still_runs() {
        let out = run(
            &ProgramInput::Text("just some notes".to_string()),
            &GenerationConfig::default(),
        )
        .unwrap();
        assert_eq!(out.summary().rooms, 1);
    }

    #[test]
    fn test_demo_declares_wall_and_opening_layers() {
        let out = run_demo(42).unwrap();
        let names: Vec<&str> = out.layers.iter().map(|l| l.name).collect();
        assert_eq!(names[0], layers::WALL_EXTERIOR);
        for expected in [layers::WALL, layers::DOOR, layers::WINDOW, layers::TITLE_BLOCK] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_negative_wall_thickness_is_rejected() {
        let input = ProgramInput::Structured(json!({
            "rooms": [{"name": "A", "area": 12}, {"name": "B", "area": 10}],
            "constraints": {"default_wall_thickness": -3.0}
        }));
        let err = run(&input, &GenerationConfig::default()).unwrap_err();
        assert!(matches!(err, DraftError::InvalidConstraints(_)));
    }

    #[test]
    fn test_bad_config_fails_before_generation() {
        let config = GenerationConfig {
            scale: "big".into(),
            ..Default::default()
        };
        let err = run(&ProgramInput::Structured(demo_program()), &config).unwrap_err();
        assert!(matches!(err, DraftError::InvalidConfig(_)));
    }

    #[test]
    fn test_switches_drop_schedules_and_advisories() {
        let config = GenerationConfig {
            include_schedules: false,
            include_qc: false,
            formats: Vec::new(),
            ..Default::default()
        };
        let resolved = config.resolve().unwrap();
        let ctx = RunContext::with_seed(42).dated(IssueDate::from_ymd(2025, 6, 1).unwrap());
        let out = run_resolved(&ProgramInput::Structured(demo_program()), &resolved, &ctx)
            .unwrap();
        assert!(out.schedules.is_none());
        assert!(out.manifest.files.is_empty());
        assert!(out.findings.iter().all(|f| f.severity == Severity::Error));
        assert_eq!(
            out.composed.sheet_set.sheets[0].title_block.date.to_string(),
            "2025-06-01"
        );
    }
}
