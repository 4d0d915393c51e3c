//! Draftsmith Headless Pipeline Harness
//!
//! Runs the layout pipeline on the demo program (or a program file) and
//! checks the invariants of its output. Runs entirely in-process, with no
//! export backend and no rendering.
//!
//! Usage:
//!   cargo run -p draftsmith-simtest
//!   cargo run -p draftsmith-simtest -- --verbose
//!   cargo run -p draftsmith-simtest -- --program house.json --seed 7 --out build/

use std::path::{Path, PathBuf};

use draftsmith_logic::config::GenerationConfig;
use draftsmith_logic::interpreter::ProgramInput;
use draftsmith_logic::pipeline::{self, PipelineOutput, Summary};
use draftsmith_logic::qc::Category;
use serde::Serialize;

// ── Arguments ───────────────────────────────────────────────────────────

struct Args {
    verbose: bool,
    seed: u64,
    program: Option<PathBuf>,
    out: Option<PathBuf>,
    seeds: u64,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        verbose: false,
        seed: 42,
        program: None,
        out: None,
        seeds: 10,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--verbose" | "-v" => args.verbose = true,
            "--seed" => args.seed = parse_number(it.next(), "--seed")?,
            "--seeds" => args.seeds = parse_number(it.next(), "--seeds")?,
            "--program" => args.program = Some(it.next().ok_or("--program needs a path")?.into()),
            "--out" => args.out = Some(it.next().ok_or("--out needs a directory")?.into()),
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(args)
}

fn parse_number(value: Option<String>, flag: &str) -> Result<u64, String> {
    value
        .ok_or_else(|| format!("{flag} needs a value"))?
        .parse()
        .map_err(|e| format!("{flag}: {e}"))
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct Report<'a> {
    project: &'a str,
    seed: u64,
    summary: Summary,
    passed: usize,
    failed: usize,
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    println!("=== Draftsmith Pipeline Harness ===\n");

    let input = match &args.program {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(raw) => ProgramInput::detect(&raw),
            Err(e) => {
                eprintln!("error: cannot read {}: {e}", path.display());
                std::process::exit(2);
            }
        },
        None => ProgramInput::Structured(pipeline::demo_program()),
    };
    let config = GenerationConfig {
        seed: args.seed,
        formats: vec!["dxf".into(), "ifc".into(), "pdf".into(), "png".into()],
        ..Default::default()
    };

    let output = match pipeline::run(&input, &config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: pipeline failed: {e}");
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Layout invariants
    results.extend(validate_layout(&output, args.verbose));

    // 2. Drawing set
    results.extend(validate_drawing_set(&output, args.verbose));

    // 3. Reproducibility across seeds
    results.extend(validate_determinism(&input, &config, args.seeds, args.verbose));

    if let Some(dir) = &args.out {
        results.push(write_manifest(&output, dir));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }
    for finding in &output.findings {
        println!("  {finding}");
    }

    let report = Report {
        project: &output.project.name,
        seed: args.seed,
        summary: output.summary(),
        passed,
        failed,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("\n{json}"),
        Err(e) => eprintln!("error: cannot serialize report: {e}"),
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Layout ───────────────────────────────────────────────────────────

fn validate_layout(output: &PipelineOutput, verbose: bool) -> Vec<TestResult> {
    println!("--- Layout ---");
    let mut results = Vec::new();

    let Some(level) = output.project.primary_level() else {
        results.push(TestResult {
            name: "level_present".into(),
            passed: false,
            detail: "no level generated".into(),
        });
        return results;
    };

    let mut overlaps = 0;
    for (i, a) in level.rooms.iter().enumerate() {
        for b in &level.rooms[i + 1..] {
            if a.bounds().intersects(&b.bounds()) {
                overlaps += 1;
            }
        }
    }
    results.push(TestResult {
        name: "no_room_overlap".into(),
        passed: overlaps == 0,
        detail: format!("{} rooms, {} overlapping pairs", level.rooms.len(), overlaps),
    });

    let exterior = level.exterior_walls().count();
    results.push(TestResult {
        name: "envelope_closed".into(),
        passed: exterior == 4,
        detail: format!("{} exterior walls", exterior),
    });

    let doorless: Vec<&str> = level
        .rooms
        .iter()
        .filter(|r| !level.doors.iter().any(|d| d.connects(r.id)))
        .map(|r| r.name.as_str())
        .collect();
    results.push(TestResult {
        name: "every_room_has_door".into(),
        passed: doorless.is_empty(),
        detail: if doorless.is_empty() {
            format!("{} doors", level.doors.len())
        } else {
            format!("without door: {}", doorless.join(", "))
        },
    });

    let unlit: Vec<&str> = level
        .rooms
        .iter()
        .filter(|r| r.is_habitable() && !level.windows.iter().any(|w| w.room == r.id))
        .filter(|r| {
            !output
                .findings
                .iter()
                .any(|f| f.category == Category::Daylight && f.message.contains(&r.name))
        })
        .map(|r| r.name.as_str())
        .collect();
    results.push(TestResult {
        name: "habitable_rooms_lit_or_flagged".into(),
        passed: unlit.is_empty(),
        detail: format!("{} windows", level.windows.len()),
    });

    if verbose {
        for room in &level.rooms {
            println!(
                "  {:<14} {:>5.1} x {:<5.1} at ({:.2}, {:.2})  {:.1} m²",
                room.name,
                room.width,
                room.depth,
                room.origin.x,
                room.origin.y,
                room.actual_area()
            );
        }
    }
    results
}

// ── 2. Drawing set ──────────────────────────────────────────────────────

fn validate_drawing_set(output: &PipelineOutput, verbose: bool) -> Vec<TestResult> {
    println!("--- Drawing set ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "four_elevations".into(),
        passed: output.views.elevations.len() == 4,
        detail: format!("{} views", output.views.view_count()),
    });

    let sheets = &output.composed.sheet_set;
    results.push(TestResult {
        name: "sheet_count".into(),
        passed: sheets.len() >= 3,
        detail: format!("{} sheets", sheets.len()),
    });

    let empty: Vec<&str> = sheets
        .sheets
        .iter()
        .filter(|s| s.viewports.is_empty())
        .map(|s| s.number.as_str())
        .collect();
    results.push(TestResult {
        name: "sheets_have_viewports".into(),
        passed: empty.is_empty(),
        detail: if empty.is_empty() {
            "every sheet has a viewport".into()
        } else {
            format!("empty sheets: {}", empty.join(", "))
        },
    });

    let dangling = sheets
        .sheets
        .iter()
        .flat_map(|s| &s.viewports)
        .filter(|vp| output.views.describe(vp.view).is_none())
        .count();
    results.push(TestResult {
        name: "viewports_reference_views".into(),
        passed: dangling == 0,
        detail: format!("{} dangling viewports", dangling),
    });

    results.push(TestResult {
        name: "room_tags_match_rooms".into(),
        passed: output.annotations.room_tags.len() == output.summary().rooms,
        detail: format!("{} tags", output.annotations.room_tags.len()),
    });

    results.push(TestResult {
        name: "manifest_not_empty".into(),
        passed: !output.manifest.files.is_empty(),
        detail: format!("{} files", output.manifest.files.len()),
    });

    if verbose {
        for sheet in &sheets.sheets {
            println!("  {} {}", sheet.number, sheet.name);
        }
    }
    results
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(
    input: &ProgramInput,
    config: &GenerationConfig,
    seeds: u64,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut mismatched = Vec::new();
    let mut failed_runs = 0;

    for seed in 0..seeds {
        let config = GenerationConfig {
            seed,
            ..config.clone()
        };
        match (pipeline::run(input, &config), pipeline::run(input, &config)) {
            (Ok(a), Ok(b)) => {
                if a.project != b.project || a.summary() != b.summary() {
                    mismatched.push(seed);
                } else if verbose {
                    let s = a.summary();
                    println!(
                        "  seed {:>3}: {} walls, {} doors, {} windows",
                        seed, s.walls, s.doors, s.windows
                    );
                }
            }
            _ => failed_runs += 1,
        }
    }

    vec![
        TestResult {
            name: "same_seed_same_output".into(),
            passed: mismatched.is_empty(),
            detail: format!("{} seeds, mismatched: {:?}", seeds, mismatched),
        },
        TestResult {
            name: "all_seeds_run".into(),
            passed: failed_runs == 0,
            detail: format!("{} failed runs", failed_runs),
        },
    ]
}

// ── Output ──────────────────────────────────────────────────────────────

fn write_manifest(output: &PipelineOutput, dir: &Path) -> TestResult {
    let path = dir.join("manifest.json");
    let written = output
        .manifest
        .to_json()
        .map_err(|e| e.to_string())
        .and_then(|json| {
            std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
            std::fs::write(&path, json).map_err(|e| e.to_string())
        });
    TestResult {
        name: "manifest_written".into(),
        passed: written.is_ok(),
        detail: match written {
            Ok(()) => path.display().to_string(),
            Err(e) => e,
        },
    }
}
