//! Schematic plan generation.
//!
//! Deterministic pipeline from a room program to a placed level:
//!   1. sizing    -- seeded aspect ratio per room, width/depth on a 0.1 grid
//!   2. packing   -- largest-first shelf packing inside the footprint width
//!   3. walls     -- exterior envelope, shared interior walls, enclosing walls
//!   4. openings  -- doors between neighbours, fallback doors, windows
//!
//! QC runs on the assembled project and its findings travel with the result.
//! The generator never fails: an empty program yields an empty level and an
//! error-severity finding.

mod openings;
mod packing;
mod sizing;
mod walls;

use std::collections::BTreeMap;

use crate::constants::Tolerances;
use crate::context::RunContext;
use crate::ids::{IdSequence, LevelId};
use crate::model::{Building, Level, Project, Room, Site, Zone};
use crate::program::{ProgramRequirements, RoomFunction};
use crate::qc::{self, Finding};

pub const LEVEL_NAME: &str = "Level 1";

/// Generated project plus the QC findings raised against it.
#[derive(Debug, Clone)]
pub struct PlanResult {
    pub project: Project,
    pub findings: Vec<Finding>,
}

impl PlanResult {
    pub fn level(&self) -> Option<&Level> {
        self.project.primary_level()
    }
}

/// One id counter per element kind, scoped to a single run.
#[derive(Debug, Default)]
struct ElementIds {
    rooms: IdSequence,
    walls: IdSequence,
    doors: IdSequence,
    windows: IdSequence,
    zones: IdSequence,
}

#[derive(Debug, Clone, Default)]
pub struct SchematicPlanGenerator {
    tolerances: Tolerances,
}

impl SchematicPlanGenerator {
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Generate the plan for `program`. The random generator is built once
    /// from `ctx` and only the sizing phase draws from it.
    pub fn generate(&self, program: &ProgramRequirements, ctx: &RunContext) -> PlanResult {
        let constraints = &program.constraints;
        let mut rng = ctx.rng();
        let mut ids = ElementIds::default();

        let expanded = program.expanded_rooms();
        let rooms = sizing::size_rooms(&expanded, &mut rng, &mut ids.rooms);
        let rooms = packing::pack_rooms(
            rooms,
            constraints.wall_thickness,
            constraints.max_footprint_width,
        );
        let walls = walls::synthesize_walls(&rooms, constraints, &self.tolerances, &mut ids.walls);
        let doors =
            openings::place_doors(&rooms, &walls, constraints, &self.tolerances, &mut ids.doors);
        let windows = openings::place_windows(
            &rooms,
            &walls,
            constraints,
            &self.tolerances,
            &mut ids.windows,
        );
        let zones = zone_rooms(&rooms, &mut ids.zones);

        if rooms.is_empty() {
            log::warn!("Program '{}' has no rooms, level left empty", program.project_name);
        }

        let level = Level {
            id: LevelId(1),
            name: LEVEL_NAME.to_string(),
            elevation: 0.0,
            floor_to_floor: constraints.floor_to_floor_height,
            rooms,
            walls,
            doors,
            windows,
            zones,
        };
        let project = Project {
            name: program.project_name.clone(),
            number: program.project_number.clone(),
            client: program.client.clone(),
            revision: 1,
            site: Site {
                name: "Site".to_string(),
                buildings: vec![Building {
                    name: program.project_name.clone(),
                    address: String::new(),
                    levels: vec![level],
                }],
                boundary: Vec::new(),
            },
        };

        let findings = qc::validate_all(&project, constraints, &self.tolerances);
        if let Some(level) = project.primary_level() {
            log::info!(
                "Generated plan: {} rooms, {} walls, {} doors, {} windows, {} QC findings",
                level.rooms.len(),
                level.walls.len(),
                level.doors.len(),
                level.windows.len(),
                findings.len()
            );
        }
        PlanResult { project, findings }
    }
}

/// Generate with default tolerances.
pub fn generate_plan(program: &ProgramRequirements, ctx: &RunContext) -> PlanResult {
    SchematicPlanGenerator::default().generate(program, ctx)
}

/// One zone per room function, in order of first appearance.
fn zone_rooms(rooms: &[Room], ids: &mut IdSequence) -> Vec<Zone> {
    let mut order: Vec<RoomFunction> = Vec::new();
    let mut members: BTreeMap<&'static str, Vec<_>> = BTreeMap::new();
    for room in rooms {
        if !order.contains(&room.function) {
            order.push(room.function);
        }
        members.entry(room.function.as_str()).or_default().push(room.id);
    }
    order
        .into_iter()
        .map(|function| Zone {
            id: ids.issue(),
            name: function.as_str().to_string(),
            rooms: members.remove(function.as_str()).unwrap_or_default(),
        })
        .collect()
}
