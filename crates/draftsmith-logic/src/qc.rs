//! Quality-control checks for generated plans.
//!
//! Pure functions over the building model that return findings. Findings
//! are advisory data and never abort a run; callers decide whether to
//! accept, warn, or regenerate.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::constants::Tolerances;
use crate::ids::{DoorId, LevelId, RoomId};
use crate::model::{Level, Project};
use crate::program::DesignConstraints;

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// No building, level or rooms were produced.
    Structure,
    Area,
    Daylight,
    DoorClearance,
    /// A room without any door.
    Circulation,
    Connectivity,
    RoomOverlap,
    Footprint,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Structure => "structure",
            Category::Area => "area",
            Category::Daylight => "daylight",
            Category::DoorClearance => "door_clearance",
            Category::Circulation => "circulation",
            Category::Connectivity => "connectivity",
            Category::RoomOverlap => "room_overlap",
            Category::Footprint => "footprint",
        }
    }
}

/// The element a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ElementRef {
    Room(RoomId),
    Door(DoorId),
    Level(LevelId),
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Room(id) => id.fmt(f),
            ElementRef::Door(id) => id.fmt(f),
            ElementRef::Level(id) => id.fmt(f),
        }
    }
}

/// A single QC finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    pub element: Option<ElementRef>,
}

impl Finding {
    fn new(
        severity: Severity,
        category: Category,
        element: Option<ElementRef>,
        message: String,
    ) -> Self {
        Self {
            severity,
            category,
            message,
            element,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] {}",
            self.severity.as_str().to_uppercase(),
            self.category.as_str(),
            self.message
        )
    }
}

// ── A. Structure ────────────────────────────────────────────────────────

/// The project must hold a building with a populated first level.
pub fn check_structure(project: &Project) -> Vec<Finding> {
    let Some(level) = project.primary_level() else {
        return vec![Finding::new(
            Severity::Error,
            Category::Structure,
            None,
            "No building or level generated".to_string(),
        )];
    };
    if level.rooms.is_empty() {
        return vec![Finding::new(
            Severity::Error,
            Category::Structure,
            Some(ElementRef::Level(level.id)),
            format!("{} has no rooms", level.name),
        )];
    }
    Vec::new()
}

// ── B. Per-room checks ──────────────────────────────────────────────────

/// Actual area must stay within `[min_area, max_area]`. Zero bounds are
/// not enforced.
pub fn check_room_areas(level: &Level) -> Vec<Finding> {
    let mut findings = Vec::new();
    for room in &level.rooms {
        let actual = room.actual_area();
        if room.min_area > 0.0 && actual < room.min_area {
            findings.push(Finding::new(
                Severity::Warning,
                Category::Area,
                Some(ElementRef::Room(room.id)),
                format!(
                    "{} area {:.1}m² below minimum {:.1}m²",
                    room.name, actual, room.min_area
                ),
            ));
        }
        if room.max_area > 0.0 && actual > room.max_area {
            findings.push(Finding::new(
                Severity::Warning,
                Category::Area,
                Some(ElementRef::Room(room.id)),
                format!(
                    "{} area {:.1}m² exceeds maximum {:.1}m²",
                    room.name, actual, room.max_area
                ),
            ));
        }
    }
    findings
}

/// Every habitable room needs at least one window.
pub fn check_daylight(level: &Level) -> Vec<Finding> {
    let lit: HashSet<RoomId> = level.windows.iter().map(|w| w.room).collect();
    level
        .rooms
        .iter()
        .filter(|r| r.is_habitable() && !lit.contains(&r.id))
        .map(|r| {
            Finding::new(
                Severity::Warning,
                Category::Daylight,
                Some(ElementRef::Room(r.id)),
                format!("Habitable room '{}' has no window", r.name),
            )
        })
        .collect()
}

/// Every room needs at least one door.
pub fn check_rooms_have_doors(level: &Level) -> Vec<Finding> {
    level
        .rooms
        .iter()
        .filter(|r| !level.doors.iter().any(|d| d.connects(r.id)))
        .map(|r| {
            Finding::new(
                Severity::Warning,
                Category::Circulation,
                Some(ElementRef::Room(r.id)),
                format!("Room '{}' has no door", r.name),
            )
        })
        .collect()
}

// ── C. Pairwise checks ──────────────────────────────────────────────────

/// Door centres must be at least `door_clearance` apart.
pub fn check_door_clearance(level: &Level, tolerances: &Tolerances) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (i, a) in level.doors.iter().enumerate() {
        for b in &level.doors[i + 1..] {
            let dist = a.position.distance_to(b.position);
            if dist < tolerances.door_clearance {
                findings.push(Finding::new(
                    Severity::Warning,
                    Category::DoorClearance,
                    Some(ElementRef::Door(a.id)),
                    format!("Doors {} and {} too close ({:.2}m)", a.id, b.id, dist),
                ));
            }
        }
    }
    findings
}

/// No two rooms may overlap. Touching edges are allowed.
pub fn check_room_overlaps(level: &Level, tolerances: &Tolerances) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (i, a) in level.rooms.iter().enumerate() {
        for b in &level.rooms[i + 1..] {
            if a.bounds().overlaps(&b.bounds(), tolerances.overlap_touch) {
                findings.push(Finding::new(
                    Severity::Error,
                    Category::RoomOverlap,
                    Some(ElementRef::Room(a.id)),
                    format!("Rooms '{}' and '{}' overlap", a.name, b.name),
                ));
            }
        }
    }
    findings
}

// ── D. Building-level checks ────────────────────────────────────────────

/// The envelope should fit the footprint limits. The packer only wraps on
/// width, so depth overruns are expected for large programs.
pub fn check_footprint(level: &Level, constraints: &DesignConstraints) -> Vec<Finding> {
    let Some(bounds) = level.bounds() else {
        return Vec::new();
    };
    let envelope = bounds.expanded(constraints.exterior_wall_thickness);
    let mut findings = Vec::new();
    if envelope.width() > constraints.max_footprint_width {
        findings.push(Finding::new(
            Severity::Warning,
            Category::Footprint,
            Some(ElementRef::Level(level.id)),
            format!(
                "Envelope width {:.1}m exceeds maximum {:.1}m",
                envelope.width(),
                constraints.max_footprint_width
            ),
        ));
    }
    if envelope.height() > constraints.max_footprint_depth {
        findings.push(Finding::new(
            Severity::Warning,
            Category::Footprint,
            Some(ElementRef::Level(level.id)),
            format!(
                "Envelope depth {:.1}m exceeds maximum {:.1}m",
                envelope.height(),
                constraints.max_footprint_depth
            ),
        ));
    }
    findings
}

/// All rooms should be reachable from the first one through doors.
pub fn check_connectivity(level: &Level) -> Vec<Finding> {
    let Some(first) = level.rooms.first() else {
        return Vec::new();
    };

    let mut adj: HashMap<RoomId, Vec<RoomId>> = HashMap::new();
    for d in &level.doors {
        if let Some(target) = d.target {
            adj.entry(d.host).or_default().push(target);
            adj.entry(target).or_default().push(d.host);
        }
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(first.id);
    queue.push_back(first.id);
    while let Some(current) = queue.pop_front() {
        if let Some(neighbors) = adj.get(&current) {
            for &next in neighbors {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    level
        .rooms
        .iter()
        .filter(|r| !visited.contains(&r.id))
        .map(|r| {
            Finding::new(
                Severity::Warning,
                Category::Connectivity,
                Some(ElementRef::Room(r.id)),
                format!("Room '{}' unreachable from '{}'", r.name, first.name),
            )
        })
        .collect()
}

// ── Master validation ───────────────────────────────────────────────────

/// Run every check and return the combined findings.
pub fn validate_all(
    project: &Project,
    constraints: &DesignConstraints,
    tolerances: &Tolerances,
) -> Vec<Finding> {
    let mut all = check_structure(project);
    let Some(level) = project.primary_level() else {
        return all;
    };
    all.extend(check_room_areas(level));
    all.extend(check_daylight(level));
    all.extend(check_door_clearance(level, tolerances));
    all.extend(check_rooms_have_doors(level));
    all.extend(check_room_overlaps(level, tolerances));
    all.extend(check_footprint(level, constraints));
    all.extend(check_connectivity(level));
    all
}

/// Keep only errors when advisory findings are not wanted.
pub fn filter_findings(findings: Vec<Finding>, include_advisory: bool) -> Vec<Finding> {
    if include_advisory {
        return findings;
    }
    findings.into_iter().filter(Finding::is_error).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2D;
    use crate::ids::{WallId, WindowId};
    use crate::model::{Door, DoorType, Room, SwingSide, Window, WindowType};
    use crate::program::{Finishes, RoomFunction};

    fn make_room(id: u32, function: RoomFunction, x: f64, y: f64, w: f64, d: f64) -> Room {
        Room {
            id: RoomId(id),
            name: format!("Room {id}"),
            function,
            target_area: w * d,
            min_area: w * d * 0.85,
            max_area: w * d * 1.15,
            origin: Point2D::new(x, y),
            width: w,
            depth: d,
            finishes: Finishes::default(),
            ceiling_height: 3.0,
        }
    }

    fn make_door(id: u32, host: u32, target: Option<u32>, x: f64, y: f64) -> Door {
        Door {
            id: DoorId(id),
            position: Point2D::new(x, y),
            width: 0.9,
            height: 2.1,
            door_type: DoorType::Single,
            swing: SwingSide::Left,
            wall: WallId(1),
            host: RoomId(host),
            target: target.map(RoomId),
        }
    }

    fn make_window(id: u32, room: u32) -> Window {
        Window {
            id: WindowId(id),
            position: Point2D::default(),
            width: 1.2,
            height: 1.5,
            sill_height: 0.9,
            window_type: WindowType::Fixed,
            wall: WallId(1),
            room: RoomId(room),
        }
    }

    fn level_with(rooms: Vec<Room>, doors: Vec<Door>, windows: Vec<Window>) -> Level {
        let mut level = Level::empty(LevelId(1), "Level 1", 3.0);
        level.rooms = rooms;
        level.doors = doors;
        level.windows = windows;
        level
    }

    #[test]
    fn test_area_out_of_bounds() {
        let mut small = make_room(1, RoomFunction::Office, 0.0, 0.0, 3.0, 3.0);
        small.min_area = 10.0;
        let mut big = make_room(2, RoomFunction::Office, 4.0, 0.0, 5.0, 5.0);
        big.max_area = 20.0;
        let findings = check_room_areas(&level_with(vec![small, big], vec![], vec![]));
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("below minimum"));
        assert!(findings[1].message.contains("exceeds maximum"));
    }

    #[test]
    fn test_zero_bounds_not_enforced() {
        let mut r = make_room(1, RoomFunction::Office, 0.0, 0.0, 3.0, 3.0);
        r.min_area = 0.0;
        r.max_area = 0.0;
        assert!(check_room_areas(&level_with(vec![r], vec![], vec![])).is_empty());
    }

    #[test]
    fn test_habitable_room_without_window() {
        let level = level_with(
            vec![
                make_room(1, RoomFunction::Bedroom, 0.0, 0.0, 4.0, 4.0),
                make_room(2, RoomFunction::Kitchen, 4.2, 0.0, 4.0, 4.0),
                make_room(3, RoomFunction::Bathroom, 8.4, 0.0, 2.0, 2.0),
            ],
            vec![],
            vec![make_window(1, 2)],
        );
        let findings = check_daylight(&level);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].element, Some(ElementRef::Room(RoomId(1))));
    }

    #[test]
    fn test_doors_too_close() {
        let level = level_with(
            vec![],
            vec![
                make_door(1, 1, Some(2), 0.0, 0.0),
                make_door(2, 2, Some(3), 0.5, 0.0),
                make_door(3, 3, None, 5.0, 0.0),
            ],
            vec![],
        );
        let findings = check_door_clearance(&level, &Tolerances::default());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("D1 and D2"));
    }

    #[test]
    fn test_room_without_door() {
        let level = level_with(
            vec![
                make_room(1, RoomFunction::Office, 0.0, 0.0, 4.0, 4.0),
                make_room(2, RoomFunction::Office, 4.2, 0.0, 4.0, 4.0),
            ],
            vec![make_door(1, 1, None, 2.0, 0.0)],
            vec![],
        );
        let findings = check_rooms_have_doors(&level);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("Room 2"));
    }

    #[test]
    fn test_overlap_and_touching() {
        let overlapping = level_with(
            vec![
                make_room(1, RoomFunction::Office, 0.0, 0.0, 10.0, 10.0),
                make_room(2, RoomFunction::Office, 5.0, 5.0, 10.0, 10.0),
            ],
            vec![],
            vec![],
        );
        let findings = check_room_overlaps(&overlapping, &Tolerances::default());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_error());

        let touching = level_with(
            vec![
                make_room(1, RoomFunction::Office, 0.0, 0.0, 10.0, 10.0),
                make_room(2, RoomFunction::Office, 10.0, 0.0, 10.0, 10.0),
            ],
            vec![],
            vec![],
        );
        assert!(check_room_overlaps(&touching, &Tolerances::default()).is_empty());
    }

    #[test]
    fn test_footprint_depth_overrun() {
        let level = level_with(
            vec![make_room(1, RoomFunction::Garage, 0.2, 0.2, 6.0, 25.0)],
            vec![],
            vec![],
        );
        let findings = check_footprint(&level, &DesignConstraints::default());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("depth"));
    }

    #[test]
    fn test_connectivity_island() {
        let rooms = vec![
            make_room(1, RoomFunction::Office, 0.0, 0.0, 4.0, 4.0),
            make_room(2, RoomFunction::Office, 4.2, 0.0, 4.0, 4.0),
            make_room(3, RoomFunction::Office, 8.4, 0.0, 4.0, 4.0),
        ];
        let doors = vec![make_door(1, 1, Some(2), 4.1, 2.0), make_door(2, 3, None, 10.0, 0.0)];
        let findings = check_connectivity(&level_with(rooms, doors, vec![]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].element, Some(ElementRef::Room(RoomId(3))));
    }

    #[test]
    fn test_fully_connected_level() {
        let rooms = vec![
            make_room(1, RoomFunction::Office, 0.0, 0.0, 4.0, 4.0),
            make_room(2, RoomFunction::Office, 4.2, 0.0, 4.0, 4.0),
            make_room(3, RoomFunction::Office, 8.4, 0.0, 4.0, 4.0),
        ];
        let doors = vec![make_door(1, 1, Some(2), 4.1, 2.0), make_door(2, 2, Some(3), 8.3, 2.0)];
        assert!(check_connectivity(&level_with(rooms, doors, vec![])).is_empty());
    }

    #[test]
    fn test_filter_keeps_errors_only() {
        let findings = vec![
            Finding::new(Severity::Error, Category::RoomOverlap, None, "x".into()),
            Finding::new(Severity::Warning, Category::Area, None, "y".into()),
            Finding::new(Severity::Info, Category::Footprint, None, "z".into()),
        ];
        assert_eq!(filter_findings(findings.clone(), true).len(), 3);
        let errors = filter_findings(findings, false);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, Category::RoomOverlap);
    }

    #[test]
    fn test_finding_display_and_json() {
        let f = Finding::new(
            Severity::Warning,
            Category::Daylight,
            Some(ElementRef::Room(RoomId(4))),
            "Habitable room 'Den' has no window".into(),
        );
        assert_eq!(
            f.to_string(),
            "WARNING: [daylight] Habitable room 'Den' has no window"
        );
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["element"]["kind"], "room");
        assert_eq!(json["element"]["id"], 4);
    }
}
