//! Room program: what spaces are needed and under which constraints.
//!
//! A [`ProgramRequirements`] is built once per run by the interpreter and
//! is read-only afterwards. Requirements with `count > 1` are expanded into
//! singletons by [`ProgramRequirements::expanded_rooms`] before packing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{MAX_AREA_FACTOR, MIN_AREA_FACTOR};
use crate::error::{DraftError, Result};

/// Closed set of room functions. Serialized with their lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomFunction {
    Bedroom,
    Living,
    Kitchen,
    Bathroom,
    Dining,
    Office,
    Storage,
    Corridor,
    Lobby,
    Staircase,
    Utility,
    Mechanical,
    Garage,
    #[default]
    Custom,
}

impl RoomFunction {
    pub const ALL: [RoomFunction; 14] = [
        RoomFunction::Bedroom,
        RoomFunction::Living,
        RoomFunction::Kitchen,
        RoomFunction::Bathroom,
        RoomFunction::Dining,
        RoomFunction::Office,
        RoomFunction::Storage,
        RoomFunction::Corridor,
        RoomFunction::Lobby,
        RoomFunction::Staircase,
        RoomFunction::Utility,
        RoomFunction::Mechanical,
        RoomFunction::Garage,
        RoomFunction::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomFunction::Bedroom => "bedroom",
            RoomFunction::Living => "living",
            RoomFunction::Kitchen => "kitchen",
            RoomFunction::Bathroom => "bathroom",
            RoomFunction::Dining => "dining",
            RoomFunction::Office => "office",
            RoomFunction::Storage => "storage",
            RoomFunction::Corridor => "corridor",
            RoomFunction::Lobby => "lobby",
            RoomFunction::Staircase => "staircase",
            RoomFunction::Utility => "utility",
            RoomFunction::Mechanical => "mechanical",
            RoomFunction::Garage => "garage",
            RoomFunction::Custom => "custom",
        }
    }

    /// Map a user-supplied function label, synonyms included, to a function.
    /// Matching ignores case and surrounding whitespace. Unknown labels map
    /// to [`RoomFunction::Custom`].
    pub fn from_label(label: &str) -> RoomFunction {
        let key = label.trim().to_lowercase();
        match key.as_str() {
            "bedroom" => RoomFunction::Bedroom,
            "living" | "living room" => RoomFunction::Living,
            "kitchen" => RoomFunction::Kitchen,
            "bathroom" | "bath" => RoomFunction::Bathroom,
            "dining" | "dining room" => RoomFunction::Dining,
            "office" | "study" => RoomFunction::Office,
            "storage" => RoomFunction::Storage,
            "corridor" | "hallway" => RoomFunction::Corridor,
            "lobby" | "entry" => RoomFunction::Lobby,
            "staircase" | "stair" | "stairs" => RoomFunction::Staircase,
            "utility" | "laundry" => RoomFunction::Utility,
            "mechanical" => RoomFunction::Mechanical,
            "garage" => RoomFunction::Garage,
            _ => RoomFunction::Custom,
        }
    }

    /// Functions that need daylight.
    pub fn is_habitable(&self) -> bool {
        matches!(
            self,
            RoomFunction::Bedroom
                | RoomFunction::Living
                | RoomFunction::Kitchen
                | RoomFunction::Dining
                | RoomFunction::Office
        )
    }
}

impl fmt::Display for RoomFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Floor, wall and ceiling finish labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finishes {
    pub floor: String,
    pub wall: String,
    pub ceiling: String,
}

impl Default for Finishes {
    fn default() -> Self {
        Self {
            floor: "Concrete".to_string(),
            wall: "Paint".to_string(),
            ceiling: "Gypsum".to_string(),
        }
    }
}

/// One line of the room program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRequirement {
    pub name: String,
    pub function: RoomFunction,
    /// Target area in m².
    pub area: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub count: u32,
    /// Names of rooms this one should neighbour. Not enforced by the packer.
    pub adjacencies: Vec<String>,
    /// `None` leaves the decision to the room function.
    pub must_have_window: Option<bool>,
    pub finishes: Finishes,
    pub ceiling_height: f64,
}

impl RoomRequirement {
    /// A single room with default bounds (85% / 115% of `area`).
    pub fn new(name: impl Into<String>, function: RoomFunction, area: f64) -> Self {
        Self {
            name: name.into(),
            function,
            area,
            min_area: area * MIN_AREA_FACTOR,
            max_area: area * MAX_AREA_FACTOR,
            count: 1,
            adjacencies: Vec::new(),
            must_have_window: None,
            finishes: Finishes::default(),
            ceiling_height: 3.0,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Override the area bounds. A zero bound falls back to the default factor.
    pub fn with_bounds(mut self, min_area: f64, max_area: f64) -> Self {
        self.min_area = if min_area > 0.0 {
            min_area
        } else {
            self.area * MIN_AREA_FACTOR
        };
        self.max_area = if max_area > 0.0 {
            max_area
        } else {
            self.area * MAX_AREA_FACTOR
        };
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| DraftError::InvalidRequirement {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(invalid("area must be a positive number"));
        }
        if self.count == 0 {
            return Err(invalid("count must be at least 1"));
        }
        if !self.ceiling_height.is_finite() || self.ceiling_height <= 0.0 {
            return Err(invalid("ceiling height must be positive"));
        }
        if self.max_area > 0.0 && self.min_area > self.max_area {
            return Err(invalid("min area exceeds max area"));
        }
        Ok(())
    }
}

/// Architectural constraints applied to the whole plan.
///
/// Deserializing a partial object fills the missing fields from
/// [`DesignConstraints::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConstraints {
    pub max_footprint_width: f64,
    pub max_footprint_depth: f64,
    pub min_corridor_width: f64,
    pub min_door_width: f64,
    /// Interior wall thickness, also the gap left between packed rooms.
    #[serde(alias = "default_wall_thickness")]
    pub wall_thickness: f64,
    pub exterior_wall_thickness: f64,
    pub floor_to_floor_height: f64,
    pub door_height: f64,
    pub window_sill_height: f64,
    pub window_height: f64,
    /// Minimum glazing as a share of floor area for habitable rooms.
    pub min_window_area_ratio: f64,
    pub building_code: String,
}

impl Default for DesignConstraints {
    fn default() -> Self {
        Self {
            max_footprint_width: 30.0,
            max_footprint_depth: 20.0,
            min_corridor_width: 1.2,
            min_door_width: 0.9,
            wall_thickness: 0.2,
            exterior_wall_thickness: 0.3,
            floor_to_floor_height: 3.0,
            door_height: 2.1,
            window_sill_height: 0.9,
            window_height: 1.5,
            min_window_area_ratio: 0.1,
            building_code: "IBC".to_string(),
        }
    }
}

impl DesignConstraints {
    /// Reject dimensions the packer and wall synthesis cannot work with.
    /// Every offending field is reported.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_footprint_width", self.max_footprint_width),
            ("max_footprint_depth", self.max_footprint_depth),
            ("min_corridor_width", self.min_corridor_width),
            ("min_door_width", self.min_door_width),
            ("wall_thickness", self.wall_thickness),
            ("exterior_wall_thickness", self.exterior_wall_thickness),
            ("floor_to_floor_height", self.floor_to_floor_height),
            ("door_height", self.door_height),
            ("window_height", self.window_height),
        ];
        let non_negative = [
            ("window_sill_height", self.window_sill_height),
            ("min_window_area_ratio", self.min_window_area_ratio),
        ];

        let mut errors: Vec<String> = positive
            .iter()
            .filter(|(_, v)| !(v.is_finite() && *v > 0.0))
            .map(|(name, v)| format!("{name} must be positive, got {v}"))
            .collect();
        errors.extend(
            non_negative
                .iter()
                .filter(|(_, v)| !(v.is_finite() && *v >= 0.0))
                .map(|(name, v)| format!("{name} must not be negative, got {v}")),
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DraftError::InvalidConstraints(errors))
        }
    }
}

/// The full program handed to the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRequirements {
    pub project_name: String,
    pub project_number: String,
    pub client: String,
    pub rooms: Vec<RoomRequirement>,
    pub constraints: DesignConstraints,
    pub notes: String,
}

impl Default for ProgramRequirements {
    fn default() -> Self {
        Self {
            project_name: "Untitled".to_string(),
            project_number: String::new(),
            client: String::new(),
            rooms: Vec::new(),
            constraints: DesignConstraints::default(),
            notes: String::new(),
        }
    }
}

impl ProgramRequirements {
    /// Sum of `area * count` over every requirement.
    pub fn total_target_area(&self) -> f64 {
        self.rooms.iter().map(|r| r.area * f64::from(r.count)).sum()
    }

    /// Number of rooms after expansion.
    pub fn room_count(&self) -> usize {
        self.rooms.iter().map(|r| r.count as usize).sum()
    }

    /// Expand every requirement with `count > 1` into numbered singletons
    /// ("Bedroom 1", "Bedroom 2", ...). Single requirements keep their name.
    pub fn expanded_rooms(&self) -> Vec<RoomRequirement> {
        let mut out = Vec::with_capacity(self.room_count());
        for req in &self.rooms {
            for i in 0..req.count {
                let mut single = req.clone();
                if req.count > 1 {
                    single.name = format!("{} {}", req.name, i + 1);
                }
                single.count = 1;
                out.push(single);
            }
        }
        out
    }

    /// Check the constraints, then every requirement, stopping at the
    /// first invalid one.
    pub fn validate(&self) -> Result<()> {
        self.constraints.validate()?;
        self.rooms.iter().try_for_each(RoomRequirement::validate)
    }
}
