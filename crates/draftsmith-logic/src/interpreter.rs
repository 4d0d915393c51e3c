//! Requirements interpreter: structured payloads and free text into a
//! [`ProgramRequirements`].
//!
//! Structured input is a JSON object:
//!
//! ```json
//! { "project_name": "Demo", "rooms": [{"name": "Kitchen", "function": "kitchen", "area": 12}],
//!   "constraints": {"max_footprint_width": 20}, "notes": "..." }
//! ```
//!
//! Free text is read line by line. `# Name` sets the project name, lines such
//! as `2x Bedroom: 15 sqm` become room requirements, anything else becomes a
//! note. Text with no recognizable room line yields a single 20 m² "Room".

use regex::Regex;
use serde::de::Error as _;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::error::{DraftError, Result};
use crate::program::{
    DesignConstraints, Finishes, ProgramRequirements, RoomFunction, RoomRequirement,
};

const DEFAULT_AREA: f64 = 15.0;
const DEFAULT_CEILING_HEIGHT: f64 = 3.0;
const FALLBACK_ROOM_AREA: f64 = 20.0;

/// Raw room program as received from the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramInput {
    Structured(Value),
    Text(String),
}

impl ProgramInput {
    /// JSON objects are structured input; everything else is free text.
    pub fn detect(raw: &str) -> ProgramInput {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => ProgramInput::Structured(value),
            _ => ProgramInput::Text(raw.to_string()),
        }
    }
}

impl From<Value> for ProgramInput {
    fn from(value: Value) -> Self {
        ProgramInput::Structured(value)
    }
}

impl From<&str> for ProgramInput {
    fn from(raw: &str) -> Self {
        ProgramInput::detect(raw)
    }
}

/// Interpret either input form.
pub fn interpret(input: &ProgramInput) -> Result<ProgramRequirements> {
    match input {
        ProgramInput::Structured(value) => parse_structured(value),
        ProgramInput::Text(text) => Ok(parse_text(text)),
    }
}

// ── Structured input ────────────────────────────────────────────────────

/// Parse a structured payload. Malformed shapes fail with
/// [`DraftError::InvalidPayload`]; bad room values with
/// [`DraftError::InvalidRequirement`].
pub fn parse_structured(value: &Value) -> Result<ProgramRequirements> {
    let obj = value
        .as_object()
        .ok_or_else(|| serde_json::Error::custom("program payload must be a JSON object"))?;

    let rooms = match obj.get("rooms") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(parse_room)
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(serde_json::Error::custom("'rooms' must be an array").into()),
    };

    let constraints = match obj.get("constraints") {
        None | Some(Value::Null) => DesignConstraints::default(),
        Some(c) => serde_json::from_value(c.clone())?,
    };
    constraints.validate()?;

    let program = ProgramRequirements {
        project_name: string_field(obj, "project_name").unwrap_or_else(|| "Untitled".to_string()),
        project_number: string_field(obj, "project_number").unwrap_or_default(),
        client: string_field(obj, "client").unwrap_or_default(),
        rooms,
        constraints,
        notes: notes_field(obj),
    };
    log::info!(
        "Parsed structured program '{}': {} requirements, {:.1} m² target",
        program.project_name,
        program.rooms.len(),
        program.total_target_area()
    );
    Ok(program)
}

fn parse_room(entry: &Value) -> Result<RoomRequirement> {
    let obj = entry
        .as_object()
        .ok_or_else(|| serde_json::Error::custom("each room entry must be an object"))?;

    let name = string_field(obj, "name").unwrap_or_else(|| "Room".to_string());
    let function = string_field(obj, "function")
        .map(|f| RoomFunction::from_label(&f))
        .unwrap_or_default();
    let area = number_field(obj, "area", &name)?.unwrap_or(DEFAULT_AREA);
    let count = match number_field(obj, "count", &name)? {
        None => 1,
        Some(c) if c >= 0.0 && c.fract() == 0.0 && c <= f64::from(u32::MAX) => c as u32,
        Some(c) => {
            return Err(DraftError::InvalidRequirement {
                name,
                reason: format!("count must be a non-negative integer, got {c}"),
            })
        }
    };
    let min_area = number_field(obj, "min_area", &name)?.unwrap_or(0.0);
    let max_area = number_field(obj, "max_area", &name)?.unwrap_or(0.0);

    let mut finishes = match obj.get("finishes") {
        Some(f @ Value::Object(_)) => serde_json::from_value::<Finishes>(f.clone())?,
        _ => Finishes::default(),
    };
    if let Some(floor) = string_field(obj, "floor_finish") {
        finishes.floor = floor;
    }
    if let Some(wall) = string_field(obj, "wall_finish") {
        finishes.wall = wall;
    }
    if let Some(ceiling) = string_field(obj, "ceiling_finish") {
        finishes.ceiling = ceiling;
    }

    let adjacencies = match obj.get("adjacencies") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    let mut req = RoomRequirement::new(name.clone(), function, area)
        .with_count(count)
        .with_bounds(min_area, max_area);
    req.adjacencies = adjacencies;
    req.must_have_window = obj.get("must_have_window").and_then(Value::as_bool);
    req.finishes = finishes;
    req.ceiling_height =
        number_field(obj, "ceiling_height", &name)?.unwrap_or(DEFAULT_CEILING_HEIGHT);
    req.validate()?;
    Ok(req)
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn number_field(obj: &Map<String, Value>, key: &str, room: &str) -> Result<Option<f64>> {
    let bad = || DraftError::InvalidRequirement {
        name: room.to_string(),
        reason: format!("'{key}' is not a number"),
    };
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(bad),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| bad()),
        Some(_) => Err(bad()),
    }
}

fn notes_field(obj: &Map<String, Value>) -> String {
    match obj.get("notes") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

// ── Free text ───────────────────────────────────────────────────────────

/// `[count][x] <name> [:,-] <area> <unit>`, case-insensitive.
const ROOM_LINE: &str =
    r"(?i)(?:(\d+)\s*x?\s+)?([\w\s]+?)[\s:,\-]+?(\d+(?:\.\d+)?)\s*(?:sq\.?\s*m|m²|sqm|square\s*met)";

fn room_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(ROOM_LINE).expect("ROOM_LINE is a valid pattern"))
}

/// Parse free text. Never fails: unrecognized lines become notes and a
/// text with no room lines yields the fallback room.
pub fn parse_text(text: &str) -> ProgramRequirements {
    let mut program = ProgramRequirements::default();
    let mut notes = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if let Some(name) = line.strip_prefix("# ") {
            program.project_name = name.trim().to_string();
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        match room_line_pattern().captures(line) {
            Some(caps) => {
                let count = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .unwrap_or(1);
                let name = title_case(caps.get(2).map_or("", |m| m.as_str()).trim());
                let area = caps
                    .get(3)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                    .unwrap_or(DEFAULT_AREA);
                let function = function_for_name(&name);
                program
                    .rooms
                    .push(RoomRequirement::new(name, function, area).with_count(count.max(1)));
            }
            None => notes.push(line),
        }
    }

    if program.rooms.is_empty() {
        log::warn!("No room lines recognized in text program, using fallback room");
        program.rooms.push(RoomRequirement::new(
            "Room",
            RoomFunction::Custom,
            FALLBACK_ROOM_AREA,
        ));
    }
    program.notes = notes.join("\n");
    log::info!(
        "Parsed text program '{}': {} requirements, {} note lines",
        program.project_name,
        program.rooms.len(),
        notes.len()
    );
    program
}

/// Plural room names ("Bedrooms") fall back to their singular label.
fn function_for_name(name: &str) -> RoomFunction {
    match RoomFunction::from_label(name) {
        RoomFunction::Custom => name
            .strip_suffix('s')
            .map(RoomFunction::from_label)
            .unwrap_or(RoomFunction::Custom),
        f => f,
    }
}

/// Capitalize the first letter of every alphabetic run.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn structured_defaults() {
        let program = parse_structured(&json!({"rooms": [{"name": "Den"}]})).unwrap();
        assert_eq!(program.project_name, "Untitled");
        let den = &program.rooms[0];
        assert_eq!(den.function, RoomFunction::Custom);
        assert_relative_eq!(den.area, 15.0);
        assert_eq!(den.count, 1);
        assert_relative_eq!(den.ceiling_height, 3.0);
        assert_eq!(den.finishes, Finishes::default());
    }

    #[test]
    fn structured_maps_synonyms_and_coerces_numbers() {
        let program = parse_structured(&json!({
            "project_name": "Cabin",
            "rooms": [
                {"name": "Great Room", "function": "Living Room", "area": "30", "count": 1},
                {"name": "Wash", "function": "LAUNDRY", "area": 5.5, "floor_finish": "Tile"}
            ],
            "notes": ["south facing", "timber frame"]
        }))
        .unwrap();
        assert_eq!(program.project_name, "Cabin");
        assert_eq!(program.rooms[0].function, RoomFunction::Living);
        assert_relative_eq!(program.rooms[0].area, 30.0);
        assert_eq!(program.rooms[1].function, RoomFunction::Utility);
        assert_eq!(program.rooms[1].finishes.floor, "Tile");
        assert_eq!(program.notes, "south facing\ntimber frame");
    }

    #[test]
    fn structured_constraints_merge() {
        let program = parse_structured(&json!({
            "rooms": [],
            "constraints": {"max_footprint_width": 12.0}
        }))
        .unwrap();
        assert_relative_eq!(program.constraints.max_footprint_width, 12.0);
        assert_relative_eq!(program.constraints.max_footprint_depth, 20.0);
    }

    #[test]
    fn structured_rejects_unusable_constraints() {
        let negative_gap = parse_structured(&json!({
            "rooms": [{"name": "A", "area": 12}, {"name": "B", "area": 10}],
            "constraints": {"default_wall_thickness": -3.0}
        }));
        match negative_gap {
            Err(DraftError::InvalidConstraints(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].starts_with("wall_thickness"));
            }
            other => panic!("expected InvalidConstraints, got {other:?}"),
        }

        let several = parse_structured(&json!({
            "rooms": [],
            "constraints": {
                "max_footprint_width": 0.0,
                "exterior_wall_thickness": -0.3,
                "window_sill_height": -1.0
            }
        }));
        assert!(matches!(
            several,
            Err(DraftError::InvalidConstraints(ref errors)) if errors.len() == 3
        ));
    }

    #[test]
    fn structured_rejects_bad_shapes() {
        assert!(matches!(
            parse_structured(&json!({"rooms": 3})),
            Err(DraftError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_structured(&json!([1, 2])),
            Err(DraftError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_structured(&json!({"rooms": [{"name": "X", "area": -4}]})),
            Err(DraftError::InvalidRequirement { .. })
        ));
        assert!(matches!(
            parse_structured(&json!({"rooms": [{"name": "X", "count": 1.5}]})),
            Err(DraftError::InvalidRequirement { .. })
        ));
    }

    #[test]
    fn room_line_pattern_compiles() {
        assert!(Regex::new(ROOM_LINE).is_ok());
        let caps = room_line_pattern().captures("3x Guest Room: 14.5 sqm").unwrap();
        assert_eq!(&caps[1], "3");
        assert_eq!(caps[2].trim(), "Guest Room");
        assert_eq!(&caps[3], "14.5");
    }

    #[test]
    fn text_rooms_and_notes() {
        let program = parse_text(
            "# Lake House\n\
             Living Room: 25 sqm\n\
             2x Bedroom - 14.5 m²\n\
             #comment\n\
             Prefer open plan\n",
        );
        assert_eq!(program.project_name, "Lake House");
        assert_eq!(program.rooms.len(), 2);
        assert_eq!(program.rooms[0].name, "Living Room");
        assert_eq!(program.rooms[0].function, RoomFunction::Living);
        assert_eq!(program.rooms[1].name, "Bedroom");
        assert_eq!(program.rooms[1].count, 2);
        assert_relative_eq!(program.rooms[1].area, 14.5);
        assert_eq!(program.notes, "Prefer open plan");
    }

    #[test]
    fn text_plural_names_find_function() {
        let program = parse_text("2 bedrooms, 15 sqm each");
        assert_eq!(program.rooms[0].name, "Bedrooms");
        assert_eq!(program.rooms[0].count, 2);
        assert_eq!(program.rooms[0].function, RoomFunction::Bedroom);
    }

    #[test]
    fn text_without_rooms_falls_back() {
        let program = parse_text("just a cosy place by the sea");
        assert_eq!(program.rooms.len(), 1);
        assert_eq!(program.rooms[0].name, "Room");
        assert_relative_eq!(program.rooms[0].area, 20.0);
        assert_eq!(program.notes, "just a cosy place by the sea");
    }

    #[test]
    fn detect_prefers_json_objects() {
        assert!(matches!(
            ProgramInput::detect(r#"{"rooms": []}"#),
            ProgramInput::Structured(_)
        ));
        assert!(matches!(ProgramInput::detect("Kitchen: 12 sqm"), ProgramInput::Text(_)));
        assert!(matches!(ProgramInput::detect("42"), ProgramInput::Text(_)));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("master BEDROOM"), "Master Bedroom");
        assert_eq!(title_case("home office"), "Home Office");
    }
}
