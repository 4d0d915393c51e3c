//! Door, window and room finish schedules built from a level.

use serde::Serialize;

use crate::annotations::room_number;
use crate::ids::RoomId;
use crate::model::Level;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoorScheduleEntry {
    pub mark: String,
    pub room_from: String,
    /// Empty for doors that open to the outside or an unnamed space.
    pub room_to: String,
    pub width: f64,
    pub height: f64,
    pub door_type: String,
    pub material: String,
    pub hardware: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowScheduleEntry {
    pub mark: String,
    pub room: String,
    pub width: f64,
    pub height: f64,
    pub sill_height: f64,
    pub window_type: String,
    pub material: String,
    pub glazing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomFinishEntry {
    pub number: String,
    pub name: String,
    pub area: f64,
    pub floor_finish: String,
    pub wall_finish: String,
    pub ceiling_finish: String,
    pub ceiling_height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedules {
    pub doors: Vec<DoorScheduleEntry>,
    pub windows: Vec<WindowScheduleEntry>,
    pub rooms: Vec<RoomFinishEntry>,
}

impl Schedules {
    pub fn is_empty(&self) -> bool {
        self.doors.is_empty() && self.windows.is_empty() && self.rooms.is_empty()
    }
}

fn title_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn room_name(level: &Level, id: RoomId) -> String {
    level
        .room(id)
        .map(|r| r.name.clone())
        .unwrap_or_else(|| id.to_string())
}

pub fn door_schedule(level: &Level) -> Vec<DoorScheduleEntry> {
    level
        .doors
        .iter()
        .enumerate()
        .map(|(i, door)| DoorScheduleEntry {
            mark: format!("D{:02}", i + 1),
            room_from: room_name(level, door.host),
            room_to: door
                .target
                .map(|id| room_name(level, id))
                .unwrap_or_default(),
            width: door.width,
            height: door.height,
            door_type: title_case(door.door_type.as_str()),
            material: "Wood".to_string(),
            hardware: "Lever".to_string(),
        })
        .collect()
}

pub fn window_schedule(level: &Level) -> Vec<WindowScheduleEntry> {
    level
        .windows
        .iter()
        .enumerate()
        .map(|(i, window)| WindowScheduleEntry {
            mark: format!("W{:02}", i + 1),
            room: room_name(level, window.room),
            width: window.width,
            height: window.height,
            sill_height: window.sill_height,
            window_type: title_case(window.window_type.as_str()),
            material: "Aluminum".to_string(),
            glazing: "Double".to_string(),
        })
        .collect()
}

/// Room numbers match the room tags on the plan.
pub fn room_finish_schedule(level: &Level) -> Vec<RoomFinishEntry> {
    level
        .rooms
        .iter()
        .enumerate()
        .map(|(i, room)| RoomFinishEntry {
            number: room_number(i),
            name: room.name.clone(),
            area: room.actual_area(),
            floor_finish: room.finishes.floor.clone(),
            wall_finish: room.finishes.wall.clone(),
            ceiling_finish: room.finishes.ceiling.clone(),
            ceiling_height: room.ceiling_height,
        })
        .collect()
}

pub fn build_schedules(level: &Level) -> Schedules {
    let schedules = Schedules {
        doors: door_schedule(level),
        windows: window_schedule(level),
        rooms: room_finish_schedule(level),
    };
    log::debug!(
        "Schedules: {} doors, {} windows, {} rooms",
        schedules.doors.len(),
        schedules.windows.len(),
        schedules.rooms.len()
    );
    schedules
}
