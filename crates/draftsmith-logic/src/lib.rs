//! Deterministic schematic layout and drawing-set composition for Draftsmith.
//!
//! This crate turns a room program into a placed single-level building and
//! plans the construction-document set for it. There is no I/O: functions
//! take plain data and return results, so every stage is unit-testable and
//! the whole pipeline can run inside any host (CLI, server, worker).
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`annotations`] | Dimensions, room tags, elevation and section markers |
//! | [`config`] | Generation config, validation, typed resolution |
//! | [`constants`] | Drafting constants and configurable tolerances |
//! | [`context`] | Per-run seed, seeded RNG and issue date |
//! | [`error`] | Fatal pipeline errors (`DraftError`) |
//! | [`generator`] | Sizing, shelf packing, wall synthesis, doors and windows |
//! | [`geometry`] | `Point2D`, `Line2D`, `BoundingBox` |
//! | [`ids`] | Typed, sequentially issued element ids |
//! | [`interpreter`] | Structured and free-text program parsing |
//! | [`layers`] | AIA CAD layer table |
//! | [`manifest`] | Export formats and the export file manifest |
//! | [`model`] | Rooms, walls, openings, levels, buildings, project |
//! | [`pipeline`] | End-to-end run, demo program, summary counts |
//! | [`program`] | Room functions, requirements, design constraints |
//! | [`qc`] | Quality-control findings over a generated plan |
//! | [`schedules`] | Door, window and room finish schedules |
//! | [`sheets`] | Paper sizes, viewports, title blocks, sheet composition |
//! | [`views`] | Floor plan, RCP, elevation and section views |

pub mod annotations;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod ids;
pub mod interpreter;
pub mod layers;
pub mod manifest;
pub mod model;
pub mod pipeline;
pub mod program;
pub mod qc;
pub mod schedules;
pub mod sheets;
pub mod views;

pub use error::{DraftError, Result};
