//! Generation configuration.
//!
//! A run is configured with export formats, paper size, drawing scale, the
//! seed and two output switches. The raw config mirrors the external
//! payload (plain strings); [`GenerationConfig::resolve`] validates it and
//! turns it into typed values.
//!
//! ```
//! use draftsmith_logic::config::{validate_config, GenerationConfig};
//!
//! let mut config = GenerationConfig::default();
//! config.paper_size = "A1".to_string();
//! assert!(validate_config(&config).is_empty());
//! let resolved = config.resolve().unwrap();
//! assert_eq!(resolved.scale.to_string(), "1:100");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::Tolerances;
use crate::context::{RunContext, DEFAULT_SEED};
use crate::error::{DraftError, Result};
use crate::manifest::ExportFormat;
use crate::sheets::PaperSize;
use crate::views::ViewScale;

/// Caller-supplied generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Export formats by extension (`dxf`, `ifc`, `pdf`, `png`).
    pub formats: Vec<String>,
    pub paper_size: String,
    /// Drawing scale, `N:M`.
    pub scale: String,
    pub seed: u64,
    pub include_schedules: bool,
    /// When false only error findings are reported.
    pub include_qc: bool,
    pub tolerances: Tolerances,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            formats: vec!["dxf".to_string(), "pdf".to_string(), "png".to_string()],
            paper_size: PaperSize::ArchD.as_str().to_string(),
            scale: ViewScale::PLAN.to_string(),
            seed: DEFAULT_SEED,
            include_schedules: true,
            include_qc: true,
            tolerances: Tolerances::default(),
        }
    }
}

/// Configuration validation error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown export format '{0}'")]
    UnknownFormat(String),
    #[error("export format '{0}' listed more than once")]
    DuplicateFormat(String),
    #[error("unknown paper size '{0}'")]
    UnknownPaperSize(String),
    #[error("invalid scale '{0}'")]
    InvalidScale(String),
    #[error("tolerance '{0}' must be positive, got {1}")]
    InvalidTolerance(&'static str, f64),
}

/// Validate a generation config, returning all errors found.
pub fn validate_config(config: &GenerationConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let mut seen = Vec::new();
    for raw in &config.formats {
        match raw.parse::<ExportFormat>() {
            Ok(format) if seen.contains(&format) => {
                errors.push(ConfigError::DuplicateFormat(raw.clone()))
            }
            Ok(format) => seen.push(format),
            Err(_) => errors.push(ConfigError::UnknownFormat(raw.clone())),
        }
    }
    if config.paper_size.parse::<PaperSize>().is_err() {
        errors.push(ConfigError::UnknownPaperSize(config.paper_size.clone()));
    }
    if config.scale.parse::<ViewScale>().is_err() {
        errors.push(ConfigError::InvalidScale(config.scale.clone()));
    }

    let t = &config.tolerances;
    let checks = [
        ("shared_edge_slack", t.shared_edge_slack),
        ("edge_coverage", t.edge_coverage),
        ("wall_near_room", t.wall_near_room),
        ("door_clearance", t.door_clearance),
        ("min_window_wall", t.min_window_wall),
        ("window_wall_share", t.window_wall_share),
        ("min_window_width", t.min_window_width),
    ];
    for (name, value) in checks {
        if !(value.is_finite() && value > 0.0) {
            errors.push(ConfigError::InvalidTolerance(name, value));
        }
    }

    errors
}

/// A validated config with every field parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub formats: Vec<ExportFormat>,
    pub paper: PaperSize,
    pub scale: ViewScale,
    pub seed: u64,
    pub include_schedules: bool,
    pub include_qc: bool,
    pub tolerances: Tolerances,
}

impl ResolvedConfig {
    /// Run context for this config, dated today.
    pub fn run_context(&self) -> RunContext {
        RunContext::with_seed(self.seed)
    }
}

impl GenerationConfig {
    /// Validate and parse. All validation errors are reported together.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let errors = validate_config(self);
        if !errors.is_empty() {
            return Err(DraftError::InvalidConfig(
                errors.iter().map(ToString::to_string).collect(),
            ));
        }
        let formats = self
            .formats
            .iter()
            .map(|f| f.parse::<ExportFormat>())
            .collect::<Result<Vec<ExportFormat>>>()?;
        Ok(ResolvedConfig {
            formats,
            paper: self.paper_size.parse()?,
            scale: self.scale.parse()?,
            seed: self.seed,
            include_schedules: self.include_schedules,
            include_qc: self.include_qc,
            tolerances: self.tolerances.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GenerationConfig::default();
        let errors = validate_config(&config);
        assert!(errors.is_empty(), "default config should be valid: {errors:?}");
        let resolved = config.resolve().unwrap();
        assert_eq!(
            resolved.formats,
            [ExportFormat::Dxf, ExportFormat::Pdf, ExportFormat::Png]
        );
        assert_eq!(resolved.paper, PaperSize::ArchD);
        assert_eq!(resolved.seed, 42);
        assert!(resolved.include_schedules && resolved.include_qc);
    }

    #[test]
    fn unknown_and_duplicate_formats() {
        let config = GenerationConfig {
            formats: vec!["pdf".into(), "svg".into(), "PDF".into()],
            ..Default::default()
        };
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::UnknownFormat("svg".into())));
        assert!(errors.contains(&ConfigError::DuplicateFormat("PDF".into())));
    }

    #[test]
    fn bad_paper_and_scale() {
        let config = GenerationConfig {
            paper_size: "Letter".into(),
            scale: "1/100".into(),
            ..Default::default()
        };
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ConfigError::UnknownPaperSize("Letter".into())));
        assert!(errors.contains(&ConfigError::InvalidScale("1/100".into())));
    }

    #[test]
    fn non_positive_tolerance() {
        let mut config = GenerationConfig::default();
        config.tolerances.door_clearance = 0.0;
        assert!(validate_config(&config)
            .contains(&ConfigError::InvalidTolerance("door_clearance", 0.0)));
    }

    #[test]
    fn resolve_reports_every_error() {
        let config = GenerationConfig {
            formats: vec!["tiff".into()],
            paper_size: "B0".into(),
            ..Default::default()
        };
        match config.resolve() {
            Err(DraftError::InvalidConfig(messages)) => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0], "unknown export format 'tiff'");
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"seed": 7, "formats": ["ifc"], "include_qc": false}"#)
                .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.paper_size, "ARCH_D");
        assert!(!config.include_qc);
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.formats, [ExportFormat::Ifc]);
        assert_eq!(resolved.run_context().seed, 7);
    }
}
