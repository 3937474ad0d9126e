//! Engine configuration
//!
//! Loaded from a YAML file (`ravencheck.yaml` by convention). Every
//! section is optional; missing values take the defaults below.
//!
//! ```yaml
//! version: 1
//! thresholds:
//!   hard_error_confidence: 0.8
//!   low_confidence: 0.7
//! detector:
//!   disabled: [scaling_pattern]
//! structure:
//!   min_options: 4
//!   max_options: 6
//! report:
//!   min_success_rate: 95.0
//! ```

use crate::error::{Error, Result};
use crate::rule::RuleType;
use crate::validate::Thresholds;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported configuration schema version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Schema version, checked on load when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    pub thresholds: Thresholds,

    pub detector: DetectorConfig,

    pub structure: StructureConfig,

    pub report: ReportConfig,
}

/// Detector settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DetectorConfig {
    /// Rule families the detector never reports
    pub disabled: Vec<RuleType>,
}

/// Structural checks on option lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StructureConfig {
    pub min_options: usize,
    pub max_options: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            min_options: 4,
            max_options: 6,
        }
    }
}

/// Collection report gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReportConfig {
    /// Percentage of valid questions below which `report` fails
    pub min_success_rate: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_success_rate: 95.0,
        }
    }
}

impl EngineConfig {
    /// Load and validate a YAML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        let config = Self::from_yaml(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_norway::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if let Some(version) = self.version {
            if version != CONFIG_VERSION {
                return Err(Error::Config(format!(
                    "Unsupported config version: {}",
                    version
                )));
            }
        }

        let t = &self.thresholds;
        for (name, value) in [
            ("hard_error_confidence", t.hard_error_confidence),
            ("low_confidence", t.low_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "thresholds.{} must be within 0.0..=1.0, got {}",
                    name, value
                )));
            }
        }
        if t.low_confidence > t.hard_error_confidence {
            return Err(Error::Config(
                "thresholds.low_confidence must not exceed hard_error_confidence".to_string(),
            ));
        }

        if self.structure.min_options > self.structure.max_options {
            return Err(Error::Config(format!(
                "structure.min_options ({}) exceeds max_options ({})",
                self.structure.min_options, self.structure.max_options
            )));
        }

        if !(0.0..=100.0).contains(&self.report.min_success_rate) {
            return Err(Error::Config(format!(
                "report.min_success_rate must be a percentage, got {}",
                self.report.min_success_rate
            )));
        }

        Ok(())
    }
}
