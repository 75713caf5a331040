use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use evidex_citations::format::FormatConfig;
use evidex_evidence::rank::RankConfig;
use evidex_evidence::sufficiency::SufficiencyConfig;

use crate::error::PipelineError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

const REFERENCE_YEARS: RangeInclusive<i16> = 1800..=9999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    pub config_version: u32,
    /// Items scoring below this are dropped by the relevance filter.
    pub relevance_threshold: u32,
    /// Evidence volume that earns the sufficiency volume bonus.
    pub min_evidence_threshold: usize,
    pub min_references: usize,
    pub max_references: usize,
    pub relaxation_limit: usize,
    pub recent_window_years: i16,
    pub badge_recent_years: i16,
    /// Fixed "current year" for reproducible runs. Defaults to the clock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i16>,
    /// JSON file replacing the built-in tag vocabulary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_path: Option<PathBuf>,
    /// JSON file replacing the built-in scenario catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenarios_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            relevance_threshold: 30,
            min_evidence_threshold: 3,
            min_references: 5,
            max_references: 10,
            relaxation_limit: 2,
            recent_window_years: 5,
            badge_recent_years: 3,
            reference_year: None,
            vocabulary_path: None,
            scenarios_path: None,
        }
    }
}

impl PipelineConfig {
    /// Parse a config file's contents, migrating older shapes first.
    pub fn from_json(contents: &str) -> Result<Self, PipelineError> {
        // Parse as raw JSON so we can run migrations before deserializing.
        let json: Value = serde_json::from_str(contents)?;
        let raw_version = json
            .get("config_version")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let on_disk_version = u32::try_from(raw_version).map_err(|_| {
            PipelineError::Config(format!("config_version {raw_version} is out of range"))
        })?;

        let migrated = migrate(json, on_disk_version)?;
        let config: PipelineConfig = serde_json::from_value(migrated)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let config = Self::from_json(&contents)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, PipelineError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
        }

        // Always write the current version, regardless of what was loaded.
        let mut stamped = self.clone();
        stamped.config_version = CURRENT_VERSION;
        let json = serde_json::to_string_pretty(&stamped)?;

        // Write to a temp file then rename for atomicity
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes()).map_err(|e| PipelineError::io(&tmp_path, e))?;
        std::fs::rename(&tmp_path, path).map_err(|e| PipelineError::io(path, e))?;

        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.relevance_threshold > 100 {
            return Err(PipelineError::Config(format!(
                "relevance_threshold must be 0-100, got {}",
                self.relevance_threshold
            )));
        }
        if self.recent_window_years < 0 || self.badge_recent_years < 0 {
            return Err(PipelineError::Config(
                "year windows must not be negative".to_string(),
            ));
        }
        if let Some(year) = self.reference_year
            && !REFERENCE_YEARS.contains(&year)
        {
            return Err(PipelineError::Config(format!(
                "reference_year must be {}-{}, got {year}",
                REFERENCE_YEARS.start(),
                REFERENCE_YEARS.end()
            )));
        }
        self.rank_config().validate()?;
        Ok(())
    }

    pub fn current_year(&self) -> i16 {
        self.reference_year
            .unwrap_or_else(|| jiff::Zoned::now().year())
    }

    pub fn rank_config(&self) -> RankConfig {
        RankConfig {
            min_references: self.min_references,
            max_references: self.max_references,
            relaxation_limit: self.relaxation_limit,
        }
    }

    pub fn sufficiency_config(&self) -> SufficiencyConfig {
        SufficiencyConfig {
            min_evidence_threshold: self.min_evidence_threshold,
            recent_window_years: self.recent_window_years,
            current_year: self.current_year(),
        }
    }

    pub fn format_config(&self) -> FormatConfig {
        FormatConfig {
            current_year: self.current_year(),
            recent_years: self.badge_recent_years,
        }
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: Value, from_version: u32) -> Result<Value, PipelineError> {
    if from_version > CURRENT_VERSION {
        return Err(PipelineError::Config(format!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        )));
    }

    // v0 → v1: min_sources was renamed to min_evidence_threshold
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| PipelineError::Config("config is not a JSON object".to_string()))?;
        if let Some(legacy) = obj.remove("min_sources") {
            obj.entry("min_evidence_threshold").or_insert(legacy);
        }
        obj.insert("config_version".to_string(), Value::Number(1.into()));
        tracing::info!("migrated config v0 → v1 (renamed min_sources)");
    }

    Ok(json)
}
