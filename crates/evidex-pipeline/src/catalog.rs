use std::path::Path;

use evidex_evidence::concepts::ConceptVocabulary;
use evidex_tags::scenario::ScenarioCatalog;
use evidex_tags::vocabulary::TagVocabulary;

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Read-only matching tables, loaded once at startup and borrowed by every
/// pipeline run.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub vocabulary: TagVocabulary,
    pub scenarios: ScenarioCatalog,
    pub concepts: ConceptVocabulary,
}

impl Catalog {
    pub fn builtin() -> Result<Self, PipelineError> {
        let vocabulary = TagVocabulary::builtin()?;
        let scenarios = ScenarioCatalog::builtin(&vocabulary)?;
        Ok(Self {
            vocabulary,
            scenarios,
            concepts: ConceptVocabulary::builtin()?,
        })
    }

    /// Built-in tables with any overrides named in `config`.
    pub fn load(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let vocabulary = match &config.vocabulary_path {
            Some(path) => TagVocabulary::from_json(&read(path)?)?,
            None => TagVocabulary::builtin()?,
        };
        // Scenarios are validated against whichever vocabulary is in effect.
        let scenarios = match &config.scenarios_path {
            Some(path) => ScenarioCatalog::from_json(&read(path)?, &vocabulary)?,
            None => ScenarioCatalog::builtin(&vocabulary)?,
        };
        tracing::info!(
            tags = vocabulary.len(),
            scenarios = scenarios.scenarios().len(),
            "catalog loaded"
        );
        Ok(Self {
            vocabulary,
            scenarios,
            concepts: ConceptVocabulary::builtin()?,
        })
    }
}

fn read(path: &Path) -> Result<String, PipelineError> {
    std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))
}
