use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use evidex_citations::slots::ContextEntry;
use evidex_core::models::evidence::EvidencePackage;
use evidex_pipeline::catalog::Catalog;
use evidex_pipeline::config::PipelineConfig;
use evidex_pipeline::pipeline::{Assessment, FinalAnswer, Pipeline};

const CONFIG_ENV: &str = "EVIDEX_CONFIG";

/// `--config`, then `$EVIDEX_CONFIG`, then `<config dir>/evidex/config.json`.
pub fn config_path(explicit: Option<PathBuf>) -> eyre::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("evidex").join("config.json"))
}

fn read(path: &Path) -> eyre::Result<String> {
    std::fs::read_to_string(path).map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))
}

fn read_package(path: &Path) -> eyre::Result<EvidencePackage> {
    let package = EvidencePackage::from_json(&read(path)?)?;
    tracing::debug!(
        path = %path.display(),
        items = package.total_items(),
        "evidence package loaded"
    );
    Ok(package)
}

fn print_json<T: Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct AssessOutput {
    assessment: Assessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<FinalAnswer>,
}

pub fn assess(
    config: PipelineConfig,
    query: &str,
    evidence: Option<&Path>,
    answer: Option<&Path>,
) -> eyre::Result<()> {
    let catalog = Catalog::load(&config)?;
    let pipeline = Pipeline::new(&catalog, config)?;

    let package = evidence.map(read_package).transpose()?;
    let assessment = pipeline.assess(query, package.as_ref());
    let answer = match answer {
        Some(path) => Some(pipeline.finalize_answer(&read(path)?, &assessment.slots)),
        None => None,
    };

    print_json(&AssessOutput { assessment, answer })
}

/// What `validate` accepts as evidence: the ordered `slots` printed by
/// `assess`, or a package taken in canonical category order.
#[derive(Deserialize)]
#[serde(untagged)]
enum EvidenceInput {
    Context(Vec<ContextEntry>),
    Package(EvidencePackage),
}

pub fn validate(config: PipelineConfig, evidence: &Path, answer: &Path) -> eyre::Result<()> {
    let catalog = Catalog::load(&config)?;
    let pipeline = Pipeline::new(&catalog, config)?;

    let slots = match serde_json::from_str(&read(evidence)?)? {
        EvidenceInput::Context(context) => pipeline.slots_for_context(&context),
        EvidenceInput::Package(package) => pipeline.slots_for(&package),
    };
    let result = pipeline.finalize_answer(&read(answer)?, &slots);
    print_json(&result)
}

pub fn show_config(config: &PipelineConfig, path: &Path, write: bool) -> eyre::Result<()> {
    if write {
        config.save(path)?;
    }
    print_json(config)
}
