//! Serializable description of learners and experiments.
//!
//! Every choice is a tagged enum (`{"type": ..., "params": {...}}`) with
//! defaults for every parameter, so `{"type": "classifier-chain", "params":
//! {"base": {"type": "naive-bayes", "params": {}}}}` is a complete learner.

pub mod build;
pub mod choices;

pub use build::{BuildError, build_base_learner, build_evaluator, build_multitarget_learner};
pub use choices::*;

use anyhow::Context;
use schemars::{Schema, schema_for};
use std::fs;
use std::path::Path;

pub fn parse_experiment(text: &str) -> Result<ExperimentConfig, BuildError> {
    Ok(serde_json::from_str(text)?)
}

/// Reads an [`ExperimentConfig`] from a JSON file.
pub fn load_experiment<P: AsRef<Path>>(path: P) -> anyhow::Result<ExperimentConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read experiment file {}", path.display()))?;
    parse_experiment(&text)
        .with_context(|| format!("invalid experiment file {}", path.display()))
}

/// JSON schema of [`ExperimentConfig`].
pub fn experiment_schema() -> Schema {
    schema_for!(ExperimentConfig)
}
