use crate::config::choices::MultiTargetChoice;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_folds() -> usize {
    10
}
fn default_seed() -> u64 {
    42
}

/// A learner to evaluate, under the id it is reported by.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LearnerEntry {
    #[schemars(title = "Id", description = "Unique name in the score table.")]
    pub id: String,
    pub learner: MultiTargetChoice,
}

/// Cross-validation of several multi-target learners on one dataset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub learners: Vec<LearnerEntry>,

    #[serde(default = "default_folds")]
    #[schemars(
        title = "Folds",
        description = "Number of cross-validation folds.",
        range(min = 2),
        default = "default_folds"
    )]
    pub folds: usize,

    #[serde(default = "default_seed")]
    #[schemars(
        title = "Seed",
        description = "Seed of the fold assignment.",
        default = "default_seed"
    )]
    pub seed: u64,

    #[serde(default)]
    #[schemars(
        title = "Impute missing values?",
        description = "Replace missing feature values before every learner sees them."
    )]
    pub impute_missing: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            learners: Vec::new(),
            folds: default_folds(),
            seed: default_seed(),
            impute_missing: false,
        }
    }
}
