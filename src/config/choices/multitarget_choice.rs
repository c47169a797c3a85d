use crate::classifiers::multitarget::ensemble::{DEFAULT_N_CHAINS, DEFAULT_SAMPLE_SIZE};
use crate::config::choices::BaseLearnerChoice;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_binary_relevance_name() -> String {
    "Binary Relevance".to_string()
}
fn default_chain_name() -> String {
    "Classifier Chain".to_string()
}
fn default_ensemble_name() -> String {
    "Ensemble CChain".to_string()
}
fn default_seed() -> u64 {
    42
}
fn default_actual_values() -> bool {
    true
}
fn default_n_chains() -> usize {
    DEFAULT_N_CHAINS
}
fn default_sample_size() -> f64 {
    DEFAULT_SAMPLE_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BinaryRelevanceParams {
    #[serde(default = "default_binary_relevance_name")]
    #[schemars(title = "Name", default = "default_binary_relevance_name")]
    pub name: String,

    #[serde(default)]
    #[schemars(
        title = "Base learner",
        description = "Single-target learner trained once per target."
    )]
    pub base: Option<BaseLearnerChoice>,
}

impl Default for BinaryRelevanceParams {
    fn default() -> Self {
        Self {
            name: default_binary_relevance_name(),
            base: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClassifierChainParams {
    #[serde(default = "default_chain_name")]
    #[schemars(title = "Name", default = "default_chain_name")]
    pub name: String,

    #[serde(default)]
    #[schemars(
        title = "Base learner",
        description = "Single-target learner trained at every chain position."
    )]
    pub base: Option<BaseLearnerChoice>,

    #[serde(default = "default_seed")]
    #[schemars(
        title = "Seed",
        description = "Seed of the stream that shuffles the class order.",
        default = "default_seed"
    )]
    pub seed: u64,

    #[serde(default)]
    #[schemars(
        title = "Class order",
        description = "Fixed order of the class variables, by name (None = random)."
    )]
    pub class_order: Option<Vec<String>>,

    #[serde(default = "default_actual_values")]
    #[schemars(
        title = "Train on actual values?",
        description = "Extend features with the actual target values instead of predictions.",
        default = "default_actual_values"
    )]
    pub actual_values: bool,
}

impl Default for ClassifierChainParams {
    fn default() -> Self {
        Self {
            name: default_chain_name(),
            base: None,
            seed: default_seed(),
            class_order: None,
            actual_values: default_actual_values(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EnsembleClassifierChainParams {
    #[serde(default = "default_ensemble_name")]
    #[schemars(title = "Name", default = "default_ensemble_name")]
    pub name: String,

    #[serde(default)]
    #[schemars(
        title = "Base learner",
        description = "Single-target learner trained at every position of every chain."
    )]
    pub base: Option<BaseLearnerChoice>,

    #[serde(default = "default_n_chains")]
    #[schemars(
        title = "Number of chains",
        description = "Chains trained, each on its own sample and class order.",
        range(min = 1),
        default = "default_n_chains"
    )]
    pub n_chains: usize,

    #[serde(default = "default_sample_size")]
    #[schemars(
        title = "Sample size",
        description = "Share of the training instances each chain is trained on (0–1).",
        range(min = 0.0, max = 1.0),
        default = "default_sample_size"
    )]
    pub sample_size: f64,

    #[serde(default = "default_actual_values")]
    #[schemars(
        title = "Train on actual values?",
        description = "Extend features with the actual target values instead of predictions.",
        default = "default_actual_values"
    )]
    pub actual_values: bool,

    #[serde(default = "default_seed")]
    #[schemars(
        title = "Seed",
        description = "Seed of the stream that draws samples and class orders.",
        default = "default_seed"
    )]
    pub seed: u64,
}

impl Default for EnsembleClassifierChainParams {
    fn default() -> Self {
        Self {
            name: default_ensemble_name(),
            base: None,
            n_chains: default_n_chains(),
            sample_size: default_sample_size(),
            actual_values: default_actual_values(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(MultiTargetKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum MultiTargetChoice {
    #[strum_discriminants(strum(
        message = "Binary Relevance",
        detailed_message = "One independent model per target."
    ))]
    BinaryRelevance(BinaryRelevanceParams),
    #[strum_discriminants(strum(
        message = "Classifier Chain",
        detailed_message = "Targets predicted in sequence, each conditioned on the previous ones."
    ))]
    ClassifierChain(ClassifierChainParams),
    #[strum_discriminants(strum(
        message = "Ensemble of Classifier Chains",
        detailed_message = "Chains over random samples and orders, combined by vote or mean."
    ))]
    EnsembleClassifierChain(EnsembleClassifierChainParams),
}

impl MultiTargetChoice {
    pub fn default_for(kind: MultiTargetKind) -> Self {
        match kind {
            MultiTargetKind::BinaryRelevance => {
                Self::BinaryRelevance(BinaryRelevanceParams::default())
            }
            MultiTargetKind::ClassifierChain => {
                Self::ClassifierChain(ClassifierChainParams::default())
            }
            MultiTargetKind::EnsembleClassifierChain => {
                Self::EnsembleClassifierChain(EnsembleClassifierChainParams::default())
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::BinaryRelevance(p) => &p.name,
            Self::ClassifierChain(p) => &p.name,
            Self::EnsembleClassifierChain(p) => &p.name,
        }
    }
}
