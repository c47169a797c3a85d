use crate::core::distribution::Distribution;
use crate::core::instances::Instance;
use crate::core::Dataset;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// What a classifier call returns: the value, the distribution, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ResultType {
    Value,
    Probabilities,
    Both,
}

/// Classifier output shaped by a [`ResultType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction<V, P> {
    Value(V),
    Probabilities(P),
    Both(V, P),
}

impl<V, P> Prediction<V, P> {
    pub fn select(result_type: ResultType, value: V, probabilities: P) -> Self {
        match result_type {
            ResultType::Value => Prediction::Value(value),
            ResultType::Probabilities => Prediction::Probabilities(probabilities),
            ResultType::Both => Prediction::Both(value, probabilities),
        }
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Prediction::Value(v) | Prediction::Both(v, _) => Some(v),
            Prediction::Probabilities(_) => None,
        }
    }

    pub fn probabilities(&self) -> Option<&P> {
        match self {
            Prediction::Probabilities(p) | Prediction::Both(_, p) => Some(p),
            Prediction::Value(_) => None,
        }
    }
}

/// Value and distribution predicted for a single target.
///
/// Continuous predictors may leave `distribution` empty and only report a
/// point estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPrediction {
    pub value: f64,
    pub distribution: Option<Distribution>,
}

impl TargetPrediction {
    pub fn new(value: f64, distribution: Option<Distribution>) -> Self {
        Self {
            value,
            distribution,
        }
    }
}

/// Inducer of single-target classifiers.
///
/// The training dataset's domain has exactly one class variable. Instance
/// weights are taken from the instances themselves.
pub trait Learner: Send + Sync {
    fn name(&self) -> &str;

    fn train(&self, data: &Dataset) -> Result<Box<dyn Classifier>>;
}

/// Trained single-target model. Immutable, so it can be shared across threads.
pub trait Classifier: Send + Sync {
    /// Predicts value and distribution together.
    fn predict(&self, instance: &dyn Instance) -> Result<TargetPrediction>;

    fn classify(
        &self,
        instance: &dyn Instance,
        result_type: ResultType,
    ) -> Result<Prediction<f64, Option<Distribution>>> {
        let p = self.predict(instance)?;
        Ok(Prediction::select(result_type, p.value, p.distribution))
    }
}
