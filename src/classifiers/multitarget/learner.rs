use crate::classifiers::classifier::{Prediction, ResultType};
use crate::core::distribution::Distribution;
use crate::core::domain::Domain;
use crate::core::instances::Instance;
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};
use std::sync::Arc;

/// Training progress hook, called with a completion fraction in `(0, 1]`.
///
/// Invoked synchronously on the training thread right after each step; it
/// must return promptly.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Values and distributions for every target, in the training domain's
/// class variable order.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiTargetPrediction {
    pub values: Vec<f64>,
    pub probabilities: Vec<Option<Distribution>>,
}

/// Inducer of multi-target classifiers.
///
/// Training may advance internal random state, hence `&mut self`: calls on
/// one learner must be serialized by the caller.
pub trait MultiTargetLearner: Send {
    fn name(&self) -> &str;

    fn train(&mut self, data: &Dataset) -> Result<Box<dyn MultiTargetClassifier>>;
}

/// Trained multi-target model; immutable and safe to query from many threads.
pub trait MultiTargetClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Domain the classifier was trained on; predictions follow its class order.
    fn domain(&self) -> &Arc<Domain>;

    fn predict(&self, instance: &dyn Instance) -> Result<MultiTargetPrediction>;

    fn classify(
        &self,
        instance: &dyn Instance,
        result_type: ResultType,
    ) -> Result<Prediction<Vec<f64>, Vec<Option<Distribution>>>> {
        let p = self.predict(instance)?;
        Ok(Prediction::select(result_type, p.values, p.probabilities))
    }
}

pub(crate) fn require_targets(data: &Dataset) -> Result<()> {
    if data.domain().number_of_classes() == 0 {
        return Err(MultiTargetError::data(format!(
            "domain {:?} has no class variables",
            data.domain().relation_name()
        )));
    }
    Ok(())
}

/// Feature values of `instance` in the order of `domain`'s features,
/// matched by name when the instance comes from another domain.
pub(crate) fn feature_vector(instance: &dyn Instance, domain: &Domain) -> Result<Vec<f64>> {
    let source = instance.domain();
    let same_layout = source.number_of_features() == domain.number_of_features()
        && source
            .features()
            .iter()
            .zip(domain.features())
            .all(|(a, b)| a.name() == b.name());
    if same_layout {
        return Ok(instance.feature_values().to_vec());
    }
    domain
        .features()
        .iter()
        .map(|attr| {
            source
                .index_of_feature(attr.name())
                .and_then(|i| instance.feature_at(i))
                .ok_or_else(|| {
                    MultiTargetError::data(format!(
                        "instance lacks feature {:?} required by the model",
                        attr.name()
                    ))
                })
        })
        .collect()
}

pub(crate) fn report_progress(progress: Option<&ProgressCallback>, fraction: f64) {
    if let Some(callback) = progress {
        callback(fraction);
    }
}
