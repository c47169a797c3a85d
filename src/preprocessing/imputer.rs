use crate::classifiers::multitarget::learner::feature_vector;
use crate::classifiers::multitarget::{
    MultiTargetClassifier, MultiTargetLearner, MultiTargetPrediction,
};
use crate::core::attributes::Attribute;
use crate::core::distribution::Distribution;
use crate::core::domain::Domain;
use crate::core::estimators::GaussianEstimator;
use crate::core::instances::{DenseInstance, Instance};
use crate::core::Dataset;
use crate::error::Result;
use crate::preprocessing::Preprocessor;
use std::sync::Arc;
use tracing::debug;

/// Replaces missing feature values with the training mean (numeric) or the
/// most frequent value (nominal), both weighted.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingValueImputer;

impl Preprocessor for MissingValueImputer {
    fn wrap(&self, learner: Box<dyn MultiTargetLearner>) -> Box<dyn MultiTargetLearner> {
        Box::new(ImputingLearner { inner: learner })
    }
}

pub struct ImputingLearner {
    inner: Box<dyn MultiTargetLearner>,
}

impl MultiTargetLearner for ImputingLearner {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn train(&mut self, data: &Dataset) -> Result<Box<dyn MultiTargetClassifier>> {
        let fill = fill_values(data);
        let imputed = data
            .iter()
            .map(|inst| {
                DenseInstance::new(
                    Arc::clone(data.domain()),
                    impute(&inst.features, &fill),
                    inst.classes.clone(),
                    inst.weight,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        let imputed = Dataset::new(Arc::clone(data.domain()), imputed)?;
        debug!(learner = self.inner.name(), fill = ?fill, "missing feature values imputed");

        Ok(Box::new(ImputingClassifier {
            inner: self.inner.train(&imputed)?,
            fill,
        }))
    }
}

pub struct ImputingClassifier {
    inner: Box<dyn MultiTargetClassifier>,
    fill: Vec<f64>,
}

impl ImputingClassifier {
    /// Replacement value per feature of the training domain.
    pub fn fill_values(&self) -> &[f64] {
        &self.fill
    }
}

impl MultiTargetClassifier for ImputingClassifier {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn domain(&self) -> &Arc<Domain> {
        self.inner.domain()
    }

    fn predict(&self, instance: &dyn Instance) -> Result<MultiTargetPrediction> {
        let domain = self.inner.domain();
        let features = impute(&feature_vector(instance, domain)?, &self.fill);
        let query = DenseInstance::query(Arc::new(domain.without_classes()), features)?;
        self.inner.predict(&query)
    }
}

/// Weighted mean or mode of every feature; NaN when a feature is never observed.
fn fill_values(data: &Dataset) -> Vec<f64> {
    data.domain()
        .features()
        .iter()
        .enumerate()
        .map(|(i, attr)| {
            let observed = data
                .iter()
                .filter_map(|inst| inst.feature_at(i).map(|v| (v, inst.weight())))
                .filter(|(v, _)| !v.is_nan());
            match attr.as_ref() {
                Attribute::Nominal(nominal) => {
                    let mut counts = vec![0.0; nominal.number_of_values()];
                    for (v, w) in observed {
                        if let Some(slot) = counts.get_mut(v as usize) {
                            *slot += w;
                        }
                    }
                    let counts = Distribution::Discrete(counts);
                    if counts.total() > 0.0 {
                        counts.modus().unwrap_or(f64::NAN)
                    } else {
                        f64::NAN
                    }
                }
                Attribute::Numeric(_) => {
                    let mut estimator = GaussianEstimator::new();
                    for (v, w) in observed {
                        estimator.add_observation(v, w);
                    }
                    if estimator.total_weight_observed() > 0.0 {
                        estimator.mean()
                    } else {
                        f64::NAN
                    }
                }
            }
        })
        .collect()
}

fn impute(features: &[f64], fill: &[f64]) -> Vec<f64> {
    features
        .iter()
        .zip(fill)
        .map(|(&v, &f)| if v.is_nan() { f } else { v })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::multitarget::BinaryRelevanceLearner;
    use crate::testing::SpyLearner;

    fn data() -> Dataset {
        let domain = Arc::new(
            Domain::new(
                "gaps",
                vec![
                    Attribute::nominal("c", &["r", "g", "b"]),
                    Attribute::numeric("x"),
                ],
                vec![Attribute::nominal("y", &["0", "1"])],
            )
            .unwrap(),
        );
        Dataset::from_rows(
            domain,
            vec![
                (vec![1.0, 2.0], vec![0.0]),
                (vec![1.0, f64::NAN], vec![1.0]),
                (vec![f64::NAN, 4.0], vec![1.0]),
                (vec![2.0, 6.0], vec![0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn training_rows_are_filled_with_mode_and_mean() {
        let (spy, seen) = SpyLearner::new();
        let br = BinaryRelevanceLearner::new(Some(Arc::new(spy))).unwrap();
        let mut learner = MissingValueImputer.wrap(Box::new(br));
        let classifier = learner.train(&data()).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].rows[1], vec![1.0, 4.0]);
        assert_eq!(seen[0].rows[2], vec![1.0, 4.0]);
        assert_eq!(classifier.name(), "Binary Relevance");
    }

    #[test]
    fn queries_are_imputed_too() {
        let (spy, _seen) = SpyLearner::new();
        let br = BinaryRelevanceLearner::new(Some(Arc::new(spy))).unwrap();
        let mut learner = MissingValueImputer.wrap(Box::new(br));
        let classifier = learner.train(&data()).unwrap();
        let q = DenseInstance::query(
            Arc::new(data().domain().without_classes()),
            vec![f64::NAN, f64::NAN],
        )
        .unwrap();
        assert_eq!(classifier.predict(&q).unwrap().values.len(), 1);
    }

    #[test]
    fn unobserved_feature_stays_missing() {
        let d = data();
        let empty = d.select(&[]).unwrap();
        let fill = fill_values(&empty);
        assert!(fill.iter().all(|v| v.is_nan()));
        assert_eq!(fill_values(&d), vec![1.0, 4.0]);
    }
}
