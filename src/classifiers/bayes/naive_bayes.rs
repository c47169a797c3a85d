use crate::classifiers::bayes::attribute_class_observer::{
    AttributeClassObserver, GaussianNumericAttributeClassObserver, NominalAttributeClassObserver,
};
use crate::classifiers::classifier::{Classifier, Learner, TargetPrediction};
use crate::core::attributes::Attribute;
use crate::core::distribution::Distribution;
use crate::core::instances::Instance;
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};

/// Naive Bayes for a discrete target.
///
/// Nominal features use Laplace-smoothed counts, numeric features one
/// Gaussian per class. Missing feature values are skipped both when
/// training and when predicting.
#[derive(Debug, Clone)]
pub struct NaiveBayesLearner {
    name: String,
}

impl NaiveBayesLearner {
    pub fn new() -> Self {
        Self {
            name: "Naive Bayes".to_string(),
        }
    }
}

impl Default for NaiveBayesLearner {
    fn default() -> Self {
        Self::new()
    }
}

impl Learner for NaiveBayesLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn train(&self, data: &Dataset) -> Result<Box<dyn Classifier>> {
        let domain = data.domain();
        let class_attr = domain.class_attribute()?;
        let Attribute::Nominal(class_var) = class_attr.as_ref() else {
            return Err(MultiTargetError::configuration(format!(
                "naive Bayes needs a discrete target, {:?} is continuous",
                class_attr.name()
            )));
        };
        let k = class_var.number_of_values();

        let mut observers: Vec<Box<dyn AttributeClassObserver>> = domain
            .features()
            .iter()
            .map(|a| -> Box<dyn AttributeClassObserver> {
                match a.as_ref() {
                    Attribute::Nominal(n) => {
                        Box::new(NominalAttributeClassObserver::new(n.number_of_values()))
                    }
                    Attribute::Numeric(_) => Box::new(GaussianNumericAttributeClassObserver::new()),
                }
            })
            .collect();
        let mut observed_class_distribution = vec![0.0; k];

        for inst in data.iter() {
            if inst.is_class_missing() {
                continue;
            }
            let Some(y) = inst.class_value().map(|y| y as usize).filter(|&y| y < k) else {
                return Err(MultiTargetError::data(format!(
                    "class value out of range for {:?}",
                    class_var.name
                )));
            };
            let w = inst.weight();
            observed_class_distribution[y] += w;
            for (observer, &value) in observers.iter_mut().zip(inst.feature_values()) {
                observer.observe_attribute_class(value, y, w);
            }
        }

        Ok(Box::new(NaiveBayesClassifier {
            observed_class_distribution,
            observers,
        }))
    }
}

pub struct NaiveBayesClassifier {
    observed_class_distribution: Vec<f64>,
    observers: Vec<Box<dyn AttributeClassObserver>>,
}

impl NaiveBayesClassifier {
    /// Log-space product of the smoothed prior and every feature likelihood,
    /// normalized to a distribution.
    pub fn do_naive_bayes_prediction(&self, instance: &dyn Instance) -> Vec<f64> {
        let k = self.observed_class_distribution.len();
        let total: f64 = self.observed_class_distribution.iter().sum();
        let mut log_votes: Vec<f64> = self
            .observed_class_distribution
            .iter()
            .map(|&n| ((n + 1.0) / (total + k as f64)).ln())
            .collect();

        for (i, observer) in self.observers.iter().enumerate() {
            let Some(value) = instance.feature_at(i).filter(|v| !v.is_nan()) else {
                continue;
            };
            for (c, vote) in log_votes.iter_mut().enumerate() {
                if let Some(p) = observer.probability_of_attribute_value_given_class(value, c) {
                    *vote += p.max(f64::MIN_POSITIVE).ln();
                }
            }
        }

        let max = log_votes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut votes: Vec<f64> = log_votes.iter().map(|v| (v - max).exp()).collect();
        let sum: f64 = votes.iter().sum();
        if sum > 0.0 {
            votes.iter_mut().for_each(|v| *v /= sum);
        }
        votes
    }
}

impl Classifier for NaiveBayesClassifier {
    fn predict(&self, instance: &dyn Instance) -> Result<TargetPrediction> {
        let distribution = Distribution::Discrete(self.do_naive_bayes_prediction(instance));
        let value = distribution.modus().unwrap_or(f64::NAN);
        Ok(TargetPrediction::new(value, Some(distribution)))
    }
}
