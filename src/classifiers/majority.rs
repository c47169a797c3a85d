use crate::classifiers::classifier::{Classifier, Learner, TargetPrediction};
use crate::core::attributes::Attribute;
use crate::core::distribution::Distribution;
use crate::core::instances::Instance;
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};

/// Ignores the features: predicts the most frequent class (discrete target)
/// or the weighted mean (continuous target).
#[derive(Debug, Clone)]
pub struct MajorityLearner {
    name: String,
}

impl MajorityLearner {
    pub fn new() -> Self {
        Self {
            name: "Majority".to_string(),
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for MajorityLearner {
    fn default() -> Self {
        Self::new()
    }
}

impl Learner for MajorityLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn train(&self, data: &Dataset) -> Result<Box<dyn Classifier>> {
        let class_attr = data.domain().class_attribute()?;
        match class_attr.as_ref() {
            Attribute::Nominal(nominal) => {
                let mut counts = vec![0.0; nominal.number_of_values()];
                for inst in data.iter() {
                    let Some(y) = inst.class_value().filter(|y| !y.is_nan()) else {
                        continue;
                    };
                    let Some(slot) = counts.get_mut(y as usize) else {
                        return Err(MultiTargetError::data(format!(
                            "class value {y} out of range for {:?}",
                            nominal.name
                        )));
                    };
                    *slot += inst.weight();
                }
                let mut distribution = Distribution::Discrete(counts);
                if distribution.total() > 0.0 {
                    distribution.normalize();
                } else if let Distribution::Discrete(p) = &mut distribution {
                    let k = p.len().max(1) as f64;
                    p.iter_mut().for_each(|v| *v = 1.0 / k);
                }
                let value = distribution.modus().unwrap_or(f64::NAN);
                Ok(Box::new(MajorityClassifier {
                    prediction: TargetPrediction::new(value, Some(distribution)),
                }))
            }
            Attribute::Numeric(_) => {
                let (sum, weight) = data
                    .iter()
                    .filter_map(|inst| inst.class_value().map(|y| (y, inst.weight())))
                    .filter(|(y, _)| !y.is_nan())
                    .fold((0.0, 0.0), |(s, w), (y, wi)| (s + y * wi, w + wi));
                let mean = if weight > 0.0 { sum / weight } else { f64::NAN };
                Ok(Box::new(MajorityClassifier {
                    prediction: TargetPrediction::new(mean, None),
                }))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MajorityClassifier {
    prediction: TargetPrediction,
}

impl Classifier for MajorityClassifier {
    fn predict(&self, _instance: &dyn Instance) -> Result<TargetPrediction> {
        Ok(self.prediction.clone())
    }
}
