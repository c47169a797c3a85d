use crate::classifiers::classifier::{Classifier, Learner, TargetPrediction};
use crate::core::attributes::{Attribute, AttributeRef};
use crate::core::distribution::Distribution;
use crate::core::instances::Instance;
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};

/// k nearest neighbours over range-normalized features.
///
/// Numeric differences are divided by the feature's training range,
/// nominal features contribute 0 on a match and 1 otherwise, and a missing
/// value on either side contributes 1.
#[derive(Debug, Clone)]
pub struct KNearestLearner {
    name: String,
    k: usize,
}

impl KNearestLearner {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(MultiTargetError::configuration("k must be at least 1"));
        }
        Ok(Self {
            name: format!("{k}-NN"),
            k,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl Learner for KNearestLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn train(&self, data: &Dataset) -> Result<Box<dyn Classifier>> {
        let class_attr = data.domain().class_attribute()?.clone();
        let rows: Vec<Row> = data
            .iter()
            .filter(|inst| !inst.is_class_missing())
            .map(|inst| Row {
                features: inst.features.clone(),
                class: inst.classes[0],
                weight: inst.weight,
            })
            .collect();
        if rows.is_empty() {
            return Err(MultiTargetError::data(
                "k-NN needs at least one instance with a known class",
            ));
        }

        let ranges = data
            .domain()
            .features()
            .iter()
            .enumerate()
            .map(|(i, attr)| {
                attr.is_numeric().then(|| {
                    let (lo, hi) = rows
                        .iter()
                        .map(|r| r.features[i])
                        .filter(|v| !v.is_nan())
                        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                            (lo.min(v), hi.max(v))
                        });
                    if hi > lo { hi - lo } else { 1.0 }
                })
            })
            .collect();

        Ok(Box::new(KNearestClassifier {
            k: self.k,
            class_attr,
            ranges,
            rows,
        }))
    }
}

#[derive(Debug, Clone)]
struct Row {
    features: Vec<f64>,
    class: f64,
    weight: f64,
}

#[derive(Debug, Clone)]
pub struct KNearestClassifier {
    k: usize,
    class_attr: AttributeRef,
    /// Normalization range per numeric feature; `None` for nominal ones.
    ranges: Vec<Option<f64>>,
    rows: Vec<Row>,
}

impl KNearestClassifier {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self.ranges
            .iter()
            .zip(a.iter().zip(b))
            .map(|(range, (&x, &y))| {
                if x.is_nan() || y.is_nan() {
                    return 1.0;
                }
                match range {
                    Some(r) => ((x - y) / r).powi(2),
                    None if x == y => 0.0,
                    None => 1.0,
                }
            })
            .sum::<f64>()
            .sqrt()
    }

    fn neighbours(&self, features: &[f64]) -> Vec<&Row> {
        let mut scored: Vec<(f64, &Row)> = self
            .rows
            .iter()
            .map(|r| (self.distance(features, &r.features), r))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.into_iter().take(self.k).map(|(_, r)| r).collect()
    }
}

impl Classifier for KNearestClassifier {
    fn predict(&self, instance: &dyn Instance) -> Result<TargetPrediction> {
        let features = instance.feature_values();
        if features.len() != self.ranges.len() {
            return Err(MultiTargetError::data(format!(
                "instance has {} features, model was trained on {}",
                features.len(),
                self.ranges.len()
            )));
        }
        let neighbours = self.neighbours(features);

        match self.class_attr.as_ref() {
            Attribute::Nominal(nominal) => {
                let mut votes = vec![0.0; nominal.number_of_values()];
                for r in &neighbours {
                    if let Some(v) = votes.get_mut(r.class as usize) {
                        *v += r.weight;
                    }
                }
                let mut distribution = Distribution::Discrete(votes);
                distribution.normalize();
                let value = distribution.modus().unwrap_or(f64::NAN);
                Ok(TargetPrediction::new(value, Some(distribution)))
            }
            Attribute::Numeric(_) => {
                let weight: f64 = neighbours.iter().map(|r| r.weight).sum();
                let value = if weight > 0.0 {
                    neighbours.iter().map(|r| r.class * r.weight).sum::<f64>() / weight
                } else {
                    f64::NAN
                };
                let mut distribution =
                    Distribution::continuous_from(neighbours.iter().map(|r| (r.class, r.weight)));
                distribution.normalize();
                Ok(TargetPrediction::new(value, Some(distribution)))
            }
        }
    }
}
