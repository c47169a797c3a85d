use crate::core::attributes::Attribute;
use crate::core::distribution::Distribution;
use crate::core::domain::Domain;
use crate::error::{MultiTargetError, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Whether the records of a container hold one target or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TestType {
    Single,
    Multi,
}

/// One tested instance: its actual target values and, per learner, the
/// predicted values and distributions.
///
/// `classes[l][t]` is learner `l`'s prediction for target `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct TestedExample {
    pub iteration_number: usize,
    pub actual_class: Vec<f64>,
    pub classes: Vec<Vec<f64>>,
    pub probabilities: Vec<Vec<Option<Distribution>>>,
    pub weight: f64,
}

impl TestedExample {
    pub fn new(iteration_number: usize, actual_class: Vec<f64>, weight: f64) -> Self {
        Self {
            iteration_number,
            actual_class,
            classes: Vec::new(),
            probabilities: Vec::new(),
            weight,
        }
    }

    /// Appends the next learner's prediction.
    pub fn add_result(&mut self, values: Vec<f64>, probabilities: Vec<Option<Distribution>>) {
        self.classes.push(values);
        self.probabilities.push(probabilities);
    }

    fn target_slice(&self, target: usize) -> TestedExample {
        TestedExample {
            iteration_number: self.iteration_number,
            actual_class: vec![self.actual_class[target]],
            classes: self.classes.iter().map(|c| vec![c[target]]).collect(),
            probabilities: self
                .probabilities
                .iter()
                .map(|p| vec![p[target].clone()])
                .collect(),
            weight: self.weight,
        }
    }
}

/// Result container: the predictions of several learners on the same test
/// instances.
///
/// `class_values[t]` holds the value names of target `t` when it is discrete
/// and `None` when it is continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentResults {
    pub number_of_iterations: usize,
    pub classifier_names: Vec<String>,
    pub class_values: Vec<Option<Vec<String>>>,
    /// Whether scorers honour the instance weights.
    pub weights: bool,
    /// Set when the results were read back rather than computed.
    pub loaded: bool,
    pub test_type: TestType,
    pub labels: Vec<String>,
    pub results: Vec<TestedExample>,
}

impl ExperimentResults {
    pub fn new(
        number_of_iterations: usize,
        classifier_names: Vec<String>,
        class_values: Vec<Option<Vec<String>>>,
        weights: bool,
        test_type: TestType,
    ) -> Self {
        Self {
            number_of_iterations,
            classifier_names,
            class_values,
            weights,
            loaded: false,
            test_type,
            labels: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Empty multi-target container over the class variables of `domain`.
    pub fn for_domain(
        domain: &Domain,
        number_of_iterations: usize,
        classifier_names: Vec<String>,
    ) -> Self {
        let class_values = domain
            .class_vars()
            .iter()
            .map(|a| match a.as_ref() {
                Attribute::Nominal(n) => Some(n.values.clone()),
                Attribute::Numeric(_) => None,
            })
            .collect();
        Self::new(
            number_of_iterations,
            classifier_names,
            class_values,
            false,
            TestType::Multi,
        )
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_weights(mut self, weights: bool) -> Self {
        self.weights = weights;
        self
    }

    pub fn number_of_learners(&self) -> usize {
        self.classifier_names.len()
    }

    pub fn number_of_targets(&self) -> usize {
        self.class_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Weight a scorer should give `example`.
    pub fn weight_of(&self, example: &TestedExample) -> f64 {
        if self.weights { example.weight } else { 1.0 }
    }

    /// Appends a record after checking it has one entry per learner and target.
    pub fn push(&mut self, example: TestedExample) -> Result<()> {
        let (learners, targets) = (self.number_of_learners(), self.number_of_targets());
        let shaped = example.actual_class.len() == targets
            && example.classes.len() == learners
            && example.probabilities.len() == learners
            && example.classes.iter().all(|c| c.len() == targets)
            && example.probabilities.iter().all(|p| p.len() == targets);
        if !shaped {
            return Err(MultiTargetError::data(format!(
                "record does not fit a container of {learners} learners and {targets} targets"
            )));
        }
        self.results.push(example);
        Ok(())
    }

    /// Single-target container exposing only target `target` of every record.
    pub fn target_view(&self, target: usize) -> Result<ExperimentResults> {
        let Some(values) = self.class_values.get(target) else {
            return Err(MultiTargetError::data(format!(
                "target {target} out of range for {} targets",
                self.number_of_targets()
            )));
        };
        Ok(ExperimentResults {
            number_of_iterations: self.number_of_iterations,
            classifier_names: self.classifier_names.clone(),
            class_values: vec![values.clone()],
            weights: self.weights,
            loaded: self.loaded,
            test_type: TestType::Single,
            labels: self.labels.clone(),
            results: self.results.iter().map(|r| r.target_slice(target)).collect(),
        })
    }

    /// Single-target container with one record per (instance, target) pair,
    /// instance-major.
    ///
    /// The value names are kept only when every target has the same ones.
    pub fn flattened(&self) -> ExperimentResults {
        let class_values = match self.class_values.split_first() {
            Some((first, rest)) if rest.iter().all(|v| v == first) => first.clone(),
            _ => None,
        };
        let results = self
            .results
            .iter()
            .flat_map(|r| (0..self.number_of_targets()).map(move |t| r.target_slice(t)))
            .collect();
        ExperimentResults {
            number_of_iterations: self.number_of_iterations,
            classifier_names: self.classifier_names.clone(),
            class_values: vec![class_values],
            weights: self.weights,
            loaded: self.loaded,
            test_type: TestType::Single,
            labels: self.labels.clone(),
            results,
        }
    }

    /// Joins containers produced for different learners on the same test
    /// instances, in the given order.
    pub fn join(parts: Vec<ExperimentResults>) -> Result<ExperimentResults> {
        let mut parts = parts.into_iter();
        let Some(mut joined) = parts.next() else {
            return Err(MultiTargetError::data("nothing to join"));
        };
        for part in parts {
            let aligned = part.results.len() == joined.results.len()
                && part.class_values == joined.class_values
                && part
                    .results
                    .iter()
                    .zip(&joined.results)
                    .all(|(a, b)| {
                        a.iteration_number == b.iteration_number
                            && a.actual_class.len() == b.actual_class.len()
                            && a.actual_class
                                .iter()
                                .zip(&b.actual_class)
                                .all(|(x, y)| x.to_bits() == y.to_bits())
                    });
            if !aligned {
                return Err(MultiTargetError::data(
                    "containers were not computed on the same test instances",
                ));
            }
            joined.classifier_names.extend(part.classifier_names);
            for (target, source) in joined.results.iter_mut().zip(part.results) {
                target.classes.extend(source.classes);
                target.probabilities.extend(source.probabilities);
            }
        }
        Ok(joined)
    }
}
