use crate::classifiers::multitarget::learner::require_targets;
use crate::classifiers::multitarget::{MultiTargetLearner, MultiTargetPrediction};
use crate::core::attributes::Attribute;
use crate::core::distribution::Distribution;
use crate::core::domain::Domain;
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};
use crate::evaluation::measurement::Measurement;
use crate::evaluation::multitarget_scoring::{
    TargetScorers, mt_average_score, mt_flattened_score, mt_global_accuracy, mt_mean_accuracy,
};
use crate::evaluation::results::ExperimentResults;
use crate::evaluation::scoring::{brier_score, logloss, rmse};
use crate::preprocessing::Preprocessor;
use crate::tasks::testing::cross_validation;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_FOLDS: usize = 10;
pub const DEFAULT_SEED: u64 = 42;

/// Cross-validates a set of learners on one dataset.
///
/// Every learner is first probed: trained on the first `min(2 * features, n)`
/// instances and asked to predict them, and its predictions are checked
/// against the kinds of the class variables. A learner that fails the probe
/// or the cross-validation is recorded with its error and left out of the
/// results; the others are still evaluated.
pub struct MultiTargetEvaluator {
    learners: Vec<(String, Box<dyn MultiTargetLearner>)>,
    preprocessor: Option<Arc<dyn Preprocessor>>,
    folds: usize,
    seed: u64,
}

/// Outcome of [`MultiTargetEvaluator::evaluate`].
pub struct Evaluation {
    /// Per learner id: `Ok` when evaluated, otherwise why it was left out.
    pub outcomes: BTreeMap<String, Result<()>>,
    /// Results of the evaluated learners, named by id, in insertion order.
    pub results: Option<ExperimentResults>,
}

impl Evaluation {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &MultiTargetError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| outcome.as_ref().err().map(|e| (id.as_str(), e)))
    }

    pub fn score_table(&self) -> Vec<LearnerScores> {
        self.results.as_ref().map(score_table).unwrap_or_default()
    }
}

/// Scores of one learner, in table column order.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerScores {
    pub learner: String,
    pub measurements: Vec<Measurement>,
}

impl Default for MultiTargetEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiTargetEvaluator {
    pub fn new() -> Self {
        Self {
            learners: Vec::new(),
            preprocessor: None,
            folds: DEFAULT_FOLDS,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Applied to learners added after this call.
    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn Preprocessor>) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    pub fn add_learner<S: Into<String>>(
        &mut self,
        id: S,
        learner: Box<dyn MultiTargetLearner>,
    ) -> Result<()> {
        let id = id.into();
        if self.learners.iter().any(|(existing, _)| *existing == id) {
            return Err(MultiTargetError::configuration(format!(
                "learner id {id:?} is already taken"
            )));
        }
        let learner = match &self.preprocessor {
            Some(p) => p.wrap(learner),
            None => learner,
        };
        self.learners.push((id, learner));
        Ok(())
    }

    pub fn learner_ids(&self) -> Vec<&str> {
        self.learners.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn evaluate(&mut self, data: &Dataset) -> Result<Evaluation> {
        require_targets(data)?;
        if data.len() < self.folds {
            return Err(MultiTargetError::data(format!(
                "{} instances are too few for {}-fold cross-validation",
                data.len(),
                self.folds
            )));
        }
        let probe_size = (2 * data.domain().number_of_features())
            .max(1)
            .min(data.len());
        let probe = data.select(&(0..probe_size).collect::<Vec<_>>())?;

        let mut outcomes = BTreeMap::new();
        let mut parts = Vec::new();
        for (id, learner) in self.learners.iter_mut() {
            let evaluated = probe_learner(learner.as_mut(), &probe).and_then(|()| {
                cross_validation(std::slice::from_mut(learner), data, self.folds, self.seed)
            });
            match evaluated {
                Ok(mut part) => {
                    part.classifier_names = vec![id.clone()];
                    parts.push(part);
                    outcomes.insert(id.clone(), Ok(()));
                }
                Err(e) => {
                    let e = match e {
                        MultiTargetError::Learner { source, .. } => {
                            MultiTargetError::for_learner(id.as_str(), *source)
                        }
                        other => MultiTargetError::for_learner(id.as_str(), other),
                    };
                    warn!(learner = %id, error = %e, "learner left out of evaluation");
                    outcomes.insert(id.clone(), Err(e));
                }
            }
        }

        let results = if parts.is_empty() {
            None
        } else {
            Some(ExperimentResults::join(parts)?)
        };
        info!(
            evaluated = outcomes.values().filter(|o| o.is_ok()).count(),
            failed = outcomes.values().filter(|o| o.is_err()).count(),
            "evaluation finished"
        );
        Ok(Evaluation { outcomes, results })
    }
}

fn probe_learner(learner: &mut dyn MultiTargetLearner, probe: &Dataset) -> Result<()> {
    let classifier = learner.train(probe)?;
    for inst in probe.iter() {
        let p = classifier.predict(inst)?;
        check_prediction(probe.domain(), &p).map_err(|reason| {
            MultiTargetError::IncompatiblePrediction {
                learner: learner.name().to_string(),
                reason,
            }
        })?;
    }
    Ok(())
}

/// Checks that a prediction has the shape and kinds the class variables call for.
fn check_prediction(domain: &Domain, p: &MultiTargetPrediction) -> std::result::Result<(), String> {
    let m = domain.number_of_classes();
    if p.values.len() != m || p.probabilities.len() != m {
        return Err(format!("expected {m} predicted targets, got {}", p.values.len()));
    }
    for ((class_var, &value), distribution) in
        domain.class_vars().iter().zip(&p.values).zip(&p.probabilities)
    {
        match (class_var.as_ref(), distribution) {
            (Attribute::Nominal(n), d) => {
                let k = n.number_of_values();
                let in_range = value.is_nan()
                    || (value.fract() == 0.0 && value >= 0.0 && (value as usize) < k);
                if !in_range {
                    return Err(format!("value {value} is not a category of {:?}", n.name));
                }
                match d {
                    None => {}
                    Some(Distribution::Discrete(q)) if q.len() == k => {}
                    Some(_) => {
                        return Err(format!(
                            "discrete target {:?} needs a distribution over {k} values",
                            n.name
                        ));
                    }
                }
            }
            (Attribute::Numeric(n), Some(Distribution::Discrete(_))) => {
                return Err(format!(
                    "continuous target {:?} got a discrete distribution",
                    n.name
                ));
            }
            (Attribute::Numeric(_), _) => {}
        }
    }
    Ok(())
}

type ScoreFn = Box<dyn Fn(&ExperimentResults) -> Result<Vec<f64>>>;

/// Summary scores per learner.
///
/// All-discrete targets get log loss and Brier score (averaged and flattened)
/// plus global and mean accuracy; otherwise averaged and flattened RMSE. A
/// score that cannot be computed is NaN for every learner.
pub fn score_table(results: &ExperimentResults) -> Vec<LearnerScores> {
    let discrete = results.class_values.iter().all(Option::is_some);
    let mut columns: Vec<(&str, ScoreFn)> = Vec::new();
    if discrete {
        columns.push((
            "Logloss (average)",
            Box::new(|r: &ExperimentResults| {
                mt_average_score(r, &TargetScorers::One(logloss), None)
            }),
        ));
        columns.push((
            "Logloss (flattened)",
            Box::new(|r: &ExperimentResults| mt_flattened_score(r, logloss)),
        ));
        columns.push(("Global accuracy", Box::new(mt_global_accuracy)));
        columns.push(("Mean accuracy", Box::new(mt_mean_accuracy)));
        columns.push((
            "Brier (average)",
            Box::new(|r: &ExperimentResults| {
                mt_average_score(r, &TargetScorers::One(brier_score), None)
            }),
        ));
        columns.push((
            "Brier (flattened)",
            Box::new(|r: &ExperimentResults| mt_flattened_score(r, brier_score)),
        ));
    } else {
        columns.push((
            "RMSE (average)",
            Box::new(|r: &ExperimentResults| mt_average_score(r, &TargetScorers::One(rmse), None)),
        ));
        columns.push((
            "RMSE (flattened)",
            Box::new(|r: &ExperimentResults| mt_flattened_score(r, rmse)),
        ));
    }

    let n = results.number_of_learners();
    let mut table: Vec<LearnerScores> = results
        .classifier_names
        .iter()
        .map(|name| LearnerScores {
            learner: name.clone(),
            measurements: Vec::with_capacity(columns.len()),
        })
        .collect();
    for (name, score) in &columns {
        let values = match score(results) {
            Ok(values) if values.len() == n => values,
            Ok(values) => {
                warn!(score = *name, got = values.len(), expected = n, "score has wrong arity");
                vec![f64::NAN; n]
            }
            Err(e) => {
                warn!(score = *name, error = %e, "score could not be computed");
                vec![f64::NAN; n]
            }
        };
        for (row, value) in table.iter_mut().zip(values) {
            row.measurements.push(Measurement::new(*name, value));
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::bayes::NaiveBayesLearner;
    use crate::classifiers::knn::KNearestLearner;
    use crate::classifiers::multitarget::{
        BinaryRelevanceLearner, ClassifierChainLearner, EnsembleClassifierChainLearner,
    };
    use crate::preprocessing::MissingValueImputer;
    use crate::testing::{
        FailingLearner, FixedLearner, continuous_target_dataset, correlated_dataset,
        mixed_target_dataset,
    };

    fn br(learner: impl crate::classifiers::classifier::Learner + 'static) -> Box<dyn MultiTargetLearner> {
        Box::new(BinaryRelevanceLearner::new(Some(Arc::new(learner))).unwrap())
    }

    #[test]
    fn failing_learners_are_contained() {
        let mut evaluator = MultiTargetEvaluator::new().with_folds(4);
        evaluator
            .add_learner(
                "chain",
                Box::new(
                    ClassifierChainLearner::new(Some(Arc::new(NaiveBayesLearner::new()))).unwrap(),
                ),
            )
            .unwrap();
        evaluator.add_learner("broken", br(FailingLearner::new("boom"))).unwrap();
        evaluator
            .add_learner(
                "wrong-kind",
                br(FixedLearner::new(0.0, Some(Distribution::point(0.0)))),
            )
            .unwrap();
        evaluator.add_learner("nb", br(NaiveBayesLearner::new())).unwrap();

        let evaluation = evaluator.evaluate(&correlated_dataset()).unwrap();
        assert!(evaluation.outcomes["chain"].is_ok());
        assert!(evaluation.outcomes["nb"].is_ok());
        let failed: Vec<&str> = evaluation.failures().map(|(id, _)| id).collect();
        assert_eq!(failed, vec!["broken", "wrong-kind"]);
        let Err(MultiTargetError::Learner { source, .. }) = &evaluation.outcomes["wrong-kind"]
        else {
            panic!("expected a learner error");
        };
        assert!(matches!(**source, MultiTargetError::IncompatiblePrediction { .. }));

        let results = evaluation.results.as_ref().unwrap();
        assert_eq!(results.classifier_names, vec!["chain", "nb"]);
        assert_eq!(results.results.len(), 8);
    }

    #[test]
    fn discrete_score_table() {
        let mut evaluator = MultiTargetEvaluator::new().with_folds(2);
        evaluator.add_learner("nb", br(NaiveBayesLearner::new())).unwrap();
        evaluator
            .add_learner(
                "ecc",
                Box::new(
                    EnsembleClassifierChainLearner::new(Some(Arc::new(NaiveBayesLearner::new())))
                        .unwrap()
                        .with_n_chains(3)
                        .unwrap()
                        .with_sample_size(1.0)
                        .unwrap(),
                ),
            )
            .unwrap();
        let table = evaluator.evaluate(&correlated_dataset()).unwrap().score_table();
        assert_eq!(table.len(), 2);
        let names: Vec<&str> = table[0].measurements.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Logloss (average)",
                "Logloss (flattened)",
                "Global accuracy",
                "Mean accuracy",
                "Brier (average)",
                "Brier (flattened)"
            ]
        );
        for row in &table {
            assert!(row.measurements.iter().all(|m| m.value.is_finite()));
            assert!(row.measurements[2].value <= row.measurements[3].value);
        }
    }

    #[test]
    fn failing_score_becomes_nan() {
        let mut evaluator = MultiTargetEvaluator::new().with_folds(2);
        evaluator.add_learner("crisp", br(FixedLearner::value_only(0.0))).unwrap();
        let table = evaluator.evaluate(&correlated_dataset()).unwrap().score_table();
        let brier = &table[0].measurements[4];
        assert_eq!(brier.name, "Brier (average)");
        assert!(brier.value.is_nan());
        assert!(table[0].measurements[2].value.is_finite());
    }

    #[test]
    fn regression_score_table() {
        let mut evaluator = MultiTargetEvaluator::new().with_folds(2);
        evaluator.add_learner("knn", br(KNearestLearner::new(1).unwrap())).unwrap();
        let table = evaluator.evaluate(&continuous_target_dataset()).unwrap().score_table();
        let names: Vec<&str> = table[0].measurements.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["RMSE (average)", "RMSE (flattened)"]);
        assert!(table[0].measurements[0].value >= 0.0);
    }

    #[test]
    fn preprocessor_wraps_later_learners() {
        let mut evaluator = MultiTargetEvaluator::new()
            .with_folds(2)
            .with_preprocessor(Arc::new(MissingValueImputer));
        evaluator.add_learner("knn", br(KNearestLearner::new(3).unwrap())).unwrap();
        let evaluation = evaluator.evaluate(&mixed_target_dataset()).unwrap();
        assert!(evaluation.outcomes["knn"].is_ok());
    }

    #[test]
    fn setup_errors() {
        let mut evaluator = MultiTargetEvaluator::new();
        evaluator.add_learner("a", br(NaiveBayesLearner::new())).unwrap();
        assert!(matches!(
            evaluator.add_learner("a", br(NaiveBayesLearner::new())),
            Err(MultiTargetError::Configuration(_))
        ));
        // ten folds over eight instances
        assert!(matches!(
            evaluator.evaluate(&correlated_dataset()).err(),
            Some(MultiTargetError::Data(_))
        ));
    }

    #[test]
    fn probe_rejects_out_of_range_values() {
        let data = correlated_dataset();
        let p = MultiTargetPrediction {
            values: vec![2.0, 0.0],
            probabilities: vec![None, None],
        };
        assert!(check_prediction(data.domain(), &p).is_err());
        let p = MultiTargetPrediction {
            values: vec![f64::NAN, 1.0],
            probabilities: vec![None, Some(Distribution::Discrete(vec![0.0, 1.0]))],
        };
        assert!(check_prediction(data.domain(), &p).is_ok());
    }
}
