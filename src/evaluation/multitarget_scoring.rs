//! Scores of multi-target result containers.
//!
//! Averaged scoring scores every target on its own and combines the scores
//! with a weighted mean. Flattened scoring pools all (instance, target)
//! pairs into one single-target container and scores that once. The two
//! generally give different numbers.

use crate::error::{MultiTargetError, Result};
use crate::evaluation::estimators::{BasicEstimator, Estimator};
use crate::evaluation::results::ExperimentResults;
use crate::evaluation::scoring::Scorer;

/// Scorer applied to each target of a container.
#[derive(Clone)]
pub enum TargetScorers {
    /// The same scorer for every target.
    One(Scorer),
    /// One scorer per target, in class variable order.
    PerTarget(Vec<Scorer>),
}

impl TargetScorers {
    fn for_target(&self, target: usize) -> Scorer {
        match self {
            TargetScorers::One(scorer) => *scorer,
            TargetScorers::PerTarget(scorers) => scorers[target],
        }
    }
}

impl From<Scorer> for TargetScorers {
    fn from(scorer: Scorer) -> Self {
        TargetScorers::One(scorer)
    }
}

fn require_results(res: &ExperimentResults) -> Result<()> {
    if res.is_empty() {
        return Err(MultiTargetError::data("no test results to score"));
    }
    Ok(())
}

/// Weighted mean of per-target scores, one value per learner.
///
/// `weights` defaults to one per target. Targets with weight zero are not
/// scored. A negative weight turns a lower-is-better score into a
/// higher-is-better one, e.g. `[0.5, -1.0]` for accuracy and RMSE. The container itself is only read; every target is scored
/// through its own single-target view.
pub fn mt_average_score(
    res: &ExperimentResults,
    scorers: &TargetScorers,
    weights: Option<&[f64]>,
) -> Result<Vec<f64>> {
    require_results(res)?;
    if res.number_of_learners() < 1 {
        return Ok(Vec::new());
    }
    let m = res.number_of_targets();
    if let TargetScorers::PerTarget(list) = scorers {
        if list.len() != m {
            return Err(MultiTargetError::configuration(format!(
                "number of scoring methods ({}) does not match the number of targets ({m})",
                list.len()
            )));
        }
    }
    let weights = match weights {
        Some(w) if w.len() != m => {
            return Err(MultiTargetError::configuration(format!(
                "{} weights given for {m} targets",
                w.len()
            )));
        }
        Some(w) => w.to_vec(),
        None => vec![1.0; m],
    };
    if weights.iter().any(|w| !w.is_finite()) || weights.iter().sum::<f64>() == 0.0 {
        return Err(MultiTargetError::configuration(
            "target weights must be finite with a non-zero sum",
        ));
    }

    // a NaN target score makes the learner's average NaN
    let mut combined = vec![0.0; res.number_of_learners()];
    for (target, &weight) in weights.iter().enumerate() {
        if weight == 0.0 {
            continue;
        }
        let view = res.target_view(target)?;
        let scores = scorers.for_target(target)(&view)?;
        for (total, score) in combined.iter_mut().zip(scores) {
            *total += weight * score;
        }
    }
    let weight_sum: f64 = weights.iter().sum();
    Ok(combined.into_iter().map(|total| total / weight_sum).collect())
}

/// Scores the container as one single-target container holding every
/// (instance, target) pair as its own record.
pub fn mt_flattened_score(res: &ExperimentResults, scorer: Scorer) -> Result<Vec<f64>> {
    require_results(res)?;
    scorer(&res.flattened())
}

/// Share of instances whose whole predicted target vector is correct.
pub fn mt_global_accuracy(res: &ExperimentResults) -> Result<Vec<f64>> {
    require_results(res)?;
    let mut estimators = vec![BasicEstimator::default(); res.number_of_learners()];
    for example in &res.results {
        let weight = res.weight_of(example);
        for (estimator, predicted) in estimators.iter_mut().zip(&example.classes) {
            let exact = predicted == &example.actual_class;
            estimator.add(f64::from(u8::from(exact)), weight);
        }
    }
    Ok(estimators.iter().map(|e| e.estimation()).collect())
}

/// Share of correct (instance, target) pairs.
pub fn mt_mean_accuracy(res: &ExperimentResults) -> Result<Vec<f64>> {
    require_results(res)?;
    let m = res.number_of_targets();
    if m == 0 {
        return Err(MultiTargetError::data("container has no targets"));
    }
    let mut estimators = vec![BasicEstimator::default(); res.number_of_learners()];
    for example in &res.results {
        let weight = res.weight_of(example);
        for (estimator, predicted) in estimators.iter_mut().zip(&example.classes) {
            let correct = predicted
                .iter()
                .zip(&example.actual_class)
                .filter(|(p, a)| p == a)
                .count();
            estimator.add(correct as f64 / m as f64, weight);
        }
    }
    Ok(estimators.iter().map(|e| e.estimation()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distribution::Distribution;
    use crate::evaluation::results::{TestType, TestedExample};
    use crate::evaluation::scoring::{brier_score, ca, logloss, rmse};

    fn binary() -> Option<Vec<String>> {
        Some(vec!["0".into(), "1".into()])
    }

    /// Four instances over two binary targets; learner `good` errs once on
    /// target two, learner `bad` always predicts (0, 0).
    fn scenario() -> ExperimentResults {
        let mut res = ExperimentResults::new(
            1,
            vec!["good".into(), "bad".into()],
            vec![binary(), binary()],
            false,
            TestType::Multi,
        );
        let actual = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
        let good = [[0.0, 0.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        for (a, g) in actual.iter().zip(good) {
            let mut ex = TestedExample::new(0, a.to_vec(), 1.0);
            let dist = |v: f64| Some(Distribution::Discrete(if v == 0.0 { vec![0.8, 0.2] } else { vec![0.2, 0.8] }));
            ex.add_result(g.to_vec(), g.iter().map(|&v| dist(v)).collect());
            ex.add_result(vec![0.0, 0.0], vec![dist(0.0), dist(0.0)]);
            res.push(ex).unwrap();
        }
        res
    }

    #[test]
    fn global_and_mean_accuracy_on_known_predictions() {
        let res = scenario();
        let global = mt_global_accuracy(&res).unwrap();
        let mean = mt_mean_accuracy(&res).unwrap();
        assert!((global[0] - 0.75).abs() < 1e-12);
        assert!((mean[0] - 0.875).abs() < 1e-12);
        assert!((global[1] - 0.25).abs() < 1e-12);
        assert!((mean[1] - 0.5).abs() < 1e-12);
        for (g, m) in global.iter().zip(&mean) {
            assert!(g <= m);
        }
    }

    #[test]
    fn unit_weights_give_plain_mean() {
        let res = scenario();
        let per_target: Vec<Vec<f64>> = (0..2)
            .map(|t| ca(&res.target_view(t).unwrap()).unwrap())
            .collect();
        let avg = mt_average_score(&res, &TargetScorers::One(ca), None).unwrap();
        let ones = mt_average_score(&res, &TargetScorers::One(ca), Some(&[1.0, 1.0][..])).unwrap();
        for l in 0..2 {
            let expected = (per_target[0][l] + per_target[1][l]) / 2.0;
            assert!((avg[l] - expected).abs() < 1e-12);
            assert!((ones[l] - expected).abs() < 1e-12);
        }
        // mean accuracy is the unweighted average of per-target accuracy
        let mean = mt_mean_accuracy(&res).unwrap();
        assert!((avg[0] - mean[0]).abs() < 1e-12);
    }

    #[test]
    fn single_nonzero_weight_selects_that_target() {
        let res = scenario();
        let second = ca(&res.target_view(1).unwrap()).unwrap();
        let avg = mt_average_score(&res, &TargetScorers::One(ca), Some(&[0.0, 2.0][..])).unwrap();
        assert_eq!(avg, second);
    }

    #[test]
    fn mixed_sign_weights_give_weighted_mean() {
        let res = scenario();
        let first = ca(&res.target_view(0).unwrap()).unwrap();
        let second = ca(&res.target_view(1).unwrap()).unwrap();
        let avg = mt_average_score(&res, &TargetScorers::One(ca), Some(&[0.5, -1.0][..])).unwrap();
        for l in 0..2 {
            let expected = (0.5 * first[l] - second[l]) / -0.5;
            assert!((avg[l] - expected).abs() < 1e-12);
        }
        assert!(matches!(
            mt_average_score(&res, &TargetScorers::One(ca), Some(&[1.0, -1.0][..])).err(),
            Some(MultiTargetError::Configuration(_))
        ));
        assert!(mt_average_score(&res, &TargetScorers::One(ca), Some(&[f64::NAN, 1.0][..])).is_err());
    }

    #[test]
    fn per_target_scorers_must_match_target_count() {
        let res = scenario();
        let err = mt_average_score(&res, &TargetScorers::PerTarget(vec![ca]), None)
            .err()
            .unwrap();
        assert!(matches!(err, MultiTargetError::Configuration(_)));
        let ok = mt_average_score(&res, &TargetScorers::PerTarget(vec![ca, brier_score]), None);
        assert!(ok.is_ok());
        assert!(mt_average_score(&res, &TargetScorers::One(ca), Some(&[1.0][..])).is_err());
    }

    #[test]
    fn empty_container_is_a_data_error() {
        let empty = ExperimentResults::new(1, vec!["l".into()], vec![binary()], false, TestType::Multi);
        assert!(matches!(
            mt_average_score(&empty, &TargetScorers::One(ca), None).err(),
            Some(MultiTargetError::Data(_))
        ));
        assert!(mt_flattened_score(&empty, ca).is_err());
        assert!(mt_global_accuracy(&empty).is_err());
    }

    #[test]
    fn no_learners_gives_no_scores() {
        let mut res = ExperimentResults::new(1, vec![], vec![binary()], false, TestType::Multi);
        res.push(TestedExample::new(0, vec![0.0], 1.0)).unwrap();
        assert!(mt_average_score(&res, &TargetScorers::One(ca), None).unwrap().is_empty());
    }

    #[test]
    fn flattened_matches_average_for_identical_targets() {
        // both targets carry the same actual and predicted values
        let mut res = ExperimentResults::new(
            1,
            vec!["l".into()],
            vec![binary(), binary()],
            false,
            TestType::Multi,
        );
        for (a, p) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)] {
            let mut ex = TestedExample::new(0, vec![a, a], 1.0);
            let d = Some(Distribution::Discrete(vec![0.7, 0.3]));
            ex.add_result(vec![p, p], vec![d.clone(), d]);
            res.push(ex).unwrap();
        }
        for scorer in [ca as Scorer, brier_score, logloss] {
            let flat = mt_flattened_score(&res, scorer).unwrap();
            let avg = mt_average_score(&res, &TargetScorers::One(scorer), None).unwrap();
            assert!((flat[0] - avg[0]).abs() < 1e-12);
        }
    }

    #[test]
    fn flattening_changes_the_statistical_unit() {
        let mut res = ExperimentResults::new(
            1,
            vec!["l".into()],
            vec![None, None],
            false,
            TestType::Multi,
        );
        for (actual, predicted) in [([0.0, 0.0], [2.0, 0.0]), ([0.0, 0.0], [0.0, 0.0])] {
            let mut ex = TestedExample::new(0, actual.to_vec(), 1.0);
            ex.add_result(predicted.to_vec(), vec![None, None]);
            res.push(ex).unwrap();
        }
        let avg = mt_average_score(&res, &TargetScorers::One(rmse), None).unwrap();
        let flat = mt_flattened_score(&res, rmse).unwrap();
        // sqrt(2) / 2 averaged over targets vs sqrt(4 / 4) pooled
        assert!((avg[0] - 2f64.sqrt() / 2.0).abs() < 1e-12);
        assert!((flat[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scoring_leaves_the_container_untouched() {
        let res = scenario();
        let before = res.clone();
        mt_average_score(&res, &TargetScorers::One(logloss), None).unwrap();
        mt_flattened_score(&res, brier_score).unwrap();
        assert_eq!(res, before);
    }
}
