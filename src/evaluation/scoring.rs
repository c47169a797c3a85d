use crate::core::distribution::Distribution;
use crate::error::{MultiTargetError, Result};
use crate::evaluation::estimators::{BasicEstimator, Estimator};
use crate::evaluation::results::{ExperimentResults, TestedExample};

/// Single-target scorer: one value per learner of a one-target container.
pub type Scorer = fn(&ExperimentResults) -> Result<Vec<f64>>;

/// Probabilities are clamped to `[LOGLOSS_EPS, 1 - LOGLOSS_EPS]` before the log.
pub const LOGLOSS_EPS: f64 = 1e-15;

fn require_single_target(res: &ExperimentResults) -> Result<()> {
    if res.is_empty() {
        return Err(MultiTargetError::data("no test results to score"));
    }
    if res.number_of_targets() != 1 {
        return Err(MultiTargetError::data(format!(
            "scorer needs a single-target container, got {} targets",
            res.number_of_targets()
        )));
    }
    Ok(())
}

/// Weighted mean of `loss` per learner, skipping records without an actual
/// value. A NaN loss, e.g. from a NaN prediction, makes that learner's score NaN.
fn per_learner<F>(res: &ExperimentResults, mut loss: F) -> Result<Vec<f64>>
where
    F: FnMut(usize, &TestedExample) -> Result<f64>,
{
    require_single_target(res)?;
    let mut estimators = vec![BasicEstimator::default(); res.number_of_learners()];
    for example in &res.results {
        if example.actual_class[0].is_nan() {
            continue;
        }
        let weight = res.weight_of(example);
        for (learner, estimator) in estimators.iter_mut().enumerate() {
            estimator.add(loss(learner, example)?, weight);
        }
    }
    Ok(estimators.iter().map(|e| e.estimation()).collect())
}

/// Discrete distribution of `learner` for the record, checked against the
/// target's number of values.
fn discrete_distribution<'a>(
    res: &ExperimentResults,
    learner: usize,
    example: &'a TestedExample,
) -> Result<&'a [f64]> {
    let incompatible = |reason: String| MultiTargetError::IncompatiblePrediction {
        learner: res.classifier_names[learner].clone(),
        reason,
    };
    let Some(values) = &res.class_values[0] else {
        return Err(incompatible(
            "probabilistic score on a continuous target".to_string(),
        ));
    };
    match &example.probabilities[learner][0] {
        Some(Distribution::Discrete(p)) if p.len() == values.len() => Ok(p),
        Some(Distribution::Discrete(p)) => Err(incompatible(format!(
            "distribution over {} values, target has {}",
            p.len(),
            values.len()
        ))),
        Some(Distribution::Continuous(_)) => {
            Err(incompatible("continuous distribution for a discrete target".to_string()))
        }
        None => Err(incompatible("no class probabilities".to_string())),
    }
}

/// Classification accuracy.
pub fn ca(res: &ExperimentResults) -> Result<Vec<f64>> {
    per_learner(res, |learner, example| {
        Ok(f64::from(u8::from(
            example.classes[learner][0] == example.actual_class[0],
        )))
    })
}

/// Brier score: squared distance between the distribution and the one-hot
/// actual value, summed over the values.
pub fn brier_score(res: &ExperimentResults) -> Result<Vec<f64>> {
    per_learner(res, |learner, example| {
        let p = discrete_distribution(res, learner, example)?;
        let actual = example.actual_class[0] as usize;
        Ok(p.iter()
            .enumerate()
            .map(|(i, &q)| {
                let hit = if i == actual { 1.0 } else { 0.0 };
                (q - hit).powi(2)
            })
            .sum())
    })
}

/// Natural-log loss of the probability given to the actual value.
pub fn logloss(res: &ExperimentResults) -> Result<Vec<f64>> {
    per_learner(res, |learner, example| {
        let p = discrete_distribution(res, learner, example)?;
        let q = p
            .get(example.actual_class[0] as usize)
            .copied()
            .unwrap_or(0.0)
            .clamp(LOGLOSS_EPS, 1.0 - LOGLOSS_EPS);
        Ok(-q.ln())
    })
}

/// Root mean squared error of the predicted values.
pub fn rmse(res: &ExperimentResults) -> Result<Vec<f64>> {
    let mse = per_learner(res, |learner, example| {
        Ok((example.classes[learner][0] - example.actual_class[0]).powi(2))
    })?;
    Ok(mse.into_iter().map(f64::sqrt).collect())
}

/// Mean absolute error of the predicted values.
pub fn mae(res: &ExperimentResults) -> Result<Vec<f64>> {
    per_learner(res, |learner, example| {
        Ok((example.classes[learner][0] - example.actual_class[0]).abs())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::results::TestType;

    fn container(class_values: Option<Vec<String>>) -> ExperimentResults {
        ExperimentResults::new(1, vec!["a".into(), "b".into()], vec![class_values], false, TestType::Single)
    }

    fn binary() -> Option<Vec<String>> {
        Some(vec!["no".into(), "yes".into()])
    }

    fn record(actual: f64, a: (f64, Vec<f64>), b: (f64, Vec<f64>), weight: f64) -> TestedExample {
        let mut ex = TestedExample::new(0, vec![actual], weight);
        ex.add_result(vec![a.0], vec![Some(Distribution::Discrete(a.1))]);
        ex.add_result(vec![b.0], vec![Some(Distribution::Discrete(b.1))]);
        ex
    }

    fn discrete() -> ExperimentResults {
        let mut res = container(binary());
        res.push(record(1.0, (1.0, vec![0.2, 0.8]), (0.0, vec![0.6, 0.4]), 1.0))
            .unwrap();
        res.push(record(0.0, (0.0, vec![0.9, 0.1]), (0.0, vec![0.5, 0.5]), 3.0))
            .unwrap();
        res
    }

    #[test]
    fn accuracy_per_learner() {
        assert_eq!(ca(&discrete()).unwrap(), vec![1.0, 0.5]);
    }

    #[test]
    fn weights_are_honoured_on_request() {
        let res = discrete().with_weights(true);
        let scores = ca(&res).unwrap();
        assert!((scores[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn brier_and_logloss() {
        let res = discrete();
        let brier = brier_score(&res).unwrap();
        // (0.04 + 0.04 + 0.01 + 0.01) / 2
        assert!((brier[0] - 0.05).abs() < 1e-12);
        let ll = logloss(&res).unwrap();
        let expected = (-(0.8f64).ln() - (0.9f64).ln()) / 2.0;
        assert!((ll[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn logloss_is_finite_for_zero_probability() {
        let mut res = container(binary());
        res.push(record(1.0, (0.0, vec![1.0, 0.0]), (1.0, vec![0.0, 1.0]), 1.0))
            .unwrap();
        let ll = logloss(&res).unwrap();
        assert!(ll[0].is_finite());
        assert!((ll[0] + LOGLOSS_EPS.ln()).abs() < 1e-9);
        assert!(ll[1] < 1e-12);
    }

    #[test]
    fn brier_on_continuous_target_is_incompatible() {
        let mut res = container(None);
        let mut ex = TestedExample::new(0, vec![1.5], 1.0);
        ex.add_result(vec![1.0], vec![None]);
        ex.add_result(vec![2.0], vec![None]);
        res.push(ex).unwrap();
        assert!(matches!(
            brier_score(&res).err(),
            Some(MultiTargetError::IncompatiblePrediction { .. })
        ));
        let err = rmse(&res).unwrap();
        assert!((err[0] - 0.5).abs() < 1e-12);
        assert!((mae(&res).unwrap()[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn nan_prediction_is_not_dropped() {
        let mut res = container(None);
        for (actual, predicted) in [(0.0, 0.0), (5.0, f64::NAN)] {
            let mut ex = TestedExample::new(0, vec![actual], 1.0);
            ex.add_result(vec![predicted], vec![None]);
            ex.add_result(vec![actual], vec![None]);
            res.push(ex).unwrap();
        }
        let err = rmse(&res).unwrap();
        assert!(err[0].is_nan());
        assert!(err[1].abs() < 1e-12);
        assert!(mae(&res).unwrap()[0].is_nan());
        assert!((ca(&res).unwrap()[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn missing_actual_value_is_skipped() {
        let mut res = container(None);
        for actual in [1.0, f64::NAN] {
            let mut ex = TestedExample::new(0, vec![actual], 1.0);
            ex.add_result(vec![1.0], vec![None]);
            ex.add_result(vec![3.0], vec![None]);
            res.push(ex).unwrap();
        }
        assert_eq!(mae(&res).unwrap(), vec![0.0, 2.0]);
    }

    #[test]
    fn empty_or_multi_target_containers_are_rejected() {
        assert!(matches!(ca(&container(binary())).err(), Some(MultiTargetError::Data(_))));
        let multi = ExperimentResults::new(1, vec!["a".into()], vec![None, None], false, TestType::Multi);
        assert!(rmse(&multi).is_err());
    }
}
