use crate::classifiers::multitarget::{MultiTargetClassifier, MultiTargetLearner};
use crate::core::sampling::fold_marks;
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};
use crate::evaluation::results::{ExperimentResults, TestedExample};
use crate::utils::random::RandomStream;
use tracing::{debug, info};

fn train_all(
    learners: &mut [Box<dyn MultiTargetLearner>],
    data: &Dataset,
) -> Result<Vec<Box<dyn MultiTargetClassifier>>> {
    learners
        .iter_mut()
        .map(|l| {
            l.train(data)
                .map_err(|e| MultiTargetError::for_learner(l.name(), e))
        })
        .collect()
}

fn test_all(
    results: &mut ExperimentResults,
    classifiers: &[Box<dyn MultiTargetClassifier>],
    test: &Dataset,
    iteration: usize,
) -> Result<()> {
    for inst in test.iter() {
        let mut example = TestedExample::new(iteration, inst.classes.clone(), inst.weight);
        for classifier in classifiers {
            let p = classifier
                .predict(inst)
                .map_err(|e| MultiTargetError::for_learner(classifier.name(), e))?;
            example.add_result(p.values, p.probabilities);
        }
        results.push(example)?;
    }
    Ok(())
}

fn names(learners: &[Box<dyn MultiTargetLearner>]) -> Vec<String> {
    learners.iter().map(|l| l.name().to_string()).collect()
}

/// Trains every learner on `train` and records their predictions on `test`.
pub fn test_on_test_data(
    learners: &mut [Box<dyn MultiTargetLearner>],
    train: &Dataset,
    test: &Dataset,
) -> Result<ExperimentResults> {
    if train.domain().class_vars() != test.domain().class_vars() {
        return Err(MultiTargetError::data(
            "training and test data have different class variables",
        ));
    }
    let mut results = ExperimentResults::for_domain(train.domain(), 1, names(learners));
    let classifiers = train_all(learners, train)?;
    test_all(&mut results, &classifiers, test, 0)?;
    info!(learners = learners.len(), instances = test.len(), "tested on test data");
    Ok(results)
}

/// `folds`-fold cross-validation; the fold assignment is drawn from a stream
/// seeded with `seed`, so equal seeds give equal folds.
///
/// Records are grouped by fold and carry the fold index as iteration number.
pub fn cross_validation(
    learners: &mut [Box<dyn MultiTargetLearner>],
    data: &Dataset,
    folds: usize,
    seed: u64,
) -> Result<ExperimentResults> {
    let marks = fold_marks(data.len(), folds, &mut RandomStream::new(seed))?;
    let mut results = ExperimentResults::for_domain(data.domain(), folds, names(learners));
    for fold in 0..folds {
        let train = data.select_unmarked(&marks, fold)?;
        let test = data.select_marked(&marks, fold)?;
        let classifiers = train_all(learners, &train)?;
        test_all(&mut results, &classifiers, &test, fold)?;
        debug!(fold, train = train.len(), test = test.len(), "fold evaluated");
    }
    info!(learners = learners.len(), folds, "cross-validation finished");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::bayes::NaiveBayesLearner;
    use crate::classifiers::majority::MajorityLearner;
    use crate::classifiers::multitarget::{BinaryRelevanceLearner, ClassifierChainLearner};
    use crate::evaluation::results::TestType;
    use crate::testing::{FailingLearner, correlated_dataset};
    use std::sync::Arc;

    fn learners() -> Vec<Box<dyn MultiTargetLearner>> {
        vec![
            Box::new(BinaryRelevanceLearner::new(Some(Arc::new(MajorityLearner::new()))).unwrap()),
            Box::new(
                ClassifierChainLearner::new(Some(Arc::new(NaiveBayesLearner::new()))).unwrap(),
            ),
        ]
    }

    #[test]
    fn test_on_test_data_records_every_instance() {
        let data = correlated_dataset();
        let res = test_on_test_data(&mut learners(), &data, &data).unwrap();
        assert_eq!(res.results.len(), data.len());
        assert_eq!(res.classifier_names, vec!["Binary Relevance", "Classifier Chain"]);
        assert_eq!(res.test_type, TestType::Multi);
        assert_eq!(res.number_of_targets(), 2);
        // the chain separates the data perfectly
        for ex in &res.results {
            assert_eq!(ex.classes[1], ex.actual_class);
        }
    }

    #[test]
    fn cross_validation_covers_every_instance_once() {
        let data = correlated_dataset();
        let res = cross_validation(&mut learners(), &data, 4, 42).unwrap();
        assert_eq!(res.results.len(), data.len());
        assert_eq!(res.number_of_iterations, 4);
        for fold in 0..4 {
            let n = res.results.iter().filter(|r| r.iteration_number == fold).count();
            assert_eq!(n, 2);
        }
        let again = cross_validation(&mut learners(), &data, 4, 42).unwrap();
        assert_eq!(res, again);
    }

    #[test]
    fn training_failure_names_the_learner() {
        let data = correlated_dataset();
        let mut learners: Vec<Box<dyn MultiTargetLearner>> = vec![Box::new(
            BinaryRelevanceLearner::new(Some(Arc::new(FailingLearner::new("boom"))))
                .unwrap()
                .with_name("broken"),
        )];
        let err = test_on_test_data(&mut learners, &data, &data).err().unwrap();
        let MultiTargetError::Learner { learner, .. } = err else {
            panic!("expected a learner error");
        };
        assert_eq!(learner, "broken");
    }

    #[test]
    fn too_few_instances_for_folds() {
        let data = correlated_dataset();
        assert!(cross_validation(&mut learners(), &data, 20, 1).is_err());
    }
}
