use crate::config::build::{BuildError, build_multitarget_learner};
use crate::config::choices::ExperimentConfig;
use crate::preprocessing::MissingValueImputer;
use crate::tasks::MultiTargetEvaluator;
use std::sync::Arc;

pub fn build_evaluator(config: ExperimentConfig) -> Result<MultiTargetEvaluator, BuildError> {
    if config.folds < 2 {
        return Err(BuildError::InvalidParameter(format!(
            "folds must be at least 2, got {}",
            config.folds
        )));
    }
    let mut evaluator = MultiTargetEvaluator::new()
        .with_folds(config.folds)
        .with_seed(config.seed);
    if config.impute_missing {
        evaluator = evaluator.with_preprocessor(Arc::new(MissingValueImputer));
    }
    for entry in config.learners {
        let learner = build_multitarget_learner(entry.learner)?;
        evaluator.add_learner(entry.id, learner)?;
    }
    Ok(evaluator)
}
