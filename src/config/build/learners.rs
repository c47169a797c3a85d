use crate::classifiers::bayes::NaiveBayesLearner;
use crate::classifiers::classifier::Learner;
use crate::classifiers::knn::KNearestLearner;
use crate::classifiers::majority::MajorityLearner;
use crate::classifiers::multitarget::{
    BinaryRelevanceLearner, ClassifierChainLearner, EnsembleClassifierChainLearner,
    MultiTargetLearner,
};
use crate::config::build::BuildError;
use crate::config::choices::{BaseLearnerChoice, KNearestParams, MultiTargetChoice, NoParams};
use crate::error::MultiTargetError;
use std::sync::Arc;

impl From<NoParams> for MajorityLearner {
    fn from(_: NoParams) -> Self {
        MajorityLearner::new()
    }
}

impl From<NoParams> for NaiveBayesLearner {
    fn from(_: NoParams) -> Self {
        NaiveBayesLearner::new()
    }
}

impl TryFrom<KNearestParams> for KNearestLearner {
    type Error = MultiTargetError;

    fn try_from(params: KNearestParams) -> Result<Self, Self::Error> {
        KNearestLearner::new(params.k)
    }
}

pub fn build_base_learner(choice: BaseLearnerChoice) -> Result<Arc<dyn Learner>, BuildError> {
    match choice {
        BaseLearnerChoice::Majority(p) => Ok(Arc::new(MajorityLearner::from(p))),
        BaseLearnerChoice::NaiveBayes(p) => Ok(Arc::new(NaiveBayesLearner::from(p))),
        BaseLearnerChoice::KNearest(p) => Ok(Arc::new(KNearestLearner::try_from(p)?)),
    }
}

fn base_of(name: &str, base: Option<BaseLearnerChoice>) -> Result<Arc<dyn Learner>, BuildError> {
    match base {
        Some(choice) => build_base_learner(choice),
        None => Err(BuildError::MissingBaseLearner(name.to_string())),
    }
}

pub fn build_multitarget_learner(
    choice: MultiTargetChoice,
) -> Result<Box<dyn MultiTargetLearner>, BuildError> {
    match choice {
        MultiTargetChoice::BinaryRelevance(p) => {
            let base = base_of(&p.name, p.base)?;
            Ok(Box::new(
                BinaryRelevanceLearner::new(Some(base))?.with_name(p.name),
            ))
        }
        MultiTargetChoice::ClassifierChain(p) => {
            let base = base_of(&p.name, p.base)?;
            let mut learner = ClassifierChainLearner::new(Some(base))?
                .with_name(p.name)
                .with_seed(p.seed)
                .with_actual_values(p.actual_values);
            if let Some(order) = p.class_order {
                learner = learner.with_class_order(order)?;
            }
            Ok(Box::new(learner))
        }
        MultiTargetChoice::EnsembleClassifierChain(p) => {
            if !(0.0..=1.0).contains(&p.sample_size) {
                return Err(BuildError::InvalidParameter(format!(
                    "sample_size must be in 0.0..=1.0, got {}",
                    p.sample_size
                )));
            }
            let base = base_of(&p.name, p.base)?;
            let learner = EnsembleClassifierChainLearner::new(Some(base))?
                .with_name(p.name)
                .with_n_chains(p.n_chains)?
                .with_sample_size(p.sample_size)?
                .with_actual_values(p.actual_values)
                .with_seed(p.seed);
            Ok(Box::new(learner))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::choices::{
        ClassifierChainParams, EnsembleClassifierChainParams, MultiTargetKind,
    };
    use crate::testing::{correlated_dataset, single_target_dataset};

    fn chain_params(base: Option<BaseLearnerChoice>) -> ClassifierChainParams {
        ClassifierChainParams {
            base,
            ..ClassifierChainParams::default()
        }
    }

    #[test]
    fn every_base_learner_builds() {
        let nb = build_base_learner(BaseLearnerChoice::NaiveBayes(NoParams {})).unwrap();
        assert!(nb.train(&single_target_dataset()).is_ok());
        let knn = build_base_learner(BaseLearnerChoice::KNearest(KNearestParams { k: 3 })).unwrap();
        assert_eq!(knn.name(), "3-NN");
    }

    #[test]
    fn zero_neighbours_is_rejected() {
        let err = build_base_learner(BaseLearnerChoice::KNearest(KNearestParams { k: 0 }))
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::MultiTarget(MultiTargetError::Configuration(_))));
    }

    #[test]
    fn missing_base_learner_is_reported_by_name() {
        for kind in [
            MultiTargetKind::BinaryRelevance,
            MultiTargetKind::ClassifierChain,
            MultiTargetKind::EnsembleClassifierChain,
        ] {
            let choice = MultiTargetChoice::default_for(kind);
            let name = choice.name().to_string();
            let err = build_multitarget_learner(choice).err().unwrap();
            let BuildError::MissingBaseLearner(learner) = err else {
                panic!("expected a missing base learner for {kind}");
            };
            assert_eq!(learner, name);
        }
    }

    #[test]
    fn chain_parameters_reach_the_learner() {
        let mut params = chain_params(Some(BaseLearnerChoice::NaiveBayes(NoParams {})));
        params.name = "cc".into();
        params.class_order = Some(vec!["b".into(), "a".into()]);
        let mut learner =
            build_multitarget_learner(MultiTargetChoice::ClassifierChain(params)).unwrap();
        assert_eq!(learner.name(), "cc");
        assert!(learner.train(&correlated_dataset()).is_ok());
    }

    #[test]
    fn duplicate_class_order_is_a_build_error() {
        let mut params = chain_params(Some(BaseLearnerChoice::Majority(NoParams {})));
        params.class_order = Some(vec!["a".into(), "a".into()]);
        let err = build_multitarget_learner(MultiTargetChoice::ClassifierChain(params))
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::MultiTarget(MultiTargetError::Configuration(_))));
    }

    #[test]
    fn ensemble_parameters_are_validated() {
        let base = Some(BaseLearnerChoice::Majority(NoParams {}));
        let zero = EnsembleClassifierChainParams {
            base: base.clone(),
            n_chains: 0,
            ..EnsembleClassifierChainParams::default()
        };
        assert!(build_multitarget_learner(MultiTargetChoice::EnsembleClassifierChain(zero)).is_err());

        let oversized = EnsembleClassifierChainParams {
            base: base.clone(),
            sample_size: 1.5,
            ..EnsembleClassifierChainParams::default()
        };
        let err = build_multitarget_learner(MultiTargetChoice::EnsembleClassifierChain(oversized))
            .err()
            .unwrap();
        assert!(err.to_string().contains("sample_size must be in 0.0..=1.0"));

        let ok = EnsembleClassifierChainParams {
            base,
            n_chains: 3,
            sample_size: 1.0,
            ..EnsembleClassifierChainParams::default()
        };
        let mut learner =
            build_multitarget_learner(MultiTargetChoice::EnsembleClassifierChain(ok)).unwrap();
        assert_eq!(learner.name(), "Ensemble CChain");
        assert!(learner.train(&correlated_dataset()).is_ok());
    }
}
