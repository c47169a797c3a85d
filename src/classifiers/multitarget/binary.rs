use crate::classifiers::classifier::{Classifier, Learner};
use crate::classifiers::multitarget::learner::{
    MultiTargetClassifier, MultiTargetLearner, MultiTargetPrediction, ProgressCallback,
    feature_vector, report_progress, require_targets,
};
use crate::core::domain::Domain;
use crate::core::instances::{DenseInstance, Instance};
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};
use std::sync::Arc;
use tracing::debug;

/// One independent single-target model per class variable.
///
/// Each model sees the original features only, never the other targets.
pub struct BinaryRelevanceLearner {
    name: String,
    learner: Arc<dyn Learner>,
    progress: Option<ProgressCallback>,
}

impl BinaryRelevanceLearner {
    pub fn new(learner: Option<Arc<dyn Learner>>) -> Result<Self> {
        let Some(learner) = learner else {
            return Err(MultiTargetError::configuration(
                "base learner not defined",
            ));
        };
        Ok(Self {
            name: "Binary Relevance".to_string(),
            learner,
            progress: None,
        })
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn fit(&self, data: &Dataset) -> Result<BinaryRelevanceClassifier> {
        require_targets(data)?;
        let orig_domain = Arc::clone(data.domain());
        let m = orig_domain.number_of_classes();
        let mut classifiers = Vec::with_capacity(m);
        let mut domains = Vec::with_capacity(m);

        for (i, class_var) in orig_domain.class_vars().iter().enumerate() {
            let domain = Arc::new(orig_domain.select_target(class_var)?);
            let projected = data.project(Arc::clone(&domain))?;
            classifiers.push(self.learner.train(&projected)?);
            domains.push(domain);

            let fraction = (i + 1) as f64 / m as f64;
            debug!(learner = %self.name, target = class_var.name(), fraction, "target model trained");
            report_progress(self.progress.as_ref(), fraction);
        }

        Ok(BinaryRelevanceClassifier {
            name: self.name.clone(),
            classifiers,
            domains,
            orig_domain,
        })
    }
}

impl MultiTargetLearner for BinaryRelevanceLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn train(&mut self, data: &Dataset) -> Result<Box<dyn MultiTargetClassifier>> {
        Ok(Box::new(self.fit(data)?))
    }
}

pub struct BinaryRelevanceClassifier {
    name: String,
    classifiers: Vec<Box<dyn Classifier>>,
    domains: Vec<Arc<Domain>>,
    orig_domain: Arc<Domain>,
}

impl BinaryRelevanceClassifier {
    pub fn domains(&self) -> &[Arc<Domain>] {
        &self.domains
    }
}

impl MultiTargetClassifier for BinaryRelevanceClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> &Arc<Domain> {
        &self.orig_domain
    }

    fn predict(&self, instance: &dyn Instance) -> Result<MultiTargetPrediction> {
        let features = feature_vector(instance, &self.orig_domain)?;
        let mut values = Vec::with_capacity(self.classifiers.len());
        let mut probabilities = Vec::with_capacity(self.classifiers.len());
        for (classifier, domain) in self.classifiers.iter().zip(&self.domains) {
            let query = DenseInstance::query(Arc::clone(domain), features.clone())?;
            let p = classifier.predict(&query)?;
            values.push(p.value);
            probabilities.push(p.distribution);
        }
        Ok(MultiTargetPrediction {
            values,
            probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::classifier::ResultType;
    use crate::classifiers::knn::KNearestLearner;
    use crate::classifiers::majority::MajorityLearner;
    use crate::core::attributes::Attribute;
    use crate::core::distribution::Distribution;
    use crate::testing::{SpyLearner, correlated_dataset};
    use std::sync::Mutex;

    #[test]
    fn missing_base_learner_is_a_configuration_error() {
        let err = BinaryRelevanceLearner::new(None).err().unwrap();
        assert!(matches!(err, MultiTargetError::Configuration(_)));
    }

    #[test]
    fn dataset_without_targets_is_a_data_error() {
        let domain = Arc::new(Domain::new("d", vec![Attribute::numeric("x")], vec![]).unwrap());
        let data = Dataset::from_rows(domain, vec![(vec![1.0], vec![])]).unwrap();
        let br = BinaryRelevanceLearner::new(Some(Arc::new(MajorityLearner::new()))).unwrap();
        assert!(matches!(br.fit(&data).err(), Some(MultiTargetError::Data(_))));
    }

    #[test]
    fn each_model_sees_features_and_one_target() {
        let (spy, seen) = SpyLearner::new();
        let data = correlated_dataset();
        let br = BinaryRelevanceLearner::new(Some(Arc::new(spy))).unwrap();
        br.fit(&data).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].features, vec!["x1", "x2"]);
        assert_eq!(seen[0].target, "a");
        assert_eq!(seen[1].features, vec!["x1", "x2"]);
        assert_eq!(seen[1].target, "b");
    }

    #[test]
    fn predictions_ignore_other_target_values() {
        let data = correlated_dataset();
        let br = BinaryRelevanceLearner::new(Some(Arc::new(KNearestLearner::new(1).unwrap())))
            .unwrap()
            .fit(&data)
            .unwrap();
        for inst in data.iter() {
            let base = br.predict(inst).unwrap();
            let mut altered = inst.clone();
            altered.classes = altered.classes.iter().map(|v| 1.0 - v).collect();
            assert_eq!(br.predict(&altered).unwrap(), base);
            altered.classes = vec![f64::NAN; altered.classes.len()];
            assert_eq!(br.predict(&altered).unwrap(), base);
        }
    }

    #[test]
    fn result_modes_and_progress() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let data = correlated_dataset();
        let br = BinaryRelevanceLearner::new(Some(Arc::new(MajorityLearner::new())))
            .unwrap()
            .with_progress(Arc::new(move |f| sink.lock().unwrap().push(f)))
            .fit(&data)
            .unwrap();
        assert_eq!(*calls.lock().unwrap(), vec![0.5, 1.0]);

        let inst = data.get(0).unwrap();
        let values = br.classify(inst, ResultType::Value).unwrap();
        assert_eq!(values.value().unwrap().len(), 2);
        assert!(values.probabilities().is_none());
        let probs = br.classify(inst, ResultType::Probabilities).unwrap();
        let probs = probs.probabilities().unwrap();
        assert!(matches!(probs[0], Some(Distribution::Discrete(_))));
    }
}
