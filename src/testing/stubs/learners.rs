use crate::classifiers::classifier::{Classifier, Learner, TargetPrediction};
use crate::classifiers::majority::MajorityLearner;
use crate::core::distribution::Distribution;
use crate::core::instances::Instance;
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a [`SpyLearner`] was trained on.
#[derive(Debug, Clone)]
pub struct SeenTraining {
    pub features: Vec<String>,
    pub target: String,
    pub rows: Vec<Vec<f64>>,
}

impl SeenTraining {
    pub fn last_feature_column(&self) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.last().copied().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Records every training call, then trains a [`MajorityLearner`].
pub struct SpyLearner {
    inner: MajorityLearner,
    seen: Arc<Mutex<Vec<SeenTraining>>>,
}

impl SpyLearner {
    pub fn new() -> (Self, Arc<Mutex<Vec<SeenTraining>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let spy = Self {
            inner: MajorityLearner::new().with_name("Spy"),
            seen: Arc::clone(&seen),
        };
        (spy, seen)
    }
}

impl Learner for SpyLearner {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn train(&self, data: &Dataset) -> Result<Box<dyn Classifier>> {
        let domain = data.domain();
        let record = SeenTraining {
            features: domain.features().iter().map(|a| a.name().to_string()).collect(),
            target: domain.class_attribute()?.name().to_string(),
            rows: data.iter().map(|i| i.features.clone()).collect(),
        };
        self.seen
            .lock()
            .map_err(|_| MultiTargetError::data("spy record poisoned"))?
            .push(record);
        self.inner.train(data)
    }
}

/// Trains classifiers that always return the same prediction.
#[derive(Debug, Clone)]
pub struct FixedLearner {
    prediction: TargetPrediction,
}

impl FixedLearner {
    pub fn new(value: f64, distribution: Option<Distribution>) -> Self {
        Self {
            prediction: TargetPrediction::new(value, distribution),
        }
    }

    pub fn discrete(value: f64, probabilities: Vec<f64>) -> Self {
        Self::new(value, Some(Distribution::Discrete(probabilities)))
    }

    pub fn value_only(value: f64) -> Self {
        Self::new(value, None)
    }
}

impl Learner for FixedLearner {
    fn name(&self) -> &str {
        "Fixed"
    }

    fn train(&self, _data: &Dataset) -> Result<Box<dyn Classifier>> {
        Ok(Box::new(FixedClassifier {
            prediction: self.prediction.clone(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct FixedClassifier {
    prediction: TargetPrediction,
}

impl Classifier for FixedClassifier {
    fn predict(&self, _instance: &dyn Instance) -> Result<TargetPrediction> {
        Ok(self.prediction.clone())
    }
}

/// Delegates the n-th training call to the n-th learner, cycling.
pub struct PerPositionLearner {
    learners: Vec<Arc<dyn Learner>>,
    calls: AtomicUsize,
}

impl PerPositionLearner {
    pub fn new(learners: Vec<Arc<dyn Learner>>) -> Self {
        Self {
            learners,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Learner for PerPositionLearner {
    fn name(&self) -> &str {
        "Per position"
    }

    fn train(&self, data: &Dataset) -> Result<Box<dyn Classifier>> {
        if self.learners.is_empty() {
            return Err(MultiTargetError::configuration("no learners to delegate to"));
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.learners[call % self.learners.len()].train(data)
    }
}

/// Fails every training call with a data error.
#[derive(Debug, Clone)]
pub struct FailingLearner {
    message: String,
}

impl FailingLearner {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Learner for FailingLearner {
    fn name(&self) -> &str {
        "Failing"
    }

    fn train(&self, _data: &Dataset) -> Result<Box<dyn Classifier>> {
        Err(MultiTargetError::data(self.message.clone()))
    }
}
