pub mod imputer;

pub use imputer::{ImputingClassifier, ImputingLearner, MissingValueImputer};

use crate::classifiers::multitarget::MultiTargetLearner;

/// Transformation applied to the data a learner sees, expressed by wrapping
/// the learner itself.
pub trait Preprocessor: Send + Sync {
    fn wrap(&self, learner: Box<dyn MultiTargetLearner>) -> Box<dyn MultiTargetLearner>;
}
