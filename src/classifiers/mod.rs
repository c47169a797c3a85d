pub mod bayes;
pub mod classifier;
pub mod knn;
pub mod majority;
pub mod multitarget;

pub use bayes::NaiveBayesLearner;
pub use classifier::{Classifier, Learner, Prediction, ResultType, TargetPrediction};
pub use knn::KNearestLearner;
pub use majority::MajorityLearner;
