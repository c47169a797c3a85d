pub mod estimators;
pub mod measurement;
pub mod multitarget_scoring;
pub mod results;
pub mod scoring;

pub use estimators::{BasicEstimator, Estimator};
pub use measurement::Measurement;
pub use multitarget_scoring::{
    TargetScorers, mt_average_score, mt_flattened_score, mt_global_accuracy, mt_mean_accuracy,
};
pub use results::{ExperimentResults, TestType, TestedExample};
pub use scoring::Scorer;
