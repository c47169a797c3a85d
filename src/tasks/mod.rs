pub mod multitarget_evaluator;
pub mod testing;

pub use multitarget_evaluator::{Evaluation, LearnerScores, MultiTargetEvaluator, score_table};
pub use testing::{cross_validation, test_on_test_data};
