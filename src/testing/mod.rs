pub mod dummies;
pub mod stubs;

pub use dummies::{
    continuous_target_dataset, correlated_dataset, mixed_target_dataset, single_target_dataset,
    three_target_dataset,
};
pub use stubs::{FailingLearner, FixedLearner, PerPositionLearner, SeenTraining, SpyLearner};
