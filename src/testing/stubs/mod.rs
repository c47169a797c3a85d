pub mod learners;

pub use learners::{FailingLearner, FixedLearner, PerPositionLearner, SeenTraining, SpyLearner};
