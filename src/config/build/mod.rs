mod error;
mod evaluator;
mod learners;

pub use error::BuildError;

pub use evaluator::build_evaluator;
pub use learners::{build_base_learner, build_multitarget_learner};
