mod base_learner_choice;
mod experiment;
mod multitarget_choice;

pub use base_learner_choice::*;
pub use experiment::*;
pub use multitarget_choice::*;
