pub mod classifiers;
pub mod config;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod logging;
pub mod preprocessing;
pub mod tasks;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{MultiTargetError, Result};
