use crate::error::MultiTargetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("learner {0:?} has no base learner")]
    MissingBaseLearner(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    MultiTarget(#[from] MultiTargetError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
