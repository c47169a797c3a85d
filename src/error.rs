use thiserror::Error;

pub type Result<T> = std::result::Result<T, MultiTargetError>;

/// Errors raised by learners, classifiers and scorers.
///
/// Configuration and data errors are raised before any computation starts;
/// nothing in the crate silently falls back to a default value.
#[derive(Debug, Error)]
pub enum MultiTargetError {
    /// Missing base learner, mismatched scorer count, empty ensemble,
    /// invalid class order and similar setup mistakes.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Dataset or result container unsuitable for the requested operation.
    #[error("data error: {0}")]
    Data(String),

    /// A prediction whose kind does not match the target it was made for.
    #[error("learner {learner:?} produced incompatible predictions: {reason}")]
    IncompatiblePrediction { learner: String, reason: String },

    /// Failure attributed to a named learner during batch evaluation.
    #[error("learner {learner:?} ends with exception: {source}")]
    Learner {
        learner: String,
        #[source]
        source: Box<MultiTargetError>,
    },
}

impl MultiTargetError {
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn data<S: Into<String>>(msg: S) -> Self {
        Self::Data(msg.into())
    }

    pub fn for_learner<S: Into<String>>(learner: S, source: MultiTargetError) -> Self {
        Self::Learner {
            learner: learner.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learner_error_names_learner_and_cause() {
        let err = MultiTargetError::for_learner("chain", MultiTargetError::data("no targets"));
        let text = err.to_string();
        assert!(text.contains("\"chain\""));
        assert!(text.contains("no targets"));
    }
}
