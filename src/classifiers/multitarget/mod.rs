pub mod binary;
pub mod chain;
pub mod ensemble;
pub mod learner;

pub use binary::{BinaryRelevanceClassifier, BinaryRelevanceLearner};
pub use chain::{ClassifierChain, ClassifierChainLearner};
pub use ensemble::{EnsembleClassifierChain, EnsembleClassifierChainLearner};
pub use learner::{
    MultiTargetClassifier, MultiTargetLearner, MultiTargetPrediction, ProgressCallback,
};
