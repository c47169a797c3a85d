pub mod attribute_class_observer;
pub mod naive_bayes;

pub use naive_bayes::{NaiveBayesClassifier, NaiveBayesLearner};
