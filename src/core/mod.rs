pub mod attributes;
pub mod dataset;
pub mod distribution;
pub mod domain;
pub mod estimators;
pub mod instances;
pub mod sampling;

pub use dataset::Dataset;
pub use distribution::Distribution;
pub use domain::Domain;
