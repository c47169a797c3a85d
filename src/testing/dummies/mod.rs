pub mod datasets;

pub use datasets::{
    continuous_target_dataset, correlated_dataset, mixed_target_dataset, single_target_dataset,
    three_target_dataset,
};
