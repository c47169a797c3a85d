use crate::core::domain::Domain;

/// Read access to one example: feature values, class values and weight.
///
/// Nominal values are category indices stored as `f64`; `NaN` marks a
/// missing value (including the not-yet-predicted class of a query).
pub trait Instance {
    fn weight(&self) -> f64;

    fn domain(&self) -> &Domain;

    fn feature_values(&self) -> &[f64];

    fn class_values(&self) -> &[f64];

    fn feature_at(&self, index: usize) -> Option<f64> {
        self.feature_values().get(index).copied()
    }

    fn class_at(&self, index: usize) -> Option<f64> {
        self.class_values().get(index).copied()
    }

    /// Class value of a single-target instance.
    fn class_value(&self) -> Option<f64> {
        self.class_at(0)
    }

    fn is_class_missing(&self) -> bool {
        self.class_value().is_none_or(f64::is_nan)
    }

    fn is_missing_at_index(&self, index: usize) -> bool {
        self.feature_at(index).is_none_or(f64::is_nan)
    }
}
