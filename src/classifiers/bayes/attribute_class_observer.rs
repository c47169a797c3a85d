use crate::core::estimators::GaussianEstimator;

/// Per-feature statistics conditioned on the class, used by naive Bayes.
pub trait AttributeClassObserver: Send + Sync {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64);

    /// `P(att_val | class_val)`, or `None` when nothing was observed for the class.
    fn probability_of_attribute_value_given_class(&self, att_val: f64, class_val: usize)
    -> Option<f64>;
}

/// Laplace-smoothed value counts of a nominal feature, per class.
#[derive(Debug, Clone)]
pub struct NominalAttributeClassObserver {
    number_of_values: usize,
    counts_per_class: Vec<Vec<f64>>,
}

impl NominalAttributeClassObserver {
    pub fn new(number_of_values: usize) -> Self {
        Self {
            number_of_values,
            counts_per_class: Vec::new(),
        }
    }
}

impl AttributeClassObserver for NominalAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        if att_val.is_nan() || att_val < 0.0 || weight.is_nan() || weight <= 0.0 {
            return;
        }
        let v = att_val as usize;
        if v >= self.number_of_values {
            return;
        }
        if class_val >= self.counts_per_class.len() {
            self.counts_per_class
                .resize_with(class_val + 1, || vec![0.0; self.number_of_values]);
        }
        self.counts_per_class[class_val][v] += weight;
    }

    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
    ) -> Option<f64> {
        if att_val.is_nan() || att_val < 0.0 {
            return None;
        }
        let counts = self.counts_per_class.get(class_val)?;
        let count = counts.get(att_val as usize).copied().unwrap_or(0.0);
        let total: f64 = counts.iter().sum();
        Some((count + 1.0) / (total + self.number_of_values as f64))
    }
}

/// One Gaussian per class for a numeric feature.
#[derive(Debug, Clone, Default)]
pub struct GaussianNumericAttributeClassObserver {
    estimator_per_class: Vec<Option<GaussianEstimator>>,
}

impl GaussianNumericAttributeClassObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttributeClassObserver for GaussianNumericAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        if att_val.is_nan() || weight.is_nan() || weight <= 0.0 {
            return;
        }
        if class_val >= self.estimator_per_class.len() {
            self.estimator_per_class.resize_with(class_val + 1, || None);
        }
        self.estimator_per_class[class_val]
            .get_or_insert_with(GaussianEstimator::new)
            .add_observation(att_val, weight);
    }

    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
    ) -> Option<f64> {
        if att_val.is_nan() {
            return None;
        }
        match self.estimator_per_class.get(class_val) {
            Some(Some(est)) => Some(est.probability_density(att_val)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_counts_are_smoothed() {
        let mut obs = NominalAttributeClassObserver::new(3);
        obs.observe_attribute_class(0.0, 1, 1.0);
        obs.observe_attribute_class(0.0, 1, 1.0);
        obs.observe_attribute_class(2.0, 1, 1.0);
        // (2 + 1) / (3 + 3)
        let p = obs.probability_of_attribute_value_given_class(0.0, 1).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
        // unseen value still gets mass
        let p = obs.probability_of_attribute_value_given_class(1.0, 1).unwrap();
        assert!((p - 1.0 / 6.0).abs() < 1e-12);
        assert!(obs.probability_of_attribute_value_given_class(0.0, 5).is_none());
    }

    #[test]
    fn gaussian_starts_empty_and_peaks_at_mean() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        assert!(obs.probability_of_attribute_value_given_class(0.0, 0).is_none());
        for v in [1.0, 2.0, 3.0] {
            obs.observe_attribute_class(v, 0, 1.0);
        }
        let center = obs.probability_of_attribute_value_given_class(2.0, 0).unwrap();
        let far = obs.probability_of_attribute_value_given_class(6.0, 0).unwrap();
        assert!(center > far);
        assert!(obs.probability_of_attribute_value_given_class(2.0, 1).is_none());
    }

    #[test]
    fn non_positive_weights_are_ignored() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        obs.observe_attribute_class(1.0, 0, 0.0);
        obs.observe_attribute_class(1.0, 0, f64::NAN);
        assert!(obs.probability_of_attribute_value_given_class(1.0, 0).is_none());
    }
}
