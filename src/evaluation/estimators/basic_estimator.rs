use crate::evaluation::estimators::Estimator;

/// Weighted mean: `sum(w * v) / sum(w)`.
///
/// Non-positive weights are ignored; a NaN value makes the estimation NaN.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicEstimator {
    weight: f64,
    sum: f64,
}

impl BasicEstimator {
    pub fn total_weight(&self) -> f64 {
        self.weight
    }
}

impl Estimator for BasicEstimator {
    #[inline]
    fn add(&mut self, value: f64, weight: f64) {
        if weight.is_nan() || weight <= 0.0 {
            return;
        }
        self.weight += weight;
        self.sum += value * weight;
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            f64::NAN
        }
    }
}
