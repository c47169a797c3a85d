use std::f64::consts::PI;

/// Weighted running mean and variance (West's incremental update).
#[derive(Debug, Clone, Default)]
pub struct GaussianEstimator {
    weight_sum: f64,
    mean: f64,
    variance_sum: f64,
}

/// Standard deviation floor so a constant column still yields a usable density.
const MIN_STD_DEV: f64 = 1e-6;

impl GaussianEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observation(&mut self, value: f64, weight: f64) {
        if value.is_nan() || !weight.is_finite() || weight <= 0.0 {
            return;
        }
        if self.weight_sum > 0.0 {
            self.weight_sum += weight;
            let last_mean = self.mean;
            self.mean += weight * (value - last_mean) / self.weight_sum;
            self.variance_sum += weight * (value - last_mean) * (value - self.mean);
        } else {
            self.mean = value;
            self.weight_sum = weight;
        }
    }

    pub fn total_weight_observed(&self) -> f64 {
        self.weight_sum
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        if self.weight_sum > 1.0 {
            self.variance_sum / (self.weight_sum - 1.0)
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn probability_density(&self, value: f64) -> f64 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        let sd = self.std_dev().max(MIN_STD_DEV);
        let diff = value - self.mean;
        (1.0 / ((2.0 * PI).sqrt() * sd)) * (-(diff * diff) / (2.0 * sd * sd)).exp()
    }
}
