use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// Predicted probability distribution for one target.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// One probability per category, in the variable's value order.
    Discrete(Vec<f64>),
    /// Mass over observed values of a continuous variable.
    Continuous(BTreeMap<OrderedFloat<f64>, f64>),
}

impl Distribution {
    /// Unit mass at `value` of a continuous variable.
    pub fn point(value: f64) -> Distribution {
        let mut masses = BTreeMap::new();
        masses.insert(OrderedFloat(value), 1.0);
        Distribution::Continuous(masses)
    }

    pub fn continuous_from<I: IntoIterator<Item = (f64, f64)>>(pairs: I) -> Distribution {
        let mut masses: BTreeMap<OrderedFloat<f64>, f64> = BTreeMap::new();
        for (value, mass) in pairs {
            *masses.entry(OrderedFloat(value)).or_insert(0.0) += mass;
        }
        Distribution::Continuous(masses)
    }

    pub fn total(&self) -> f64 {
        match self {
            Distribution::Discrete(p) => p.iter().sum(),
            Distribution::Continuous(m) => m.values().sum(),
        }
    }

    /// Scales the masses to sum to one; a distribution without mass is
    /// left unchanged.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total <= 0.0 || !total.is_finite() {
            return;
        }
        match self {
            Distribution::Discrete(p) => p.iter_mut().for_each(|v| *v /= total),
            Distribution::Continuous(m) => m.values_mut().for_each(|v| *v /= total),
        }
    }

    /// Probability (or mass) assigned to `value`.
    pub fn probability_of(&self, value: f64) -> f64 {
        match self {
            Distribution::Discrete(p) => {
                if value.is_nan() || value < 0.0 {
                    return 0.0;
                }
                p.get(value as usize).copied().unwrap_or(0.0)
            }
            Distribution::Continuous(m) => m.get(&OrderedFloat(value)).copied().unwrap_or(0.0),
        }
    }

    /// Index (discrete) or value (continuous) with the largest mass;
    /// ties go to the first one.
    pub fn modus(&self) -> Option<f64> {
        let mut best: Option<(f64, f64)> = None;
        let candidates: Box<dyn Iterator<Item = (f64, f64)>> = match self {
            Distribution::Discrete(p) => {
                Box::new(p.iter().enumerate().map(|(i, &v)| (i as f64, v)))
            }
            Distribution::Continuous(m) => Box::new(m.iter().map(|(k, &v)| (k.0, v))),
        };
        for (key, mass) in candidates {
            if !mass.is_finite() {
                continue;
            }
            if best.is_none_or(|(_, b)| mass > b) {
                best = Some((key, mass));
            }
        }
        best.map(|(k, _)| k)
    }

    /// Mass-weighted mean of a continuous distribution.
    pub fn mean(&self) -> Option<f64> {
        match self {
            Distribution::Discrete(_) => None,
            Distribution::Continuous(m) => {
                let total: f64 = m.values().sum();
                if total > 0.0 {
                    Some(m.iter().map(|(k, v)| k.0 * v).sum::<f64>() / total)
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_discrete() {
        let mut d = Distribution::Discrete(vec![1.0, 3.0]);
        d.normalize();
        assert_eq!(d, Distribution::Discrete(vec![0.25, 0.75]));
        assert_eq!(d.modus(), Some(1.0));
    }

    #[test]
    fn zero_mass_is_left_alone() {
        let mut d = Distribution::Discrete(vec![0.0, 0.0]);
        d.normalize();
        assert_eq!(d, Distribution::Discrete(vec![0.0, 0.0]));
    }

    #[test]
    fn continuous_merges_equal_values() {
        let mut d = Distribution::continuous_from([(1.0, 1.0), (2.0, 1.0), (1.0, 2.0)]);
        d.normalize();
        assert!((d.probability_of(1.0) - 0.75).abs() < 1e-12);
        assert!((d.probability_of(2.0) - 0.25).abs() < 1e-12);
        assert_eq!(d.probability_of(3.0), 0.0);
        assert!((d.mean().unwrap() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn modus_ties_go_to_first() {
        assert_eq!(Distribution::Discrete(vec![0.4, 0.4, 0.2]).modus(), Some(0.0));
        assert_eq!(Distribution::point(3.5).modus(), Some(3.5));
    }
}
