use crate::core::domain::Domain;
use crate::core::instances::instance::Instance;
use crate::error::{MultiTargetError, Result};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DenseInstance {
    pub domain: Arc<Domain>,
    pub features: Vec<f64>,
    pub classes: Vec<f64>,
    pub weight: f64,
}

impl DenseInstance {
    pub fn new(
        domain: Arc<Domain>,
        features: Vec<f64>,
        classes: Vec<f64>,
        weight: f64,
    ) -> Result<DenseInstance> {
        if features.len() != domain.number_of_features() {
            return Err(MultiTargetError::data(format!(
                "instance has {} feature values, domain {:?} has {} features",
                features.len(),
                domain.relation_name(),
                domain.number_of_features()
            )));
        }
        if classes.len() != domain.number_of_classes() {
            return Err(MultiTargetError::data(format!(
                "instance has {} class values, domain {:?} has {} class variables",
                classes.len(),
                domain.relation_name(),
                domain.number_of_classes()
            )));
        }
        if weight.is_nan() || weight < 0.0 {
            return Err(MultiTargetError::data("weight cannot be negative"));
        }
        Ok(DenseInstance {
            domain,
            features,
            classes,
            weight,
        })
    }

    /// Query instance over a single-target domain with the class unknown.
    pub fn query(domain: Arc<Domain>, features: Vec<f64>) -> Result<DenseInstance> {
        let classes = vec![f64::NAN; domain.number_of_classes()];
        DenseInstance::new(domain, features, classes, 1.0)
    }

    pub fn set_weight(&mut self, new_value: f64) -> Result<()> {
        if new_value.is_nan() || new_value < 0.0 {
            return Err(MultiTargetError::data("weight cannot be negative"));
        }
        self.weight = new_value;
        Ok(())
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn feature_values(&self) -> &[f64] {
        &self.features
    }

    fn class_values(&self) -> &[f64] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::Attribute;

    fn domain() -> Arc<Domain> {
        Arc::new(
            Domain::new(
                "d",
                vec![Attribute::numeric("x")],
                vec![Attribute::nominal("y", &["a", "b"])],
            )
            .unwrap(),
        )
    }

    #[test]
    fn length_mismatch_is_a_data_error() {
        let err = DenseInstance::new(domain(), vec![1.0, 2.0], vec![0.0], 1.0).unwrap_err();
        assert!(matches!(err, MultiTargetError::Data(_)));
        let err = DenseInstance::new(domain(), vec![1.0], vec![], 1.0).unwrap_err();
        assert!(matches!(err, MultiTargetError::Data(_)));
    }

    #[test]
    fn query_has_missing_class() {
        let q = DenseInstance::query(domain(), vec![0.5]).unwrap();
        assert!(q.is_class_missing());
        assert!(!q.is_missing_at_index(0));
        assert!(q.is_missing_at_index(3));
    }

    #[test]
    fn negative_weight_rejected() {
        let mut i = DenseInstance::new(domain(), vec![1.0], vec![1.0], 1.0).unwrap();
        assert!(i.set_weight(-1.0).is_err());
        i.set_weight(2.5).unwrap();
        assert_eq!(i.weight(), 2.5);
        assert_eq!(i.class_value(), Some(1.0));
    }
}
