use crate::core::domain::Domain;
use crate::core::instances::{DenseInstance, Instance};
use crate::error::{MultiTargetError, Result};
use std::sync::Arc;

/// Ordered instances sharing one [`Domain`].
///
/// All transformations return a new dataset; instances are copied so no two
/// live views ever share mutable state.
#[derive(Debug, Clone)]
pub struct Dataset {
    domain: Arc<Domain>,
    instances: Vec<DenseInstance>,
}

impl Dataset {
    pub fn new(domain: Arc<Domain>, instances: Vec<DenseInstance>) -> Result<Dataset> {
        for inst in &instances {
            if !Arc::ptr_eq(&inst.domain, &domain) && *inst.domain != *domain {
                return Err(MultiTargetError::data(format!(
                    "instance over {:?} does not belong to domain {:?}",
                    inst.domain.relation_name(),
                    domain.relation_name()
                )));
            }
        }
        Ok(Dataset { domain, instances })
    }

    /// Builds a dataset of unit-weight instances from `(features, classes)` rows.
    pub fn from_rows(domain: Arc<Domain>, rows: Vec<(Vec<f64>, Vec<f64>)>) -> Result<Dataset> {
        let instances = rows
            .into_iter()
            .map(|(features, classes)| {
                DenseInstance::new(Arc::clone(&domain), features, classes, 1.0)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Dataset { domain, instances })
    }

    pub fn domain(&self) -> &Arc<Domain> {
        &self.domain
    }

    pub fn instances(&self) -> &[DenseInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DenseInstance> {
        self.instances.iter()
    }

    pub fn get(&self, index: usize) -> Option<&DenseInstance> {
        self.instances.get(index)
    }

    pub fn total_weight(&self) -> f64 {
        self.instances.iter().map(|i| i.weight).sum()
    }

    /// Copies the instances at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Dataset> {
        let instances = indices
            .iter()
            .map(|&i| {
                self.instances.get(i).cloned().ok_or_else(|| {
                    MultiTargetError::data(format!(
                        "index {i} out of range for dataset of {} instances",
                        self.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Dataset {
            domain: Arc::clone(&self.domain),
            instances,
        })
    }

    /// Instances whose mark equals `fold`, in dataset order.
    pub fn select_marked(&self, marks: &[usize], fold: usize) -> Result<Dataset> {
        self.filter_marks(marks, |m| m == fold)
    }

    /// Instances whose mark differs from `fold`, in dataset order.
    pub fn select_unmarked(&self, marks: &[usize], fold: usize) -> Result<Dataset> {
        self.filter_marks(marks, |m| m != fold)
    }

    fn filter_marks(&self, marks: &[usize], keep: impl Fn(usize) -> bool) -> Result<Dataset> {
        if marks.len() != self.len() {
            return Err(MultiTargetError::data(format!(
                "{} marks given for {} instances",
                marks.len(),
                self.len()
            )));
        }
        let instances = self
            .instances
            .iter()
            .zip(marks)
            .filter(|&(_, &m)| keep(m))
            .map(|(inst, _)| inst.clone())
            .collect();
        Ok(Dataset {
            domain: Arc::clone(&self.domain),
            instances,
        })
    }

    /// Re-keys every instance to `target`, looking each variable of the new
    /// domain up by name among this dataset's features and class variables.
    pub fn project(&self, target: Arc<Domain>) -> Result<Dataset> {
        let lookup = |name: &str| -> Result<Source> {
            if let Some(i) = self.domain.index_of_feature(name) {
                Ok(Source::Feature(i))
            } else if let Some(i) = self.domain.index_of_class(name) {
                Ok(Source::Class(i))
            } else {
                Err(MultiTargetError::data(format!(
                    "variable {name:?} not found in domain {:?}",
                    self.domain.relation_name()
                )))
            }
        };
        let feature_sources = target
            .features()
            .iter()
            .map(|a| lookup(a.name()))
            .collect::<Result<Vec<_>>>()?;
        let class_sources = target
            .class_vars()
            .iter()
            .map(|a| lookup(a.name()))
            .collect::<Result<Vec<_>>>()?;

        let instances = self
            .instances
            .iter()
            .map(|inst| DenseInstance {
                domain: Arc::clone(&target),
                features: feature_sources.iter().map(|s| s.read(inst)).collect(),
                classes: class_sources.iter().map(|s| s.read(inst)).collect(),
                weight: inst.weight,
            })
            .collect();
        Ok(Dataset {
            domain: target,
            instances,
        })
    }

    /// Moves class `name` into the features, optionally replacing its column
    /// with `replacement` (one value per instance).
    pub fn promote_class(&self, name: &str, replacement: Option<Vec<f64>>) -> Result<Dataset> {
        let domain = Arc::new(self.domain.promote_class(name)?);
        let mut promoted = self.project(Arc::clone(&domain))?;
        if let Some(values) = replacement {
            if values.len() != promoted.len() {
                return Err(MultiTargetError::data(format!(
                    "{} replacement values for {} instances",
                    values.len(),
                    promoted.len()
                )));
            }
            for (inst, v) in promoted.instances.iter_mut().zip(values) {
                if let Some(last) = inst.features.last_mut() {
                    *last = v;
                }
            }
        }
        Ok(promoted)
    }
}

#[derive(Clone, Copy)]
enum Source {
    Feature(usize),
    Class(usize),
}

impl Source {
    fn read(self, inst: &DenseInstance) -> f64 {
        match self {
            Source::Feature(i) => inst.feature_at(i),
            Source::Class(i) => inst.class_at(i),
        }
        .unwrap_or(f64::NAN)
    }
}
