use crate::core::attributes::AttributeRef;
use crate::error::{MultiTargetError, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// Schema shared by a dataset: ordered features plus ordered class variables.
///
/// A domain is never modified after construction. Re-keying operations such
/// as [`Domain::promote_class`] build a new domain and leave every existing
/// reference to the old one valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    relation_name: String,
    features: Vec<AttributeRef>,
    class_vars: Vec<AttributeRef>,
}

impl Domain {
    /// Builds a domain; variable names must be unique across features and
    /// class variables since they are used as identity keys.
    pub fn new<S: Into<String>>(
        relation_name: S,
        features: Vec<AttributeRef>,
        class_vars: Vec<AttributeRef>,
    ) -> Result<Domain> {
        let mut seen = HashSet::new();
        for attr in features.iter().chain(class_vars.iter()) {
            if !seen.insert(attr.name()) {
                return Err(MultiTargetError::configuration(format!(
                    "variable {:?} appears more than once in the domain",
                    attr.name()
                )));
            }
        }
        Ok(Domain {
            relation_name: relation_name.into(),
            features,
            class_vars,
        })
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn features(&self) -> &[AttributeRef] {
        &self.features
    }

    pub fn class_vars(&self) -> &[AttributeRef] {
        &self.class_vars
    }

    pub fn number_of_features(&self) -> usize {
        self.features.len()
    }

    pub fn number_of_classes(&self) -> usize {
        self.class_vars.len()
    }

    pub fn index_of_feature(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|a| a.name() == name)
    }

    pub fn index_of_class(&self, name: &str) -> Option<usize> {
        self.class_vars.iter().position(|a| a.name() == name)
    }

    pub fn class_var(&self, name: &str) -> Option<&AttributeRef> {
        self.class_vars.iter().find(|a| a.name() == name)
    }

    /// The single class variable of a single-target domain.
    pub fn class_attribute(&self) -> Result<&AttributeRef> {
        match self.class_vars.as_slice() {
            [class_var] => Ok(class_var),
            other => Err(MultiTargetError::data(format!(
                "expected exactly one class variable, domain {:?} has {}",
                self.relation_name,
                other.len()
            ))),
        }
    }

    /// Same features, exactly one class variable: the given target.
    pub fn select_target(&self, target: &AttributeRef) -> Result<Domain> {
        if self.index_of_class(target.name()).is_none() {
            return Err(MultiTargetError::data(format!(
                "{:?} is not a class variable of {:?}",
                target.name(),
                self.relation_name
            )));
        }
        Domain::new(
            self.relation_name.clone(),
            self.features.clone(),
            vec![Arc::clone(target)],
        )
    }

    /// Moves a class variable to the end of the feature list.
    ///
    /// The result has one more feature and one fewer class variable.
    pub fn promote_class(&self, name: &str) -> Result<Domain> {
        let Some(idx) = self.index_of_class(name) else {
            return Err(MultiTargetError::data(format!(
                "cannot promote {name:?}: not a class variable of {:?}",
                self.relation_name
            )));
        };
        let mut features = self.features.clone();
        let mut class_vars = self.class_vars.clone();
        features.push(class_vars.remove(idx));
        Domain::new(self.relation_name.clone(), features, class_vars)
    }

    /// Same features, no class variables.
    pub fn without_classes(&self) -> Domain {
        Domain {
            relation_name: self.relation_name.clone(),
            features: self.features.clone(),
            class_vars: Vec::new(),
        }
    }

    /// Resolves names to class variables of this domain.
    ///
    /// The result must be a permutation of the class variables: every
    /// name known, none repeated, none left out.
    pub fn class_order(&self, names: &[String]) -> Result<Vec<AttributeRef>> {
        if names.len() != self.class_vars.len() {
            return Err(MultiTargetError::configuration(format!(
                "class order has {} entries, domain has {} class variables",
                names.len(),
                self.class_vars.len()
            )));
        }
        let mut seen = HashSet::new();
        let mut order = Vec::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(MultiTargetError::configuration(format!(
                    "class {name:?} appears twice in the class order"
                )));
            }
            let Some(class_var) = self.class_var(name) else {
                return Err(MultiTargetError::configuration(format!(
                    "class order names unknown class {name:?}"
                )));
            };
            order.push(Arc::clone(class_var));
        }
        Ok(order)
    }
}
