use crate::core::attributes::{NominalAttribute, NumericAttribute};
use std::fmt;
use std::sync::Arc;

pub type AttributeRef = Arc<Attribute>;

/// Variable descriptor: either discrete with a value enumeration or continuous.
///
/// Algorithms that treat the two kinds differently match on this enum
/// instead of inspecting types at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Nominal(NominalAttribute),
    Numeric(NumericAttribute),
}

impl Attribute {
    pub fn nominal<S: Into<String>>(name: S, values: &[&str]) -> AttributeRef {
        Arc::new(Attribute::Nominal(NominalAttribute::with_values(
            name.into(),
            values.iter().map(|v| v.to_string()).collect(),
        )))
    }

    pub fn numeric<S: Into<String>>(name: S) -> AttributeRef {
        Arc::new(Attribute::Numeric(NumericAttribute::new(name.into())))
    }

    pub fn name(&self) -> &str {
        match self {
            Attribute::Nominal(a) => &a.name,
            Attribute::Numeric(a) => &a.name,
        }
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self, Attribute::Nominal(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Attribute::Numeric(_))
    }

    /// Value enumeration for discrete variables, `None` for continuous ones.
    pub fn values(&self) -> Option<&[String]> {
        match self {
            Attribute::Nominal(a) => Some(&a.values),
            Attribute::Numeric(_) => None,
        }
    }

    /// Number of categories; `0` for continuous variables.
    pub fn number_of_values(&self) -> usize {
        match self {
            Attribute::Nominal(a) => a.number_of_values(),
            Attribute::Numeric(_) => 0,
        }
    }

    pub fn arff_representation(&self) -> String {
        match self {
            Attribute::Nominal(a) => {
                format!("@attribute {} {{ {} }}", a.name, a.values.join(", "))
            }
            Attribute::Numeric(a) => format!("@attribute {} numeric", a.name),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
