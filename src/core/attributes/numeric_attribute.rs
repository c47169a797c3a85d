/// Continuous variable; values are stored as-is, `NaN` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericAttribute {
    pub name: String,
}

impl NumericAttribute {
    pub fn new(name: String) -> NumericAttribute {
        NumericAttribute { name }
    }
}
