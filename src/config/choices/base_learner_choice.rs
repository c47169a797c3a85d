use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

/// Empty parameter object so every choice still carries "params".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct NoParams {}

fn default_k() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct KNearestParams {
    #[serde(default = "default_k")]
    #[schemars(
        title = "Neighbours",
        description = "Number of nearest training instances that vote.",
        range(min = 1),
        default = "default_k"
    )]
    pub k: usize,
}

impl Default for KNearestParams {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

/// Single-target learner used inside a multi-target learner.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(BaseLearnerKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum BaseLearnerChoice {
    #[strum_discriminants(strum(
        message = "Majority",
        detailed_message = "Predicts the most frequent value, or the mean of a continuous target."
    ))]
    Majority(NoParams),
    #[strum_discriminants(strum(
        message = "Naive Bayes Classifier",
        detailed_message = "Performs classic Bayesian prediction assuming feature independence."
    ))]
    NaiveBayes(NoParams),
    #[strum_discriminants(strum(
        message = "k Nearest Neighbours",
        detailed_message = "Votes or averages over the k closest training instances."
    ))]
    KNearest(KNearestParams),
}

impl BaseLearnerChoice {
    pub fn default_for(kind: BaseLearnerKind) -> Self {
        match kind {
            BaseLearnerKind::Majority => Self::Majority(NoParams::default()),
            BaseLearnerKind::NaiveBayes => Self::NaiveBayes(NoParams::default()),
            BaseLearnerKind::KNearest => Self::KNearest(KNearestParams::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use strum::{EnumMessage, IntoEnumIterator};

    #[test]
    fn tagged_enum_serialization() {
        let v = serde_json::to_value(BaseLearnerChoice::default_for(BaseLearnerKind::KNearest))
            .unwrap();
        assert_eq!(v.get("type").and_then(Value::as_str), Some("k-nearest"));
        assert_eq!(
            v.get("params").and_then(|p| p.get("k")).and_then(Value::as_u64),
            Some(5)
        );

        let nb: BaseLearnerChoice =
            serde_json::from_value(json!({"type": "naive-bayes", "params": {}})).unwrap();
        assert_eq!(nb, BaseLearnerChoice::NaiveBayes(NoParams {}));
    }

    #[test]
    fn missing_k_applies_default() {
        let p: KNearestParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p, KNearestParams::default());
    }

    #[test]
    fn every_kind_has_a_message_and_default() {
        for kind in BaseLearnerKind::iter() {
            assert!(kind.get_message().is_some(), "no message for {kind}");
            let choice = BaseLearnerChoice::default_for(kind);
            assert_eq!(BaseLearnerKind::from(&choice), kind);
        }
        assert_eq!("majority".parse::<BaseLearnerKind>().unwrap(), BaseLearnerKind::Majority);
    }
}
