use crate::classifiers::classifier::{Classifier, Learner};
use crate::classifiers::multitarget::learner::{
    MultiTargetClassifier, MultiTargetLearner, MultiTargetPrediction, ProgressCallback,
    feature_vector, report_progress, require_targets,
};
use crate::core::attributes::AttributeRef;
use crate::core::domain::Domain;
use crate::core::instances::{DenseInstance, Instance};
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};
use crate::utils::random::RandomStream;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Classifier chain: one single-target model per class variable, trained in
/// sequence, each seeing the features plus every earlier target of the chain.
///
/// Without an explicit class order the targets are shuffled with the
/// learner's [`RandomStream`], which is rewound to its snapshot at the start
/// of every training call. Two calls on the same learner therefore pick the
/// same order.
///
/// With `actual_values` set (the default) the chained feature columns hold
/// the true target values; otherwise they hold the sub-model's own
/// predictions on the training rows.
pub struct ClassifierChainLearner {
    name: String,
    learner: Arc<dyn Learner>,
    random: RandomStream,
    class_order: Option<Vec<String>>,
    actual_values: bool,
    progress: Option<ProgressCallback>,
}

impl ClassifierChainLearner {
    pub fn new(learner: Option<Arc<dyn Learner>>) -> Result<Self> {
        let Some(learner) = learner else {
            return Err(MultiTargetError::configuration(
                "base learner not defined",
            ));
        };
        Ok(Self {
            name: "Classifier Chain".to_string(),
            learner,
            random: RandomStream::default(),
            class_order: None,
            actual_values: true,
            progress: None,
        })
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random = RandomStream::new(seed);
        self
    }

    /// Uses `random` from its current state; that state becomes the reset point.
    pub fn with_random(mut self, mut random: RandomStream) -> Self {
        random.take_snapshot();
        self.random = random;
        self
    }

    /// Fixed order used whenever a training call does not supply one.
    pub fn with_class_order(mut self, class_order: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(dup) = class_order.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(MultiTargetError::configuration(format!(
                "class {dup:?} appears twice in the class order"
            )));
        }
        self.class_order = Some(class_order);
        Ok(self)
    }

    pub fn with_actual_values(mut self, actual_values: bool) -> Self {
        self.actual_values = actual_values;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn class_order(&self) -> Option<&[String]> {
        self.class_order.as_deref()
    }

    pub fn actual_values(&self) -> bool {
        self.actual_values
    }

    pub fn fit(&mut self, data: &Dataset) -> Result<ClassifierChain> {
        self.fit_with_order(data, None)
    }

    /// Trains a chain; `class_order` takes precedence over the configured
    /// order, and a random order is drawn when neither is given.
    pub fn fit_with_order(
        &mut self,
        data: &Dataset,
        class_order: Option<&[String]>,
    ) -> Result<ClassifierChain> {
        require_targets(data)?;
        self.random.reset();

        let domain = data.domain();
        let order = match (class_order, self.class_order.as_deref()) {
            (Some(names), _) | (None, Some(names)) => domain.class_order(names)?,
            (None, None) => {
                let mut order = domain.class_vars().to_vec();
                self.random.shuffle(&mut order);
                order
            }
        };

        build_chain(
            &self.name,
            self.learner.as_ref(),
            data,
            order,
            self.actual_values,
            self.progress.as_ref(),
        )
    }
}

impl MultiTargetLearner for ClassifierChainLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn train(&mut self, data: &Dataset) -> Result<Box<dyn MultiTargetClassifier>> {
        Ok(Box::new(self.fit(data)?))
    }
}

/// Trains the chain positions in `order` over `data`.
pub(crate) fn build_chain(
    name: &str,
    learner: &dyn Learner,
    data: &Dataset,
    order: Vec<AttributeRef>,
    actual_values: bool,
    progress: Option<&ProgressCallback>,
) -> Result<ClassifierChain> {
    let orig_domain = Arc::clone(data.domain());
    let m = order.len();
    let mut classifiers = Vec::with_capacity(m);
    let mut domains = Vec::with_capacity(m);
    let mut working = data.clone();

    for (i, target) in order.iter().enumerate() {
        let domain = Arc::new(working.domain().select_target(target)?);
        let position_data = working.project(Arc::clone(&domain))?;
        let classifier = learner.train(&position_data)?;

        let replacement = if actual_values {
            None
        } else {
            Some(
                position_data
                    .iter()
                    .map(|inst| classifier.predict(inst).map(|p| p.value))
                    .collect::<Result<Vec<_>>>()?,
            )
        };
        working = working.promote_class(target.name(), replacement)?;

        classifiers.push(classifier);
        domains.push(domain);

        let fraction = (i + 1) as f64 / m as f64;
        debug!(chain = name, target = target.name(), fraction, "chain position trained");
        report_progress(progress, fraction);
    }

    ClassifierChain::new(name, classifiers, domains, order, orig_domain)
}

/// Trained chain. Predictions are returned in the original class order,
/// whatever order the chain was built in.
pub struct ClassifierChain {
    name: String,
    classifiers: Vec<Box<dyn Classifier>>,
    domains: Vec<Arc<Domain>>,
    class_order: Vec<AttributeRef>,
    orig_domain: Arc<Domain>,
}

impl ClassifierChain {
    /// Reassembles a chain from its parts; position `i` of `classifiers`,
    /// `domains` and `class_order` describe the same chain step.
    pub fn new<S: Into<String>>(
        name: S,
        classifiers: Vec<Box<dyn Classifier>>,
        domains: Vec<Arc<Domain>>,
        class_order: Vec<AttributeRef>,
        orig_domain: Arc<Domain>,
    ) -> Result<Self> {
        let m = orig_domain.number_of_classes();
        if classifiers.len() != m || domains.len() != m {
            return Err(MultiTargetError::configuration(format!(
                "chain over {m} targets needs {m} classifiers and domains, got {} and {}",
                classifiers.len(),
                domains.len()
            )));
        }
        let names: Vec<String> = class_order.iter().map(|a| a.name().to_string()).collect();
        orig_domain.class_order(&names)?;
        for (i, (domain, target)) in domains.iter().zip(&class_order).enumerate() {
            let expected = orig_domain.number_of_features() + i;
            if domain.number_of_features() != expected
                || domain.class_attribute()?.name() != target.name()
            {
                return Err(MultiTargetError::configuration(format!(
                    "chain position {i} must predict {:?} from {expected} features",
                    target.name()
                )));
            }
        }
        Ok(Self {
            name: name.into(),
            classifiers,
            domains,
            class_order,
            orig_domain,
        })
    }

    pub fn class_order(&self) -> &[AttributeRef] {
        &self.class_order
    }

    pub fn class_order_names(&self) -> Vec<String> {
        self.class_order
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    pub fn domains(&self) -> &[Arc<Domain>] {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}

impl MultiTargetClassifier for ClassifierChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> &Arc<Domain> {
        &self.orig_domain
    }

    fn predict(&self, instance: &dyn Instance) -> Result<MultiTargetPrediction> {
        let mut running = feature_vector(instance, &self.orig_domain)?;
        let m = self.orig_domain.number_of_classes();
        let mut values = vec![f64::NAN; m];
        let mut probabilities = vec![None; m];

        for ((classifier, domain), target) in self
            .classifiers
            .iter()
            .zip(&self.domains)
            .zip(&self.class_order)
        {
            let query = DenseInstance::query(Arc::clone(domain), running.clone())?;
            let p = classifier.predict(&query)?;
            let slot = self.orig_domain.index_of_class(target.name()).ok_or_else(|| {
                MultiTargetError::data(format!("unknown chain target {:?}", target.name()))
            })?;
            running.push(p.value);
            values[slot] = p.value;
            probabilities[slot] = p.distribution;
        }

        Ok(MultiTargetPrediction {
            values,
            probabilities,
        })
    }
}
