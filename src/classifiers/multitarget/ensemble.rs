use crate::classifiers::classifier::Learner;
use crate::classifiers::multitarget::chain::{ClassifierChain, build_chain};
use crate::classifiers::multitarget::learner::{
    MultiTargetClassifier, MultiTargetLearner, MultiTargetPrediction, ProgressCallback,
    report_progress, require_targets,
};
use crate::core::attributes::Attribute;
use crate::core::distribution::Distribution;
use crate::core::domain::Domain;
use crate::core::instances::Instance;
use crate::core::sampling::subset_marks;
use crate::core::Dataset;
use crate::error::{MultiTargetError, Result};
use crate::utils::random::RandomStream;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_N_CHAINS: usize = 50;
pub const DEFAULT_SAMPLE_SIZE: f64 = 0.25;

/// Ensemble of classifier chains, each trained on a random subsample of
/// the data with its own random class order.
///
/// The learner's [`RandomStream`] is not rewound between training calls:
/// successive calls draw different orders and samples. Use
/// [`reset_random`](Self::reset_random) to replay from the seed.
pub struct EnsembleClassifierChainLearner {
    name: String,
    learner: Arc<dyn Learner>,
    n_chains: usize,
    sample_size: f64,
    random: RandomStream,
    actual_values: bool,
    progress: Option<ProgressCallback>,
}

impl EnsembleClassifierChainLearner {
    pub fn new(learner: Option<Arc<dyn Learner>>) -> Result<Self> {
        let Some(learner) = learner else {
            return Err(MultiTargetError::configuration(
                "base learner not defined",
            ));
        };
        Ok(Self {
            name: "Ensemble CChain".to_string(),
            learner,
            n_chains: DEFAULT_N_CHAINS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            random: RandomStream::default(),
            actual_values: true,
            progress: None,
        })
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_n_chains(mut self, n_chains: usize) -> Result<Self> {
        if n_chains == 0 {
            return Err(MultiTargetError::configuration(
                "an ensemble needs at least one chain",
            ));
        }
        self.n_chains = n_chains;
        Ok(self)
    }

    /// Share of the training instances each chain sees, in `(0, 1]`.
    pub fn with_sample_size(mut self, sample_size: f64) -> Result<Self> {
        subset_marks(0, sample_size)?;
        self.sample_size = sample_size;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random = RandomStream::new(seed);
        self
    }

    pub fn with_random(mut self, mut random: RandomStream) -> Self {
        random.take_snapshot();
        self.random = random;
        self
    }

    pub fn with_actual_values(mut self, actual_values: bool) -> Self {
        self.actual_values = actual_values;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn n_chains(&self) -> usize {
        self.n_chains
    }

    pub fn sample_size(&self) -> f64 {
        self.sample_size
    }

    /// Rewinds the random stream to its seed (or the state given to
    /// [`with_random`](Self::with_random)).
    pub fn reset_random(&mut self) {
        self.random.reset();
    }

    pub fn fit(&mut self, data: &Dataset) -> Result<EnsembleClassifierChain> {
        require_targets(data)?;
        let mut marks = subset_marks(data.len(), self.sample_size)?;
        let mut chains = Vec::with_capacity(self.n_chains);

        for i in 0..self.n_chains {
            let mut order = data.domain().class_vars().to_vec();
            self.random.shuffle(&mut order);
            self.random.shuffle(&mut marks);

            let sample = data.select_marked(&marks, 1)?;
            if sample.is_empty() {
                return Err(MultiTargetError::data(format!(
                    "a sample of {} out of {} instances is empty",
                    self.sample_size,
                    data.len()
                )));
            }
            let chain = build_chain(
                &format!("{} #{i}", self.name),
                self.learner.as_ref(),
                &sample,
                order,
                self.actual_values,
                None,
            )?;
            debug!(
                ensemble = %self.name,
                chain = i,
                order = ?chain.class_order_names(),
                instances = sample.len(),
                "chain trained"
            );
            chains.push(chain);
            report_progress(self.progress.as_ref(), (i + 1) as f64 / self.n_chains as f64);
        }

        info!(ensemble = %self.name, chains = chains.len(), "ensemble trained");
        EnsembleClassifierChain::new(self.name.clone(), chains)
    }
}

impl MultiTargetLearner for EnsembleClassifierChainLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn train(&mut self, data: &Dataset) -> Result<Box<dyn MultiTargetClassifier>> {
        Ok(Box::new(self.fit(data)?))
    }
}

/// Aggregates the member chains target by target.
///
/// Discrete targets: the value is the plurality vote of the chains' values
/// (ties to the lowest index) and the distribution is the mean of the
/// chains' distributions. The two can disagree. Continuous targets: the
/// value is the mean of the chains' values and the distribution pools the
/// chains' masses.
pub struct EnsembleClassifierChain {
    name: String,
    chains: Vec<ClassifierChain>,
    orig_domain: Arc<Domain>,
}

impl EnsembleClassifierChain {
    pub fn new<S: Into<String>>(name: S, chains: Vec<ClassifierChain>) -> Result<Self> {
        let name = name.into();
        let Some(first) = chains.first() else {
            return Err(MultiTargetError::configuration(format!(
                "ensemble {name:?} has no chains"
            )));
        };
        let orig_domain = Arc::clone(first.domain());
        let targets = target_names(&orig_domain);
        if let Some(odd) = chains.iter().find(|c| target_names(c.domain()) != targets) {
            return Err(MultiTargetError::configuration(format!(
                "chain over {:?} does not match ensemble targets {targets:?}",
                target_names(odd.domain())
            )));
        }
        Ok(Self {
            name,
            chains,
            orig_domain,
        })
    }

    pub fn chains(&self) -> &[ClassifierChain] {
        &self.chains
    }

    fn incompatible(&self, target: &str, reason: &str) -> MultiTargetError {
        MultiTargetError::IncompatiblePrediction {
            learner: self.name.clone(),
            reason: format!("{reason} for target {target:?}"),
        }
    }

    fn aggregate_discrete(
        &self,
        target: &str,
        n_values: usize,
        members: &[(f64, Option<&Distribution>)],
    ) -> Result<(f64, Option<Distribution>)> {
        let mut votes = vec![0usize; n_values];
        let mut mass = vec![0.0; n_values];
        for &(value, distribution) in members {
            let index = (!value.is_nan() && value >= 0.0)
                .then_some(value as usize)
                .filter(|&i| i < n_values);
            if let Some(i) = index {
                votes[i] += 1;
            }
            match distribution {
                Some(Distribution::Discrete(p)) if p.len() == n_values => {
                    mass.iter_mut().zip(p).for_each(|(m, q)| *m += q);
                }
                Some(Distribution::Discrete(p)) => {
                    return Err(self.incompatible(
                        target,
                        &format!("distribution over {} values, expected {n_values}", p.len()),
                    ));
                }
                Some(Distribution::Continuous(_)) => {
                    return Err(self.incompatible(target, "continuous distribution"));
                }
                None => {
                    if let Some(i) = index {
                        mass[i] += 1.0;
                    }
                }
            }
        }

        let mut best: Option<(usize, usize)> = None;
        for (i, &count) in votes.iter().enumerate() {
            if count > 0 && best.is_none_or(|(_, b)| count > b) {
                best = Some((i, count));
            }
        }
        let value = best.map_or(f64::NAN, |(i, _)| i as f64);

        let mut distribution = Distribution::Discrete(mass);
        distribution.normalize();
        Ok((value, Some(distribution)))
    }

    fn aggregate_continuous(
        &self,
        target: &str,
        members: &[(f64, Option<&Distribution>)],
    ) -> Result<(f64, Option<Distribution>)> {
        // a NaN member makes the mean NaN
        let value = members.iter().map(|&(v, _)| v).sum::<f64>() / members.len() as f64;

        let mut pooled = Vec::new();
        for &(v, distribution) in members {
            match distribution {
                Some(Distribution::Continuous(m)) => {
                    pooled.extend(m.iter().map(|(k, &p)| (k.0, p)));
                }
                Some(Distribution::Discrete(_)) => {
                    return Err(self.incompatible(target, "discrete distribution"));
                }
                None if !v.is_nan() => pooled.push((v, 1.0)),
                None => {}
            }
        }
        let mut distribution = Distribution::continuous_from(pooled);
        distribution.normalize();
        Ok((value, Some(distribution)))
    }
}

fn target_names(domain: &Domain) -> Vec<&str> {
    domain.class_vars().iter().map(|a| a.name()).collect()
}

impl MultiTargetClassifier for EnsembleClassifierChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> &Arc<Domain> {
        &self.orig_domain
    }

    fn predict(&self, instance: &dyn Instance) -> Result<MultiTargetPrediction> {
        let per_chain = self
            .chains
            .iter()
            .map(|c| c.predict(instance))
            .collect::<Result<Vec<_>>>()?;

        let m = self.orig_domain.number_of_classes();
        let mut values = Vec::with_capacity(m);
        let mut probabilities = Vec::with_capacity(m);
        for (j, target) in self.orig_domain.class_vars().iter().enumerate() {
            let members: Vec<(f64, Option<&Distribution>)> = per_chain
                .iter()
                .map(|p| (p.values[j], p.probabilities[j].as_ref()))
                .collect();
            let (value, distribution) = match target.as_ref() {
                Attribute::Nominal(n) => {
                    self.aggregate_discrete(target.name(), n.number_of_values(), &members)?
                }
                Attribute::Numeric(_) => self.aggregate_continuous(target.name(), &members)?,
            };
            values.push(value);
            probabilities.push(distribution);
        }

        Ok(MultiTargetPrediction {
            values,
            probabilities,
        })
    }
}
