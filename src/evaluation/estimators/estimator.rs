/// Incremental scalar estimator over weighted observations.
///
/// Implementations accept values through [`add`](Estimator::add) and expose
/// the current estimate through [`estimation`](Estimator::estimation).
pub trait Estimator {
    /// Incorporates `value` with the given non-negative `weight`.
    fn add(&mut self, value: f64, weight: f64);

    /// Returns the current estimate, NaN before any observation.
    fn estimation(&self) -> f64;
}
