use crate::error::{MultiTargetError, Result};
use crate::utils::random::RandomStream;

/// Two-way split marks: `1` for the sampled share, `0` for the rest.
///
/// The number of `0` marks is `round((1 - sample_size) * n)`, the marks are
/// laid out in order and must be shuffled by the caller before use.
pub fn subset_marks(n: usize, sample_size: f64) -> Result<Vec<usize>> {
    if !(sample_size > 0.0 && sample_size <= 1.0) {
        return Err(MultiTargetError::configuration(format!(
            "sample size must be in (0, 1], got {sample_size}"
        )));
    }
    let held_out = ((1.0 - sample_size) * n as f64).round() as usize;
    let held_out = held_out.min(n);
    let mut marks = vec![0; held_out];
    marks.resize(n, 1);
    Ok(marks)
}

/// Shuffled fold marks `0..folds` spreading `n` instances evenly.
pub fn fold_marks(n: usize, folds: usize, random: &mut RandomStream) -> Result<Vec<usize>> {
    if folds < 2 {
        return Err(MultiTargetError::configuration(format!(
            "cross validation needs at least 2 folds, got {folds}"
        )));
    }
    if n < folds {
        return Err(MultiTargetError::data(format!(
            "cannot split {n} instances into {folds} folds"
        )));
    }
    let mut marks: Vec<usize> = (0..n).map(|i| i % folds).collect();
    random.shuffle(&mut marks);
    Ok(marks)
}
