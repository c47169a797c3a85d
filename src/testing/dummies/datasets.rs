use crate::core::attributes::Attribute;
use crate::core::domain::Domain;
use crate::core::Dataset;
use std::sync::Arc;

fn binary(name: &str) -> Arc<Attribute> {
    Attribute::nominal(name, &["0", "1"])
}

fn build(domain: Domain, rows: Vec<(Vec<f64>, Vec<f64>)>) -> Dataset {
    Dataset::from_rows(Arc::new(domain), rows).expect("dummy rows match their domain")
}

/// Two binary features and two binary targets with `a = x1` and `b = x2`.
///
/// Every feature combination appears twice, so both targets are balanced.
pub fn correlated_dataset() -> Dataset {
    let domain = Domain::new(
        "correlated",
        vec![binary("x1"), binary("x2")],
        vec![binary("a"), binary("b")],
    )
    .expect("unique names");
    let mut rows = Vec::new();
    for _ in 0..2 {
        for (x1, x2) in [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)] {
            rows.push((vec![x1, x2], vec![x1, x2]));
        }
    }
    build(domain, rows)
}

/// One ternary feature `x` and binary targets `t1`, `t2`, `t3`.
pub fn three_target_dataset() -> Dataset {
    let domain = Domain::new(
        "three",
        vec![Attribute::nominal("x", &["0", "1", "2"])],
        vec![binary("t1"), binary("t2"), binary("t3")],
    )
    .expect("unique names");
    let rows = (0..12)
        .map(|i| {
            let x = (i % 3) as f64;
            let t1 = if x >= 1.0 { 1.0 } else { 0.0 };
            let t2 = if x == 2.0 { 1.0 } else { 0.0 };
            let t3 = if i % 4 == 0 { 1.0 - t1 } else { t1 };
            (vec![x], vec![t1, t2, t3])
        })
        .collect();
    build(domain, rows)
}

/// Numeric `x`, one binary target `y = [x > 0]`.
pub fn single_target_dataset() -> Dataset {
    let domain = Domain::new(
        "single",
        vec![Attribute::numeric("x")],
        vec![Attribute::nominal("y", &["no", "yes"])],
    )
    .expect("unique names");
    build(
        domain,
        vec![
            (vec![-2.0], vec![0.0]),
            (vec![-1.0], vec![0.0]),
            (vec![1.0], vec![1.0]),
            (vec![2.0], vec![1.0]),
        ],
    )
}

/// Numeric `x`, one numeric target `y = 2x`.
pub fn continuous_target_dataset() -> Dataset {
    let domain = Domain::new(
        "continuous",
        vec![Attribute::numeric("x")],
        vec![Attribute::numeric("y")],
    )
    .expect("unique names");
    build(
        domain,
        (0..4).map(|i| (vec![i as f64], vec![2.0 * i as f64])).collect(),
    )
}

/// Nominal `color`, numeric `size`; targets `big` (binary, `size > 5`) and
/// `weight` (numeric, `size * 10`).
pub fn mixed_target_dataset() -> Dataset {
    let domain = Domain::new(
        "mixed",
        vec![
            Attribute::nominal("color", &["red", "green", "blue"]),
            Attribute::numeric("size"),
        ],
        vec![binary("big"), Attribute::numeric("weight")],
    )
    .expect("unique names");
    let rows = (0..20)
        .map(|i| {
            let size = (i % 10) as f64 + 0.5;
            let big = if size > 5.0 { 1.0 } else { 0.0 };
            (vec![(i % 3) as f64, size], vec![big, size * 10.0])
        })
        .collect();
    build(domain, rows)
}
