//! Small statistics over score series.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`).
pub fn variance(values: &[f64]) -> f64 {
    match mean(values) {
        Some(m) => values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64,
        None => 0.0,
    }
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Least-squares slope of `values` against their index.
pub fn slope(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..values.len()).map(|i| (i as f64).powi(2)).sum();

    let denominator = n * sum_xx - sum_x.powi(2);
    if denominator.abs() < 1e-10 {
        return 0.0;
    }

    (n * sum_xy - sum_x * sum_y) / denominator
}
