/// True when any value is NaN or infinite.
pub fn has_invalid_values(values: &[f64]) -> bool {
    values.iter().any(|x| !x.is_finite())
}

/// Clamp into `[0, 1]`; non-finite input becomes `0`.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
