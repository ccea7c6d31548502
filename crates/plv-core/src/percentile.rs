// Small descriptive statistics used by the card and arsenal reports.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile rank of `score` within `values`, on a 0-100 scale.
///
/// Ties are averaged: `(below + at_or_below + [any equal]) * 50 / n`.
pub fn percentile_of_score(values: &[f64], score: f64) -> Option<f64> {
    if values.is_empty() || !score.is_finite() {
        return None;
    }
    let below = values.iter().filter(|v| **v < score).count();
    let at_or_below = values.iter().filter(|v| **v <= score).count();
    let tie_bonus = usize::from(below < at_or_below);
    Some((below + at_or_below + tie_bonus) as f64 * 50.0 / values.len() as f64)
}
