//! Small descriptive statistics over `f64` slices.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance with an `n - 1` denominator.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = mean(values)?;
    let ss = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>();

    let var = ss / (n as f64 - 1.0);
    if var.is_finite() {
        Some(var)
    } else {
        None
    }
}

pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(|v| v.max(0.0).sqrt())
}
