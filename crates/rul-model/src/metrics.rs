//! Error Metrics

/// Root-mean-square error; `None` when inputs are empty or of different length
pub fn rmse(predictions: &[f64], actuals: &[f64]) -> Option<f64> {
    if predictions.is_empty() || predictions.len() != actuals.len() {
        return None;
    }
    let mse = predictions
        .iter()
        .zip(actuals)
        .map(|(p, a)| (p - a) * (p - a))
        .sum::<f64>()
        / predictions.len() as f64;
    Some(mse.sqrt())
}
