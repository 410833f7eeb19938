use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    distribution::Distribution,
    error::{Result, TuningError},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedTokenProbability {
    pub label: String,
    pub original_probability: f64,
    pub adjusted_probability: f64,
}

/// Re-weight `distribution` by raising every probability to `1 / temperature`, then normalize.
///
/// Lower temperatures concentrate mass on the most likely token; at `1.0` a distribution that
/// already sums to one is returned unchanged.
pub fn adjust(
    distribution: &Distribution,
    temperature: f64,
) -> Result<Vec<AdjustedTokenProbability>> {
    if !(temperature > 0.0 && temperature.is_finite()) {
        return Err(TuningError::InvalidTemperature(temperature));
    }

    Ok(rescale(distribution, temperature))
}

/// The unchecked transform; callers guarantee `temperature > 0`.
pub(crate) fn rescale(
    distribution: &Distribution,
    temperature: f64,
) -> Vec<AdjustedTokenProbability> {
    debug_assert!(temperature > 0.0);

    let rescaled = distribution
        .iter()
        .map(|x| x.probability.powf(1.0 / temperature))
        .collect_vec();
    let sum: f64 = rescaled.iter().sum();

    distribution
        .iter()
        .zip_eq(rescaled)
        .map(|(token, x)| AdjustedTokenProbability {
            label: token.label.clone(),
            original_probability: token.probability,
            adjusted_probability: x / sum,
        })
        .collect()
}
