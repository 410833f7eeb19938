use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TuningError};

/// Slack allowed when checking that probabilities do not exceed a total of 1.
pub const SUM_EPSILON: f64 = 1e-6;

/// Continuations of the prompt `The leaves fall in the...`.
pub const LEAVES: [(&str, f64); 4] = [
    ("autumn", 0.3145),
    ("breeze", 0.2532),
    ("garden", 0.1987),
    ("water", 0.1488),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenProbability {
    pub label: String,
    pub probability: f64,
}

impl TokenProbability {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// An immutable, ordered set of labelled probabilities.
///
/// Labels are unique, every probability lies in `(0, 1]`, and the total does not exceed 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Distribution(Vec<TokenProbability>);

impl Distribution {
    pub fn new(tokens: Vec<TokenProbability>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(TuningError::InvalidDistribution("no tokens".into()));
        }
        if let Some(label) = tokens.iter().map(|x| &x.label).duplicates().next() {
            return Err(TuningError::InvalidDistribution(format!(
                "duplicate label `{label}`"
            )));
        }
        if let Some(token) = tokens
            .iter()
            .find(|x| !(x.probability > 0.0 && x.probability <= 1.0))
        {
            return Err(TuningError::InvalidDistribution(format!(
                "probability of `{}` is {}, expected a value in (0, 1]",
                token.label, token.probability
            )));
        }
        let sum: f64 = tokens.iter().map(|x| x.probability).sum();
        if sum > 1.0 + SUM_EPSILON {
            return Err(TuningError::InvalidDistribution(format!(
                "probabilities sum to {sum}"
            )));
        }
        Ok(Self(tokens))
    }

    /// The compiled-in distribution shown by the demo.
    pub fn leaves() -> Self {
        Self(
            LEAVES
                .iter()
                .map(|&(label, probability)| TokenProbability::new(label, probability))
                .collect(),
        )
    }

    pub fn tokens(&self) -> &[TokenProbability] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenProbability> {
        self.0.iter()
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::leaves()
    }
}

impl TryFrom<Vec<(&str, f64)>> for Distribution {
    type Error = TuningError;

    fn try_from(value: Vec<(&str, f64)>) -> Result<Self> {
        Self::new(
            value
                .into_iter()
                .map(|(label, probability)| TokenProbability::new(label, probability))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Distribution {
    type Item = &'a TokenProbability;
    type IntoIter = std::slice::Iter<'a, TokenProbability>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
