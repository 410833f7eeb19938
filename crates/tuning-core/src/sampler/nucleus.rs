use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTokenProbability {
    pub label: String,
    pub probability: f64,
    /// Running sum up to and including this token.
    pub cumulative_probability: f64,
    pub included: bool,
}

/// Rank tokens by descending probability and mark the top-p nucleus.
///
/// A token is included while the cumulative probability up to and including it stays at or
/// below `threshold`. A token that alone exceeds the threshold is therefore excluded, and the
/// nucleus may be empty. Ties keep their input order.
pub fn select(distribution: &Distribution, threshold: f64) -> Vec<RankedTokenProbability> {
    distribution
        .iter()
        .sorted_by(|x, y| x.probability.total_cmp(&y.probability).reverse())
        .scan(0.0, |cum, token| {
            *cum += token.probability;
            Some(RankedTokenProbability {
                label: token.label.clone(),
                probability: token.probability,
                cumulative_probability: *cum,
                included: *cum <= threshold,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn included(ranked: &[RankedTokenProbability]) -> Vec<bool> {
        ranked.iter().map(|x| x.included).collect()
    }

    #[test]
    fn leaves_at_default_threshold() {
        let ranked = select(&Distribution::leaves(), 0.9);
        let labels = ranked.iter().map(|x| x.label.as_str()).collect_vec();
        assert_eq!(labels, ["autumn", "breeze", "garden", "water"]);

        let expected = [0.3145, 0.5677, 0.7664, 0.9152];
        for (x, cum) in ranked.iter().zip_eq(expected) {
            assert!((x.cumulative_probability - cum).abs() < EPSILON);
        }
        assert_eq!(included(&ranked), [true, true, true, false]);
    }

    #[test]
    fn leaves_at_full_threshold() {
        let ranked = select(&Distribution::leaves(), 1.0);
        assert_eq!(included(&ranked), [true; 4]);
    }

    #[test]
    fn exact_boundary_is_included() {
        let distribution = Distribution::try_from(vec![("a", 0.5), ("b", 0.5)]).unwrap();
        let ranked = select(&distribution, 0.5);
        assert_eq!(ranked[0].cumulative_probability, 0.5);
        assert_eq!(included(&ranked), [true, false]);
    }

    #[test]
    fn just_past_boundary_is_excluded() {
        let distribution = Distribution::try_from(vec![("a", 0.5), ("b", 0.5)]).unwrap();
        let ranked = select(&distribution, 0.5 - EPSILON);
        assert_eq!(included(&ranked), [false, false]);
    }

    #[test]
    fn nucleus_can_be_empty() {
        let ranked = select(&Distribution::leaves(), 0.3);
        assert_eq!(included(&ranked), [false; 4]);
        let ranked = select(&Distribution::leaves(), 0.0);
        assert_eq!(included(&ranked), [false; 4]);
    }

    #[test]
    fn sorts_descending_and_keeps_tie_order() {
        let distribution = Distribution::try_from(vec![
            ("low", 0.1),
            ("tie_a", 0.25),
            ("high", 0.4),
            ("tie_b", 0.25),
        ])
        .unwrap();
        let ranked = select(&distribution, 1.0);
        let labels = ranked.iter().map(|x| x.label.as_str()).collect_vec();
        assert_eq!(labels, ["high", "tie_a", "tie_b", "low"]);
    }

    #[test]
    fn inclusion_is_a_prefix() {
        for step in 0..=20 {
            let threshold = step as f64 / 20.0;
            let ranked = select(&Distribution::leaves(), threshold);
            let flags = included(&ranked);
            assert!(
                flags.iter().tuple_windows().all(|(a, b)| *a || !*b),
                "threshold {threshold}: {flags:?}"
            );
        }
    }
}
