//! Biometric simulation: a `d`-dimensional feature vector drawn from a
//! standard normal distribution, plus a noisy variant that matches on
//! only a fraction of coordinates. Stands in for a real biometric sensor
//! and feature extractor.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Draws a fresh `d`-dimensional biometric from `N(0, 1)`. `seed` makes
/// the draw reproducible for tests; pass `None` for a true random draw.
pub fn generate_biometric(d: usize, seed: Option<u64>) -> Vec<f64> {
    let mut rng = rng_from_seed(seed);
    (0..d).map(|_| StandardNormal.sample(&mut rng)).collect()
}

/// Produces a noisy copy of `original`: `match_ratio` of the coordinates
/// are copied exactly, the rest are replaced with fresh `N(0,1) + noise_std`
/// draws. `match_ratio` close to `tbio / d` simulates genuine-but-imperfect
/// presentations; close to 0 simulates an impostor.
pub fn generate_noisy_biometric(
    original: &[f64],
    noise_std: f64,
    match_ratio: f64,
    seed: Option<u64>,
) -> Vec<f64> {
    let mut rng = rng_from_seed(seed);
    let d = original.len();
    let n_match = (match_ratio * d as f64) as usize;
    let match_indices: std::collections::HashSet<usize> =
        sample(&mut rng, d, n_match.min(d)).into_iter().collect();

    (0..d)
        .map(|i| {
            if match_indices.contains(&i) {
                original[i]
            } else {
                let drawn: f64 = StandardNormal.sample(&mut rng);
                drawn + noise_std
            }
        })
        .collect()
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(rand::thread_rng()).expect("OS RNG available"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_is_deterministic() {
        let a = generate_biometric(16, Some(42));
        let b = generate_biometric(16, Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = generate_biometric(16, Some(1));
        let b = generate_biometric(16, Some(2));
        assert_ne!(a, b);
    }

    #[test]
    fn full_match_ratio_reproduces_original_exactly() {
        let original = generate_biometric(32, Some(7));
        let noisy = generate_noisy_biometric(&original, 0.0, 1.0, Some(8));
        assert_eq!(original, noisy);
    }

    #[test]
    fn zero_match_ratio_changes_every_coordinate() {
        let original = generate_biometric(32, Some(7));
        let noisy = generate_noisy_biometric(&original, 0.1, 0.0, Some(9));
        let unchanged = original.iter().zip(&noisy).filter(|(a, b)| (*a - *b).abs() < 1e-12).count();
        assert_eq!(unchanged, 0);
    }

    #[test]
    fn rng_never_panics_without_seed() {
        let v = generate_biometric(4, None);
        assert_eq!(v.len(), 4);
    }
}
