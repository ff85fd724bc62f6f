//! Random draws used across the engine
//!
//! Every draw takes the caller's generator so one seeded stream drives the
//! whole run.

use rand::Rng;
use rand_distr::{Distribution, Poisson, StandardNormal};

/// Sample N(mean, std). A zero spread returns the mean.
pub fn normal<R: Rng>(rng: &mut R, mean: f64, std: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std.max(0.0) * z
}

/// Sample N(mean, sqrt(variance))
pub fn normal_from_variance<R: Rng>(rng: &mut R, mean: f64, variance: f64) -> f64 {
    normal(rng, mean, variance.max(0.0).sqrt())
}

/// Sample a Poisson count. Non-positive means give 0.
pub fn poisson<R: Rng>(rng: &mut R, mean: f64) -> u64 {
    if !(mean.is_finite() && mean > 0.0) {
        return 0;
    }
    match Poisson::new(mean) {
        Ok(dist) => {
            let draw: f64 = dist.sample(rng);
            draw as u64
        }
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_spread_is_exact() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(normal(&mut rng, 5.0, 0.0), 5.0);
        assert_eq!(normal_from_variance(&mut rng, 1.5, 0.0), 1.5);
    }

    #[test]
    fn test_poisson_degenerate_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(poisson(&mut rng, 0.0), 0);
        assert_eq!(poisson(&mut rng, -3.0), 0);
        assert_eq!(poisson(&mut rng, f64::NAN), 0);
    }

    #[test]
    fn test_poisson_mean_roughly_right() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let total: u64 = (0..2000).map(|_| poisson(&mut rng, 3.0)).sum();
        let mean = total as f64 / 2000.0;
        assert!((mean - 3.0).abs() < 0.3, "mean was {}", mean);
    }
}
