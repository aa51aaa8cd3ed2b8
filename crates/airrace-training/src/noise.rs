//! Perturbation noise used to sample candidate policies.

use airrace_evaluator::policy::{FIELD_COUNT, FIELDS, Policy};
use rand::Rng;
use rand_distr::Normal;

/// Shape of the per-field perturbation.
///
/// Both shapes have zero mean and variance 2/3, so a given sigma explores
/// roughly the same width either way.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Noise {
    /// Sum of two independent uniform draws on `[-1, 1]`.
    #[default]
    Triangular,
    /// Normal distribution with the same variance as `Triangular`.
    Gaussian,
}

impl Noise {
    /// Draws one unit-scale sample.
    pub fn sample<R>(self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Triangular => rng.random_range(-1.0..=1.0) + rng.random_range(-1.0..=1.0),
            Self::Gaussian => {
                let normal = Normal::new(0.0, (2.0_f64 / 3.0).sqrt()).unwrap();
                rng.sample(normal)
            }
        }
    }
}

/// Samples a candidate around `mean`, one noise draw per field, then clamps
/// every field into its valid range.
pub fn mutate<R>(mean: &Policy, sigma: &Policy, noise: Noise, rng: &mut R) -> Policy
where
    R: Rng + ?Sized,
{
    let mean = mean.to_array();
    let sigma = sigma.to_array();
    let mut values = [0.0; FIELD_COUNT];
    for (i, value) in values.iter_mut().enumerate() {
        *value = FIELDS[i].clamp(mean[i] + sigma[i] * noise.sample(rng));
    }
    Policy::from_array(values)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_triangular_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..10_000 {
            let x = Noise::Triangular.sample(&mut rng);
            assert!((-2.0..=2.0).contains(&x));
        }
    }

    #[test]
    fn test_noise_variance_close_to_two_thirds() {
        for noise in [Noise::Triangular, Noise::Gaussian] {
            let mut rng = Pcg32::seed_from_u64(7);
            let samples: Vec<f64> = (0..50_000).map(|_| noise.sample(&mut rng)).collect();
            #[expect(clippy::cast_precision_loss)]
            let n = samples.len() as f64;
            let mean = samples.iter().sum::<f64>() / n;
            let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 0.02, "{noise:?} mean {mean}");
            assert!((var - 2.0 / 3.0).abs() < 0.03, "{noise:?} variance {var}");
        }
    }

    #[test]
    fn test_mutate_stays_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(1);
        let huge_sigma = Policy::from_array([1000.0; FIELD_COUNT]);
        for noise in [Noise::Triangular, Noise::Gaussian] {
            for _ in 0..200 {
                let candidate = mutate(&Policy::INITIAL_MEAN, &huge_sigma, noise, &mut rng);
                assert!(candidate.is_within_bounds());
            }
        }
    }

    #[test]
    fn test_mutate_with_zero_sigma_keeps_mean() {
        let mut rng = Pcg32::seed_from_u64(1);
        let zero = Policy::from_array([0.0; FIELD_COUNT]);
        let candidate = mutate(&Policy::INITIAL_MEAN, &zero, Noise::Triangular, &mut rng);
        assert_eq!(candidate, Policy::INITIAL_MEAN);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Gaussian".parse::<Noise>().ok(), Some(Noise::Gaussian));
        assert_eq!("Triangular".parse::<Noise>().ok(), Some(Noise::Triangular));
        assert!("cauchy".parse::<Noise>().is_err());
    }
}
