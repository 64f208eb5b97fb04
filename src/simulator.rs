//! Seeded synthetic measurement streams for exercising the filters.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Constant(f64),
    /// `slope * t`
    Ramp { slope: f64 },
    /// `amplitude * sin(2π·frequency·t)`
    Sine { amplitude: f64, frequency: f64 },
}

impl Signal {
    pub fn at(&self, t: f64) -> f64 {
        match *self {
            Signal::Constant(v) => v,
            Signal::Ramp { slope } => slope * t,
            Signal::Sine {
                amplitude,
                frequency,
            } => amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub t: f64,
    pub truth: f64,
    pub z: f64,
}

/// `n` samples of `signal` at `rate` Hz starting at `t = 0`, with additive
/// Gaussian noise of standard deviation `sigma`.
pub fn simulate(signal: Signal, rate: f64, n: usize, sigma: f64, seed: u64) -> Vec<Sample> {
    let mut rng = StdRng::seed_from_u64(seed);
    // A non-finite or negative sigma is treated as noise free
    let noise = Normal::new(0.0, sigma).ok();
    (0..n)
        .map(|k| {
            let t = k as f64 / rate;
            let truth = signal.at(t);
            let z = truth + noise.map_or(0.0, |d| d.sample(&mut rng));
            Sample { t, truth, z }
        })
        .collect()
}

/// Root mean square of `estimate - truth`.
pub fn rmse(samples: &[Sample], estimates: &[f64]) -> f64 {
    let sum: f64 = samples
        .iter()
        .zip(estimates)
        .map(|(s, e)| (e - s.truth).powi(2))
        .sum();
    (sum / samples.len() as f64).sqrt()
}
