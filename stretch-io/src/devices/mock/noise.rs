//! Gaussian sensor noise for the simulated status

use crate::core::schema::StateChannel;
use crate::core::status::{Joint, RobotStatus};
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::StandardNormal;

/// Noise generator with configurable seed for reproducibility
#[derive(Clone)]
pub struct NoiseGenerator {
    rng: SmallRng,
}

impl NoiseGenerator {
    /// Seed 0 draws from entropy, anything else is reproducible.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng }
    }

    #[inline]
    pub fn gaussian(&mut self, stddev: f32) -> f32 {
        if stddev == 0.0 {
            return 0.0;
        }
        let n: f32 = self.rng.sample(StandardNormal);
        n * stddev
    }

    /// Copy of `status` with noise on every recorded channel
    pub fn perturb(&mut self, status: &RobotStatus, stddev: f32) -> RobotStatus {
        let mut noisy = *status;
        if stddev == 0.0 {
            return noisy;
        }
        for joint in Joint::ALL {
            noisy.joint_mut(joint).pos += self.gaussian(stddev);
        }
        noisy.base.x_vel += self.gaussian(stddev);
        noisy.base.y_vel += self.gaussian(stddev);
        noisy.base.theta_vel += self.gaussian(stddev);
        debug_assert_eq!(Joint::ALL.len() + 3, StateChannel::ALL.len());
        noisy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::state_vector;

    #[test]
    fn test_deterministic_seed() {
        let mut noise1 = NoiseGenerator::new(42);
        let mut noise2 = NoiseGenerator::new(42);

        for _ in 0..100 {
            assert_eq!(noise1.gaussian(1.0), noise2.gaussian(1.0));
        }
    }

    #[test]
    fn test_zero_stddev() {
        let mut noise = NoiseGenerator::new(42);
        let status = RobotStatus::default();
        assert_eq!(noise.perturb(&status, 0.0), status);
        for _ in 0..10 {
            assert_eq!(noise.gaussian(0.0), 0.0);
        }
    }

    #[test]
    fn test_perturb_touches_every_channel() {
        let mut noise = NoiseGenerator::new(7);
        let status = RobotStatus::default();
        let noisy = state_vector(&noise.perturb(&status, 0.01));
        assert!(noisy.iter().all(|v| *v != 0.0 && v.abs() < 0.1));
    }
}
