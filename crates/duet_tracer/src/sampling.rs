//! Random sampling helpers.

use duet_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform random value in `[-1, 1]`.
#[inline]
pub fn gen_signed(rng: &mut dyn RngCore) -> f32 {
    rng.gen_range(-1.0..=1.0)
}

/// Uniform random point in the cube `[-1, 1]³`.
///
/// Not restricted to the unit ball or a hemisphere; callers that need a
/// direction normalize the result.
pub fn random_in_cube(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_signed(rng), gen_signed(rng), gen_signed(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_in_cube_bounds() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let p = random_in_cube(&mut rng);
            assert!(p.abs().max_element() <= 1.0);
        }
    }

    #[test]
    fn test_random_in_cube_covers_all_octants() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 8];

        for _ in 0..1000 {
            let p = random_in_cube(&mut rng);
            let octant = (p.x > 0.0) as usize | ((p.y > 0.0) as usize) << 1 | ((p.z > 0.0) as usize) << 2;
            seen[octant] = true;
        }

        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_gen_signed_mean_near_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 10_000;
        let mean: f32 = (0..n).map(|_| gen_signed(&mut rng)).sum::<f32>() / n as f32;

        assert!(mean.abs() < 0.05);
    }
}
