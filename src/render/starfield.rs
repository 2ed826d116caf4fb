//! Background starfield: a fixed shell of grey point stars that twinkle.

use rand::Rng;

use crate::render::math::{self, Vec3};

pub const STAR_COUNT: usize = 5000;
/// Inner radius of the shell.
pub const RADIUS: f32 = 100.0;
/// Shell thickness beyond the inner radius.
pub const DEPTH: f32 = 50.0;
/// Base size multiplier.
pub const FACTOR: f32 = 4.0;
/// Twinkle rate.
pub const SPEED: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub size: f32,
    /// Grey level in `[0, 1]`.
    pub brightness: f32,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_count(rng, STAR_COUNT)
    }

    pub fn with_count<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        let mut stars = Vec::with_capacity(count);
        let mut r = RADIUS + DEPTH;
        let step = if count > 0 { DEPTH / count as f32 } else { 0.0 };
        for _ in 0..count {
            // Shells shrink slowly so nearer stars are spread through the depth.
            r -= step * rng.random::<f32>();
            stars.push(Star {
                position: math::scale(random_direction(rng), r),
                size: (0.5 + 0.5 * rng.random::<f32>()) * FACTOR,
                brightness: 0.9,
            });
        }
        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// On-screen diameter in pixels for a star at `depth` at time `t`.
    pub fn point_size(star: &Star, depth: f32, t: f32) -> f32 {
        star.size * (30.0 / depth.max(1e-3)) * (3.0 + (t * SPEED + 100.0).sin())
    }
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let cos_theta = 2.0 * rng.random::<f32>() - 1.0;
    let phi = std::f32::consts::TAU * rng.random::<f32>();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    [sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn stars_fill_the_shell() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = Starfield::generate(&mut rng);
        assert_eq!(field.stars().len(), STAR_COUNT);
        for star in field.stars() {
            let d = math::length(star.position);
            assert!(d >= RADIUS - 1e-2 && d <= RADIUS + DEPTH + 1e-2, "{}", d);
            assert!(star.size >= 0.5 * FACTOR && star.size <= FACTOR);
        }
    }

    #[test]
    fn same_seed_same_sky() {
        let a = Starfield::with_count(&mut StdRng::seed_from_u64(1), 64);
        let b = Starfield::with_count(&mut StdRng::seed_from_u64(1), 64);
        assert_eq!(a.stars(), b.stars());
    }

    #[test]
    fn point_size_shrinks_with_depth() {
        let star = Star { position: [0.0; 3], size: 4.0, brightness: 0.9 };
        assert!(Starfield::point_size(&star, 100.0, 0.0) > Starfield::point_size(&star, 150.0, 0.0));
        assert!(Starfield::point_size(&star, 100.0, 0.0) > 0.0);
    }
}
