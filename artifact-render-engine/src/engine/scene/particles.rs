use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::composer::{ParticleFieldSpec, StarFieldSpec};

const STAR_SEED_SALT: u64 = 0x5354_4152_4649_454c;

/// Dust motes uniformly scattered in a cube of edge `spread` around the origin.
///
/// Positions depend only on `seed`, so a session keeps the same field across
/// view mode rebuilds.
pub fn scatter_particles(spec: &ParticleFieldSpec, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..spec.count)
        .map(|_| {
            Vec3::new(
                rng.random_range(-0.5..0.5),
                rng.random_range(-0.5..0.5),
                rng.random_range(-0.5..0.5),
            ) * spec.spread
        })
        .collect()
}

/// Stars on a spherical shell between `radius` and `radius + depth`.
pub fn scatter_stars(spec: &StarFieldSpec, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed ^ STAR_SEED_SALT);
    (0..spec.count)
        .map(|_| {
            let r = spec.radius + spec.depth * rng.random::<f32>();
            // Uniform direction: cos(polar) uniform in [-1, 1]
            let cos_polar: f32 = rng.random_range(-1.0..=1.0);
            let sin_polar = (1.0 - cos_polar * cos_polar).max(0.0).sqrt();
            let azimuth = rng.random_range(0.0..TAU);
            Vec3::new(
                r * sin_polar * azimuth.cos(),
                r * cos_polar,
                r * sin_polar * azimuth.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::composer::{SceneComposer, SceneContext};
    use crate::engine::shapes::ShapeRegistry;
    use crate::engine::viewer::lifecycle::ViewMode;
    use std::time::Duration;

    fn viewer_scene() -> (ParticleFieldSpec, StarFieldSpec) {
        let scene = SceneComposer::default().compose(
            &ShapeRegistry::resolve("bust"),
            ViewMode::Solid,
            Duration::ZERO,
            SceneContext::Viewer,
        );
        (scene.particles, scene.stars.unwrap())
    }

    #[test]
    fn particles_stay_inside_the_spread_cube() {
        let (particles, _) = viewer_scene();
        let points = scatter_particles(&particles, 7);

        assert_eq!(points.len(), 200);
        let half = particles.spread / 2.0;
        assert!(points.iter().all(|p| p.abs().max_element() <= half));
    }

    #[test]
    fn same_seed_gives_same_field() {
        let (particles, stars) = viewer_scene();

        assert_eq!(scatter_particles(&particles, 42), scatter_particles(&particles, 42));
        assert_ne!(scatter_particles(&particles, 42), scatter_particles(&particles, 43));
        assert_eq!(scatter_stars(&stars, 42), scatter_stars(&stars, 42));
    }

    #[test]
    fn stars_sit_in_their_shell() {
        let (_, stars) = viewer_scene();
        let points = scatter_stars(&stars, 3);

        assert_eq!(points.len(), 400);
        for p in points {
            let r = p.length();
            assert!(r >= stars.radius - 1e-3 && r <= stars.radius + stars.depth + 1e-3);
        }
    }
}
