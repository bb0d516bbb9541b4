use std::f64::consts::TAU;

use rand::Rng;

use super::projectile::{Explosion, Projectile};
use super::unit::Side;

/// Fastest speed an explosion particle leaves the blast with, in px/frame.
const MAX_PARTICLE_SPEED: f64 = 1.5;

/// Creates the particle burst for a destroyed projectile.
///
/// Particles are spread evenly around the blast centre with a random jitter
/// on angle and speed, and belong to the side that fired the projectile.
pub fn create_explosion_particles<R: Rng>(
    explosion: &Explosion,
    side: Side,
    center_x: f64,
    center_y: f64,
    rng: &mut R,
) -> Vec<Projectile> {
    let count = explosion.count.max(1) as usize;
    let step = TAU / count as f64;

    (0..count)
        .map(|i| {
            let angle = step * i as f64 + rng.random_range(-step / 2.0..step / 2.0);
            let speed = rng.random_range(0.2..MAX_PARTICLE_SPEED);
            Projectile::new(
                explosion.particle,
                side,
                center_x,
                center_y,
                angle,
                speed,
                explosion.lifetime,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProjectileKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_create_explosion_particles() {
        let mut rng = StdRng::seed_from_u64(7);
        let explosion = Explosion::of(ProjectileKind::ExplosionParticle);
        let particles = create_explosion_particles(&explosion, Side::Player, 10.0, 10.0, &mut rng);

        assert_eq!(particles.len(), explosion.count as usize);

        // All particles start at the blast centre
        for particle in particles.iter() {
            assert_eq!(particle.x, 10.0);
            assert_eq!(particle.y, 10.0);
            assert_eq!(particle.kind, ProjectileKind::ExplosionParticle);
            assert_eq!(particle.side, Side::Player);
            assert_eq!(particle.lifetime, explosion.lifetime);
        }
    }

    #[test]
    fn test_particles_spread_out() {
        let mut rng = StdRng::seed_from_u64(11);
        let explosion = Explosion {
            particle: ProjectileKind::ExplosionParticle,
            count: 8,
            lifetime: 10,
        };
        let mut particles = create_explosion_particles(&explosion, Side::Enemy, 100.0, 100.0, &mut rng);

        for particle in particles.iter_mut() {
            particle.update();
        }

        let speeds: Vec<f64> = particles
            .iter()
            .map(|p| ((p.x - 100.0).powi(2) + (p.y - 100.0).powi(2)).sqrt())
            .collect();
        assert!(speeds.iter().all(|s| *s >= 0.2 - 1e-9 && *s <= MAX_PARTICLE_SPEED));
    }

    #[test]
    fn test_zero_count_still_emits_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let explosion = Explosion {
            particle: ProjectileKind::GasParticle,
            count: 0,
            lifetime: 5,
        };
        let particles = create_explosion_particles(&explosion, Side::Player, 0.0, 0.0, &mut rng);
        assert_eq!(particles.len(), 1);
    }
}
