use super::unit::Side;
use crate::sketch::{Rgba, Sketch};

/// Default particle count when a projectile names a bare explosion particle.
pub const DEFAULT_EXPLOSION_COUNT: u8 = 12;
/// Default particle lifetime in frames for a bare explosion particle.
pub const DEFAULT_EXPLOSION_LIFETIME: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    GasParticle,
    ExplosionParticle,
    WeakDroneBullet,
    DroneBullet,
    StrongDroneBullet,
    PlaneBullet,
    PlaneBomb,
}

/// Bullets and particles share one record shape; the class is cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileClass {
    Bullet,
    Particle,
}

/// Particles released when a projectile is destroyed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub particle: ProjectileKind,
    pub count: u8,
    pub lifetime: u16,
}

impl Explosion {
    pub const fn of(particle: ProjectileKind) -> Self {
        Self {
            particle,
            count: DEFAULT_EXPLOSION_COUNT,
            lifetime: DEFAULT_EXPLOSION_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub name: &'static str,
    pub class: ProjectileClass,
    /// Both sizes live in `(0, 20)`.
    pub size_x: f64,
    pub size_y: f64,
    pub damage: f64,
    /// Survives hitting an enemy.
    pub immune: bool,
    pub explodes: Option<Explosion>,
}

static GAS_PARTICLE: ProjectileSpec = ProjectileSpec {
    name: "Gas Particle",
    class: ProjectileClass::Particle,
    size_x: 6.0,
    size_y: 6.0,
    damage: 0.05,
    immune: true,
    explodes: None,
};

static EXPLOSION_PARTICLE: ProjectileSpec = ProjectileSpec {
    name: "Explosion Particle",
    class: ProjectileClass::Particle,
    size_x: 4.0,
    size_y: 4.0,
    damage: 0.25,
    immune: true,
    explodes: None,
};

static WEAK_DRONE_BULLET: ProjectileSpec = ProjectileSpec {
    name: "Weak Drone Bullet",
    class: ProjectileClass::Bullet,
    size_x: 2.0,
    size_y: 2.0,
    damage: 0.5,
    immune: false,
    explodes: None,
};

static DRONE_BULLET: ProjectileSpec = ProjectileSpec {
    name: "Drone Bullet",
    class: ProjectileClass::Bullet,
    size_x: 3.0,
    size_y: 3.0,
    damage: 2.0,
    immune: false,
    explodes: None,
};

static STRONG_DRONE_BULLET: ProjectileSpec = ProjectileSpec {
    name: "Strong Drone Bullet",
    class: ProjectileClass::Bullet,
    size_x: 4.0,
    size_y: 4.0,
    damage: 7.5,
    immune: false,
    explodes: None,
};

static PLANE_BULLET: ProjectileSpec = ProjectileSpec {
    name: "Plane Bullet",
    class: ProjectileClass::Bullet,
    size_x: 5.0,
    size_y: 5.0,
    damage: 10.0,
    immune: false,
    explodes: None,
};

static PLANE_BOMB: ProjectileSpec = ProjectileSpec {
    name: "Plane Bomb",
    class: ProjectileClass::Bullet,
    size_x: 8.0,
    size_y: 8.0,
    damage: 75.0,
    immune: false,
    explodes: Some(Explosion::of(ProjectileKind::ExplosionParticle)),
};

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 7] = [
        ProjectileKind::GasParticle,
        ProjectileKind::ExplosionParticle,
        ProjectileKind::WeakDroneBullet,
        ProjectileKind::DroneBullet,
        ProjectileKind::StrongDroneBullet,
        ProjectileKind::PlaneBullet,
        ProjectileKind::PlaneBomb,
    ];

    pub fn spec(&self) -> &'static ProjectileSpec {
        match self {
            ProjectileKind::GasParticle => &GAS_PARTICLE,
            ProjectileKind::ExplosionParticle => &EXPLOSION_PARTICLE,
            ProjectileKind::WeakDroneBullet => &WEAK_DRONE_BULLET,
            ProjectileKind::DroneBullet => &DRONE_BULLET,
            ProjectileKind::StrongDroneBullet => &STRONG_DRONE_BULLET,
            ProjectileKind::PlaneBullet => &PLANE_BULLET,
            ProjectileKind::PlaneBomb => &PLANE_BOMB,
        }
    }

    pub fn is_particle(&self) -> bool {
        self.spec().class == ProjectileClass::Particle
    }

    /// Draws the projectile centred on the sketch origin.
    pub fn graphic(&self, sketch: &mut Sketch, color: Rgba) {
        let spec = self.spec();
        sketch.no_stroke();
        match self {
            ProjectileKind::GasParticle => {
                sketch.fill(color.lerp(Rgba::gray(90), 0.5).with_alpha(120));
            }
            ProjectileKind::ExplosionParticle => {
                sketch.fill(Rgba::rgb(255, 170, 60).lerp(color, 0.2));
            }
            ProjectileKind::PlaneBomb => {
                sketch.stroke(Rgba::BLACK).stroke_weight(1.0);
                sketch.fill(color.lerp(Rgba::BLACK, 0.5));
            }
            _ => {
                sketch.fill(color);
            }
        }
        sketch.ellipse(0.0, 0.0, spec.size_x, spec.size_y);
    }
}

/// A live bullet or particle on the battle map.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub lifetime: u16,
}

impl Projectile {
    pub fn new(kind: ProjectileKind, side: Side, x: f64, y: f64, angle: f64, speed: f64, lifetime: u16) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            kind,
            side,
            x,
            y,
            velocity_x: cos * speed,
            velocity_y: sin * speed,
            lifetime,
        }
    }

    pub fn update(&mut self) {
        self.lifetime = self.lifetime.saturating_sub(1);
        self.x += self.velocity_x;
        self.y += self.velocity_y;
    }

    pub fn is_dead(&self) -> bool {
        self.lifetime == 0
    }

    pub fn is_out_of_bounds(&self, width: f64, height: f64) -> bool {
        self.x < 0.0 || self.y < 0.0 || self.x > width || self.y > height
    }

    /// Distance at which the projectile touches a unit of the given width.
    pub fn hit_radius(&self, unit_size: f64) -> f64 {
        (unit_size + self.kind.spec().size_x) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_bomb_explodes() {
        for kind in ProjectileKind::ALL {
            let explodes = kind.spec().explodes.is_some();
            assert_eq!(explodes, kind == ProjectileKind::PlaneBomb, "{kind:?}");
        }

        let explosion = ProjectileKind::PlaneBomb.spec().explodes.unwrap();
        assert_eq!(explosion.particle, ProjectileKind::ExplosionParticle);
        assert_eq!(explosion.count, DEFAULT_EXPLOSION_COUNT);
    }

    #[test]
    fn test_particles_are_immune() {
        for kind in ProjectileKind::ALL {
            if kind.is_particle() {
                assert!(kind.spec().immune, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_projectile_moves_along_angle() {
        let mut projectile = Projectile::new(
            ProjectileKind::DroneBullet,
            Side::Player,
            10.0,
            10.0,
            0.0,
            5.0,
            3,
        );
        projectile.update();
        assert!((projectile.x - 15.0).abs() < 1e-9);
        assert!((projectile.y - 10.0).abs() < 1e-9);
        assert_eq!(projectile.lifetime, 2);
    }

    #[test]
    fn test_projectile_lifetime_expires() {
        let mut projectile = Projectile::new(
            ProjectileKind::GasParticle,
            Side::Enemy,
            10.0,
            10.0,
            1.0,
            0.8,
            2,
        );
        assert!(!projectile.is_dead());
        projectile.update();
        assert!(!projectile.is_dead());
        projectile.update();
        assert!(projectile.is_dead());
        // Saturates instead of wrapping
        projectile.update();
        assert_eq!(projectile.lifetime, 0);
    }

    #[test]
    fn test_projectile_out_of_bounds() {
        let projectile = Projectile::new(ProjectileKind::PlaneBullet, Side::Player, 700.0, 10.0, 0.0, 1.0, 5);
        assert!(projectile.is_out_of_bounds(600.0, 700.0));

        let projectile = Projectile::new(ProjectileKind::PlaneBullet, Side::Player, 300.0, 10.0, 0.0, 1.0, 5);
        assert!(!projectile.is_out_of_bounds(600.0, 700.0));
    }

    #[test]
    fn test_graphic_fits_declared_size() {
        for kind in ProjectileKind::ALL {
            let mut sketch = Sketch::new();
            kind.graphic(&mut sketch, Rgba::rgb(153, 255, 170));
            let (min, max) = sketch.bounds().unwrap();
            let spec = kind.spec();
            assert!(max.x - min.x <= spec.size_x + 1e-9, "{kind:?}");
            assert!(max.y - min.y <= spec.size_y + 1e-9, "{kind:?}");
        }
    }
}
