mod catalog;
mod drone;
mod particle;
mod projectile;
mod unit;

// Re-export all public types
pub use catalog::{CatalogError, MAX_WEAPON_SLOTS, validate_catalog, validate_drone, validate_projectile};
pub use drone::{DroneKind, DroneSpec, Firing, Movement, Weapon};
pub use particle::create_explosion_particles;
pub use projectile::{
    DEFAULT_EXPLOSION_COUNT, DEFAULT_EXPLOSION_LIFETIME, Explosion, Projectile, ProjectileClass,
    ProjectileKind, ProjectileSpec,
};
pub use unit::{Side, Unit};
