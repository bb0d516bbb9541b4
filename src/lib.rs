// Library exports for the binary and the integration tests
pub use app::App;
pub use battle::{Battle, BattleSettings, Outcome, PlacementError};
pub use config::{Config, ConfigError};
pub use entities::{CatalogError, DroneKind, Projectile, ProjectileKind, Side, Unit, validate_catalog};
pub use scene::{Scene, Transition};

pub mod app;
pub mod battle;
pub mod config;
pub mod entities;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod scene;
pub mod sketch;
pub mod utility;
