use std::f64::consts::PI;

use super::drone::DroneKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Direction a unit of this side faces when it has nothing to aim at.
    pub fn forward(&self) -> f64 {
        match self {
            Side::Player => -PI / 2.0,
            Side::Enemy => PI / 2.0,
        }
    }
}

/// A live drone on the battle map.
#[derive(Debug, Clone)]
pub struct Unit {
    pub kind: DroneKind,
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub x_velocity: f64,
    pub y_velocity: f64,
    /// Facing angle in radians, 0 along +x.
    pub heading: f64,
    /// Frames alive; drives the rotor animation.
    pub time: u64,
    pub health: f64,
    /// Frames since each weapon slot last fired.
    pub reloads: Vec<f64>,
    pub damage_flash_frames: u8,
}

impl Unit {
    pub fn new(kind: DroneKind, side: Side, x: f64, y: f64, x_velocity: f64, y_velocity: f64) -> Self {
        let spec = kind.spec();
        // Weapons start loaded
        let reloads = spec
            .firing
            .map(|f| f.weapons.iter().map(|w| w.reload).collect())
            .unwrap_or_default();

        Self {
            kind,
            side,
            x,
            y,
            x_velocity,
            y_velocity,
            heading: side.forward(),
            time: 0,
            health: spec.health,
            reloads,
            damage_flash_frames: 0,
        }
    }

    pub fn take_damage(&mut self, damage: f64) {
        self.health = (self.health - damage.max(0.0)).max(0.0);
        self.damage_flash_frames = 10;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_flashing(&self) -> bool {
        self.damage_flash_frames > 0
    }

    pub fn size(&self) -> f64 {
        self.kind.spec().size_x
    }

    /// Turns toward `target` by at most `max_turn` radians.
    pub fn turn_toward(&mut self, target: f64, max_turn: f64) {
        let delta = (target - self.heading + PI).rem_euclid(2.0 * PI) - PI;
        self.heading += delta.clamp(-max_turn, max_turn);
    }

    /// Sideways sway from the spawn velocity, bouncing off the map edges.
    pub fn drift(&mut self, width: f64) {
        self.x += self.x_velocity * 0.25;
        if self.x < 0.0 || self.x > width {
            self.x_velocity = -self.x_velocity;
            self.x = self.x.clamp(0.0, width);
        }
    }

    pub fn advance(&mut self, speed: f64) {
        let (sin, cos) = self.heading.sin_cos();
        self.x += cos * speed;
        self.y += sin * speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_starts_with_spec_health() {
        let unit = Unit::new(DroneKind::FighterDrone, Side::Player, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(unit.health, 30.0);
        assert_eq!(unit.reloads, vec![125.0]);
        assert_eq!(unit.heading, Side::Player.forward());
    }

    #[test]
    fn test_unit_take_damage() {
        let mut unit = Unit::new(DroneKind::WeakDrone, Side::Enemy, 0.0, 0.0, 0.0, 0.0);
        unit.take_damage(2.0);
        assert_eq!(unit.health, 3.0);
        assert!(unit.is_alive());
        assert!(unit.is_flashing());

        unit.take_damage(10.0);
        assert_eq!(unit.health, 0.0);
        assert!(!unit.is_alive());
    }

    #[test]
    fn test_turn_toward_limited() {
        let mut unit = Unit::new(DroneKind::Drone, Side::Player, 0.0, 0.0, 0.0, 0.0);
        unit.heading = 0.0;
        unit.turn_toward(1.0, 0.25);
        assert!((unit.heading - 0.25).abs() < 1e-9);

        unit.turn_toward(1.0, 5.0);
        assert!((unit.heading - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_turn_toward_takes_short_way() {
        let mut unit = Unit::new(DroneKind::Drone, Side::Player, 0.0, 0.0, 0.0, 0.0);
        unit.heading = PI - 0.1;
        unit.turn_toward(-PI + 0.1, 1.0);
        // Wraps through PI instead of sweeping back through zero
        assert!((unit.heading - (PI + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_advance_along_heading() {
        let mut unit = Unit::new(DroneKind::Plane, Side::Enemy, 100.0, 100.0, 0.0, 0.0);
        unit.advance(2.0);
        assert!((unit.x - 100.0).abs() < 1e-9);
        assert!((unit.y - 102.0).abs() < 1e-9);
    }

    #[test]
    fn test_drift_bounces_off_edge() {
        let mut unit = Unit::new(DroneKind::SwarmDrone, Side::Enemy, 599.9, 10.0, 1.0, 0.0);
        unit.drift(600.0);
        assert_eq!(unit.x, 600.0);
        assert_eq!(unit.x_velocity, -1.0);

        unit.drift(600.0);
        assert!(unit.x < 600.0);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_unit_health_never_increases(
                kind in prop::sample::select(DroneKind::ALL.to_vec()),
                damage_amounts in prop::collection::vec(-5.0f64..50.0, 0..10)
            ) {
                let mut unit = Unit::new(kind, Side::Player, 0.0, 0.0, 0.0, 0.0);
                let initial_health = unit.health;
                for damage in damage_amounts {
                    let before = unit.health;
                    unit.take_damage(damage);
                    prop_assert!(unit.health <= before);
                }
                prop_assert!(unit.health >= 0.0 && unit.health <= initial_health);
            }
        }
    }
}
