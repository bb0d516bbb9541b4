//! Range checks for the static entity tables.

use std::f64::consts::TAU;

use super::drone::DroneKind;
use super::projectile::ProjectileKind;

/// Maximum number of weapon slots a drone can carry.
pub const MAX_WEAPON_SLOTS: usize = 4;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("{entity}: {field} {value} outside {range}")]
    OutOfRange {
        entity: &'static str,
        field: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("{entity}: {count} weapon slots, at most 4 allowed")]
    TooManyWeapons { entity: &'static str, count: usize },

    #[error("{entity}: firing profile has no weapons")]
    NoWeapons { entity: &'static str },
}

fn check(
    entity: &'static str,
    field: &'static str,
    value: f64,
    range: &'static str,
    ok: bool,
) -> Result<(), CatalogError> {
    if ok {
        Ok(())
    } else {
        Err(CatalogError::OutOfRange {
            entity,
            field,
            value,
            range,
        })
    }
}

pub fn validate_projectile(kind: ProjectileKind) -> Result<(), CatalogError> {
    let spec = kind.spec();
    let name = spec.name;

    check(name, "size_x", spec.size_x, "(0, 20)", spec.size_x > 0.0 && spec.size_x < 20.0)?;
    check(name, "size_y", spec.size_y, "(0, 20)", spec.size_y > 0.0 && spec.size_y < 20.0)?;
    check(name, "damage", spec.damage, "[0, inf)", spec.damage >= 0.0)?;

    if let Some(explosion) = spec.explodes {
        let count = explosion.count as f64;
        check(name, "explosion count", count, "(0, 50)", explosion.count > 0 && explosion.count < 50)?;
        check(
            name,
            "explosion particle",
            0.0,
            "particles",
            explosion.particle.is_particle(),
        )?;
    }

    Ok(())
}

pub fn validate_drone(kind: DroneKind) -> Result<(), CatalogError> {
    let spec = kind.spec();
    let name = spec.name;

    let price = spec.price as f64;
    check(name, "price", price, "[5, 5000]", (5..=5000).contains(&spec.price))?;
    check(name, "size_x", spec.size_x, "(0, 100)", spec.size_x > 0.0 && spec.size_x < 100.0)?;
    check(name, "size_y", spec.size_y, "(0, 100)", spec.size_y > 0.0 && spec.size_y < 100.0)?;
    check(name, "health", spec.health, "(0, inf)", spec.health > 0.0)?;

    if let Some(firing) = spec.firing {
        if firing.weapons.is_empty() {
            return Err(CatalogError::NoWeapons { entity: name });
        }
        if firing.weapons.len() > MAX_WEAPON_SLOTS {
            return Err(CatalogError::TooManyWeapons {
                entity: name,
                count: firing.weapons.len(),
            });
        }

        // 6.28 is accepted as "all directions" alongside TAU itself
        check(
            name,
            "accuracy",
            firing.accuracy,
            "[0, 2π]",
            (0.0..=TAU).contains(&firing.accuracy),
        )?;

        for weapon in firing.weapons {
            check(name, "reload", weapon.reload, "[1, inf]", weapon.reload >= 1.0)?;
            check(name, "range", weapon.range, "[0, inf)", weapon.range >= 0.0)?;
            check(
                name,
                "bullet speed",
                weapon.bullet_speed,
                "(0, inf)",
                weapon.bullet_speed > 0.0,
            )?;
        }
    }

    if let Some(movement) = spec.movement {
        check(name, "speed", movement.speed, "[0, 10]", (0.0..=10.0).contains(&movement.speed))?;
        check(
            name,
            "turn speed",
            movement.turn_speed,
            "[0, 10]",
            (0.0..=10.0).contains(&movement.turn_speed),
        )?;
    }

    Ok(())
}

/// Validates every projectile and drone table entry.
pub fn validate_catalog() -> Result<(), CatalogError> {
    for kind in ProjectileKind::ALL {
        validate_projectile(kind)?;
    }
    for kind in DroneKind::ALL {
        validate_drone(kind)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_catalog_is_valid() {
        assert_eq!(validate_catalog(), Ok(()));
    }

    #[test]
    fn test_out_of_range_message() {
        let err = check("Plane", "price", 9000.0, "[5, 5000]", false).unwrap_err();
        assert_eq!(err.to_string(), "Plane: price 9000 outside [5, 5000]");
    }

    #[test]
    fn test_too_many_weapons_message() {
        let err = CatalogError::TooManyWeapons {
            entity: "Plane",
            count: 5,
        };
        assert_eq!(err.to_string(), "Plane: 5 weapon slots, at most 4 allowed");
    }
}
