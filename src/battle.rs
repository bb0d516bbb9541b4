//! Battle simulation: rosters, targeting, firing, collisions and waves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::{DroneKind, Firing, Projectile, Side, Unit, create_explosion_particles};
use crate::utility::distance;

/// Logical width of the battle map.
pub const MAP_WIDTH: f64 = 600.0;
/// Logical height of the battle map; enemies crossing it win the round.
pub const MAP_HEIGHT: f64 = 700.0;
/// Tiles with a centre below this line belong to the player.
pub const PLAYER_TERRITORY: f64 = 350.0;

/// Valid hex rows are `1..MAX_ROW`, columns `1..MAX_COLUMN`.
pub const MAX_ROW: i32 = 30;
pub const MAX_COLUMN: i32 = 15;

/// Radians per frame for a turn speed of 1.
const TURN_RATE: f64 = 0.05;
/// Pixels per frame for a movement speed of 1.
const SPEED_SCALE: f64 = 0.5;

/// Enemy waves, spawned along the top edge in order.
pub const WAVES: &[&[(DroneKind, u8)]] = &[
    &[(DroneKind::DumbDrone, 4)],
    &[(DroneKind::WeakDrone, 4), (DroneKind::DumbDrone, 3)],
    &[(DroneKind::SwarmDrone, 6)],
    &[(DroneKind::Drone, 3), (DroneKind::WeakDrone, 4)],
    &[(DroneKind::FighterDrone, 2), (DroneKind::SwarmDrone, 5)],
    &[(DroneKind::GunnerDrone, 2), (DroneKind::Plane, 1)],
    &[
        (DroneKind::BomberPlane, 1),
        (DroneKind::GasserPlane, 1),
        (DroneKind::FighterDrone, 3),
    ],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Won,
    Lost,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("tile ({row}, {column}) is off the map")]
    OffMap { row: i32, column: i32 },

    #[error("tile ({row}, {column}) is in enemy territory")]
    EnemyTerritory { row: i32, column: i32 },

    #[error("tile ({row}, {column}) is already occupied")]
    Occupied { row: i32, column: i32 },

    #[error("costs ${price}, only ${money} available")]
    InsufficientFunds { price: u32, money: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleSettings {
    pub starting_money: u32,
    /// Frames between enemy waves.
    pub wave_interval: u64,
    pub seed: Option<u64>,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            starting_money: 150,
            wave_interval: 240,
            seed: None,
        }
    }
}

/// Centre of a hex tile in map coordinates.
pub fn tile_center(row: i32, column: i32) -> (f64, f64) {
    (20.0 * row as f64, 40.0 * column as f64)
}

pub fn tile_on_map(row: i32, column: i32) -> bool {
    row > 0 && row < MAX_ROW && column > 0 && column < MAX_COLUMN
}

/// Linear scan for the closest targetable unit in `others`.
///
/// Ties keep the first unit found.
fn nearest(unit: &Unit, others: &[Unit]) -> Option<(usize, f64)> {
    let mut closest: Option<(usize, f64)> = None;
    for (i, other) in others.iter().enumerate() {
        if other.kind.spec().untargetable || !other.is_alive() {
            continue;
        }
        let d = distance(unit.x, unit.y, other.x, other.y);
        if closest.is_none_or(|(_, best)| d < best) {
            closest = Some((i, d));
        }
    }
    closest
}

pub struct Battle {
    pub player: Vec<Unit>,
    pub enemy: Vec<Unit>,
    /// Bullets and particles from both sides
    pub projectiles: Vec<Projectile>,
    pub money: u32,
    pub kills: u32,
    pub frame: u64,
    waves: &'static [&'static [(DroneKind, u8)]],
    wave_index: usize,
    wave_interval: u64,
    next_wave_in: u64,
    rng: StdRng,
}

impl Battle {
    pub fn new(settings: BattleSettings) -> Self {
        Self::with_waves(settings, WAVES)
    }

    pub fn with_waves(settings: BattleSettings, waves: &'static [&'static [(DroneKind, u8)]]) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            player: Vec::new(),
            enemy: Vec::new(),
            projectiles: Vec::new(),
            money: settings.starting_money,
            kills: 0,
            frame: 0,
            waves,
            wave_index: 0,
            wave_interval: settings.wave_interval,
            next_wave_in: settings.wave_interval,
            rng,
        }
    }

    pub fn roster(&self, side: Side) -> &[Unit] {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Number of waves already released.
    pub fn waves_spawned(&self) -> usize {
        self.wave_index
    }

    pub fn total_waves(&self) -> usize {
        self.waves.len()
    }

    /// Frames until the next wave, or `None` once every wave is out.
    pub fn next_wave_in(&self) -> Option<u64> {
        (self.wave_index < self.waves.len()).then_some(self.next_wave_in)
    }

    /// Adds a unit to a roster. Missing velocity components are random in `[-1, 1]`.
    pub fn push_character(
        &mut self,
        side: Side,
        kind: DroneKind,
        x: f64,
        y: f64,
        velocity: Option<(f64, f64)>,
    ) {
        let (x_velocity, y_velocity) = velocity.unwrap_or_else(|| {
            (
                self.rng.random_range(-1.0..=1.0),
                self.rng.random_range(-1.0..=1.0),
            )
        });

        let unit = Unit::new(kind, side, x, y, x_velocity, y_velocity);
        match side {
            Side::Player => self.player.push(unit),
            Side::Enemy => self.enemy.push(unit),
        }
    }

    /// Closest opposing unit to `self.roster(side)[index]`, with its distance.
    pub fn nearest_enemy(&self, side: Side, index: usize) -> Option<(usize, f64)> {
        let unit = self.roster(side).get(index)?;
        nearest(unit, self.roster(side.opponent()))
    }

    /// Buys a player drone at the centre of a hex tile.
    pub fn place(&mut self, kind: DroneKind, row: i32, column: i32) -> Result<(), PlacementError> {
        if !tile_on_map(row, column) {
            return Err(PlacementError::OffMap { row, column });
        }

        let (x, y) = tile_center(row, column);
        if y < PLAYER_TERRITORY {
            return Err(PlacementError::EnemyTerritory { row, column });
        }

        if self
            .player
            .iter()
            .any(|unit| distance(unit.x, unit.y, x, y) < 1.0)
        {
            return Err(PlacementError::Occupied { row, column });
        }

        let price = kind.spec().price;
        if price > self.money {
            return Err(PlacementError::InsufficientFunds {
                price,
                money: self.money,
            });
        }

        self.money -= price;
        self.push_character(Side::Player, kind, x, y, Some((0.0, 0.0)));
        log::info!("Placed {} at tile ({row}, {column}), ${} left", kind.name(), self.money);
        Ok(())
    }

    pub fn outcome(&self) -> Outcome {
        if self.enemy.iter().any(|unit| unit.y > MAP_HEIGHT) {
            Outcome::Lost
        } else if self.wave_index >= self.waves.len() && self.enemy.is_empty() {
            Outcome::Won
        } else {
            Outcome::Ongoing
        }
    }

    /// Advances the battle by one frame.
    pub fn tick(&mut self) {
        self.frame += 1;

        self.update_waves();

        step_side(&mut self.player, &self.enemy, &mut self.projectiles, &mut self.rng);
        step_side(&mut self.enemy, &self.player, &mut self.projectiles, &mut self.rng);

        for projectile in &mut self.projectiles {
            projectile.update();
        }

        self.check_collisions();
        self.remove_dead();
    }

    fn update_waves(&mut self) {
        if self.wave_index >= self.waves.len() {
            return;
        }

        if self.next_wave_in > 0 {
            self.next_wave_in -= 1;
            return;
        }

        let wave = self.waves[self.wave_index];
        for &(kind, count) in wave {
            for _ in 0..count {
                let x = self.rng.random_range(40.0..MAP_WIDTH - 40.0);
                let y = self.rng.random_range(0.0..30.0);
                self.push_character(Side::Enemy, kind, x, y, None);
            }
        }

        self.wave_index += 1;
        self.next_wave_in = self.wave_interval;
        log::info!("Wave {}/{} released", self.wave_index, self.waves.len());
    }

    fn check_collisions(&mut self) {
        let mut spawned = Vec::new();
        let mut projectiles_to_remove = Vec::new();

        for (p_idx, projectile) in self.projectiles.iter().enumerate() {
            let spec = projectile.kind.spec();
            let targets = match projectile.side {
                Side::Player => &mut self.enemy,
                Side::Enemy => &mut self.player,
            };

            let mut destroyed = false;
            for unit in targets.iter_mut().filter(|u| u.is_alive()) {
                let reach = projectile.hit_radius(unit.size());
                if distance(projectile.x, projectile.y, unit.x, unit.y) < reach {
                    unit.take_damage(spec.damage);
                    if !spec.immune {
                        destroyed = true;
                        break;
                    }
                }
            }

            let expired = projectile.is_dead();
            if destroyed || expired || projectile.is_out_of_bounds(MAP_WIDTH, MAP_HEIGHT) {
                projectiles_to_remove.push(p_idx);
            }

            // Bombs burst both on impact and when they land
            if let Some(explosion) = spec.explodes.filter(|_| destroyed || expired) {
                spawned.extend(create_explosion_particles(
                    &explosion,
                    projectile.side,
                    projectile.x,
                    projectile.y,
                    &mut self.rng,
                ));
            }
        }

        // Remove in reverse order to avoid index issues
        for idx in projectiles_to_remove.into_iter().rev() {
            self.projectiles.swap_remove(idx);
        }
        self.projectiles.extend(spawned);
    }

    fn remove_dead(&mut self) {
        for unit in self.enemy.iter().filter(|u| !u.is_alive()) {
            let reward = unit.kind.spec().price / 2;
            self.money += reward;
            self.kills += 1;
            log::debug!("{} destroyed, +${reward}", unit.kind.name());
        }
        self.enemy.retain(Unit::is_alive);

        for unit in self.player.iter().filter(|u| !u.is_alive()) {
            log::debug!("Lost a {}", unit.kind.name());
        }
        self.player.retain(Unit::is_alive);
    }
}

/// Moves, aims and fires every unit of one side against `others`.
fn step_side(own: &mut [Unit], others: &[Unit], projectiles: &mut Vec<Projectile>, rng: &mut StdRng) {
    for unit in own.iter_mut() {
        unit.time += 1;
        unit.damage_flash_frames = unit.damage_flash_frames.saturating_sub(1);

        let spec = unit.kind.spec();
        let reach = spec.firing.map(|f| f.max_range()).unwrap_or(0.0);
        let (speed, turn) = spec
            .movement
            .map(|m| (m.speed * SPEED_SCALE, m.turn_speed * TURN_RATE))
            .unwrap_or((0.0, 0.0));

        let target = nearest(unit, others);

        match target {
            Some((idx, dist)) => {
                let other = &others[idx];
                let aim = (other.y - unit.y).atan2(other.x - unit.x);
                // Player drones guard their tile; enemies close in until in range
                let hold = unit.side == Side::Player || dist <= reach + other.size() / 2.0;
                if hold {
                    unit.turn_toward(aim, turn.max(TURN_RATE));
                } else {
                    unit.turn_toward(aim, turn);
                    unit.advance(speed);
                }
            }
            None if unit.side == Side::Enemy => {
                unit.turn_toward(Side::Enemy.forward(), turn);
                unit.advance(speed);
                unit.drift(MAP_WIDTH);
            }
            None => {}
        }

        let Some(firing) = spec.firing else {
            continue;
        };
        let target = target.map(|(idx, dist)| (&others[idx], dist));
        fire_weapons(unit, &firing, target, projectiles, rng);
    }
}

/// Ticks each weapon slot's reload counter and fires the loaded slots whose
/// range reaches `target`.
///
/// Range is measured to the edge of the target, so both the fire check and the
/// bullet lifetime use `range + target.size() / 2`.
fn fire_weapons(
    unit: &mut Unit,
    firing: &Firing,
    target: Option<(&Unit, f64)>,
    projectiles: &mut Vec<Projectile>,
    rng: &mut StdRng,
) {
    for (slot, weapon) in firing.weapons.iter().enumerate() {
        // Infinite reload never fires
        if !weapon.reload.is_finite() {
            continue;
        }
        let Some(counter) = unit.reloads.get_mut(slot) else {
            continue;
        };
        *counter += 1.0;

        let Some((other, dist)) = target else {
            continue;
        };
        let reach = weapon.range + other.size() / 2.0;
        if *counter < weapon.reload || dist > reach {
            continue;
        }
        *counter = 0.0;

        let spread = if firing.accuracy > 0.0 {
            rng.random_range(-firing.accuracy / 2.0..=firing.accuracy / 2.0)
        } else {
            0.0
        };
        let lifetime = (reach / weapon.bullet_speed).ceil() + 1.0;

        projectiles.push(Projectile::new(
            weapon.projectile,
            unit.side,
            unit.x,
            unit.y,
            unit.heading + spread,
            weapon.bullet_speed,
            lifetime.min(u16::MAX as f64) as u16,
        ));
    }
}
