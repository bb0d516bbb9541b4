use std::f64::consts::PI;

use super::projectile::ProjectileKind;
use crate::sketch::{Rgba, Sketch};

/// One weapon slot of a drone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub projectile: ProjectileKind,
    /// Frames between shots; `f64::INFINITY` never fires.
    pub reload: f64,
    pub range: f64,
    pub bullet_speed: f64,
}

/// Firing profile: up to four weapon slots sharing one accuracy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Firing {
    pub weapons: &'static [Weapon],
    /// Spread in radians: 0 is perfect, π is worst, 2π fires in all directions.
    pub accuracy: f64,
}

impl Firing {
    /// Longest range across all weapon slots.
    pub fn max_range(&self) -> f64 {
        self.weapons.iter().map(|w| w.range).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub speed: f64,
    pub turn_speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub price: u32,
    /// Enemies never pick this drone as a target.
    pub untargetable: bool,
    pub size_x: f64,
    pub size_y: f64,
    pub health: f64,
    pub firing: Option<Firing>,
    pub movement: Option<Movement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DroneKind {
    DumbDrone,
    WeakDrone,
    Drone,
    SwarmDrone,
    FighterDrone,
    GunnerDrone,
    Plane,
    GasserPlane,
    BomberPlane,
}

const fn single(projectile: ProjectileKind, reload: f64, range: f64, bullet_speed: f64) -> Weapon {
    Weapon {
        projectile,
        reload,
        range,
        bullet_speed,
    }
}

static DUMB_DRONE: DroneSpec = DroneSpec {
    name: "Dumb Drone",
    description: "A pathetically weak drone that isn't even worth acknowledging.",
    price: 5,
    untargetable: false,
    size_x: 20.0,
    size_y: 20.0,
    health: 0.1,
    firing: Some(Firing {
        weapons: &[single(ProjectileKind::WeakDroneBullet, 400.0, 60.0, 4.0)],
        accuracy: 0.1,
    }),
    movement: Some(Movement {
        speed: 2.0,
        turn_speed: 1.0,
    }),
};

static WEAK_DRONE: DroneSpec = DroneSpec {
    name: "Weak Drone",
    description: "A weak drone that is more intelligent and slightly better than the dumb drone but still has bad stats.",
    price: 10,
    untargetable: false,
    size_x: 30.0,
    size_y: 30.0,
    health: 5.0,
    firing: Some(Firing {
        weapons: &[single(ProjectileKind::WeakDroneBullet, 200.0, 80.0, 5.0)],
        accuracy: 0.1,
    }),
    movement: Some(Movement {
        speed: 1.0,
        turn_speed: 1.0,
    }),
};

static DRONE: DroneSpec = DroneSpec {
    name: "Drone",
    description: "A below average drone that has better stats than the dumb and weak drones but is still quite bad.",
    price: 25,
    untargetable: false,
    size_x: 40.0,
    size_y: 40.0,
    health: 20.0,
    firing: Some(Firing {
        weapons: &[single(ProjectileKind::DroneBullet, 150.0, 80.0, 5.0)],
        accuracy: 0.0,
    }),
    movement: Some(Movement {
        speed: 1.0,
        turn_speed: 1.0,
    }),
};

static SWARM_DRONE: DroneSpec = DroneSpec {
    name: "Swarm Drone",
    description: "A drone that has similar stats to the Weak Drone but is capable of traveling in large groups.",
    price: 15,
    untargetable: false,
    size_x: 30.0,
    size_y: 30.0,
    health: 5.0,
    firing: Some(Firing {
        weapons: &[single(ProjectileKind::WeakDroneBullet, 200.0, 60.0, 6.0)],
        accuracy: 0.1,
    }),
    movement: Some(Movement {
        speed: 1.25,
        turn_speed: 1.0,
    }),
};

static FIGHTER_DRONE: DroneSpec = DroneSpec {
    name: "Fighter Drone",
    description: "A more powerful drone that deals higher damage than the rest.",
    price: 50,
    untargetable: false,
    size_x: 45.0,
    size_y: 45.0,
    health: 30.0,
    firing: Some(Firing {
        weapons: &[single(ProjectileKind::StrongDroneBullet, 125.0, 200.0, 7.5)],
        accuracy: 0.0,
    }),
    movement: Some(Movement {
        speed: 1.25,
        turn_speed: 1.0,
    }),
};

static GUNNER_DRONE: DroneSpec = DroneSpec {
    name: "Gunner Drone",
    description: "A powerful drone that shoots quick but weak shots. It has higher health and defense than the rest.",
    price: 75,
    untargetable: false,
    size_x: 40.0,
    size_y: 40.0,
    health: 40.0,
    firing: Some(Firing {
        weapons: &[single(ProjectileKind::WeakDroneBullet, 10.0, 275.0, 4.0)],
        accuracy: 0.05,
    }),
    movement: Some(Movement {
        speed: 0.75,
        turn_speed: 1.0,
    }),
};

static PLANE: DroneSpec = DroneSpec {
    name: "Plane",
    description: "A fast and light craft that shoots at enemies from above.",
    price: 125,
    untargetable: false,
    size_x: 45.0,
    size_y: 55.0,
    health: 80.0,
    firing: Some(Firing {
        weapons: &[single(ProjectileKind::PlaneBullet, 60.0, 200.0, 5.0)],
        accuracy: 0.0,
    }),
    movement: Some(Movement {
        speed: 2.0,
        turn_speed: 1.0,
    }),
};

static GASSER_PLANE: DroneSpec = DroneSpec {
    name: "Gasser Plane",
    description: "A fairly quick craft that drops toxic gas from above.",
    price: 175,
    untargetable: false,
    size_x: 45.0,
    size_y: 45.0,
    health: 60.0,
    firing: Some(Firing {
        weapons: &[single(ProjectileKind::GasParticle, 1.0, 10.0, 0.8)],
        accuracy: 6.28,
    }),
    movement: Some(Movement {
        speed: 1.25,
        turn_speed: 1.0,
    }),
};

static BOMBER_PLANE: DroneSpec = DroneSpec {
    name: "Bomber Plane",
    description: "A plane with incredible destructive capabilities- it shoots exploding bombs that deal splash damage.",
    price: 75,
    untargetable: false,
    size_x: 45.0,
    size_y: 55.0,
    health: 100.0,
    firing: Some(Firing {
        weapons: &[single(ProjectileKind::PlaneBomb, 350.0, 150.0, 4.0)],
        accuracy: 0.0,
    }),
    movement: Some(Movement {
        speed: 1.0,
        turn_speed: 1.0,
    }),
};

impl DroneKind {
    /// Gallery and shop order.
    pub const ALL: [DroneKind; 9] = [
        DroneKind::DumbDrone,
        DroneKind::WeakDrone,
        DroneKind::Drone,
        DroneKind::SwarmDrone,
        DroneKind::FighterDrone,
        DroneKind::GunnerDrone,
        DroneKind::Plane,
        DroneKind::GasserPlane,
        DroneKind::BomberPlane,
    ];

    pub fn spec(&self) -> &'static DroneSpec {
        match self {
            DroneKind::DumbDrone => &DUMB_DRONE,
            DroneKind::WeakDrone => &WEAK_DRONE,
            DroneKind::Drone => &DRONE,
            DroneKind::SwarmDrone => &SWARM_DRONE,
            DroneKind::FighterDrone => &FIGHTER_DRONE,
            DroneKind::GunnerDrone => &GUNNER_DRONE,
            DroneKind::Plane => &PLANE,
            DroneKind::GasserPlane => &GASSER_PLANE,
            DroneKind::BomberPlane => &BOMBER_PLANE,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Draws the drone centred on the sketch origin, facing -y.
    ///
    /// `time` animates rotors and propellers; translucent accents take a local
    /// copy of `color`.
    pub fn graphic(&self, sketch: &mut Sketch, color: Rgba, time: f64) {
        let size = self.spec().size_x;
        match self {
            DroneKind::DumbDrone => {
                let frame = color.lerp(Rgba::WHITE, 0.6);
                quad_frame(sketch, frame, 4.0, size);
                sketch.no_stroke().fill(frame);
                sketch.rounded_rect(0.0, 0.0, size * 0.25, size * 0.5, 50.0);
                sketch.fill(color.lerp(Rgba::WHITE, 0.4));
                sketch.ellipse(0.0, 0.0, size * 0.2, size * 0.3);
                rotors(sketch, color.lerp(Rgba::BLACK, 0.5), 2.0, size, time / 2.0, 0.15);
            }
            DroneKind::WeakDrone => {
                quad_frame(sketch, color, 4.0, size);
                sketch.no_stroke().fill(color);
                sketch.rounded_rect(0.0, 0.0, size * 0.25, size * 0.5, 50.0);
                sketch.fill(Rgba::gray_alpha(0, 50));
                sketch.ellipse(0.0, 0.0, size * 0.2, size * 0.3);
                rotors(sketch, Rgba::BLACK, 2.0, size, time / 2.0, 0.15);
            }
            DroneKind::Drone => {
                quad_frame(sketch, color.lerp(Rgba::gray(150), 0.5), 5.0, size);
                sketch.no_stroke().fill(Rgba::gray(125));
                sketch.rounded_rect(0.0, 0.0, size * 0.25, size * 0.55, 50.0);
                sketch.fill(color);
                sketch.ellipse(0.0, 0.0, size * 0.4, size * 0.4);
                sketch.fill(Rgba::gray_alpha(0, 30));
                sketch.ellipse(-size * 0.02, size * 0.02, size * 0.3, size * 0.3);
                sketch.fill(color.with_alpha(100));
                sketch.ellipse(size * 0.05, -size * 0.05, size * 0.3, size * 0.3);
                rotors(sketch, Rgba::BLACK, 3.0, size, time / 2.0, 0.15);
            }
            DroneKind::SwarmDrone => {
                quad_frame(sketch, Rgba::gray(100), 4.0, size);
                sketch.no_stroke().fill(Rgba::gray(60));
                sketch.rounded_rect(0.0, 0.0, size * 0.25, size * 0.5, 50.0);
                let accent = color.with_alpha(150);
                sketch.fill(accent);
                sketch.ellipse(0.0, -size * 0.1, size * 0.2, size * 0.3);
                rotors(sketch, accent, 2.0, size, time / 2.0, 0.15);
            }
            DroneKind::FighterDrone => {
                quad_frame(sketch, Rgba::gray(100), 6.0, size);
                sketch.no_stroke().fill(Rgba::gray(60));
                sketch.rounded_rect(0.0, 0.0, size * 0.25, size * 0.5, 50.0);
                sketch.ellipse(0.0, -size * 0.03, size * 0.4, size * 0.45);
                let accent = color.with_alpha(150);
                sketch.fill(accent);
                sketch.ellipse(0.0, -size * 0.1, size * 0.2, size * 0.3);
                rotors(sketch, accent, 3.0, size, time / 2.0, 0.125);

                let (sfs, cfs) = (time / 4.0).sin_cos();
                sketch.stroke(color.lerp(Rgba::WHITE, 0.6)).stroke_weight(4.0);
                sketch.line(
                    size * 0.25 * sfs,
                    size * 0.25 * cfs,
                    -size * 0.25 * sfs,
                    -size * 0.25 * cfs,
                );
            }
            DroneKind::GunnerDrone => {
                let (sf, cf) = (time / 6.0).sin_cos();
                sketch.no_stroke().fill(color);
                sketch.ellipse(0.0, size * 0.05, size * 0.5, size * 0.7);
                sketch.ellipse(0.0, -size * 0.05, size * 0.6, size * 0.6);
                sketch.ellipse(-size * 0.2, -size * 0.2, 10.0, 10.0);
                sketch.ellipse(size * 0.2, -size * 0.2, 10.0, 10.0);
                sketch.fill(color.lerp(Rgba::BLACK, 0.2));
                sketch.ellipse(0.0, size * 0.15, size * 0.4, size * 0.5);
                sketch.ellipse(-size * 0.11, -size * 0.05, size * 0.3, size * 0.5);
                sketch.ellipse(-size * 0.2, -size * 0.2, 10.0, 10.0);
                sketch.fill(Rgba::gray_alpha(255, 100));
                sketch.arc(size * 0.2, -size * 0.2, 10.0, 10.0, -PI / 2.0, PI / 4.0);
                sketch.stroke(Rgba::BLACK).stroke_weight(4.0);
                sketch.line(-size * 0.5 * sf, size * 0.5 * cf, size * 0.5 * sf, -size * 0.5 * cf);
                sketch.line(size * 0.5 * cf, size * 0.5 * sf, -size * 0.5 * cf, -size * 0.5 * sf);
            }
            DroneKind::Plane => {
                let body = color;
                plane_body(sketch, color.lerp(Rgba::WHITE, 0.25), body, size);
                sketch.stroke(Rgba::gray_alpha(0, 50)).stroke_weight(1.0);
                plane_seams(sketch, size);
                propeller(sketch, Rgba::gray(80), size, time);
            }
            DroneKind::GasserPlane => {
                plane_body(
                    sketch,
                    color.lerp(Rgba::gray(100), 0.6),
                    color.lerp(Rgba::gray(150), 0.6),
                    size,
                );
                propeller(sketch, Rgba::gray(80), size, time);
            }
            DroneKind::BomberPlane => {
                plane_body(
                    sketch,
                    color.lerp(Rgba::BLACK, 0.65),
                    color.lerp(Rgba::BLACK, 0.45),
                    size,
                );
                sketch.stroke(Rgba::gray_alpha(0, 50)).stroke_weight(1.0);
                plane_seams(sketch, size);
                propeller(sketch, color, size, time);
            }
        }
    }
}

/// Diagonal cross frame shared by the quad-rotor drones.
fn quad_frame(sketch: &mut Sketch, color: Rgba, weight: f64, size: f64) {
    let arm = size * 0.25;
    sketch.stroke(color).stroke_weight(weight);
    sketch.line(-arm, -arm, arm, arm);
    sketch.line(arm, -arm, -arm, arm);
}

/// Four spinning rotor blades at the frame corners.
fn rotors(sketch: &mut Sketch, color: Rgba, weight: f64, size: f64, phase: f64, blade: f64) {
    let (sf, cf) = phase.sin_cos();
    sketch.stroke(color).stroke_weight(weight);
    for (dx, dy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        sketch.line(
            dx * size * (0.25 + blade * sf),
            dy * size * (0.25 + blade * cf),
            dx * size * (0.25 - blade * sf),
            dy * size * (0.25 - blade * cf),
        );
    }
}

/// Tail, wings and fuselage of the plane family.
fn plane_body(sketch: &mut Sketch, wings: Rgba, fuselage: Rgba, size: f64) {
    sketch.no_stroke().fill(wings);
    sketch.rounded_rect(0.0, -size * 0.43, size * 0.4, size * 0.15, 50.0);
    sketch.rounded_rect(0.0, 0.0, size, size * 0.2, 50.0);
    sketch.fill(fuselage);
    sketch.ellipse(0.0, size * 0.45, size * 0.25, size * 0.25);
    sketch.quad(
        -size * 0.125,
        size * 0.45,
        size * 0.125,
        size * 0.45,
        size * 0.075,
        -size * 0.45,
        -size * 0.05,
        -size * 0.45,
    );
}

fn plane_seams(sketch: &mut Sketch, size: f64) {
    sketch.line(size * 0.125, size * 0.45, size * 0.075, -size * 0.45);
    sketch.line(-size * 0.125, size * 0.45, -size * 0.05, -size * 0.45);
}

fn propeller(sketch: &mut Sketch, color: Rgba, size: f64, time: f64) {
    let sf = (time / 3.0).sin();
    sketch.stroke(color).stroke_weight(3.0);
    sketch.line(0.2 * size * sf, size * 0.58, -0.2 * size * sf, size * 0.58);
}
