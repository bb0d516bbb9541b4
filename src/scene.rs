//! Scenes, scene transitions and the fixed button layout of the 600x600 canvas.

use crate::battle::tile_on_map;
use crate::entities::DroneKind;
use crate::sketch::Point;
use crate::utility::{hexagon_at, smooth_step, smooth_step01};

/// Logical canvas size; every scene is laid out in these coordinates.
pub const CANVAS_SIZE: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    Home,
    Game,
    How,
    Drones,
    Win,
    Lose,
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Home => "home",
            Scene::Game => "game",
            Scene::How => "how",
            Scene::Drones => "drones",
            Scene::Win => "win",
            Scene::Lose => "lose",
        }
    }

    /// Buttons that show the hand cursor hint when hovered.
    pub fn buttons(&self) -> &'static [Button] {
        match self {
            Scene::Home => &[PLAY_BUTTON, HOW_BUTTON, DRONES_BUTTON],
            Scene::How => &[BACK_BUTTON],
            Scene::Drones => &[BACK_BUTTON, PREVIOUS_SLIDE_BUTTON, NEXT_SLIDE_BUTTON],
            Scene::Game | Scene::Win | Scene::Lose => &[],
        }
    }
}

/// Centre-based rectangle hit by the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Button {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, pointer: Point) -> bool {
        button_collision(pointer, self.x, self.y, self.width, self.height)
    }
}

pub const PLAY_BUTTON: Button = Button::new(195.0, 300.0, 225.0, 100.0);
pub const HOW_BUTTON: Button = Button::new(195.0, 400.0, 225.0, 100.0);
pub const DRONES_BUTTON: Button = Button::new(195.0, 500.0, 225.0, 100.0);
pub const BACK_BUTTON: Button = Button::new(300.0, 520.0, 160.0, 100.0);
pub const PREVIOUS_SLIDE_BUTTON: Button = Button::new(125.0, 300.0, 100.0, 100.0);
pub const NEXT_SLIDE_BUTTON: Button = Button::new(475.0, 300.0, 100.0, 100.0);

/// Strict inside test against a rectangle centred on `(x, y)`.
pub fn button_collision(pointer: Point, x: f64, y: f64, width: f64, height: f64) -> bool {
    pointer.x > x - width / 2.0
        && pointer.x < x + width / 2.0
        && pointer.y > y - height / 2.0
        && pointer.y < y + height / 2.0
}

/// Fade-through-black between two scenes.
///
/// While `duration > 1` the scene being left is still drawn; after that the
/// new one shows while the overlay clears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: f64,
    /// Scene shown during the first half.
    pub scene: Scene,
}

impl Transition {
    pub const LENGTH: f64 = 2.0;

    pub fn idle(scene: Scene) -> Self {
        Self { duration: 0.0, scene }
    }

    pub fn start(&mut self, leaving: Scene) {
        self.duration = Self::LENGTH;
        self.scene = leaving;
    }

    pub fn step(&mut self, amount: f64) {
        if self.duration > 0.0 {
            self.duration = (self.duration - amount).max(0.0);
        }
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0.0
    }

    /// The old scene still covers the screen.
    pub fn is_covering(&self) -> bool {
        self.duration > 1.0
    }

    pub fn visible_scene(&self, current: Scene) -> Scene {
        if self.is_covering() { self.scene } else { current }
    }

    /// Opacity of the black overlay in `[0, 1]`, peaking halfway.
    pub fn overlay(&self) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        smooth_step01(1.0 - (self.duration - 1.0).abs())
    }
}

/// Vertical map translation for the current pointer height.
///
/// Moving the pointer down scrolls toward the player's end of the map.
pub fn map_offset(pointer_y: f64) -> f64 {
    let scroll = 700.0 - (pointer_y.clamp(50.0, 500.0) - 50.0) * 14.0 / 9.0;
    smooth_step(scroll, 0.0, 700.0) - 100.0
}

/// Hex tile `(row, column)` under the pointer, if the pointer is over the map
/// band and the tile is on the map.
pub fn hovered_tile(pointer: Point, offset: f64) -> Option<(i32, i32)> {
    if !(pointer.y > 250.0 && pointer.y < 500.0) {
        return None;
    }
    let (row, column) = hexagon_at(pointer.y - offset, pointer.x);
    tile_on_map(row, column).then_some((row, column))
}

/// Shop panel, centre based.
pub const SHOP_PANEL: Button = Button::new(300.0, 550.0, 600.0, 100.0);

/// Width of one shop slot; every drone kind gets a slot.
pub fn shop_slot_width() -> f64 {
    CANVAS_SIZE / DroneKind::ALL.len() as f64
}

pub fn shop_slot(index: usize) -> Button {
    let width = shop_slot_width();
    Button::new(width * (index as f64 + 0.5), SHOP_PANEL.y, width, SHOP_PANEL.height)
}

pub fn shop_slot_at(pointer: Point) -> Option<usize> {
    (0..DroneKind::ALL.len()).find(|&i| shop_slot(i).contains(pointer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_collision_is_strict() {
        let button = PLAY_BUTTON;
        assert!(button.contains(Point::new(195.0, 300.0)));
        assert!(button.contains(Point::new(83.0, 251.0)));
        // Edges are outside
        assert!(!button.contains(Point::new(82.5, 300.0)));
        assert!(!button.contains(Point::new(195.0, 350.0)));
    }

    #[test]
    fn test_home_buttons_do_not_overlap() {
        let pointer = Point::new(195.0, 350.0);
        let hits = Scene::Home.buttons().iter().filter(|b| b.contains(pointer)).count();
        assert_eq!(hits, 0);

        let pointer = Point::new(195.0, 420.0);
        assert!(HOW_BUTTON.contains(pointer));
        assert!(!PLAY_BUTTON.contains(pointer));
    }

    #[test]
    fn test_transition_halves() {
        let mut transition = Transition::idle(Scene::Home);
        assert_eq!(transition.overlay(), 0.0);
        assert_eq!(transition.visible_scene(Scene::Home), Scene::Home);

        transition.start(Scene::Home);
        assert!(transition.is_covering());
        assert_eq!(transition.visible_scene(Scene::Game), Scene::Home);
        assert_eq!(transition.overlay(), 0.0);

        transition.step(1.0);
        assert!((transition.overlay() - 1.0).abs() < 1e-9);
        assert_eq!(transition.visible_scene(Scene::Game), Scene::Game);

        transition.step(5.0);
        assert_eq!(transition.duration, 0.0);
        assert!(!transition.is_active());
    }

    #[test]
    fn test_transition_takes_forty_frames_at_default_step() {
        let mut transition = Transition::idle(Scene::Home);
        transition.start(Scene::Home);
        let mut frames = 0;
        while transition.is_active() {
            transition.step(0.05);
            frames += 1;
        }
        assert!((40..=41).contains(&frames));
    }

    #[test]
    fn test_map_offset_range() {
        assert!((map_offset(0.0) - 600.0).abs() < 1e-9);
        assert!((map_offset(50.0) - 600.0).abs() < 1e-9);
        assert!((map_offset(500.0) + 100.0).abs() < 1e-9);
        assert!((map_offset(600.0) + 100.0).abs() < 1e-9);
        assert!(map_offset(200.0) > map_offset(300.0));
    }

    #[test]
    fn test_hovered_tile_band() {
        assert_eq!(hovered_tile(Point::new(300.0, 200.0), 0.0), None);
        assert_eq!(hovered_tile(Point::new(300.0, 500.0), 0.0), None);

        let offset = map_offset(450.0);
        let (row, column) = hovered_tile(Point::new(300.0, 450.0), offset).unwrap();
        assert!(tile_on_map(row, column));
    }

    #[test]
    fn test_hovered_tile_off_map() {
        // Bottom of the band scrolled fully down lands past the last column
        assert_eq!(hovered_tile(Point::new(300.0, 499.0), -100.0), None);
    }

    #[test]
    fn test_shop_slots_cover_panel() {
        assert_eq!(shop_slot_at(Point::new(1.0, 550.0)), Some(0));
        assert_eq!(shop_slot_at(Point::new(599.0, 550.0)), Some(DroneKind::ALL.len() - 1));
        assert_eq!(shop_slot_at(Point::new(300.0, 450.0)), None);
    }
}
