use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::time::{Duration, Instant};

use crate::battle::{Battle, Outcome};
use crate::config::Config;
use crate::entities::DroneKind;
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::scene::{
    BACK_BUTTON, DRONES_BUTTON, HOW_BUTTON, NEXT_SLIDE_BUTTON, PLAY_BUTTON, PREVIOUS_SLIDE_BUTTON, Scene,
    Transition, hovered_tile, map_offset, shop_slot_at,
};
use crate::sketch::Point;
use crate::utility::wrap_index;

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    config: Config,
    scene: Scene,
    transition: Transition,
    /// Last known pointer position in canvas coordinates
    pointer: Point,
    drone_slide: usize,
    battle: Battle,
    selected_slot: Option<usize>,
    paused: bool,
    /// Feedback shown under the map, e.g. why a placement failed
    message: Option<String>,
    /// Frames info
    frame_count: u64,
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let battle = Battle::new(config.battle_settings());
        Self {
            running: true,
            scene: Scene::Home,
            transition: Transition::idle(Scene::Home),
            pointer: Point::new(300.0, 300.0),
            drone_slide: 0,
            battle,
            selected_slot: None,
            paused: false,
            message: None,
            frame_count: 0,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
            config,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        let frame_time = Duration::from_millis(self.config.frame_ms);

        while self.running {
            // Calculate FPS
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if elapsed.as_micros() > 0 {
                self.fps = (1_000_000 / elapsed.as_micros()) as u32;
            }

            // Render the frame and remember where the canvas landed
            let mut canvas_area = Rect::default();
            terminal.draw(|frame| {
                let view = RenderView {
                    scene: self.transition.visible_scene(self.scene),
                    overlay: self.transition.overlay(),
                    pointer: self.pointer,
                    frame_count: self.frame_count,
                    drone_slide: self.drone_slide,
                    battle: &self.battle,
                    selected_slot: self.selected_slot,
                    paused: self.paused,
                    message: self.message.as_deref(),
                    fps: self.config.show_fps.then_some(self.fps),
                    player_color: self.config.player_color(),
                    enemy_color: self.config.enemy_color(),
                };
                canvas_area = self.renderer.render(frame, &view);
            })?;
            self.input_manager.set_canvas(canvas_area);

            // Poll input events and get actions
            self.input_manager.poll_events()?;
            let actions = self.input_manager.get_actions();

            // Process all actions
            self.process_actions(&actions);

            self.update();

            // Sleep off the rest of the frame
            std::thread::sleep(frame_time.saturating_sub(now.elapsed()));
        }

        log::info!("Quitting after {} frames", self.frame_count);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn drone_slide(&self) -> usize {
        self.drone_slide
    }

    pub fn selected_slot(&self) -> Option<usize> {
        self.selected_slot
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Process input actions and update app state accordingly
    pub fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match *action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::PointerMoved(point) => {
                    self.pointer = point;
                }
                InputAction::Click(point) => {
                    // The scene being left still fills the screen
                    if !self.transition.is_covering() {
                        self.click(point);
                    }
                }
                InputAction::Back => {
                    if self.scene != Scene::Home && !self.transition.is_covering() {
                        self.go_to(Scene::Home);
                    }
                }
                InputAction::PreviousSlide if self.scene == Scene::Drones => {
                    self.step_slide(-1);
                }
                InputAction::NextSlide if self.scene == Scene::Drones => {
                    self.step_slide(1);
                }
                InputAction::SelectSlot(slot) if self.scene == Scene::Game => {
                    self.select_slot(slot);
                }
                InputAction::TogglePause if self.scene == Scene::Game => {
                    self.paused = !self.paused;
                    log::info!("Battle {}", if self.paused { "paused" } else { "resumed" });
                }
                _ => {}
            }
        }
    }

    /// Advances one frame: transition timer, battle and outcome.
    pub fn update(&mut self) {
        self.frame_count += 1;
        self.transition.step(self.config.transition_step);

        if self.scene != Scene::Game || self.paused || self.transition.is_covering() {
            return;
        }

        self.battle.tick();

        match self.battle.outcome() {
            Outcome::Ongoing => {}
            Outcome::Won => {
                log::info!(
                    "Battle won on frame {} with {} kills",
                    self.battle.frame,
                    self.battle.kills
                );
                self.go_to(Scene::Win);
            }
            Outcome::Lost => {
                log::info!("Battle lost on frame {}", self.battle.frame);
                self.go_to(Scene::Lose);
            }
        }
    }

    fn click(&mut self, point: Point) {
        match self.scene {
            Scene::Home => {
                if PLAY_BUTTON.contains(point) {
                    self.new_battle();
                    self.go_to(Scene::Game);
                } else if HOW_BUTTON.contains(point) {
                    self.go_to(Scene::How);
                } else if DRONES_BUTTON.contains(point) {
                    self.go_to(Scene::Drones);
                }
            }
            Scene::Drones => {
                if BACK_BUTTON.contains(point) {
                    self.go_to(Scene::Home);
                } else if PREVIOUS_SLIDE_BUTTON.contains(point) {
                    self.step_slide(-1);
                } else if NEXT_SLIDE_BUTTON.contains(point) {
                    self.step_slide(1);
                }
            }
            Scene::How => {
                if BACK_BUTTON.contains(point) {
                    self.go_to(Scene::Home);
                }
            }
            Scene::Game => self.click_game(point),
            Scene::Win | Scene::Lose => self.go_to(Scene::Home),
        }
    }

    fn click_game(&mut self, point: Point) {
        if let Some(slot) = shop_slot_at(point) {
            self.select_slot(slot);
            return;
        }

        let Some((row, column)) = hovered_tile(point, map_offset(point.y)) else {
            return;
        };

        let Some(kind) = self.selected_slot.map(|slot| DroneKind::ALL[slot]) else {
            self.message = Some("Pick a drone from the shop first".to_string());
            return;
        };

        match self.battle.place(kind, row, column) {
            Ok(()) => self.message = None,
            Err(err) => {
                log::debug!("Placement rejected: {err}");
                self.message = Some(err.to_string());
            }
        }
    }

    /// Selects a shop slot; choosing the selected one again clears it.
    fn select_slot(&mut self, slot: usize) {
        if slot >= DroneKind::ALL.len() {
            return;
        }
        self.selected_slot = if self.selected_slot == Some(slot) {
            None
        } else {
            Some(slot)
        };
        self.message = None;
    }

    fn step_slide(&mut self, delta: isize) {
        self.drone_slide = wrap_index(self.drone_slide as isize + delta, DroneKind::ALL.len());
    }

    fn new_battle(&mut self) {
        self.battle = Battle::new(self.config.battle_settings());
        self.selected_slot = None;
        self.paused = false;
        self.message = None;
    }

    fn go_to(&mut self, scene: Scene) {
        log::info!("Scene {} -> {}", self.scene.name(), scene.name());
        self.transition.start(self.scene);
        self.scene = scene;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shop_slot;

    fn app() -> App {
        App::new(Config {
            seed: Some(3),
            ..Config::default()
        })
    }

    /// Runs frames until the transition has fully played out.
    fn settle(app: &mut App) {
        while app.transition().is_active() {
            app.update();
        }
    }

    fn click(app: &mut App, x: f64, y: f64) {
        let point = Point::new(x, y);
        app.process_actions(&[InputAction::PointerMoved(point), InputAction::Click(point)]);
    }

    #[test]
    fn test_starts_on_home() {
        let app = app();
        assert!(app.is_running());
        assert_eq!(app.scene(), Scene::Home);
        assert!(!app.transition().is_active());
    }

    #[test]
    fn test_home_buttons_switch_scene() {
        let mut app = app();
        click(&mut app, 195.0, 400.0);
        assert_eq!(app.scene(), Scene::How);
        assert!(app.transition().is_covering());
        assert_eq!(app.transition().visible_scene(app.scene()), Scene::Home);

        settle(&mut app);
        click(&mut app, 300.0, 520.0);
        assert_eq!(app.scene(), Scene::Home);
    }

    #[test]
    fn test_clicks_ignored_while_old_scene_covers() {
        let mut app = app();
        click(&mut app, 195.0, 500.0);
        assert_eq!(app.scene(), Scene::Drones);

        // Back button position, but the home screen is still showing
        click(&mut app, 300.0, 520.0);
        assert_eq!(app.scene(), Scene::Drones);
    }

    #[test]
    fn test_back_ignored_while_old_scene_covers() {
        let mut app = app();
        click(&mut app, 195.0, 400.0);
        app.process_actions(&[InputAction::Back]);
        assert_eq!(app.scene(), Scene::How);
        assert_eq!(app.transition().scene, Scene::Home);

        settle(&mut app);
        app.process_actions(&[InputAction::Back]);
        assert_eq!(app.scene(), Scene::Home);
        assert_eq!(app.transition().visible_scene(app.scene()), Scene::How);
    }

    #[test]
    fn test_gallery_slides_wrap() {
        let mut app = app();
        click(&mut app, 195.0, 500.0);
        settle(&mut app);

        click(&mut app, 125.0, 300.0);
        assert_eq!(app.drone_slide(), DroneKind::ALL.len() - 1);
        click(&mut app, 475.0, 300.0);
        assert_eq!(app.drone_slide(), 0);

        app.process_actions(&[InputAction::NextSlide, InputAction::NextSlide]);
        assert_eq!(app.drone_slide(), 2);
    }

    #[test]
    fn test_slide_keys_ignored_outside_gallery() {
        let mut app = app();
        app.process_actions(&[InputAction::NextSlide]);
        assert_eq!(app.drone_slide(), 0);
    }

    #[test]
    fn test_shop_select_and_place() {
        let mut app = app();
        click(&mut app, 195.0, 300.0);
        assert_eq!(app.scene(), Scene::Game);
        settle(&mut app);

        let slot = shop_slot(2);
        click(&mut app, slot.x, slot.y);
        assert_eq!(app.selected_slot(), Some(2));

        let money = app.battle().money;
        click(&mut app, 300.0, 450.0);
        assert_eq!(app.message(), None);
        assert_eq!(app.battle().player.len(), 1);
        assert_eq!(app.battle().money, money - DroneKind::Drone.spec().price);

        // Same tile again
        click(&mut app, 300.0, 450.0);
        assert!(app.message().is_some());
        assert_eq!(app.battle().player.len(), 1);
    }

    #[test]
    fn test_placing_without_selection_explains() {
        let mut app = app();
        click(&mut app, 195.0, 300.0);
        settle(&mut app);

        click(&mut app, 300.0, 450.0);
        assert!(app.message().is_some());
        assert!(app.battle().player.is_empty());
    }

    #[test]
    fn test_select_slot_toggles() {
        let mut app = app();
        click(&mut app, 195.0, 300.0);
        app.process_actions(&[InputAction::SelectSlot(1)]);
        assert_eq!(app.selected_slot(), Some(1));
        app.process_actions(&[InputAction::SelectSlot(1)]);
        assert_eq!(app.selected_slot(), None);
        app.process_actions(&[InputAction::SelectSlot(42)]);
        assert_eq!(app.selected_slot(), None);
    }

    #[test]
    fn test_pause_freezes_battle() {
        let mut app = app();
        click(&mut app, 195.0, 300.0);
        settle(&mut app);

        app.process_actions(&[InputAction::TogglePause]);
        assert!(app.is_paused());
        let frame = app.battle().frame;
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(app.battle().frame, frame);

        app.process_actions(&[InputAction::TogglePause]);
        app.update();
        assert_eq!(app.battle().frame, frame + 1);
    }

    #[test]
    fn test_back_and_quit() {
        let mut app = app();
        app.process_actions(&[InputAction::Back]);
        assert_eq!(app.scene(), Scene::Home);
        assert!(!app.transition().is_active());

        click(&mut app, 195.0, 400.0);
        settle(&mut app);
        app.process_actions(&[InputAction::Back]);
        assert_eq!(app.scene(), Scene::Home);

        app.process_actions(&[InputAction::Quit]);
        assert!(!app.is_running());
    }
}
