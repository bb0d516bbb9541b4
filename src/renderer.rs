use std::f64::consts::{FRAC_PI_2, PI};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Paragraph,
        canvas::{Canvas, Context, Line as CanvasLine, Painter, Shape},
    },
};

use crate::battle::{Battle, PLAYER_TERRITORY, tile_center};
use crate::entities::{DroneKind, Side};
use crate::scene::{
    BACK_BUTTON, Button, CANVAS_SIZE, NEXT_SLIDE_BUTTON, PREVIOUS_SLIDE_BUTTON, SHOP_PANEL, Scene, hovered_tile,
    map_offset, shop_slot,
};
use crate::sketch::{DrawOp, Point, Rgba, Sketch, TextAlign};

/// Canvas units between two text lines; one terminal row on a 30-row canvas.
const LINE_HEIGHT: f64 = 20.0;

const HOW_TO_PLAY: &str = "Move your mouse up and\ndown to navigate the map.\nThe shop is on the\nbottom of the screen.\nClick an item to select it.\nThen click the map to\nplace the item.";

/// View struct that holds all state needed for rendering
pub struct RenderView<'a> {
    /// Scene to draw this frame, already resolved through the transition
    pub scene: Scene,
    /// Opacity of the black transition overlay
    pub overlay: f64,
    pub pointer: Point,
    pub frame_count: u64,
    pub drone_slide: usize,
    pub battle: &'a Battle,
    pub selected_slot: Option<usize>,
    pub paused: bool,
    /// Last shop message, e.g. a rejected placement
    pub message: Option<&'a str>,
    pub fps: Option<u32>,
    pub player_color: Rgba,
    pub enemy_color: Rgba,
}

impl RenderView<'_> {
    fn side_color(&self, side: Side) -> Rgba {
        match side {
            Side::Player => self.player_color,
            Side::Enemy => self.enemy_color,
        }
    }

    fn hovered(&self, button: &Button) -> bool {
        button.contains(self.pointer)
    }
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {}

impl Default for GameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Largest centred area with a square look, given cells twice as tall as wide.
    /// The bottom row is kept for the controls hint.
    pub fn canvas_area(area: Rect) -> Rect {
        let height = area.height.saturating_sub(1).min(area.width / 2);
        let width = height * 2;
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height.saturating_sub(1) - height) / 2,
            width,
            height,
        }
    }

    /// Draws the visible scene and returns the cell area the canvas occupies.
    pub fn render(&self, frame: &mut Frame, view: &RenderView) -> Rect {
        let area = frame.area();
        let canvas_area = Self::canvas_area(area);

        let mut sketch = Sketch::new();
        let background = draw_scene(&mut sketch, view);

        if canvas_area.width > 0 && canvas_area.height > 0 {
            let palette = Palette {
                background,
                overlay: view.overlay,
            };
            let dots = DotGrid {
                step_x: CANVAS_SIZE / (canvas_area.width as f64 * 2.0),
                step_y: CANVAS_SIZE / (canvas_area.height as f64 * 4.0),
                cell_width: CANVAS_SIZE / canvas_area.width as f64,
            };

            let ops = sketch.ops();
            let canvas = Canvas::default()
                .background_color(palette.shade(background))
                .marker(Marker::Braille)
                .x_bounds([0.0, CANVAS_SIZE])
                .y_bounds([0.0, CANVAS_SIZE])
                .paint(|ctx| {
                    for op in ops {
                        paint_op(ctx, op, &palette, &dots);
                    }
                });
            frame.render_widget(canvas, canvas_area);
        }

        // Controls hint at bottom
        let controls = Line::from(vec![Span::styled(
            "[Mouse: Scroll/Click] [1-9: Shop] [←/→: Gallery] [P: Pause] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1.min(area.height),
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);

        canvas_area
    }
}

/// Flattens translucent colors and applies the transition fade.
struct Palette {
    background: Rgba,
    overlay: f64,
}

impl Palette {
    fn shade(&self, color: Rgba) -> Color {
        let color = color.over(self.background).lerp(Rgba::BLACK, self.overlay);
        Color::Rgb(color.r, color.g, color.b)
    }
}

/// Spacing of Braille dots in canvas units.
struct DotGrid {
    step_x: f64,
    step_y: f64,
    cell_width: f64,
}

/// Polygon filled by sampling every Braille dot centre inside its bounds.
struct FilledPolygon<'a> {
    points: &'a [Point],
    color: Color,
    step_x: f64,
    step_y: f64,
}

impl Shape for FilledPolygon<'_> {
    fn draw(&self, painter: &mut Painter) {
        let Some((min, max)) = bounds(self.points) else {
            return;
        };

        let first_column = (min.x / self.step_x).floor() as i64;
        let last_column = (max.x / self.step_x).ceil() as i64;
        let first_row = (min.y / self.step_y).floor() as i64;
        let last_row = (max.y / self.step_y).ceil() as i64;

        for row in first_row..=last_row {
            let y = (row as f64 + 0.5) * self.step_y;
            for column in first_column..=last_column {
                let x = (column as f64 + 0.5) * self.step_x;
                if !contains(self.points, x, y) {
                    continue;
                }
                // Canvas y grows upward
                if let Some((px, py)) = painter.get_point(x, CANVAS_SIZE - y) {
                    painter.paint(px, py, self.color);
                }
            }
        }
    }
}

fn bounds(points: &[Point]) -> Option<(Point, Point)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(min, max), p| {
        (
            Point::new(min.x.min(p.x), min.y.min(p.y)),
            Point::new(max.x.max(p.x), max.y.max(p.y)),
        )
    }))
}

/// Even-odd point in polygon test.
fn contains(points: &[Point], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for (i, a) in points.iter().enumerate() {
        let b = points[j];
        if (a.y > y) != (b.y > y) && x < (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn paint_op(ctx: &mut Context, op: &DrawOp, palette: &Palette, dots: &DotGrid) {
    match op {
        DrawOp::Fill { points, color } => {
            ctx.draw(&FilledPolygon {
                points,
                color: palette.shade(*color),
                step_x: dots.step_x,
                step_y: dots.step_y,
            });
        }
        DrawOp::Stroke {
            from,
            to,
            weight,
            color,
        } => {
            let color = palette.shade(*color);
            if *weight > dots.step_x * 2.0 {
                let band = thick_line(*from, *to, *weight);
                ctx.draw(&FilledPolygon {
                    points: &band,
                    color,
                    step_x: dots.step_x,
                    step_y: dots.step_y,
                });
            } else {
                ctx.draw(&CanvasLine {
                    x1: from.x,
                    y1: CANVAS_SIZE - from.y,
                    x2: to.x,
                    y2: CANVAS_SIZE - to.y,
                    color,
                });
            }
        }
        DrawOp::Text {
            at,
            text,
            color,
            align,
            bold,
        } => {
            let width = text.chars().count() as f64 * dots.cell_width;
            let x = match align {
                TextAlign::Left => at.x,
                TextAlign::Center => at.x - width / 2.0,
            };
            let mut style = Style::default().fg(palette.shade(*color));
            if *bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            ctx.print(
                x.clamp(0.0, CANVAS_SIZE),
                CANVAS_SIZE - at.y,
                Line::styled(text.clone(), style),
            );
        }
    }
}

/// Rectangle covering a stroke of the given weight.
fn thick_line(from: Point, to: Point, weight: f64) -> [Point; 4] {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = dx.hypot(dy).max(f64::EPSILON);
    let (nx, ny) = (-dy / length * weight / 2.0, dx / length * weight / 2.0);
    [
        Point::new(from.x + nx, from.y + ny),
        Point::new(to.x + nx, to.y + ny),
        Point::new(to.x - nx, to.y - ny),
        Point::new(from.x - nx, from.y - ny),
    ]
}

/// Greedy word wrap to at most `width` characters per line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

/// Records the visible scene into `sketch` and returns its background color.
pub fn draw_scene(sketch: &mut Sketch, view: &RenderView) -> Rgba {
    match view.scene {
        Scene::Home => draw_home(sketch, view),
        Scene::How => draw_how(sketch, view),
        Scene::Drones => draw_gallery(sketch, view),
        Scene::Game => draw_game(sketch, view),
        Scene::Win => draw_result(sketch, Rgba::rgb(0, 0, 255), Rgba::WHITE, "You win!"),
        Scene::Lose => draw_result(sketch, Rgba::rgb(0, 255, 255), Rgba::BLACK, "You lose!"),
    }
}

fn menu_background(view: &RenderView) -> Rgba {
    view.player_color.lerp(Rgba::gray(127), 0.4)
}

/// Outline that stands in for the hand cursor over a hovered button.
fn hover_hint(sketch: &mut Sketch, view: &RenderView) {
    for button in view.scene.buttons().iter().filter(|b| view.hovered(b)) {
        sketch.push();
        sketch.no_fill().stroke(Rgba::gray_alpha(255, 180)).stroke_weight(1.0);
        sketch.rect(button.x, button.y, button.width - 4.0, button.height - 4.0);
        sketch.pop();
    }
}

fn draw_home(sketch: &mut Sketch, view: &RenderView) -> Rgba {
    let time = view.frame_count as f64;
    sketch.no_stroke().fill(Rgba::BLACK);

    sketch.bold_text("D R O N E S", 300.0, 140.0, TextAlign::Center);
    sketch.rect(300.0, 205.0, 380.0, 10.0);

    sketch.bold_text("Play", 90.0, 300.0, TextAlign::Left);
    sketch.rect(155.0, 345.0, 140.0, 7.0);
    sketch.bold_text("How", 90.0, 400.0, TextAlign::Left);
    sketch.rect(155.0, 445.0, 140.0, 7.0);
    sketch.bold_text("Drones", 90.0, 500.0, TextAlign::Left);
    sketch.rect(195.0, 545.0, 220.0, 7.0);

    sketch.push().translate(400.0, 320.0).scale(2.5).rotate(FRAC_PI_2);
    DroneKind::BomberPlane.graphic(sketch, view.enemy_color, time);
    sketch.pop();

    sketch.push().translate(450.0, 500.0).scale(3.0).rotate(PI);
    DroneKind::FighterDrone.graphic(sketch, view.player_color, time);
    sketch.pop();

    hover_hint(sketch, view);
    menu_background(view)
}

fn draw_how(sketch: &mut Sketch, view: &RenderView) -> Rgba {
    sketch.no_stroke().fill(Rgba::BLACK);
    sketch.bold_text("How", 300.0, 60.0, TextAlign::Center);
    sketch.rect(300.0, 115.0, 240.0, 10.0);

    back_label(sketch);

    let lines: Vec<&str> = HOW_TO_PLAY.lines().collect();
    let top = 300.0 - LINE_HEIGHT * (lines.len() as f64 - 1.0) / 2.0;
    for (i, line) in lines.iter().enumerate() {
        sketch.text(*line, 300.0, top + LINE_HEIGHT * i as f64, TextAlign::Center);
    }

    sketch.push().translate(500.0, 80.0).rotate(1.1).scale(2.0);
    DroneKind::Plane.graphic(sketch, view.enemy_color, view.frame_count as f64);
    sketch.pop();

    hover_hint(sketch, view);
    menu_background(view)
}

fn back_label(sketch: &mut Sketch) {
    sketch.bold_text("Back", BACK_BUTTON.x, BACK_BUTTON.y, TextAlign::Center);
    sketch.rect(300.0, 565.0, 160.0, 7.0);
}

fn draw_gallery(sketch: &mut Sketch, view: &RenderView) -> Rgba {
    let kind = DroneKind::ALL[view.drone_slide % DroneKind::ALL.len()];
    let spec = kind.spec();
    let time = view.frame_count as f64;

    sketch.no_stroke().fill(Rgba::BLACK);
    sketch.bold_text("Drones", 300.0, 60.0, TextAlign::Center);
    sketch.rect(300.0, 105.0, 240.0, 10.0);

    back_label(sketch);

    sketch.bold_text(spec.name, 300.0, 150.0, TextAlign::Center);
    sketch.text(format!("$ {}", spec.price), 300.0, 360.0, TextAlign::Center);
    for (i, line) in wrap_text(spec.description, 40).iter().enumerate() {
        sketch.text(line.as_str(), 300.0, 360.0 + LINE_HEIGHT * (i as f64 + 1.0), TextAlign::Center);
    }

    sketch.bold_text("«", PREVIOUS_SLIDE_BUTTON.x, PREVIOUS_SLIDE_BUTTON.y, TextAlign::Center);
    sketch.bold_text("»", NEXT_SLIDE_BUTTON.x, NEXT_SLIDE_BUTTON.y, TextAlign::Center);

    sketch
        .push()
        .translate(300.0, 250.0)
        .scale(130.0 / spec.size_x)
        .rotate(time / 50.0);
    kind.graphic(sketch, view.player_color, time);
    sketch.pop();

    hover_hint(sketch, view);
    menu_background(view)
}

fn draw_game(sketch: &mut Sketch, view: &RenderView) -> Rgba {
    let battle = view.battle;
    let offset = map_offset(view.pointer.y);
    let background = view.enemy_color.lerp(Rgba::gray(200), 0.9);

    sketch.push().translate(0.0, offset);

    // Player territory
    sketch.no_stroke().fill(view.player_color.lerp(Rgba::gray(200), 0.9));
    let territory = 700.0 - PLAYER_TERRITORY;
    sketch.rect(300.0, PLAYER_TERRITORY + territory / 2.0, 600.0, territory);

    if let Some((row, column)) = hovered_tile(view.pointer, offset) {
        let (x, y) = tile_center(row, column);
        sketch.no_stroke().fill(Rgba::gray_alpha(255, 150));
        sketch.hexagon(x, y, 25.0);

        if let Some(kind) = view.selected_slot.map(|slot| DroneKind::ALL[slot]) {
            sketch.push().translate(x, y);
            kind.graphic(sketch, view.player_color.with_alpha(120), 0.0);
            sketch.pop();
        }
    }

    for unit in battle.player.iter().chain(battle.enemy.iter()) {
        let color = if unit.is_flashing() {
            Rgba::WHITE
        } else {
            view.side_color(unit.side)
        };

        sketch.push().translate(unit.x, unit.y).rotate(unit.heading + FRAC_PI_2);
        unit.kind.graphic(sketch, color, unit.time as f64);
        sketch.pop();

        let max_health = unit.kind.spec().health;
        if unit.health < max_health {
            let width = unit.size();
            let left = unit.x - width / 2.0;
            let top = unit.y - width / 2.0 - 6.0;
            sketch.push().no_stroke();
            sketch.fill(Rgba::gray_alpha(0, 120));
            sketch.rect(unit.x, top, width, 3.0);
            sketch.fill(Rgba::rgb(230, 60, 60));
            let filled = width * (unit.health / max_health);
            sketch.rect(left + filled / 2.0, top, filled, 3.0);
            sketch.pop();
        }
    }

    for projectile in &battle.projectiles {
        sketch.push().translate(projectile.x, projectile.y);
        projectile.kind.graphic(sketch, view.side_color(projectile.side));
        sketch.pop();
    }

    sketch.pop();

    draw_shop(sketch, view);
    draw_status(sketch, view);

    background
}

fn draw_shop(sketch: &mut Sketch, view: &RenderView) {
    let money = view.battle.money;

    sketch.push().no_stroke().fill(Rgba::gray_alpha(255, 175));
    sketch.rect(SHOP_PANEL.x, SHOP_PANEL.y, SHOP_PANEL.width, SHOP_PANEL.height);

    for (slot, kind) in DroneKind::ALL.iter().enumerate() {
        let button = shop_slot(slot);
        let spec = kind.spec();

        if view.selected_slot == Some(slot) {
            sketch.no_stroke().fill(view.player_color.with_alpha(140));
            sketch.rect(button.x, button.y, button.width - 4.0, button.height - 4.0);
        } else if view.hovered(&button) {
            sketch.no_stroke().fill(Rgba::gray_alpha(255, 120));
            sketch.rect(button.x, button.y, button.width - 4.0, button.height - 4.0);
        }

        sketch.push().translate(button.x, 540.0).scale(36.0 / spec.size_x.max(spec.size_y));
        kind.graphic(sketch, view.player_color, view.frame_count as f64);
        sketch.pop();

        let price_color = if spec.price <= money {
            Rgba::BLACK
        } else {
            Rgba::rgb(170, 40, 40)
        };
        sketch.no_stroke().fill(Rgba::gray(60));
        sketch.text(format!("{}", slot + 1), button.x, 510.0, TextAlign::Center);
        sketch.fill(price_color);
        sketch.text(format!("${}", spec.price), button.x, 585.0, TextAlign::Center);
    }
    sketch.pop();
}

fn draw_status(sketch: &mut Sketch, view: &RenderView) {
    let battle = view.battle;
    sketch.push().no_stroke().fill(Rgba::BLACK);

    let wave = match battle.next_wave_in() {
        Some(frames) => format!(
            "Wave {}/{} in {}s",
            battle.waves_spawned() + 1,
            battle.total_waves(),
            frames / 60
        ),
        None => "Final wave".to_string(),
    };
    sketch.bold_text(
        format!("${}  {}  Kills {}", battle.money, wave, battle.kills),
        10.0,
        12.0,
        TextAlign::Left,
    );

    if let Some(fps) = view.fps {
        sketch.text(format!("FPS {fps}"), 10.0, 32.0, TextAlign::Left);
    }

    if let Some(message) = view.message {
        sketch.fill(Rgba::rgb(170, 40, 40));
        sketch.text(message, 300.0, 470.0, TextAlign::Center);
    }

    if view.paused {
        sketch.fill(Rgba::BLACK);
        sketch.bold_text("PAUSED", 300.0, 280.0, TextAlign::Center);
        sketch.text("Press P to resume", 300.0, 300.0, TextAlign::Center);
    }
    sketch.pop();
}

fn draw_result(sketch: &mut Sketch, background: Rgba, ink: Rgba, title: &str) -> Rgba {
    sketch.no_stroke().fill(ink);
    sketch.bold_text(title, 300.0, 270.0, TextAlign::Center);
    sketch.text("Click anywhere to return home", 300.0, 330.0, TextAlign::Center);
    background
}
