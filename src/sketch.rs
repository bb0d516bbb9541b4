//! Immediate-mode drawing recorder.
//!
//! Entity graphics and scenes draw into a [`Sketch`] with a small pen/transform
//! API. Every call is flattened into a world-space [`DrawOp`] right away, so the
//! renderer only has to rasterise polygons, strokes and labels.

use std::f64::consts::{PI, TAU};

/// Segments used to approximate a full ellipse.
const ELLIPSE_SEGMENTS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    pub const fn gray_alpha(value: u8, alpha: u8) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
            a: alpha,
        }
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { a: alpha, ..self }
    }

    /// Linear blend towards `other`, alpha included.
    pub fn lerp(self, other: Rgba, amount: f64) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Flattens the color over an opaque backdrop.
    pub fn over(self, backdrop: Rgba) -> Rgba {
        backdrop
            .with_alpha(255)
            .lerp(self.with_alpha(255), self.a as f64 / 255.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A flattened drawing operation in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill {
        points: Vec<Point>,
        color: Rgba,
    },
    Stroke {
        from: Point,
        to: Point,
        weight: f64,
        color: Rgba,
    },
    Text {
        at: Point,
        text: String,
        color: Rgba,
        align: TextAlign,
        bold: bool,
    },
}

impl DrawOp {
    fn points(&self) -> Vec<Point> {
        match self {
            DrawOp::Fill { points, .. } => points.clone(),
            DrawOp::Stroke { from, to, .. } => vec![*from, *to],
            DrawOp::Text { at, .. } => vec![*at],
        }
    }
}

/// Affine transform limited to translate, uniform scale and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    origin: Point,
    scale: f64,
    rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            origin: Point::new(0.0, 0.0),
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> Point {
        let (sin, cos) = self.rotation.sin_cos();
        let (x, y) = (x * self.scale, y * self.scale);
        Point::new(
            self.origin.x + x * cos - y * sin,
            self.origin.y + x * sin + y * cos,
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Pen {
    fill: Option<Rgba>,
    stroke: Option<Rgba>,
    weight: f64,
    transform: Transform,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            fill: Some(Rgba::WHITE),
            stroke: Some(Rgba::BLACK),
            weight: 1.0,
            transform: Transform::default(),
        }
    }
}

/// Records drawing calls as world-space [`DrawOp`]s.
#[derive(Debug, Clone, Default)]
pub struct Sketch {
    ops: Vec<DrawOp>,
    pen: Pen,
    saved: Vec<Pen>,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Axis-aligned bounds of everything drawn so far, as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.ops.iter().flat_map(DrawOp::points);
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }
        Some((min, max))
    }

    pub fn push(&mut self) -> &mut Self {
        self.saved.push(self.pen);
        self
    }

    pub fn pop(&mut self) -> &mut Self {
        if let Some(pen) = self.saved.pop() {
            self.pen = pen;
        }
        self
    }

    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        let origin = self.pen.transform.apply(x, y);
        self.pen.transform.origin = origin;
        self
    }

    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.pen.transform.scale *= factor;
        self
    }

    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        self.pen.transform.rotation += angle;
        self
    }

    pub fn fill(&mut self, color: Rgba) -> &mut Self {
        self.pen.fill = Some(color);
        self
    }

    pub fn no_fill(&mut self) -> &mut Self {
        self.pen.fill = None;
        self
    }

    pub fn stroke(&mut self, color: Rgba) -> &mut Self {
        self.pen.stroke = Some(color);
        self
    }

    pub fn no_stroke(&mut self) -> &mut Self {
        self.pen.stroke = None;
        self
    }

    pub fn stroke_weight(&mut self, weight: f64) -> &mut Self {
        self.pen.weight = weight;
        self
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        if let Some(color) = self.pen.stroke {
            let transform = self.pen.transform;
            self.ops.push(DrawOp::Stroke {
                from: transform.apply(x1, y1),
                to: transform.apply(x2, y2),
                weight: self.pen.weight * transform.scale,
                color,
            });
        }
        self
    }

    /// Closed shape from local-space vertices, filled then outlined.
    pub fn polygon(&mut self, vertices: &[(f64, f64)]) -> &mut Self {
        if vertices.len() < 2 {
            return self;
        }

        let transform = self.pen.transform;
        let points: Vec<Point> = vertices
            .iter()
            .map(|&(x, y)| transform.apply(x, y))
            .collect();

        if let Some(color) = self.pen.fill {
            self.ops.push(DrawOp::Fill {
                points: points.clone(),
                color,
            });
        }

        if let Some(color) = self.pen.stroke {
            let weight = self.pen.weight * transform.scale;
            for (i, from) in points.iter().enumerate() {
                let to = points[(i + 1) % points.len()];
                self.ops.push(DrawOp::Stroke {
                    from: *from,
                    to,
                    weight,
                    color,
                });
            }
        }
        self
    }

    /// Centre-based ellipse.
    pub fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        let vertices: Vec<(f64, f64)> = (0..ELLIPSE_SEGMENTS)
            .map(|i| {
                let angle = TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
                (x + w / 2.0 * angle.cos(), y + h / 2.0 * angle.sin())
            })
            .collect();
        self.polygon(&vertices)
    }

    /// Filled pie slice from `start` to `stop` radians.
    pub fn arc(&mut self, x: f64, y: f64, w: f64, h: f64, start: f64, stop: f64) -> &mut Self {
        let steps = ((stop - start).abs() / TAU * ELLIPSE_SEGMENTS as f64).ceil() as usize;
        let steps = steps.max(2);
        let mut vertices = vec![(x, y)];
        vertices.extend((0..=steps).map(|i| {
            let angle = start + (stop - start) * i as f64 / steps as f64;
            (x + w / 2.0 * angle.cos(), y + h / 2.0 * angle.sin())
        }));
        self.polygon(&vertices)
    }

    /// Centre-based rectangle.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        let (hw, hh) = (w / 2.0, h / 2.0);
        self.polygon(&[
            (x - hw, y - hh),
            (x + hw, y - hh),
            (x + hw, y + hh),
            (x - hw, y + hh),
        ])
    }

    /// Centre-based rectangle with rounded corners; the radius is clamped to
    /// half the shorter side.
    pub fn rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64) -> &mut Self {
        let (hw, hh) = (w / 2.0, h / 2.0);
        let r = radius.min(hw).min(hh).max(0.0);
        if r == 0.0 {
            return self.rect(x, y, w, h);
        }

        let corners = [
            (x + hw - r, y + hh - r, 0.0),
            (x - hw + r, y + hh - r, PI / 2.0),
            (x - hw + r, y - hh + r, PI),
            (x + hw - r, y - hh + r, PI * 1.5),
        ];
        let mut vertices = Vec::with_capacity(corners.len() * 5);
        for (cx, cy, start) in corners {
            for i in 0..=4 {
                let angle = start + PI / 2.0 * i as f64 / 4.0;
                vertices.push((cx + r * angle.cos(), cy + r * angle.sin()));
            }
        }
        self.polygon(&vertices)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn quad(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
        x4: f64,
        y4: f64,
    ) -> &mut Self {
        self.polygon(&[(x1, y1), (x2, y2), (x3, y3), (x4, y4)])
    }

    /// Regular hexagon of circumradius `radius`, vertex pointing along +y.
    pub fn hexagon(&mut self, x: f64, y: f64, radius: f64) -> &mut Self {
        let vertices: Vec<(f64, f64)> = (0..6)
            .map(|i| {
                let angle = PI * i as f64 / 3.0;
                (x + radius * angle.sin(), y + radius * angle.cos())
            })
            .collect();
        self.polygon(&vertices)
    }

    /// Label drawn with the current fill color.
    pub fn text(&mut self, text: impl Into<String>, x: f64, y: f64, align: TextAlign) -> &mut Self {
        self.label(text, x, y, align, false)
    }

    pub fn bold_text(&mut self, text: impl Into<String>, x: f64, y: f64, align: TextAlign) -> &mut Self {
        self.label(text, x, y, align, true)
    }

    fn label(&mut self, text: impl Into<String>, x: f64, y: f64, align: TextAlign, bold: bool) -> &mut Self {
        let color = self.pen.fill.unwrap_or(Rgba::BLACK);
        let at = self.pen.transform.apply(x, y);
        self.ops.push(DrawOp::Text {
            at,
            text: text.into(),
            color,
            align,
            bold,
        });
        self
    }
}
