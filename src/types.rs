// Core types shared by the surface, the raster and the window host.

/// Pen width in logical pixels; multiplied by the density factor at mount.
pub const PEN_WIDTH: f32 = 2.5;
/// Pen color as 0xAARRGGBB (opaque black).
pub const PEN_COLOR: u32 = 0xFF_00_00_00;

/// What the window shows; each entry is 0x00RRGGBB for minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Self { width, height, pixels: vec![fill; width * height] }
    }
}

/// A point in surface-local logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self { x: self.x * factor, y: self.y * factor }
    }
}

/// On-screen rectangle of the surface, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Translate a client (screen) position into surface-local coordinates.
    pub fn to_local(&self, x: f32, y: f32) -> Point {
        Point::new(x - self.left, y - self.top)
    }
}

/// Line cap / join shape. Only `Round` is ever configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    Round,
}

/// The drawing pen. Built once at mount and never changed afterward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    cap: LineShape,
    join: LineShape,
    width: f32, // device pixels
    color: u32, // 0xAARRGGBB
}

impl Pen {
    /// The fixed signature pen, with its width scaled to device pixels.
    pub fn signature(density: f32) -> Self {
        Self {
            cap: LineShape::Round,
            join: LineShape::Round,
            width: PEN_WIDTH * density,
            color: PEN_COLOR,
        }
    }

    pub fn cap(&self) -> LineShape { self.cap }
    pub fn join(&self) -> LineShape { self.join }
    pub fn width(&self) -> f32 { self.width }
    pub fn color(&self) -> u32 { self.color }
}

/// Points sampled during one continuous contact. Frozen once the contact ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub(crate) fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Idle,
    Drawing,
}
