// The signature capture surface.
// Pointer input becomes ink on a raster; every release (and every clear) is
// reported to the host as a PNG data URI, or "" when the surface was wiped.
//
// States: Idle <-> Drawing. `clear` forces Idle from anywhere.
// If the raster can't be created at mount, the surface is degraded: every
// operation is a no-op and the host never hears anything.

use crate::export::png_data_uri;
use crate::pointer::{Gesture, PointerEvent, PointerRouter};
use crate::raster::Raster;
use crate::types::{Bounds, Pen, Point, Stroke, SurfaceState};
use image::RgbaImage;

/// Host callback: receives the data URI, or "" for "no signature".
pub type OnSignatureChange = Box<dyn FnMut(String)>;

pub struct SignatureSurface {
    bounds: Bounds,
    density: f32,      // fixed at mount; only `reinitialize` changes it
    pen: Pen,
    raster: Option<Raster>, // None = drawing context unavailable
    state: SurfaceState,
    open: Option<Stroke>,
    strokes: Vec<Stroke>,
    router: PointerRouter,
    on_change: OnSignatureChange,
}

/// What the host should do with the platform event after the surface saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventResponse {
    pub prevent_default: bool,
}

fn sanitize_density(density: f32) -> f32 {
    if density.is_finite() && density > 0.0 { density } else { 1.0 }
}

/// Backing buffer size for on-screen bounds at a given density.
fn backing_size(bounds: &Bounds, density: f32) -> (usize, usize) {
    let side = |v: f32| {
        let px = (v * density).ceil();
        if px.is_finite() && px > 0.0 { px as usize } else { 0 }
    };
    (side(bounds.width), side(bounds.height))
}

fn build_raster(bounds: &Bounds, density: f32) -> Option<Raster> {
    let (w, h) = backing_size(bounds, density);
    match Raster::new(w, h) {
        Ok(r) => Some(r),
        Err(e) => {
            eprintln!("[surface] {e}; signature capture disabled");
            None
        }
    }
}

impl SignatureSurface {
    /// Mount the surface over `bounds` (screen position and logical size).
    /// The density factor is read once here and never again.
    pub fn mount(bounds: Bounds, density: f32, on_change: impl FnMut(String) + 'static) -> Self {
        let density = sanitize_density(density);
        Self {
            bounds,
            density,
            pen: Pen::signature(density),
            raster: build_raster(&bounds, density),
            state: SurfaceState::Idle,
            open: None,
            strokes: Vec::new(),
            router: PointerRouter::new(),
            on_change: Box::new(on_change),
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_degraded(&self) -> bool {
        self.raster.is_none()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    /// Completed strokes, oldest first, in surface-local logical pixels.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Size of the backing buffer in device pixels.
    pub fn backing_size(&self) -> Option<(usize, usize)> {
        self.raster.as_ref().map(|r| (r.width(), r.height()))
    }

    /// A decoded copy of the current raster. The surface keeps no reference to it.
    pub fn snapshot(&self) -> Option<RgbaImage> {
        self.raster.as_ref().map(Raster::to_rgba_image)
    }

    /// Let the window host blit the ink without taking the buffer.
    pub fn composite_onto(&self, fb: &mut crate::types::FrameBuffer, background: u32) {
        if let Some(r) = &self.raster {
            r.composite_onto(fb, background);
        }
    }

    /// Contact start at client position (x,y). Restarts drawing if already drawing;
    /// the interrupted stroke keeps its ink and is closed without an export.
    pub fn begin(&mut self, x: f32, y: f32) -> EventResponse {
        if self.raster.is_none() {
            return EventResponse { prevent_default: true };
        }
        if let Some(partial) = self.open.take() {
            if !partial.is_empty() {
                self.strokes.push(partial);
            }
        }
        let mut stroke = Stroke::default();
        let p = self.bounds.to_local(x, y);
        if p.is_finite() {
            stroke.push(p);
        }
        self.open = Some(stroke);
        self.state = SurfaceState::Drawing;
        EventResponse { prevent_default: true }
    }

    /// Contact moved to client position (x,y). Draws the new segment at once.
    pub fn extend(&mut self, x: f32, y: f32) -> EventResponse {
        let (Some(raster), Some(stroke)) = (self.raster.as_mut(), self.open.as_mut()) else {
            return EventResponse { prevent_default: false };
        };
        let p = self.bounds.to_local(x, y);
        if !p.is_finite() {
            return EventResponse { prevent_default: true };
        }
        // The first finite point only anchors the path, like a move-to
        if let Some(prev) = stroke.last() {
            raster.stroke_segment(prev.scaled(self.density), p.scaled(self.density), &self.pen);
        }
        stroke.push(p);
        EventResponse { prevent_default: true }
    }

    /// Contact released: freeze the stroke and report the whole raster.
    pub fn end(&mut self) {
        if self.state != SurfaceState::Drawing {
            return;
        }
        self.state = SurfaceState::Idle;
        if let Some(stroke) = self.open.take() {
            if !stroke.is_empty() {
                self.strokes.push(stroke);
            }
        }
        self.export();
    }

    /// Pointer left the surface. While drawing this is the same as `end`.
    pub fn leave(&mut self) {
        self.end();
    }

    /// Wipe the surface, drop any open stroke unexported, and report "".
    pub fn clear(&mut self) {
        let Some(raster) = self.raster.as_mut() else {
            return;
        };
        raster.clear();
        self.open = None;
        self.strokes.clear();
        self.state = SurfaceState::Idle;
        self.router.reset();
        (self.on_change)(String::new());
    }

    /// Rebuild for new bounds or density (resize, rotation). Existing ink is
    /// discarded rather than rescaled, and the host is told "".
    pub fn reinitialize(&mut self, bounds: Bounds, density: f32) {
        let was_live = self.raster.is_some();
        self.bounds = bounds;
        self.density = sanitize_density(density);
        self.pen = Pen::signature(self.density);
        self.raster = build_raster(&bounds, self.density);
        self.open = None;
        self.strokes.clear();
        self.state = SurfaceState::Idle;
        self.router.reset();
        if was_live || self.raster.is_some() {
            (self.on_change)(String::new());
        }
    }

    /// Feed one raw mouse/touch event through the pointer router.
    pub fn handle(&mut self, ev: &PointerEvent) -> EventResponse {
        let routed = self.router.route(ev);
        let mut response = EventResponse { prevent_default: routed.prevent_default };
        match routed.gesture {
            Some(Gesture::Begin(p)) => response = self.begin(p.x, p.y),
            Some(Gesture::Extend(p)) => {
                self.extend(p.x, p.y);
            }
            Some(Gesture::End) => self.end(),
            None => {}
        }
        response
    }

    fn export(&mut self) {
        let Some(raster) = self.raster.as_ref() else {
            return;
        };
        match png_data_uri(raster) {
            Ok(uri) => (self.on_change)(uri),
            Err(e) => eprintln!("[surface] export failed: {e}"),
        }
    }
}

/// Points of a stroke mapped back to client coordinates (useful for replay).
pub fn to_client(bounds: &Bounds, p: Point) -> Point {
    Point::new(p.x + bounds.left, p.y + bounds.top)
}
