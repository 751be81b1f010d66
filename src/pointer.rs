// One "pointer input" for both mouse and touch.
// The router keeps a single source of truth per gesture: touch wins, the mouse
// events a platform synthesizes after a touch are swallowed, and any extra
// fingers on the glass are ignored.

use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
    Cancel,
}

/// A raw input event in client (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub source: PointerSource,
    pub id: u32, // touch identifier; always 0 for the mouse
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn mouse(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self { phase, source: PointerSource::Mouse, id: 0, x, y }
    }

    pub fn touch(phase: PointerPhase, id: u32, x: f32, y: f32) -> Self {
        Self { phase, source: PointerSource::Touch, id, x, y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// What the surface should do with a routed event (positions still in client space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Begin(Point),
    Extend(Point),
    End,
}

/// Result of routing one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Routed {
    pub gesture: Option<Gesture>,
    /// The host should cancel the platform default (scroll, selection, compat mouse).
    pub prevent_default: bool,
}

impl Routed {
    const IGNORED: Routed = Routed { gesture: None, prevent_default: false };
    const SWALLOWED: Routed = Routed { gesture: None, prevent_default: true };

    fn act(gesture: Gesture, prevent_default: bool) -> Self {
        Self { gesture: Some(gesture), prevent_default }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    None,
    Mouse,
    Touch(u32),
}

#[derive(Debug)]
pub struct PointerRouter {
    active: Active,
    swallow_compat_mouse: bool, // a touch tap just ended; eat the synthesized mouse sequence
    swallowing: bool,           // inside that synthesized Down..Up
    touch_moved: bool,          // the active touch dragged, so no compat sequence follows
}

impl Default for PointerRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerRouter {
    pub fn new() -> Self {
        Self {
            active: Active::None,
            swallow_compat_mouse: false,
            swallowing: false,
            touch_moved: false,
        }
    }

    /// Forget any in-flight gesture (used when the surface is cleared or rebuilt).
    pub fn reset(&mut self) {
        self.active = Active::None;
    }

    pub fn route(&mut self, ev: &PointerEvent) -> Routed {
        match ev.source {
            PointerSource::Touch => self.route_touch(ev),
            PointerSource::Mouse => self.route_mouse(ev),
        }
    }

    fn route_touch(&mut self, ev: &PointerEvent) -> Routed {
        match (ev.phase, self.active) {
            (PointerPhase::Down, Active::None | Active::Mouse) => {
                // Touch takes over; a fresh touch also cancels any pending compat swallow
                self.active = Active::Touch(ev.id);
                self.swallow_compat_mouse = false;
                self.swallowing = false;
                self.touch_moved = false;
                Routed::act(Gesture::Begin(ev.position()), true)
            }
            (PointerPhase::Move, Active::Touch(id)) if id == ev.id => {
                self.touch_moved = true;
                Routed::act(Gesture::Extend(ev.position()), true)
            }
            (PointerPhase::Up | PointerPhase::Cancel, Active::Touch(id)) if id == ev.id => {
                // Platforms only synthesize mouse events for a tap, never after a drag
                self.active = Active::None;
                self.swallow_compat_mouse = !self.touch_moved;
                Routed::act(Gesture::End, true)
            }
            // Second finger, or a stray touch event for an untracked contact
            (_, Active::Touch(_)) => Routed::SWALLOWED,
            _ => Routed::IGNORED,
        }
    }

    fn route_mouse(&mut self, ev: &PointerEvent) -> Routed {
        if matches!(self.active, Active::Touch(_)) {
            return Routed::SWALLOWED;
        }

        if self.swallow_compat_mouse || self.swallowing {
            match ev.phase {
                PointerPhase::Down => {
                    self.swallowing = true;
                    self.swallow_compat_mouse = false;
                    return Routed::SWALLOWED;
                }
                PointerPhase::Up if self.swallowing => {
                    self.swallowing = false;
                    return Routed::SWALLOWED;
                }
                _ => return Routed::SWALLOWED,
            }
        }

        match (ev.phase, self.active) {
            (PointerPhase::Down, _) => {
                self.active = Active::Mouse;
                Routed::act(Gesture::Begin(ev.position()), true)
            }
            (PointerPhase::Move, Active::Mouse) => Routed::act(Gesture::Extend(ev.position()), true),
            (PointerPhase::Up | PointerPhase::Leave | PointerPhase::Cancel, Active::Mouse) => {
                self.active = Active::None;
                Routed::act(Gesture::End, false)
            }
            _ => Routed::IGNORED,
        }
    }
}
