// Window host + software HUD drawing.
// 1) A window that shows the signature surface on a white card.
// 2) Mouse polling turned into pointer events for the surface.
// 3) A crosshair at the cursor and a tiny 5x7 bitmap font for the status line.

use crate::error::Error;
use crate::pointer::{PointerEvent, PointerPhase};
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Create a window sized to the backing buffer.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push this frame's pixels to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in window pixels, or None while the cursor is outside.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    pub fn s_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }

    pub fn d_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::D, KeyRepeat::No)
    }
}

/* ---------- Polled mouse state -> pointer events ---------- */

/// minifb only lets us poll the mouse once per frame; this turns the
/// (position, button) samples into Down / Move / Up / Leave events.
#[derive(Debug, Default)]
pub struct MouseTracker {
    was_down: bool,
    last: Option<(f32, f32)>,
}

impl MouseTracker {
    /// `pos` is in window pixels; `scale` maps it back to logical pixels.
    pub fn sample(&mut self, pos: Option<(f32, f32)>, down: bool, scale: f32) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        let logical = pos.map(|(x, y)| (x / scale, y / scale));

        match (logical, self.last) {
            (None, Some((lx, ly))) => out.push(PointerEvent::mouse(PointerPhase::Leave, lx, ly)),
            (Some((x, y)), _) => {
                if down && !self.was_down {
                    out.push(PointerEvent::mouse(PointerPhase::Down, x, y));
                } else if down && self.last != logical {
                    out.push(PointerEvent::mouse(PointerPhase::Move, x, y));
                } else if !down && self.was_down {
                    out.push(PointerEvent::mouse(PointerPhase::Up, x, y));
                }
            }
            (None, None) => {}
        }

        self.was_down = down && logical.is_some();
        self.last = logical;
        out
    }
}

/* ---------- Software drawing: pixels, crosshair, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// Straight 1-pixel line between two points (Bresenham).
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// "+" with a small gap in the middle, so the pen tip stays visible.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 3, cy, color);
    draw_line(fb, cx + 3, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 3, color);
    draw_line(fb, cx, cy + 3, cx, cy + size, color);
}

/// Dashed baseline the signer writes on.
pub fn draw_baseline(fb: &mut FrameBuffer, y: i32, margin: i32, color: u32) {
    let w = fb.width as i32;
    let mut x = margin;
    while x < w - margin {
        draw_line(fb, x, y, (x + 5).min(w - margin), y, color);
        x += 9;
    }
}

/// 5x7 glyph bitmap for the HUD's character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx, y + ry as i32, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; unknown characters leave a gap.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_drag_release() {
        let mut t = MouseTracker::default();
        assert!(t.sample(Some((4.0, 4.0)), false, 1.0).is_empty());
        let ev = t.sample(Some((4.0, 4.0)), true, 1.0);
        assert_eq!(ev, vec![PointerEvent::mouse(PointerPhase::Down, 4.0, 4.0)]);
        // Holding still produces nothing
        assert!(t.sample(Some((4.0, 4.0)), true, 1.0).is_empty());
        let ev = t.sample(Some((10.0, 6.0)), true, 2.0);
        assert_eq!(ev, vec![PointerEvent::mouse(PointerPhase::Move, 5.0, 3.0)]);
        let ev = t.sample(Some((10.0, 6.0)), false, 2.0);
        assert_eq!(ev, vec![PointerEvent::mouse(PointerPhase::Up, 5.0, 3.0)]);
    }

    #[test]
    fn leaving_the_window_reports_leave() {
        let mut t = MouseTracker::default();
        t.sample(Some((4.0, 4.0)), true, 1.0);
        let ev = t.sample(None, true, 1.0);
        assert_eq!(ev, vec![PointerEvent::mouse(PointerPhase::Leave, 4.0, 4.0)]);
        // Still outside: nothing more
        assert!(t.sample(None, true, 1.0).is_empty());
    }

    #[test]
    fn text_draws_inside_the_frame() {
        let mut fb = FrameBuffer::new(40, 10, 0);
        draw_text_5x7(&mut fb, 1, 1, "IDLE", 0x00_FF_FF_FF);
        assert!(fb.pixels.iter().any(|p| *p == 0x00_FF_FF_FF));
        // Off-frame text is clipped, not a panic
        draw_text_5x7(&mut fb, -20, 8, "DRAWING", 1);
    }
}
