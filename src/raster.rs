// The surface's backing buffer: a fixed-size RGBA raster the pen draws into.
// Pixels are packed as 0xAARRGGBB; 0x00000000 is blank (fully transparent).

use crate::error::{Error, Result};
use crate::types::{Pen, Point};
use image::{Rgba, RgbaImage};

pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

/// Largest backing buffer we will try to allocate (a 16384 x 16384 canvas).
pub const MAX_PIXELS: usize = 16_384 * 16_384;

impl Raster {
    /// Allocate a blank raster.
    /// Fails when either side is zero, the area is over `MAX_PIXELS`, or the
    /// allocator refuses the buffer.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ContextUnavailable(format!(
                "zero-sized raster {width}x{height}"
            )));
        }
        let len = width
            .checked_mul(height)
            .filter(|n| *n <= MAX_PIXELS)
            .ok_or_else(|| Error::ContextUnavailable(format!("raster {width}x{height} too large")))?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|e| {
            Error::ContextUnavailable(format!("raster {width}x{height}: {e}"))
        })?;
        pixels.resize(len, 0);
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// Packed pixel at (x,y), or None outside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// True when no pixel carries any ink.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == 0)
    }

    /// Erase everything back to transparent.
    pub fn clear(&mut self) {
        for p in &mut self.pixels { *p = 0; }
    }

    /// Lay ink of `color` at (x,y) with the given coverage in [0,1].
    /// Ink combines by max alpha, so overlapping caps at a join never darken.
    #[inline]
    fn put_ink(&mut self, x: i32, y: i32, color: u32, coverage: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let src_a = (color >> 24) as f32 / 255.0;
        let a = (src_a * coverage * 255.0).round().clamp(0.0, 255.0) as u32;
        if a == 0 {
            return;
        }
        let idx = y * self.width + x;
        let old_a = self.pixels[idx] >> 24;
        if a > old_a {
            self.pixels[idx] = (a << 24) | (color & 0x00_FF_FF_FF);
        }
    }

    /// Render the segment a→b with the pen: round caps, anti-aliased edge.
    /// A zero-length segment leaves a round dot. Non-finite points draw nothing.
    pub fn stroke_segment(&mut self, a: Point, b: Point, pen: &Pen) {
        if !a.is_finite() || !b.is_finite() {
            return;
        }
        let r = pen.width() * 0.5;
        if r <= 0.0 || !r.is_finite() {
            return;
        }

        // Scan just the bounding box of the capsule (plus one pixel of AA fringe)
        let x0 = (a.x.min(b.x) - r - 1.0).floor().max(0.0);
        let y0 = (a.y.min(b.y) - r - 1.0).floor().max(0.0);
        let x1 = (a.x.max(b.x) + r + 1.0).ceil().min(self.width as f32);
        let y1 = (a.y.max(b.y) + r + 1.0).ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len2 = dx * dx + dy * dy;

        for y in (y0 as i32)..(y1 as i32) {
            for x in (x0 as i32)..(x1 as i32) {
                // Distance from the pixel center to the segment
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let t = if len2 > 0.0 {
                    (((px - a.x) * dx + (py - a.y) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let cx = a.x + dx * t;
                let cy = a.y + dy * t;
                let d = ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt();

                // 1 well inside the pen, ramps to 0 across one pixel at the edge
                let coverage = (r + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.put_ink(x, y, pen.color(), coverage);
                }
            }
        }
    }

    /// Copy out as an RGBA image (straight alpha). The caller owns the copy.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width as u32, self.height as u32);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let p = self.pixels[y as usize * self.width + x as usize];
            *px = Rgba([
                ((p >> 16) & 0xFF) as u8,
                ((p >> 8) & 0xFF) as u8,
                (p & 0xFF) as u8,
                (p >> 24) as u8,
            ]);
        }
        img
    }

    /// Composite onto an opaque background color into a window frame (0x00RRGGBB).
    /// The frame must match the raster's size; otherwise only the overlap is drawn.
    pub fn composite_onto(&self, fb: &mut crate::types::FrameBuffer, background: u32) {
        let w = self.width.min(fb.width);
        let h = self.height.min(fb.height);
        let (br, bg, bb) = ((background >> 16) & 0xFF, (background >> 8) & 0xFF, background & 0xFF);
        for y in 0..h {
            for x in 0..w {
                let p = self.pixels[y * self.width + x];
                let a = p >> 24;
                let mix = |src: u32, dst: u32| (src * a + dst * (255 - a) + 127) / 255;
                let r = mix((p >> 16) & 0xFF, br);
                let g = mix((p >> 8) & 0xFF, bg);
                let b = mix(p & 0xFF, bb);
                fb.pixels[y * fb.width + x] = (r << 16) | (g << 8) | b;
            }
        }
    }
}
