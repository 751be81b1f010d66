// A stand-in symbol encoder for the desktop host.
// It does not produce a scannable QR code. The payload's SHA-256 digest is laid
// out as a 16x16 grid of modules (one bit each) inside a quiet zone, so equal
// payloads give equal badges and the image is still a PNG data URI.

use crate::error::{Error, Result};
use crate::export::{PNG_MIME, encode_rgba_png, to_data_uri};
use crate::services::{EncodeOptions, SymbolEncoder};
use image::{Rgba, RgbaImage};
use sha2::{Digest, Sha256};

const GRID: u32 = 16; // 16 * 16 = 256 digest bits

/// `#rrggbb` (or `rrggbb`) as an opaque pixel.
fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let raw = hex::decode(value.trim().trim_start_matches('#'))
        .map_err(|e| Error::Encode(format!("color {value:?}: {e}")))?;
    match raw.as_slice() {
        [r, g, b] => Ok(Rgba([*r, *g, *b, 255])),
        _ => Err(Error::Encode(format!("color {value:?}: expected 6 hex digits"))),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DigestBadge;

impl DigestBadge {
    pub fn render(&self, text: &str, options: &EncodeOptions) -> Result<RgbaImage> {
        if options.size == 0 {
            return Err(Error::Encode("badge size must be positive".into()));
        }
        let dark = parse_color(&options.colors.dark)?;
        let light = parse_color(&options.colors.light)?;
        let digest = Sha256::digest(text.as_bytes());

        let modules = GRID + 2 * options.margin;
        let size = options.size;
        Ok(RgbaImage::from_fn(size, size, |x, y| {
            // Module under this pixel, then back into grid space
            let mx = (x as u64 * modules as u64 / size as u64) as u32;
            let my = (y as u64 * modules as u64 / size as u64) as u32;
            let inside = options.margin..options.margin + GRID;
            if !inside.contains(&mx) || !inside.contains(&my) {
                return light;
            }
            let bit = ((my - options.margin) * GRID + (mx - options.margin)) as usize;
            if digest[bit / 8] & (0x80 >> (bit % 8)) != 0 { dark } else { light }
        }))
    }
}

impl SymbolEncoder for DigestBadge {
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<String> {
        let img = self.render(text, options)?;
        Ok(to_data_uri(&encode_rgba_png(&img)?, PNG_MIME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::decode_png_data_uri;
    use crate::services::SymbolColors;

    #[test]
    fn same_text_same_badge() {
        let opts = EncodeOptions::default();
        let a = DigestBadge.encode("{\"id\":1}", &opts).unwrap();
        assert_eq!(a, DigestBadge.encode("{\"id\":1}", &opts).unwrap());
        assert_ne!(a, DigestBadge.encode("{\"id\":2}", &opts).unwrap());

        let img = decode_png_data_uri(&a).unwrap();
        assert_eq!(img.dimensions(), (300, 300));
    }

    #[test]
    fn quiet_zone_is_light_and_grid_uses_both_colors() {
        let opts = EncodeOptions::default();
        let img = DigestBadge.render("ada@example.com", &opts).unwrap();
        // 20 modules of 15px: the first two modules on each side are margin
        for i in 0..30 {
            assert_eq!(img.get_pixel(i, 150).0, [255, 255, 255, 255]);
            assert_eq!(img.get_pixel(150, 299 - i).0, [255, 255, 255, 255]);
        }
        let inner: Vec<_> = (30..270).flat_map(|y| (30..270).map(move |x| (x, y))).collect();
        assert!(inner.iter().any(|&(x, y)| img.get_pixel(x, y).0 == [0, 0, 0, 255]));
        assert!(inner.iter().any(|&(x, y)| img.get_pixel(x, y).0 == [255, 255, 255, 255]));
    }

    #[test]
    fn bad_color_is_an_encode_error() {
        let opts = EncodeOptions {
            colors: SymbolColors { dark: "black".into(), light: "#ffffff".into() },
            ..EncodeOptions::default()
        };
        assert!(matches!(DigestBadge.encode("x", &opts), Err(Error::Encode(_))));
        assert_eq!(parse_color("#0a0B0c").unwrap().0, [10, 11, 12, 255]);
    }
}
