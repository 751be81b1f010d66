// What you SEE:
// • A white card with a dashed baseline. Hold the left mouse button to sign.
// • Releasing (or leaving the window) hands the signature to the host as PNG.
// • C clears the card. S saves the PNG and, with --name/--email, issues a record
//   plus a verification badge. D deletes the newest record. ESC quits.

use chrono::Utc;
use clap::Parser;
use signature_pad::badge::DigestBadge;
use signature_pad::config::Config;
use signature_pad::desk::{SignatureDesk, download_qr};
use signature_pad::draw::{Drawer, MouseTracker, draw_baseline, draw_crosshair, draw_text_5x7};
use signature_pad::error::Error;
use signature_pad::export::decode_data_uri;
use signature_pad::store::JsonFileStore;
use signature_pad::surface::SignatureSurface;
use signature_pad::types::{Bounds, FrameBuffer, SurfaceState};
use std::fs;

const CARD: u32 = 0x00_FF_FF_FF;
const GUIDE: u32 = 0x00_C8_C8_C8;
const HUD: u32 = 0x00_70_70_70;

type Desk = SignatureDesk<JsonFileStore, DigestBadge>;

fn save(cfg: &Config, desk: &mut Desk) -> Result<String, Error> {
    let image = desk.slot().get();
    if !image.is_present() {
        return Ok("NOTHING TO SAVE".into());
    }
    let data = decode_data_uri(image.as_str())?;
    fs::write(&cfg.out, &data.bytes)?;
    println!("[main] wrote {} ({} bytes)", cfg.out.display(), data.bytes.len());

    let (Some(name), Some(email)) = (&cfg.name, &cfg.email) else {
        return Ok("SAVED".into());
    };
    desk.set_name(name.as_str());
    desk.set_email(email.as_str());
    let issued = desk.issue(Utc::now())?;
    println!("[main] payload {}", issued.info.to_json()?);
    let badge = download_qr(&issued.entry, &cfg.badge_dir)?;
    println!("[main] badge {}", badge.display());
    Ok("ISSUED".into())
}

fn delete_newest(desk: &mut Desk) -> Result<String, Error> {
    let Some(newest) = desk.signatures()?.into_iter().next() else {
        return Ok("NOTHING TO DELETE".into());
    };
    desk.delete(newest.id)?;
    Ok("DELETED".into())
}

fn main() -> Result<(), Error> {
    let cfg = Config::parse();
    let (w, h) = cfg.window_size();
    let mut drawer = Drawer::new("Signature Pad", w, h)?;

    /* --- Desk (records + badge encoder) and the surface reporting into it --- */
    let mut desk = SignatureDesk::new(JsonFileStore::open(&cfg.store)?, DigestBadge);
    let bounds = Bounds::new(0.0, 0.0, cfg.width as f32, cfg.height as f32);
    let mut surface = SignatureSurface::mount(bounds, cfg.density, desk.slot().sink());
    if surface.is_degraded() {
        eprintln!("[main] signature unavailable: the drawing surface could not be created");
    }
    let scale = surface.density();

    let mut screen = FrameBuffer::new(w, h, CARD);
    let mut mouse = MouseTracker::default();
    let mut notice = String::new();

    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Inputs */
        for ev in mouse.sample(drawer.mouse_pos(), drawer.left_mouse_down(), scale) {
            surface.handle(&ev);
        }
        if drawer.c_pressed_once() {
            surface.clear();
            notice = "CLEARED".into();
        }
        if drawer.s_pressed_once() {
            notice = match save(&cfg, &mut desk) {
                Ok(msg) => msg,
                Err(e) => {
                    eprintln!("[main] save failed: {e}");
                    "SAVE FAILED".into()
                }
            };
        }
        if drawer.d_pressed_once() {
            notice = match delete_newest(&mut desk) {
                Ok(msg) => msg,
                Err(e) => {
                    eprintln!("[main] delete failed: {e}");
                    "DELETE FAILED".into()
                }
            };
        }

        /* 2) Card, guide, ink */
        screen.pixels.fill(CARD);
        draw_baseline(&mut screen, (h as f32 * 0.75) as i32, 16, GUIDE);
        surface.composite_onto(&mut screen, CARD);

        /* 3) Cursor + status line */
        if let Some((mx, my)) = drawer.mouse_pos() {
            draw_crosshair(&mut screen, mx as i32, my as i32, 8, GUIDE);
        }
        let state = match surface.state() {
            SurfaceState::Idle => "IDLE",
            SurfaceState::Drawing => "DRAWING",
        };
        let records = desk.signatures().map(|rows| rows.len()).unwrap_or(0);
        let hud = format!(
            "{state} | STROKES: {} | RECORDS: {records} | C: CLEAR  S: SAVE  D: DELETE  ESC: QUIT {notice}",
            surface.strokes().len()
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, HUD);

        drawer.present(&screen)?;
    }

    Ok(())
}
