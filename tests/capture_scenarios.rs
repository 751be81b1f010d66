// End-to-end capture scenarios: surface -> host callback -> decoded PNG.

use signature_pad::badge::DigestBadge;
use signature_pad::desk::{SignatureDesk, SignatureSlot, download_qr};
use signature_pad::error::Result;
use signature_pad::export::{SignatureImage, decode_png_data_uri, png_data_uri};
use signature_pad::pointer::{PointerEvent, PointerPhase};
use signature_pad::raster::Raster;
use signature_pad::services::{EncodeOptions, RecordStore, SymbolEncoder};
use signature_pad::store::{JsonFileStore, MemoryStore};
use signature_pad::surface::SignatureSurface;
use signature_pad::types::{Bounds, Pen, Point, SurfaceState};
use std::cell::RefCell;
use std::rc::Rc;

fn recording_surface(bounds: Bounds, density: f32) -> (SignatureSurface, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let surface = SignatureSurface::mount(bounds, density, move |s: String| sink.borrow_mut().push(s));
    (surface, log)
}

#[test]
fn horizontal_stroke_exports_matching_png() {
    let (mut s, log) = recording_surface(Bounds::new(0.0, 0.0, 100.0, 48.0), 1.0);
    s.begin(10.0, 10.0);
    s.extend(50.0, 10.0);
    s.end();

    let reported = log.borrow()[0].clone();
    assert!(!reported.is_empty());
    let img = decode_png_data_uri(&reported).unwrap();
    assert_eq!(img.dimensions(), (100, 48));

    // Reference: the same segment rendered straight into a fresh raster
    let mut reference = Raster::new(100, 48).unwrap();
    reference.stroke_segment(Point::new(10.0, 10.0), Point::new(50.0, 10.0), &Pen::signature(1.0));
    assert_eq!(img, reference.to_rgba_image());
    assert_eq!(reported, png_data_uri(&reference).unwrap());

    // Independent of the renderer: solid within 0.75px of the segment (pen
    // radius 1.25 minus the half-pixel ramp), blank from 1.75px out
    for (x, y, px) in img.enumerate_pixels() {
        let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
        let nearest_x = cx.clamp(10.0, 50.0);
        let d = ((cx - nearest_x).powi(2) + (cy - 10.0).powi(2)).sqrt();
        if d <= 0.75 {
            assert_eq!(px.0, [0, 0, 0, 255], "missing ink at {x},{y}");
        } else if d >= 1.75 {
            assert_eq!(px.0[3], 0, "ink outside the pen at {x},{y}");
        }
    }

    // Ink along the line, nothing well away from it
    for x in 12..48 {
        assert_eq!(img.get_pixel(x, 9).0, [0, 0, 0, 255]);
    }
    for (x, y, px) in img.enumerate_pixels() {
        let near = (7..=53).contains(&x) && (7..=13).contains(&y);
        if !near {
            assert_eq!(px.0[3], 0, "unexpected ink at {x},{y}");
        }
    }
}

#[test]
fn clear_after_draw_reports_empty_and_blanks_buffer() {
    let (mut s, log) = recording_surface(Bounds::new(0.0, 0.0, 100.0, 48.0), 1.0);
    s.begin(10.0, 10.0);
    s.extend(50.0, 10.0);
    s.end();
    s.clear();

    assert_eq!(log.borrow().len(), 2);
    assert_eq!(log.borrow()[1], "");
    let snap = s.snapshot().unwrap();
    assert!(snap.pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn pointer_leave_ends_the_stroke_like_release() {
    let bounds = Bounds::new(0.0, 0.0, 60.0, 30.0);
    let (mut left, left_log) = recording_surface(bounds, 1.0);
    let (mut released, released_log) = recording_surface(bounds, 1.0);

    for s in [&mut left, &mut released] {
        s.begin(5.0, 5.0);
        s.extend(40.0, 20.0);
    }
    left.leave();
    released.end();

    assert_eq!(left.state(), SurfaceState::Idle);
    assert_eq!(*left_log.borrow(), *released_log.borrow());
}

#[test]
fn mouse_leave_through_the_router_while_drawing() {
    let (mut s, log) = recording_surface(Bounds::new(0.0, 0.0, 60.0, 30.0), 1.0);
    s.handle(&PointerEvent::mouse(PointerPhase::Down, 5.0, 5.0));
    s.handle(&PointerEvent::mouse(PointerPhase::Move, 30.0, 5.0));
    assert!(log.borrow().is_empty());
    s.handle(&PointerEvent::mouse(PointerPhase::Leave, 70.0, 5.0));
    assert_eq!(s.state(), SurfaceState::Idle);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn offset_surface_maps_screen_points_to_local_ink() {
    let (ox, oy) = (200.0, 75.0);
    let (mut s, log) = recording_surface(Bounds::new(ox, oy, 100.0, 48.0), 1.0);
    s.begin(ox + 10.0, oy + 10.0);
    s.extend(ox + 50.0, oy + 10.0);
    s.end();

    let (mut plain, plain_log) = recording_surface(Bounds::new(0.0, 0.0, 100.0, 48.0), 1.0);
    plain.begin(10.0, 10.0);
    plain.extend(50.0, 10.0);
    plain.end();

    assert_eq!(s.strokes()[0].points()[0], Point::new(10.0, 10.0));
    assert_eq!(*log.borrow(), *plain_log.borrow());
}

#[test]
fn density_scales_buffer_and_ink() {
    let (mut s, log) = recording_surface(Bounds::new(0.0, 0.0, 50.0, 24.0), 2.0);
    s.begin(5.0, 5.0);
    s.extend(25.0, 5.0);
    s.end();

    let img = decode_png_data_uri(&log.borrow()[0]).unwrap();
    assert_eq!(img.dimensions(), (100, 48));
    // Logical y=5 lands on device row 10; the pen is 5 device pixels wide
    assert_eq!(img.get_pixel(30, 9).0[3], 255);
    assert_eq!(img.get_pixel(30, 11).0[3], 255);
    assert_eq!(img.get_pixel(30, 20).0[3], 0);
}

struct FixedEncoder;

impl SymbolEncoder for FixedEncoder {
    fn encode(&self, _text: &str, _options: &EncodeOptions) -> Result<String> {
        Ok("data:image/png;base64,iVBORw0KGgo=".into())
    }
}

#[test]
fn desk_only_issues_after_a_release() {
    let mut desk = SignatureDesk::new(MemoryStore::new(), FixedEncoder);
    desk.set_name("Grace Hopper");
    desk.set_email("grace@example.com");

    let slot: SignatureSlot = desk.slot().clone();
    let mut surface = SignatureSurface::mount(Bounds::new(0.0, 0.0, 80.0, 40.0), 1.0, slot.sink());

    surface.begin(4.0, 4.0);
    surface.extend(60.0, 30.0);
    // Mid-stroke: the host has nothing yet
    assert!(desk.issue(chrono::Utc::now()).is_err());

    surface.end();
    let reported: SignatureImage = slot.get();
    assert!(reported.decode().unwrap().is_some());
    let issued = desk.issue(chrono::Utc::now()).unwrap();
    assert_eq!(issued.entry.signature_image, reported.as_str());

    surface.clear();
    assert!(!slot.get().is_present());
    assert!(desk.issue(chrono::Utc::now()).is_err());
    assert_eq!(desk.signatures().unwrap().len(), 1);
}

#[test]
fn window_host_flow_persists_and_writes_a_badge() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("signatures.json");

    let mut desk = SignatureDesk::new(JsonFileStore::open(&db).unwrap(), DigestBadge);
    let mut surface = SignatureSurface::mount(Bounds::new(0.0, 0.0, 80.0, 40.0), 1.0, desk.slot().sink());
    surface.handle(&PointerEvent::mouse(PointerPhase::Down, 4.0, 20.0));
    surface.handle(&PointerEvent::mouse(PointerPhase::Move, 70.0, 20.0));
    surface.handle(&PointerEvent::mouse(PointerPhase::Up, 70.0, 20.0));

    desk.set_name("Ada Lovelace");
    desk.set_email("ada@example.com");
    let issued = desk.issue(chrono::Utc::now()).unwrap();

    let badge = download_qr(&issued.entry, dir.path()).unwrap();
    assert_eq!(badge.file_name().unwrap(), "qr-Ada-Lovelace.png");
    let img = image::open(&badge).unwrap();
    assert_eq!((img.width(), img.height()), (300, 300));

    drop(desk);
    let reopened = JsonFileStore::open(&db).unwrap();
    assert_eq!(reopened.list_ordered_by_created_desc().unwrap(), vec![issued.entry]);
}
