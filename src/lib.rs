//! Free-hand signature capture.
//!
//! A [`surface::SignatureSurface`] turns mouse/touch input into ink on a
//! fixed-size raster and reports a PNG data URI to its host on every release
//! (or `""` when cleared). The [`desk`] module is the host side: it validates
//! the signer's details, builds the QR verification payload and keeps the
//! record list through the [`services`] interfaces.

pub mod badge;
pub mod config;
pub mod desk;
pub mod draw;
pub mod error;
pub mod export;
pub mod identity;
pub mod payload;
pub mod pointer;
pub mod raster;
pub mod services;
pub mod store;
pub mod surface;
pub mod types;
