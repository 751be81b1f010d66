// Command-line configuration for the desktop host.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "signature-pad", about = "Draw a signature and save it as PNG")]
pub struct Config {
    /// Surface width in logical pixels
    #[arg(long, default_value_t = 640)]
    pub width: usize,

    /// Surface height in logical pixels
    #[arg(long, default_value_t = 192)]
    pub height: usize,

    /// Device pixel-density factor applied once at mount
    #[arg(long, default_value_t = 1.0)]
    pub density: f32,

    /// Where `S` writes the signature PNG
    #[arg(long, default_value = "signature.png")]
    pub out: PathBuf,

    /// JSON file the issued signatures are kept in
    #[arg(long, default_value = "signatures.json")]
    pub store: PathBuf,

    /// Directory `S` drops the verification badge into
    #[arg(long, default_value = ".")]
    pub badge_dir: PathBuf,

    /// Signer name for the verification payload
    #[arg(long)]
    pub name: Option<String>,

    /// Signer e-mail for the verification payload
    #[arg(long)]
    pub email: Option<String>,
}

impl Config {
    /// Window size in device pixels (the window shows the backing buffer 1:1).
    pub fn window_size(&self) -> (usize, usize) {
        let d = if self.density.is_finite() && self.density > 0.0 { self.density } else { 1.0 };
        (
            ((self.width as f32) * d).ceil() as usize,
            ((self.height as f32) * d).ceil() as usize,
        )
    }
}
