// The signing desk: the host side of the capture surface.
// It collects name/email plus whatever the surface last reported, issues a
// QR-coded verification payload, and keeps the record list.

use crate::error::{Error, Result, ValidationError};
use crate::export::{SignatureImage, decode_data_uri};
use crate::payload::SignatureInfo;
use crate::services::{EncodeOptions, Entry, NewEntry, RecordStore, SymbolEncoder};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::LazyLock;
use uuid::Uuid;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("email regex: {e}"))
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Shared cell holding the latest value the surface reported.
#[derive(Clone, Default)]
pub struct SignatureSlot(Rc<RefCell<SignatureImage>>);

impl SignatureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The callback to hand to `SignatureSurface::mount`.
    pub fn sink(&self) -> impl FnMut(String) + 'static {
        let cell = self.0.clone();
        move |value: String| *cell.borrow_mut() = SignatureImage::from(value)
    }

    pub fn get(&self) -> SignatureImage {
        self.0.borrow().clone()
    }

    pub fn reset(&self) {
        *self.0.borrow_mut() = SignatureImage::empty();
    }
}

/// Result of a successful issue: the stored row and the payload it encodes.
#[derive(Debug, Clone)]
pub struct Issued {
    pub entry: Entry,
    pub info: SignatureInfo,
}

pub struct SignatureDesk<S, E> {
    store: S,
    encoder: E,
    name: String,
    email: String,
    slot: SignatureSlot,
}

impl<S: RecordStore, E: SymbolEncoder> SignatureDesk<S, E> {
    pub fn new(store: S, encoder: E) -> Self {
        Self { store, encoder, name: String::new(), email: String::new(), slot: SignatureSlot::new() }
    }

    pub fn slot(&self) -> &SignatureSlot {
        &self.slot
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check the form in the order a user sees the fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        // The shape check sees the raw field, so padding around it is rejected
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if !self.slot.get().is_present() {
            return Err(ValidationError::EmptySignature);
        }
        Ok(())
    }

    /// Validate, build the payload, encode it as a QR image and store the entry.
    /// The form is left as is; call `reset_form` once the result was shown.
    pub fn issue(&mut self, now: DateTime<Utc>) -> Result<Issued> {
        self.validate()?;

        let info = SignatureInfo::new(&self.name, &self.email, now);
        let qr_code = self.encoder.encode(&info.to_json()?, &EncodeOptions::default())?;
        let entry = self.store.insert(NewEntry {
            name: info.name.clone(),
            email: info.email.clone(),
            signature_image: self.slot.get().into_string(),
            qr_code,
        })?;
        println!("[desk] issued {} for {}", entry.id, entry.email);
        Ok(Issued { entry, info })
    }

    pub fn reset_form(&mut self) {
        self.name.clear();
        self.email.clear();
        self.slot.reset();
    }

    pub fn signatures(&self) -> Result<Vec<Entry>> {
        self.store.list_ordered_by_created_desc()
    }

    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        self.store.delete_by_id(id)?;
        println!("[desk] deleted {id}");
        Ok(())
    }
}

/// `qr-<name>.png` with every whitespace run replaced by "-".
pub fn download_file_name(name: &str) -> String {
    let slug = name.split_whitespace().collect::<Vec<_>>().join("-");
    if slug.is_empty() { "qrcode.png".to_string() } else { format!("qr-{slug}.png") }
}

/// Write the entry's QR image into `dir`, returning the file path.
pub fn download_qr(entry: &Entry, dir: &Path) -> Result<PathBuf> {
    let data = decode_data_uri(&entry.qr_code)?;
    if data.bytes.is_empty() {
        return Err(Error::Decode("empty QR image".into()));
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(download_file_name(&entry.name));
    fs::write(&path, &data.bytes)?;
    Ok(path)
}
