// Narrow interfaces to the collaborators the signing flow relies on.
// The surface itself never talks to any of these; the host does.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Account creation request.
#[derive(Debug, Clone, Default)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub trait IdentityService {
    fn sign_up(&mut self, req: SignUp) -> Result<User>;
    fn sign_in(&mut self, email: &str, password: &str) -> Result<User>;
    fn current_user(&self) -> Option<User>;
    fn sign_out(&mut self) -> Result<()>;
}

/// A signature row before the store assigns id and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub name: String,
    pub email: String,
    pub signature_image: String, // PNG data URI from the surface
    pub qr_code: String,         // data URI from the symbol encoder
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub signature_image: String,
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
}

pub trait RecordStore {
    fn insert(&mut self, entry: NewEntry) -> Result<Entry>;
    /// Newest first.
    fn list_ordered_by_created_desc(&self) -> Result<Vec<Entry>>;
    fn delete_by_id(&mut self, id: Uuid) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolColors {
    pub dark: String,
    pub light: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub size: u32,   // output edge in pixels
    pub margin: u32, // quiet zone in modules
    pub colors: SymbolColors,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            size: 300,
            margin: 2,
            colors: SymbolColors { dark: "#000000".into(), light: "#ffffff".into() },
        }
    }
}

/// Turns arbitrary UTF-8 text into a QR raster, returned as a data URI.
pub trait SymbolEncoder {
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<String>;
}
