// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

/// Problems found while checking the signing form before anything is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email format is not valid")]
    InvalidEmail,
    #[error("signature must not be empty")]
    EmptySignature,
}

/// Failures reported by an identity service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("all fields are required")]
    MissingFields,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("an account already exists for {0}")]
    EmailTaken(String),
    #[error("invalid login credentials")]
    InvalidCredentials,
}

impl IdentityError {
    /// HTTP status an API route answers with for this failure.
    pub fn status(&self) -> u16 {
        match self {
            IdentityError::MissingFields
            | IdentityError::PasswordMismatch
            | IdentityError::PasswordTooShort(_) => 400,
            IdentityError::InvalidCredentials => 401,
            IdentityError::EmailTaken(_) => 409,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String), // the raster buffer could not be created
    #[error("image encode error: {0}")]
    Encode(String), // PNG / data-URI encoding failed
    #[error("image decode error: {0}")]
    Decode(String), // a data URI or PNG could not be read back
    #[error("window init error: {0}")]
    WindowInit(String), // creating the window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // pushing the frame to the window failed
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("record store error: {0}")]
    Store(String), // the symbol encoder or record store rejected the request
    #[error("no signature with id {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
