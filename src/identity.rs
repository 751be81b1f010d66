// In-process identity service: accounts, password check, one session.
// Passwords are kept only as SHA-256 digests salted with the account e-mail.

use crate::error::{IdentityError, Result};
use crate::services::{IdentityService, SignUp, User};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

struct Account {
    user: User,
    digest: String,
}

#[derive(Default)]
pub struct MemoryIdentity {
    accounts: HashMap<String, Account>, // keyed by normalized e-mail
    session: Option<User>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn digest(email_key: &str, password: &str) -> String {
    let mut h = Sha256::new();
    h.update(email_key.as_bytes());
    h.update([0u8]);
    h.update(password.as_bytes());
    hex::encode(h.finalize())
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityService for MemoryIdentity {
    fn sign_up(&mut self, req: SignUp) -> Result<User> {
        let name = req.name.trim();
        let email = req.email.trim();
        if name.is_empty() || email.is_empty() || req.password.is_empty() || req.confirm_password.is_empty() {
            return Err(IdentityError::MissingFields.into());
        }
        if req.password != req.confirm_password {
            return Err(IdentityError::PasswordMismatch.into());
        }
        let password = req.password.trim();
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::PasswordTooShort(MIN_PASSWORD_LEN).into());
        }
        let key = normalize_email(email);
        if self.accounts.contains_key(&key) {
            return Err(IdentityError::EmailTaken(email.to_string()).into());
        }

        let user = User { id: Uuid::new_v4(), email: email.to_string(), name: name.to_string() };
        let account = Account { user: user.clone(), digest: digest(&key, password) };
        self.accounts.insert(key, account);
        self.session = Some(user.clone());
        println!("[identity] signed up {}", user.email);
        Ok(user)
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<User> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(IdentityError::MissingFields.into());
        }
        let key = normalize_email(email);
        let account = self
            .accounts
            .get(&key)
            .filter(|a| a.digest == digest(&key, password.trim()))
            .ok_or(IdentityError::InvalidCredentials)?;
        self.session = Some(account.user.clone());
        Ok(account.user.clone())
    }

    fn current_user(&self) -> Option<User> {
        self.session.clone()
    }

    fn sign_out(&mut self) -> Result<()> {
        self.session = None;
        Ok(())
    }
}
