//! Auth gate
//!
//! Credential handling for the HTTP surface: argon2 password hashing and
//! opaque bearer tokens. Token-to-user resolution happens in the API layer's
//! `CurrentUser` extractor against the record store; this module only owns
//! the cryptographic and formatting details.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{bearer_value, generate_token};
