//! Bearer tokens
//!
//! Opaque random tokens presented as `Authorization: Bearer <value>` and
//! resolved against the record store on each request.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Length of a generated token value
const TOKEN_LEN: usize = 64;

/// Generate a fresh random token value
pub fn generate_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Extract the token from an `Authorization: Bearer <value>` header value
pub fn bearer_value(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
