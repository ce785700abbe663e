//! Document key generation

use uuid::Uuid;

/// Length of a generated key: 128 bits as lowercase hex
pub const GENERATED_KEY_LEN: usize = 32;

/// Generates a random 128-bit key rendered as lowercase hex.
///
/// Collisions are not retried; the probability is negligible.
pub fn generate_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Resolves a caller-supplied key, generating one when absent or empty.
pub fn resolve_key(key: Option<&str>) -> String {
    match key {
        Some(k) if !k.is_empty() => k.to_string(),
        _ => generate_key(),
    }
}
