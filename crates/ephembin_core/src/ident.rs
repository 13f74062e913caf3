//! Opaque paste identifier generation.

use uuid::Uuid;

/// Mint a new paste identifier.
///
/// v4 UUIDs carry 122 bits drawn from the operating system RNG, which keeps
/// collisions negligible over any realistic store lifetime and ids
/// unguessable. The hyphenated hex form is URL-safe as-is.
///
/// # Returns
/// A fresh identifier string.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
