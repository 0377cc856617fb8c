//! Utility functions shared across the event builders.
//!
//! This module contains the identifier generator used wherever the platform
//! would normally assign an id, plus the query and route helpers.

pub mod query;
pub mod route;

use rand::Rng;

/// Alphabet used for synthetic identifiers: digits followed by lowercase letters.
const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Default identifier length (message ids, receipt handles, request ids).
pub const DEFAULT_ID_LENGTH: usize = 30;

/// Generates an opaque identifier of the default length.
///
/// See [`random_id_of`].
#[must_use]
pub fn random_id() -> String {
    random_id_of(DEFAULT_ID_LENGTH)
}

/// Generates an opaque alphanumeric identifier of exactly `length` characters.
///
/// Every position is drawn independently and uniformly from `[0-9a-z]`.
/// No uniqueness is tracked; collisions are only statistically improbable.
///
/// # Arguments
///
/// * `length` - Number of characters to produce. `0` yields an empty string.
#[must_use]
pub fn random_id_of(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}
