//! Random token generation for session ids and CSRF tokens.

use std::fmt::Write as _;

use sha2::{Digest, Sha224};

/// Length in characters of every generated hash.
pub const HASH_LEN: usize = 56;

/// Generate a random 56-character lowercase hex token.
///
/// The token is the SHA-224 digest of 32 bytes of OS randomness.
pub fn generate_hash() -> String {
    let seed: [u8; 32] = rand::random();
    let digest = Sha224::digest(seed);
    digest.iter().fold(String::with_capacity(HASH_LEN), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
