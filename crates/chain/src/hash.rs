//! SHA-512/256, the digest used for addresses, selectors and transaction ids.

use sha2::{Digest, Sha512_256};

/// Hashes the concatenation of `parts`.
pub fn sha512_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
