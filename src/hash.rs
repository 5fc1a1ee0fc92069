//! Double SHA-256 digest and Merkle tree construction

use sha2::{Digest, Sha256};

use crate::types::Hash;

/// Single SHA-256
pub fn sha256(data: &[u8]) -> Hash {
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&Sha256::digest(data));
    hash
}

/// The protocol's two-pass digest: SHA256(SHA256(data))
pub fn sha256d(data: &[u8]) -> Hash {
    sha256(&sha256(data))
}

/// Merkle root over `leaves`, built bottom-up.
///
/// A level with an odd number of nodes pairs its last node with itself.
/// Returns `None` when there are no leaves.
pub fn merkle_root<I>(leaves: I) -> Option<Hash>
where
    I: IntoIterator<Item = Hash>,
{
    let mut level: Vec<Hash> = leaves.into_iter().collect();
    if level.is_empty() {
        return None;
    }

    let mut combined = [0u8; 64];
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let right = pair.get(1).unwrap_or(&pair[0]);
                combined[..32].copy_from_slice(&pair[0]);
                combined[32..].copy_from_slice(right);
                sha256d(&combined)
            })
            .collect();
    }

    level.pop()
}
