//! Hashing primitives for AccountChain

use sha2::{Digest, Sha256};

/// Hash function injected into the processor. Implementations must be
/// deterministic across nodes.
pub trait Hasher: Send + Sync {
    /// Hash `data` and return the digest bytes.
    fn compute(&self, data: &[u8]) -> Vec<u8>;

    /// Digest length in bytes.
    fn size(&self) -> usize;

    /// Digest of the empty input.
    fn empty_hash(&self) -> Vec<u8> {
        self.compute(&[])
    }
}

/// SHA-256 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        Sha256::digest(data).to_vec()
    }

    fn size(&self) -> usize {
        32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let hasher = Sha256Hasher;
        assert_eq!(
            hex::encode(hasher.compute(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_length_matches_size() {
        let hasher = Sha256Hasher;
        assert_eq!(hasher.compute(b"accountchain").len(), hasher.size());
        assert_eq!(hasher.empty_hash().len(), hasher.size());
    }
}
