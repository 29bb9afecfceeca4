//! Content hashing utilities.

use xxhash_rust::xxh3::Xxh3;

/// Incremental hash over several labelled parts.
///
/// Each part is length-prefixed so that `("ab", "c")` and `("a", "bc")`
/// hash differently.
pub struct Fingerprinter {
    hasher: Xxh3,
}

impl Fingerprinter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hasher: Xxh3::new(),
        }
    }

    /// Feed one part into the hash.
    pub fn part(&mut self, data: &[u8]) -> &mut Self {
        self.hasher.update(&(data.len() as u64).to_le_bytes());
        self.hasher.update(data);
        self
    }

    /// Final hash, rendered as 16 hex digits.
    #[must_use]
    pub fn finish_hex(&self) -> String {
        format!("{:016x}", self.hasher.digest())
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}
