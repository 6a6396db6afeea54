//! Content checksum clumping, the authoritative duplicate test.

use super::{ClassificationError, Clumper, KeyPart};
use crate::scanner::{Checksummer, FileRecord, HashAlgorithm};

/// Groups files by the checksum of their full content.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashClumper {
    checksummer: Checksummer,
}

impl HashClumper {
    /// Create a clumper using `algorithm`.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            checksummer: Checksummer::new(algorithm),
        }
    }

    /// The digest algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.checksummer.algorithm()
    }
}

impl Clumper for HashClumper {
    fn name(&self) -> &'static str {
        "checksum"
    }

    fn make_key(&self, record: &FileRecord) -> Result<KeyPart, ClassificationError> {
        self.checksummer
            .checksum(&record.path)
            .map(KeyPart::Checksum)
            .map_err(|source| ClassificationError::Unreadable {
                path: record.path.clone(),
                source,
            })
    }
}
