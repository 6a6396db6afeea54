//! Streaming file checksums with a selectable digest.
//!
//! # Overview
//! Files are read in fixed-size blocks of 128 × the digest block size and fed
//! to the digest incrementally, so memory use does not depend on file size.
//! The result is a lowercase hex string.
//!
//! # Example
//!
//! ```no_run
//! use twintrim::scanner::hasher::{Checksummer, HashAlgorithm};
//! use std::path::Path;
//!
//! let checksummer = Checksummer::new(HashAlgorithm::Sha256);
//! let hex = checksummer.checksum(Path::new("file.txt")).unwrap();
//! println!("{}", hex);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::Digest;

/// Digest algorithms available for content checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashAlgorithm {
    /// MD5, 128-bit. Fast integrity check, the default.
    #[default]
    Md5,
    /// SHA-1, 160-bit.
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// SHA-512 truncated to 224 bits.
    Sha512_224,
    /// SHA-512 truncated to 256 bits.
    Sha512_256,
    /// SHA3-224.
    Sha3_224,
    /// SHA3-256.
    Sha3_256,
    /// SHA3-384.
    Sha3_384,
    /// SHA3-512.
    Sha3_512,
    /// BLAKE2b, 512-bit output.
    Blake2b,
    /// BLAKE2s, 256-bit output.
    Blake2s,
    /// BLAKE3, 256-bit output.
    Blake3,
}

impl HashAlgorithm {
    /// Every supported algorithm, in display order.
    pub const ALL: [HashAlgorithm; 15] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Blake2b,
        Self::Blake2s,
        Self::Blake3,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512_224",
            Self::Sha512_256 => "sha512_256",
            Self::Sha3_224 => "sha3_224",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
            Self::Blake2b => "blake2b",
            Self::Blake2s => "blake2s",
            Self::Blake3 => "blake3",
        }
    }

    /// Internal block size of the digest in bytes.
    ///
    /// For SHA-3 this is the sponge rate.
    #[must_use]
    pub fn block_size(self) -> usize {
        match self {
            Self::Sha384 | Self::Sha512 | Self::Sha512_224 | Self::Sha512_256 => 128,
            Self::Blake2b => 128,
            Self::Sha3_224 => 144,
            Self::Sha3_256 => 136,
            Self::Sha3_384 => 104,
            Self::Sha3_512 => 72,
            _ => 64,
        }
    }

    /// Size of the read buffer used when streaming a file.
    #[must_use]
    pub fn read_size(self) -> usize {
        128 * self.block_size()
    }

    fn state(self) -> DigestState {
        match self {
            Self::Md5 => DigestState::Md5(md5::Context::new()),
            Self::Sha1 => DigestState::Sha1(sha1::Sha1::new()),
            Self::Sha224 => DigestState::Sha224(sha2::Sha224::new()),
            Self::Sha256 => DigestState::Sha256(sha2::Sha256::new()),
            Self::Sha384 => DigestState::Sha384(sha2::Sha384::new()),
            Self::Sha512 => DigestState::Sha512(sha2::Sha512::new()),
            Self::Sha512_224 => DigestState::Sha512_224(sha2::Sha512_224::new()),
            Self::Sha512_256 => DigestState::Sha512_256(sha2::Sha512_256::new()),
            Self::Sha3_224 => DigestState::Sha3_224(sha3::Sha3_224::new()),
            Self::Sha3_256 => DigestState::Sha3_256(sha3::Sha3_256::new()),
            Self::Sha3_384 => DigestState::Sha3_384(sha3::Sha3_384::new()),
            Self::Sha3_512 => DigestState::Sha3_512(sha3::Sha3_512::new()),
            Self::Blake2b => DigestState::Blake2b(blake2::Blake2b512::new()),
            Self::Blake2s => DigestState::Blake2s(blake2::Blake2s256::new()),
            Self::Blake3 => DigestState::Blake3(Box::new(blake3::Hasher::new())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a digest name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown hash function '{0}' (available: md5, sha1, sha224, sha256, sha384, sha512, \
     sha512_224, sha512_256, sha3_224, sha3_256, sha3_384, sha3_512, blake2b, blake2s, blake3)"
)]
pub struct UnknownHashAlgorithm(pub String);

impl FromStr for HashAlgorithm {
    type Err = UnknownHashAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|algo| normalize(algo.name()) == wanted)
            .ok_or_else(|| UnknownHashAlgorithm(s.to_string()))
    }
}

/// Case and separators are ignored, so `SHA3-256` matches `sha3_256`.
fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['-', '_'], "")
}

impl TryFrom<String> for HashAlgorithm {
    type Error = UnknownHashAlgorithm;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashAlgorithm> for String {
    fn from(algo: HashAlgorithm) -> Self {
        algo.name().to_string()
    }
}

/// In-progress digest computation.
enum DigestState {
    Md5(md5::Context),
    Sha1(sha1::Sha1),
    Sha224(sha2::Sha224),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
    Sha512_224(sha2::Sha512_224),
    Sha512_256(sha2::Sha512_256),
    Sha3_224(sha3::Sha3_224),
    Sha3_256(sha3::Sha3_256),
    Sha3_384(sha3::Sha3_384),
    Sha3_512(sha3::Sha3_512),
    Blake2b(blake2::Blake2b512),
    Blake2s(blake2::Blake2s256),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(ctx) => ctx.consume(data),
            Self::Sha1(h) => h.update(data),
            Self::Sha224(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
            Self::Sha512_224(h) => h.update(data),
            Self::Sha512_256(h) => h.update(data),
            Self::Sha3_224(h) => h.update(data),
            Self::Sha3_256(h) => h.update(data),
            Self::Sha3_384(h) => h.update(data),
            Self::Sha3_512(h) => h.update(data),
            Self::Blake2b(h) => h.update(data),
            Self::Blake2s(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Self::Md5(ctx) => format!("{:x}", ctx.compute()),
            Self::Sha1(h) => format!("{:x}", h.finalize()),
            Self::Sha224(h) => format!("{:x}", h.finalize()),
            Self::Sha256(h) => format!("{:x}", h.finalize()),
            Self::Sha384(h) => format!("{:x}", h.finalize()),
            Self::Sha512(h) => format!("{:x}", h.finalize()),
            Self::Sha512_224(h) => format!("{:x}", h.finalize()),
            Self::Sha512_256(h) => format!("{:x}", h.finalize()),
            Self::Sha3_224(h) => format!("{:x}", h.finalize()),
            Self::Sha3_256(h) => format!("{:x}", h.finalize()),
            Self::Sha3_384(h) => format!("{:x}", h.finalize()),
            Self::Sha3_512(h) => format!("{:x}", h.finalize()),
            Self::Blake2b(h) => format!("{:x}", h.finalize()),
            Self::Blake2s(h) => format!("{:x}", h.finalize()),
            Self::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

/// Computes full-content checksums for files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checksummer {
    algorithm: HashAlgorithm,
}

impl Checksummer {
    /// Create a checksummer for the given algorithm.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Checksum the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened or read.
    pub fn checksum(&self, path: &Path) -> io::Result<String> {
        log::debug!(
            "Generating checksum with {} for {}",
            self.algorithm,
            path.display()
        );
        let file = File::open(path)?;
        self.checksum_reader(file)
    }

    /// Checksum everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Returns any read error other than `Interrupted`.
    pub fn checksum_reader<R: Read>(&self, mut reader: R) -> io::Result<String> {
        let mut state = self.algorithm.state();
        let mut buffer = vec![0u8; self.algorithm.read_size()];

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            state.update(&buffer[..n]);
        }

        Ok(state.finalize_hex())
    }
}
