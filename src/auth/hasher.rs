use std::{collections::HashMap, fmt, str::FromStr};

use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use thiserror::Error;

use super::Key;

/// Salt length used by [`DigestHashMaker::default`], in bytes.
pub const DEFAULT_SALT_LEN: usize = 16;

/// Bounds accepted by [`DigestHashMaker::new`].
pub const MIN_SALT_LEN: usize = 8;
pub const MAX_SALT_LEN: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown hash algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Salt length must be between {min} and {max} bytes, got {len}")]
pub struct InvalidSaltLen {
    pub len: usize,
    pub min: usize,
    pub max: usize,
}

/// Digest used by a [`Hasher`].
///
/// Deserializes through [`FromStr`], so `SHA-512` and `sha512` both work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// `digest(secret ++ salt)`.
    fn digest(
        self,
        secret: &[u8],
        salt: &[u8],
    ) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::new()
                .chain_update(secret)
                .chain_update(salt)
                .finalize()
                .to_vec(),
            Self::Sha384 => Sha384::new()
                .chain_update(secret)
                .chain_update(salt)
                .finalize()
                .to_vec(),
            Self::Sha512 => Sha512::new()
                .chain_update(secret)
                .chain_update(salt)
                .finalize()
                .to_vec(),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = UnknownAlgorithm;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Random bytes mixed into a password before hashing.
#[derive(Clone, PartialEq, Eq)]
pub struct Salt(Vec<u8>);

impl Salt {
    /// Draws `len` bytes from the operating system CSPRNG.
    pub fn generate(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        Salt(bytes)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Salt(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Salt {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("Salt(")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        f.write_str(")")
    }
}

/// Output of [`Hasher::hash`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HashedSecret(Vec<u8>);

impl HashedSecret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for HashedSecret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Digest bytes stay out of logs.
impl fmt::Debug for HashedSecret {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "HashedSecret(<{} bytes>)", self.0.len())
    }
}

/// Per-user salted hash function.
///
/// Replaces a closure capturing the salt: the salt and algorithm are plain
/// fields, so two hashers can be compared and the salt inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hasher {
    salt: Salt,
    algorithm: HashAlgorithm,
}

impl Hasher {
    pub fn new(
        algorithm: HashAlgorithm,
        salt: Salt,
    ) -> Self {
        Self { salt, algorithm }
    }

    /// Hasher with a fresh random salt of `salt_len` bytes.
    pub fn generate(
        algorithm: HashAlgorithm,
        salt_len: usize,
    ) -> Self {
        Self::new(algorithm, Salt::generate(salt_len))
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn hash(
        &self,
        secret: &[u8],
    ) -> HashedSecret {
        HashedSecret(self.algorithm.digest(secret, self.salt.as_bytes()))
    }
}

/// Builds one [`Hasher`] per username.
///
/// Implemented for any `Fn(&[Key]) -> HashMap<Key, Hasher>`, so tests can pass
/// a closure with fixed salts.
pub trait HashMaker {
    fn make_hashers(
        &self,
        usernames: &[Key],
    ) -> HashMap<Key, Hasher>;
}

impl<F> HashMaker for F
where
    F: Fn(&[Key]) -> HashMap<Key, Hasher>,
{
    fn make_hashers(
        &self,
        usernames: &[Key],
    ) -> HashMap<Key, Hasher> {
        self(usernames)
    }
}

/// Default hash maker: a fresh random salt per username.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestHashMaker {
    algorithm: HashAlgorithm,
    salt_len: usize,
}

impl DigestHashMaker {
    /// Fails unless `salt_len` is within `MIN_SALT_LEN..=MAX_SALT_LEN`.
    pub fn new(
        algorithm: HashAlgorithm,
        salt_len: usize,
    ) -> Result<Self, InvalidSaltLen> {
        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&salt_len) {
            return Err(InvalidSaltLen {
                len: salt_len,
                min: MIN_SALT_LEN,
                max: MAX_SALT_LEN,
            });
        }
        Ok(Self {
            algorithm,
            salt_len,
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }
}

impl Default for DigestHashMaker {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            salt_len: DEFAULT_SALT_LEN,
        }
    }
}

impl HashMaker for DigestHashMaker {
    fn make_hashers(
        &self,
        usernames: &[Key],
    ) -> HashMap<Key, Hasher> {
        usernames
            .iter()
            .map(|name| (name.clone(), Hasher::generate(self.algorithm, self.salt_len)))
            .collect()
    }
}

/// Hashers for `usernames` using `algorithm` and the default salt length.
pub fn digest_hasher(
    usernames: &[Key],
    algorithm: HashAlgorithm,
) -> HashMap<Key, Hasher> {
    DigestHashMaker {
        algorithm,
        salt_len: DEFAULT_SALT_LEN,
    }
    .make_hashers(usernames)
}

/// SHA-256 hashers for `usernames`.
pub fn sha256_hasher(usernames: &[Key]) -> HashMap<Key, Hasher> {
    digest_hasher(usernames, HashAlgorithm::Sha256)
}
