//! Canonical client identifier.

use crate::{UuidError, UuidResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// A customer's client identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed the contained UUID is guaranteed to render in canonical form, so it is
/// safe to use directly as a directory name.
///
/// # Construction
/// - [`ClientId::new`] generates a fresh random identifier.
/// - [`ClientId::parse`] validates an externally supplied identifier (URL path, CLI argument).
///
/// # Errors
/// [`ClientId::parse`] returns [`UuidError::InvalidInput`] if the input is not already
/// canonical. Hyphenated and uppercase forms are rejected rather than normalised, so a record
/// can only ever be addressed by one spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(Uuid);

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientId {
    /// Generates a new random identifier (RFC 4122 version 4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not 32 lowercase hex characters.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "client id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid client id '{}': {}", input, e)))
    }

    /// Returns the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic: exactly 32 bytes of `0-9` / `a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` where `s1`/`s2` are the first two pairs of hex
    /// characters of this identifier.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for ClientId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ClientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ClientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ClientId::parse(&s).map_err(serde::de::Error::custom)
    }
}
