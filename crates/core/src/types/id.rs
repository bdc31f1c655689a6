//! User identifier type.
//!
//! Identifiers are assigned by the document store when a user is created.
//! They are 12 bytes wide (the `MongoDB` `ObjectId` layout) and travel over
//! HTTP as 24 hex characters.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Errors that can occur when parsing a [`UserId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    /// The input does not have exactly 24 characters.
    #[error("user id must be {expected} hex characters (got {len})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length of the input.
        len: usize,
    },
    /// The input contains characters outside `[0-9a-fA-F]`.
    #[error("user id must be hex encoded")]
    InvalidHex,
}

/// A server-assigned user identifier.
///
/// ## Examples
///
/// ```
/// use user_service_core::UserId;
///
/// let id = UserId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
/// assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
///
/// assert!(UserId::parse("not-a-hex-id").is_err());
/// assert!(UserId::parse("65a1f0c2").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId([u8; Self::BYTE_LENGTH]);

impl UserId {
    /// Number of raw bytes in an identifier.
    pub const BYTE_LENGTH: usize = 12;

    /// Number of characters in the hex encoding.
    pub const HEX_LENGTH: usize = Self::BYTE_LENGTH * 2;

    /// Parse a `UserId` from its hex encoding.
    ///
    /// Both lowercase and uppercase hex digits are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 hex characters.
    pub fn parse(s: &str) -> Result<Self, UserIdError> {
        if s.len() != Self::HEX_LENGTH {
            return Err(UserIdError::WrongLength {
                expected: Self::HEX_LENGTH,
                len: s.len(),
            });
        }

        let mut bytes = [0u8; Self::BYTE_LENGTH];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| UserIdError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Create an ID from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; Self::BYTE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; Self::BYTE_LENGTH] {
        self.0
    }

    /// Returns the lowercase hex encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.to_hex())
    }
}

impl std::str::FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

// BSON support (with mongodb feature)
#[cfg(feature = "mongodb")]
impl From<bson::oid::ObjectId> for UserId {
    fn from(oid: bson::oid::ObjectId) -> Self {
        Self(oid.bytes())
    }
}

#[cfg(feature = "mongodb")]
impl From<UserId> for bson::oid::ObjectId {
    fn from(id: UserId) -> Self {
        Self::from_bytes(id.0)
    }
}
