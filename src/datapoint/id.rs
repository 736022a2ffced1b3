//! # Datapoint Identifiers
//!
//! 12-byte identifiers rendered as 24 hex characters.
//!
//! Layout:
//! - bytes 0..4: seconds since the Unix epoch (big-endian)
//! - bytes 4..9: random value fixed for the lifetime of the process
//! - bytes 9..12: incrementing counter, randomly seeded

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const ID_LEN: usize = 12;

/// Counter wraps at 24 bits
const COUNTER_MASK: u32 = 0x00ff_ffff;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// Unique, immutable datapoint identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatapointId([u8; ID_LEN]);

/// Raised when a string is not 24 hex characters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid datapoint id: {0:?}")]
pub struct InvalidId(pub String);

impl DatapointId {
    /// Issue a fresh identifier
    pub fn generate() -> Self {
        // Truncation to 32 bits is intended; the field wraps in 2106.
        let secs = Utc::now().timestamp() as u32;
        let unique = PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK))
            .fetch_add(1, Ordering::Relaxed)
            & COUNTER_MASK;

        let mut bytes = [0u8; ID_LEN];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(unique);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    /// Parse from the 24-character hex form (either case)
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| InvalidId(s.to_string()))?;
        Ok(Self(bytes))
    }

    /// Whether `s` has the shape of an identifier
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }
}

impl fmt::Display for DatapointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for DatapointId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DatapointId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DatapointId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: Vec<DatapointId> = (0..1000).map(|_| DatapointId::generate()).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_display_is_24_lowercase_hex() {
        let id = DatapointId::generate();
        let s = id.to_string();
        assert_eq!(s.len(), 24);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(DatapointId::parse(&s).unwrap(), id);
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let id = DatapointId::parse("5F8D0D55B54764421B7156C3").unwrap();
        assert_eq!(id.to_string(), "5f8d0d55b54764421b7156c3");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DatapointId::parse("").is_err());
        assert!(DatapointId::parse("5f8d0d55b54764421b7156c").is_err());
        assert!(DatapointId::parse("5f8d0d55b54764421b7156c3a").is_err());
        assert!(DatapointId::parse("zf8d0d55b54764421b7156c3").is_err());
        assert!(!DatapointId::is_valid("not-an-id"));
    }

    #[test]
    fn test_timestamp_component() {
        let before = Utc::now().timestamp() as u32;
        let id = DatapointId::generate();
        let after = Utc::now().timestamp() as u32;
        let secs = u32::from_str_radix(&id.to_string()[..8], 16).unwrap();
        assert!(secs >= before && secs <= after);
    }

    #[test]
    fn test_serde_as_string() {
        let id = DatapointId::parse("5f8d0d55b54764421b7156c3").unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!("5f8d0d55b54764421b7156c3"));
        let back: DatapointId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }
}
