//! Identifiers used throughout cardmatch.
//!
//! Inventory-facing ids are opaque strings handed to us by the host page.
//! Only [`TradeAttemptId`] is minted locally (UUIDv7, time-ordered).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Party
// ---------------------------------------------------------------------------

/// One side of a two-party trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Party {
    /// The local user.
    You,
    /// The counterparty.
    Them,
}

impl Party {
    /// Both parties in processing order.
    pub const BOTH: [Party; 2] = [Party::You, Party::Them];
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::You => write!(f, "YOU"),
            Self::Them => write!(f, "THEM"),
        }
    }
}

// ---------------------------------------------------------------------------
// String ids
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Card-type identifier: the coarse key a request names.
    ClassId
);

string_id!(
    /// Unique id of one physical inventory item.
    InstanceId
);

string_id!(
    /// Fine-grained item classification, the unit of 1:1 balance.
    TypeTag
);

impl InstanceId {
    /// Numeric value of the id, if it is a plain unsigned integer.
    ///
    /// Steam asset ids are decimal strings well inside `u64`.
    #[must_use]
    pub fn numeric(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

// ---------------------------------------------------------------------------
// TradeAttemptId
// ---------------------------------------------------------------------------

/// Correlates the log lines of a single trade attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TradeAttemptId(pub Uuid);

impl TradeAttemptId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for TradeAttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeAttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attempt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_display() {
        assert_eq!(format!("{}", Party::You), "YOU");
        assert_eq!(format!("{}", Party::Them), "THEM");
    }

    #[test]
    fn instance_id_numeric() {
        assert_eq!(InstanceId::from("21").numeric(), Some(21));
        assert_eq!(InstanceId::from("25436720118").numeric(), Some(25_436_720_118));
        assert_eq!(InstanceId::from("abc").numeric(), None);
        assert_eq!(InstanceId::from("-4").numeric(), None);
    }

    #[test]
    fn string_ids_display_raw() {
        assert_eq!(ClassId::from("667924416").to_string(), "667924416");
        assert_eq!(TypeTag::new("Trading Card").as_str(), "Trading Card");
    }

    #[test]
    fn attempt_id_uniqueness() {
        let a = TradeAttemptId::new();
        let b = TradeAttemptId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn serde_is_transparent() {
        let id = ClassId::from("123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"123\"");
        let back: ClassId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
