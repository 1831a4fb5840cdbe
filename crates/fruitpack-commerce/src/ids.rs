//! Newtype IDs for type-safe identifiers.
//!
//! The backend issues some identifiers as JSON strings and others as
//! integers. Every id type accepts both, compares by its textual form, and
//! serializes back in the shape it arrived in so payloads echo the backend.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Raw wire form of an identifier.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    UInt(u64),
    Text(String),
}

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A backend-issued identifier.
        #[derive(Debug, Clone)]
        pub struct $name {
            value: String,
            numeric: bool,
        }

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self {
                    value: id.into(),
                    numeric: false,
                }
            }

            /// Create an ID the backend issued as an integer.
            pub fn numeric(id: u64) -> Self {
                Self {
                    value: id.to_string(),
                    numeric: true,
                }
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.value
            }

            /// Whether the backend issued this id as an integer.
            pub fn is_numeric(&self) -> bool {
                self.numeric
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.value
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.value == other.value
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.value.hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.value.cmp(&other.value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.value)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self::numeric(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.value
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serialize_id(&self.value, self.numeric, serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let (value, numeric) = deserialize_id(deserializer)?;
                Ok(Self { value, numeric })
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(OrderId);
define_id!(OrderItemId);
define_id!(DriverId);
define_id!(ClaimId);
define_id!(UserId);

fn serialize_id<S: Serializer>(value: &str, numeric: bool, serializer: S) -> Result<S::Ok, S::Error> {
    if numeric {
        if let Ok(n) = value.parse::<i64>() {
            return serializer.serialize_i64(n);
        }
        if let Ok(n) = value.parse::<u64>() {
            return serializer.serialize_u64(n);
        }
    }
    serializer.serialize_str(value)
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<(String, bool), D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => (n.to_string(), true),
        RawId::UInt(n) => (n.to_string(), true),
        RawId::Text(s) => (s, false),
    })
}
