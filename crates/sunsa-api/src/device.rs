//! Device records

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a blind device (`idDevice`)
///
/// The API sends numeric ids, but string ids are accepted as well. Comparison
/// is strict: `Number(2)` is not equal to `Text("2")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for DeviceId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<i32> for DeviceId {
    fn from(id: i32) -> Self {
        Self::Number(i64::from(id))
    }
}

impl From<u32> for DeviceId {
    fn from(id: u32) -> Self {
        Self::Number(i64::from(id))
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl FromStr for DeviceId {
    type Err = Infallible;

    /// Integers become `Number`, anything else stays `Text`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_string()), Self::Number))
    }
}

/// Blind position
///
/// Nominally a multiple of 10 between -100 and 100, where 0 is open and the
/// two extremes are closed in opposite directions. The value is never checked
/// locally; the server rejects what it does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(pub i32);

impl Position {
    /// Fully open
    pub const OPEN: Self = Self(0);
    /// Closed in the negative direction
    pub const MIN: Self = Self(-100);
    /// Closed in the positive direction
    pub const MAX: Self = Self(100);
    /// Increment the devices move in
    pub const STEP: i32 = 10;

    /// Raw value
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Whether the value is one the devices document as valid
    #[must_use]
    pub const fn is_nominal(self) -> bool {
        self.0 >= Self::MIN.0 && self.0 <= Self::MAX.0 && self.0 % Self::STEP == 0
    }
}

impl From<i32> for Position {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A device as returned by the API
///
/// The record is kept exactly as the server sent it, so it serializes back
/// unchanged and unexpected field shapes never fail a listing. Typed views of
/// the well-known fields are parsed on access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Device(Map<String, Value>);

impl Device {
    /// Wire name of the id field
    pub const ID_FIELD: &'static str = "idDevice";
    /// Wire name of the position field
    pub const POSITION_FIELD: &'static str = "position";

    /// The device id, if present as an integer or a string
    #[must_use]
    pub fn id(&self) -> Option<DeviceId> {
        match self.field(Self::ID_FIELD)? {
            Value::Number(n) => n.as_i64().map(DeviceId::Number),
            Value::String(s) => Some(DeviceId::Text(s.clone())),
            _ => None,
        }
    }

    /// Whether the record's id equals `id`
    #[must_use]
    pub fn has_id(&self, id: &DeviceId) -> bool {
        self.id().as_ref() == Some(id)
    }

    /// The current position, if present as an integer that fits
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.field(Self::POSITION_FIELD)
            .and_then(Value::as_i64)
            .and_then(|p| i32::try_from(p).ok())
            .map(Position)
    }

    /// Look up an untyped field by its wire name
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Human-readable name if the server sent one
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.field("name").and_then(Value::as_str)
    }

    /// The raw record
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Device {
    fn from(record: Map<String, Value>) -> Self {
        Self(record)
    }
}
