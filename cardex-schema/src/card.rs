use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::lax::{optional_date, optional_decimal};

/// Store-specific card identity: an auto-increment integer on the relational
/// side, an opaque object id on the document side. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(String);

impl CardId {
    /// Returns `None` for blank ids.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Serialize for CardId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected a string or a number for card id, got {other}"
                )));
            }
        };
        CardId::new(raw).ok_or_else(|| serde::de::Error::custom("card id must not be empty"))
    }
}

/// A catalog record as returned by `GET /api/{backend}/cards`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicsCard {
    #[serde(alias = "_id")]
    pub id: CardId,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub memory_gb: u32,
    pub memory_type: String,
    pub core_clock_mhz: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost_clock_mhz: Option<u32>,
    #[serde(
        default,
        deserialize_with = "optional_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_usd: Option<f64>,
    #[serde(
        default,
        deserialize_with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<NaiveDate>,
}

/// Body of `POST` and `PUT` requests. Absent optionals are omitted, never `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPayload {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub memory_gb: u32,
    pub memory_type: String,
    pub core_clock_mhz: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost_clock_mhz: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
}

impl GraphicsCard {
    pub fn with_payload(id: CardId, payload: CardPayload) -> Self {
        Self {
            id,
            name: payload.name,
            manufacturer: payload.manufacturer,
            model: payload.model,
            memory_gb: payload.memory_gb,
            memory_type: payload.memory_type,
            core_clock_mhz: payload.core_clock_mhz,
            boost_clock_mhz: payload.boost_clock_mhz,
            price_usd: payload.price_usd,
            release_date: payload.release_date,
        }
    }
}
