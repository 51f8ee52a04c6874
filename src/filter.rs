use crate::error::CardexError;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Filter inputs of one backend tab, held exactly as typed.
///
/// Range fields are not validated here; the backend owns their semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub manufacturer: String,
    pub memory_type: String,
    pub memory_min: String,
    pub memory_max: String,
    pub price_min: String,
    pub price_max: String,
}

impl FilterState {
    pub const KEYS: [&'static str; 7] = [
        "search",
        "manufacturer",
        "memory_type",
        "memory_min",
        "memory_max",
        "price_min",
        "price_max",
    ];

    /// `(key, value)` pairs for every non-empty field, in wire order.
    ///
    /// Only `search` is trimmed (and dropped when blank); the other fields go
    /// out exactly as typed.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        Self::KEYS
            .iter()
            .zip(self.values())
            .filter_map(|(key, value)| {
                let value = if *key == "search" { value.trim() } else { value };
                (!value.is_empty()).then_some((*key, value))
            })
            .collect()
    }

    /// URL-encoded query string without the leading `?`; empty when nothing is set.
    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Sets one field by its query key; `-` is accepted in place of `_`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), CardexError> {
        let slot = match key.trim().replace('-', "_").as_str() {
            "search" => &mut self.search,
            "manufacturer" => &mut self.manufacturer,
            "memory_type" => &mut self.memory_type,
            "memory_min" => &mut self.memory_min,
            "memory_max" => &mut self.memory_max,
            "price_min" => &mut self.price_min,
            "price_max" => &mut self.price_max,
            other => {
                return Err(CardexError::Validation(format!(
                    "unknown filter `{other}`"
                )));
            }
        };
        *slot = value.into();
        Ok(())
    }

    fn values(&self) -> [&str; 7] {
        [
            &self.search,
            &self.manufacturer,
            &self.memory_type,
            &self.memory_min,
            &self.memory_max,
            &self.price_min,
            &self.price_max,
        ]
    }
}
