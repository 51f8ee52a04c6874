use crate::error::CardexError;
use cardex_schema::{CardPayload, GraphicsCard, parse_calendar_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The shared create/edit form, one string per input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardForm {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub memory_gb: String,
    pub memory_type: String,
    pub core_clock_mhz: String,
    pub boost_clock_mhz: String,
    pub price_usd: String,
    /// Always `YYYY-MM-DD` or empty.
    pub release_date: String,
}

impl CardForm {
    pub const FIELDS: [&'static str; 9] = [
        "name",
        "manufacturer",
        "model",
        "memory_gb",
        "memory_type",
        "core_clock_mhz",
        "boost_clock_mhz",
        "price_usd",
        "release_date",
    ];

    /// Prefills the form for editing `card`.
    pub fn from_card(card: &GraphicsCard) -> Self {
        Self {
            name: card.name.clone(),
            manufacturer: card.manufacturer.clone(),
            model: card.model.clone(),
            memory_gb: card.memory_gb.to_string(),
            memory_type: card.memory_type.clone(),
            core_clock_mhz: card.core_clock_mhz.to_string(),
            boost_clock_mhz: card
                .boost_clock_mhz
                .map(|v| v.to_string())
                .unwrap_or_default(),
            price_usd: card.price_usd.map(|v| v.to_string()).unwrap_or_default(),
            release_date: card
                .release_date
                .map(format_input_date)
                .unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), CardexError> {
        let value = value.into();
        let slot = match field.trim().replace('-', "_").as_str() {
            "name" => &mut self.name,
            "manufacturer" => &mut self.manufacturer,
            "model" => &mut self.model,
            "memory_gb" => &mut self.memory_gb,
            "memory_type" => &mut self.memory_type,
            "core_clock_mhz" => &mut self.core_clock_mhz,
            "boost_clock_mhz" => &mut self.boost_clock_mhz,
            "price_usd" => &mut self.price_usd,
            "release_date" => {
                self.release_date = normalize_input_date(&value);
                return Ok(());
            }
            other => {
                return Err(CardexError::Validation(format!(
                    "unknown form field `{other}`"
                )));
            }
        };
        *slot = value;
        Ok(())
    }

    /// Coerces the inputs into a request body.
    ///
    /// Text fields go out as typed; the backend enforces presence. Memory and
    /// clock fields must be whole numbers, price a decimal, and blank optional
    /// inputs are left out of the payload.
    pub fn to_payload(&self) -> Result<CardPayload, CardexError> {
        Ok(CardPayload {
            name: self.name.clone(),
            manufacturer: self.manufacturer.clone(),
            model: self.model.clone(),
            memory_gb: parse_whole("memory_gb", &self.memory_gb)?,
            memory_type: self.memory_type.clone(),
            core_clock_mhz: parse_whole("core_clock_mhz", &self.core_clock_mhz)?,
            boost_clock_mhz: optional(&self.boost_clock_mhz)
                .map(|raw| parse_whole("boost_clock_mhz", raw))
                .transpose()?,
            price_usd: optional(&self.price_usd)
                .map(|raw| parse_decimal("price_usd", raw))
                .transpose()?,
            release_date: optional(&self.release_date)
                .map(|raw| {
                    parse_calendar_date(raw).ok_or_else(|| {
                        CardexError::Validation(format!("release_date `{raw}` is not a date"))
                    })
                })
                .transpose()?,
        })
    }
}

pub fn format_input_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Date inputs hold calendar dates only; anything unparseable is kept verbatim
/// so the submit reports it.
fn normalize_input_date(raw: &str) -> String {
    parse_calendar_date(raw).map_or_else(|| raw.trim().to_string(), format_input_date)
}

fn optional(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    (!raw.is_empty()).then_some(raw)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_whole(field: &str, raw: &str) -> Result<u32, CardexError> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u32>() {
        return Ok(value);
    }
    // Number inputs may hand back "24.0".
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) => {
            Ok(value.trunc() as u32)
        }
        _ => Err(CardexError::Validation(format!(
            "{field} must be a whole number, got `{raw}`"
        ))),
    }
}

fn parse_decimal(field: &str, raw: &str) -> Result<f64, CardexError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CardexError::Validation(format!("{field} must be a number, got `{raw}`")))
}
