//! Event row type.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Calldata size above which a transaction counts as calldata-heavy.
pub const HIGH_CALLDATA_THRESHOLD: u32 = 1024;

/// A single time-stamped on-chain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(deserialize_with = "deserialize_event_time")]
    pub event_time: DateTime<Utc>,
    pub entity_id: u64,
    pub chain_id: u64,
    pub block_number: u64,
    /// Empty when null or absent in the input.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub contract_address: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub tx_hash: String,
    /// NaN when null or absent in the input.
    #[serde(default = "missing_float", deserialize_with = "float_or_nan")]
    pub value: f64,
    /// Normalised attribute in `[0, 1]`.
    #[serde(default = "missing_float", deserialize_with = "float_or_nan")]
    pub attribute: f64,
    #[serde(default = "missing_float", deserialize_with = "float_or_nan")]
    pub gas_used: f64,
    pub calldata_size: u32,
}

impl EventRecord {
    /// Whether the calldata size exceeds [`HIGH_CALLDATA_THRESHOLD`].
    pub fn is_high_calldata(&self) -> bool {
        self.calldata_size > HIGH_CALLDATA_THRESHOLD
    }

    /// Numeric feature vector `[value, attribute, gas_used, calldata_size]`.
    pub fn features(&self) -> [f64; 4] {
        [
            self.value,
            self.attribute,
            self.gas_used,
            f64::from(self.calldata_size),
        ]
    }
}

fn missing_float() -> f64 {
    f64::NAN
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn float_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEventTime {
    Text(String),
    EpochSeconds(i64),
}

/// Accepts RFC 3339, naive `YYYY-MM-DD HH:MM:SS[.f]` (read as UTC) or
/// integer epoch seconds.
fn deserialize_event_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match RawEventTime::deserialize(deserializer)? {
        RawEventTime::EpochSeconds(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| D::Error::custom(format!("epoch seconds out of range: {secs}"))),
        RawEventTime::Text(text) => parse_event_time(&text).map_err(D::Error::custom),
    }
}

/// Parse a textual event time.
fn parse_event_time(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("unrecognised event_time: {text}"))
}
