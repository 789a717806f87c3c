use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::shared::error::{AppError, AppResult};

/// Network payload from the exchangerate-api endpoint. Only `rates` matters.
#[derive(Debug, Deserialize)]
pub struct RatesApiResponse {
    pub base: Option<String>,
    pub date: Option<String>,
    #[serde(deserialize_with = "deserialize_rates")]
    pub rates: HashMap<String, Decimal>,
}

pub type Rates = HashMap<String, Decimal>;

/// Malformed bodies are fetch failures, same as a bad status.
pub fn parse_rates_body(body: &str) -> AppResult<Rates> {
    let parsed: RatesApiResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Network(format!("Malformed rates response: {}", e)))?;
    tracing::debug!(
        base = parsed.base.as_deref().unwrap_or("?"),
        date = parsed.date.as_deref().unwrap_or("?"),
        "Parsed {} rates",
        parsed.rates.len()
    );
    Ok(parsed.rates)
}

fn deserialize_rates<'de, D>(deserializer: D) -> Result<HashMap<String, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(code, value)| {
            let dec = match value {
                Value::Number(num) => num
                    .as_f64()
                    .and_then(|f| Decimal::try_from(f).ok())
                    .ok_or_else(|| serde::de::Error::custom("invalid numeric rate"))?,
                Value::String(s) => Decimal::from_str_exact(&s)
                    .map_err(|e| serde::de::Error::custom(format!("invalid rate string: {}", e)))?,
                _ => return Err(serde::de::Error::custom("unsupported rate type")),
            };
            Ok((code.to_uppercase(), dec))
        })
        .collect()
}
