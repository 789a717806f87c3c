use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertUnitsRequest {
    pub category: String,
    pub amount: f64,
    pub from_unit: String,
    pub to_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertUnitsResponse {
    pub result: f64,
    pub formatted_result: String,
    pub from_unit: String,
    pub to_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUnitsResponse {
    pub units: Vec<UnitDTO>,
}

// Rich Unit Data Transfer Object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDTO {
    pub id: String,       // Stable key (e.g., "meter", "kilogram")
    pub label: String,    // Display name (e.g., "Meter", "Kilogram")
    pub category: String, // Category key (e.g., "length")
}

/// Amount is carried as a string so it parses straight into `Decimal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertCurrencyRequest {
    pub amount: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertCurrencyResponse {
    pub result: String,
    pub rate: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyListResponse {
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertTimeRequest {
    pub left_zone: Option<String>,
    pub right_zone: Option<String>,
    /// `YYYY-MM-DDTHH:MM`, RFC 3339 or natural language; `None` means now.
    pub instant: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertTimeResponse {
    pub left_zone: String,
    pub right_zone: String,
    pub left_time: String,     // e.g., "09:05 PM"
    pub right_time: String,
    pub left_abbr: String,     // e.g., "EDT" (DST-aware)
    pub right_abbr: String,
    pub difference_hours: f64, // absolute, fractional for half-hour zones
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneInfo {
    pub iana_id: String,
    pub abbreviation: String,
    pub utc_offset: String,    // e.g., "UTC+09:00"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: String,
    pub dark: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResponse {
    pub order: Vec<String>,
    pub titles: Vec<String>,
}

/// What a widget shows in its result area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum WidgetDisplay {
    Empty,
    Value(String),
    Error(String),
}

impl WidgetDisplay {
    pub fn is_error(&self) -> bool {
        matches!(self, WidgetDisplay::Error(_))
    }
}
