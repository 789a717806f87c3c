// Time Zone Converter - Logic Layer
//
// Zone data is the IANA database shipped with chrono-tz; the host zone
// comes from iana-time-zone.

use chrono::{DateTime, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};
use chrono_tz::{Tz, TZ_VARIANTS};

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ConvertTimeRequest, ConvertTimeResponse, TimezoneInfo};
use super::FeatureSync;

/// Local-time capabilities the time widget needs from the host.
pub trait LocaleTimeProvider: Send + Sync {
    fn supported_zones(&self) -> Vec<String>;

    /// IANA id of the machine's zone
    fn host_zone(&self) -> String;

    /// `hh:mm AM/PM` wall-clock time in `zone` at `instant`
    fn format_time(&self, zone: &str, instant: DateTime<Utc>) -> AppResult<String>;

    fn abbreviation(&self, zone: &str, instant: DateTime<Utc>) -> AppResult<String>;

    fn utc_offset_seconds(&self, zone: &str, instant: DateTime<Utc>) -> AppResult<i32>;
}

#[derive(Debug, Clone, Default)]
pub struct ChronoTzProvider;

fn parse_zone(zone: &str) -> AppResult<Tz> {
    zone.trim()
        .parse::<Tz>()
        .map_err(|_| AppError::Timezone(format!("Unknown timezone: {}", zone)))
}

impl LocaleTimeProvider for ChronoTzProvider {
    fn supported_zones(&self) -> Vec<String> {
        TZ_VARIANTS.iter().map(|tz| tz.name().to_string()).collect()
    }

    fn host_zone(&self) -> String {
        match iana_time_zone::get_timezone() {
            Ok(tz) if tz.parse::<Tz>().is_ok() => tz,
            Ok(tz) => {
                tracing::warn!("[TimeConverter] Host zone '{}' not in tz database, using UTC", tz);
                "UTC".to_string()
            }
            Err(e) => {
                tracing::warn!("[TimeConverter] Failed to detect system timezone: {:?}", e);
                "UTC".to_string()
            }
        }
    }

    fn format_time(&self, zone: &str, instant: DateTime<Utc>) -> AppResult<String> {
        let tz = parse_zone(zone)?;
        Ok(instant.with_timezone(&tz).format("%I:%M %p").to_string())
    }

    fn abbreviation(&self, zone: &str, instant: DateTime<Utc>) -> AppResult<String> {
        let tz = parse_zone(zone)?;
        Ok(instant.with_timezone(&tz).format("%Z").to_string())
    }

    fn utc_offset_seconds(&self, zone: &str, instant: DateTime<Utc>) -> AppResult<i32> {
        let tz = parse_zone(zone)?;
        Ok(instant.with_timezone(&tz).offset().fix().local_minus_utc())
    }
}

fn format_utc_offset(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let abs = offset_seconds.abs();
    format!("UTC{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

/// Resolve the widget's optional date input to an instant.
///
/// Accepts RFC 3339, the `YYYY-MM-DDTHH:MM` shape of a datetime-local
/// field, or natural language ("tomorrow 3pm"). Inputs without an offset
/// are read as wall-clock time in `host_zone`.
pub fn parse_instant(input: Option<&str>, host_zone: &str, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let text = match input.map(str::trim) {
        None | Some("") => return Ok(now),
        Some(t) => t,
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    let tz = parse_zone(host_zone)?;

    let naive = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok());

    if let Some(naive) = naive {
        return tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| AppError::Timezone(format!("{} does not exist in {}", naive, host_zone)));
    }

    // Relative phrases are resolved against the host zone's clock
    parse_date_string(text, now.with_timezone(&tz), Dialect::Us)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Validation(format!("Failed to parse time input '{}': {}", text, e)))
}

/// Absolute difference between the zones' UTC offsets, in hours.
pub fn time_difference_hours<P: LocaleTimeProvider + ?Sized>(
    provider: &P,
    left: &str,
    right: &str,
    instant: DateTime<Utc>,
) -> AppResult<f64> {
    let left_offset = provider.utc_offset_seconds(left, instant)?;
    let right_offset = provider.utc_offset_seconds(right, instant)?;
    Ok(f64::from((left_offset - right_offset).abs()) / 3600.0)
}

// ============================================================================
// Widget State
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TimeWidget {
    pub left_zone: String,
    pub right_zone: String,
    pub instant: Option<String>,
}

impl TimeWidget {
    /// Both sides start on the host zone.
    pub fn new<P: LocaleTimeProvider + ?Sized>(provider: &P) -> Self {
        let host = provider.host_zone();
        Self {
            left_zone: host.clone(),
            right_zone: host,
            instant: None,
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.left_zone, &mut self.right_zone);
    }

    pub fn snapshot<P: LocaleTimeProvider + ?Sized>(
        &self,
        provider: &P,
        now: DateTime<Utc>,
    ) -> AppResult<ConvertTimeResponse> {
        let host = provider.host_zone();
        let instant = parse_instant(self.instant.as_deref(), &host, now)?;

        Ok(ConvertTimeResponse {
            left_time: provider.format_time(&self.left_zone, instant)?,
            right_time: provider.format_time(&self.right_zone, instant)?,
            left_abbr: provider.abbreviation(&self.left_zone, instant)?,
            right_abbr: provider.abbreviation(&self.right_zone, instant)?,
            difference_hours: time_difference_hours(provider, &self.left_zone, &self.right_zone, instant)?,
            left_zone: self.left_zone.clone(),
            right_zone: self.right_zone.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TimeConverterFeature;

impl FeatureSync for TimeConverterFeature {
    fn id(&self) -> &'static str {
        "time_converter"
    }

    fn title(&self) -> &'static str {
        "Time Zone Converter"
    }

    fn description(&self) -> &'static str {
        "Compare the time in two zones"
    }
}

// ============================================================================
// Commands
// ============================================================================

pub fn convert_time_command<P: LocaleTimeProvider + ?Sized>(
    provider: &P,
    request: ConvertTimeRequest,
    now: DateTime<Utc>,
) -> AppResult<ConvertTimeResponse> {
    let mut widget = TimeWidget::new(provider);
    if let Some(left) = request.left_zone {
        widget.left_zone = left;
    }
    if let Some(right) = request.right_zone {
        widget.right_zone = right;
    }
    widget.instant = request.instant;
    widget.snapshot(provider, now)
}

/// Zones whose id contains `filter` (case-insensitive), with their current
/// abbreviation and offset.
pub fn get_timezones_command<P: LocaleTimeProvider + ?Sized>(
    provider: &P,
    filter: Option<&str>,
    now: DateTime<Utc>,
) -> AppResult<Vec<TimezoneInfo>> {
    let filter = filter.map(str::to_lowercase);
    provider
        .supported_zones()
        .into_iter()
        .filter(|id| filter.as_ref().map_or(true, |f| id.to_lowercase().contains(f)))
        .map(|iana_id| {
            Ok(TimezoneInfo {
                abbreviation: provider.abbreviation(&iana_id, now)?,
                utc_offset: format_utc_offset(provider.utc_offset_seconds(&iana_id, now)?),
                iana_id,
            })
        })
        .collect()
}
