//! Converter commands
//!
//! Thin wrappers that route widget requests to the collaborators held by
//! [`AppState`].

use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::app::AppState;
use crate::core::features::currency::{self, CurrencyWidget, RateProvider};
use crate::core::features::time_converter::{self, LocaleTimeProvider};
use crate::core::features::unit_converter::{self, UnitCategory};
use crate::core::theme::FlagStore;
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{
    ConvertCurrencyRequest, ConvertCurrencyResponse, ConvertTimeRequest, ConvertTimeResponse,
    ConvertUnitsRequest, ConvertUnitsResponse, CurrencyListResponse, GetUnitsResponse, TimezoneInfo,
    WidgetDisplay,
};

pub fn convert_units(request: ConvertUnitsRequest) -> AppResult<ConvertUnitsResponse> {
    unit_converter::convert_units_command(request)
}

pub fn get_units(category: Option<&str>) -> AppResult<GetUnitsResponse> {
    unit_converter::get_units_command(category)
}

/// What the unit widget shows for this selection. Only an unknown
/// category is an error; everything else lands in the display.
pub fn unit_display<R, S, T>(
    state: &AppState<R, S, T>,
    category: &str,
    from_unit: &str,
    to_unit: &str,
    amount: f64,
) -> AppResult<WidgetDisplay>
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    let mut widget = state.unit_widget();
    widget.select_category(UnitCategory::parse(category)?);
    widget.set_units(from_unit, to_unit);
    widget.amount = amount;
    Ok(widget.display())
}

/// What the currency widget shows after one refresh.
pub async fn currency_display<R, S, T>(
    state: &AppState<R, S, T>,
    from: &str,
    to: &str,
    amount: &str,
) -> AppResult<WidgetDisplay>
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    let amount = Decimal::from_str(amount.trim())
        .map_err(|e| AppError::Validation(format!("Invalid amount '{}': {}", amount, e)))?;

    let mut widget = state.currency_widget();
    widget.from = from.trim().to_ascii_uppercase();
    widget.to = to.trim().to_ascii_uppercase();
    widget.amount = amount;
    widget.refresh(state.currency()).await;
    Ok(widget.display().clone())
}

/// Currency widget with its code list loaded from the configured base.
pub async fn currency_options<R, S, T>(state: &AppState<R, S, T>) -> CurrencyWidget
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    let mut widget = state.currency_widget();
    widget.load_codes(state.currency(), &state.settings().rates.list_base).await;
    widget
}

pub async fn convert_currency<R, S, T>(
    state: &AppState<R, S, T>,
    request: ConvertCurrencyRequest,
) -> AppResult<ConvertCurrencyResponse>
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    currency::convert_currency_command(state.currency(), request).await
}

/// Codes quoted against the configured list base.
pub async fn list_currencies<R, S, T>(state: &AppState<R, S, T>) -> AppResult<CurrencyListResponse>
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    let base = state.settings().rates.list_base.clone();
    currency::list_currencies_command(state.currency(), &base).await
}

pub fn convert_time<R, S, T>(state: &AppState<R, S, T>, request: ConvertTimeRequest) -> AppResult<ConvertTimeResponse>
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    time_converter::convert_time_command(state.clock(), request, Utc::now())
}

pub fn get_timezones<R, S, T>(state: &AppState<R, S, T>, filter: Option<&str>) -> AppResult<Vec<TimezoneInfo>>
where
    R: RateProvider,
    S: FlagStore,
    T: LocaleTimeProvider,
{
    time_converter::get_timezones_command(state.clock(), filter, Utc::now())
}
