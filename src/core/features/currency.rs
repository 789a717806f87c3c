//! Currency converter feature
//!
//! Rates come from an exchangerate-api style endpoint: `GET {base_url}/{CODE}`
//! returning `{"rates": {"EUR": 0.92, ...}}` relative to `CODE`.

pub mod service;
pub mod types;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::RatesSettings;
use crate::shared::types::{ConvertCurrencyRequest, ConvertCurrencyResponse, CurrencyListResponse};
use super::FeatureSync;

pub use service::{CurrencyOutcome, CurrencyService, CurrencyWidget};
use types::Rates;

/// Source of exchange rates. Untrusted, possibly slow, possibly failing.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Map of currency code -> units of that currency per 1 `base`.
    async fn fetch_rates(&self, base: &str) -> AppResult<Rates>;
}

pub struct HttpRateProvider {
    http: Client,
    base_url: String,
}

impl HttpRateProvider {
    pub fn new(settings: &RatesSettings) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("converter-board/currency")
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, base: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(base))
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rates(&self, base: &str) -> AppResult<Rates> {
        let url = self.url_for(base);
        tracing::debug!("[Currency] Fetching rates from {}", url);

        let resp = self.http.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(AppError::Network(format!(
                "Failed to fetch rates: {}",
                resp.status()
            )));
        }

        let body = resp.text().await?;
        types::parse_rates_body(&body)
    }
}

#[derive(Debug, Clone)]
pub struct CurrencyFeature;

impl FeatureSync for CurrencyFeature {
    fn id(&self) -> &'static str {
        "currency_converter"
    }

    fn title(&self) -> &'static str {
        "Currency Converter"
    }

    fn description(&self) -> &'static str {
        "Convert between currencies at live rates"
    }
}

pub fn parse_amount(raw: &str) -> AppResult<Decimal> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|e| AppError::Validation(format!("Invalid amount '{}': {}", raw, e)))?;
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation("Amount must be greater than zero".into()));
    }
    Ok(amount)
}

pub async fn convert_currency_command<P: RateProvider>(
    service: &CurrencyService<P>,
    request: ConvertCurrencyRequest,
) -> AppResult<ConvertCurrencyResponse> {
    let amount = parse_amount(&request.amount)?;
    service.convert(amount, &request.from, &request.to).await
}

pub async fn list_currencies_command<P: RateProvider>(
    service: &CurrencyService<P>,
    base: &str,
) -> AppResult<CurrencyListResponse> {
    let codes = service.list_currencies(base).await?;
    Ok(CurrencyListResponse { codes })
}
