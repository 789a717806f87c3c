use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ConvertCurrencyResponse, WidgetDisplay};

use super::RateProvider;

const ERR_FETCH_OPTIONS: &str = "Error fetching currency options.";
const ERR_FETCH_RATE: &str = "Error fetching conversion rate.";
const ERR_INVALID_CONVERSION: &str = "Invalid currency conversion.";

/// Result of a sequenced conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrencyOutcome {
    Converted(ConvertCurrencyResponse),
    /// A newer request was issued while this one was in flight
    Superseded,
}

/// Converts through a [`RateProvider`], numbering each widget request so a
/// slow response can never overwrite a newer one.
pub struct CurrencyService<P> {
    provider: P,
    latest_ticket: AtomicU64,
}

impl<P: RateProvider> CurrencyService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            latest_ticket: AtomicU64::new(0),
        }
    }

    /// Codes available for `base`, sorted.
    pub async fn list_currencies(&self, base: &str) -> AppResult<Vec<String>> {
        let base = normalize_code(base)?;
        let rates = self.provider.fetch_rates(&base).await?;
        let mut codes: Vec<String> = rates.into_keys().collect();
        codes.sort();
        tracing::debug!("[Currency] {} codes available", codes.len());
        Ok(codes)
    }

    /// `amount * rate[to]` with rates fetched for base `from`.
    pub async fn convert(&self, amount: Decimal, from: &str, to: &str) -> AppResult<ConvertCurrencyResponse> {
        let from = normalize_code(from)?;
        let to = normalize_code(to)?;

        let rates = self.provider.fetch_rates(&from).await?;
        let rate = rates
            .get(&to)
            .copied()
            .filter(|r| r.is_sign_positive() && !r.is_zero())
            .ok_or_else(|| AppError::InvalidRate(format!("No usable rate for {} -> {}", from, to)))?;

        let result = amount
            .checked_mul(rate)
            .ok_or_else(|| AppError::InvalidRate("Multiplication overflow".into()))?;

        tracing::debug!("[Currency] {} {} -> {} {} (rate={})", amount, from, result, to, rate);

        Ok(ConvertCurrencyResponse {
            result: format!("{:.2}", result),
            rate: rate.normalize().to_string(),
            from,
            to,
        })
    }

    /// Like [`convert`](Self::convert), but reports `Superseded` when
    /// another sequenced call started before this one finished.
    pub async fn convert_latest(&self, amount: Decimal, from: &str, to: &str) -> AppResult<CurrencyOutcome> {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.convert(amount, from, to).await;

        let latest = self.latest_ticket.load(Ordering::SeqCst);
        if latest != ticket {
            tracing::warn!("[Currency] Discarding stale response (ticket {} < {})", ticket, latest);
            return Ok(CurrencyOutcome::Superseded);
        }

        result.map(CurrencyOutcome::Converted)
    }
}

fn normalize_code(code: &str) -> AppResult<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(AppError::Validation(format!("Currency not supported: {}", code)))
    }
}

// ============================================================================
// Widget State
// ============================================================================

#[derive(Debug, Clone)]
pub struct CurrencyWidget {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    codes: Vec<String>,
    display: WidgetDisplay,
}

impl CurrencyWidget {
    pub fn new(from: &str, to: &str, amount: Decimal) -> Self {
        Self {
            from: from.to_ascii_uppercase(),
            to: to.to_ascii_uppercase(),
            amount,
            codes: Vec::new(),
            display: WidgetDisplay::Empty,
        }
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn display(&self) -> &WidgetDisplay {
        &self.display
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    pub async fn load_codes<P: RateProvider>(&mut self, service: &CurrencyService<P>, base: &str) {
        match service.list_currencies(base).await {
            Ok(codes) => self.codes = codes,
            Err(e) => {
                tracing::warn!("[Currency] Failed to load currency list: {}", e);
                self.display = WidgetDisplay::Error(ERR_FETCH_OPTIONS.to_string());
            }
        }
    }

    /// Recompute the display. Non-positive amounts clear it without fetching.
    pub async fn refresh<P: RateProvider>(&mut self, service: &CurrencyService<P>) {
        if self.amount <= Decimal::ZERO {
            self.display = WidgetDisplay::Empty;
            return;
        }
        let outcome = service.convert_latest(self.amount, &self.from, &self.to).await;
        self.apply(outcome);
    }

    /// Superseded outcomes leave the display untouched.
    pub fn apply(&mut self, outcome: AppResult<CurrencyOutcome>) {
        match outcome {
            Ok(CurrencyOutcome::Converted(response)) => {
                self.display = WidgetDisplay::Value(response.result);
            }
            Ok(CurrencyOutcome::Superseded) => {}
            Err(AppError::InvalidRate(msg)) => {
                tracing::warn!("[Currency] {}", msg);
                self.display = WidgetDisplay::Error(ERR_INVALID_CONVERSION.to_string());
            }
            Err(e) => {
                tracing::warn!("[Currency] Conversion failed: {}", e);
                self.display = WidgetDisplay::Error(ERR_FETCH_RATE.to_string());
            }
        }
    }
}
