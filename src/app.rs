//! Application state
//!
//! One `AppState` per process owns the settings, the theme flag, the board
//! order and the widget collaborators. Commands borrow it.

use rust_decimal::Decimal;

use crate::core::features::currency::{CurrencyService, CurrencyWidget, HttpRateProvider, RateProvider};
use crate::core::features::default_board_order;
use crate::core::features::time_converter::{ChronoTzProvider, LocaleTimeProvider, TimeWidget};
use crate::core::features::unit_converter::{UnitCategory, UnitWidget};
use crate::core::layout::OrderedList;
use crate::core::theme::{FlagStore, JsonFileStore, ThemeFlag};
use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;

pub struct AppState<R = HttpRateProvider, S = JsonFileStore, T = ChronoTzProvider> {
    settings: AppSettings,
    theme: ThemeFlag<S>,
    board: OrderedList<String>,
    currency: CurrencyService<R>,
    clock: T,
}

impl AppState {
    /// Production wiring: HTTP rates, JSON flag file, chrono-tz clock.
    pub async fn init(settings: AppSettings) -> AppResult<Self> {
        let rates = HttpRateProvider::new(&settings.rates)?;
        let store = JsonFileStore::new(settings.flag_store_path()?);
        Self::with_parts(settings, rates, store, ChronoTzProvider).await
    }
}

impl<R: RateProvider, S: FlagStore, T: LocaleTimeProvider> AppState<R, S, T> {
    pub async fn with_parts(settings: AppSettings, rates: R, store: S, clock: T) -> AppResult<Self> {
        let theme = ThemeFlag::load(store).await;
        let board = OrderedList::new(default_board_order())?;

        tracing::debug!(
            theme = theme.theme().as_str(),
            board = ?board.items(),
            "[AppState] Initialized"
        );

        Ok(Self {
            settings,
            theme,
            board,
            currency: CurrencyService::new(rates),
            clock,
        })
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn theme(&self) -> &ThemeFlag<S> {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeFlag<S> {
        &mut self.theme
    }

    pub fn board(&self) -> &OrderedList<String> {
        &self.board
    }

    pub fn currency(&self) -> &CurrencyService<R> {
        &self.currency
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Unit widget seeded from the user's preferences. An unknown
    /// preferred category falls back to length.
    pub fn unit_widget(&self) -> UnitWidget {
        let prefs = &self.settings.preferences;
        let category = UnitCategory::parse(&prefs.default_category).unwrap_or_else(|e| {
            tracing::warn!("[AppState] {}, using length", e);
            UnitCategory::Length
        });
        UnitWidget::new(category, prefs.default_amount)
    }

    pub fn currency_widget(&self) -> CurrencyWidget {
        let prefs = &self.settings.preferences;
        let amount = Decimal::try_from(prefs.default_amount).unwrap_or(Decimal::ONE);
        CurrencyWidget::new(&prefs.default_currency_from, &prefs.default_currency_to, amount)
    }

    pub fn time_widget(&self) -> TimeWidget {
        TimeWidget::new(&self.clock)
    }

    /// Drag-and-drop end: `active` was dropped onto `over`. A drop outside
    /// any slot (`None`) or onto itself changes nothing.
    pub fn handle_drop(&mut self, active: &str, over: Option<&str>) -> &[String] {
        match over {
            Some(over) if over != active => {
                let before = self.board.items().to_vec();
                let after = self.board.swap(&active.to_string(), &over.to_string());
                if after != before.as_slice() {
                    tracing::info!("[Board] Swapped {} <-> {}", active, over);
                }
                after
            }
            _ => self.board.items(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::currency::types::Rates;
    use crate::core::theme::MemoryStore;
    use crate::shared::error::AppError;
    use async_trait::async_trait;

    struct NoRates;

    #[async_trait]
    impl RateProvider for NoRates {
        async fn fetch_rates(&self, _base: &str) -> AppResult<Rates> {
            Err(AppError::Network("offline".into()))
        }
    }

    async fn state() -> AppState<NoRates, MemoryStore, ChronoTzProvider> {
        AppState::with_parts(AppSettings::default(), NoRates, MemoryStore::new(), ChronoTzProvider)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initial_board_order() {
        let state = state().await;
        assert_eq!(
            state.board().items(),
            ["time_converter", "currency_converter", "unit_converter"]
        );
        assert!(!state.theme().is_dark());
    }

    #[tokio::test]
    async fn test_handle_drop_transposes() {
        let mut state = state().await;
        let order = state.handle_drop("time_converter", Some("unit_converter")).to_vec();
        assert_eq!(order, ["unit_converter", "currency_converter", "time_converter"]);
    }

    #[tokio::test]
    async fn test_handle_drop_noops() {
        let mut state = state().await;
        let original = state.board().items().to_vec();

        assert_eq!(state.handle_drop("currency_converter", None), original.as_slice());
        assert_eq!(
            state.handle_drop("currency_converter", Some("currency_converter")),
            original.as_slice()
        );
        assert_eq!(state.handle_drop("currency_converter", Some("nope")), original.as_slice());
    }

    #[tokio::test]
    async fn test_widgets_follow_preferences() {
        let mut settings = AppSettings::default();
        settings.preferences.default_category = "volume".to_string();
        settings.preferences.default_amount = 2.0;
        settings.preferences.default_currency_to = "jpy".to_string();

        let state = AppState::with_parts(settings, NoRates, MemoryStore::new(), ChronoTzProvider)
            .await
            .unwrap();

        let units = state.unit_widget();
        assert_eq!(units.category, UnitCategory::Volume);
        assert_eq!((units.from_unit.as_str(), units.to_unit.as_str()), ("liter", "milliliter"));
        assert_eq!(units.amount, 2.0);

        let currency = state.currency_widget();
        assert_eq!((currency.from.as_str(), currency.to.as_str()), ("USD", "JPY"));
        assert_eq!(currency.amount, Decimal::from(2));

        let time = state.time_widget();
        assert_eq!(time.left_zone, time.right_zone);
    }

    #[tokio::test]
    async fn test_unknown_preferred_category_falls_back() {
        let mut settings = AppSettings::default();
        settings.preferences.default_category = "speed".to_string();
        let state = AppState::with_parts(settings, NoRates, MemoryStore::new(), ChronoTzProvider)
            .await
            .unwrap();
        assert_eq!(state.unit_widget().category, UnitCategory::Length);
    }

    #[tokio::test]
    async fn test_corrupt_flag_file_does_not_block_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");
        std::fs::write(&path, "{truncated").unwrap();

        let mut state = AppState::with_parts(
            AppSettings::default(),
            NoRates,
            JsonFileStore::new(&path),
            ChronoTzProvider,
        )
        .await
        .unwrap();
        assert!(!state.theme().is_dark());

        state.theme_mut().toggle().await.unwrap();
        let reloaded = ThemeFlag::load(JsonFileStore::new(&path)).await;
        assert!(reloaded.is_dark());
    }

    #[tokio::test]
    async fn test_theme_toggle_through_state() {
        let mut state = state().await;
        state.theme_mut().toggle().await.unwrap();
        assert!(state.theme().is_dark());
    }
}
