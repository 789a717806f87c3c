//! Widget registry with enum dispatch
//!
//! Every widget on the board is a variant of [`AppFeature`]; the set is
//! known at compile time so dispatch is static.

use enum_dispatch::enum_dispatch;

pub mod currency;
pub mod time_converter;
pub mod unit_converter;

#[enum_dispatch]
pub trait FeatureSync: Send + Sync {
    /// Stable identifier, also used as the board slot id
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn description(&self) -> &'static str;
}

#[enum_dispatch(FeatureSync)]
#[derive(Debug, Clone)]
pub enum AppFeature {
    TimeConverter(time_converter::TimeConverterFeature),
    Currency(currency::CurrencyFeature),
    UnitConverter(unit_converter::UnitConverterFeature),
}

impl AppFeature {
    /// All widgets in their default board order.
    pub fn all() -> Vec<Self> {
        vec![
            AppFeature::TimeConverter(time_converter::TimeConverterFeature),
            AppFeature::Currency(currency::CurrencyFeature),
            AppFeature::UnitConverter(unit_converter::UnitConverterFeature),
        ]
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|f| f.id() == id)
    }
}

pub fn default_board_order() -> Vec<String> {
    AppFeature::all().iter().map(|f| f.id().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        assert_eq!(
            default_board_order(),
            vec!["time_converter", "currency_converter", "unit_converter"]
        );
    }

    #[test]
    fn test_from_id() {
        let feature = AppFeature::from_id("currency_converter").unwrap();
        assert_eq!(feature.title(), "Currency Converter");
        assert!(AppFeature::from_id("translator").is_none());
    }
}
