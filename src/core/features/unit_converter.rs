use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ConvertUnitsRequest, ConvertUnitsResponse, GetUnitsResponse, UnitDTO, WidgetDisplay};
use super::FeatureSync;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ERR_CONVERSION: &str = "Error during conversion";

// ============================================================================
// Unit Registry
// ============================================================================

/// Families of mutually convertible units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Weight,
    Volume,
    Temperature,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 4] = [
        UnitCategory::Length,
        UnitCategory::Weight,
        UnitCategory::Volume,
        UnitCategory::Temperature,
    ];

    pub fn key(self) -> &'static str {
        match self {
            UnitCategory::Length => "length",
            UnitCategory::Weight => "weight",
            UnitCategory::Volume => "volume",
            UnitCategory::Temperature => "temperature",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitCategory::Length => "Length",
            UnitCategory::Weight => "Weight",
            UnitCategory::Volume => "Volume",
            UnitCategory::Temperature => "Temperature",
        }
    }

    pub fn parse(key: &str) -> AppResult<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| AppError::UnknownCategory(key.to_string()))
    }

    /// Units in listing order; the first two are the widget's default pair.
    pub fn units(self) -> &'static [UnitDefinition] {
        match self {
            UnitCategory::Length => LENGTH_UNITS,
            UnitCategory::Weight => WEIGHT_UNITS,
            UnitCategory::Volume => VOLUME_UNITS,
            UnitCategory::Temperature => TEMPERATURE_UNITS,
        }
    }

    pub fn default_pair(self) -> (&'static str, &'static str) {
        let units = self.units();
        (units[0].key, units[1].key)
    }
}

/// A unit and its scale factor relative to the category's base unit.
///
/// `factor` is "units of this key per 1 base unit", so the base unit is 1.
/// Temperature units carry no meaningful factor; they go through
/// [`TemperatureScale`] instead.
#[derive(Debug, Clone, Copy)]
pub struct UnitDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub category: UnitCategory,
    pub factor: f64,
}

const fn unit(key: &'static str, label: &'static str, category: UnitCategory, factor: f64) -> UnitDefinition {
    UnitDefinition { key, label, category, factor }
}

// Length (base: meter)
const LENGTH_UNITS: &[UnitDefinition] = &[
    unit("meter", "Meter", UnitCategory::Length, 1.0),
    unit("kilometer", "Kilometer", UnitCategory::Length, 0.001),
    unit("mile", "Mile", UnitCategory::Length, 0.000_621_371),
    unit("yard", "Yard", UnitCategory::Length, 1.093_61),
];

// Weight (base: gram)
const WEIGHT_UNITS: &[UnitDefinition] = &[
    unit("gram", "Gram", UnitCategory::Weight, 1.0),
    unit("kilogram", "Kilogram", UnitCategory::Weight, 0.001),
    unit("ounce", "Ounce", UnitCategory::Weight, 0.035_274),
    unit("pound", "Pound", UnitCategory::Weight, 0.002_204_62),
];

// Volume (base: liter)
const VOLUME_UNITS: &[UnitDefinition] = &[
    unit("liter", "Liter", UnitCategory::Volume, 1.0),
    unit("milliliter", "Milliliter", UnitCategory::Volume, 1000.0),
    unit("gallon", "Gallon", UnitCategory::Volume, 0.264_172),
    unit("cup", "Cup", UnitCategory::Volume, 4.226_75),
];

const TEMPERATURE_UNITS: &[UnitDefinition] = &[
    unit("celsius", "Celsius", UnitCategory::Temperature, 1.0),
    unit("fahrenheit", "Fahrenheit", UnitCategory::Temperature, 1.0),
    unit("kelvin", "Kelvin", UnitCategory::Temperature, 1.0),
];

/// Unit key -> definition, across every category. Built once.
static UNIT_REGISTRY: Lazy<HashMap<&'static str, &'static UnitDefinition>> = Lazy::new(|| {
    UnitCategory::ALL
        .into_iter()
        .flat_map(|c| c.units().iter())
        .map(|def| (def.key, def))
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "celsius" => Some(TemperatureScale::Celsius),
            "fahrenheit" => Some(TemperatureScale::Fahrenheit),
            "kelvin" => Some(TemperatureScale::Kelvin),
            _ => None,
        }
    }
}

const KELVIN_OFFSET: f64 = 273.15;

// Pairwise affine rules. Identity is handled by the caller.
fn convert_temperature(from: TemperatureScale, to: TemperatureScale, amount: f64) -> f64 {
    use TemperatureScale::{Celsius, Fahrenheit, Kelvin};

    match (from, to) {
        (Celsius, Fahrenheit) => amount * 9.0 / 5.0 + 32.0,
        (Celsius, Kelvin) => amount + KELVIN_OFFSET,
        (Fahrenheit, Celsius) => (amount - 32.0) * 5.0 / 9.0,
        (Fahrenheit, Kelvin) => (amount - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET,
        (Kelvin, Celsius) => amount - KELVIN_OFFSET,
        (Kelvin, Fahrenheit) => (amount - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0,
        _ => amount,
    }
}

fn resolve(category: UnitCategory, key: &str) -> AppResult<&'static UnitDefinition> {
    let def = UNIT_REGISTRY
        .get(key)
        .copied()
        .ok_or_else(|| AppError::UnknownUnit(key.to_string()))?;

    if def.category != category {
        return Err(AppError::CategoryMismatch {
            unit: key.to_string(),
            expected: category.key().to_string(),
            actual: def.category.key().to_string(),
        });
    }

    Ok(def)
}

/// Convert `amount` of `from_unit` into `to_unit` within `category`.
///
/// Returns full precision; see [`format_result`] for display rounding.
/// Fails only with `UnknownUnit` or `CategoryMismatch`.
pub fn convert(category: UnitCategory, from_unit: &str, to_unit: &str, amount: f64) -> AppResult<f64> {
    let from_def = resolve(category, from_unit)?;
    let to_def = resolve(category, to_unit)?;

    // Same unit: skip the arithmetic so no drift is introduced
    if from_def.key == to_def.key {
        return Ok(amount);
    }

    let result = match category {
        UnitCategory::Temperature => {
            let from = TemperatureScale::from_key(from_def.key)
                .ok_or_else(|| AppError::UnknownUnit(from_unit.to_string()))?;
            let to = TemperatureScale::from_key(to_def.key)
                .ok_or_else(|| AppError::UnknownUnit(to_unit.to_string()))?;
            convert_temperature(from, to, amount)
        }
        _ => amount / from_def.factor * to_def.factor,
    };

    tracing::debug!(
        category = category.key(),
        "{} {} -> {} {}",
        amount, from_unit, result, to_unit
    );

    Ok(result)
}

/// Two decimals, matching what the widget displays.
pub fn format_result(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn units_for(category: UnitCategory) -> Vec<UnitDTO> {
    category
        .units()
        .iter()
        .map(|def| UnitDTO {
            id: def.key.to_string(),
            label: def.label.to_string(),
            category: category.key().to_string(),
        })
        .collect()
}

pub fn all_units() -> Vec<UnitDTO> {
    UnitCategory::ALL.into_iter().flat_map(units_for).collect()
}

// ============================================================================
// Widget State
// ============================================================================

/// Selection state behind the unit widget.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitWidget {
    pub category: UnitCategory,
    pub from_unit: String,
    pub to_unit: String,
    pub amount: f64,
}

impl UnitWidget {
    pub fn new(category: UnitCategory, amount: f64) -> Self {
        let (from, to) = category.default_pair();
        Self {
            category,
            from_unit: from.to_string(),
            to_unit: to.to_string(),
            amount,
        }
    }

    /// Switching category resets the pair to the category's first two units.
    pub fn select_category(&mut self, category: UnitCategory) {
        let (from, to) = category.default_pair();
        self.category = category;
        self.from_unit = from.to_string();
        self.to_unit = to.to_string();
    }

    pub fn set_units(&mut self, from_unit: &str, to_unit: &str) {
        self.from_unit = from_unit.to_string();
        self.to_unit = to_unit.to_string();
    }

    pub fn swap_units(&mut self) {
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
    }

    /// Non-positive or non-finite amounts show nothing; engine errors show
    /// an inline message.
    pub fn display(&self) -> WidgetDisplay {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return WidgetDisplay::Empty;
        }

        match convert(self.category, &self.from_unit, &self.to_unit, self.amount) {
            Ok(value) => WidgetDisplay::Value(format_result(value)),
            Err(e) => {
                tracing::warn!("Unit conversion failed: {}", e);
                WidgetDisplay::Error(ERR_CONVERSION.to_string())
            }
        }
    }
}

// ============================================================================
// Feature Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct UnitConverterFeature;

impl FeatureSync for UnitConverterFeature {
    fn id(&self) -> &'static str {
        "unit_converter"
    }

    fn title(&self) -> &'static str {
        "Unit Converter"
    }

    fn description(&self) -> &'static str {
        "Convert length, weight, volume and temperature"
    }
}

// ============================================================================
// Commands
// ============================================================================

pub fn convert_units_command(request: ConvertUnitsRequest) -> AppResult<ConvertUnitsResponse> {
    let category = UnitCategory::parse(&request.category)?;
    let result = convert(category, &request.from_unit, &request.to_unit, request.amount)?;

    Ok(ConvertUnitsResponse {
        result,
        formatted_result: format_result(result),
        from_unit: request.from_unit,
        to_unit: request.to_unit,
    })
}

/// All units, or only those of `category` when given
pub fn get_units_command(category: Option<&str>) -> AppResult<GetUnitsResponse> {
    let units = match category {
        Some(key) => units_for(UnitCategory::parse(key)?),
        None => all_units(),
    };
    Ok(GetUnitsResponse { units })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_length_meter_to_kilometer() {
        assert_close(convert(UnitCategory::Length, "meter", "kilometer", 1000.0).unwrap(), 1.0);
    }

    #[test]
    fn test_weight_kilogram_to_gram() {
        assert_close(convert(UnitCategory::Weight, "kilogram", "gram", 1.0).unwrap(), 1000.0);
    }

    #[test]
    fn test_volume_liter_to_milliliter() {
        assert_close(convert(UnitCategory::Volume, "liter", "milliliter", 2.5).unwrap(), 2500.0);
    }

    #[test]
    fn test_temperature_fixed_points() {
        assert_eq!(convert(UnitCategory::Temperature, "celsius", "fahrenheit", 0.0).unwrap(), 32.0);
        assert_eq!(convert(UnitCategory::Temperature, "celsius", "kelvin", 0.0).unwrap(), 273.15);
        assert_eq!(convert(UnitCategory::Temperature, "fahrenheit", "celsius", 32.0).unwrap(), 0.0);
        assert_close(convert(UnitCategory::Temperature, "celsius", "fahrenheit", 100.0).unwrap(), 212.0);
        assert_close(convert(UnitCategory::Temperature, "kelvin", "fahrenheit", 273.15).unwrap(), 32.0);
        assert_close(convert(UnitCategory::Temperature, "fahrenheit", "kelvin", 212.0).unwrap(), 373.15);
    }

    #[test]
    fn test_identity_for_every_unit() {
        for category in UnitCategory::ALL {
            for def in category.units() {
                for amount in [0.1, 1.0, 37.5, 1e6] {
                    assert_eq!(convert(category, def.key, def.key, amount).unwrap(), amount);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_every_pair() {
        for category in UnitCategory::ALL {
            for from in category.units() {
                for to in category.units() {
                    for amount in [0.5, 1.0, 42.0, 12_345.678] {
                        let there = convert(category, from.key, to.key, amount).unwrap();
                        let back = convert(category, to.key, from.key, there).unwrap();
                        assert!(
                            (back - amount).abs() < 1e-6,
                            "{} -> {} -> {} drifted: {} vs {}",
                            from.key, to.key, from.key, amount, back
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_negative_amounts_follow_arithmetic() {
        assert_close(convert(UnitCategory::Length, "kilometer", "meter", -2.0).unwrap(), -2000.0);
        assert_close(convert(UnitCategory::Temperature, "celsius", "fahrenheit", -40.0).unwrap(), -40.0);
    }

    #[test]
    fn test_unknown_unit() {
        assert_eq!(
            convert(UnitCategory::Length, "parsec", "meter", 1.0),
            Err(AppError::UnknownUnit("parsec".to_string()))
        );
        assert_eq!(
            convert(UnitCategory::Temperature, "celsius", "rankine", 1.0),
            Err(AppError::UnknownUnit("rankine".to_string()))
        );
    }

    #[test]
    fn test_category_mismatch() {
        let err = convert(UnitCategory::Length, "gram", "meter", 1.0).unwrap_err();
        assert_eq!(
            err,
            AppError::CategoryMismatch {
                unit: "gram".to_string(),
                expected: "length".to_string(),
                actual: "weight".to_string(),
            }
        );

        let err = convert(UnitCategory::Temperature, "celsius", "liter", 1.0).unwrap_err();
        assert!(matches!(err, AppError::CategoryMismatch { .. }));
    }

    #[test]
    fn test_all_linear_factors_positive() {
        for category in [UnitCategory::Length, UnitCategory::Weight, UnitCategory::Volume] {
            assert_eq!(category.units()[0].factor, 1.0);
            assert!(category.units().iter().all(|d| d.factor > 0.0));
        }
    }

    #[test]
    fn test_unit_keys_unique_across_categories() {
        let total: usize = UnitCategory::ALL.iter().map(|c| c.units().len()).sum();
        assert_eq!(UNIT_REGISTRY.len(), total);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(UnitCategory::parse("Weight").unwrap(), UnitCategory::Weight);
        assert_eq!(
            UnitCategory::parse("speed"),
            Err(AppError::UnknownCategory("speed".to_string()))
        );
    }

    #[test]
    fn test_format_result() {
        assert_eq!(format_result(1.0), "1.00");
        assert_eq!(format_result(0.621371), "0.62");
        assert_eq!(format_result(273.15), "273.15");
    }

    #[test]
    fn test_widget_select_category_resets_pair() {
        let mut widget = UnitWidget::new(UnitCategory::Length, 1.0);
        assert_eq!((widget.from_unit.as_str(), widget.to_unit.as_str()), ("meter", "kilometer"));

        widget.select_category(UnitCategory::Temperature);
        assert_eq!((widget.from_unit.as_str(), widget.to_unit.as_str()), ("celsius", "fahrenheit"));
        assert_eq!(widget.display(), WidgetDisplay::Value("33.80".to_string()));
    }

    #[test]
    fn test_widget_display_states() {
        let mut widget = UnitWidget::new(UnitCategory::Length, 1000.0);
        assert_eq!(widget.display(), WidgetDisplay::Value("1.00".to_string()));

        widget.swap_units();
        assert_eq!(widget.display(), WidgetDisplay::Value("1000000.00".to_string()));

        widget.amount = 0.0;
        assert_eq!(widget.display(), WidgetDisplay::Empty);

        widget.amount = 1.0;
        widget.set_units("meter", "pound");
        assert_eq!(widget.display(), WidgetDisplay::Error(ERR_CONVERSION.to_string()));
    }

    #[test]
    fn test_convert_units_command() {
        let response = convert_units_command(ConvertUnitsRequest {
            category: "weight".to_string(),
            amount: 16.0,
            from_unit: "ounce".to_string(),
            to_unit: "pound".to_string(),
        })
        .unwrap();
        assert_eq!(response.formatted_result, "1.00");
    }

    #[test]
    fn test_get_units_command() {
        assert_eq!(get_units_command(Some("temperature")).unwrap().units.len(), 3);
        assert_eq!(get_units_command(None).unwrap().units.len(), 15);
        assert!(get_units_command(Some("time")).is_err());
    }
}
