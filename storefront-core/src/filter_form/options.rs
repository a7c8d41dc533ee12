//! Choices offered by the filter widgets

use serde::{Deserialize, Serialize};

use crate::DiscountRange;

/// Lowest selectable price on the slider
pub const PRICE_MIN: u32 = 100;
/// Highest selectable price; also the "no limit" default
pub const PRICE_MAX: u32 = 2000;
/// Slider granularity
pub const PRICE_STEP: u32 = 50;
/// Slider position after a reset
pub const DEFAULT_PRICE: u32 = PRICE_MAX;

/// Occasions offered by the occasion multi-select
pub const OCCASIONS: [&str; 6] = ["casual", "formal", "party", "sports", "wedding", "festive"];

/// Discount select entries as `(value, label)`; the empty value means none.
pub const DISCOUNT_CHOICES: [(&str, &str); 4] = [
    ("", "None"),
    ("0-5", "From 0% to 5%"),
    ("6-10", "From 6% to 10%"),
    ("11-15", "From 11 to 15%"),
];

/// One entry of a select widget
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption<V> {
    pub value: V,
    pub label: String,
}

impl<V> SelectOption<V> {
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Option lists for the brand, category and occasion selects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub brands: Vec<SelectOption<i64>>,
    pub categories: Vec<SelectOption<i64>>,
    pub occasions: Vec<SelectOption<String>>,
}

impl FilterOptions {
    /// Build options from `(id, name)` pairs, with the standard occasions.
    pub fn new<B, C>(brands: B, categories: C) -> Self
    where
        B: IntoIterator<Item = (i64, String)>,
        C: IntoIterator<Item = (i64, String)>,
    {
        Self {
            brands: brands
                .into_iter()
                .map(|(id, name)| SelectOption::new(id, name))
                .collect(),
            categories: categories
                .into_iter()
                .map(|(id, name)| SelectOption::new(id, name))
                .collect(),
            occasions: OCCASIONS
                .iter()
                .map(|o| SelectOption::new((*o).to_owned(), *o))
                .collect(),
        }
    }

    pub fn brand(&self, id: i64) -> Option<&SelectOption<i64>> {
        self.brands.iter().find(|o| o.value == id)
    }

    pub fn category(&self, id: i64) -> Option<&SelectOption<i64>> {
        self.categories.iter().find(|o| o.value == id)
    }

    /// Occasion option, falling back to a value-as-label entry so occasions
    /// stored on products but missing from the list still round-trip.
    pub fn occasion(&self, value: &str) -> SelectOption<String> {
        self.occasions
            .iter()
            .find(|o| o.value == value)
            .cloned()
            .unwrap_or_else(|| SelectOption::new(value.to_owned(), value))
    }
}

/// Label shown by the discount select for a range.
pub fn discount_label(discount: Option<DiscountRange>) -> String {
    let Some(range) = discount else {
        return DISCOUNT_CHOICES[0].1.to_owned();
    };
    let value = range.to_string();
    DISCOUNT_CHOICES
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| (*label).to_owned())
        .unwrap_or_else(|| range.label())
}

/// Snap a raw slider value onto the step grid within the slider bounds.
pub fn snap_price(value: f64) -> u32 {
    if !value.is_finite() {
        return DEFAULT_PRICE;
    }
    let clamped = value.clamp(PRICE_MIN as f64, PRICE_MAX as f64);
    let steps = ((clamped - PRICE_MIN as f64) / PRICE_STEP as f64).round() as u32;
    (PRICE_MIN + steps * PRICE_STEP).min(PRICE_MAX)
}
