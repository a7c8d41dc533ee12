//! Product write payloads
//!
//! `brands` and `occasion` are denormalised comma-delimited columns, so list
//! items must never contain the delimiter.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use storefront_core::{CatalogName, DiscountRange, Gender, ValidationError};

/// Maximum description length
const MAX_DESCRIPTION_LEN: usize = 4000;

/// Highest rating a product can carry
const MAX_RATING: f64 = 5.0;

/// Occasion token: letters, digits, spaces, `_` and `-`, starting and ending
/// on a word character so `\y` boundaries can match the whole token.
static OCCASION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9 _-]{0,30}[A-Za-z0-9_])?$")
        .expect("invalid occasion regex")
});

/// Payload for `saveProducts`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: CatalogName,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "gender_field")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub occasions: Vec<String>,
    #[serde(default)]
    pub discount: i32,
    #[serde(default)]
    pub brand_ids: Vec<i64>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_description(self.description.as_deref())?;
        validate_price(self.price)?;
        validate_rating(self.rating)?;
        validate_discount(self.discount)?;
        validate_occasions(&self.occasions)?;
        validate_brand_ids(&self.brand_ids)
    }

    /// Value for the `occasion` column.
    pub fn occasion_column(&self) -> String {
        join_occasions(&self.occasions)
    }

    /// Value for the `brands` column.
    pub fn brands_column(&self) -> String {
        join_brand_ids(&self.brand_ids)
    }
}

/// Payload for `updateProduct`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    #[serde(default)]
    pub name: Option<CatalogName>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// `Some(None)` clears the gender
    #[serde(default, deserialize_with = "gender_change")]
    pub gender: Option<Option<Gender>>,
    #[serde(default)]
    pub occasions: Option<Vec<String>>,
    #[serde(default)]
    pub discount: Option<i32>,
    #[serde(default)]
    pub brand_ids: Option<Vec<i64>>,
}

impl ProductChanges {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_description(self.description.as_deref())?;
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(discount) = self.discount {
            validate_discount(discount)?;
        }
        if let Some(occasions) = &self.occasions {
            validate_occasions(occasions)?;
        }
        if let Some(brand_ids) = &self.brand_ids {
            validate_brand_ids(brand_ids)?;
        }
        Ok(())
    }
}

/// Join occasion tokens for the `occasion` column.
pub fn join_occasions(occasions: &[String]) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for occasion in occasions.iter().map(|o| o.trim()) {
        if !tokens.contains(&occasion) {
            tokens.push(occasion);
        }
    }
    tokens.join(",")
}

/// Join brand ids for the `brands` column.
pub fn join_brand_ids(brand_ids: &[i64]) -> String {
    let mut ids: Vec<i64> = Vec::new();
    for id in brand_ids {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }
    ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",")
}

fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(ValidationError::TooLong {
            field: "description",
            max: MAX_DESCRIPTION_LEN,
        }),
        _ => Ok(()),
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "price",
            min: 0.0,
            max: f64::MAX,
        });
    }
    Ok(())
}

fn validate_rating(rating: f64) -> Result<(), ValidationError> {
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating",
            min: 0.0,
            max: MAX_RATING,
        });
    }
    Ok(())
}

fn validate_discount(discount: i32) -> Result<(), ValidationError> {
    if !(0..=DiscountRange::MAX_PERCENT).contains(&discount) {
        return Err(ValidationError::OutOfRange {
            field: "discount",
            min: 0.0,
            max: DiscountRange::MAX_PERCENT as f64,
        });
    }
    Ok(())
}

fn validate_occasions(occasions: &[String]) -> Result<(), ValidationError> {
    for occasion in occasions {
        if !OCCASION_RE.is_match(occasion.trim()) {
            return Err(ValidationError::InvalidVariant {
                field: "occasions",
                value: occasion.clone(),
            });
        }
    }
    Ok(())
}

fn validate_brand_ids(brand_ids: &[i64]) -> Result<(), ValidationError> {
    match brand_ids.iter().find(|id| **id <= 0) {
        Some(id) => Err(ValidationError::InvalidVariant {
            field: "brandIds",
            value: id.to_string(),
        }),
        None => Ok(()),
    }
}

fn gender_field<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => Gender::parse_param(&value).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn gender_change<'de, D>(deserializer: D) -> Result<Option<Option<Gender>>, D::Error>
where
    D: Deserializer<'de>,
{
    gender_field(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sneaker() -> serde_json::Value {
        json!({
            "name": "Runner",
            "price": 120.0,
            "gender": "men",
            "occasions": ["sports", "casual"],
            "discount": 8,
            "brandIds": [4, 1, 4]
        })
    }

    #[test]
    fn deserializes_and_joins_columns() {
        let product: NewProduct = serde_json::from_value(sneaker()).unwrap();
        product.validate().unwrap();

        assert_eq!(product.gender, Some(Gender::Men));
        assert_eq!(product.occasion_column(), "sports,casual");
        assert_eq!(product.brands_column(), "4,1");
    }

    #[test]
    fn empty_gender_is_none() {
        let mut value = sneaker();
        value["gender"] = json!("");
        let product: NewProduct = serde_json::from_value(value).unwrap();
        assert_eq!(product.gender, None);
    }

    #[test]
    fn rejects_delimiter_in_occasion() {
        let mut value = sneaker();
        value["occasions"] = json!(["party,formal"]);
        let product: NewProduct = serde_json::from_value(value).unwrap();
        assert!(matches!(
            product.validate(),
            Err(ValidationError::InvalidVariant { field: "occasions", .. })
        ));
    }

    #[test]
    fn occasion_tokens_end_on_word_characters() {
        for ok in ["party", "night-out", "Black Tie", "x", "after_5"] {
            let mut value = sneaker();
            value["occasions"] = json!([ok]);
            let product: NewProduct = serde_json::from_value(value).unwrap();
            assert!(product.validate().is_ok(), "{ok} should be accepted");
        }
        for bad in ["party-", "-party", "party -", "night out-"] {
            let mut value = sneaker();
            value["occasions"] = json!([bad]);
            let product: NewProduct = serde_json::from_value(value).unwrap();
            assert!(product.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let mut value = sneaker();
        value["discount"] = json!(101);
        let product: NewProduct = serde_json::from_value(value).unwrap();
        assert!(product.validate().is_err());

        let mut value = sneaker();
        value["price"] = json!(-1.0);
        let product: NewProduct = serde_json::from_value(value).unwrap();
        assert!(product.validate().is_err());
    }

    #[test]
    fn changes_distinguish_absent_and_cleared_gender() {
        let changes: ProductChanges = serde_json::from_value(json!({ "price": 10.0 })).unwrap();
        assert_eq!(changes.gender, None);

        let changes: ProductChanges = serde_json::from_value(json!({ "gender": "" })).unwrap();
        assert_eq!(changes.gender, Some(None));

        let changes: ProductChanges = serde_json::from_value(json!({ "gender": null })).unwrap();
        assert_eq!(changes.gender, Some(None));

        let changes: ProductChanges = serde_json::from_value(json!({ "gender": "girl" })).unwrap();
        assert_eq!(changes.gender, Some(Some(Gender::Girl)));
    }
}
