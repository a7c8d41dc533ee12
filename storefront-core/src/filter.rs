//! Product filter bag and listing query, parsed from the listing URL

use super::{DiscountRange, Gender, Pagination, QueryParams, SortBy, ValidationError};

/// Route of the product listing page
pub const LISTING_PATH: &str = "/products";

/// Query parameter names on the listing route
pub mod keys {
    pub const BRAND_ID: &str = "brandId";
    pub const CATEGORY_ID: &str = "categoryId";
    pub const PRICE_RANGE_TO: &str = "priceRangeTo";
    pub const GENDER: &str = "gender";
    pub const OCCASIONS: &str = "occasions";
    pub const DISCOUNT: &str = "discount";
    pub const SORT_BY: &str = "sortBy";
    pub const PAGE: &str = "page";
    pub const PAGE_SIZE: &str = "pageSize";

    /// Every parameter owned by the filter form
    pub const FILTERS: [&str; 6] = [BRAND_ID, CATEGORY_ID, PRICE_RANGE_TO, GENDER, OCCASIONS, DISCOUNT];
}

/// Optional filters; each present field ANDs one predicate onto the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub brand_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
    pub price_range_to: Option<f64>,
    pub gender: Option<Gender>,
    pub occasions: Vec<String>,
    pub discount: Option<DiscountRange>,
}

impl ProductFilter {
    /// Parse the filter bag from listing query parameters.
    ///
    /// # Example
    /// ```
    /// use storefront_core::{ProductFilter, QueryParams};
    ///
    /// let params = QueryParams::parse("brandId=1&brandId=4&discount=6-10&gender=");
    /// let filter = ProductFilter::from_query(&params).unwrap();
    /// assert_eq!(filter.brand_ids, vec![1, 4]);
    /// assert_eq!(filter.gender, None);
    /// ```
    pub fn from_query(params: &QueryParams) -> Result<Self, ValidationError> {
        let brand_ids = parse_ids(params, keys::BRAND_ID)?;
        let category_ids = parse_ids(params, keys::CATEGORY_ID)?;

        let price_range_to = match params.get(keys::PRICE_RANGE_TO).map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let value = raw.parse::<f64>().map_err(|_| ValidationError::InvalidFormat {
                    field: keys::PRICE_RANGE_TO,
                    reason: "must be a number",
                })?;
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::OutOfRange {
                        field: keys::PRICE_RANGE_TO,
                        min: 0.0,
                        max: f64::MAX,
                    });
                }
                Some(value)
            }
        };

        let gender = match params.get(keys::GENDER) {
            Some(raw) => Gender::parse_param(raw)?,
            None => None,
        };

        let discount = match params.get(keys::DISCOUNT).map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<DiscountRange>()?),
        };

        Ok(Self {
            brand_ids,
            category_ids,
            price_range_to,
            gender,
            occasions: params.list(keys::OCCASIONS),
            discount,
        })
    }

    /// True when no predicate would be added.
    pub fn is_empty(&self) -> bool {
        self.brand_ids.is_empty()
            && self.category_ids.is_empty()
            && self.price_range_to.is_none()
            && self.gender.is_none()
            && self.occasions.is_empty()
            && self.discount.is_none()
    }
}

/// Everything `GET /products` needs: sort, page, and filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub sort: Option<SortBy>,
    pub pagination: Pagination,
    pub filter: ProductFilter,
}

impl ListingQuery {
    pub fn from_query(params: &QueryParams, default_page_size: u32) -> Result<Self, ValidationError> {
        let sort = match params.get(keys::SORT_BY).map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<SortBy>()?),
        };

        Ok(Self {
            sort,
            pagination: Pagination::from_query(params, default_page_size)?,
            filter: ProductFilter::from_query(params)?,
        })
    }
}

/// Positive integer ids from a repeatable or comma-separated parameter,
/// deduplicated in first-seen order.
pub fn parse_ids(params: &QueryParams, field: &'static str) -> Result<Vec<i64>, ValidationError> {
    let mut ids = Vec::new();
    for raw in params.list(field) {
        let id = raw
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(ValidationError::InvalidVariant { field, value: raw })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SortDirection, SortField};

    #[test]
    fn empty_query_is_empty_filter() {
        let filter = ProductFilter::from_query(&QueryParams::default()).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn parses_every_field() {
        let params = QueryParams::parse(
            "brandId=3&brandId=5,3&categoryId=2&priceRangeTo=1500&gender=girl&occasions=party&occasions=casual&discount=0-5",
        );
        let filter = ProductFilter::from_query(&params).unwrap();

        assert_eq!(filter.brand_ids, vec![3, 5]);
        assert_eq!(filter.category_ids, vec![2]);
        assert_eq!(filter.price_range_to, Some(1500.0));
        assert_eq!(filter.gender, Some(Gender::Girl));
        assert_eq!(filter.occasions, vec!["party", "casual"]);
        assert_eq!(filter.discount, Some(DiscountRange { lo: 0, hi: 5 }));
        assert!(!filter.is_empty());
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let params = QueryParams::parse("brandId=1|1=1");
        let err = ProductFilter::from_query(&params).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "brandId", .. }));

        let params = QueryParams::parse("categoryId=-4");
        assert!(ProductFilter::from_query(&params).is_err());
    }

    #[test]
    fn rejects_bad_price() {
        let params = QueryParams::parse("priceRangeTo=cheap");
        assert!(ProductFilter::from_query(&params).is_err());

        let params = QueryParams::parse("priceRangeTo=-1");
        assert!(ProductFilter::from_query(&params).is_err());
    }

    #[test]
    fn listing_query_reads_sort_and_page() {
        let params = QueryParams::parse("sortBy=price-desc&page=2&pageSize=5&discount=6-10");
        let query = ListingQuery::from_query(&params, 10).unwrap();

        assert_eq!(query.sort, Some(SortBy::new(SortField::Price, SortDirection::Desc)));
        assert_eq!(query.pagination, Pagination::new(2, 5));
        assert_eq!(query.filter.discount, Some(DiscountRange { lo: 6, hi: 10 }));
    }

    #[test]
    fn listing_query_rejects_bad_sort() {
        let params = QueryParams::parse("sortBy=brands-asc");
        assert!(ListingQuery::from_query(&params, 10).is_err());
    }
}
