//! Sort key for product listings (`"field-direction"`)

use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Sortable product columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Name,
    Price,
    Discount,
    Rating,
    CreatedAt,
}

impl SortField {
    /// Parse a field name as it appears in the URL.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "discount" => Some(Self::Discount),
            "rating" => Some(Self::Rating),
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Price => "price",
            Self::Discount => "discount",
            Self::Rating => "rating",
            Self::CreatedAt => "created_at",
        }
    }

    /// Qualified column for ORDER BY.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "products.id",
            Self::Name => "products.name",
            Self::Price => "products.price",
            Self::Discount => "products.discount",
            Self::Rating => "products.rating",
            Self::CreatedAt => "products.created_at",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Parsed `"field-direction"` sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortBy {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortBy {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// ORDER BY clause body, e.g. `products.price DESC`.
    pub fn order_clause(&self) -> String {
        format!("{} {}", self.field.column(), self.direction.as_sql())
    }
}

impl FromStr for SortBy {
    type Err = ValidationError;

    /// Split on the first `-` into column and direction. A missing direction
    /// sorts ascending.
    ///
    /// # Example
    /// ```
    /// use storefront_core::{SortBy, SortDirection, SortField};
    ///
    /// let sort: SortBy = "price-desc".parse().unwrap();
    /// assert_eq!(sort.field, SortField::Price);
    /// assert_eq!(sort.direction, SortDirection::Desc);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (field, direction) = match s.split_once('-') {
            Some((field, direction)) => (field, Some(direction)),
            None => (s, None),
        };

        let field = SortField::from_param(field).ok_or_else(|| ValidationError::InvalidVariant {
            field: "sortBy",
            value: s.to_owned(),
        })?;

        let direction = match direction.map(str::to_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => {
                return Err(ValidationError::InvalidVariant {
                    field: "sortBy",
                    value: s.to_owned(),
                })
            }
        };

        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.field.as_str(), self.direction.as_str())
    }
}
