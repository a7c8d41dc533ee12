//! Display names for products, categories and brands

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for catalog names
const MAX_NAME_LEN: usize = 128;

/// Validated, trimmed catalog name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogName(String);

impl CatalogName {
    /// Create a name, trimming surrounding whitespace.
    ///
    /// # Example
    /// ```
    /// use storefront_core::CatalogName;
    ///
    /// assert_eq!(CatalogName::new("  Sneakers ").unwrap().as_str(), "Sneakers");
    /// assert!(CatalogName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for CatalogName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CatalogName> for String {
    fn from(name: CatalogName) -> Self {
        name.0
    }
}

impl AsRef<str> for CatalogName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        let err = CatalogName::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn max_length() {
        assert!(CatalogName::new(&"a".repeat(128)).is_ok());

        let err = CatalogName::new(&"a".repeat(129)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 128, .. }));
    }

    #[test]
    fn deserializes_with_validation() {
        let name: CatalogName = serde_json::from_str("\" Nike \"").unwrap();
        assert_eq!(name.as_str(), "Nike");
        assert!(serde_json::from_str::<CatalogName>("\"\"").is_err());
    }
}
