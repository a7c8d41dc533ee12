//! Gender audience of a product

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Target audience. The "none" choice of the radio group is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Boy,
    Girl,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Self::Men, Self::Women, Self::Boy, Self::Girl];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Boy => "boy",
            Self::Girl => "girl",
        }
    }

    /// Parse a query parameter value, where the empty string means "any".
    pub fn parse_param(value: &str) -> Result<Option<Self>, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value.parse().map(Some)
    }

    /// Column value for an optional gender ("" when unset).
    pub fn column_value(gender: Option<Self>) -> &'static str {
        gender.map(|g| g.as_str()).unwrap_or("")
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "boy" => Ok(Self::Boy),
            "girl" => Ok(Self::Girl),
            _ => Err(ValidationError::InvalidVariant {
                field: "gender",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
