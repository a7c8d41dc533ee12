//! Discount range filter (`"lo-hi"`, inclusive percentages)

use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Inclusive discount range in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscountRange {
    pub lo: i32,
    pub hi: i32,
}

impl DiscountRange {
    pub const MAX_PERCENT: i32 = 100;

    pub fn new(lo: i32, hi: i32) -> Result<Self, ValidationError> {
        if !(0..=Self::MAX_PERCENT).contains(&lo) || !(0..=Self::MAX_PERCENT).contains(&hi) {
            return Err(ValidationError::OutOfRange {
                field: "discount",
                min: 0.0,
                max: Self::MAX_PERCENT as f64,
            });
        }
        if lo > hi {
            return Err(ValidationError::InvalidFormat {
                field: "discount",
                reason: "lower bound must not exceed upper bound",
            });
        }
        Ok(Self { lo, hi })
    }

    pub fn contains(&self, discount: i32) -> bool {
        self.lo <= discount && discount <= self.hi
    }

    /// Human label, e.g. "From 6% to 10%".
    pub fn label(&self) -> String {
        format!("From {}% to {}%", self.lo, self.hi)
    }
}

impl FromStr for DiscountRange {
    type Err = ValidationError;

    /// Parse `"lo-hi"`.
    ///
    /// # Example
    /// ```
    /// use storefront_core::DiscountRange;
    ///
    /// let range: DiscountRange = "6-10".parse().unwrap();
    /// assert!(range.contains(6) && range.contains(10) && !range.contains(11));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const FORMAT: ValidationError = ValidationError::InvalidFormat {
            field: "discount",
            reason: "expected \"lo-hi\" with whole percentages",
        };

        let (lo, hi) = s.trim().split_once('-').ok_or(FORMAT)?;
        let lo = lo.trim().parse::<i32>().map_err(|_| FORMAT)?;
        let hi = hi.trim().parse::<i32>().map_err(|_| FORMAT)?;
        Self::new(lo, hi)
    }
}

impl fmt::Display for DiscountRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bounds() {
        let range: DiscountRange = "11-15".parse().unwrap();
        assert_eq!(range, DiscountRange { lo: 11, hi: 15 });
        assert_eq!(range.to_string(), "11-15");
        assert_eq!(range.label(), "From 11% to 15%");
    }

    #[test]
    fn inclusive_bounds() {
        let range: DiscountRange = "6-10".parse().unwrap();
        let matched: Vec<i32> = (0..=20).filter(|d| range.contains(*d)).collect();
        assert_eq!(matched, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn rejects_malformed() {
        assert!("".parse::<DiscountRange>().is_err());
        assert!("10".parse::<DiscountRange>().is_err());
        assert!("a-b".parse::<DiscountRange>().is_err());
        assert!("-5-3".parse::<DiscountRange>().is_err());
    }

    #[test]
    fn rejects_inverted_and_out_of_range() {
        assert!(matches!(
            "10-6".parse::<DiscountRange>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            "0-150".parse::<DiscountRange>(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
