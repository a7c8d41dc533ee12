//! Ordered, multi-valued URL query parameters
//!
//! Mirrors the browser's `URLSearchParams`: keys may repeat, insertion order
//! is preserved, and `set` collapses repeats into one entry.

use std::fmt;

/// Query string as an ordered list of key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    ///
    /// `+` decodes to a space; malformed percent escapes are kept lossily
    /// rather than rejected.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => (decode(key), decode(value)),
                None => (decode(segment), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Values for a multi-valued key, accepting both repeated keys
    /// (`brandId=1&brandId=2`) and comma lists (`brandId=1,2`). Blank items
    /// are skipped.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get_all(key)
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Replace the first occurrence of `key` in place and drop the rest, or
    /// append when absent.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = 0usize;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key.to_owned(), value)),
        }
    }

    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((key.to_owned(), value.into()));
    }

    /// Remove every occurrence of `key`.
    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for QueryParams {
    /// Serialize without the leading `?`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.pairs.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", urlencoding::encode(key), urlencoding::encode(value))?;
        }
        Ok(())
    }
}

impl From<&str> for QueryParams {
    fn from(query: &str) -> Self {
        Self::parse(query)
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_keys_in_order() {
        let params = QueryParams::parse("?brandId=1&gender=men&brandId=4");
        assert_eq!(params.get("brandId"), Some("1"));
        assert_eq!(params.get_all("brandId").collect::<Vec<_>>(), vec!["1", "4"]);
        assert_eq!(params.get("gender"), Some("men"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn decodes_escapes_and_plus() {
        let params = QueryParams::parse("occasions=night+out&q=50%25%20off&flag");
        assert_eq!(params.get("occasions"), Some("night out"));
        assert_eq!(params.get("q"), Some("50% off"));
        assert_eq!(params.get("flag"), Some(""));
    }

    #[test]
    fn list_accepts_repeats_and_commas() {
        let params = QueryParams::parse("brandId=1,2&brandId=7&brandId=");
        assert_eq!(params.list("brandId"), vec!["1", "2", "7"]);
        assert!(params.list("categoryId").is_empty());
    }

    #[test]
    fn set_collapses_repeats_in_place() {
        let mut params = QueryParams::parse("a=1&b=2&a=3");
        params.set("a", "9");
        assert_eq!(params.to_string(), "a=9&b=2");

        params.set("c", "x");
        assert_eq!(params.to_string(), "a=9&b=2&c=x");
    }

    #[test]
    fn append_and_delete() {
        let mut params = QueryParams::new();
        params.append("brandId", "1");
        params.append("brandId", "2");
        params.append("page", "3");
        params.delete("brandId");
        assert_eq!(params.to_string(), "page=3");
        assert!(!params.contains("brandId"));
    }

    #[test]
    fn display_encodes() {
        let params: QueryParams = [("occasions", "night out"), ("discount", "6-10")]
            .into_iter()
            .collect();
        assert_eq!(params.to_string(), "occasions=night%20out&discount=6-10");
        assert_eq!(QueryParams::parse(&params.to_string()), params);
    }
}
