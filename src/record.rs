// Record payloads and the keys they are cached under.

use std::fmt;

use serde_json::{Map, Value};

/// Opaque show metadata, as returned by the scraper.
pub type Record = Map<String, Value>;

/// Identifier a record is cached under (a numeric or string show id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from a JSON id value. Only strings and numbers qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for CacheKey {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for CacheKey {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for CacheKey {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<i32> for CacheKey {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

/// Get a key from a record.
///
/// Returns `None` when the key is missing or its value is null.
pub fn safe_get<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_safe_get_skips_null() {
        let r = record(json!({"name": "Show A", "overview": null}));

        assert_eq!(safe_get(&r, "name"), Some(&json!("Show A")));
        assert_eq!(safe_get(&r, "overview"), None);
        assert_eq!(safe_get(&r, "missing"), None);
    }

    #[test]
    fn test_key_from_value() {
        assert_eq!(
            CacheKey::from_value(&json!(12345)),
            Some(CacheKey::from(12345u64))
        );
        assert_eq!(
            CacheKey::from_value(&json!("tt0903747")).unwrap().as_str(),
            "tt0903747"
        );
        assert_eq!(CacheKey::from_value(&json!("")), None);
        assert_eq!(CacheKey::from_value(&json!(["a"])), None);
        assert_eq!(CacheKey::from_value(&Value::Null), None);
    }

    #[test]
    fn test_integer_widths_agree() {
        assert_eq!(CacheKey::from(1399), CacheKey::from(1399u64));
        assert_eq!(CacheKey::from(1399u32), CacheKey::from(1399i64));
        assert_eq!(CacheKey::from(-7), CacheKey::from(-7i64));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(CacheKey::from(-7i64).to_string(), "-7");
        assert_eq!(CacheKey::from("abc".to_string()).to_string(), "abc");
    }
}
