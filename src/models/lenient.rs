//! Type-tolerant field deserializers.
//!
//! Upstream records are loosely typed. Each helper here accepts any JSON value
//! and maps anything of the wrong shape to "absent" instead of failing the
//! enclosing record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A string, or a number rendered as a string.
pub fn opt_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(v.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// A non-negative integer that fits in `u32`. Strings are not accepted.
pub fn opt_u32<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(v.and_then(|v| value_as_u32(&v)))
}

/// Like [`opt_u32`] but falls back to zero.
pub fn u32_or_zero<'de, D>(de: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_u32(de)?.unwrap_or_default())
}

/// Any JSON number as `f64`, falling back to zero.
pub fn f64_or_zero<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(v.and_then(|v| v.as_f64()).unwrap_or_default())
}

/// A nested JSON object decoded as `T`; anything else is absent.
pub fn opt_object<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(v.filter(Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok()))
}

/// An array of `T`, keeping the elements that decode and dropping the rest.
pub fn vec_of<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(match v {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Keep the raw value for fields whose encoding varies (e.g. outcome).
pub fn opt_scalar<'de, D>(de: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(v.filter(|v| v.is_number() || v.is_string() || v.is_boolean()))
}

pub(crate) fn value_as_u32(v: &Value) -> Option<u32> {
    v.as_u64().and_then(|n| u32::try_from(n).ok())
}

pub(crate) fn value_as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "opt_u32")]
        count: Option<u32>,
        #[serde(default, deserialize_with = "u32_or_zero")]
        zeroed: u32,
        #[serde(default, deserialize_with = "f64_or_zero")]
        ratio: f64,
    }

    #[test]
    fn test_wrong_types_become_absent() {
        let p: Probe = serde_json::from_str(
            r#"{"name": [1], "count": "7", "zeroed": -3, "ratio": "fast"}"#,
        )
        .unwrap();
        assert_eq!(p.name, None);
        assert_eq!(p.count, None);
        assert_eq!(p.zeroed, 0);
        assert_eq!(p.ratio, 0.0);
    }

    #[test]
    fn test_well_typed_values_pass_through() {
        let p: Probe =
            serde_json::from_str(r#"{"name": 42, "count": 7, "zeroed": 3, "ratio": 2.5}"#).unwrap();
        assert_eq!(p.name.as_deref(), Some("42"));
        assert_eq!(p.count, Some(7));
        assert_eq!(p.zeroed, 3);
        assert_eq!(p.ratio, 2.5);
    }

    #[test]
    fn test_missing_and_null_fields() {
        let p: Probe = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(p.name, None);
        assert_eq!(p.count, None);
        assert_eq!(p.zeroed, 0);
    }
}
