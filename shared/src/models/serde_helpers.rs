//! Common serde helpers for loosely-typed store columns
//!
//! The hosted store is schemaless about a few columns: `codigo` on `estoque`
//! is numeric in some rows and text in others, and quantity fields arrive as
//! numbers or numeric strings depending on which client wrote them. These
//! helpers accept both shapes.

use serde::{Deserialize, Deserializer};

/// Deserialize a value that may be a JSON string or a JSON number into a
/// `String`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

/// Deserialize a quantity that may be a JSON number, a numeric string, or
/// null into an `f64` (null and unparsable strings become 0.0, matching how
/// the legacy front-end read these columns).
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}

/// Deserialize an integer code that may arrive as a JSON number or a
/// numeric string.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse().unwrap_or(0),
        None => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "string_or_number")]
        codigo: String,
        #[serde(deserialize_with = "lenient_f64", default)]
        quantidade: f64,
    }

    #[test]
    fn test_numeric_code_becomes_string() {
        let row: Row = serde_json::from_str(r#"{"codigo": 1042, "quantidade": 5}"#).unwrap();
        assert_eq!(row.codigo, "1042");
        assert_eq!(row.quantidade, 5.0);
    }

    #[test]
    fn test_string_quantity_parsed() {
        let row: Row = serde_json::from_str(r#"{"codigo": "A1", "quantidade": "7.5"}"#).unwrap();
        assert_eq!(row.quantidade, 7.5);
    }

    #[test]
    fn test_null_quantity_is_zero() {
        let row: Row = serde_json::from_str(r#"{"codigo": "A1", "quantidade": null}"#).unwrap();
        assert_eq!(row.quantidade, 0.0);
    }

    #[test]
    fn test_lenient_i64_accepts_text() {
        #[derive(Deserialize)]
        struct Seq {
            #[serde(deserialize_with = "lenient_i64", default)]
            codigo: i64,
        }

        let seq: Seq = serde_json::from_str(r#"{"codigo": 42}"#).unwrap();
        assert_eq!(seq.codigo, 42);
        let seq: Seq = serde_json::from_str(r#"{"codigo": "42"}"#).unwrap();
        assert_eq!(seq.codigo, 42);
    }
}
