//! Lenient numeric decoding for provider amounts
//!
//! The provider sends money as either JSON numbers or numeric strings
//! (`"units": "150000"`). Anything else is a decoding error.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A numeric value that may arrive as a number or a numeric string.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Amount(pub f64);

impl Amount {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Reads an optional amount, treating absence as zero.
pub fn or_zero(amount: Option<Amount>) -> f64 {
    amount.map(Amount::value).unwrap_or(0.0)
}

/// Parses a numeric string the way the provider formats them.
pub fn parse_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Ok(Amount(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        parse_numeric(v)
            .map(Amount)
            .ok_or_else(|| E::custom(format!("invalid numeric value {:?}", v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_numbers_and_numeric_strings() {
        let values: Vec<Amount> =
            serde_json::from_str(r#"[12, -3, 4.5, "150000", " 7.25 "]"#).unwrap();
        let raw: Vec<f64> = values.into_iter().map(Amount::value).collect();
        assert_eq!(raw, vec![12.0, -3.0, 4.5, 150000.0, 7.25]);
    }

    #[test]
    fn test_rejects_non_numeric_strings() {
        let result: Result<Amount, _> = serde_json::from_str(r#""twelve""#);
        assert!(result.is_err());

        let result: Result<Amount, _> = serde_json::from_str("true");
        assert!(result.is_err());
    }

    #[test]
    fn test_null_reads_as_absent() {
        let value: Option<Amount> = serde_json::from_str("null").unwrap();
        assert_eq!(or_zero(value), 0.0);
    }
}
