use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::WidgetConfigError;

/// Maximum identifier length (PostgreSQL NAMEDATALEN - 1)
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Validated SQL identifier (table or column name)
///
/// Only letters, digits, `_`, `$` and inner spaces are accepted; the first
/// character must be a letter or `_`. Rendering always double-quotes the
/// name, so a validated identifier can never break out of its quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(raw: &str) -> Result<Self, WidgetConfigError> {
        let invalid = || WidgetConfigError::InvalidIdentifier(raw.to_string());

        if raw.is_empty() || raw.chars().count() > MAX_IDENTIFIER_LEN {
            return Err(invalid());
        }
        if raw.trim() != raw {
            return Err(invalid());
        }

        let mut chars = raw.chars();
        let first = chars.next().ok_or_else(invalid)?;
        if !(first.is_alphabetic() || first == '_') {
            return Err(invalid());
        }
        if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == ' ') {
            return Err(invalid());
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for SQL text
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = WidgetConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_accented_names() {
        assert!(Identifier::parse("monto").is_ok());
        assert!(Identifier::parse("_id").is_ok());
        assert!(Identifier::parse("fecha venta").is_ok());
        assert!(Identifier::parse("año").is_ok());
        assert!(Identifier::parse("total$2024").is_ok());
    }

    #[test]
    fn rejects_injection_attempts() {
        for raw in [
            "",
            "monto\"; DROP TABLE ventas; --",
            "a\"b",
            "1abc",
            " monto",
            "monto ",
            "a;b",
            "a.b",
            "a\nb",
            "a)--",
        ] {
            assert!(Identifier::parse(raw).is_err(), "{raw:?} must be rejected");
        }
    }

    #[test]
    fn rejects_too_long_names() {
        let long = "a".repeat(MAX_IDENTIFIER_LEN + 1);
        assert!(Identifier::parse(&long).is_err());
        let max = "a".repeat(MAX_IDENTIFIER_LEN);
        assert!(Identifier::parse(&max).is_ok());
    }

    #[test]
    fn quotes_on_render() {
        let id = Identifier::parse("monto").unwrap();
        assert_eq!(id.quoted(), "\"monto\"");
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<Identifier, _> = serde_json::from_str("\"ventas\"");
        assert!(ok.is_ok());
        let bad: Result<Identifier, _> = serde_json::from_str("\"ven\\\"tas\"");
        assert!(bad.is_err());
    }
}
