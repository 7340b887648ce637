//! Scalar binding: raw annotation text to a typed value

use thiserror::Error;

use crate::schema::{Scalar, ScalarKind};

/// A value was found but could not be converted. Never surfaced to callers;
/// the walker logs it and leaves the field at its zero value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot bind {raw:?} as {kind}")]
pub struct ConversionSkip {
    pub raw: String,
    pub kind: ScalarKind,
}

/// Convert `raw` into a value of `kind`.
///
/// Text is taken verbatim. Integers are parsed as base-10 with an optional
/// sign; surrounding whitespace is not accepted.
pub fn bind(raw: &str, kind: ScalarKind) -> Result<Scalar, ConversionSkip> {
    match kind {
        ScalarKind::Text => Ok(Scalar::Text(raw.to_string())),
        ScalarKind::Integer => raw
            .parse::<i64>()
            .map(Scalar::Integer)
            .map_err(|_| ConversionSkip {
                raw: raw.to_string(),
                kind,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(
            bind("  Hello, <World> ", ScalarKind::Text),
            Ok(Scalar::Text("  Hello, <World> ".to_string()))
        );
        assert_eq!(bind("", ScalarKind::Text), Ok(Scalar::Text(String::new())));
    }

    #[test]
    fn test_integer_parsing() {
        assert_eq!(bind("1200", ScalarKind::Integer), Ok(Scalar::Integer(1200)));
        assert_eq!(bind("-3", ScalarKind::Integer), Ok(Scalar::Integer(-3)));
        assert_eq!(bind("+7", ScalarKind::Integer), Ok(Scalar::Integer(7)));
    }

    #[test]
    fn test_integer_skip() {
        for raw in ["", "12px", "1.5", " 10", "ten", "99999999999999999999"] {
            let skip = bind(raw, ScalarKind::Integer).unwrap_err();
            assert_eq!(skip.raw, raw);
            assert_eq!(skip.kind, ScalarKind::Integer);
        }
    }

    #[test]
    fn test_skip_message() {
        let skip = bind("wide", ScalarKind::Integer).unwrap_err();
        assert_eq!(skip.to_string(), r#"cannot bind "wide" as integer"#);
    }
}
