//! JSON codec for [`UpdateBookDto`].
//!
//! Decoding validates the document shape field by field before building the
//! record, so callers get a typed error naming the offending member instead of
//! a parser message. The codec holds no state and never logs.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

use bookservice_kernel::settings::CodecSettings;

use super::models::{JsonKind, UpdateBookDto, AUTHOR_NAME, PRICE, TITLE};
use super::price;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode book update: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("malformed JSON: {0}")]
    Decoding(#[source] serde_json::Error),

    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: JsonKind },

    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` must be a {expected}, found {found}")]
    TypeMismatch {
        field: &'static str,
        expected: JsonKind,
        found: JsonKind,
    },

    #[error("field `price` is not an exact decimal: {value}")]
    InvalidPrice {
        value: String,
        #[source]
        source: rust_decimal::Error,
    },
}

impl CodecError {
    /// Wire member the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CodecError::MissingField { field } | CodecError::TypeMismatch { field, .. } => {
                Some(*field)
            }
            CodecError::InvalidPrice { .. } => Some(PRICE),
            CodecError::Encoding(_) | CodecError::Decoding(_) | CodecError::NotAnObject { .. } => {
                None
            }
        }
    }

    /// Stable snake_case label for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CodecError::Encoding(_) => "encoding_error",
            CodecError::Decoding(_) => "decoding_error",
            CodecError::NotAnObject { .. } => "not_an_object",
            CodecError::MissingField { .. } => "missing_field",
            CodecError::TypeMismatch { .. } => "type_mismatch",
            CodecError::InvalidPrice { .. } => "invalid_price",
        }
    }
}

/// Knobs for [`BookCodec`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    /// Accept a string-encoded `price` such as `"29.99"`. Off by default.
    pub accept_string_price: bool,
}

impl From<&CodecSettings> for CodecOptions {
    fn from(settings: &CodecSettings) -> Self {
        Self {
            accept_string_price: settings.accept_string_price,
        }
    }
}

/// Converts [`UpdateBookDto`] to and from its JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookCodec {
    options: CodecOptions,
}

impl BookCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Encode a record as compact JSON with members in schema order.
    pub fn encode(&self, dto: &UpdateBookDto) -> Result<String, CodecError> {
        serde_json::to_string(dto).map_err(CodecError::Encoding)
    }

    /// Decode a record, checking presence and kind of every member in wire
    /// order (`authorName`, `title`, `price`).
    ///
    /// Unknown members are ignored.
    pub fn decode(&self, text: &str) -> Result<UpdateBookDto, CodecError> {
        let value: Value = serde_json::from_str(text).map_err(CodecError::Decoding)?;
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(CodecError::NotAnObject {
                    found: JsonKind::of(&other),
                })
            }
        };

        let author_name = take_string(&mut object, AUTHOR_NAME)?;
        let title = take_string(&mut object, TITLE)?;
        let price = self.take_price(&mut object)?;

        Ok(UpdateBookDto {
            author_name,
            title,
            price,
        })
    }

    fn take_price(&self, object: &mut Map<String, Value>) -> Result<Decimal, CodecError> {
        let text = match take_member(object, PRICE)? {
            Value::Number(number) => number.to_string(),
            Value::String(text) if self.options.accept_string_price => text,
            other => return Err(type_mismatch(PRICE, JsonKind::Number, &other)),
        };
        price::parse_decimal(&text).map_err(|source| CodecError::InvalidPrice {
            value: text,
            source,
        })
    }
}

fn take_member(object: &mut Map<String, Value>, field: &'static str) -> Result<Value, CodecError> {
    object
        .remove(field)
        .ok_or(CodecError::MissingField { field })
}

fn take_string(object: &mut Map<String, Value>, field: &'static str) -> Result<String, CodecError> {
    match take_member(object, field)? {
        Value::String(text) => Ok(text),
        other => Err(type_mismatch(field, JsonKind::String, &other)),
    }
}

fn type_mismatch(field: &'static str, expected: JsonKind, found: &Value) -> CodecError {
    CodecError::TypeMismatch {
        field,
        expected,
        found: JsonKind::of(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IVAN: &str = r#"{"authorName":"Ivan Franchin","title":"Springboot","price":29.99}"#;

    fn ivan() -> UpdateBookDto {
        UpdateBookDto::new("Ivan Franchin", "Springboot", Decimal::new(2999, 2))
    }

    fn lenient() -> BookCodec {
        BookCodec::new(CodecOptions {
            accept_string_price: true,
        })
    }

    #[test]
    fn encodes_exact_wire_form() {
        let encoded = BookCodec::default().encode(&ivan()).unwrap();
        assert_eq!(encoded, IVAN);
    }

    #[test]
    fn decodes_exact_price() {
        let dto = BookCodec::default().decode(IVAN).unwrap();
        assert_eq!(dto.author_name, "Ivan Franchin");
        assert_eq!(dto.title, "Springboot");
        assert_eq!(dto.price, Decimal::new(2999, 2));
        assert_eq!(dto.price.to_string(), "29.99");
    }

    #[test]
    fn preserves_trailing_zero_scale() {
        let codec = BookCodec::default();
        let text = r#"{"authorName":"A","title":"T","price":10.50}"#;
        let dto = codec.decode(text).unwrap();
        assert_eq!(dto.price.scale(), 2);
        assert_eq!(codec.encode(&dto).unwrap(), text);
    }

    #[test]
    fn missing_price_is_reported() {
        let err = BookCodec::default()
            .decode(r#"{"authorName":"Ivan Franchin","title":"Springboot"}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingField { field: "price" }));
        assert_eq!(err.to_string(), "missing field `price`");
    }

    #[test]
    fn string_price_is_a_type_mismatch_by_default() {
        let err = BookCodec::default()
            .decode(r#"{"authorName":"Ivan Franchin","title":"Springboot","price":"29.99"}"#)
            .unwrap_err();
        match err {
            CodecError::TypeMismatch {
                field,
                expected,
                found,
            } => {
                assert_eq!(field, "price");
                assert_eq!(expected, JsonKind::Number);
                assert_eq!(found, JsonKind::String);
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn string_price_is_coerced_when_enabled() {
        let dto = lenient()
            .decode(r#"{"authorName":"Ivan Franchin","title":"Springboot","price":"29.99"}"#)
            .unwrap();
        assert_eq!(dto, ivan());
        // Output is always the numeric form.
        assert_eq!(lenient().encode(&dto).unwrap(), IVAN);
    }

    #[test]
    fn coerced_string_must_still_be_a_decimal() {
        let err = lenient()
            .decode(r#"{"authorName":"A","title":"T","price":"cheap"}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidPrice { ref value, .. } if value == "cheap"));
    }

    #[test]
    fn lenient_mode_only_applies_to_price() {
        let err = lenient()
            .decode(r#"{"authorName":7,"title":"T","price":"1.00"}"#)
            .unwrap_err();
        assert_eq!(err.field(), Some("authorName"));
        assert_eq!(err.kind(), "type_mismatch");
    }

    #[test]
    fn null_member_is_a_type_mismatch() {
        let err = BookCodec::default()
            .decode(r#"{"authorName":null,"title":"T","price":1}"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "field `authorName` must be a string, found null"
        );
    }

    #[test]
    fn malformed_text_is_a_decoding_error() {
        let err = BookCodec::default()
            .decode(r#"{"authorName":"A","title":"T","price":}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::Decoding(_)));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = BookCodec::default().decode("[29.99]").unwrap_err();
        assert!(matches!(
            err,
            CodecError::NotAnObject {
                found: JsonKind::Array
            }
        ));
    }

    #[test]
    fn unknown_members_are_ignored() {
        let dto = BookCodec::default()
            .decode(r#"{"id":"b-1","authorName":"Ivan Franchin","title":"Springboot","price":29.99}"#)
            .unwrap();
        assert_eq!(dto, ivan());
    }

    #[test]
    fn exponent_price_decodes_exactly() {
        let dto = BookCodec::default()
            .decode(r#"{"authorName":"A","title":"T","price":2.999e1}"#)
            .unwrap();
        assert_eq!(dto.price, Decimal::new(2999, 2));
    }

    #[test]
    fn over_precise_price_is_rejected() {
        let err = BookCodec::default()
            .decode(r#"{"authorName":"A","title":"T","price":0.12345678901234567890123456789012}"#)
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_price");
        assert_eq!(err.field(), Some("price"));
    }

    #[test]
    fn over_precise_exponent_price_is_rejected() {
        let err = BookCodec::default()
            .decode(r#"{"authorName":"A","title":"T","price":0.12345678901234567890123456789012e0}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidPrice { .. }));
        assert_eq!(err.field(), Some("price"));
    }

    #[test]
    fn zero_with_exponent_decodes_to_zero() {
        let codec = BookCodec::default();
        for price in ["0e100", "0e-100"] {
            let text = format!(r#"{{"authorName":"A","title":"T","price":{price}}}"#);
            assert!(codec.decode(&text).unwrap().price.is_zero());
        }
    }

    #[test]
    fn coerced_string_must_be_json_number_syntax() {
        for price in ["1_000.00", " 29.99 ", "+29.99"] {
            let text = format!(r#"{{"authorName":"A","title":"T","price":"{price}"}}"#);
            let err = lenient().decode(&text).unwrap_err();
            assert_eq!(err.kind(), "invalid_price", "accepted {price:?}");
        }
    }

    #[test]
    fn members_are_checked_in_wire_order() {
        let err = BookCodec::default()
            .decode(r#"{"title":5}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingField { field: "authorName" }));

        let err = BookCodec::default()
            .decode(r#"{"authorName":"A","title":5}"#)
            .unwrap_err();
        assert_eq!(err.field(), Some("title"));
        assert_eq!(err.kind(), "type_mismatch");
    }

    #[test]
    fn large_price_survives_without_float_rounding() {
        let codec = BookCodec::default();
        let text = r#"{"authorName":"A","title":"T","price":12345678901234567.89}"#;
        let dto = codec.decode(text).unwrap();
        assert_eq!(dto.price.to_string(), "12345678901234567.89");
        assert_eq!(codec.encode(&dto).unwrap(), text);
    }

    #[test]
    fn options_follow_settings() {
        let settings = CodecSettings {
            accept_string_price: true,
        };
        let codec = BookCodec::new(CodecOptions::from(&settings));
        assert!(codec.options().accept_string_price);
    }
}
