use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request body of the "update book" operation.
///
/// Serialized as `{"authorName": ..., "title": ..., "price": ...}` with the
/// price written as an exact JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookDto {
    /// Name of the book's author
    pub author_name: String,
    /// Title of the book
    pub title: String,
    /// Price as an exact currency amount, two decimal places in practice
    #[serde(with = "super::price")]
    pub price: Decimal,
}

impl UpdateBookDto {
    pub fn new(author_name: impl Into<String>, title: impl Into<String>, price: Decimal) -> Self {
        Self {
            author_name: author_name.into(),
            title: title.into(),
            price,
        }
    }
}

/// JSON value kinds the codec distinguishes when reporting mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonKind::Null,
            serde_json::Value::Bool(_) => JsonKind::Bool,
            serde_json::Value::Number(_) => JsonKind::Number,
            serde_json::Value::String(_) => JsonKind::String,
            serde_json::Value::Array(_) => JsonKind::Array,
            serde_json::Value::Object(_) => JsonKind::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}

impl std::fmt::Display for JsonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One wire member of [`UpdateBookDto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: JsonKind,
}

pub const AUTHOR_NAME: &str = "authorName";
pub const TITLE: &str = "title";
pub const PRICE: &str = "price";

/// Wire schema of [`UpdateBookDto`], in serialization order.
pub const FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        name: AUTHOR_NAME,
        kind: JsonKind::String,
    },
    FieldSpec {
        name: TITLE,
        kind: JsonKind::String,
    },
    FieldSpec {
        name: PRICE,
        kind: JsonKind::Number,
    },
];
