//! Object Mapper Module
//!
//! Bidirectional conversion between typed records and the plain JSON
//! documents the table store persists.
//!
//! ## Responsibilities
//! - `to_document`: typed record → plain document, nested records recursively
//! - `from_document`: plain document → typed record, via per-field setters
//! - Skip JS-prototype-polluting keys on the way in
//!
//! ## Field Registration
//! There is no runtime introspection. Each record type declares an ordered
//! table of `(name, get, set)` bindings via the [`Record`] trait; document
//! keys are the registered names directly (lowerCamelCase by convention, to
//! match documents written by the original JavaScript tooling). Owned Rust
//! values cannot form cycles, so recursion over nested records always
//! terminates.
//!
//! ```
//! use testdb::{mapper, FieldBinding, FieldValue, Record};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Record for User {
//!     fn fields() -> &'static [FieldBinding<Self>] {
//!         const FIELDS: &[FieldBinding<User>] = &[
//!             FieldBinding {
//!                 name: "id",
//!                 get: |u| FieldValue::plain(u.id.clone()),
//!                 set: |u, v| {
//!                     u.id = v.into_string("id")?;
//!                     Ok(())
//!                 },
//!             },
//!             FieldBinding {
//!                 name: "name",
//!                 get: |u| FieldValue::plain(u.name.clone()),
//!                 set: |u, v| {
//!                     u.name = v.into_string("name")?;
//!                     Ok(())
//!                 },
//!             },
//!         ];
//!         FIELDS
//!     }
//! }
//!
//! let user = User { id: "1".into(), name: "Ada".into() };
//! let doc = mapper::to_document(&user);
//! let back: User = mapper::from_document(&doc).unwrap();
//! assert_eq!(back, user);
//! ```

use serde_json::Value;

use crate::error::{Result, TestDbError};
use crate::store::Document;

/// Document keys that are never applied to a record.
///
/// These are the JS prototype-polluting keys; documents produced by the
/// original JavaScript tooling may carry them and they must not reach a
/// setter.
const SKIPPED_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

/// A field's value in document form: either a plain JSON value stored
/// verbatim, or a nested record already mapped to a document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Plain(Value),
    Nested(Document),
}

impl FieldValue {
    /// A plain value, stored verbatim under the field's name.
    pub fn plain(value: impl Into<Value>) -> Self {
        Self::Plain(value.into())
    }

    /// A nested typed record, mapped to a document recursively.
    pub fn nested<R: Record>(record: &R) -> Self {
        Self::Nested(to_document(record))
    }

    /// Collapse into a single JSON value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Plain(value) => value,
            Self::Nested(doc) => Value::Object(doc),
        }
    }

    /// Extract a string, for setters of string-typed fields.
    pub fn into_string(self, field: &str) -> Result<String> {
        match self.into_value() {
            Value::String(s) => Ok(s),
            other => Err(type_mismatch(field, "a string", &other)),
        }
    }

    /// Extract an integer, for setters of integer-typed fields.
    pub fn into_i64(self, field: &str) -> Result<i64> {
        match self.into_value() {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| type_mismatch(field, "an integer", &Value::Number(n.clone()))),
            other => Err(type_mismatch(field, "an integer", &other)),
        }
    }

    /// Extract a boolean, for setters of bool-typed fields.
    pub fn into_bool(self, field: &str) -> Result<bool> {
        match self.into_value() {
            Value::Bool(b) => Ok(b),
            other => Err(type_mismatch(field, "a boolean", &other)),
        }
    }

    /// Rebuild a nested typed record, for setters of record-typed fields.
    pub fn into_record<R: Record>(self, field: &str) -> Result<R> {
        match self {
            Self::Nested(doc) => from_document(&doc),
            Self::Plain(Value::Object(doc)) => from_document(&doc),
            Self::Plain(other) => Err(type_mismatch(field, "a nested document", &other)),
        }
    }
}

fn type_mismatch(field: &str, expected: &str, got: &Value) -> TestDbError {
    TestDbError::Validation(format!(
        "field '{}' expects {}, got {}",
        field, expected, got
    ))
}

/// One field of a record type: its document key plus accessor and mutator.
pub struct FieldBinding<R> {
    /// Document key for this field
    pub name: &'static str,

    /// Read the field's current value in document form
    pub get: fn(&R) -> FieldValue,

    /// Write a document value back into the field
    pub set: fn(&mut R, FieldValue) -> Result<()>,
}

/// A type that can be stored through the mapper.
///
/// The bindings are the load-bearing contract: `to_document` and
/// `from_document` only touch what is registered here, in declaration
/// order.
pub trait Record: Default + 'static {
    /// Ordered field table for this type.
    fn fields() -> &'static [FieldBinding<Self>]
    where
        Self: Sized;
}

/// The registered field names of a record type, in declaration order.
pub fn properties_of<R: Record>() -> Vec<&'static str> {
    R::fields().iter().map(|b| b.name).collect()
}

/// Map a typed record to a plain document.
///
/// Plain field values are stored verbatim; nested records arrive already
/// mapped by their own binding (see [`FieldValue::nested`]).
pub fn to_document<R: Record>(record: &R) -> Document {
    let mut doc = Document::new();
    for binding in R::fields() {
        doc.insert(binding.name.to_string(), (binding.get)(record).into_value());
    }
    doc
}

/// Rebuild a typed record from a plain document.
///
/// Starts from `R::default()` and applies each document key through the
/// matching binding's setter. Keys with no binding are ignored; the JS
/// prototype-polluting keys are skipped unconditionally. JSON objects are
/// handed to setters as nested documents.
pub fn from_document<R: Record>(document: &Document) -> Result<R> {
    let mut record = R::default();
    for (key, value) in document {
        if SKIPPED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let binding = match R::fields().iter().find(|b| b.name == key) {
            Some(binding) => binding,
            None => continue,
        };
        let field = match value {
            Value::Object(map) => FieldValue::Nested(map.clone()),
            other => FieldValue::Plain(other.clone()),
        };
        (binding.set)(&mut record, field)?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Author {
        name: String,
        verified: bool,
    }

    impl Record for Author {
        fn fields() -> &'static [FieldBinding<Self>] {
            const FIELDS: &[FieldBinding<Author>] = &[
                FieldBinding {
                    name: "name",
                    get: |a| FieldValue::plain(a.name.clone()),
                    set: |a, v| {
                        a.name = v.into_string("name")?;
                        Ok(())
                    },
                },
                FieldBinding {
                    name: "verified",
                    get: |a| FieldValue::plain(a.verified),
                    set: |a, v| {
                        a.verified = v.into_bool("verified")?;
                        Ok(())
                    },
                },
            ];
            FIELDS
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Question {
        id: String,
        text: String,
        votes: i64,
        author: Author,
    }

    impl Record for Question {
        fn fields() -> &'static [FieldBinding<Self>] {
            const FIELDS: &[FieldBinding<Question>] = &[
                FieldBinding {
                    name: "id",
                    get: |q| FieldValue::plain(q.id.clone()),
                    set: |q, v| {
                        q.id = v.into_string("id")?;
                        Ok(())
                    },
                },
                FieldBinding {
                    name: "text",
                    get: |q| FieldValue::plain(q.text.clone()),
                    set: |q, v| {
                        q.text = v.into_string("text")?;
                        Ok(())
                    },
                },
                FieldBinding {
                    name: "votes",
                    get: |q| FieldValue::plain(q.votes),
                    set: |q, v| {
                        q.votes = v.into_i64("votes")?;
                        Ok(())
                    },
                },
                FieldBinding {
                    name: "author",
                    get: |q| FieldValue::nested(&q.author),
                    set: |q, v| {
                        q.author = v.into_record("author")?;
                        Ok(())
                    },
                },
            ];
            FIELDS
        }
    }

    fn sample() -> Question {
        Question {
            id: "42".to_string(),
            text: "Why?".to_string(),
            votes: 7,
            author: Author {
                name: "Ada".to_string(),
                verified: true,
            },
        }
    }

    #[test]
    fn properties_follow_declaration_order() {
        assert_eq!(
            properties_of::<Question>(),
            vec!["id", "text", "votes", "author"]
        );
    }

    #[test]
    fn to_document_nests_typed_fields() {
        let doc = to_document(&sample());
        assert_eq!(doc.get("id"), Some(&json!("42")));
        assert_eq!(doc.get("votes"), Some(&json!(7)));
        assert_eq!(
            doc.get("author"),
            Some(&json!({"name": "Ada", "verified": true}))
        );
    }

    #[test]
    fn round_trip_reconstructs_nested_records() {
        let original = sample();
        let rebuilt: Question = from_document(&to_document(&original)).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut doc = to_document(&sample());
        doc.insert("extra".to_string(), json!("noise"));
        let rebuilt: Question = from_document(&doc).unwrap();
        assert_eq!(rebuilt, sample());
    }

    #[test]
    fn prototype_polluting_keys_are_skipped() {
        let mut doc = to_document(&sample());
        doc.insert("__proto__".to_string(), json!({"admin": true}));
        doc.insert("constructor".to_string(), json!({}));
        let rebuilt: Question = from_document(&doc).unwrap();
        assert_eq!(rebuilt, sample());
    }

    #[test]
    fn type_mismatch_is_a_validation_error() {
        let mut doc = to_document(&sample());
        doc.insert("votes".to_string(), json!("not a number"));
        let err = from_document::<Question>(&doc).unwrap_err();
        assert!(matches!(err, TestDbError::Validation(_)));
    }
}
