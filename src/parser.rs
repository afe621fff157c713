//! `security.txt` document parser.
//!
//! Turns raw bytes into a [`FieldMap`] following RFC 9116's relaxed rules:
//! the whole text is trimmed, split on `\n`, every line trimmed again,
//! blank lines and `#` comments skipped, and the remaining lines split on
//! their first `:`. Keys are case-insensitive and stored lowercase.
//!
//! A field seen once holds a scalar; the second occurrence promotes it to
//! a list and later occurrences append. Consumers therefore always branch
//! on [`FieldValue`].
//!
//! No field-level validation happens here (URI syntax of `Contact`, the
//! date in `Expires`, ...).

use std::collections::{BTreeMap, HashMap};

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::sources::RawDocument;

/// Value of a field: a single string, or every value in document order when
/// the field repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Add another occurrence, promoting a scalar to a two-element list.
    pub fn push(&mut self, value: impl Into<String>) {
        let value = value.into();
        match self {
            FieldValue::Scalar(first) => {
                let first = std::mem::take(first);
                *self = FieldValue::List(vec![first, value]);
            }
            FieldValue::List(values) => values.push(value),
        }
    }

    /// All values regardless of shape.
    pub fn as_slice(&self) -> &[String] {
        match self {
            FieldValue::Scalar(v) => std::slice::from_ref(v),
            FieldValue::List(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            FieldValue::Scalar(v) => vec![v],
            FieldValue::List(values) => values,
        }
    }
}

/// Parsed fields keyed by lowercase name, iterated in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
    index: HashMap<String, usize>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `key`. The key is lowercased before merging.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_lowercase();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1.push(value),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, FieldValue::Scalar(value.into())));
            }
        }
    }

    /// Lookup by name (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        let pos = match self.index.get(key) {
            Some(pos) => *pos,
            None => *self.index.get(&key.to_lowercase())?,
        };
        Some(&self.entries[pos].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl JsonSchema for FieldMap {
    fn schema_name() -> String {
        "FieldMap".to_owned()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <BTreeMap<String, FieldValue>>::json_schema(generator)
    }
}

/// Parse raw document bytes.
///
/// Returns `None` when the bytes are not valid UTF-8. Lines lacking a `:`
/// are skipped and reported to `sink`; they never abort the parse.
pub fn parse(raw: &[u8], sink: &dyn DiagnosticSink) -> Option<FieldMap> {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            sink.record(Diagnostic::DecodeFailure {
                valid_up_to: e.valid_up_to(),
            });
            return None;
        }
    };

    let mut fields = FieldMap::new();
    for line in text.trim().split('\n') {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            sink.record(Diagnostic::MalformedLine {
                line: line.to_string(),
            });
            continue;
        };
        fields.insert(key, value.trim());
    }
    Some(fields)
}

/// Parse a fetched or loaded document.
pub fn parse_document(document: &RawDocument, sink: &dyn DiagnosticSink) -> Option<FieldMap> {
    parse(document.bytes(), sink)
}
