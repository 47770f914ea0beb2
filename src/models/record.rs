use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::models::schema::{join_path, FORM_TEMPLATE};
use crate::processing::TemplateMerge;

/// A value inside an extraction record: leaf text or a keyed group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Group(Vec<(String, FieldValue)>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Group(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Group(entries) => Value::Object(entries_to_json(entries)),
        }
    }
}

/// A claim form populated from OCR text. Always congruent with the schema
/// template: records are only built through `TemplateMerge`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    fields: Vec<(String, FieldValue)>,
}

impl FormRecord {
    pub(crate) fn from_fields(fields: Vec<(String, FieldValue)>) -> Self {
        FormRecord { fields }
    }

    /// Record with every leaf of the form template left empty.
    pub fn empty() -> Self {
        Self::from_json(&Value::Object(Map::new()))
    }

    /// Force an arbitrary JSON value into the form template's shape.
    pub fn from_json(value: &Value) -> Self {
        TemplateMerge::reconcile(&FORM_TEMPLATE, value)
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Look up a value by dotted path, e.g. `address.city`.
    pub fn get(&self, path: &str) -> Option<&FieldValue> {
        let mut entries = self.fields.as_slice();
        let mut found = None;
        for segment in path.split('.') {
            let (_, value) = entries.iter().find(|(key, _)| key.as_str() == segment)?;
            entries = match value {
                FieldValue::Group(children) => children.as_slice(),
                FieldValue::Text(_) => &[],
            };
            found = Some(value);
        }
        found
    }

    /// Leaf text at `path`, or the empty string when absent or a group.
    pub fn text(&self, path: &str) -> &str {
        self.get(path).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Replace the text of an existing leaf. Returns false when `path` does
    /// not name a leaf, in which case the record is left untouched.
    pub fn set_text(&mut self, path: &str, value: impl Into<String>) -> bool {
        match find_mut(&mut self.fields, path) {
            Some(FieldValue::Text(text)) => {
                *text = value.into();
                true
            }
            _ => false,
        }
    }

    /// Every leaf as (dotted path, text), in template order.
    pub fn leaves(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        collect_leaves(&self.fields, "", &mut out);
        out
    }

    pub fn to_json(&self) -> Value {
        Value::Object(entries_to_json(&self.fields))
    }
}

fn entries_to_json(entries: &[(String, FieldValue)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect()
}

fn find_mut<'a>(entries: &'a mut [(String, FieldValue)], path: &str) -> Option<&'a mut FieldValue> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let entry = entries.iter_mut().find(|entry| entry.0 == head)?;
    match (rest, &mut entry.1) {
        (None, value) => Some(value),
        (Some(rest), FieldValue::Group(children)) => find_mut(children, rest),
        (Some(_), FieldValue::Text(_)) => None,
    }
}

fn collect_leaves<'a>(entries: &'a [(String, FieldValue)], prefix: &str, out: &mut Vec<(String, &'a str)>) {
    for (key, value) in entries {
        let path = join_path(prefix, key);
        match value {
            FieldValue::Text(text) => out.push((path, text.as_str())),
            FieldValue::Group(children) => collect_leaves(children, &path, out),
        }
    }
}

fn serialize_entries<S: Serializer>(entries: &[(String, FieldValue)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::Group(entries) => serialize_entries(entries, serializer),
        }
    }
}

impl Serialize for FormRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_entries(&self.fields, serializer)
    }
}
