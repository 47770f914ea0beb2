use log::debug;
use serde_json::{Map, Value};

use crate::models::schema::{join_path, SchemaField, SchemaNode};
use crate::models::{FieldValue, FormRecord};

/// Reconciles arbitrary model output against a schema template.
///
/// The walk is driven by the template, never by the source: unknown keys are
/// dropped, and a value of the wrong kind (text where a group is expected,
/// an object where a leaf is expected) is treated as absent.
pub struct TemplateMerge;

impl TemplateMerge {
    pub fn reconcile(template: &SchemaNode, source: &Value) -> FormRecord {
        FormRecord::from_fields(Self::reconcile_fields(template.fields(), source.as_object(), ""))
    }

    fn reconcile_fields(
        fields: &[SchemaField],
        source: Option<&Map<String, Value>>,
        prefix: &str,
    ) -> Vec<(String, FieldValue)> {
        if let Some(object) = source {
            for key in object.keys() {
                if !fields.iter().any(|field| field.key == key.as_str()) {
                    debug!("Dropping unexpected key '{}'", join_path(prefix, key));
                }
            }
        }

        fields
            .iter()
            .map(|field| {
                let value = source.and_then(|object| object.get(field.key));
                let reconciled = match field.node {
                    SchemaNode::Leaf => FieldValue::Text(Self::leaf_text(value)),
                    SchemaNode::Group(children) => FieldValue::Group(Self::reconcile_fields(
                        children,
                        value.and_then(Value::as_object),
                        &join_path(prefix, field.key),
                    )),
                };
                (field.key.to_string(), reconciled)
            })
            .collect()
    }

    // Scalars keep their JSON text; null, arrays and objects count as absent
    fn leaf_text(value: Option<&Value>) -> String {
        match value {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => String::new(),
        }
    }
}
