pub mod record;
pub mod report;
pub mod schema;

pub use record::{FieldValue, FormRecord};
pub use report::{ValidationIssue, ValidationIssueType, ValidationReport};
pub use schema::{SchemaField, SchemaNode, FORM_TEMPLATE};
