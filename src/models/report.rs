use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssueType {
    /// The leaf was left empty.
    Missing,
    /// The value is present but fails its format or checksum rule.
    InvalidFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub issue_type: ValidationIssueType,
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn missing() -> Self {
        ValidationIssue {
            issue_type: ValidationIssueType::Missing,
            message: "Missing value".to_string(),
            suggestion: None,
        }
    }

    pub fn invalid(message: &str) -> Self {
        ValidationIssue {
            issue_type: ValidationIssueType::InvalidFormat,
            message: message.to_string(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }
}

/// Field path → issues found for that field. Built fresh per validation;
/// issues are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    issues: BTreeMap<String, Vec<ValidationIssue>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, issue: ValidationIssue) {
        self.issues.entry(path.into()).or_default().push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of distinct field paths with at least one issue.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn get(&self, path: &str) -> Option<&[ValidationIssue]> {
        self.issues.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.issues.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValidationIssue])> {
        self.issues
            .iter()
            .map(|(path, issues)| (path.as_str(), issues.as_slice()))
    }
}
