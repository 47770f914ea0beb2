//! Coercing free-form model output into a JSON object.
//!
//! Stage one runs an ordered list of extractors, each proposing the slice of
//! text that should hold the payload. Stage two parses a proposal strictly;
//! the first proposal that parses as a JSON object wins.

use log::debug;
use serde_json::{Map, Value};

use crate::utils::FormError;

const FENCE: &str = "```";
const EXCERPT_CHARS: usize = 120;

/// Proposes the part of a model response that should contain the JSON payload.
pub trait PayloadExtractor {
    fn name(&self) -> &'static str;
    fn extract<'a>(&self, response: &'a str) -> Option<&'a str>;
}

/// The whole response, when it already starts with `{`.
pub struct DirectObject;

/// The body of a fence opened with ```` ```json ````.
pub struct JsonFence;

/// The body of the first fence of any language; the tag line is skipped.
pub struct AnyFence;

/// The span from the first `{` to the last `}`.
pub struct BraceSpan;

impl PayloadExtractor for DirectObject {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn extract<'a>(&self, response: &'a str) -> Option<&'a str> {
        let trimmed = response.trim();
        if trimmed.starts_with('{') {
            Some(trimmed)
        } else {
            None
        }
    }
}

impl PayloadExtractor for JsonFence {
    fn name(&self) -> &'static str {
        "json-fence"
    }

    fn extract<'a>(&self, response: &'a str) -> Option<&'a str> {
        let opening = format!("{}json", FENCE);
        let start = response.find(&opening)? + opening.len();
        let body = &response[start..];
        let end = body.find(FENCE)?;
        Some(body[..end].trim())
    }
}

impl PayloadExtractor for AnyFence {
    fn name(&self) -> &'static str {
        "fence"
    }

    fn extract<'a>(&self, response: &'a str) -> Option<&'a str> {
        let start = response.find(FENCE)? + FENCE.len();
        let body = &response[start..];
        let end = body.find(FENCE)?;
        let body = &body[..end];
        // Skip a language tag such as `JSON` or `javascript` on the opening line
        let body = match body.find('\n') {
            Some(newline) if !body[..newline].contains('{') => &body[newline + 1..],
            _ => body,
        };
        Some(body.trim())
    }
}

impl PayloadExtractor for BraceSpan {
    fn name(&self) -> &'static str {
        "braces"
    }

    fn extract<'a>(&self, response: &'a str) -> Option<&'a str> {
        let start = response.find('{')?;
        let end = response.rfind('}')?;
        if end > start {
            Some(&response[start..=end])
        } else {
            None
        }
    }
}

/// Ordered extractor chain feeding a strict JSON parse.
pub struct ResponseParser {
    extractors: Vec<Box<dyn PayloadExtractor + Send + Sync>>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        ResponseParser {
            extractors: vec![
                Box::new(DirectObject),
                Box::new(JsonFence),
                Box::new(AnyFence),
                Box::new(BraceSpan),
            ],
        }
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&self, response: &str) -> Result<Map<String, Value>, FormError> {
        let mut last_error = None;
        for extractor in &self.extractors {
            let candidate = match extractor.extract(response) {
                Some(candidate) => candidate,
                None => continue,
            };
            match serde_json::from_str::<Value>(candidate) {
                Ok(Value::Object(object)) => {
                    debug!("Parsed model response with the '{}' extractor", extractor.name());
                    return Ok(object);
                }
                Ok(other) => {
                    last_error = Some(format!("'{}' payload is not an object: {}", extractor.name(), kind(&other)));
                }
                Err(err) => {
                    last_error = Some(format!("'{}' payload is not valid JSON: {}", extractor.name(), err));
                }
            }
        }

        let reason = last_error.unwrap_or_else(|| "no JSON payload found".to_string());
        Err(FormError::MalformedOutput(format!(
            "{} (response starts with: {:?})",
            reason,
            excerpt(response)
        )))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn excerpt(text: &str) -> String {
    text.trim().chars().take(EXCERPT_CHARS).collect()
}
