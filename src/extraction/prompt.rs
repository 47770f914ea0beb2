use crate::config::ExtractorConfig;
use crate::extraction::model::CompletionRequest;
use crate::models::schema::SchemaNode;
use crate::models::FormRecord;
use crate::processing::TemplateMerge;

pub const SYSTEM_INSTRUCTION: &str = "You are a JSON-generating assistant. Return only valid JSON with no extra explanation. \
Output must be enclosed in a triple backtick code block. \
Do NOT translate values; preserve them exactly as they appear (in Hebrew or English). \
Use the English field names given below, matching the structure exactly.";

/// Build the completion request for one form's OCR text.
pub fn build_request(template: &SchemaNode, ocr_text: &str, config: &ExtractorConfig) -> CompletionRequest {
    CompletionRequest {
        system: SYSTEM_INSTRUCTION.to_string(),
        user: render_user_prompt(template, ocr_text),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

pub fn render_user_prompt(template: &SchemaNode, ocr_text: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("Extract all fields from the form content below.\n");
    prompt.push_str("The form labels are in Hebrew. Map each label to its English key:\n");
    for (label, path) in template.labelled_paths() {
        prompt.push_str(&format!("- \"{}\" -> \"{}\"\n", label, path));
    }
    prompt.push_str("For date fields, use objects with \"day\", \"month\" and \"year\" keys (יום, חודש, שנה).\n");
    prompt.push_str("For \"idNumber\" and \"mobilePhone\", copy every digit exactly as it appears in the form.\n");
    prompt.push_str("The \"mobilePhone\" field must include its full prefix (e.g. \"05\").\n");
    prompt.push_str("Leave a field as an empty string when the form does not contain it.\n\n");

    prompt.push_str("JSON structure:\n");
    prompt.push_str(&empty_structure(template));
    prompt.push_str("\n\nOCR text:\n\"\"\"");
    prompt.push_str(ocr_text);
    prompt.push_str("\"\"\"\n\n");
    prompt.push_str("Return a JSON object with exactly this structure, wrapped in a code block.\n");
    prompt
}

fn empty_structure(template: &SchemaNode) -> String {
    let empty = TemplateMerge::reconcile(template, &serde_json::Value::Null);
    pretty(&empty)
}

fn pretty(record: &FormRecord) -> String {
    serde_json::to_string_pretty(record).unwrap_or_default()
}
