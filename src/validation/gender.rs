/// Accepted gender tokens, Hebrew and English.
pub const GENDER_TOKENS: [&str; 4] = ["זכר", "נקבה", "Male", "Female"];

pub struct GenderValidator;

impl GenderValidator {
    /// An empty value is "missing", not invalid; that case is reported elsewhere.
    pub fn is_valid(value: &str) -> bool {
        value.is_empty() || GENDER_TOKENS.contains(&value)
    }

    /// The canonical token for a near miss such as `" male "` or `"FEMALE"`.
    pub fn suggest(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        GENDER_TOKENS
            .iter()
            .find(|token| token.to_lowercase() == trimmed.to_lowercase())
            .map(|token| token.to_string())
    }
}
