use log::info;

use crate::models::schema::{ID_NUMBER, MOBILE_PHONE};
use crate::models::FormRecord;
use crate::validation::id_number::ID_LENGTH;
use crate::validation::phone::MOBILE_PREFIX;
use crate::validation::PhoneValidator;

/// A single repair applied to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub field: &'static str,
    pub before: String,
    pub after: String,
}

/// FieldCorrection repairs systematic mistakes seen in extracted claim forms.
/// Both repairs are narrow and independent of each other.
pub struct FieldCorrection;

impl FieldCorrection {
    /// Apply every known repair to `record`, returning what was changed.
    pub fn apply(record: &mut FormRecord) -> Vec<Correction> {
        let mut corrections = Vec::new();

        let fixes: [(&'static str, fn(&str) -> Option<String>); 2] = [
            (ID_NUMBER, Self::fix_id_number),
            (MOBILE_PHONE, Self::fix_mobile),
        ];
        for &(field, fix) in fixes.iter() {
            let before = record.text(field).to_string();
            if let Some(after) = fix(&before) {
                record.set_text(field, after.clone());
                corrections.push(Correction {
                    field,
                    before,
                    after,
                });
            }
        }

        for correction in &corrections {
            info!(
                "Corrected {}: '{}' -> '{}'",
                correction.field, correction.before, correction.after
            );
        }

        corrections
    }

    /// An ID that is exactly one digit short lost its leading zero.
    /// Anything else (wrong length, non-digits) is left for the validator.
    pub fn fix_id_number(value: &str) -> Option<String> {
        if value.len() == ID_LENGTH - 1 && value.bytes().all(|b| b.is_ascii_digit()) {
            Some(format!("0{}", value))
        } else {
            None
        }
    }

    /// Restore a dropped `05` mobile prefix. Only all-digit values are touched;
    /// anything with spaces, dashes or letters is left for the validator.
    /// Leading zeros are stripped first; when the remaining digits already
    /// begin with the `5`, only the zero is restored.
    pub fn fix_mobile(value: &str) -> Option<String> {
        if value.is_empty()
            || value.starts_with(MOBILE_PREFIX)
            || PhoneValidator::is_valid_mobile(value)
            || !value.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let digits = value.trim_start_matches('0');
        if digits.is_empty() {
            return None;
        }

        let zero_restored = format!("0{}", digits);
        if PhoneValidator::is_valid_mobile(&zero_restored) {
            Some(zero_restored)
        } else {
            Some(format!("{}{}", MOBILE_PREFIX, digits))
        }
    }
}
