use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::validation::id_number::ID_LENGTH;
use crate::validation::phone::{MOBILE_LENGTH, MOBILE_PREFIX};
use crate::validation::{IdNumberValidator, PhoneValidator};

// A digit followed by target-1 ..= target+2 digits or spaces, on word boundaries
lazy_static! {
    static ref ID_NUMBER_RUN: Regex = Regex::new(r"\b[0-9][ 0-9]{8,11}\b").unwrap();
    static ref MOBILE_RUN: Regex = Regex::new(r"\b[0-9][ 0-9]{9,12}\b").unwrap();
}

/// The kind of number to dig out of raw OCR text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitTarget {
    IdNumber,
    Mobile,
}

impl DigitTarget {
    /// Number of digits a recovered value must have.
    pub fn digits(self) -> usize {
        match self {
            DigitTarget::IdNumber => ID_LENGTH,
            DigitTarget::Mobile => MOBILE_LENGTH,
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            DigitTarget::IdNumber => &ID_NUMBER_RUN,
            DigitTarget::Mobile => &MOBILE_RUN,
        }
    }

    fn accepts(self, number: &str) -> bool {
        if number.len() != self.digits() {
            return false;
        }
        match self {
            DigitTarget::IdNumber => IdNumberValidator::is_valid(number),
            DigitTarget::Mobile => {
                number.starts_with(MOBILE_PREFIX) && PhoneValidator::is_valid_mobile(number)
            }
        }
    }
}

/// Last-resort recovery of ID and mobile numbers straight from OCR text.
///
/// OCR tends to break digit runs with stray spaces and to double or triple
/// a digit. Candidates are normalised for both defects and the first one
/// that has the right length and passes its validator wins.
pub struct DigitRecovery;

impl DigitRecovery {
    /// Raw candidate runs in order of appearance.
    pub fn candidates(text: &str, target: DigitTarget) -> Vec<&str> {
        target
            .pattern()
            .find_iter(text)
            .map(|m| m.as_str())
            .collect()
    }

    /// Strip everything but digits, then collapse each run of a repeated
    /// digit to a single occurrence: `"11 33 777"` becomes `"137"`.
    pub fn normalize(raw: &str) -> String {
        let mut normalized = String::with_capacity(raw.len());
        let mut previous = None;
        for digit in raw.chars().filter(char::is_ascii_digit) {
            if previous != Some(digit) {
                normalized.push(digit);
            }
            previous = Some(digit);
        }
        normalized
    }

    pub fn recover(text: &str, target: DigitTarget) -> Option<String> {
        for raw in Self::candidates(text, target) {
            let number = Self::normalize(raw);
            if target.accepts(&number) {
                debug!("Recovered {:?} candidate '{}' from run '{}'", target, number, raw);
                return Some(number);
            }
            debug!("Rejected {:?} candidate '{}' from run '{}'", target, number, raw);
        }
        None
    }

    pub fn best_id_number(text: &str) -> Option<String> {
        Self::recover(text, DigitTarget::IdNumber)
    }

    pub fn best_mobile(text: &str) -> Option<String> {
        Self::recover(text, DigitTarget::Mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators_and_squashes_repeats() {
        assert_eq!(DigitRecovery::normalize("11 33 777"), "137");
        assert_eq!(DigitRecovery::normalize("113777"), "137");
        assert_eq!(DigitRecovery::normalize("12 34"), "1234");
        assert_eq!(DigitRecovery::normalize(""), "");
    }

    #[test]
    fn candidates_tolerate_spaces_inside_runs() {
        let text = "מספר זהות: 123 456 782\nתאריך";
        assert_eq!(
            DigitRecovery::candidates(text, DigitTarget::IdNumber),
            vec!["123 456 782"]
        );
    }

    #[test]
    fn trailing_space_before_a_word_stays_in_the_run() {
        assert_eq!(
            DigitRecovery::candidates("123456782 תאריך", DigitTarget::IdNumber),
            vec!["123456782 "]
        );
    }

    #[test]
    fn recovers_a_plain_id_number() {
        let text = "שם: ישראל ישראלי\nת.ז: 123456782\nכתובת: הרצל 1";
        assert_eq!(DigitRecovery::best_id_number(text), Some("123456782".to_string()));
    }

    #[test]
    fn recovers_an_id_number_with_doubled_digits() {
        // OCR doubled the leading 1 and the 5
        let text = "ת.ז: 11234556782";
        assert_eq!(DigitRecovery::best_id_number(text), Some("123456782".to_string()));
    }

    #[test]
    fn skips_failing_checksums_and_keeps_scanning() {
        let text = "123456789 and later 123456782";
        assert_eq!(DigitRecovery::best_id_number(text), Some("123456782".to_string()));
    }

    #[test]
    fn noisy_run_that_collapses_too_short_yields_nothing() {
        let text = "1 1 2 3 4 4 4 5 6 7";
        assert_eq!(DigitRecovery::best_id_number(text), None);
    }

    #[test]
    fn ten_digit_runs_are_not_id_numbers() {
        assert_eq!(DigitRecovery::best_id_number("טלפון 0501234567"), None);
    }

    #[test]
    fn recovers_mobile_numbers() {
        assert_eq!(
            DigitRecovery::best_mobile("נייד: 054 1234 567"),
            Some("0541234567".to_string())
        );
        assert_eq!(
            DigitRecovery::best_mobile("נייד: 05541234567"),
            Some("0541234567".to_string())
        );
    }

    #[test]
    fn mobile_candidates_need_the_05_prefix() {
        assert_eq!(DigitRecovery::best_mobile("קווי 0641234567"), None);
        assert_eq!(DigitRecovery::best_mobile("no digits here"), None);
    }

    #[test]
    fn digits_glued_to_letters_are_not_runs() {
        assert_eq!(DigitRecovery::best_id_number("abc123456782"), None);
    }
}
