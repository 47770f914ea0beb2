/// Israeli phone number formats.
pub struct PhoneValidator;

pub const MOBILE_LENGTH: usize = 10;
pub const MOBILE_PREFIX: &str = "05";
pub const LANDLINE_LENGTH: usize = 9;

impl PhoneValidator {
    /// Exactly ten digits starting with `05`.
    pub fn is_valid_mobile(phone: &str) -> bool {
        phone.len() == MOBILE_LENGTH
            && phone.bytes().all(|b| b.is_ascii_digit())
            && phone.starts_with(MOBILE_PREFIX)
    }

    /// Exactly nine digits: a leading `0` followed by an area digit 2–9.
    pub fn is_valid_landline(phone: &str) -> bool {
        let bytes = phone.as_bytes();
        bytes.len() == LANDLINE_LENGTH
            && bytes.iter().all(u8::is_ascii_digit)
            && bytes[0] == b'0'
            && (b'2'..=b'9').contains(&bytes[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_requires_prefix_and_length() {
        assert!(PhoneValidator::is_valid_mobile("0541234567"));
        assert!(!PhoneValidator::is_valid_mobile("541234567"));
        assert!(!PhoneValidator::is_valid_mobile("05412345678"));
        assert!(!PhoneValidator::is_valid_mobile("0641234567"));
        assert!(!PhoneValidator::is_valid_mobile("054-1234567"));
        assert!(!PhoneValidator::is_valid_mobile(""));
    }

    #[test]
    fn landline_excludes_00_and_01_prefixes() {
        assert!(PhoneValidator::is_valid_landline("031234567"));
        assert!(PhoneValidator::is_valid_landline("098765432"));
        assert!(!PhoneValidator::is_valid_landline("011234567"));
        assert!(!PhoneValidator::is_valid_landline("001234567"));
        assert!(!PhoneValidator::is_valid_landline("31234567"));
        assert!(!PhoneValidator::is_valid_landline("0312345678"));
        assert!(!PhoneValidator::is_valid_landline("03-123456"));
    }

    #[test]
    fn mobile_numbers_are_not_landlines() {
        // A mobile is ten digits, so it never fits the nine-digit landline shape
        assert!(!PhoneValidator::is_valid_landline("0541234567"));
    }
}
