use chrono::NaiveDate;

/// Validates day/month/year date groups as written on the form.
pub struct DateValidator;

impl DateValidator {
    pub fn is_valid(day: &str, month: &str, year: &str) -> bool {
        Self::parse(day, month, year).is_some()
    }

    /// Parse in day/month/year order. Day and month take one or two digits,
    /// the year exactly four.
    pub fn parse(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
        let day = Self::parse_part(day, 1..=2)?;
        let month = Self::parse_part(month, 1..=2)?;
        let year = Self::parse_part(year, 4..=4)?;
        if year == 0 {
            return None;
        }

        NaiveDate::from_ymd_opt(year as i32, month, day)
    }

    fn parse_part(part: &str, digits: std::ops::RangeInclusive<usize>) -> Option<u32> {
        if !digits.contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_real_dates_in_day_month_order() {
        assert!(DateValidator::is_valid("14", "02", "1990"));
        assert!(DateValidator::is_valid("1", "2", "1990"));
        assert!(DateValidator::is_valid("29", "02", "2024"));
        assert_eq!(
            DateValidator::parse("03", "11", "1985"),
            NaiveDate::from_ymd_opt(1985, 11, 3)
        );
    }

    #[test]
    fn rejects_impossible_days_and_month_first_order() {
        assert!(!DateValidator::is_valid("29", "02", "2023"));
        assert!(!DateValidator::is_valid("31", "04", "2020"));
        assert!(!DateValidator::is_valid("02", "14", "1990"));
    }

    #[test]
    fn rejects_empty_non_numeric_and_out_of_range_parts() {
        assert!(!DateValidator::is_valid("", "02", "1990"));
        assert!(!DateValidator::is_valid("14", "", "1990"));
        assert!(!DateValidator::is_valid("14", "02", ""));
        assert!(!DateValidator::is_valid("ab", "02", "1990"));
        assert!(!DateValidator::is_valid("14", "02", "90"));
        assert!(!DateValidator::is_valid("14", "02", "0000"));
        assert!(!DateValidator::is_valid("014", "02", "1990"));
        assert!(!DateValidator::is_valid("+1", "02", "1990"));
    }
}
