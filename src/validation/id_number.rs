/// Israeli identity number (Teudat Zehut) check.
pub struct IdNumberValidator;

pub const ID_LENGTH: usize = 9;

impl IdNumberValidator {
    /// Validate with the official weighted checksum. Non-digit characters are
    /// ignored and the number is left-padded with zeros to nine digits first,
    /// so an 8-digit number missing its leading zero still validates.
    pub fn is_valid(value: &str) -> bool {
        let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() > ID_LENGTH {
            return false;
        }

        let padding = ID_LENGTH - digits.len();
        let total: u32 = std::iter::repeat(0)
            .take(padding)
            .chain(digits)
            .enumerate()
            .map(|(position, digit)| {
                let product = if position % 2 == 0 { digit } else { digit * 2 };
                if product > 9 {
                    product - 9
                } else {
                    product
                }
            })
            .sum();

        total % 10 == 0
    }
}
