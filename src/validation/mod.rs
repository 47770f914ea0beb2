pub mod date;
pub mod gender;
pub mod id_number;
pub mod phone;
pub mod record;

pub use date::DateValidator;
pub use gender::GenderValidator;
pub use id_number::IdNumberValidator;
pub use phone::PhoneValidator;
pub use record::RecordValidator;
