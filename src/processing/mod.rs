pub mod digit_recovery;
pub mod field_correction;
pub mod merge;

pub use digit_recovery::{DigitRecovery, DigitTarget};
pub use field_correction::{Correction, FieldCorrection};
pub use merge::TemplateMerge;
