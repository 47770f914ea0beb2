pub mod config;
pub mod extraction;
pub mod form_processor;
pub mod models;
pub mod processing;
pub mod utils;
pub mod validation;

pub use config::ExtractorConfig;
pub use form_processor::{FormProcessor, ProcessedForm};
pub use utils::FormError;
