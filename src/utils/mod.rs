pub mod error;

pub use error::{BoxError, FormError};
