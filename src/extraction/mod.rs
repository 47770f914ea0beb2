pub mod extractor;
pub mod model;
pub mod prompt;
pub mod response;
pub mod retry;

pub use extractor::{Extraction, ExtractionStage, FieldExtractor};
pub use model::{CompletionModel, CompletionRequest, Pause, ThreadSleep};
pub use response::{PayloadExtractor, ResponseParser};
pub use retry::RetryPolicy;
