use std::time::Duration;

use crate::utils::BoxError;

/// One chat-style completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The language model, seen as an opaque and unreliable text function.
///
/// Implementations block until the completion is available. Any error is
/// treated as transient and retried by the extractor.
pub trait CompletionModel {
    fn complete(&self, request: &CompletionRequest) -> Result<String, BoxError>;
}

impl<M: CompletionModel + ?Sized> CompletionModel for &M {
    fn complete(&self, request: &CompletionRequest) -> Result<String, BoxError> {
        (**self).complete(request)
    }
}

impl<M: CompletionModel + ?Sized> CompletionModel for Box<M> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, BoxError> {
        (**self).complete(request)
    }
}

/// Delay between retry attempts.
pub trait Pause {
    fn pause(&self, duration: Duration);
}

impl<P: Pause + ?Sized> Pause for &P {
    fn pause(&self, duration: Duration) {
        (**self).pause(duration)
    }
}

/// Blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
