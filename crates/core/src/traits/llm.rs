//! Language model traits

use async_trait::async_trait;

use crate::error::GenerationError;

/// Reply generation interface
///
/// Implementations:
/// - `GeminiResponder` - hosted Gemini model with a fixed Hindi persona
#[async_trait]
pub trait ResponseGenerator: Send + Sync + 'static {
    /// Generate a short Hindi reply to `input`
    ///
    /// No length limit is enforced locally. Returns the trimmed reply, never
    /// empty on `Ok`.
    async fn respond(&self, input: &str) -> Result<String, GenerationError>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
