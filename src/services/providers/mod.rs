/// Text-generation provider abstraction
///
/// The recommendation pipeline only ever needs one prompt-in/text-out call,
/// so the provider surface is a single method. Keeping it behind a trait
/// lets tests script the model's replies and assert on the exact prompt the
/// pipeline composed.
use crate::error::AppResult;

pub mod gemini;

pub use gemini::GeminiProvider;

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one prompt to the model and returns the generated text verbatim.
    ///
    /// Returns an empty string when the model reply carries no text. Any
    /// transport or protocol failure surfaces as an error; nothing is
    /// retried or cached.
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
