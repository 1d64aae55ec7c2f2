mod api;
mod gemini;
mod provider;

pub use api::OpenAiCompatClient;
pub use gemini::GeminiClient;
pub use provider::{BackendError, ChatBackend, LlmRegistry, ModelId, ProviderKind};
