pub mod openai;
pub mod traits;
pub mod types;

pub use openai::OpenAiChatClient;
pub use traits::ChatCompletion;
pub use types::{ChatMessage, ChatRequest, Role};
