//! Chat domain models and the chat capability trait

mod message;
mod provider;
mod request;

pub use message::{ContentPart, ImageUrl, Message, MessageRole};
pub use provider::ChatClient;
pub use request::{ChatRequest, ChatRequestBuilder, ImageStyle, DEFAULT_TEMPERATURE};

#[cfg(test)]
pub use provider::mock::MockChatClient;
