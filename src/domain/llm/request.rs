use serde::{Deserialize, Serialize};

use super::{Message, MessageRole};

/// How a provider expects an image to be attached to a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStyle {
    /// `content` becomes `[{type: text}, {type: image_url}]`
    ContentParts,
    /// Image goes into a sibling `images` array, content stays plain text
    ImagesField,
}

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Chat request handed to a provider client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    /// Image (URL or data URI) the caller wants the model to look at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            temperature: DEFAULT_TEMPERATURE,
            image: None,
        }
    }

    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::new()
    }

    /// Attach an image (URL or data URI) for the model to look at
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Messages as they should go on the wire, with the image (if any) attached
    /// to the last user message in the given style
    pub fn wire_messages(&self, style: ImageStyle) -> Vec<Message> {
        let Some(image) = self.image.as_deref() else {
            return self.messages.clone();
        };

        let mut messages = self.messages.clone();
        let target = messages
            .iter()
            .rposition(|m| m.role == MessageRole::User);

        match target {
            Some(index) => {
                let text = messages[index].content_text().unwrap_or("").to_string();
                messages[index] = match style {
                    ImageStyle::ContentParts => Message::user_with_image_part(text, image),
                    ImageStyle::ImagesField => {
                        Message::user(text).with_images(vec![image.to_string()])
                    }
                };
            }
            None => {
                let message = match style {
                    ImageStyle::ContentParts => Message::user_with_image_part("", image),
                    ImageStyle::ImagesField => {
                        Message::user("").with_images(vec![image.to_string()])
                    }
                };
                messages.push(message);
            }
        }

        messages
    }

    /// Text of the last message, if any
    pub fn last_message_text(&self) -> Option<&str> {
        self.messages.last().and_then(|m| m.content_text())
    }
}

/// Builder for ChatRequest
#[derive(Debug)]
pub struct ChatRequestBuilder {
    messages: Vec<Message>,
    temperature: f32,
    image: Option<String>,
}

impl Default for ChatRequestBuilder {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            temperature: DEFAULT_TEMPERATURE,
            image: None,
        }
    }
}

impl ChatRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn system(self, content: impl Into<String>) -> Self {
        self.message(Message::system(content))
    }

    pub fn user(self, content: impl Into<String>) -> Self {
        self.message(Message::user(content))
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    pub fn build(self) -> ChatRequest {
        ChatRequest {
            messages: self.messages,
            temperature: self.temperature,
            image: self.image,
        }
    }
}
