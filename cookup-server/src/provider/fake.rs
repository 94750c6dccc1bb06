//! Scripted provider for tests.
//!
//! Text requests get one fixed reply. Image requests are matched by checking
//! whether the prompt contains a registered substring (usually the recipe
//! name), falling back to a default reply. Every request is recorded.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{AiProvider, ChatRequest, ChatResponse, ProviderError};

#[derive(Debug, Clone)]
pub enum FakeReply {
    /// A text completion with this content.
    Text(String),
    /// An image completion carrying this URL.
    Image(String),
    /// A well-formed envelope with no choices.
    Empty,
    /// A non-2xx status with this code.
    Status(u16),
}

#[derive(Debug)]
pub struct FakeProvider {
    configured: bool,
    text_reply: FakeReply,
    image_replies: Vec<(String, Duration, FakeReply)>,
    default_image_reply: FakeReply,
    calls: Mutex<Vec<ChatRequest>>,
}

impl FakeProvider {
    /// A configured provider whose text model answers with `content`
    /// and whose image model fails unless told otherwise.
    pub fn with_text(content: &str) -> Self {
        Self::with_text_reply(FakeReply::Text(content.to_string()))
    }

    pub fn with_text_reply(reply: FakeReply) -> Self {
        Self {
            configured: true,
            text_reply: reply,
            image_replies: vec![],
            default_image_reply: FakeReply::Status(500),
            calls: Mutex::new(vec![]),
        }
    }

    /// A provider without credentials.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::with_text("[]")
        }
    }

    /// Answer image prompts containing `prompt_contains` with `reply`.
    pub fn with_image(self, prompt_contains: &str, reply: FakeReply) -> Self {
        self.with_delayed_image(prompt_contains, Duration::ZERO, reply)
    }

    /// Like [`FakeProvider::with_image`], answering only after `delay`.
    pub fn with_delayed_image(
        mut self,
        prompt_contains: &str,
        delay: Duration,
        reply: FakeReply,
    ) -> Self {
        self.image_replies
            .push((prompt_contains.to_string(), delay, reply));
        self
    }

    pub fn with_default_image(mut self, reply: FakeReply) -> Self {
        self.default_image_reply = reply;
        self
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn image_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.wants_image()).count()
    }

    fn reply_for(&self, request: &ChatRequest) -> (Duration, FakeReply) {
        if !request.wants_image() {
            return (Duration::ZERO, self.text_reply.clone());
        }
        let prompt = request.prompt();
        self.image_replies
            .iter()
            .find(|(needle, _, _)| prompt.contains(needle.as_str()))
            .map(|(_, delay, reply)| (*delay, reply.clone()))
            .unwrap_or_else(|| (Duration::ZERO, self.default_image_reply.clone()))
    }
}

#[async_trait]
impl AiProvider for FakeProvider {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        if !self.configured {
            return Err(ProviderError::NotConfigured);
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let (delay, reply) = self.reply_for(request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            FakeReply::Text(content) => Ok(ChatResponse::from_text(content)),
            FakeReply::Image(url) => Ok(ChatResponse::from_image_url(url)),
            FakeReply::Empty => Ok(ChatResponse::default()),
            FakeReply::Status(status) => Err(ProviderError::Status {
                status,
                body: format!("fake status {}", status),
            }),
        }
    }
}
