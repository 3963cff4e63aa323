use solace_responder::Responder;

use super::ConversationController;
use crate::responder_client::ResponderClient;
use crate::transcript::Entry;

/// [`ConversationController`] builder.
///
/// Everything is optional: a controller built with no responder degrades
/// gracefully on send, no system prompt means the default persona, and
/// no seed entries means a transcript with the standard greeting.
#[derive(Default)]
pub struct ControllerBuilder {
    pub(crate) responder: Option<ResponderClient>,
    pub(crate) system_prompt: Option<String>,
    pub(crate) seed_entries: Vec<Entry>,
}

impl ControllerBuilder {
    /// Creates a new builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the responder to use.
    #[inline]
    pub fn with_responder<R: Responder + 'static>(
        mut self,
        responder: R,
    ) -> Self {
        self.responder = Some(ResponderClient::new(responder));
        self
    }

    /// Sets the system prompt for the conversation.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Seeds the transcript with the given entries.
    ///
    /// An empty seed is ignored; the transcript falls back to the
    /// standard greeting so it is never empty.
    #[inline]
    pub fn with_seed_entries(
        mut self,
        entries: impl Into<Vec<Entry>>,
    ) -> Self {
        self.seed_entries = entries.into();
        self
    }

    /// Builds the controller.
    #[inline]
    pub fn build(self) -> ConversationController {
        ConversationController::from_builder(self)
    }
}
