use crate::error::ResponderError;

/// A type that turns a user message and a system prompt into a reply.
///
/// Once the responder is created, it should behave like a stateless
/// object. It can still have internal state, but callers should not rely
/// on it, and the responder should be prepared for being dropped anytime.
///
/// The system prompt is passed on every call rather than fixed at
/// construction, since the conversation core allows the hosting
/// application to change it between attempts.
pub trait Responder: Send + Sync {
    /// The error type that may be returned by the responder.
    type Error: ResponderError;

    /// Produces a reply for the given message.
    fn respond(
        &self,
        message: &str,
        system_prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static;
}
