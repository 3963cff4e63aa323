mod builder;
#[cfg(test)]
mod tests;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use solace_responder::ResponderError;
use tokio::time::sleep;

use crate::responder_client::ResponderClient;
use crate::transcript::{Entry, Transcript};
pub use builder::ControllerBuilder;

/// The persona used when the hosting application doesn't supply one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Solace, a warm and \
    compassionate wellness companion. Listen with empathy, keep replies \
    short and gentle, and suggest simple grounding or breathing exercises \
    when they could help. You are not a substitute for professional care.";

/// The reply shown when every attempt at reaching the responder failed.
pub const FALLBACK_REPLY: &str =
    "I'm having trouble responding right now. Please try again in a moment.";

/// The reply shown when no responder is configured at all.
pub const DEGRADED_REPLY: &str = "I'm having trouble connecting to my \
    brain right now. Please try again in a moment.";

/// Retries after the initial attempt. Backoff doubles per retry,
/// starting from `BASE_BACKOFF`.
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_secs(1);

struct ControllerState {
    transcript: Transcript,
    loading: bool,
}

/// The mutable configuration cell. It is read fresh on every attempt,
/// never captured by the initiating call, so the most recently set
/// responder and prompt always win.
struct ControllerConfig {
    system_prompt: String,
    responder: Option<ResponderClient>,
}

/// Owns one conversation: an ordered transcript, a loading flag, and the
/// currently configured responder and system prompt.
///
/// `ConversationController` is a cheap handle over shared state; clones
/// observe the same conversation. Sending a message appends the user
/// entry, drives the retry protocol around the responder, and always
/// lands an assistant entry — either the reply or a fixed fallback.
/// Responder-side failures never escape to the caller.
///
/// The controller doesn't serialize overlapping sends. Entries are
/// appended in completion order, and callers that need single-flight
/// semantics should sequence their calls to [`send_message`] themselves.
///
/// [`send_message`]: ConversationController::send_message
#[derive(Clone)]
pub struct ConversationController {
    state: Arc<Mutex<ControllerState>>,
    config: Arc<Mutex<ControllerConfig>>,
}

/// Clears the loading flag when dropped, so it resets on every exit path
/// of a send, including the send future being dropped mid-flight.
struct LoadingGuard(Arc<Mutex<ControllerState>>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.lock() {
            state.loading = false;
        }
    }
}

impl ConversationController {
    /// Creates a builder for configuring a controller.
    #[inline]
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::new()
    }

    pub(crate) fn from_builder(builder: ControllerBuilder) -> Self {
        let ControllerBuilder {
            responder,
            system_prompt,
            seed_entries,
        } = builder;

        Self {
            state: Arc::new(Mutex::new(ControllerState {
                transcript: Transcript::from_entries(seed_entries),
                loading: false,
            })),
            config: Arc::new(Mutex::new(ControllerConfig {
                system_prompt: system_prompt
                    .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_owned()),
                responder,
            })),
        }
    }

    /// Sends a user message and waits for its terminal outcome.
    ///
    /// Blank or whitespace-only input is a no-op that returns `None`
    /// without touching the transcript or the loading flag. Otherwise
    /// the user entry is appended immediately and returned, the loading
    /// flag stays set until the send completes, and exactly one
    /// assistant entry follows: the responder's reply, or
    /// [`FALLBACK_REPLY`] once retries are exhausted.
    pub async fn send_message(&self, text: &str) -> Option<Entry> {
        if text.trim().is_empty() {
            return None;
        }

        let user_entry = Entry::user(text);
        {
            let mut state = self.state();
            state.transcript.push(user_entry.clone());
            state.loading = true;
        }
        let _guard = LoadingGuard(Arc::clone(&self.state));

        match self.respond_with_retry(text).await {
            Ok(reply) => {
                self.state().transcript.push(Entry::assistant(reply));
            }
            Err(err) => {
                error!(
                    "giving up after {} attempts: {err}",
                    MAX_RETRIES + 1
                );
                self.state()
                    .transcript
                    .push(Entry::assistant(FALLBACK_REPLY));
            }
        }

        Some(user_entry)
    }

    /// Drives the responder with bounded exponential backoff.
    ///
    /// Every failure is treated as retryable regardless of its kind; the
    /// backoff schedule is 1s, 2s, 4s with no jitter. The responder and
    /// system prompt are re-read from the configuration cell on each
    /// attempt, so a swap during a backoff window takes effect on the
    /// next attempt.
    async fn respond_with_retry(
        &self,
        message: &str,
    ) -> Result<String, Box<dyn ResponderError>> {
        let mut attempt = 0;
        loop {
            let (responder, system_prompt) = {
                let config = self.config();
                (config.responder.clone(), config.system_prompt.clone())
            };
            let Some(responder) = responder else {
                warn!("no responder is configured, degrading");
                return Ok(DEGRADED_REPLY.to_owned());
            };

            match responder.respond(message, &system_prompt).await {
                Ok(reply) => return Ok(reply),
                Err(err) if attempt < MAX_RETRIES => {
                    let delay = BASE_BACKOFF * 2u32.pow(attempt);
                    warn!(
                        "attempt {attempt} failed ({err}), \
                         retrying in {delay:?}"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Resets the transcript to a single fresh greeting entry.
    ///
    /// The loading flag, system prompt, and responder are untouched.
    pub fn clear_messages(&self) {
        self.state().transcript = Transcript::seeded();
    }

    /// Replaces the active system prompt. Affects only future attempts.
    pub fn set_system_prompt<S: Into<String>>(&self, prompt: S) {
        self.config().system_prompt = prompt.into();
    }

    /// Replaces the active responder. Affects only future attempts.
    ///
    /// `None` is rejected: the anomaly is logged and the previous
    /// responder stays in place, so message-sending is never silently
    /// broken by a bad update.
    pub fn update_responder(&self, responder: Option<ResponderClient>) {
        match responder {
            Some(client) => {
                self.config().responder = Some(client);
            }
            None => {
                warn!("ignoring attempt to unset the active responder");
            }
        }
    }

    /// Returns a snapshot of the transcript entries in insertion order.
    pub fn entries(&self) -> Vec<Entry> {
        self.state().transcript.entries().to_vec()
    }

    /// Returns whether a send is currently in flight.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Returns the currently active system prompt.
    pub fn system_prompt(&self) -> String {
        self.config().system_prompt.clone()
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().expect("controller state lock poisoned")
    }

    fn config(&self) -> MutexGuard<'_, ControllerConfig> {
        self.config.lock().expect("controller config lock poisoned")
    }
}
