//! A local fake responder for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use solace_responder::{ErrorKind, Responder, ResponderError};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ResponderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local fake responder for testing purpose.
///
/// Before sending messages, you need to set up the script, which is how
/// the responder should behave over successive invocations. Steps are
/// consumed strictly in call order, one per invocation. If the script
/// runs out of steps, an error is returned, so a default-constructed
/// `ScriptedResponder` fails every call.
///
/// Clones share the same script and counters, which lets a test keep a
/// handle for inspection after moving the responder into a controller.
///
/// # Note
///
/// This type is not optimized for production use, there are locks taken
/// on every invocation. You should only use it for testing.
#[derive(Clone, Default)]
pub struct ScriptedResponder {
    script: Arc<Mutex<VecDeque<PresetStep>>>,
    calls: Arc<AtomicU32>,
    seen_prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedResponder {
    /// Appends a step to the script.
    pub fn add_step(&self, step: PresetStep) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(step);
    }

    /// Returns how many times the responder has been invoked.
    #[inline]
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Returns the system prompt seen on each invocation, in call order.
    pub fn seen_prompts(&self) -> Vec<String> {
        self.seen_prompts
            .lock()
            .expect("prompts lock poisoned")
            .clone()
    }
}

impl Responder for ScriptedResponder {
    type Error = Error;

    fn respond(
        &self,
        _message: &str,
        system_prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        // Record the invocation up front, before the caller polls the
        // returned future, so attempt counting is not affected by how
        // the outcome is awaited.
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.seen_prompts
            .lock()
            .expect("prompts lock poisoned")
            .push(system_prompt.to_owned());
        let step = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front();

        async move {
            let Some(step) = step else {
                return Err(Error {
                    message: "no more steps in the script",
                    kind: ErrorKind::Other,
                });
            };
            if let Some(delay) = step.delay {
                sleep(delay).await;
            }
            match step.outcome {
                PresetOutcome::Reply(text) => Ok(text),
                PresetOutcome::Failure => Err(Error {
                    message: "scripted failure",
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}
