use std::pin::Pin;
use std::sync::Arc;

use solace_responder::{Responder, ResponderError};
use tracing::Instrument;

type RespondResult = Result<String, Box<dyn ResponderError>>;
type BoxedRespondFuture =
    Pin<Box<dyn Future<Output = RespondResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(String, String) -> BoxedRespondFuture + Send + Sync>;

/// A wrapper around a responder that provides a type-erased interface
/// for the other modules.
///
/// The controller swaps responders at runtime, so it cannot carry the
/// responder type as a generic parameter. `ResponderClient` erases it
/// behind a cloneable handler.
#[derive(Clone)]
pub struct ResponderClient {
    handler_fn: HandlerFn,
}

impl ResponderClient {
    /// Creates a client that dispatches to the given responder.
    #[inline]
    pub fn new<R: Responder + 'static>(responder: R) -> Self {
        // We have to erase the type `R`, since `ResponderClient` doesn't
        // have a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |message, system_prompt| {
            let fut = responder.respond(&message, &system_prompt);
            Box::pin(
                async move {
                    trace!("dispatching message: {message:?}");
                    match fut.await {
                        Ok(reply) => {
                            trace!("got a reply: {reply:?}");
                            Ok(reply)
                        }
                        Err(err) => {
                            error!("got an error: {err}");
                            Err(Box::new(err) as Box<dyn ResponderError>)
                        }
                    }
                }
                .instrument(trace_span!("responder call")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a message and returns the reply.
    #[inline]
    pub async fn respond(
        &self,
        message: &str,
        system_prompt: &str,
    ) -> RespondResult {
        (self.handler_fn)(message.to_owned(), system_prompt.to_owned()).await
    }
}

#[cfg(test)]
mod tests {
    use solace_responder::ErrorKind;
    use solace_test_responder::{PresetStep, ScriptedResponder};

    use super::*;

    #[tokio::test]
    async fn test_respond() {
        let responder = ScriptedResponder::default();
        responder.add_step(PresetStep::reply("How are you?"));

        let client = ResponderClient::new(responder);
        let reply = client.respond("Hi", "Be kind").await.unwrap();
        assert_eq!(reply, "How are you?");
    }

    #[tokio::test]
    async fn test_error_handling() {
        // An exhausted script fails every call.
        let client = ResponderClient::new(ScriptedResponder::default());
        let err = client.respond("Hi", "Be kind").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
