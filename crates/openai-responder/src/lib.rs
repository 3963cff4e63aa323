//! A responder for OpenAI-compatible APIs.

#[macro_use]
extern crate tracing;

mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};

use reqwest::{Client, Response, StatusCode, header};
use solace_responder::{ErrorKind, Responder, ResponderError};

const DEFAULT_MODEL: &str = "gpt-5.2-mini";
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Error type for [`OpenAIResponder`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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

/// Builder for [`OpenAIResponder`].
///
/// Only the API key is required. The model and the completion endpoint
/// fall back to defaults suitable for the hosted OpenAI API; point the
/// endpoint at any compatible server to use a different backend.
pub struct OpenAIResponderBuilder {
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAIResponderBuilder {
    /// Sets the model to use.
    #[inline]
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the full URL of the chat completion endpoint.
    #[inline]
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builds the responder.
    #[inline]
    pub fn build(self) -> OpenAIResponder {
        OpenAIResponder {
            client: Client::new(),
            api_key: self.api_key,
            model: self.model,
            endpoint: self.endpoint,
        }
    }
}

/// A responder backed by an OpenAI-compatible chat completion endpoint.
///
/// Each call sends the system prompt and the user message as a two
/// message, non-streaming completion request and resolves to the first
/// choice's text.
#[derive(Clone)]
pub struct OpenAIResponder {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAIResponder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn builder<S: Into<String>>(api_key: S) -> OpenAIResponderBuilder {
        OpenAIResponderBuilder {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }
}

impl Debug for OpenAIResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIResponder")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Responder for OpenAIResponder {
    type Error = Error;

    fn respond(
        &self,
        message: &str,
        system_prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        let openai_req =
            proto::create_request(message, system_prompt, &self.model);
        let resp_fut = self
            .client
            .post(&self.endpoint)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .json(&openai_req)
            .send();

        async move {
            let resp = match resp_fut.await.and_then(Response::error_for_status)
            {
                Ok(resp) => resp,
                Err(err) => {
                    let kind =
                        if err.status() == Some(StatusCode::TOO_MANY_REQUESTS)
                        {
                            ErrorKind::RateLimitExceeded
                        } else {
                            ErrorKind::Other
                        };
                    return Err(Error::new(format!("{err}"), kind));
                }
            };

            trace!("got a completion response");
            let completion: proto::ChatCompletion = match resp.json().await {
                Ok(completion) => completion,
                Err(err) => {
                    return Err(Error::new(
                        format!("{err}"),
                        ErrorKind::Other,
                    ));
                }
            };
            proto::extract_reply(completion).ok_or_else(|| {
                Error::new("completion contained no reply", ErrorKind::Other)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let responder = OpenAIResponder::builder("secret").build();
        assert_eq!(responder.model, DEFAULT_MODEL);
        assert_eq!(responder.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_builder_overrides() {
        let responder = OpenAIResponder::builder("secret")
            .model("companion-large")
            .endpoint("http://localhost:8080/v1/chat/completions")
            .build();
        assert_eq!(responder.model, "companion-large");
        assert_eq!(
            responder.endpoint,
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_debug_redacts_the_api_key() {
        let responder = OpenAIResponder::builder("super-secret").build();
        let dump = format!("{responder:?}");
        assert!(!dump.contains("super-secret"));
        assert!(dump.contains("<redacted>"));
    }
}
