//! Voice-platform request and response envelopes.
//!
//! # Responsibility
//! - Decode the inbound JSON request into typed structs.
//! - Encode plain-text speech responses.
//!
//! # Invariants
//! - Unknown envelope fields are ignored.
//! - The user id is read from `context.System.user` first, then `session.user`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const RESPONSE_VERSION: &str = "1.0";

/// Inbound request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: Request,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<SystemState>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemState {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// Request body; `kind` carries the platform request type.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub intent: Option<IntentPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntentPayload {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<String>,
}

/// Request type after envelope decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind<'a> {
    Launch,
    Intent(&'a IntentPayload),
    SessionEnded,
    Unsupported(&'a str),
}

/// Envelope-level decoding failures.
#[derive(Debug)]
pub enum EnvelopeError {
    Json(serde_json::Error),
    MissingIntent,
}

impl Display for EnvelopeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed request envelope: {err}"),
            Self::MissingIntent => write!(f, "intent request without intent payload"),
        }
    }
}

impl Error for EnvelopeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::MissingIntent => None,
        }
    }
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl RequestEnvelope {
    pub fn from_json(raw: &str) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Returns the first non-blank user id, exactly as sent.
    pub fn user_id(&self) -> Option<&str> {
        let from_context = self
            .context
            .as_ref()
            .and_then(|context| context.system.as_ref())
            .and_then(|system| system.user.as_ref());
        let from_session = self.session.as_ref().and_then(|session| session.user.as_ref());

        from_context
            .into_iter()
            .chain(from_session)
            .filter_map(|user| user.user_id.as_deref())
            .find(|user_id| !user_id.trim().is_empty())
    }

    pub fn kind(&self) -> Result<RequestKind<'_>, EnvelopeError> {
        match self.request.kind.as_str() {
            "LaunchRequest" => Ok(RequestKind::Launch),
            "IntentRequest" => self
                .request
                .intent
                .as_ref()
                .map(RequestKind::Intent)
                .ok_or(EnvelopeError::MissingIntent),
            "SessionEndedRequest" => Ok(RequestKind::SessionEnded),
            other => Ok(RequestKind::Unsupported(other)),
        }
    }
}

/// Outbound response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    pub version: &'static str,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl ResponseEnvelope {
    /// Speaks `text` and keeps the session open, reprompting with the same text.
    pub fn speak_and_listen(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::with_body(ResponseBody {
            output_speech: Some(OutputSpeech::plain(text.clone())),
            reprompt: Some(Reprompt {
                output_speech: OutputSpeech::plain(text),
            }),
            should_end_session: false,
        })
    }

    /// Speaks `text` and ends the session.
    pub fn speak_and_end(text: impl Into<String>) -> Self {
        Self::with_body(ResponseBody {
            output_speech: Some(OutputSpeech::plain(text)),
            reprompt: None,
            should_end_session: true,
        })
    }

    /// Response without speech.
    pub fn empty() -> Self {
        Self::with_body(ResponseBody {
            output_speech: None,
            reprompt: None,
            should_end_session: true,
        })
    }

    /// Spoken text, if any.
    pub fn speech(&self) -> Option<&str> {
        self.response
            .output_speech
            .as_ref()
            .map(|speech| speech.text.as_str())
    }

    fn with_body(response: ResponseBody) -> Self {
        Self {
            version: RESPONSE_VERSION,
            response,
        }
    }
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: "PlainText",
            text: text.into(),
        }
    }
}
