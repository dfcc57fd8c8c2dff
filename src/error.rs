//! The ways an invocation can fail.
//!
//! Every failure is terminal for the invocation: the forwarder catches it
//! once, logs it, and turns it into a 500 response whose `error` field is the
//! `Display` text of the variant.

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The inbound event is missing something we need, or isn't shaped like
    /// a Connect event at all.
    #[error("{0}")]
    Validation(String),

    /// A required setting is missing from both the event parameters and the
    /// Lambda environment.
    #[error("Required parameter '{key}' not found in Connect event parameters or Lambda environment variables.")]
    Configuration { key: &'static str },

    /// Connect knows the contact, but no Q Connect session is bound to it.
    #[error("Q Connect session not found for contact {contact_id}")]
    SessionNotFound { contact_id: String },

    /// An AWS API call was rejected (bad request, permissions, throttling, ...).
    #[error("{message}")]
    RemoteCall {
        operation: &'static str,
        message: String,
    },
}

impl ForwardError {
    /// A short, stable name for the variant, for log records.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::Validation(_) => "ValidationError",
            ForwardError::Configuration { .. } => "ConfigurationError",
            ForwardError::SessionNotFound { .. } => "SessionNotFoundError",
            ForwardError::RemoteCall { .. } => "RemoteCallError",
        }
    }

    pub(crate) fn remote<E: std::fmt::Display>(operation: &'static str, err: E) -> Self {
        ForwardError::RemoteCall {
            operation,
            message: err.to_string(),
        }
    }
}
