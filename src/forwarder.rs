//! The forwarder itself: contact flow parameters in, Q Connect session data
//! out.
//!
//! The sequence is strictly linear. Each step either hands its result to the
//! next or ends the invocation:
//!
//! 1. pull the contact id out of the event;
//! 2. resolve the assistant and Connect instance to use;
//! 3. ask Connect which Q Connect session is bound to the contact;
//! 4. drop the reserved keys from the parameters (nothing left = done);
//! 5. write what remains into the session.
//!
//! [`forward`] returns a `Result`; [`handle`] is the one place errors are
//! turned into responses.

use lambda_runtime::tracing;
use serde_json::{json, Value};

use crate::{
    contacts::ContactDirectory,
    error::ForwardError,
    event::InvocationEvent,
    response::Response,
    sessions::SessionStore,
    settings::Settings,
};

/// How a successful invocation ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The event carried only reserved keys (or nothing); no update was made.
    NothingToUpdate,

    /// This many session data entries were written.
    Updated(usize),
}

impl From<Outcome> for Response {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::NothingToUpdate => Response::nothing_to_update(),
            Outcome::Updated(n) => Response::updated(n),
        }
    }
}

pub async fn forward<D, S>(
    event: &InvocationEvent,
    settings: &Settings,
    directory: &D,
    sessions: &S,
) -> Result<Outcome, ForwardError>
where
    D: ContactDirectory + ?Sized,
    S: SessionStore + ?Sized,
{
    let contact_id = event.contact_id()?;

    tracing::debug!(
        params = %json!({ "contactId": contact_id, "hasParameters": event.has_parameters() }),
        "Processing Connect event"
    );

    let resolved = settings.resolve(event)?;

    let session_id = directory
        .session_for_contact(&resolved.instance_id, contact_id)
        .await?
        .ok_or_else(|| ForwardError::SessionNotFound {
            contact_id: contact_id.to_owned(),
        })?;

    let attributes = event.session_attributes();

    if attributes.is_empty() {
        tracing::debug!("No session data to update - all parameters were system parameters");
        return Ok(Outcome::NothingToUpdate);
    }

    sessions
        .update_session_data(&resolved.assistant_id, &session_id, &attributes)
        .await?;

    tracing::info!(
        params = %json!({
            "contactId": contact_id,
            "assistantId": resolved.assistant_id,
            "sessionId": session_id,
            "updatedDataCount": attributes.len(),
        }),
        "Updated Q Connect session data"
    );

    Ok(Outcome::Updated(attributes.len()))
}

/// Process one raw invocation payload. Never fails: every error becomes a
/// 500 response.
pub async fn handle<D, S>(
    payload: Value,
    settings: &Settings,
    directory: &D,
    sessions: &S,
) -> Response
where
    D: ContactDirectory + ?Sized,
    S: SessionStore + ?Sized,
{
    let result = match InvocationEvent::from_value(payload) {
        Ok(event) => forward(&event, settings, directory, sessions).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => outcome.into(),

        Err(e) => {
            let operation = match &e {
                ForwardError::RemoteCall { operation, .. } => Some(*operation),
                _ => None,
            };

            tracing::error!(
                params = %json!({ "kind": e.kind(), "operation": operation }),
                "Error processing request: {e}"
            );

            Response::error(&e)
        }
    }
}
