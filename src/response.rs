//! What we hand back to the contact flow.

use serde::Serialize;
use serde_json::json;

use crate::error::ForwardError;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,

    /// JSON text: `{message, updatedDataCount}` on success, `{error}` on
    /// failure.
    pub body: String,
}

impl Response {
    pub fn updated(count: usize) -> Self {
        Self::ok(
            format!("Successfully updated {count} session data entries"),
            count,
        )
    }

    pub fn nothing_to_update() -> Self {
        Self::ok("No session data to update".to_owned(), 0)
    }

    fn ok(message: String, count: usize) -> Self {
        Response {
            status_code: 200,
            body: json!({ "message": message, "updatedDataCount": count }).to_string(),
        }
    }

    pub fn error(err: &ForwardError) -> Self {
        Response {
            status_code: 500,
            body: json!({ "error": err.to_string() }).to_string(),
        }
    }
}
