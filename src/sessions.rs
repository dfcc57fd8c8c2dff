//! Writing session data into a Q Connect session.

use async_trait::async_trait;
use aws_sdk_qconnect::{
    error::DisplayErrorContext,
    types::{RuntimeSessionData, RuntimeSessionDataValue},
};
use lambda_runtime::tracing;
use serde_json::json;

use crate::{error::ForwardError, event::SessionAttributes};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Write every entry of `data` into the session as a string-valued
    /// session data item.
    async fn update_session_data(
        &self,
        assistant_id: &str,
        session_id: &str,
        data: &SessionAttributes,
    ) -> Result<(), ForwardError>;
}

#[async_trait]
impl SessionStore for aws_sdk_qconnect::Client {
    async fn update_session_data(
        &self,
        assistant_id: &str,
        session_id: &str,
        data: &SessionAttributes,
    ) -> Result<(), ForwardError> {
        tracing::debug!(
            params = %json!({
                "assistantId": assistant_id,
                "sessionId": session_id,
                "dataCount": data.len(),
            }),
            "Update QiC session request"
        );

        let items = data
            .iter()
            .map(|(key, value)| {
                RuntimeSessionData::builder()
                    .key(key)
                    .value(RuntimeSessionDataValue::StringValue(value.clone()))
                    .build()
                    .map_err(|e| ForwardError::remote("UpdateSessionData", e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Inherent builder method, not this trait method.
        aws_sdk_qconnect::Client::update_session_data(self)
            .assistant_id(assistant_id)
            .session_id(session_id)
            .set_data(Some(items))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Q Connect API error: {}", DisplayErrorContext(&e));
                ForwardError::remote("UpdateSessionData", DisplayErrorContext(&e))
            })?;

        tracing::debug!(
            params = %json!({
                "sessionId": session_id,
                "written": data.len(),
            }),
            "Update QiC session response"
        );

        Ok(())
    }
}
