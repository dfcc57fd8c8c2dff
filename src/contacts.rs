//! Finding the Q Connect session that belongs to a Connect contact.
//!
//! When a contact flow has a Q Connect ("Wisdom") assistant attached, Connect
//! creates a session for the contact and records its ARN under
//! `Contact.WisdomInfo.SessionArn` in the `DescribeContact` response.

use async_trait::async_trait;
use aws_sdk_connect::{
    error::DisplayErrorContext, operation::describe_contact::DescribeContactOutput,
};
use lambda_runtime::tracing;
use serde_json::{json, Value};

use crate::error::ForwardError;

#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Return the session identifier bound to the contact, or `None` if the
    /// contact exists but has no session.
    async fn session_for_contact(
        &self,
        instance_id: &str,
        contact_id: &str,
    ) -> Result<Option<String>, ForwardError>;
}

#[async_trait]
impl ContactDirectory for aws_sdk_connect::Client {
    async fn session_for_contact(
        &self,
        instance_id: &str,
        contact_id: &str,
    ) -> Result<Option<String>, ForwardError> {
        tracing::debug!(
            params = %json!({ "ContactId": contact_id, "InstanceId": instance_id }),
            "Get QiC session request"
        );

        let resp = self
            .describe_contact()
            .instance_id(instance_id)
            .contact_id(contact_id)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("AWS API error retrieving contact: {}", DisplayErrorContext(&e));
                ForwardError::remote("DescribeContact", DisplayErrorContext(&e))
            })?;

        tracing::debug!(params = %response_params(&resp), "Get QiC session response");

        Ok(session_arn(&resp))
    }
}

fn session_arn(resp: &DescribeContactOutput) -> Option<String> {
    resp.contact()
        .and_then(|c| c.wisdom_info())
        .and_then(|w| w.session_arn())
        .filter(|arn| !arn.is_empty())
        .map(str::to_owned)
}

/// The parts of a DescribeContact response that explain whether a session
/// was found.
fn response_params(resp: &DescribeContactOutput) -> Value {
    let contact = resp.contact();

    json!({
        "ContactId": contact.and_then(|c| c.id()),
        "Channel": contact.and_then(|c| c.channel()).map(|ch| ch.as_str()),
        "InitiationMethod": contact
            .and_then(|c| c.initiation_method())
            .map(|m| m.as_str()),
        "WisdomInfo": contact
            .and_then(|c| c.wisdom_info())
            .map(|w| format!("{w:?}")),
        "SessionArn": session_arn(resp),
    })
}
