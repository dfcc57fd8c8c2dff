//! The event that Amazon Connect hands us when a contact flow invokes a
//! Lambda function.
//!
//! Connect sends a lot more than we look at (`CustomerEndpoint`, `Channel`,
//! `InstanceARN`, attributes, ...). We only model `ContactData.ContactId` and
//! `Parameters`, and let serde ignore the rest. Every level is optional so
//! that a truncated event turns into a clean validation error rather than a
//! deserialization failure.

use lambda_runtime::tracing;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::{error::ForwardError, settings};

/// Session data that will be written to Q Connect: the contact flow
/// parameters minus the reserved configuration keys.
pub type SessionAttributes = BTreeMap<String, String>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationEvent {
    #[serde(default)]
    details: Option<Details>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Details {
    #[serde(default)]
    contact_data: Option<ContactData>,

    #[serde(default)]
    parameters: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContactData {
    #[serde(default)]
    contact_id: Option<String>,
}

impl InvocationEvent {
    /// Interpret a raw Lambda payload as a Connect event.
    pub fn from_value(payload: Value) -> Result<Self, ForwardError> {
        serde_json::from_value(payload)
            .map_err(|e| ForwardError::Validation(format!("malformed Connect event: {e}")))
    }

    /// The contact that triggered this invocation. Absent and empty are
    /// treated the same.
    pub fn contact_id(&self) -> Result<&str, ForwardError> {
        self.details
            .as_ref()
            .and_then(|d| d.contact_data.as_ref())
            .and_then(|c| c.contact_id.as_deref())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ForwardError::Validation("ContactId not found in event".to_owned()))
    }

    fn parameters(&self) -> Option<&BTreeMap<String, Value>> {
        self.details.as_ref().and_then(|d| d.parameters.as_ref())
    }

    pub fn has_parameters(&self) -> bool {
        self.parameters().is_some_and(|p| !p.is_empty())
    }

    /// Look up one contact flow parameter. Empty values count as missing, so
    /// that a flow that sets a parameter to "" falls back to the environment.
    pub fn parameter(&self, key: &str) -> Option<String> {
        self.parameters()
            .and_then(|p| p.get(key))
            .map(stringify)
            .filter(|v| !v.is_empty())
    }

    /// Convert the contact flow parameters into the session data we forward,
    /// skipping the keys that configure this function itself.
    pub fn session_attributes(&self) -> SessionAttributes {
        let parameters = match self.parameters() {
            Some(p) if !p.is_empty() => p,
            _ => {
                tracing::debug!("No parameters found in Connect event");
                return SessionAttributes::new();
            }
        };

        let mut attributes = SessionAttributes::new();

        for (key, value) in parameters {
            if settings::RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }

            let value = stringify(value);
            tracing::debug!(
                params = %json!({ "key": key, "valueLength": value.len() }),
                "Added parameter to session data: {key}"
            );
            attributes.insert(key.clone(), value);
        }

        tracing::debug!(
            params = %json!({
                "totalParameters": parameters.len(),
                "systemParameters": parameters.len() - attributes.len(),
                "sessionDataCount": attributes.len(),
            }),
            "Converted {} parameters to session data format",
            attributes.len()
        );

        attributes
    }
}

/// Q Connect only accepts string values. Connect itself always sends strings,
/// but a hand-built test event may not.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(v: Value) -> InvocationEvent {
        InvocationEvent::from_value(v).unwrap()
    }

    #[test]
    fn contact_id_is_extracted() {
        let e = event(json!({
            "Details": {
                "ContactData": {
                    "ContactId": "12345678-1234-1234-1234-123456789012",
                    "Channel": "VOICE",
                    "PreviousContactId": null
                }
            }
        }));
        assert_eq!(
            e.contact_id().unwrap(),
            "12345678-1234-1234-1234-123456789012"
        );
    }

    #[test]
    fn missing_or_empty_contact_id_is_a_validation_error() {
        for v in [
            json!({}),
            json!({ "SomeOtherField": "value" }),
            json!({ "Details": null }),
            json!({ "Details": { "ContactData": {} } }),
            json!({ "Details": { "ContactData": { "ContactId": "" } } }),
            json!({ "Details": { "ContactData": { "ContactId": null } } }),
        ] {
            let err = event(v).contact_id().unwrap_err();
            assert!(matches!(err, ForwardError::Validation(_)));
            assert_eq!(err.to_string(), "ContactId not found in event");
        }
    }

    #[test]
    fn non_object_payload_is_a_validation_error() {
        let err = InvocationEvent::from_value(json!("hello")).unwrap_err();
        assert!(matches!(err, ForwardError::Validation(_)));
    }

    #[test]
    fn reserved_keys_are_filtered() {
        let e = event(json!({
            "Details": {
                "Parameters": {
                    "AI_ASSISTANT_ID": "assistant-id",
                    "CONNECT_INSTANCE_ID": "instance-id",
                    "customer_intent": "purchase",
                    "customer_tier": "gold",
                    "product_id": "12345"
                }
            }
        }));

        let attrs = e.session_attributes();
        let expected: SessionAttributes = [
            ("customer_intent", "purchase"),
            ("customer_tier", "gold"),
            ("product_id", "12345"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(attrs, expected);
    }

    #[test]
    fn only_reserved_keys_gives_empty_attributes() {
        let e = event(json!({
            "Details": {
                "Parameters": {
                    "AI_ASSISTANT_ID": "assistant-id",
                    "CONNECT_INSTANCE_ID": "instance-id"
                }
            }
        }));
        assert!(e.has_parameters());
        assert!(e.session_attributes().is_empty());
    }

    #[test]
    fn no_parameters_gives_empty_attributes() {
        assert!(event(json!({ "Details": {} })).session_attributes().is_empty());
        assert!(event(json!({ "Details": { "Parameters": null } }))
            .session_attributes()
            .is_empty());
        assert!(!event(json!({ "Details": { "Parameters": {} } })).has_parameters());
    }

    #[test]
    fn non_string_values_are_stringified() {
        let e = event(json!({
            "Details": {
                "Parameters": { "count": 3, "vip": true, "note": null }
            }
        }));
        let attrs = e.session_attributes();
        assert_eq!(attrs["count"], "3");
        assert_eq!(attrs["vip"], "true");
        assert_eq!(attrs["note"], "");
    }

    #[test]
    fn parameter_lookup_treats_empty_as_missing() {
        let e = event(json!({
            "Details": {
                "Parameters": { "AI_ASSISTANT_ID": "", "CONNECT_INSTANCE_ID": "i-1" }
            }
        }));
        assert_eq!(e.parameter("AI_ASSISTANT_ID"), None);
        assert_eq!(e.parameter("CONNECT_INSTANCE_ID").as_deref(), Some("i-1"));
        assert_eq!(e.parameter("MISSING"), None);
    }
}
