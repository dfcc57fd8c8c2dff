//! Configuration.
//!
//! The Lambda environment is fixed for the life of the process, so we read it
//! once at startup into [`Settings`]. Each invocation then resolves the
//! values it actually uses, letting contact flow parameters override the
//! environment.

use lambda_runtime::tracing;
use serde_json::json;
use std::fmt;

use crate::{error::ForwardError, event::InvocationEvent};

pub const AI_ASSISTANT_ID: &str = "AI_ASSISTANT_ID";
pub const CONNECT_INSTANCE_ID: &str = "CONNECT_INSTANCE_ID";
pub const DEBUG_LOG: &str = "DEBUG_LOG";

/// Parameter names that configure this function and are never forwarded as
/// session data.
pub const RESERVED_KEYS: [&str; 2] = [AI_ASSISTANT_ID, CONNECT_INSTANCE_ID];

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Settings {
    pub instance_id: Option<String>,
    pub assistant_id: Option<String>,
    pub debug: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Settings {
            instance_id: get(CONNECT_INSTANCE_ID),
            assistant_id: get(AI_ASSISTANT_ID),
            debug: get(DEBUG_LOG).is_some_and(|v| v.eq_ignore_ascii_case("true")),
        }
    }

    /// Work out the assistant and instance to use for this event.
    pub fn resolve(&self, event: &InvocationEvent) -> Result<Resolved, ForwardError> {
        let (assistant_id, assistant_source) =
            pick(event, AI_ASSISTANT_ID, self.assistant_id.as_deref())?;
        let (instance_id, instance_source) =
            pick(event, CONNECT_INSTANCE_ID, self.instance_id.as_deref())?;

        Ok(Resolved {
            assistant_id,
            assistant_source,
            instance_id,
            instance_source,
        })
    }
}

/// Where a resolved value came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Source {
    Event,
    Environment,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Event => f.write_str("event"),
            Source::Environment => f.write_str("environment"),
        }
    }
}

/// Per-invocation configuration, with no optional pieces left.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolved {
    pub assistant_id: String,
    pub assistant_source: Source,
    pub instance_id: String,
    pub instance_source: Source,
}

fn pick(
    event: &InvocationEvent,
    key: &'static str,
    fallback: Option<&str>,
) -> Result<(String, Source), ForwardError> {
    let (value, source) = match event.parameter(key) {
        Some(v) => (v, Source::Event),
        None => match fallback {
            Some(v) => (v.to_owned(), Source::Environment),
            None => return Err(ForwardError::Configuration { key }),
        },
    };

    tracing::debug!(
        params = %json!({ "source": source.to_string() }),
        "Retrieved parameter {key}"
    );

    Ok((value, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    fn event_with(parameters: Value) -> InvocationEvent {
        InvocationEvent::from_value(json!({
            "Details": {
                "ContactData": { "ContactId": "c-1" },
                "Parameters": parameters
            }
        }))
        .unwrap()
    }

    #[test]
    fn reads_environment() {
        let s = settings(&[
            (CONNECT_INSTANCE_ID, "i-env"),
            (AI_ASSISTANT_ID, "a-env"),
            (DEBUG_LOG, "true"),
        ]);
        assert_eq!(s.instance_id.as_deref(), Some("i-env"));
        assert_eq!(s.assistant_id.as_deref(), Some("a-env"));
        assert!(s.debug);
    }

    #[test]
    fn debug_flag() {
        assert!(!settings(&[]).debug);
        assert!(!settings(&[(DEBUG_LOG, "false")]).debug);
        assert!(!settings(&[(DEBUG_LOG, "1")]).debug);
        assert!(settings(&[(DEBUG_LOG, "TRUE")]).debug);
    }

    #[test]
    fn empty_environment_values_are_unset() {
        let s = settings(&[(CONNECT_INSTANCE_ID, ""), (AI_ASSISTANT_ID, "")]);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn event_overrides_environment() {
        let s = settings(&[(CONNECT_INSTANCE_ID, "i-env"), (AI_ASSISTANT_ID, "a-env")]);
        let r = s
            .resolve(&event_with(json!({
                "AI_ASSISTANT_ID": "a-event",
                "CONNECT_INSTANCE_ID": "i-event"
            })))
            .unwrap();
        assert_eq!(r.assistant_id, "a-event");
        assert_eq!(r.assistant_source, Source::Event);
        assert_eq!(r.instance_id, "i-event");
        assert_eq!(r.instance_source, Source::Event);
    }

    #[test]
    fn environment_is_the_fallback() {
        let s = settings(&[(CONNECT_INSTANCE_ID, "i-env"), (AI_ASSISTANT_ID, "a-env")]);
        let r = s.resolve(&event_with(json!({ "intent": "billing" }))).unwrap();
        assert_eq!(r.assistant_id, "a-env");
        assert_eq!(r.assistant_source, Source::Environment);
        assert_eq!(r.instance_id, "i-env");
        assert_eq!(r.instance_source, Source::Environment);
    }

    #[test]
    fn missing_assistant_is_a_configuration_error() {
        let s = settings(&[(CONNECT_INSTANCE_ID, "i-env")]);
        let err = s.resolve(&event_with(json!({}))).unwrap_err();
        assert!(matches!(
            err,
            ForwardError::Configuration {
                key: AI_ASSISTANT_ID
            }
        ));
    }

    #[test]
    fn missing_instance_is_a_configuration_error() {
        let s = Settings::default();
        let err = s
            .resolve(&event_with(json!({ "AI_ASSISTANT_ID": "a1" })))
            .unwrap_err();
        assert!(err.to_string().contains("CONNECT_INSTANCE_ID"));
    }
}
