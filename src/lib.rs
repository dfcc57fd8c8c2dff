//! Copy Amazon Connect contact flow parameters into a Q Connect session.
//!
//! A contact flow invokes this Lambda with the contact's id and whatever
//! parameters the flow author configured. We look up the Q Connect session
//! that Connect attached to the contact and write those parameters into it as
//! session data, where the AI agent's prompts can pick them up. Two parameter
//! names, `AI_ASSISTANT_ID` and `CONNECT_INSTANCE_ID`, configure this function
//! and are never forwarded.
//!
//! The crate is a library so that the same code backs two executables: the
//! Lambda runtime entry point (`qconnect-session-lambda`), and a "oneshot"
//! tool that processes a single event given on the command line, which is
//! handy for trying things out against a real Connect instance.
//!
//! Connect invokes Lambdas synchronously and waits on the result, so there's
//! no streaming here: each invocation makes at most two API calls, in order,
//! and returns a small JSON response.

use lambda_runtime::Error;
use serde_json::Value;

pub mod contacts;
pub mod error;
pub mod event;
pub mod forwarder;
pub mod logging;
pub mod response;
pub mod sessions;
pub mod settings;

pub use response::Response;
pub use settings::Settings;

/// Long-lived state shared by every invocation handled by this process.
pub struct Services {
    connect: aws_sdk_connect::Client,
    qconnect: aws_sdk_qconnect::Client,
    settings: Settings,
}

impl Services {
    /// Create the long-lived state for this Lambda process: logging, AWS
    /// clients, and the environment settings.
    pub async fn init() -> Result<Self, Error> {
        let settings = Settings::from_env();
        logging::init(settings.debug);

        let config = aws_config::load_from_env().await;
        let connect = aws_sdk_connect::Client::new(&config);
        let qconnect = aws_sdk_qconnect::Client::new(&config);

        if settings.instance_id.is_none() {
            lambda_runtime::tracing::warn!(
                "{} is not set; every event will need to supply it",
                settings::CONNECT_INSTANCE_ID
            );
        }

        Ok(Services {
            connect,
            qconnect,
            settings,
        })
    }

    /// Handle one invocation. Failures are reported in the response, not
    /// as a Lambda error, so the contact flow can branch on `statusCode`.
    pub async fn dispatch(&self, payload: Value) -> Response {
        forwarder::handle(payload, &self.settings, &self.connect, &self.qconnect).await
    }
}
