//! Lambda runtime entry point for the Q Connect session data updater.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;

use qconnect_session_lambda::{Response, Services};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init().await?;
    let ref_svcs = &svcs;

    run(service_fn(|event: LambdaEvent<Value>| async move {
        let (payload, context) = event.into_parts();
        lambda_runtime::tracing::debug!(request_id = %context.request_id, "invoked");
        Ok::<Response, Error>(ref_svcs.dispatch(payload).await)
    }))
    .await?;
    Ok(())
}
