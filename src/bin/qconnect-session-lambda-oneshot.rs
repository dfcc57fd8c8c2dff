//! "Oneshot" version of the Q Connect session data updater.
//!
//! This executable processes one Connect event, given as JSON text on the
//! command line (or `-` to read it from stdin), against the real AWS APIs and
//! prints the response. Configuration comes from the same environment
//! variables the Lambda uses.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::{env, io::Read};

use qconnect_session_lambda::Services;

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = env::args();
    args.next(); // skip argv[0]

    let json_text = args
        .next()
        .ok_or_else(|| anyhow!("first argument should be the Connect event JSON text, or `-`"))?;

    let json_text = if json_text == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read event from stdin")?;
        buf
    } else {
        json_text
    };

    let payload: Value = serde_json::from_str(&json_text).context("event is not valid JSON")?;

    let svcs = Services::init()
        .await
        .map_err(|e| anyhow!("initialization failed: {e}"))?;
    let response = svcs.dispatch(payload).await;

    serde_json::to_writer(std::io::stdout().lock(), &response)?;
    println!();
    Ok(())
}
