//! Log output setup.
//!
//! Each record is one line of JSON with `level`, `message`, and (where the
//! call site provides one) a `params` field holding a JSON mapping. Call
//! sites pass `params = %json!({...})`; [`JsonLines`] parses that text back
//! so it lands in the record as a nested object rather than a string. We
//! don't print timestamps because CloudWatch records its own.

use lambda_runtime::tracing::{
    field::{Field, Visit},
    Event, Subscriber,
};
use serde_json::{Map, Value};
use std::fmt;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
    EnvFilter,
};

/// Install the global subscriber.
pub fn init(debug: bool) {
    tracing_subscriber::fmt()
        .event_format(JsonLines)
        .with_env_filter(filter(debug))
        .init();
}

/// The level filter: INFO everywhere, our own records at DEBUG when `debug`
/// is set, and `RUST_LOG`, if present, layered on top.
pub fn filter(debug: bool) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    build_filter(debug, rust_log.as_deref())
}

fn build_filter(debug: bool, extra: Option<&str>) -> EnvFilter {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(extra.unwrap_or_default());

    // Only our own debug records; the SDK's are far too chatty.
    if debug {
        if let Ok(directive) = format!("{}=debug", env!("CARGO_CRATE_NAME")).parse() {
            filter = filter.add_directive(directive);
        }
    }

    filter
}

/// One JSON object per line: `level`, `message`, and any other fields.
pub struct JsonLines;

impl<S, N> FormatEvent<S, N> for JsonLines
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut record = Map::new();
        record.insert(
            "level".to_owned(),
            Value::from(event.metadata().level().to_string()),
        );
        event.record(&mut Fields(&mut record));
        writeln!(writer, "{}", Value::Object(record))
    }
}

struct Fields<'a>(&'a mut Map<String, Value>);

impl Fields<'_> {
    fn insert_text(&mut self, field: &Field, text: String) {
        let value = if field.name() == "params" {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        } else {
            Value::String(text)
        };
        self.0.insert(field.name().to_owned(), value);
    }
}

impl Visit for Fields<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert_text(field, value.to_owned());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_owned(), Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_owned(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_owned(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert_text(field, format!("{value:?}"));
    }
}
