#![forbid(unsafe_code)]

//! Event capture for log assertions.
//!
//! ```rust,ignore
//! let (capture, events) = EventCapture::new();
//! let subscriber = tracing_subscriber::registry().with(capture);
//! tracing::subscriber::with_default(subscriber, || { /* code under test */ });
//! assert!(events.warnings().iter().any(|e| e.has_field("ticket")));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

/// One captured event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: tracing::Level,
    pub target: String,
    pub fields: HashMap<String, String>,
    /// Name of the innermost span the event was emitted in.
    pub span: Option<String>,
}

impl CapturedEvent {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Layer that records every event.
#[derive(Debug)]
pub struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Read side of an [`EventCapture`].
#[derive(Debug, Clone)]
pub struct CapturedEvents {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    #[must_use]
    pub fn new() -> (Self, CapturedEvents) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
            },
            CapturedEvents { events },
        )
    }
}

impl CapturedEvents {
    #[must_use]
    pub fn all(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn at_level(&self, level: tracing::Level) -> Vec<CapturedEvent> {
        self.all().into_iter().filter(|e| e.level == level).collect()
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<CapturedEvent> {
        self.at_level(tracing::Level::WARN)
    }

    #[must_use]
    pub fn with_target(&self, target: &str) -> Vec<CapturedEvent> {
        self.all().into_iter().filter(|e| e.target == target).collect()
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));
        let span = ctx
            .event_span(event)
            .map(|span| span.name().to_string());
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                fields,
                span,
            });
    }
}

/// Run `f` with a capturing subscriber installed for the current thread.
pub fn capture<F: FnOnce()>(f: F) -> CapturedEvents {
    let (layer, events) = EventCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    events
}
