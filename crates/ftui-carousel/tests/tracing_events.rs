//! Structured log events emitted by the carousel engine.
//!
//! Accepted changes log at DEBUG with `from`/`to`/`cause`, dropped navigation
//! at TRACE with the rejection reason.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ftui_carousel::{BreakpointRule, Carousel, CarouselConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use web_time::Instant;

// ── Capture infrastructure ──────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    events.lock().unwrap().clone()
}

fn find<'a>(events: &'a [CapturedEvent], message: &str) -> Vec<&'a CapturedEvent> {
    events.iter().filter(|e| e.message() == message).collect()
}

fn finite(items: usize) -> CarouselConfig {
    CarouselConfig {
        infinite: false,
        transition_ms: 300,
        ..CarouselConfig::with_items(items)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Navigation
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn accepted_change_logs_debug_with_indices_and_cause() {
    let events = capture(|| {
        let mut c = Carousel::new(finite(5));
        assert!(c.next_slide());
    });

    let changed = find(&events, "slide changed");
    assert_eq!(changed.len(), 1);
    let event = changed[0];
    assert_eq!(event.level, tracing::Level::DEBUG);
    assert_eq!(event.field("from"), Some("0"));
    assert_eq!(event.field("to"), Some("1"));
    assert_eq!(event.field("cause"), Some("Command"));
    assert_eq!(event.field("wraps"), Some("false"));
}

#[test]
fn locked_navigation_logs_trace_drop() {
    let events = capture(|| {
        let mut c = Carousel::new(finite(5));
        assert!(c.next_slide());
        assert!(!c.next_slide());
    });

    let dropped = find(&events, "navigation dropped");
    assert_eq!(dropped.len(), 1);
    let event = dropped[0];
    assert_eq!(event.level, tracing::Level::TRACE);
    assert_eq!(event.field("reason"), Some("Locked"));
    assert_eq!(event.field("cause"), Some("Command"));
    assert_eq!(event.field("current"), Some("1"));
    assert_eq!(find(&events, "slide changed").len(), 1);
}

#[test]
fn boundary_drop_reports_unchanged() {
    let events = capture(|| {
        let mut c = Carousel::new(finite(5));
        assert!(c.notify_key_down("ArrowLeft"));
        assert_eq!(c.current_slide(), 0);
    });

    let dropped = find(&events, "navigation dropped");
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].field("reason"), Some("Unchanged"));
    assert_eq!(dropped[0].field("cause"), Some("Keyboard"));
}

#[test]
fn autoplay_changes_are_attributed_to_autoplay() {
    let events = capture(|| {
        let mut c = Carousel::new(CarouselConfig {
            autoplay: true,
            autoplay_speed_ms: 500,
            ..finite(5)
        });
        c.tick(Duration::from_millis(500));
        c.pause();
    });

    let changed = find(&events, "slide changed");
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].field("cause"), Some("Autoplay"));
    assert_eq!(find(&events, "autoplay paused").len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Layout and time
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn breakpoint_change_logs_new_layout() {
    let events = capture(|| {
        let mut c = Carousel::new(CarouselConfig {
            slides_to_show: 3,
            responsive: vec![BreakpointRule::new(600, 1)],
            ..finite(9)
        });
        assert!(c.notify_viewport_changed(400));
        assert!(!c.notify_viewport_changed(500));
    });

    let layout = find(&events, "breakpoint layout changed");
    assert_eq!(layout.len(), 1);
    assert_eq!(layout[0].level, tracing::Level::DEBUG);
    assert_eq!(layout[0].field("width"), Some("400"));
    assert_eq!(layout[0].field("slides_to_show"), Some("1"));
}

#[test]
fn suspended_host_gap_is_logged_once() {
    let events = capture(|| {
        let mut c = Carousel::new(finite(5));
        let t0 = Instant::now();
        c.tick_at(t0);
        c.tick_at(t0 + Duration::from_secs(3600));
    });

    let clamped = find(&events, "frame gap clamped");
    assert_eq!(clamped.len(), 1);
    assert_eq!(clamped[0].level, tracing::Level::TRACE);
}
