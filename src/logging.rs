//! Trace events from the formatting pipeline.
//!
//! Three things are reported, all prefixed with `streamfmt:`:
//!
//! - `buffer grew OLD -> NEW units after WRITTEN written`, one line per
//!   adapter overflow (sent to [`TraceSink::emit_line`])
//! - `stream insertion failed: ERR`, when a captured argument's insertion
//!   errors and the engine only sees `fmt::Error`
//! - `sink write failed: ERR`, when a printed line is rejected by its sink
//!
//! Events go to one process-wide [`TraceSink`]. With none installed, the
//! adapter does not even build its growth message.
//!
//! ```no_run
//! use std::sync::Arc;
//! use streamfmt::{TraceSink, set_trace_sink};
//!
//! struct StderrTrace;
//!
//! impl TraceSink for StderrTrace {
//!     fn emit(&self, message: &str) {
//!         eprintln!("error: {message}");
//!     }
//!     fn emit_line(&self, message: &str) {
//!         eprintln!("{message}");
//!     }
//! }
//!
//! set_trace_sink(Arc::new(StderrTrace));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Set by [`disable_logging`]; checked before every event.
static LOGGING_DISABLED: AtomicBool = AtomicBool::new(false);

/// Stop delivering trace events, even to an installed sink.
pub fn disable_logging() {
    LOGGING_DISABLED.store(true, Ordering::SeqCst);
}

/// Resume delivering trace events.
pub fn enable_logging() {
    LOGGING_DISABLED.store(false, Ordering::SeqCst);
}

/// False only between [`disable_logging`] and [`enable_logging`].
pub fn is_logging_enabled() -> bool {
    !LOGGING_DISABLED.load(Ordering::SeqCst)
}

/// Receives streamfmt's trace events.
///
/// Failures arrive through `emit`; buffer growth, which can fire many times
/// per print, arrives through `emit_line`.
pub trait TraceSink: Send + Sync {
    /// A failure of an insertion or a sink write.
    fn emit(&self, message: &str);
    /// One buffer growth step.
    fn emit_line(&self, message: &str);
}

static TRACE_SINK: RwLock<Option<Arc<dyn TraceSink>>> = RwLock::new(None);

/// Install `sink` for every later event, replacing any previous sink.
pub fn set_trace_sink(sink: Arc<dyn TraceSink>) {
    if let Ok(mut guard) = TRACE_SINK.write() {
        *guard = Some(sink);
    }
}

/// The installed sink, if any.
pub fn get_trace_sink() -> Option<Arc<dyn TraceSink>> {
    TRACE_SINK.read().ok().and_then(|guard| guard.clone())
}

/// Uninstall the sink; events are dropped until another is set.
pub fn reset_trace_sink() {
    if let Ok(mut guard) = TRACE_SINK.write() {
        *guard = None;
    }
}

/// Whether an event emitted now would reach a sink.
pub(crate) fn is_tracing() -> bool {
    is_logging_enabled() && get_trace_sink().is_some()
}

/// Report a failure to the installed sink.
pub fn log_event(message: &str) {
    if !is_logging_enabled() {
        return;
    }
    if let Some(sink) = get_trace_sink() {
        sink.emit(message);
    }
}

/// Report a growth step to the installed sink.
pub fn log_event_line(message: &str) {
    if !is_logging_enabled() {
        return;
    }
    if let Some(sink) = get_trace_sink() {
        sink.emit_line(message);
    }
}
