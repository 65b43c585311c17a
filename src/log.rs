//! The embeddable log sink (§6 "Log callback contract").
//!
//! The teacher crate reaches for `tracing` macros at call sites needing
//! diagnostics (`tracing::trace!`, `tracing::warn!`). That facade assumes a
//! process-wide subscriber, which doesn't fit this crate's contract: the
//! host embedding this library (an engine, a script runtime) swaps in its
//! own sink at construction time via a plain callback. `LogSink` plays the
//! same role `tracing` plays in the teacher — every fallible internal call
//! site logs through it — but dispatches to that caller-supplied callback
//! instead of a subscriber.

use std::io::Write;

/// Severity levels, matching the wire values from §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
}

impl Severity {
    fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// A registered log callback: `(severity, sender, message)`.
pub type LogCallback = Box<dyn Fn(Severity, &str, &str) + Send + Sync>;

/// Owns the optional user callback and the minimum severity filter, and
/// applies the default stderr formatter when no callback is registered.
pub struct LogSink {
    callback: Option<LogCallback>,
    min_level: Severity,
}

impl Default for LogSink {
    fn default() -> Self {
        Self { callback: None, min_level: Severity::Debug }
    }
}

impl LogSink {
    pub fn set_callback(&mut self, callback: LogCallback) {
        self.callback = Some(callback);
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    pub fn set_minimum_level(&mut self, level: Severity) {
        self.min_level = level;
    }

    /// Emit a structured log entry, routed to the callback if one is
    /// registered, otherwise formatted to stderr as `"[SEV] sender => message\n"`.
    pub fn log(&self, severity: Severity, sender: &str, message: &str) {
        if severity < self.min_level {
            return;
        }
        match &self.callback {
            Some(cb) => cb(severity, sender, message),
            None => {
                let mut stderr = std::io::stderr();
                let _ = writeln!(stderr, "[{}] {} => {}", severity.as_str(), sender, message);
            }
        }
    }

    #[inline]
    pub fn debug(&self, sender: &str, message: impl AsRef<str>) {
        self.log(Severity::Debug, sender, message.as_ref());
    }

    #[inline]
    pub fn info(&self, sender: &str, message: impl AsRef<str>) {
        self.log(Severity::Info, sender, message.as_ref());
    }

    #[inline]
    pub fn warning(&self, sender: &str, message: impl AsRef<str>) {
        self.log(Severity::Warning, sender, message.as_ref());
    }

    #[inline]
    pub fn error(&self, sender: &str, message: impl AsRef<str>) {
        self.log(Severity::Error, sender, message.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn callback_receives_entries_at_or_above_minimum() {
        let received: Arc<Mutex<Vec<(Severity, String, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let received_clone = Arc::clone(&received);

        let mut sink = LogSink::default();
        sink.set_minimum_level(Severity::Warning);
        sink.set_callback(Box::new(move |sev, sender, msg| {
            received_clone.lock().unwrap().push((sev, sender.to_string(), msg.to_string()));
        }));

        sink.debug("region", "should be filtered");
        sink.warning("region", "should pass");
        sink.error("region", "should also pass");

        let entries = received.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, Severity::Warning);
        assert_eq!(entries[1].0, Severity::Error);
    }
}
