//! Access reporting: every read through a [`ConfigAccessor`](crate::ConfigAccessor)
//! produces one [`AccessEvent`], delivered to an [`AccessReporter`].
//!
//! Reporters are the observability side of "reads never fail": a missing key
//! or a bad value falls back to the caller's default silently at the call
//! site, but the event records exactly what happened.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::key::ConfigKey;
use crate::metadata::DisplayEntry;
use crate::types::{ConfigType, ConfigValue};

const REDACTED: &str = "<redacted>";

/// What the source said about a key.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessOutcome {
    /// The source returned a usable value.
    Found(ConfigValue),
    /// The source has no value for the key.
    Missing,
    /// The source had a value that could not be used.
    Failed { reason: String },
}

/// A single configuration read.
///
/// `Debug` and `Display` both hide values and failure reasons of secret
/// reads.
#[derive(Clone)]
pub struct AccessEvent {
    /// Fully qualified key, including any accessor prefix.
    pub key: ConfigKey,
    pub requested: ConfigType,
    pub source: String,
    pub outcome: AccessOutcome,
    /// The value handed back to the caller; `None` for an optional read that
    /// found nothing.
    pub returned: Option<ConfigValue>,
    /// Whether `returned` came from the caller's default.
    pub used_default: bool,
    pub secret: bool,
    /// Display entries of the variable being read; empty for ad-hoc reads.
    pub metadata: Vec<DisplayEntry>,
    pub location: &'static Location<'static>,
    pub timestamp: SystemTime,
}

impl AccessEvent {
    /// The returned value as text, redacted for secrets.
    pub fn display_value(&self) -> String {
        match (&self.returned, self.secret) {
            (_, true) => REDACTED.to_string(),
            (Some(value), false) => value.to_string(),
            (None, false) => "<none>".to_string(),
        }
    }

    /// The failure reason, if any. Secrets never expose the reason either,
    /// since conversion errors may quote the raw value.
    pub fn failure(&self) -> Option<&str> {
        match &self.outcome {
            AccessOutcome::Failed { .. } if self.secret => Some(REDACTED),
            AccessOutcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Debug stand-in for a hidden value.
struct Redacted;

impl fmt::Debug for Redacted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

struct RedactedOutcome<'a>(&'a AccessOutcome);

impl fmt::Debug for RedactedOutcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            AccessOutcome::Found(_) => f.debug_tuple("Found").field(&Redacted).finish(),
            AccessOutcome::Missing => f.write_str("Missing"),
            AccessOutcome::Failed { .. } => f
                .debug_struct("Failed")
                .field("reason", &Redacted)
                .finish(),
        }
    }
}

impl fmt::Debug for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("AccessEvent");
        s.field("key", &self.key)
            .field("requested", &self.requested)
            .field("source", &self.source);
        if self.secret {
            s.field("outcome", &RedactedOutcome(&self.outcome))
                .field("returned", &self.returned.as_ref().map(|_| Redacted));
        } else {
            s.field("outcome", &self.outcome)
                .field("returned", &self.returned);
        }
        s.field("used_default", &self.used_default)
            .field("secret", &self.secret)
            .field("metadata", &self.metadata)
            .field("location", &self.location)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl fmt::Display for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &self.outcome {
            AccessOutcome::Found(_) => "found",
            AccessOutcome::Missing => "missing",
            AccessOutcome::Failed { .. } => "failed",
        };
        write!(
            f,
            "{} ({}) {status} in {} -> {}",
            self.key,
            self.requested,
            self.source,
            self.display_value()
        )?;
        if self.used_default {
            write!(f, " [default]")?;
        }
        if let Some(reason) = self.failure() {
            write!(f, ": {reason}")?;
        }
        Ok(())
    }
}

/// Receives one call per configuration read.
pub trait AccessReporter: Send + Sync {
    fn report(&self, event: &AccessEvent);
}

impl<R: AccessReporter + ?Sized> AccessReporter for Arc<R> {
    fn report(&self, event: &AccessEvent) {
        (**self).report(event)
    }
}

/// Emits each access as a `tracing` event on target `configvar::access`.
///
/// Found and missing keys log at `debug`; unusable values log at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl AccessReporter for TracingReporter {
    fn report(&self, event: &AccessEvent) {
        let key = event.key.to_string();
        let location = format!("{}:{}", event.location.file(), event.location.line());
        match &event.outcome {
            AccessOutcome::Found(_) => tracing::debug!(
                target: "configvar::access",
                key = %key,
                value_type = %event.requested,
                source = %event.source,
                value = %event.display_value(),
                location = %location,
                "config value resolved"
            ),
            AccessOutcome::Missing => tracing::debug!(
                target: "configvar::access",
                key = %key,
                value_type = %event.requested,
                source = %event.source,
                value = %event.display_value(),
                used_default = event.used_default,
                location = %location,
                "config value missing"
            ),
            AccessOutcome::Failed { .. } => tracing::warn!(
                target: "configvar::access",
                key = %key,
                value_type = %event.requested,
                source = %event.source,
                value = %event.display_value(),
                error = event.failure().unwrap_or_default(),
                location = %location,
                "config value unusable, using default"
            ),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<AccessEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far, oldest first.
    pub fn events(&self) -> Vec<AccessEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl AccessReporter for RecordingReporter {
    fn report(&self, event: &AccessEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Forwards each event to every member, in insertion order.
#[derive(Clone, Default)]
pub struct ReporterSet {
    reporters: Vec<Arc<dyn AccessReporter>>,
}

impl ReporterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reporter: Arc<dyn AccessReporter>) {
        self.reporters.push(reporter);
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl FromIterator<Arc<dyn AccessReporter>> for ReporterSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn AccessReporter>>>(iter: I) -> Self {
        Self {
            reporters: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for ReporterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterSet")
            .field("len", &self.reporters.len())
            .finish()
    }
}

impl AccessReporter for ReporterSet {
    fn report(&self, event: &AccessEvent) {
        for reporter in &self.reporters {
            reporter.report(event);
        }
    }
}
