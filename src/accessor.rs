use std::fmt;
use std::panic::Location;
use std::str::FromStr;
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::ConfigVarError;
use crate::key::ConfigKey;
use crate::metadata::DisplayEntry;
use crate::reporter::{AccessEvent, AccessOutcome, AccessReporter, ReporterSet, TracingReporter};
use crate::source::ConfigSource;
use crate::types::{ConfigType, ConfigValue};
use crate::value::ConfigValueType;
use crate::variable::ConfigVariable;

/// Reads typed values from a [`ConfigSource`] without ever failing.
///
/// Every read takes (or implies) a default. If the key is missing, or the
/// source cannot produce a value of the requested type, the default is
/// returned. Either way one [`AccessEvent`] goes to the configured
/// [`AccessReporter`].
///
/// All read methods are `#[track_caller]`: reports carry the file and line of
/// the call site.
#[derive(Clone)]
pub struct ConfigAccessor {
    source: Arc<dyn ConfigSource>,
    reporter: Arc<dyn AccessReporter>,
    prefix: ConfigKey,
}

/// Per-read context that does not depend on the value type.
struct Request {
    key: ConfigKey,
    requested: ConfigType,
    secret: bool,
    metadata: Vec<DisplayEntry>,
}

impl ConfigAccessor {
    /// An accessor over `source` that reports through [`TracingReporter`].
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            reporter: Arc::new(TracingReporter),
            prefix: ConfigKey::default(),
        }
    }

    pub fn builder() -> ConfigAccessorBuilder {
        ConfigAccessorBuilder::new()
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn prefix(&self) -> &ConfigKey {
        &self.prefix
    }

    /// An accessor that reads every key under `prefix`, sharing this one's
    /// source and reporter. Scopes nest.
    pub fn scoped(&self, prefix: impl Into<ConfigKey>) -> Self {
        Self {
            source: Arc::clone(&self.source),
            reporter: Arc::clone(&self.reporter),
            prefix: prefix.into().prefixed(&self.prefix),
        }
    }

    /// Read `key`, falling back to `default`.
    #[track_caller]
    pub fn get<T: ConfigValueType>(&self, key: impl Into<ConfigKey>, default: T) -> T {
        let request = self.request(key.into(), T::TYPE, false, Vec::new());
        self.resolve_or(request, default, convert_value::<T>, render_value::<T>)
    }

    /// Read `key`, returning `None` if it is missing or unusable.
    #[track_caller]
    pub fn get_optional<T: ConfigValueType>(&self, key: impl Into<ConfigKey>) -> Option<T> {
        let request = self.request(key.into(), T::TYPE, false, Vec::new());
        self.resolve_optional(request, convert_value::<T>, render_value::<T>)
    }

    /// Like [`get`](Self::get), but the value never appears in reports.
    #[track_caller]
    pub fn get_secret<T: ConfigValueType>(&self, key: impl Into<ConfigKey>, default: T) -> T {
        let request = self.request(key.into(), T::TYPE, true, Vec::new());
        self.resolve_or(request, default, convert_value::<T>, render_value::<T>)
    }

    /// Read a [`ConfigVariable`], carrying its secret flag and metadata into
    /// the report.
    #[track_caller]
    pub fn variable<T: ConfigValueType>(&self, variable: &ConfigVariable<T>) -> T {
        let request = self.request(
            variable.key().clone(),
            T::TYPE,
            variable.is_secret(),
            variable.metadata_entries(),
        );
        self.resolve_or(
            request,
            variable.default_value().clone(),
            convert_value::<T>,
            render_value::<T>,
        )
    }

    /// Read a string and parse it with `FromStr`. A parse failure is reported
    /// and falls back to `default`.
    #[track_caller]
    pub fn parsed<T>(&self, key: impl Into<ConfigKey>, default: T) -> T
    where
        T: FromStr + fmt::Display,
        T::Err: fmt::Display,
    {
        let request = self.request(key.into(), ConfigType::String, false, Vec::new());
        self.resolve_or(request, default, parse_value::<T>, render_display::<T>)
    }

    /// Optional form of [`parsed`](Self::parsed).
    #[track_caller]
    pub fn parsed_optional<T>(&self, key: impl Into<ConfigKey>) -> Option<T>
    where
        T: FromStr + fmt::Display,
        T::Err: fmt::Display,
    {
        let request = self.request(key.into(), ConfigType::String, false, Vec::new());
        self.resolve_optional(request, parse_value::<T>, render_display::<T>)
    }

    #[track_caller]
    pub fn string(&self, key: impl Into<ConfigKey>, default: &str) -> String {
        self.get(key, default.to_string())
    }

    #[track_caller]
    pub fn int(&self, key: impl Into<ConfigKey>, default: i64) -> i64 {
        self.get(key, default)
    }

    #[track_caller]
    pub fn double(&self, key: impl Into<ConfigKey>, default: f64) -> f64 {
        self.get(key, default)
    }

    #[track_caller]
    pub fn bool(&self, key: impl Into<ConfigKey>, default: bool) -> bool {
        self.get(key, default)
    }

    #[track_caller]
    pub fn string_array(&self, key: impl Into<ConfigKey>, default: &[&str]) -> Vec<String> {
        self.get(key, default.iter().map(|s| s.to_string()).collect())
    }

    fn request(
        &self,
        key: ConfigKey,
        requested: ConfigType,
        secret: bool,
        metadata: Vec<DisplayEntry>,
    ) -> Request {
        Request {
            key: key.prefixed(&self.prefix),
            requested,
            secret,
            metadata,
        }
    }

    #[track_caller]
    fn resolve_or<T>(
        &self,
        request: Request,
        default: T,
        convert: impl FnOnce(ConfigValue) -> Result<T, String>,
        render: impl Fn(&T) -> ConfigValue,
    ) -> T {
        let location = Location::caller();
        let (outcome, resolved) = self.fetch(&request, convert);
        let used_default = resolved.is_none();
        let value = resolved.unwrap_or(default);
        self.report(request, outcome, Some(render(&value)), used_default, location);
        value
    }

    #[track_caller]
    fn resolve_optional<T>(
        &self,
        request: Request,
        convert: impl FnOnce(ConfigValue) -> Result<T, String>,
        render: impl Fn(&T) -> ConfigValue,
    ) -> Option<T> {
        let location = Location::caller();
        let (outcome, resolved) = self.fetch(&request, convert);
        let returned = resolved.as_ref().map(&render);
        self.report(request, outcome, returned, false, location);
        resolved
    }

    /// Ask the source and convert. Source errors and conversion errors both
    /// become `Failed`.
    fn fetch<T>(
        &self,
        request: &Request,
        convert: impl FnOnce(ConfigValue) -> Result<T, String>,
    ) -> (AccessOutcome, Option<T>) {
        match self.source.fetch(&request.key, request.requested) {
            Ok(Some(value)) => match convert(value.clone()) {
                Ok(converted) => (AccessOutcome::Found(value), Some(converted)),
                Err(reason) => (AccessOutcome::Failed { reason }, None),
            },
            Ok(None) => (AccessOutcome::Missing, None),
            Err(err) => (
                AccessOutcome::Failed {
                    reason: err.to_string(),
                },
                None,
            ),
        }
    }

    fn report(
        &self,
        request: Request,
        outcome: AccessOutcome,
        returned: Option<ConfigValue>,
        used_default: bool,
        location: &'static Location<'static>,
    ) {
        self.reporter.report(&AccessEvent {
            key: request.key,
            requested: request.requested,
            source: self.source.name().to_string(),
            outcome,
            returned,
            used_default,
            secret: request.secret,
            metadata: request.metadata,
            location,
            timestamp: SystemTime::now(),
        });
    }
}

impl fmt::Debug for ConfigAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigAccessor")
            .field("source", &self.source.name())
            .field("prefix", &self.prefix.to_string())
            .finish()
    }
}

fn convert_value<T: ConfigValueType>(value: ConfigValue) -> Result<T, String> {
    let found = value.config_type();
    T::from_config_value(value)
        .ok_or_else(|| format!("source returned {found} for a {} request", T::TYPE))
}

fn parse_value<T>(value: ConfigValue) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        ConfigValue::String(s) => s
            .parse::<T>()
            .map_err(|e| format!("cannot parse '{s}': {e}")),
        other => Err(format!(
            "source returned {} for a string request",
            other.config_type()
        )),
    }
}

fn render_value<T: ConfigValueType>(value: &T) -> ConfigValue {
    value.clone().into_config_value()
}

fn render_display<T: fmt::Display>(value: &T) -> ConfigValue {
    ConfigValue::String(value.to_string())
}

/// Builder for a [`ConfigAccessor`].
///
/// ```ignore
/// let config = ConfigAccessor::builder()
///     .source(TableSource::from_file(path)?)
///     .add_reporter(TracingReporter)
///     .add_reporter(recorder.clone())
///     .prefix("server")
///     .build()?;
/// ```
pub struct ConfigAccessorBuilder {
    source: Option<Arc<dyn ConfigSource>>,
    reporters: Vec<Arc<dyn AccessReporter>>,
    reporting: bool,
    prefix: ConfigKey,
}

impl ConfigAccessorBuilder {
    fn new() -> Self {
        Self {
            source: None,
            reporters: Vec::new(),
            reporting: true,
            prefix: ConfigKey::default(),
        }
    }

    /// Set the source to read from. Required.
    pub fn source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Set a source that is already shared elsewhere.
    pub fn shared_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace all reporters with `reporter`.
    pub fn reporter(mut self, reporter: impl AccessReporter + 'static) -> Self {
        self.reporters.clear();
        self.reporters.push(Arc::new(reporter));
        self
    }

    /// Add a reporter alongside any already configured.
    pub fn add_reporter(mut self, reporter: impl AccessReporter + 'static) -> Self {
        self.reporters.push(Arc::new(reporter));
        self
    }

    /// Drop all access reports. Reads still fall back to defaults.
    pub fn no_reporting(mut self) -> Self {
        self.reporting = false;
        self
    }

    /// Prefix every key read through the accessor.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = ConfigKey::new(prefix);
        self
    }

    /// Build the accessor. Without any reporter, access is reported through
    /// [`TracingReporter`].
    pub fn build(self) -> Result<ConfigAccessor, ConfigVarError> {
        let source = self.source.ok_or(ConfigVarError::SourceRequired)?;

        let mut reporters = self.reporters;
        let reporter: Arc<dyn AccessReporter> = if !self.reporting {
            Arc::new(ReporterSet::new())
        } else if reporters.len() > 1 {
            Arc::new(reporters.into_iter().collect::<ReporterSet>())
        } else {
            reporters.pop().unwrap_or_else(|| Arc::new(TracingReporter))
        };

        tracing::debug!(
            source = %source.name(),
            prefix = %self.prefix,
            reporting = self.reporting,
            "config accessor built"
        );

        Ok(ConfigAccessor {
            source,
            reporter,
            prefix: self.prefix,
        })
    }
}
