//! Typed configuration variables that never fail at the call site.
//!
//! Configvar sits between application code and whatever resolves
//! configuration. Call sites ask for a key and a default; they get back a
//! value of the right type, always. Every read, successful or not, is
//! reported so nothing goes missing silently.
//!
//! ```ignore
//! let config = ConfigAccessor::new(TableSource::from_file(path)?);
//!
//! let port = config.int("server.port", 8080);
//! let pool = config.variable(&POOL_SIZE);
//! ```
//!
//! # Why configvar
//!
//! Configuration errors rarely deserve to crash a request. A typo in a key,
//! a string where an integer was expected, or a missing section should fall
//! back to a sensible default and be visible to operators, not propagated as
//! a `Result` through every call site. Configvar makes that the only mode:
//! read methods return `T`, and an [`AccessReporter`] sees what really
//! happened.
//!
//! # Reading values
//!
//! [`ConfigAccessor`] dispatches over a fixed set of types (see
//! [`ConfigType`]): `String`, `i64`, `f64`, `bool`, bytes, and arrays of each.
//! Anything that implements `FromStr` can be read with
//! [`parsed()`](ConfigAccessor::parsed), which reads a string and parses it.
//!
//! | Call | Missing key | Unusable value |
//! |------|-------------|----------------|
//! | `get(key, default)` | default | default |
//! | `get_optional(key)` | `None` | `None` |
//! | `get_secret(key, default)` | default | default, redacted report |
//! | `variable(&var)` | `var`'s default | `var`'s default |
//! | `parsed(key, default)` | default | default |
//!
//! Keys are dotted paths into nested tables (`database.pool_size`).
//! [`scoped()`](ConfigAccessor::scoped) returns an accessor that prefixes
//! every key, so a subsystem can read `url` instead of `database.url`.
//!
//! # Sources
//!
//! Accessors read from a [`ConfigSource`]. The crate does no layering,
//! merging, or caching of its own: a source hands back a resolved value or
//! says the key is absent. [`TableSource`] answers from a `toml::Table`
//! built from TOML text, a file, any `Serialize` value, or a confique
//! `Config` struct loaded from its `#[config(default)]` values.
//!
//! # Variables and metadata
//!
//! A [`ConfigVariable`] bundles a key, a default, a secret flag, and
//! descriptive metadata. Metadata fields are types, not strings: each field
//! is a marker implementing [`MetadataKey`], which fixes its value type,
//! default, and label. See [`keys`] for the standard set.
//!
//! ```ignore
//! let checkout = ConfigVariable::new("feature.checkout_v2", false)
//!     .with_metadata::<Team>(Some("payments".into()))
//!     .with_metadata::<Lifecycle>(Some(Stage::Experimental));
//!
//! for entry in checkout.metadata_entries() {
//!     println!("{entry}");
//! }
//! ```
//!
//! Display text for each field is computed when the field is set and kept
//! as-is afterwards.
//!
//! # Reporting
//!
//! Each read produces one [`AccessEvent`]: the full key, requested type,
//! outcome, the value returned, whether it was the default, the variable's
//! metadata, and the call site. Reporters:
//!
//! - [`TracingReporter`] (the default): `tracing` events on target
//!   `configvar::access`.
//! - [`RecordingReporter`]: keeps events in memory, for tests and admin
//!   views.
//! - [`ReporterSet`]: fans out to several reporters.
//!
//! Secret reads never expose their value or failure reason.
//!
//! # Error handling
//!
//! Reads do not return errors. [`ConfigVarError`] surfaces only where
//! something is being set up: loading a [`TableSource`] or building an
//! accessor without a source.

pub mod error;
pub mod keys;
pub mod types;

mod accessor;
mod describe;
mod key;
mod metadata;
mod reporter;
mod source;
mod value;
mod variable;

#[cfg(test)]
mod fixtures;

pub use accessor::{ConfigAccessor, ConfigAccessorBuilder};
pub use describe::describe;
pub use error::ConfigVarError;
pub use key::ConfigKey;
pub use metadata::{DisplayEntry, MetadataKey, MetadataStore};
pub use reporter::{
    AccessEvent, AccessOutcome, AccessReporter, RecordingReporter, ReporterSet, TracingReporter,
};
pub use source::{ConfigSource, TableSource};
pub use types::{ConfigType, ConfigValue};
pub use value::ConfigValueType;
pub use variable::ConfigVariable;
