//! Standard metadata keys.
//!
//! Applications can define their own keys the same way; these cover the
//! fields most variables end up carrying.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metadata::MetadataKey;

/// The project a variable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Project;

impl MetadataKey for Project {
    type Value = Option<String>;
    const LABEL: &'static str = "Project";

    fn default_value() -> Self::Value {
        None
    }
}

/// The team responsible for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Team;

impl MetadataKey for Team {
    type Value = Option<String>;
    const LABEL: &'static str = "Owning Team";

    fn default_value() -> Self::Value {
        None
    }
}

/// Free-form explanation of what a variable controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Description;

impl MetadataKey for Description {
    type Value = Option<String>;
    const LABEL: &'static str = "Description";

    fn default_value() -> Self::Value {
        None
    }
}

/// Where a variable is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Experimental,
    Stable,
    Deprecated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lifecycle;

impl MetadataKey for Lifecycle {
    type Value = Option<Stage>;
    const LABEL: &'static str = "Lifecycle";

    fn default_value() -> Self::Value {
        None
    }
}

/// The date after which a variable should be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Expiration;

impl MetadataKey for Expiration {
    type Value = Option<NaiveDate>;
    const LABEL: &'static str = "Expiration Date";

    fn default_value() -> Self::Value {
        None
    }

    fn format(value: &Self::Value) -> Option<String> {
        value.map(|date| date.format("%Y-%m-%d").to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tags;

impl MetadataKey for Tags {
    type Value = Vec<String>;
    const LABEL: &'static str = "Tags";

    fn default_value() -> Self::Value {
        Vec::new()
    }

    fn format(value: &Self::Value) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value.join(", "))
        }
    }
}
