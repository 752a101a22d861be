//! Type-keyed metadata attached to configuration variables.
//!
//! Each metadata field is a zero-sized marker type implementing
//! [`MetadataKey`]. The marker fixes the field's value type, its default, its
//! display label, and how values are rendered. [`MetadataStore`] holds one
//! value per marker type, keyed by the marker's `TypeId`.
//!
//! ```ignore
//! struct Project;
//! impl MetadataKey for Project {
//!     type Value = Option<String>;
//!     const LABEL: &'static str = "Project";
//!     fn default_value() -> Self::Value { None }
//! }
//!
//! let mut store = MetadataStore::new();
//! store.set::<Project>(Some("Onboarding".into()));
//! assert_eq!(store.get::<Project>().as_deref(), Some("Onboarding"));
//! ```
//!
//! Display text is computed when a value is set and frozen with it. Reading
//! [`display_entries()`](MetadataStore::display_entries) later returns the
//! text as it was at write time.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;

use crate::describe;

/// A metadata field, identified by the implementing type itself.
pub trait MetadataKey: 'static {
    /// The type stored under this key.
    type Value: Clone + PartialEq + fmt::Debug + Serialize + Send + Sync + 'static;

    /// Human-readable field name, e.g. `"Expiration Date"`.
    const LABEL: &'static str;

    /// Returned by [`MetadataStore::get`] when nothing has been set.
    fn default_value() -> Self::Value;

    /// Render a value for display. `None` means there is nothing to show.
    ///
    /// The default unwraps optionals, renders unit enum variants as their
    /// serialized name, and uses the plain textual form for everything else.
    fn format(value: &Self::Value) -> Option<String> {
        describe::describe(value)
    }
}

/// One explicitly set metadata field, as shown to people.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayEntry {
    pub label: String,
    pub value: Option<String>,
}

impl DisplayEntry {
    pub fn new(label: impl Into<String>, value: Option<String>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl fmt::Display for DisplayEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {value}", self.label),
            None => write!(f, "{}: <none>", self.label),
        }
    }
}

/// Object-safe view of a stored value.
trait ErasedValue: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_erased(&self, other: &dyn ErasedValue) -> bool;
    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> ErasedValue for T
where
    T: PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn ErasedValue) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }

    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Value and frozen display text live in one slot, so a single insert
/// updates both.
#[derive(Clone)]
struct Slot {
    value: Arc<dyn ErasedValue>,
    display: DisplayEntry,
}

/// Heterogeneous, type-safe storage for [`MetadataKey`] values.
///
/// A value type: clones are independent, and a clone only copies reference
/// counts. Equality compares stored keys and values.
#[derive(Clone, Default)]
pub struct MetadataStore {
    slots: BTreeMap<TypeId, Slot>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value set for `K`, or `K::default_value()` if none was set.
    pub fn get<K: MetadataKey>(&self) -> K::Value {
        match self.slots.get(&TypeId::of::<K>()) {
            Some(slot) => {
                let value = slot.value.as_any().downcast_ref::<K::Value>();
                // Slots under TypeId::of::<K>() only ever hold K::Value.
                debug_assert!(
                    value.is_some(),
                    "metadata slot for {} holds the wrong type",
                    K::LABEL
                );
                value.cloned().unwrap_or_else(K::default_value)
            }
            None => K::default_value(),
        }
    }

    /// Store `value` for `K`, replacing any previous value, and freeze its
    /// display text.
    pub fn set<K: MetadataKey>(&mut self, value: K::Value) {
        let display = DisplayEntry::new(K::LABEL, K::format(&value));
        self.slots.insert(
            TypeId::of::<K>(),
            Slot {
                value: Arc::new(value),
                display,
            },
        );
    }

    /// Whether `K` has been explicitly set.
    pub fn contains<K: MetadataKey>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<K>())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// One entry per explicitly set key. Order is unspecified.
    pub fn display_entries(&self) -> Vec<DisplayEntry> {
        self.slots.values().map(|slot| slot.display.clone()).collect()
    }
}

impl PartialEq for MetadataStore {
    fn eq(&self, other: &Self) -> bool {
        self.slots.len() == other.slots.len()
            && self.slots.iter().all(|(id, slot)| {
                other
                    .slots
                    .get(id)
                    .is_some_and(|theirs| slot.value.eq_erased(theirs.value.as_ref()))
            })
    }
}

impl Hash for MetadataStore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Only what PartialEq compares: frozen display text may differ
        // between equal stores when a formatter depends on time or state.
        self.slots.len().hash(state);
        for id in self.slots.keys() {
            id.hash(state);
        }
    }
}

impl fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct ValueDebug<'a>(&'a dyn ErasedValue);
        impl fmt::Debug for ValueDebug<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.debug(f)
            }
        }

        f.debug_map()
            .entries(
                self.slots
                    .values()
                    .map(|slot| (&slot.display.label, ValueDebug(slot.value.as_ref()))),
            )
            .finish()
    }
}
