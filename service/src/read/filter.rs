//! Translation of raw UI filter inputs into canonical [`Filters`].
//!
//! UI widgets hand over filter values in several shapes: a plain string, an
//! input-change event carrying the value in `target.value`, or whatever else
//! a widget emits. All of them are resolved here, once, into [`FilterValue`]s,
//! so nothing past this module sees the ambiguity.

use derive_more::{AsRef, Display};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display as StrumDisplay, IntoStaticStr};
use tracing as log;

use super::ticket::list::Query;

/// Sentinel value of "no filter" select options.
pub const ALL: &str = "all";

/// Key of a filter.
#[derive(Clone, Copy, Debug, Eq, Hash, IntoStaticStr, PartialEq, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum Key {
    /// Free-text search.
    Search,

    /// Request status.
    Status,

    /// Request priority.
    Priority,

    /// Request category.
    Category,

    /// Assigned technician.
    Assignee,

    /// Building of the apartment.
    Building,
}

/// Raw filter input as emitted by a UI widget.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawFilterInput {
    /// Plain value.
    Value(String),

    /// Input-change event.
    Event {
        /// Element the event originates from.
        target: EventTarget,
    },

    /// Anything else.
    Other(serde_json::Value),
}

impl From<&str> for RawFilterInput {
    fn from(value: &str) -> Self {
        Self::Value(value.to_owned())
    }
}

/// Element an input-change event originates from.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EventTarget {
    /// Current value of the element.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl RawFilterInput {
    /// Reduces this [`RawFilterInput`] into a canonical [`FilterValue`].
    ///
    /// Unexpected shapes are logged and treated as absent.
    #[must_use]
    pub fn normalize(self, key: Key) -> Option<FilterValue> {
        let value = match self {
            Self::Value(v) => v,
            Self::Event { target } => {
                if let serde_json::Value::String(v) = target.value {
                    v
                } else {
                    log::warn!(
                        "ignoring `{key}` filter event with a non-string \
                         `target.value`: {}",
                        target.value,
                    );
                    return None;
                }
            }
            Self::Other(serde_json::Value::Null) => return None,
            Self::Other(other) => {
                log::warn!("ignoring `{key}` filter of unexpected shape: {other}");
                return None;
            }
        };
        FilterValue::new(value)
    }
}

/// Canonical filter value: never empty and never [`ALL`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct FilterValue(String);

impl FilterValue {
    /// Creates a new [`FilterValue`] unless the provided `value` means
    /// "no filter".
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        Self::check(&value).then_some(Self(value))
    }

    /// Returns this [`FilterValue`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the given `value` is a meaningful [`FilterValue`].
    fn check(value: impl AsRef<str>) -> bool {
        let value = value.as_ref();
        !value.is_empty() && value != ALL
    }
}

/// Full set of raw filters as emitted by a UI.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawFilters {
    /// Raw free-text search.
    pub search: Option<RawFilterInput>,

    /// Raw status.
    pub status: Option<RawFilterInput>,

    /// Raw priority.
    pub priority: Option<RawFilterInput>,

    /// Raw category.
    pub category: Option<RawFilterInput>,

    /// Raw assignee.
    pub assignee: Option<RawFilterInput>,

    /// Raw building.
    pub building: Option<RawFilterInput>,
}

/// Partial update of [`Filters`].
///
/// An absent field leaves the current filter untouched, while an explicit
/// `null` clears it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FiltersUpdate {
    /// Update of the free-text search.
    #[serde(deserialize_with = "present")]
    pub search: Option<Option<RawFilterInput>>,

    /// Update of the status.
    #[serde(deserialize_with = "present")]
    pub status: Option<Option<RawFilterInput>>,

    /// Update of the priority.
    #[serde(deserialize_with = "present")]
    pub priority: Option<Option<RawFilterInput>>,

    /// Update of the category.
    #[serde(deserialize_with = "present")]
    pub category: Option<Option<RawFilterInput>>,

    /// Update of the assignee.
    #[serde(deserialize_with = "present")]
    pub assignee: Option<Option<RawFilterInput>>,

    /// Update of the building.
    #[serde(deserialize_with = "present")]
    pub building: Option<Option<RawFilterInput>>,
}

/// Deserializes a present field as [`Some`], so that a `null` becomes
/// `Some(None)` and only a missing field stays [`None`].
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Canonical filters of a request list.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Filters {
    /// Free-text search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<FilterValue>,

    /// Status to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FilterValue>,

    /// Priority to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<FilterValue>,

    /// Category to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FilterValue>,

    /// Assigned technician to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<FilterValue>,

    /// Building to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<FilterValue>,
}

/// Normalizes the provided [`RawFilters`] into canonical [`Filters`].
#[must_use]
pub fn normalize(raw: RawFilters) -> Filters {
    let RawFilters {
        search,
        status,
        priority,
        category,
        assignee,
        building,
    } = raw;
    let norm = |input: Option<RawFilterInput>, key| {
        input.and_then(|i| i.normalize(key))
    };
    Filters {
        search: norm(search, Key::Search),
        status: norm(status, Key::Status),
        priority: norm(priority, Key::Priority),
        category: norm(category, Key::Category),
        assignee: norm(assignee, Key::Assignee),
        building: norm(building, Key::Building),
    }
}

impl Filters {
    /// Merges the provided [`FiltersUpdate`] into these [`Filters`].
    pub fn apply(&mut self, update: FiltersUpdate) {
        let FiltersUpdate {
            search,
            status,
            priority,
            category,
            assignee,
            building,
        } = update;
        let merge = |current: &mut Option<FilterValue>, upd, key| {
            if let Some(input) = upd {
                *current = Option::and_then(input, |i: RawFilterInput| {
                    i.normalize(key)
                });
            }
        };
        merge(&mut self.search, search, Key::Search);
        merge(&mut self.status, status, Key::Status);
        merge(&mut self.priority, priority, Key::Priority);
        merge(&mut self.category, category, Key::Category);
        merge(&mut self.assignee, assignee, Key::Assignee);
        merge(&mut self.building, building, Key::Building);
    }

    /// Indicates whether no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Builds the backend [`Query`] of these [`Filters`] for the provided
    /// page.
    #[must_use]
    pub fn query(&self, page: u32, limit: common::pagination::Limit) -> Query {
        let value = |f: &Option<FilterValue>| f.as_ref().map(ToString::to_string);
        Query {
            search: value(&self.search),
            status: value(&self.status),
            priority: value(&self.priority),
            category: value(&self.category),
            assignee_id: value(&self.assignee),
            property_id: value(&self.building),
            ..Query::new(page, limit)
        }
    }
}
