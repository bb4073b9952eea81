//! [`Ticket`] definitions.
//!
//! A [`Ticket`] is the raw service-request record as the backend returns it.
//! Every field is optional here: the backend is not trusted to be complete,
//! and degrading missing values is the job of the view-model mapping.

use common::define_kind;
use derive_more::{AsRef, Display, From, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw service-request record of the backend.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticket {
    /// ID of this [`Ticket`].
    pub id: Id,

    /// Human-readable number of this [`Ticket`].
    #[serde(alias = "requestNumber", alias = "requestId")]
    pub ticket_number: Option<String>,

    /// Title of this [`Ticket`].
    pub title: Option<String>,

    /// Description of this [`Ticket`].
    pub description: Option<String>,

    /// Raw [`Status`] of this [`Ticket`].
    pub status: Option<String>,

    /// Raw [`Priority`] of this [`Ticket`].
    pub priority: Option<String>,

    /// Raw [`Category`] of this [`Ticket`].
    #[serde(rename = "type", alias = "category")]
    pub category: Option<String>,

    /// [`Property`] this [`Ticket`] is filed for.
    #[serde(alias = "apartment")]
    pub property: Option<Property>,

    /// Technician this [`Ticket`] is assigned to.
    pub assignee: Option<Person>,

    /// RFC 3339 timestamp of this [`Ticket`] creation.
    pub created_at: Option<String>,

    /// RFC 3339 timestamp of this [`Ticket`] last update.
    pub updated_at: Option<String>,

    /// RFC 3339 timestamp this [`Ticket`] is due by.
    #[serde(alias = "dueAt")]
    pub due_date: Option<String>,

    /// RFC 3339 timestamp of this [`Ticket`] completion.
    #[serde(alias = "resolvedAt", alias = "completedDate")]
    pub completed_at: Option<String>,

    /// Estimated cost of the work, in the backend currency.
    pub estimated_cost: Option<Decimal>,

    /// Actual cost of the work, in the backend currency.
    pub actual_cost: Option<Decimal>,

    /// Number of images attached to this [`Ticket`].
    #[serde(alias = "imagesCount")]
    pub image_count: Option<u32>,

    /// Number of comments left on this [`Ticket`].
    #[serde(alias = "commentsCount")]
    pub comment_count: Option<u32>,

    /// Free-form tags of this [`Ticket`].
    pub tags: Vec<String>,
}

/// ID of a [`Ticket`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Returns this [`Id`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// ID of a technician a [`Ticket`] may be assigned to.
#[derive(
    AsRef,
    Clone,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct AssigneeId(String);

impl AssigneeId {
    /// Returns this [`AssigneeId`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssigneeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Apartment a [`Ticket`] is filed for.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Option<String>,

    /// Apartment number.
    #[serde(alias = "apartmentNumber", alias = "doorNumber")]
    pub number: Option<String>,

    /// Building block.
    #[serde(alias = "blockName")]
    pub block: Option<String>,

    /// Floor of the apartment.
    pub floor: Option<i32>,

    /// Owner of the apartment.
    pub owner: Option<Person>,

    /// Tenant living in the apartment.
    pub tenant: Option<Person>,
}

/// Person referenced by a [`Ticket`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    /// ID of this [`Person`].
    pub id: Option<String>,

    /// First name.
    pub first_name: Option<String>,

    /// Last name.
    pub last_name: Option<String>,

    /// Full name, when the backend provides it instead of the name parts.
    #[serde(alias = "fullName")]
    pub name: Option<String>,

    /// Phone number.
    #[serde(alias = "phoneNumber")]
    pub phone: Option<String>,

    /// Company the [`Person`] works for.
    #[serde(alias = "companyName")]
    pub company: Option<String>,

    /// Rating of the [`Person`], if rated.
    pub rating: Option<Decimal>,
}

impl Person {
    /// Returns the full name of this [`Person`], if any is known.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        let parts = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>();
        if !parts.is_empty() {
            return Some(parts.join(" "));
        }
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToOwned::to_owned)
    }
}

define_kind! {
    #[doc = "Status of a [`Ticket`] in the backend workflow."]
    enum Status {
        #[doc = "Filed and not yet picked up."]
        Open = 1,

        #[doc = "Being worked on."]
        InProgress = 2,

        #[doc = "Waiting for parts, access or a third party."]
        Waiting = 3,

        #[doc = "Work is done."]
        Resolved = 4,

        #[doc = "Closed for good."]
        Closed = 5,
    }
}

impl Status {
    /// Indicates whether this [`Status`] means the work is finished.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

define_kind! {
    #[doc = "Priority of a [`Ticket`]."]
    enum Priority {
        #[doc = "Can wait."]
        Low = 1,

        #[doc = "Regular."]
        Medium = 2,

        #[doc = "Needs attention first."]
        High = 3,
    }
}

impl Priority {
    /// Parses a raw backend [`Priority`], falling back to
    /// [`Priority::Medium`] for absent or unknown values.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|p| p.trim().to_ascii_uppercase().parse().ok())
            .unwrap_or(Self::Medium)
    }

    /// Returns the numeric level of this [`Priority`].
    #[must_use]
    pub const fn level(self) -> u8 {
        self.u8()
    }
}

define_kind! {
    #[doc = "Category of work a [`Ticket`] requests."]
    enum Category {
        #[doc = "Water supply and drainage."]
        Plumbing = 1,

        #[doc = "Wiring, sockets and lighting."]
        Electrical = 2,

        #[doc = "Boilers and radiators."]
        Heating = 3,

        #[doc = "Elevators."]
        Elevator = 4,

        #[doc = "Cleaning of common areas."]
        Cleaning = 5,

        #[doc = "Locks, cameras and intercoms."]
        Security = 6,

        #[doc = "Gardens and outdoor areas."]
        Landscaping = 7,

        #[doc = "Painting and plastering."]
        Painting = 8,

        #[doc = "Doors, windows and furniture."]
        Carpentry = 9,

        #[doc = "Anything else."]
        Other = 10,
    }
}

impl Category {
    /// Parses a raw backend [`Category`], falling back to
    /// [`Category::Other`] for absent or unknown values.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|c| c.trim().to_ascii_uppercase().parse().ok())
            .unwrap_or(Self::Other)
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use super::{Category, Person, Priority, Ticket};

    #[test]
    fn deserializes_sparse_record() {
        let ticket: Ticket =
            serde_json::from_value(json!({ "id": "t-1" })).unwrap();

        assert_eq!(ticket.id.as_str(), "t-1");
        assert_eq!(ticket.title, None);
        assert!(ticket.tags.is_empty());
    }

    #[test]
    fn deserializes_full_record() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": "t-2",
            "ticketNumber": "SR-0042",
            "title": "Leaking pipe",
            "status": "IN_PROGRESS",
            "priority": "HIGH",
            "type": "PLUMBING",
            "property": {
                "apartmentNumber": "12",
                "block": "B",
                "floor": 3,
                "tenant": { "firstName": "Ayşe", "lastName": "Yılmaz" },
            },
            "assignee": { "id": "u-7", "name": "Mehmet Demir" },
            "dueDate": "2024-03-12T09:00:00Z",
            "estimatedCost": "1250.50",
            "imageCount": 2,
            "tags": ["water"],
        }))
        .unwrap();

        assert_eq!(ticket.ticket_number.as_deref(), Some("SR-0042"));
        assert_eq!(ticket.category.as_deref(), Some("PLUMBING"));
        let property = ticket.property.unwrap();
        assert_eq!(property.number.as_deref(), Some("12"));
        assert_eq!(property.floor, Some(3));
        assert_eq!(ticket.image_count, Some(2));
        assert_eq!(ticket.estimated_cost.unwrap().to_string(), "1250.50");
    }

    #[test]
    fn full_name_prefers_parts() {
        let person = Person {
            first_name: Some(" Ayşe ".into()),
            last_name: Some("Yılmaz".into()),
            name: Some("ignored".into()),
            ..Person::default()
        };
        assert_eq!(person.full_name().as_deref(), Some("Ayşe Yılmaz"));

        let person = Person {
            name: Some("Mehmet Demir".into()),
            ..Person::default()
        };
        assert_eq!(person.full_name().as_deref(), Some("Mehmet Demir"));

        assert_eq!(Person::default().full_name(), None);
    }

    #[test]
    fn unknown_raw_kinds_fall_back() {
        assert_eq!(Priority::from_raw(Some("high")), Priority::High);
        assert_eq!(Priority::from_raw(Some("URGENT")), Priority::Medium);
        assert_eq!(Priority::from_raw(None), Priority::Medium);
        assert_eq!(Category::from_raw(Some("ROOFING")), Category::Other);
    }
}
