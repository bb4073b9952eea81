//! [`ServiceRequest`] view model definitions.

#[cfg(doc)]
use common::DateTime;
use common::{money::Currency, unit, DateTimeOf, Money};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use tracing as log;

use crate::{
    domain::{
        ticket::{self, AssigneeId, Person},
        Ticket,
    },
    Locale,
};

/// [`Currency`] the backend reports costs in.
pub const NATIVE_CURRENCY: Currency = Currency::Try;

/// Avatar used for an [`Assignee`] without a known name.
pub const NO_INITIALS: &str = "NA";

/// Service request as shown in a dashboard, enriched from a raw [`Ticket`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceRequest {
    /// ID of the [`Ticket`] this [`ServiceRequest`] is built from.
    pub id: ticket::Id,

    /// Human-readable number of this [`ServiceRequest`].
    pub request_number: String,

    /// Title of this [`ServiceRequest`].
    pub title: String,

    /// Description of this [`ServiceRequest`].
    pub description: String,

    /// [`Apartment`] this [`ServiceRequest`] is filed for.
    pub apartment: Apartment,

    /// [`Category`] of this [`ServiceRequest`].
    pub category: Category,

    /// [`Priority`] of this [`ServiceRequest`].
    pub priority: Priority,

    /// [`Status`] of this [`ServiceRequest`].
    pub status: Status,

    /// [`Assignee`] of this [`ServiceRequest`], if assigned.
    pub assignee: Option<Assignee>,

    /// [`DateTime`] when this [`ServiceRequest`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`ServiceRequest`] was last updated.
    pub updated_at: UpdateDateTime,

    /// [`DateTime`] this [`ServiceRequest`] is due by, if any.
    pub due_date: Option<DueDateTime>,

    /// [`DateTime`] when this [`ServiceRequest`] was completed, if it was.
    pub completed_at: Option<CompletionDateTime>,

    /// Estimated cost of the work, if estimated.
    pub estimated_cost: Option<Money>,

    /// Actual cost of the work, if known.
    pub actual_cost: Option<Money>,

    /// Number of images attached.
    pub image_count: u32,

    /// Number of comments left.
    pub comment_count: u32,

    /// Free-form tags.
    pub tags: Vec<String>,
}

impl ServiceRequest {
    /// Maps the provided raw [`Ticket`] into a [`ServiceRequest`], labeled
    /// according to the provided [`Locale`].
    ///
    /// Never fails: missing or malformed values degrade to defaults.
    #[must_use]
    pub fn from_ticket(ticket: Ticket, locale: &Locale) -> Self {
        let Ticket {
            id,
            ticket_number,
            title,
            description,
            status,
            priority,
            category,
            property,
            assignee,
            created_at,
            updated_at,
            due_date,
            completed_at,
            estimated_cost,
            actual_cost,
            image_count,
            comment_count,
            tags,
        } = ticket;

        let created_at = created_at
            .as_deref()
            .and_then(|dt| parse_datetime(&id, "createdAt", dt))
            .unwrap_or(CreationDateTime::UNIX_EPOCH);
        let updated_at = updated_at
            .as_deref()
            .and_then(|dt| parse_datetime(&id, "updatedAt", dt))
            .unwrap_or_else(|| created_at.coerce());

        Self {
            request_number: non_blank(ticket_number)
                .unwrap_or_else(|| format!("#{id}")),
            title: non_blank(title)
                .unwrap_or_else(|| locale.untitled().to_owned()),
            description: description.unwrap_or_default(),
            apartment: property.map(Apartment::from).unwrap_or_default(),
            category: Category::new(category.as_deref(), locale),
            priority: Priority::new(priority.as_deref(), locale),
            status: Status::new(status.as_deref(), locale),
            assignee: assignee.map(Assignee::from),
            created_at,
            updated_at,
            due_date: due_date
                .as_deref()
                .and_then(|dt| parse_datetime(&id, "dueDate", dt)),
            completed_at: completed_at
                .as_deref()
                .and_then(|dt| parse_datetime(&id, "completedAt", dt)),
            estimated_cost: estimated_cost.map(native_money),
            actual_cost: actual_cost.map(native_money),
            image_count: image_count.unwrap_or_default(),
            comment_count: comment_count.unwrap_or_default(),
            tags,
            id,
        }
    }

    /// Indicates whether the work on this [`ServiceRequest`] is finished.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
            || self.status.kind.is_some_and(ticket::Status::is_completed)
    }

    /// Indicates whether this [`ServiceRequest`] is still worked on judging by
    /// its [`Status`] alone.
    ///
    /// Unknown statuses are considered active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.status.kind.is_some_and(ticket::Status::is_completed)
    }

    /// Indicates whether this [`ServiceRequest`] is past its due date at the
    /// provided `now` moment.
    ///
    /// A request due exactly `now` is not overdue yet.
    #[must_use]
    pub fn is_overdue<Of: ?Sized>(&self, now: DateTimeOf<Of>) -> bool {
        self.due_date.is_some_and(|due| due.coerce() < now)
            && !self.is_completed()
    }

    /// Indicates whether this [`ServiceRequest`] has the highest priority.
    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        self.priority.level >= ticket::Priority::High.level()
    }

    /// Indicates whether this [`ServiceRequest`] is assigned to anyone.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assignee.is_some()
    }

    /// Indicates whether any images are attached to this [`ServiceRequest`].
    #[must_use]
    pub const fn has_images(&self) -> bool {
        self.image_count > 0
    }

    /// Indicates whether any comments are left on this [`ServiceRequest`].
    #[must_use]
    pub const fn has_comments(&self) -> bool {
        self.comment_count > 0
    }
}

/// [`DateTime`] when a [`ServiceRequest`] was created.
pub type CreationDateTime = DateTimeOf<(ServiceRequest, unit::Creation)>;

/// [`DateTime`] when a [`ServiceRequest`] was last updated.
pub type UpdateDateTime = DateTimeOf<(ServiceRequest, unit::Update)>;

/// [`DateTime`] a [`ServiceRequest`] is due by.
pub type DueDateTime = DateTimeOf<(ServiceRequest, unit::Due)>;

/// [`DateTime`] when a [`ServiceRequest`] was completed.
pub type CompletionDateTime = DateTimeOf<(ServiceRequest, unit::Completion)>;

/// Apartment a [`ServiceRequest`] is filed for.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    /// Apartment number.
    pub number: String,

    /// Building block.
    pub block: String,

    /// Floor, if known.
    pub floor: Option<i32>,

    /// Full name of the owner, if known.
    pub owner_name: Option<String>,

    /// Full name of the tenant, if known.
    pub tenant_name: Option<String>,

    /// Contact phone, preferring the tenant's one.
    pub phone: Option<String>,
}

impl From<ticket::Property> for Apartment {
    fn from(property: ticket::Property) -> Self {
        let ticket::Property {
            id: _,
            number,
            block,
            floor,
            owner,
            tenant,
        } = property;

        let phone = [tenant.as_ref(), owner.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|p| non_blank(p.phone.clone()));
        Self {
            number: number.unwrap_or_default(),
            block: block.unwrap_or_default(),
            floor,
            owner_name: owner.as_ref().and_then(Person::full_name),
            tenant_name: tenant.as_ref().and_then(Person::full_name),
            phone,
        }
    }
}

/// Labeled category of a [`ServiceRequest`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Category {
    /// Canonical [`ticket::Category`].
    #[serde(rename = "id", serialize_with = "kind_str")]
    pub kind: ticket::Category,

    /// Human-readable label.
    pub label: &'static str,

    /// Icon name.
    pub icon: &'static str,

    /// Color of the badge.
    pub color: &'static str,
}

impl Category {
    /// Resolves a [`Category`] from its raw backend value.
    fn new(raw: Option<&str>, locale: &Locale) -> Self {
        use ticket::Category as C;

        let kind = C::from_raw(raw);
        let (icon, color) = match kind {
            C::Plumbing => ("droplet", "#0ea5e9"),
            C::Electrical => ("zap", "#eab308"),
            C::Heating => ("flame", "#f97316"),
            C::Elevator => ("arrow-up-down", "#6366f1"),
            C::Cleaning => ("sparkles", "#14b8a6"),
            C::Security => ("shield", "#ef4444"),
            C::Landscaping => ("trees", "#22c55e"),
            C::Painting => ("paintbrush", "#ec4899"),
            C::Carpentry => ("hammer", "#a16207"),
            C::Other => ("wrench", "#6b7280"),
        };
        Self {
            kind,
            label: locale.category(kind),
            icon,
            color,
        }
    }
}

/// Labeled priority of a [`ServiceRequest`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Priority {
    /// Canonical [`ticket::Priority`].
    #[serde(rename = "id", serialize_with = "kind_str")]
    pub kind: ticket::Priority,

    /// Human-readable label.
    pub label: &'static str,

    /// Numeric level, higher is more important.
    pub level: u8,

    /// Color of the badge.
    pub color: &'static str,

    /// Icon name.
    pub icon: &'static str,
}

impl Priority {
    /// Resolves a [`Priority`] from its raw backend value.
    fn new(raw: Option<&str>, locale: &Locale) -> Self {
        use ticket::Priority as P;

        let kind = P::from_raw(raw);
        let (color, icon) = match kind {
            P::Low => ("#10b981", "arrow-down"),
            P::Medium => ("#f59e0b", "minus"),
            P::High => ("#ef4444", "arrow-up"),
        };
        Self {
            kind,
            label: locale.priority(kind),
            level: kind.level(),
            color,
            icon,
        }
    }
}

/// Labeled status of a [`ServiceRequest`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Status as reported by the backend.
    pub id: String,

    /// Canonical [`ticket::Status`], if the reported one is known.
    #[serde(skip)]
    pub kind: Option<ticket::Status>,

    /// Human-readable label.
    pub label: String,

    /// Text color of the badge.
    pub color: &'static str,

    /// Background color of the badge.
    pub bg_color: &'static str,
}

impl Status {
    /// Text color of an unknown [`Status`].
    pub const NEUTRAL_COLOR: &'static str = "#6b7280";

    /// Background color of an unknown [`Status`].
    pub const NEUTRAL_BG_COLOR: &'static str = "#f3f4f6";

    /// Resolves a [`Status`] from its raw backend value.
    ///
    /// An absent value is read as [`ticket::Status::Open`].
    fn new(raw: Option<&str>, locale: &Locale) -> Self {
        use ticket::Status as S;

        let raw = raw.map_or(S::Open.as_str(), str::trim);
        let Ok(kind) = raw.parse::<S>() else {
            return Self {
                id: raw.to_owned(),
                kind: None,
                label: raw.to_owned(),
                color: Self::NEUTRAL_COLOR,
                bg_color: Self::NEUTRAL_BG_COLOR,
            };
        };
        let (color, bg_color) = match kind {
            S::Open => ("#3b82f6", "#eff6ff"),
            S::InProgress => ("#f59e0b", "#fffbeb"),
            S::Waiting => ("#8b5cf6", "#f5f3ff"),
            S::Resolved => ("#10b981", "#ecfdf5"),
            S::Closed => ("#6b7280", "#f9fafb"),
        };
        Self {
            id: raw.to_owned(),
            kind: Some(kind),
            label: locale.status(kind).to_owned(),
            color,
            bg_color,
        }
    }
}

/// Technician a [`ServiceRequest`] is assigned to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Assignee {
    /// ID of this [`Assignee`].
    pub id: Option<AssigneeId>,

    /// Full name, if known.
    pub name: Option<String>,

    /// Company the [`Assignee`] works for.
    pub company: Option<String>,

    /// Phone number.
    pub phone: Option<String>,

    /// Initials to show in place of a photo.
    pub avatar: String,

    /// Rating, if rated.
    pub rating: Option<Decimal>,
}

impl From<Person> for Assignee {
    fn from(person: Person) -> Self {
        let name = person.full_name();
        let avatar = name.as_deref().map_or_else(|| NO_INITIALS.into(), initials);
        Self {
            id: non_blank(person.id).map(AssigneeId::from),
            name,
            company: non_blank(person.company),
            phone: non_blank(person.phone),
            avatar,
            rating: person.rating,
        }
    }
}

/// Builds initials out of the provided full `name`: the first letter of
/// each word, uppercased, at most 2 characters.
fn initials(name: &str) -> String {
    let initials = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect::<String>();
    if initials.is_empty() {
        NO_INITIALS.into()
    } else {
        initials
    }
}

/// Converts the provided amount in the backend [`Currency`] into [`Money`].
const fn native_money(amount: Decimal) -> Money {
    Money {
        amount,
        currency: NATIVE_CURRENCY,
    }
}

/// Serializes a kind as its `SCREAMING_SNAKE_CASE` name.
fn kind_str<K, S>(kind: &K, serializer: S) -> Result<S::Ok, S::Error>
where
    K: Copy + Into<&'static str>,
    S: Serializer,
{
    serializer.serialize_str((*kind).into())
}

/// Filters out blank strings.
fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// Parses the provided RFC 3339 `input`, logging and dropping a malformed
/// one.
fn parse_datetime<Of: ?Sized>(
    id: &ticket::Id,
    field: &str,
    input: &str,
) -> Option<DateTimeOf<Of>> {
    DateTimeOf::from_rfc3339(input)
        .map_err(|e| {
            log::debug!("ignoring malformed `{field}` of ticket `{id}`: {e}");
        })
        .ok()
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{money::Currency, DateTime};
    use serde_json::json;

    use super::{initials, ServiceRequest, NO_INITIALS};
    use crate::{
        domain::{ticket, Ticket},
        locale::Language,
        Locale,
    };

    fn ticket(raw: serde_json::Value) -> Ticket {
        serde_json::from_value(raw).unwrap()
    }

    fn map(raw: serde_json::Value) -> ServiceRequest {
        ServiceRequest::from_ticket(ticket(raw), &Locale::default())
    }

    #[test]
    fn mapping_is_deterministic() {
        let raw = json!({
            "id": "t-1",
            "title": "Leaking pipe",
            "status": "OPEN",
            "priority": "HIGH",
            "type": "PLUMBING",
            "createdAt": "2024-03-10T08:00:00Z",
            "dueDate": "2024-03-11T08:00:00Z",
            "assignee": { "firstName": "Mehmet", "lastName": "Demir" },
        });

        assert_eq!(map(raw.clone()), map(raw));
    }

    #[test]
    fn overdue_is_derived_from_now() {
        let request = map(json!({
            "id": "t-1",
            "dueDate": "2024-03-11T08:00:00Z",
        }));
        let due = DateTime::from_rfc3339("2024-03-11T08:00:00Z").unwrap();

        assert!(!request.is_overdue(due - Duration::from_secs(60)));
        assert!(!request.is_overdue(due));
        assert!(request.is_overdue(due + Duration::from_micros(1)));
    }

    #[test]
    fn completed_request_is_never_overdue() {
        let now = DateTime::from_rfc3339("2024-04-01T00:00:00Z").unwrap();

        let resolved = map(json!({
            "id": "t-1",
            "status": "RESOLVED",
            "dueDate": "2024-03-11T08:00:00Z",
        }));
        assert!(!resolved.is_overdue(now));

        let completed = map(json!({
            "id": "t-2",
            "status": "IN_PROGRESS",
            "dueDate": "2024-03-11T08:00:00Z",
            "completedAt": "2024-03-10T08:00:00Z",
        }));
        assert!(!completed.is_overdue(now));

        let undue = map(json!({ "id": "t-3" }));
        assert!(!undue.is_overdue(now));
    }

    #[test]
    fn sparse_ticket_degrades_to_defaults() {
        let request = map(json!({
            "id": "t-9",
            "createdAt": "yesterday",
        }));

        assert_eq!(request.request_number, "#t-9");
        assert_eq!(request.title, "Başlıksız Talep");
        assert_eq!(request.priority.level, 2);
        assert_eq!(request.priority.kind, ticket::Priority::Medium);
        assert_eq!(request.category.kind, ticket::Category::Other);
        assert_eq!(request.status.kind, Some(ticket::Status::Open));
        assert_eq!(request.created_at.coerce(), DateTime::UNIX_EPOCH);
        assert_eq!(request.updated_at.coerce(), DateTime::UNIX_EPOCH);
        assert_eq!(request.assignee, None);
        assert!(!request.has_images());
    }

    #[test]
    fn priority_levels() {
        for (raw, level) in [("HIGH", 3), ("LOW", 1), ("MEDIUM", 2), ("ASAP", 2)] {
            let request = map(json!({ "id": "t", "priority": raw }));
            assert_eq!(request.priority.level, level, "{raw}");
        }
        assert!(map(json!({ "id": "t", "priority": "HIGH" })).is_urgent());
    }

    #[test]
    fn unknown_status_passes_through() {
        let request = map(json!({ "id": "t", "status": "ON_HOLD" }));

        assert_eq!(request.status.kind, None);
        assert_eq!(request.status.label, "ON_HOLD");
        assert_eq!(request.status.color, "#6b7280");
    }

    #[test]
    fn labels_follow_locale() {
        let raw = json!({ "id": "t", "status": "IN_PROGRESS", "type": "ELEVATOR" });

        let tr = ServiceRequest::from_ticket(ticket(raw.clone()), &Locale::default());
        assert_eq!(tr.status.label, "İşlemde");
        assert_eq!(tr.category.label, "Asansör");

        let en = ServiceRequest::from_ticket(ticket(raw), &Locale::new(Language::En));
        assert_eq!(en.status.label, "In progress");
        assert_eq!(en.category.label, "Elevator");
    }

    #[test]
    fn costs_are_in_native_currency() {
        let request = map(json!({
            "id": "t",
            "estimatedCost": "1250.50",
            "actualCost": 300,
        }));

        let estimated = request.estimated_cost.unwrap();
        assert_eq!(estimated.currency, Currency::Try);
        assert_eq!(estimated.to_string(), "1250.5TRY");
        assert_eq!(request.actual_cost.unwrap().to_string(), "300TRY");
    }

    #[test]
    fn apartment_prefers_tenant_phone() {
        let request = map(json!({
            "id": "t",
            "property": {
                "number": "12",
                "block": "B",
                "owner": { "name": "Ali Kaya", "phone": "+90 500" },
                "tenant": { "firstName": "Ayşe", "phone": "+90 555" },
            },
        }));

        assert_eq!(request.apartment.number, "12");
        assert_eq!(request.apartment.owner_name.as_deref(), Some("Ali Kaya"));
        assert_eq!(request.apartment.tenant_name.as_deref(), Some("Ayşe"));
        assert_eq!(request.apartment.phone.as_deref(), Some("+90 555"));
    }

    #[test]
    fn avatar_initials() {
        assert_eq!(initials("mehmet demir"), "MD");
        assert_eq!(initials("Ayşe Nur Yılmaz"), "AN");
        assert_eq!(initials("Cher"), "C");
        assert_eq!(initials("   "), NO_INITIALS);

        let request = map(json!({ "id": "t", "assignee": { "id": "u-1" } }));
        assert_eq!(request.assignee.unwrap().avatar, NO_INITIALS);
    }
}
