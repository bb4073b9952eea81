//! [`ServiceRequest`]-related definitions.

use common::{datetime::serde::rfc3339, DateTime, Money};
use rust_decimal::prelude::ToPrimitive as _;
use serde::Serialize;
use service::read::{self, request};

/// A service request as delivered to a dashboard.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    /// Unique identifier of this [`ServiceRequest`].
    pub id: String,

    /// Human-readable number of this [`ServiceRequest`].
    pub request_number: String,

    /// Title of this [`ServiceRequest`].
    pub title: String,

    /// Description of this [`ServiceRequest`].
    pub description: String,

    /// Apartment this [`ServiceRequest`] is filed for.
    pub apartment: request::Apartment,

    /// Labeled category.
    pub category: request::Category,

    /// Labeled priority.
    pub priority: request::Priority,

    /// Labeled status.
    pub status: request::Status,

    /// Technician this [`ServiceRequest`] is assigned to.
    pub assignee: Option<request::Assignee>,

    /// Moment this [`ServiceRequest`] was created at.
    #[serde(serialize_with = "rfc3339::serialize")]
    pub created_at: request::CreationDateTime,

    /// Moment this [`ServiceRequest`] was last updated at.
    #[serde(serialize_with = "rfc3339::serialize")]
    pub updated_at: request::UpdateDateTime,

    /// Moment this [`ServiceRequest`] is due by.
    #[serde(serialize_with = "rfc3339::option::serialize")]
    pub due_date: Option<request::DueDateTime>,

    /// Moment this [`ServiceRequest`] was completed at.
    #[serde(serialize_with = "rfc3339::option::serialize")]
    pub completed_at: Option<request::CompletionDateTime>,

    /// Estimated cost of the work.
    pub estimated_cost: Option<Cost>,

    /// Actual cost of the work.
    pub actual_cost: Option<Cost>,

    /// Number of attached images.
    pub image_count: u32,

    /// Number of left comments.
    pub comment_count: u32,

    /// Free-form tags.
    pub tags: Vec<String>,

    /// Whether this [`ServiceRequest`] is past its due date right now.
    pub is_overdue: bool,

    /// Whether this [`ServiceRequest`] has the highest priority.
    pub is_urgent: bool,

    /// Whether anyone is assigned to this [`ServiceRequest`].
    pub is_assigned: bool,

    /// Whether any images are attached.
    pub has_images: bool,

    /// Whether any comments are left.
    pub has_comments: bool,
}

impl ServiceRequest {
    /// Creates a new [`ServiceRequest`] out of the provided
    /// [`read::ServiceRequest`] as seen at the provided `now` moment.
    #[must_use]
    pub fn new(req: read::ServiceRequest, now: DateTime) -> Self {
        let is_overdue = req.is_overdue(now);
        let is_urgent = req.is_urgent();
        let is_assigned = req.is_assigned();
        let has_images = req.has_images();
        let has_comments = req.has_comments();

        let read::ServiceRequest {
            id,
            request_number,
            title,
            description,
            apartment,
            category,
            priority,
            status,
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
        } = req;

        Self {
            id: id.into(),
            request_number,
            title,
            description,
            apartment,
            category,
            priority,
            status,
            assignee,
            created_at,
            updated_at,
            due_date,
            completed_at,
            estimated_cost: estimated_cost.map(Cost::from),
            actual_cost: actual_cost.map(Cost::from),
            image_count,
            comment_count,
            tags,
            is_overdue,
            is_urgent,
            is_assigned,
            has_images,
            has_comments,
        }
    }
}

/// Monetary cost.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Cost {
    /// Amount in the [`Cost::currency`].
    pub amount: f64,

    /// [ISO 4217] code of the currency.
    ///
    /// [ISO 4217]: https://wikipedia.org/wiki/ISO_4217
    pub currency: &'static str,
}

impl From<Money> for Cost {
    fn from(money: Money) -> Self {
        Self {
            amount: money.amount.to_f64().unwrap_or_default(),
            currency: money.currency.as_str(),
        }
    }
}
