//! [`Ticket`]-related read definitions.

use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::Ticket;

pub mod list {
    //! [`Ticket`] list definitions.

    use common::pagination::{self, Limit, Order};
    use serde::{Deserialize, Serialize};

    use crate::domain::Ticket;
    #[cfg(doc)]
    use crate::infra::Backend;

    /// Page of raw [`Ticket`]s.
    pub type Page = pagination::Page<Ticket>;

    /// Column the [`Backend`] orders a [`Ticket`] list by.
    pub const ORDER_COLUMN: &str = "createdAt";

    /// [`Order`] the [`Backend`] orders a [`Ticket`] list in.
    pub const ORDER: Order = Order::Descending;

    /// Query parameters of a [`Ticket`] list request.
    ///
    /// Absent filters are omitted rather than sent empty.
    #[derive(Clone, Debug, Eq, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Query {
        /// Free-text search.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub search: Option<String>,

        /// Status to match.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<String>,

        /// Priority to match.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub priority: Option<String>,

        /// Category to match.
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,

        /// ID of the assigned technician to match.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub assignee_id: Option<String>,

        /// ID of the building to match.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub property_id: Option<String>,

        /// 1-based page number.
        pub page: u32,

        /// Number of items per page.
        pub limit: u32,

        /// Column to order by.
        pub order_column: &'static str,

        /// Direction to order in.
        pub order_by: &'static str,
    }

    impl Query {
        /// Creates a new unfiltered [`Query`] of the provided page.
        #[must_use]
        pub fn new(page: u32, limit: Limit) -> Self {
            Self {
                search: None,
                status: None,
                priority: None,
                category: None,
                assignee_id: None,
                property_id: None,
                page,
                limit: limit.get(),
                order_column: ORDER_COLUMN,
                order_by: ORDER.as_str(),
            }
        }
    }

    /// Response of the [`Backend`] to a [`Query`].
    #[derive(Clone, Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct Response {
        /// [`Ticket`]s of the requested page.
        #[serde(alias = "items", alias = "tickets")]
        pub data: Vec<Ticket>,

        /// Total number of [`Ticket`]s matching the [`Query`].
        #[serde(alias = "totalCount", alias = "count")]
        pub total: Option<u64>,
    }

    impl From<Response> for Page {
        fn from(Response { data, total }: Response) -> Self {
            let total = total.unwrap_or(data.len() as u64);
            Self { items: data, total }
        }
    }
}

/// Counts of [`Ticket`]s across the whole backend, grouped by state.
///
/// Delivered as a flat object with no envelope.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
#[serde(default, rename_all = "camelCase")]
pub struct Counts {
    /// Open [`Ticket`]s.
    pub open: u64,

    /// [`Ticket`]s in progress.
    pub in_progress: u64,

    /// Waiting [`Ticket`]s.
    pub waiting: u64,

    /// Resolved [`Ticket`]s.
    pub resolved: u64,

    /// Closed [`Ticket`]s.
    pub closed: u64,

    /// Cancelled [`Ticket`]s.
    pub cancelled: u64,

    /// [`Ticket`]s nobody is assigned to.
    pub unassigned: u64,

    /// Overdue [`Ticket`]s.
    pub overdue: u64,

    /// [`Ticket`]s due today.
    pub due_today: u64,

    /// All [`Ticket`]s.
    pub total: u64,
}

#[cfg(test)]
mod spec {
    use common::pagination::Limit;
    use serde_json::json;

    use super::{
        list::{Page, Query, Response},
        Counts,
    };

    #[test]
    fn query_omits_absent_filters() {
        let query = Query {
            status: Some("OPEN".into()),
            ..Query::new(2, Limit::Twenty)
        };

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "status": "OPEN",
                "page": 2,
                "limit": 20,
                "orderColumn": "createdAt",
                "orderBy": "DESC",
            }),
        );
    }

    #[test]
    fn response_without_total_counts_items() {
        let response: Response = serde_json::from_value(json!({
            "items": [{ "id": "a" }, { "id": "b" }],
        }))
        .unwrap();

        let page = Page::from(response);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn counts_are_accepted_without_envelope() {
        let counts: Counts = serde_json::from_value(json!({
            "open": 4,
            "inProgress": 2,
            "dueToday": 1,
            "total": 9,
        }))
        .unwrap();

        assert_eq!(counts.open, 4);
        assert_eq!(counts.in_progress, 2);
        assert_eq!(counts.due_today, 1);
        assert_eq!(counts.closed, 0);
        assert_eq!(counts.total, 9);
    }
}
