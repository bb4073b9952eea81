//! [`RequestsList`]-related definitions.
//!
//! [`RequestsList`]: service::list::RequestsList

use std::{sync::Arc, time::Duration};

use axum::{extract::rejection::JsonRejection, Extension, Json};
use common::{pagination::Limit, DateTime, Percent};
use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};
use serde::{Deserialize, Serialize};
use service::{
    bulk as service_bulk, list, query,
    read::{
        self, filter::FiltersUpdate, summary::RollingMetrics, ticket::Counts,
        Filters,
    },
    Query as _,
};

use super::{bulk, Dashboard, ServiceRequest, SPAN_NAME};
use crate::{define_error, AsError, Error};

/// Everything a dashboard needs to render the request list.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    /// Data to render.
    pub data: Data,

    /// Whether a fetch is in flight.
    pub loading: bool,

    /// Message of the last fetch error.
    pub error: Option<String>,

    /// Canonical filters in effect.
    pub filters: Filters,

    /// Page-local sorting, if chosen.
    pub sort: Option<Sort>,
}

impl Snapshot {
    /// Assembles a new [`Snapshot`] out of the provided parts.
    #[must_use]
    pub fn new(
        list: list::State,
        data: list::Data,
        now: DateTime,
        actions: &[service_bulk::BulkAction],
        bulk: service_bulk::State,
        modal_action_disabled: bool,
    ) -> Self {
        let list::Data {
            requests,
            summary,
            quick_stats,
            pagination,
        } = data;

        Self {
            data: Data {
                requests: requests
                    .into_iter()
                    .map(|r| ServiceRequest::new(r, now))
                    .collect(),
                summary: summary.into(),
                quick_stats: quick_stats.into(),
                pagination: pagination.into(),
                bulk_actions: actions
                    .iter()
                    .map(bulk::Action::from)
                    .collect(),
                selection: bulk
                    .selection
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                pending_action: bulk.pending.map(Into::into),
                modal_action_disabled,
            },
            loading: list.is_loading(),
            error: list.error,
            filters: list.filters,
            sort: list.sort.map(Into::into),
        }
    }
}

/// Data of a [`Snapshot`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    /// Loaded [`ServiceRequest`]s in the chosen [`Sort`] order.
    pub requests: Vec<ServiceRequest>,

    /// [`Summary`] of the loaded [`ServiceRequest`]s.
    pub summary: Summary,

    /// [`QuickStats`] of the loaded [`ServiceRequest`]s.
    pub quick_stats: QuickStats,

    /// [`Pagination`] of the current page.
    pub pagination: Pagination,

    /// Offered bulk actions.
    pub bulk_actions: Vec<bulk::Action>,

    /// IDs of the selected [`ServiceRequest`]s.
    pub selection: Vec<String>,

    /// Bulk action awaiting a confirmation.
    pub pending_action: Option<bulk::Pending>,

    /// Whether the pending bulk action can't be confirmed yet.
    pub modal_action_disabled: bool,
}

/// Summary of the loaded [`ServiceRequest`]s.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of loaded [`ServiceRequest`]s.
    pub total_requests: u64,

    /// Number of [`ServiceRequest`]s still in work.
    pub active_requests: u64,

    /// Number of [`ServiceRequest`]s completed today.
    pub completed_today: u64,

    /// Number of overdue [`ServiceRequest`]s.
    pub overdue_requests: u64,

    /// Average time to the first response, in seconds.
    pub average_response_time: Option<u64>,

    /// Average time to completion, in seconds.
    pub average_completion_time: Option<u64>,

    /// Share of satisfied residents, in percents.
    pub satisfaction_rate: Option<f64>,
}

impl From<read::RequestSummary> for Summary {
    fn from(summary: read::RequestSummary) -> Self {
        let read::RequestSummary {
            total_requests,
            active_requests,
            completed_today,
            overdue_requests,
            rolling,
        } = summary;
        Self {
            total_requests,
            active_requests,
            completed_today,
            overdue_requests,
            average_response_time: rolling
                .average_response_time
                .map(|d| d.as_secs()),
            average_completion_time: rolling
                .average_completion_time
                .map(|d| d.as_secs()),
            satisfaction_rate: rolling.satisfaction_rate.map(percents),
        }
    }
}

/// Counters shown as dashboard tiles.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    /// Number of active high-priority [`ServiceRequest`]s.
    pub urgent: u64,

    /// Number of active [`ServiceRequest`]s nobody is assigned to.
    pub unassigned: u64,

    /// Number of active [`ServiceRequest`]s due today.
    pub due_today: u64,

    /// Number of [`ServiceRequest`]s with images.
    pub with_images: u64,

    /// Share of completed [`ServiceRequest`]s, in percents.
    pub completion_rate: f64,

    /// Share of overdue [`ServiceRequest`]s, in percents.
    pub overdue_rate: f64,
}

impl From<read::QuickStats> for QuickStats {
    fn from(stats: read::QuickStats) -> Self {
        Self {
            urgent: stats.urgent,
            unassigned: stats.unassigned,
            due_today: stats.due_today,
            with_images: stats.with_images,
            completion_rate: percents(stats.completion_rate),
            overdue_rate: percents(stats.overdue_rate),
        }
    }
}

/// Converts the provided [`Percent`] into a JSON number.
fn percents(p: Percent) -> f64 {
    p.value().to_f64().unwrap_or_default()
}

/// Position of the current page among all the pages.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based number of the current page.
    pub page: u32,

    /// Number of [`ServiceRequest`]s per page.
    pub limit: u32,

    /// Total number of matching [`ServiceRequest`]s.
    pub total: u64,

    /// Total number of pages.
    pub total_pages: u64,

    /// 1-based position of the first shown [`ServiceRequest`].
    pub showing_from: u64,

    /// 1-based position of the last shown [`ServiceRequest`].
    pub showing_to: u64,

    /// Whether there is a next page.
    pub has_next_page: bool,

    /// Whether there is a previous page.
    pub has_previous_page: bool,
}

impl From<common::pagination::PageInfo> for Pagination {
    fn from(info: common::pagination::PageInfo) -> Self {
        Self {
            page: info.page,
            limit: info.limit.get(),
            total: info.total,
            total_pages: info.total_pages,
            showing_from: info.showing_from,
            showing_to: info.showing_to,
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
        }
    }
}

/// Page-local sorting.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Sort {
    /// Key to sort by.
    pub key: &'static str,

    /// Either `ASC` or `DESC`.
    pub order: &'static str,
}

impl From<list::Sort> for Sort {
    fn from(sort: list::Sort) -> Self {
        Self {
            key: sort.key.into(),
            order: sort.order.as_str(),
        }
    }
}

/// Requested page change.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PageChange {
    /// 1-based number of the page to move to.
    pub page: u32,

    /// Number of [`ServiceRequest`]s per page to switch to.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Requested sorting change.
#[derive(Clone, Debug, Deserialize)]
pub struct SortChange {
    /// Key to sort by.
    pub key: String,
}

/// Rolling metrics computed outside of the loaded page.
///
/// Omitted metrics are cleared.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RollingMetricsChange {
    /// Average time to the first response, in seconds.
    pub average_response_time: Option<u64>,

    /// Average time to completion, in seconds.
    pub average_completion_time: Option<u64>,

    /// Share of satisfied residents, in percents.
    pub satisfaction_rate: Option<f64>,
}

impl TryFrom<RollingMetricsChange> for RollingMetrics {
    type Error = MetricsError;

    fn try_from(change: RollingMetricsChange) -> Result<Self, Self::Error> {
        let satisfaction_rate = change
            .satisfaction_rate
            .map(|v| {
                Decimal::from_f64(v)
                    .and_then(Percent::new)
                    .ok_or(MetricsError::InvalidSatisfactionRate)
            })
            .transpose()?;
        Ok(Self {
            average_response_time: change
                .average_response_time
                .map(Duration::from_secs),
            average_completion_time: change
                .average_completion_time
                .map(Duration::from_secs),
            satisfaction_rate,
        })
    }
}

define_error! {
    enum MetricsError {
        #[code = "INVALID_SATISFACTION_RATE"]
        #[status = BAD_REQUEST]
        #[message = "Satisfaction rate must be within `0..=100`"]
        InvalidSatisfactionRate,
    }
}

define_error! {
    enum SortError {
        #[code = "UNKNOWN_SORT_KEY"]
        #[status = BAD_REQUEST]
        #[message = "Sort key must be one of `createdAt`, `updatedAt`, \
                     `dueDate`, `priority`, `status`, `title`"]
        UnknownKey,
    }
}

/// Returns the current [`Snapshot`].
#[tracing::instrument(
    skip_all,
    fields(api.name = "getRequests", otel.name = SPAN_NAME),
)]
pub async fn get(
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Json<Snapshot> {
    Json(dashboard.snapshot().await)
}

/// Merges the provided partial filters and refetches the first page.
///
/// # Errors
///
/// If the body is not a valid filters update.
#[tracing::instrument(
    skip_all,
    fields(api.name = "updateFilters", otel.name = SPAN_NAME),
)]
pub async fn update_filters(
    Extension(dashboard): Extension<Arc<Dashboard>>,
    body: Result<Json<FiltersUpdate>, JsonRejection>,
) -> Result<Json<Snapshot>, Error> {
    let Json(update) = body.map_err(AsError::into_error)?;

    dashboard.list().update_filters(update).await;
    Ok(Json(dashboard.snapshot().await))
}

/// Clears all the filters and refetches the first page.
#[tracing::instrument(
    skip_all,
    fields(api.name = "resetFilters", otel.name = SPAN_NAME),
)]
pub async fn reset_filters(
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Json<Snapshot> {
    dashboard.list().reset_filters().await;
    Json(dashboard.snapshot().await)
}

/// Refetches the current page.
#[tracing::instrument(
    skip_all,
    fields(api.name = "refetch", otel.name = SPAN_NAME),
)]
pub async fn refetch(
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Json<Snapshot> {
    dashboard.list().refetch().await;
    Json(dashboard.snapshot().await)
}

/// Moves to the requested page and refetches.
///
/// # Errors
///
/// If the body is malformed or the page size is not allowed.
#[tracing::instrument(
    skip_all,
    fields(api.name = "updatePagination", otel.name = SPAN_NAME),
)]
pub async fn update_pagination(
    Extension(dashboard): Extension<Arc<Dashboard>>,
    body: Result<Json<PageChange>, JsonRejection>,
) -> Result<Json<Snapshot>, Error> {
    let Json(PageChange { page, limit }) =
        body.map_err(AsError::into_error)?;
    let limit = limit
        .map(Limit::try_from)
        .transpose()
        .map_err(tracerr::wrap!())
        .map_err(AsError::into_error)?;

    dashboard.list().update_pagination(page, limit).await;
    Ok(Json(dashboard.snapshot().await))
}

/// Chooses the page-local sorting without refetching.
///
/// # Errors
///
/// If the body is malformed or the key is unknown.
#[tracing::instrument(
    skip_all,
    fields(api.name = "updateSort", otel.name = SPAN_NAME),
)]
pub async fn update_sort(
    Extension(dashboard): Extension<Arc<Dashboard>>,
    body: Result<Json<SortChange>, JsonRejection>,
) -> Result<Json<Snapshot>, Error> {
    let Json(SortChange { key }) = body.map_err(AsError::into_error)?;
    let key = key
        .parse::<list::SortKey>()
        .map_err(|_| Error::from(SortError::UnknownKey))?;

    _ = dashboard.list().update_sort(key).await;
    Ok(Json(dashboard.snapshot().await))
}

/// Supplies the rolling metrics shown along the loaded page summary.
///
/// # Errors
///
/// If the body is malformed or the satisfaction rate is out of range.
#[tracing::instrument(
    skip_all,
    fields(api.name = "updateRollingMetrics", otel.name = SPAN_NAME),
)]
pub async fn update_rolling_metrics(
    Extension(dashboard): Extension<Arc<Dashboard>>,
    body: Result<Json<RollingMetricsChange>, JsonRejection>,
) -> Result<Json<Snapshot>, Error> {
    let Json(change) = body.map_err(AsError::into_error)?;
    let rolling = RollingMetrics::try_from(change).map_err(Error::from)?;

    dashboard.list().set_rolling_metrics(rolling).await;
    Ok(Json(dashboard.snapshot().await))
}

/// Returns the [`Counts`] of tickets across the whole backend.
///
/// # Errors
///
/// If the backend fails.
#[tracing::instrument(
    skip_all,
    fields(api.name = "getCounts", otel.name = SPAN_NAME),
)]
pub async fn counts(
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Result<Json<Counts>, Error> {
    dashboard
        .service()
        .execute(query::tickets::Counts::by(()))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}
