//! [`BulkActions`]-related definitions.
//!
//! [`BulkActions`]: service::BulkActions

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use service::{
    bulk::{self, ActionDataUpdate, ActionError, Outcome},
    command::execute_bulk_action::ExecutionError,
    domain::{bulk::ActionId, ticket},
};
use tracing as log;

use super::{Dashboard, Snapshot, SPAN_NAME};
use crate::{define_error, AsError, Error};

/// Bulk action offered by a dashboard.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// `snake_case` ID of this [`Action`].
    pub id: &'static str,

    /// Human-readable label.
    pub label: &'static str,

    /// Whether at least one request must be selected.
    pub requires_selection: bool,

    /// Whether an explicit confirmation is required.
    pub confirmation_required: bool,

    /// Whether this [`Action`] is destructive.
    pub danger_action: bool,
}

impl From<&bulk::BulkAction> for Action {
    fn from(action: &bulk::BulkAction) -> Self {
        Self {
            id: action.id.as_str(),
            label: action.label,
            requires_selection: action.requires_selection,
            confirmation_required: action.confirmation_required,
            danger_action: action.danger_action,
        }
    }
}

/// Bulk action awaiting a confirmation.
#[derive(Clone, Debug, Serialize)]
pub struct Pending {
    /// `snake_case` ID of the pending [`Action`].
    pub action: &'static str,

    /// Input collected so far.
    pub data: ActionData,
}

impl From<bulk::Pending> for Pending {
    fn from(pending: bulk::Pending) -> Self {
        let bulk::ActionData {
            technician_id,
            priority,
            confirmation_text,
        } = pending.data;
        Self {
            action: pending.action.as_str(),
            data: ActionData {
                technician_id: technician_id.map(Into::into),
                priority: priority.map(ticket::Priority::as_str),
                confirmation_text,
            },
        }
    }
}

/// Input collected for a [`Pending`] action.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    /// ID of the chosen technician.
    pub technician_id: Option<String>,

    /// Chosen priority.
    pub priority: Option<&'static str>,

    /// Typed confirmation text.
    pub confirmation_text: String,
}

/// Partial update of [`ActionData`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionDataChange {
    /// ID of the technician to choose.
    pub technician_id: Option<String>,

    /// `SCREAMING_SNAKE_CASE` priority to choose.
    pub priority: Option<String>,

    /// Confirmation text to type.
    pub confirmation_text: Option<String>,
}

/// Requested selection.
#[derive(Clone, Debug, Deserialize)]
pub struct Selection {
    /// IDs of the requests to select.
    pub ids: Vec<String>,
}

define_error! {
    enum InputError {
        #[code = "UNKNOWN_ACTION"]
        #[status = NOT_FOUND]
        #[message = "Bulk action is not offered"]
        UnknownAction,

        #[code = "UNKNOWN_PRIORITY"]
        #[status = BAD_REQUEST]
        #[message = "Priority must be one of `LOW`, `MEDIUM`, `HIGH`"]
        UnknownPriority,
    }
}

/// Replaces the selection with the provided IDs.
///
/// # Errors
///
/// If the body is malformed.
#[tracing::instrument(
    skip_all,
    fields(api.name = "select", otel.name = SPAN_NAME),
)]
pub async fn select(
    Extension(dashboard): Extension<Arc<Dashboard>>,
    body: Result<Json<Selection>, JsonRejection>,
) -> Result<Json<Snapshot>, Error> {
    let Json(Selection { ids }) = body.map_err(AsError::into_error)?;

    dashboard
        .bulk()
        .select(ids.into_iter().map(ticket::Id::from))
        .await;
    Ok(Json(dashboard.snapshot().await))
}

/// Toggles selection of all the loaded requests.
#[tracing::instrument(
    skip_all,
    fields(api.name = "selectAll", otel.name = SPAN_NAME),
)]
pub async fn select_all(
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Json<Snapshot> {
    let loaded = dashboard.list().state().await.requests;

    dashboard
        .bulk()
        .select_all(loaded.into_iter().map(|r| r.id))
        .await;
    Json(dashboard.snapshot().await)
}

/// Toggles selection of a single request.
///
/// # Errors
///
/// If the path is malformed.
#[tracing::instrument(
    skip_all,
    fields(api.name = "toggleSelection", otel.name = SPAN_NAME),
)]
pub async fn toggle(
    Extension(dashboard): Extension<Arc<Dashboard>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Snapshot>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    _ = dashboard.bulk().toggle(id.into()).await;
    Ok(Json(dashboard.snapshot().await))
}

/// Clears the selection.
#[tracing::instrument(
    skip_all,
    fields(api.name = "clearSelection", otel.name = SPAN_NAME),
)]
pub async fn clear_selection(
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Json<Snapshot> {
    dashboard.bulk().clear_selection().await;
    Json(dashboard.snapshot().await)
}

/// Chooses the bulk action with the provided ID.
///
/// An action executed right away refetches the list.
///
/// # Errors
///
/// Possible error codes:
/// - `UNKNOWN_ACTION` - action is not offered;
/// - `NO_SELECTION` - nothing is selected;
/// - `BACKEND_UNAVAILABLE` - execution failed in the backend.
#[tracing::instrument(
    skip_all,
    fields(api.name = "selectAction", otel.name = SPAN_NAME),
)]
pub async fn select_action(
    Extension(dashboard): Extension<Arc<Dashboard>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Snapshot>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;
    let id = id
        .parse::<ActionId>()
        .map_err(|_| Error::from(InputError::UnknownAction))?;

    let outcome = dashboard
        .bulk()
        .select_action(id)
        .await
        .map_err(AsError::into_error)?;
    if let Outcome::Executed(id) = outcome {
        log::debug!("refetching after `{id}` bulk action");
        dashboard.list().refetch().await;
    }
    Ok(Json(dashboard.snapshot().await))
}

/// Updates input of the pending bulk action.
///
/// # Errors
///
/// Possible error codes:
/// - `UNKNOWN_PRIORITY` - priority is not a known one;
/// - `NO_PENDING_ACTION` - no bulk action is pending.
#[tracing::instrument(
    skip_all,
    fields(api.name = "updateActionData", otel.name = SPAN_NAME),
)]
pub async fn update_action_data(
    Extension(dashboard): Extension<Arc<Dashboard>>,
    body: Result<Json<ActionDataChange>, JsonRejection>,
) -> Result<Json<Snapshot>, Error> {
    let Json(ActionDataChange {
        technician_id,
        priority,
        confirmation_text,
    }) = body.map_err(AsError::into_error)?;
    let priority = priority
        .map(|p| p.parse::<ticket::Priority>())
        .transpose()
        .map_err(|_| Error::from(InputError::UnknownPriority))?;

    _ = dashboard
        .bulk()
        .update_action_data(ActionDataUpdate {
            technician_id: technician_id.map(Into::into),
            priority,
            confirmation_text,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(dashboard.snapshot().await))
}

/// Executes the pending bulk action and refetches the list.
///
/// # Errors
///
/// Possible error codes:
/// - `NO_PENDING_ACTION` - no bulk action is pending;
/// - `INCOMPLETE_ACTION_DATA` - collected input is not enough;
/// - `BACKEND_UNAVAILABLE` - execution failed in the backend, so the
///                           selection and the pending action are kept.
#[tracing::instrument(
    skip_all,
    fields(api.name = "confirm", otel.name = SPAN_NAME),
)]
pub async fn confirm(
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Result<Json<Snapshot>, Error> {
    let id = dashboard
        .bulk()
        .confirm()
        .await
        .map_err(AsError::into_error)?;

    log::debug!("refetching after `{id}` bulk action");
    dashboard.list().refetch().await;
    Ok(Json(dashboard.snapshot().await))
}

/// Drops the pending bulk action, keeping the selection.
#[tracing::instrument(
    skip_all,
    fields(api.name = "cancel", otel.name = SPAN_NAME),
)]
pub async fn cancel(
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Json<Snapshot> {
    dashboard.bulk().cancel().await;
    Json(dashboard.snapshot().await)
}

impl AsError for ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MISSING_PARAMETER"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "Bulk action misses its required parameter"]
                MissingParameter,

                #[code = "NO_SELECTION"]
                #[status = BAD_REQUEST]
                #[message = "Bulk action requires at least one selected \
                             request"]
                NoSelection,
            }
        }

        match self {
            Self::Backend(e) => e.try_as_error(),
            Self::MissingParameter(_) => Some(Error::MissingParameter.into()),
            Self::NoSelection(_) => Some(Error::NoSelection.into()),
        }
    }
}

impl AsError for ActionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INCOMPLETE_ACTION_DATA"]
                #[status = CONFLICT]
                #[message = "Pending bulk action misses required input"]
                IncompleteActionData,

                #[code = "NO_SELECTION"]
                #[status = BAD_REQUEST]
                #[message = "Bulk action requires at least one selected \
                             request"]
                NoSelection,

                #[code = "NO_PENDING_ACTION"]
                #[status = CONFLICT]
                #[message = "No bulk action is pending"]
                NoPendingAction,

                #[code = "UNKNOWN_ACTION"]
                #[status = NOT_FOUND]
                #[message = "Bulk action is not offered"]
                UnknownAction,
            }
        }

        match self {
            Self::Execution(e) => e.try_as_error(),
            Self::IncompleteActionData(_) => {
                Some(Error::IncompleteActionData.into())
            }
            Self::NoSelection(_) => Some(Error::NoSelection.into()),
            Self::NoPendingAction => Some(Error::NoPendingAction.into()),
            Self::UnknownAction(_) => Some(Error::UnknownAction.into()),
        }
    }
}
