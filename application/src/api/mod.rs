//! HTTP API definitions.

pub mod bulk;
pub mod list;
pub mod request;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Extension, Router,
};
use common::DateTime;
use service::{list::RequestsList, BulkActions};

use crate::Service;

pub use self::{list::Snapshot, request::ServiceRequest};

/// Name of the [`tracing::Span`] of API operations.
const SPAN_NAME: &str = "API operation";

/// Dashboard of service requests backing the HTTP API.
#[derive(Debug)]
pub struct Dashboard {
    /// [`Service`] to query the backend with directly.
    service: Service,

    /// [`RequestsList`] of this [`Dashboard`].
    list: RequestsList<Service>,

    /// [`BulkActions`] of this [`Dashboard`].
    bulk: BulkActions<Service>,
}

impl Dashboard {
    /// Creates a new [`Dashboard`] on top of the provided [`Service`].
    ///
    /// [`BulkActions`] are labeled with the [`Service`] locale.
    #[must_use]
    pub fn new(service: Service, list: service::list::Config) -> Self {
        let bulk = service::bulk::Config::from_locale(&service.config().locale);
        Self {
            list: RequestsList::new(service.clone(), list),
            bulk: BulkActions::new(service.clone(), bulk),
            service,
        }
    }

    /// Returns the [`Service`] of this [`Dashboard`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the [`RequestsList`] of this [`Dashboard`].
    #[must_use]
    pub fn list(&self) -> &RequestsList<Service> {
        &self.list
    }

    /// Returns the [`BulkActions`] of this [`Dashboard`].
    #[must_use]
    pub fn bulk(&self) -> &BulkActions<Service> {
        &self.bulk
    }

    /// Takes a [`Snapshot`] of this [`Dashboard`] as seen right now.
    pub async fn snapshot(&self) -> Snapshot {
        let now = DateTime::now();
        Snapshot::new(
            self.list.state().await,
            self.list.data(now).await,
            now,
            self.bulk.actions(),
            self.bulk.state().await,
            self.bulk.is_modal_action_disabled().await,
        )
    }
}

/// Creates a [`Router`] of the HTTP API over the provided [`Dashboard`].
pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/requests", get(list::get))
        .route(
            "/requests/filters",
            post(list::update_filters).delete(list::reset_filters),
        )
        .route("/requests/refetch", post(list::refetch))
        .route("/requests/pagination", post(list::update_pagination))
        .route("/requests/sort", post(list::update_sort))
        .route(
            "/requests/rolling-metrics",
            put(list::update_rolling_metrics),
        )
        .route("/requests/counts", get(list::counts))
        .route(
            "/requests/selection",
            put(bulk::select)
                .post(bulk::select_all)
                .delete(bulk::clear_selection),
        )
        .route("/requests/selection/:id", post(bulk::toggle))
        .route(
            "/bulk-actions/pending",
            patch(bulk::update_action_data).delete(bulk::cancel),
        )
        .route("/bulk-actions/pending/confirm", post(bulk::confirm))
        .route("/bulk-actions/:id", post(bulk::select_action))
        .layer(Extension(dashboard))
}
