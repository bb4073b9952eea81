//! [`RequestsList`] orchestrating a filterable, paginated list of
//! [`ServiceRequest`]s.

pub mod pagination;
pub mod sort;

use common::{
    pagination::{Limit, Page, PageInfo},
    DateTime,
};
use smart_default::SmartDefault;
use strum::{Display, IntoStaticStr};
use time::UtcOffset;
use tokio::sync::Mutex;
use tracerr::Traced;
use tracing as log;

use crate::{
    infra::backend,
    query::{self, Query},
    read::{
        filter::{Filters, FiltersUpdate},
        summary::RollingMetrics,
        QuickStats, RequestSummary, ServiceRequest,
    },
};

pub use self::{
    pagination::Pagination,
    sort::{Sort, SortKey},
};

/// [`RequestsList`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// [`Limit`] a fresh or reset list starts with.
    pub default_limit: Limit,

    /// [`UtcOffset`] calendar days are counted at.
    #[default(UtcOffset::UTC)]
    pub utc_offset: UtcOffset,
}

/// Phase of the [`RequestsList`] fetching.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Hash, IntoStaticStr, PartialEq,
)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Nothing fetched yet.
    #[default]
    Idle,

    /// Fetch is in flight.
    Loading,

    /// Last fetch succeeded.
    Success,

    /// Last fetch failed.
    Error,
}

/// State of a [`RequestsList`].
#[derive(Clone, Debug)]
pub struct State {
    /// Canonical [`Filters`] in effect.
    pub filters: Filters,

    /// Current [`Pagination`].
    pub pagination: Pagination,

    /// Page-local [`Sort`], if chosen.
    pub sort: Option<Sort>,

    /// [`ServiceRequest`]s of the last successful fetch.
    pub requests: Vec<ServiceRequest>,

    /// Total number of [`ServiceRequest`]s matching the [`Filters`].
    pub total: u64,

    /// Current [`Phase`].
    pub phase: Phase,

    /// Message of the last fetch error, cleared by a successful fetch.
    pub error: Option<String>,

    /// [`RollingMetrics`] supplied from outside the loaded page.
    pub rolling: RollingMetrics,

    /// Number of the latest issued fetch.
    generation: u64,
}

impl State {
    /// Creates a new empty [`State`] with the provided default [`Limit`].
    fn new(limit: Limit) -> Self {
        Self {
            filters: Filters::default(),
            pagination: Pagination::new(limit),
            sort: None,
            requests: Vec::new(),
            total: 0,
            phase: Phase::Idle,
            error: None,
            rolling: RollingMetrics::default(),
            generation: 0,
        }
    }

    /// Indicates whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Starts a new fetch, superseding any in-flight one.
    ///
    /// Returns the generation of the new fetch along with its query.
    fn begin_fetch(&mut self) -> (u64, query::requests::List) {
        self.generation += 1;
        self.phase = Phase::Loading;
        let query = self
            .filters
            .query(self.pagination.page(), self.pagination.limit());
        (self.generation, query::requests::List(query))
    }

    /// Completes the fetch of the provided `generation`.
    ///
    /// Results of superseded fetches are discarded.
    fn complete_fetch(
        &mut self,
        generation: u64,
        result: Result<Page<ServiceRequest>, Traced<backend::Error>>,
    ) {
        if generation != self.generation {
            log::debug!(
                "discarding stale response of fetch #{generation}, \
                 latest is #{}",
                self.generation,
            );
            return;
        }
        match result {
            Ok(page) => {
                self.requests = page.items;
                self.total = page.total;
                self.error = None;
                self.phase = Phase::Success;
            }
            Err(e) => {
                log::error!("failed to fetch service requests: {e}");
                self.error = Some(e.as_ref().to_string());
                self.phase = Phase::Error;
            }
        }
    }
}

/// Data derived from a [`State`] for rendering.
#[derive(Clone, Debug)]
pub struct Data {
    /// Loaded [`ServiceRequest`]s in the chosen [`Sort`] order.
    pub requests: Vec<ServiceRequest>,

    /// [`RequestSummary`] of the loaded [`ServiceRequest`]s.
    pub summary: RequestSummary,

    /// [`QuickStats`] of the loaded [`ServiceRequest`]s.
    pub quick_stats: QuickStats,

    /// [`PageInfo`] of the current page.
    pub pagination: PageInfo,
}

/// Orchestrator of a filterable, paginated list of [`ServiceRequest`]s.
///
/// Every change of filters or pagination refetches the page, replacing the
/// loaded [`ServiceRequest`]s wholesale. Errors are never returned: they end
/// up in [`State::error`].
#[derive(Debug)]
pub struct RequestsList<S> {
    /// Service to fetch [`ServiceRequest`]s with.
    service: S,

    /// Configuration of this [`RequestsList`].
    config: Config,

    /// Current [`State`].
    state: Mutex<State>,
}

impl<S> RequestsList<S> {
    /// Creates a new [`RequestsList`] in the [`Phase::Idle`].
    #[must_use]
    pub fn new(service: S, config: Config) -> Self {
        Self {
            service,
            config,
            state: Mutex::new(State::new(config.default_limit)),
        }
    }

    /// Returns a snapshot of the current [`State`].
    pub async fn state(&self) -> State {
        self.state.lock().await.clone()
    }

    /// Chooses the page-local [`Sort`] by the provided [`SortKey`].
    ///
    /// Issues no fetch: the backend always orders by creation time.
    pub async fn update_sort(&self, key: SortKey) -> Sort {
        let mut state = self.state.lock().await;
        let sort = Sort::toggle(state.sort, key);
        state.sort = Some(sort);
        sort
    }

    /// Supplies [`RollingMetrics`] computed outside of the loaded page.
    pub async fn set_rolling_metrics(&self, rolling: RollingMetrics) {
        self.state.lock().await.rolling = rolling;
    }

    /// Derives the [`Data`] to render at the provided `now` moment.
    pub async fn data(&self, now: DateTime) -> Data {
        let state = self.state.lock().await;
        let offset = self.config.utc_offset;

        let mut requests = state.requests.clone();
        if let Some(sort) = state.sort {
            sort.apply(&mut requests);
        }
        Data {
            summary: RequestSummary::generate(&requests, now, offset)
                .with_rolling(state.rolling),
            quick_stats: QuickStats::generate(&requests, now, offset),
            pagination: state.pagination.info(state.total),
            requests,
        }
    }
}

impl<S> RequestsList<S>
where
    S: Query<
        query::requests::List,
        Ok = Page<ServiceRequest>,
        Err = Traced<backend::Error>,
    >,
{
    /// Merges the provided [`FiltersUpdate`], moves to the first page and
    /// refetches.
    #[tracing::instrument(skip_all)]
    pub async fn update_filters(&self, update: FiltersUpdate) {
        self.fetch_with(|state| {
            state.filters.apply(update);
            state.pagination.reset_on_filter_change();
        })
        .await;
    }

    /// Clears all the [`Filters`], moves to the first page of the default
    /// [`Limit`] and refetches.
    #[tracing::instrument(skip_all)]
    pub async fn reset_filters(&self) {
        let limit = self.config.default_limit;
        self.fetch_with(|state| {
            state.filters = Filters::default();
            state.pagination.reset(limit);
        })
        .await;
    }

    /// Moves to the provided `page`, optionally changing the [`Limit`], and
    /// refetches.
    #[tracing::instrument(skip_all, fields(page = page, limit = ?limit))]
    pub async fn update_pagination(&self, page: u32, limit: Option<Limit>) {
        self.fetch_with(|state| state.pagination.update(page, limit))
            .await;
    }

    /// Refetches the current page without changing anything.
    #[tracing::instrument(skip_all)]
    pub async fn refetch(&self) {
        self.fetch_with(|_| {}).await;
    }

    /// Applies the provided change to the [`State`] and fetches the page it
    /// points to.
    ///
    /// The change and the start of the fetch happen under a single lock.
    async fn fetch_with(&self, change: impl FnOnce(&mut State)) {
        let (generation, query) = {
            let mut state = self.state.lock().await;
            change(&mut state);
            state.begin_fetch()
        };

        let result = self.service.execute(query).await;

        self.state.lock().await.complete_fetch(generation, result);
    }
}

#[cfg(test)]
mod spec {
    use std::{
        cell::RefCell,
        collections::{HashMap, VecDeque},
        rc::Rc,
        time::Duration,
    };

    use common::{
        operations::{By, Select},
        pagination::{Limit, Page},
        DateTime, Percent,
    };
    use tokio::{sync::oneshot, task};
    use tracerr::Traced;

    use super::{Config, Phase, RequestsList, SortKey, State};
    use crate::{
        domain::Ticket,
        infra::{backend, Backend},
        read::{
            filter::{FiltersUpdate, RawFilterInput},
            summary::RollingMetrics,
            ticket::list,
        },
        Service,
    };

    fn page(ids: &[&str], total: u64) -> list::Page {
        Page {
            items: ids
                .iter()
                .map(|&id| Ticket {
                    id: id.into(),
                    ..Ticket::default()
                })
                .collect(),
            total,
        }
    }

    fn search(value: &str) -> FiltersUpdate {
        FiltersUpdate {
            search: Some(Some(RawFilterInput::from(value))),
            ..FiltersUpdate::default()
        }
    }

    fn ids(state: &State) -> Vec<&str> {
        state.requests.iter().map(|r| r.id.as_str()).collect()
    }

    /// [`Backend`] answering with the scripted results in order.
    #[derive(Default)]
    struct Scripted {
        results: RefCell<VecDeque<Result<list::Page, String>>>,
        queries: RefCell<Vec<list::Query>>,
    }

    impl Scripted {
        fn new(
            results: impl IntoIterator<Item = Result<list::Page, String>>,
        ) -> Self {
            Self {
                results: RefCell::new(results.into_iter().collect()),
                queries: RefCell::default(),
            }
        }
    }

    impl Backend<Select<By<list::Page, list::Query>>> for Scripted {
        type Ok = list::Page;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<list::Page, list::Query>>,
        ) -> Result<Self::Ok, Self::Err> {
            self.queries.borrow_mut().push(by.into_inner());
            self.results
                .borrow_mut()
                .pop_front()
                .unwrap()
                .map_err(|e| tracerr::new!(backend::Error::Other(e)))
        }
    }

    /// [`Backend`] holding each response until it's released, keyed by the
    /// search filter of the request.
    struct Gated(RefCell<HashMap<String, oneshot::Receiver<list::Page>>>);

    impl Backend<Select<By<list::Page, list::Query>>> for Gated {
        type Ok = list::Page;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<list::Page, list::Query>>,
        ) -> Result<Self::Ok, Self::Err> {
            let key = by.into_inner().search.unwrap_or_default();
            let gate = self.0.borrow_mut().remove(&key).unwrap();
            Ok(gate.await.unwrap())
        }
    }

    fn list<B>(backend: B, limit: Limit) -> RequestsList<Service<B>> {
        RequestsList::new(
            Service::new(crate::Config::default(), backend),
            Config {
                default_limit: limit,
                ..Config::default()
            },
        )
    }

    #[tokio::test]
    async fn refetch_replaces_requests() {
        let list = list(
            Scripted::new([
                Ok(page(&["a", "b", "c"], 3)),
                Ok(page(&["d"], 1)),
            ]),
            Limit::Ten,
        );

        list.refetch().await;
        assert_eq!(ids(&list.state().await), ["a", "b", "c"]);

        list.refetch().await;
        let state = list.state().await;
        assert_eq!(ids(&state), ["d"]);
        assert_eq!(state.total, 1);
        assert_eq!(state.phase, Phase::Success);
    }

    #[tokio::test]
    async fn failure_keeps_previous_requests() {
        let list = list(
            Scripted::new([
                Ok(page(&["a"], 1)),
                Err("connection reset".into()),
                Ok(page(&["b"], 1)),
            ]),
            Limit::Ten,
        );

        list.refetch().await;
        list.refetch().await;
        let state = list.state().await;
        assert_eq!(ids(&state), ["a"]);
        assert_eq!(state.phase, Phase::Error);
        assert!(state.error.unwrap().contains("connection reset"));

        list.refetch().await;
        let state = list.state().await;
        assert_eq!(ids(&state), ["b"]);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn filter_update_moves_to_first_page() {
        let list = list(
            Scripted::new([Ok(page(&[], 40)), Ok(page(&[], 40))]),
            Limit::Ten,
        );

        list.update_pagination(3, None).await;
        assert_eq!(list.state().await.pagination.page(), 3);

        list.update_filters(search("leak")).await;

        let state = list.state().await;
        assert_eq!(state.pagination.page(), 1);
        let queries = list.service.backend().queries.borrow();
        assert_eq!(queries[0].page, 3);
        assert_eq!(queries[1].page, 1);
        assert_eq!(queries[1].search.as_deref(), Some("leak"));
        assert_eq!(queries[1].order_column, "createdAt");
        assert_eq!(queries[1].order_by, "DESC");
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let list = list(
            Scripted::new([Ok(page(&[], 0)), Ok(page(&[], 0))]),
            Limit::Twenty,
        );

        list.update_filters(search("leak")).await;
        list.update_pagination(1, Some(Limit::Fifty)).await;
        list.reset_filters().await;

        let state = list.state().await;
        assert!(state.filters.is_empty());
        assert_eq!(state.pagination.limit(), Limit::Twenty);
        assert_eq!(state.pagination.page(), 1);
    }

    #[tokio::test]
    async fn first_page_of_twelve_by_five() {
        let list = list(
            Scripted::new([Ok(page(&["1", "2", "3", "4", "5"], 12))]),
            Limit::Five,
        );

        list.refetch().await;

        let data = list.data(DateTime::now()).await;
        assert_eq!(data.requests.len(), 5);
        assert_eq!(data.pagination.total_pages, 3);
        assert_eq!(data.pagination.showing_from, 1);
        assert_eq!(data.pagination.showing_to, 5);
        assert_eq!(data.summary.total_requests, 5);
    }

    #[tokio::test]
    async fn sort_is_page_local() {
        let list = list(Scripted::new([Ok(page(&["a", "b"], 2))]), Limit::Ten);
        list.refetch().await;

        let _ = list.update_sort(SortKey::CreatedAt).await;
        let _ = list.update_sort(SortKey::Title).await;

        let data = list.data(DateTime::now()).await;
        assert_eq!(data.requests.len(), 2);
        assert_eq!(list.service.backend().queries.borrow().len(), 1);
    }

    #[tokio::test]
    async fn supplied_rolling_metrics_survive_refetch() {
        let list = list(
            Scripted::new([Ok(page(&["a"], 1)), Ok(page(&["b"], 1))]),
            Limit::Ten,
        );
        let rolling = RollingMetrics {
            average_response_time: Some(Duration::from_secs(5400)),
            average_completion_time: None,
            satisfaction_rate: Percent::new(92.into()),
        };

        list.refetch().await;
        assert_eq!(
            list.data(DateTime::now()).await.summary.rolling,
            RollingMetrics::default(),
        );

        list.set_rolling_metrics(rolling).await;
        list.refetch().await;

        let data = list.data(DateTime::now()).await;
        assert_eq!(data.summary.rolling, rolling);
        assert_eq!(data.summary.total_requests, 1);
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let (release_a, gate_a) = oneshot::channel();
        let (release_b, gate_b) = oneshot::channel();
        let backend = Gated(RefCell::new(HashMap::from([
            ("a".to_owned(), gate_a),
            ("b".to_owned(), gate_b),
        ])));
        let list = Rc::new(list(backend, Limit::Ten));

        task::LocalSet::new()
            .run_until(async move {
                let fetch_a = task::spawn_local({
                    let list = Rc::clone(&list);
                    async move { list.update_filters(search("a")).await }
                });
                task::yield_now().await;
                let fetch_b = task::spawn_local({
                    let list = Rc::clone(&list);
                    async move { list.update_filters(search("b")).await }
                });
                task::yield_now().await;

                release_b.send(page(&["b1"], 1)).unwrap();
                fetch_b.await.unwrap();
                release_a.send(page(&["a1", "a2"], 2)).unwrap();
                fetch_a.await.unwrap();

                let state = list.state().await;
                assert_eq!(ids(&state), ["b1"]);
                assert_eq!(state.total, 1);
                assert_eq!(
                    state.filters.search.as_ref().map(|s| s.as_str()),
                    Some("b"),
                );
                assert_eq!(state.phase, Phase::Success);
            })
            .await;
    }
}
