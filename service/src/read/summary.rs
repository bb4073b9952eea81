//! Aggregated statistics over loaded [`ServiceRequest`]s.

use std::time::Duration;

use common::{DateTimeOf, Percent};
use time::UtcOffset;

use super::ServiceRequest;

/// Summary of a list of [`ServiceRequest`]s.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RequestSummary {
    /// Number of [`ServiceRequest`]s.
    pub total_requests: u64,

    /// Number of [`ServiceRequest`]s not resolved or closed yet.
    pub active_requests: u64,

    /// Number of [`ServiceRequest`]s completed on the current calendar day.
    pub completed_today: u64,

    /// Number of overdue [`ServiceRequest`]s.
    pub overdue_requests: u64,

    /// Metrics spanning the whole backend corpus rather than the loaded
    /// page.
    pub rolling: RollingMetrics,
}

/// Metrics requiring the whole backend corpus to be computed.
///
/// These are never derived from a loaded page: a page is a biased sample.
/// Each one stays [`None`] unless supplied by the caller.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RollingMetrics {
    /// Average time from filing to the first response.
    pub average_response_time: Option<Duration>,

    /// Average time from filing to completion.
    pub average_completion_time: Option<Duration>,

    /// Share of satisfied residents.
    pub satisfaction_rate: Option<Percent>,
}

impl RequestSummary {
    /// Generates a [`RequestSummary`] of the provided [`ServiceRequest`]s at
    /// the provided `now` moment.
    ///
    /// Calendar days are counted at the provided [`UtcOffset`].
    #[must_use]
    pub fn generate<Of: ?Sized>(
        requests: &[ServiceRequest],
        now: DateTimeOf<Of>,
        offset: UtcOffset,
    ) -> Self {
        let today = now.date_at(offset);
        requests.iter().fold(Self::default(), |mut sum, req| {
            sum.total_requests += 1;
            if req.is_active() {
                sum.active_requests += 1;
            }
            if req
                .completed_at
                .is_some_and(|dt| dt.date_at(offset) == today)
            {
                sum.completed_today += 1;
            }
            if req.is_overdue(now) {
                sum.overdue_requests += 1;
            }
            sum
        })
    }

    /// Attaches the provided [`RollingMetrics`] to this [`RequestSummary`].
    #[must_use]
    pub const fn with_rolling(mut self, rolling: RollingMetrics) -> Self {
        self.rolling = rolling;
        self
    }
}

/// Counters shown as dashboard tiles.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct QuickStats {
    /// Number of active high-priority [`ServiceRequest`]s.
    pub urgent: u64,

    /// Number of active [`ServiceRequest`]s nobody is assigned to.
    pub unassigned: u64,

    /// Number of active [`ServiceRequest`]s due on the current calendar day.
    pub due_today: u64,

    /// Number of [`ServiceRequest`]s with images attached.
    pub with_images: u64,

    /// Share of completed [`ServiceRequest`]s.
    pub completion_rate: Percent,

    /// Share of overdue [`ServiceRequest`]s.
    pub overdue_rate: Percent,
}

impl QuickStats {
    /// Generates [`QuickStats`] of the provided [`ServiceRequest`]s at the
    /// provided `now` moment.
    #[must_use]
    pub fn generate<Of: ?Sized>(
        requests: &[ServiceRequest],
        now: DateTimeOf<Of>,
        offset: UtcOffset,
    ) -> Self {
        let today = now.date_at(offset);
        let mut stats = Self::default();
        let (mut completed, mut overdue) = (0, 0);
        for req in requests {
            if req.is_completed() {
                completed += 1;
            } else {
                if req.is_urgent() {
                    stats.urgent += 1;
                }
                if !req.is_assigned() {
                    stats.unassigned += 1;
                }
                if req.due_date.is_some_and(|dt| dt.date_at(offset) == today) {
                    stats.due_today += 1;
                }
            }
            if req.is_overdue(now) {
                overdue += 1;
            }
            if req.has_images() {
                stats.with_images += 1;
            }
        }

        let total = requests.len() as u64;
        stats.completion_rate = Percent::ratio(completed, total);
        stats.overdue_rate = Percent::ratio(overdue, total);
        stats
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Percent};
    use serde_json::json;
    use time::UtcOffset;

    use super::{QuickStats, RequestSummary, RollingMetrics};
    use crate::{read::ServiceRequest, Locale};

    fn istanbul() -> UtcOffset {
        UtcOffset::from_hms(3, 0, 0).unwrap()
    }

    fn requests(raw: serde_json::Value) -> Vec<ServiceRequest> {
        serde_json::from_value::<Vec<_>>(raw)
            .unwrap()
            .into_iter()
            .map(|t| ServiceRequest::from_ticket(t, &Locale::default()))
            .collect()
    }

    #[test]
    fn empty_list_yields_zeroes() {
        let now = DateTime::now();

        let summary = RequestSummary::generate(&[], now, istanbul());
        assert_eq!(summary, RequestSummary::default());
        assert_eq!(summary.rolling.satisfaction_rate, None);

        let stats = QuickStats::generate(&[], now, istanbul());
        assert_eq!(stats.completion_rate, Percent::ZERO);
        assert_eq!(stats.overdue_rate, Percent::ZERO);
    }

    #[test]
    fn counts_loaded_requests() {
        let now = DateTime::from_rfc3339("2024-03-10T22:30:00Z").unwrap();
        let list = requests(json!([
            {
                "id": "a",
                "status": "OPEN",
                "priority": "HIGH",
                "dueDate": "2024-03-09T10:00:00Z",
                "imageCount": 2,
            },
            {
                "id": "b",
                "status": "IN_PROGRESS",
                "assignee": { "id": "u-1", "name": "Mehmet Demir" },
                "dueDate": "2024-03-11T15:00:00Z",
            },
            {
                "id": "c",
                "status": "RESOLVED",
                "priority": "HIGH",
                "completedAt": "2024-03-10T21:30:00Z",
            },
            {
                "id": "d",
                "status": "CLOSED",
                "completedAt": "2024-03-10T20:30:00Z",
            },
        ]));

        let summary = RequestSummary::generate(&list, now, istanbul());
        assert_eq!(summary.total_requests, 4);
        assert_eq!(summary.active_requests, 2);
        // 21:30Z is March 11 in Istanbul, 20:30Z is still March 10.
        assert_eq!(summary.completed_today, 1);
        assert_eq!(summary.overdue_requests, 1);

        let stats = QuickStats::generate(&list, now, istanbul());
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.unassigned, 1);
        assert_eq!(stats.due_today, 1);
        assert_eq!(stats.with_images, 1);
        assert_eq!(stats.completion_rate.to_string(), "50");
        assert_eq!(stats.overdue_rate.to_string(), "25");
    }

    #[test]
    fn active_requests_follow_status_only() {
        let now = DateTime::from_rfc3339("2024-03-10T12:00:00Z").unwrap();
        let list = requests(json!([
            {
                "id": "reopened",
                "status": "IN_PROGRESS",
                "completedAt": "2024-03-08T09:00:00Z",
            },
            { "id": "odd", "status": "ON_HOLD" },
            { "id": "done", "status": "RESOLVED" },
        ]));

        let summary = RequestSummary::generate(&list, now, istanbul());
        assert_eq!(summary.total_requests, 3);
        assert_eq!(summary.active_requests, 2);
        assert_eq!(summary.completed_today, 0);
    }

    #[test]
    fn rolling_metrics_pass_through() {
        let rolling = RollingMetrics {
            satisfaction_rate: Percent::new(87.into()),
            ..RollingMetrics::default()
        };

        let summary =
            RequestSummary::generate(&[], DateTime::now(), UtcOffset::UTC)
                .with_rolling(rolling);

        assert_eq!(summary.rolling, rolling);
        assert_eq!(summary.total_requests, 0);
    }
}
