//! Live activity feed
//!
//! Keeps the most recent window of activity records in memory for the
//! dashboard, refreshed on a fixed interval. The fetch lifecycle is an
//! explicit state machine rather than ad hoc booleans, and every refresh
//! carries a monotonically increasing token: a response that resolves after
//! a newer refresh has started is discarded, so stale data can never
//! overwrite fresher data.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::{map_raw, ActivityLog, ActivityQuery};
use crate::services::upstream::ActivitySource;
use crate::utils::{SortDirection, SortState};

/// Fetch lifecycle of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedPhase {
    /// No fetch in flight, no data yet or data is current.
    Idle,
    /// First fetch in flight, nothing to show yet.
    Fetching,
    /// A refresh is in flight while the previous window is still shown.
    StaleWhileRevalidating,
    /// The last refresh failed; the previous window (if any) is still shown.
    Error,
}

#[derive(Debug, Clone)]
struct FeedState {
    phase: FeedPhase,
    activities: Vec<ActivityLog>,
    error: Option<String>,
    last_refreshed: Option<DateTime<Utc>>,
    sort: SortState,
}

/// Serialized view of the feed handed to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    pub phase: FeedPhase,
    pub activities: Vec<ActivityLog>,
    pub error: Option<String>,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub sort: SortState,
    pub paused: bool,
}

/// In-memory auto-refreshing window of recent activity.
pub struct ActivityFeed {
    source: Arc<dyn ActivitySource>,
    query: ActivityQuery,
    state: RwLock<FeedState>,
    /// Token of the most recently started refresh.
    latest_token: AtomicU64,
    paused: AtomicBool,
}

impl ActivityFeed {
    pub fn new(source: Arc<dyn ActivitySource>, query: ActivityQuery) -> Self {
        Self {
            source,
            query,
            state: RwLock::new(FeedState {
                phase: FeedPhase::Idle,
                activities: Vec::new(),
                error: None,
                last_refreshed: None,
                sort: SortState::new(),
            }),
            latest_token: AtomicU64::new(0),
            paused: AtomicBool::new(false),
        }
    }

    /// Fetch the feed window once. Safe to call concurrently: only the
    /// response belonging to the newest refresh is applied.
    pub async fn refresh(&self) {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.write().await;
            state.phase = if state.activities.is_empty() && state.last_refreshed.is_none() {
                FeedPhase::Fetching
            } else {
                FeedPhase::StaleWhileRevalidating
            };
        }

        let result = self.source.fetch_activity(&self.query).await;

        let mut state = self.state.write().await;
        if token != self.latest_token.load(Ordering::SeqCst) {
            debug!(token, "Discarding out-of-order feed response");
            return;
        }

        match result {
            Ok(page) => {
                state.activities = page.records.into_iter().map(map_raw).collect();
                let sort = state.sort.clone();
                apply_sort(&mut state.activities, &sort);
                state.phase = FeedPhase::Idle;
                state.error = None;
                state.last_refreshed = Some(Utc::now());
            }
            Err(e) => {
                warn!("Feed refresh failed: {:#}", e);
                state.phase = FeedPhase::Error;
                state.error = Some("Failed to load activity feed".to_string());
            }
        }
    }

    /// Current view of the feed.
    pub async fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.read().await;
        FeedSnapshot {
            phase: state.phase,
            activities: state.activities.clone(),
            error: state.error.clone(),
            last_refreshed: state.last_refreshed,
            sort: state.sort.clone(),
            paused: self.is_paused(),
        }
    }

    /// Suspend auto-refresh (detail panel open).
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resume auto-refresh (detail panel closed).
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Register a column-header click and reorder the cached window.
    pub async fn toggle_sort(&self, column: &str) -> (String, SortDirection) {
        let mut state = self.state.write().await;
        let order = state.sort.toggle(column);
        let sort = state.sort.clone();
        apply_sort(&mut state.activities, &sort);
        order
    }
}

/// Reorder the window per the active sort. Supported columns mirror the
/// dashboard table headers; an unknown column leaves the order untouched.
fn apply_sort(activities: &mut [ActivityLog], sort: &SortState) {
    let Some((column, direction)) = sort.order_by() else {
        return;
    };
    match column {
        "created_at" => activities.sort_by_key(|a| a.created_at),
        "activity_type" => {
            activities.sort_by(|a, b| a.activity_type.as_str().cmp(b.activity_type.as_str()))
        }
        "user" => activities.sort_by(|a, b| {
            let ua = a.user.as_ref().map(|u| u.username.as_str()).unwrap_or("");
            let ub = b.user.as_ref().map(|u| u.username.as_str()).unwrap_or("");
            ua.cmp(ub)
        }),
        _ => return,
    }
    if direction == SortDirection::Descending {
        activities.reverse();
    }
}

/// Background auto-refresh job for the activity feed.
///
/// Ticks at a fixed interval; a paused feed skips the tick entirely. No
/// backoff or jitter.
pub struct FeedRefreshJob {
    feed: Arc<ActivityFeed>,
    interval: Duration,
}

impl FeedRefreshJob {
    pub fn new(feed: Arc<ActivityFeed>, interval_secs: u64) -> Self {
        Self {
            feed,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Start the background refresh job.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("Starting feed refresh job with interval {:?}", self.interval);

            let mut interval = tokio::time::interval(self.interval);

            loop {
                interval.tick().await;

                if self.feed.is_paused() {
                    debug!("Feed is paused, skipping refresh");
                    continue;
                }

                self.feed.refresh().await;
            }
        })
    }
}
