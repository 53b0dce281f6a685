//! Business logic services

pub mod audit;
pub mod export;
pub mod feed;
pub mod upstream;

pub use audit::{
    compute_statistics, AuditService, DEFAULT_WINDOW_DAYS, EXPORT_FETCH_LIMIT,
    SECURITY_FETCH_LIMIT,
};
pub use export::{export_activities, ExportArtifact, ExportFormat};
pub use feed::{ActivityFeed, FeedPhase, FeedRefreshJob, FeedSnapshot};
pub use upstream::{ActivitySource, AdminApiClient, RawActivityPage, RawPagination};
