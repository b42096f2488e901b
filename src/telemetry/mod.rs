mod init;
mod metrics;

pub use init::{TelemetryGuard, init_telemetry};
pub use metrics::{
    FAVORITES_ADDED, FAVORITES_DUPLICATE_BLOCKED, FAVORITES_REMOVED, HTTP_REQUEST_DURATION,
    HTTP_REQUESTS_TOTAL,
};
