//! Prometheus metrics recorder and metric names.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the handle used to render the `/metrics` endpoint. Call once at
/// startup before any metrics are recorded.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Page renders total (counter).
pub const BOOT_PAGE_RENDERS_TOTAL: &str = "boot_page_renders_total";
/// Dev-context requests total (counter, labels: outcome).
pub const BOOT_DEV_CONTEXT_REQUESTS_TOTAL: &str = "boot_dev_context_requests_total";

/// Outcome label for a served dev-context request.
pub const OUTCOME_SERVED: &str = "served";
/// Outcome label for a dev-context request refused outside developer mode.
pub const OUTCOME_DENIED: &str = "denied";
