use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use super::live_events::LiveEventService;
use super::recommendation::RecommendationService;

/// Periodically expires stale recommendation-history records and live events.
///
/// Runs as a single background task; the two sweeps execute sequentially, so
/// the sweeper never overlaps with itself.
pub async fn run(
    recommendations: Arc<RecommendationService>,
    live_events: Arc<LiveEventService>,
    period: Duration,
) {
    let mut ticker = interval(period);

    loop {
        ticker.tick().await;
        tracing::debug!("Running expiry sweepers");

        if let Err(e) = recommendations.clean_expired_history().await {
            tracing::error!(error = %e, "Recommendation-history sweep failed");
        }

        if let Err(e) = live_events.clear_expired_live_events().await {
            tracing::error!(error = %e, "Live-event sweep failed");
        }
    }
}
