//! Inter-page pacing
//!
//! The crawl loop pauses between consecutive page requests to stay polite
//! toward the remote service. The pause is a trait so tests can observe it
//! without sleeping.

use std::future::Future;
use std::time::Duration;

/// Suspends the crawl between two page requests
pub trait Throttle {
    fn pause(&mut self, interval: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepThrottle;

impl Throttle for SleepThrottle {
    async fn pause(&mut self, interval: Duration) {
        if interval.is_zero() {
            return;
        }
        tracing::debug!("Waiting {:?} before next page", interval);
        tokio::time::sleep(interval).await;
    }
}
