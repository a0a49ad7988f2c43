use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::portal::PortalPage;
use crate::selector::Selector;

/// Bounds for a readiness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Give up after this much total wall time.
    pub timeout: Duration,
    /// Sleep between attempts.
    pub interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        WaitConfig {
            timeout: Duration::from_secs(10),
            interval: Duration::from_millis(250),
        }
    }
}

/// Poll until at least one element matches `selector`, returning the
/// match count. Expiry surfaces as [`Error::ReadinessTimeout`].
pub async fn until_present(
    page: &dyn PortalPage,
    selector: &Selector,
    wait: WaitConfig,
) -> Result<usize> {
    let started = Instant::now();
    loop {
        let found = page.count(selector).await?;
        if found > 0 {
            return Ok(found);
        }
        if started.elapsed() >= wait.timeout {
            return Err(Error::ReadinessTimeout {
                selector: selector.clone(),
                waited_ms: started.elapsed().as_millis() as u64,
            });
        }
        tokio::time::sleep(wait.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePortal;

    fn short_wait() -> WaitConfig {
        WaitConfig {
            timeout: Duration::from_millis(40),
            interval: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn returns_match_count_when_present() {
        let marker = Selector::css("#app");
        let page = FakePortal::empty(marker.clone());

        let found = until_present(&page, &marker, short_wait()).await.unwrap();
        assert_eq!(found, 1);
    }

    #[tokio::test]
    async fn expiry_surfaces_timeout_error_naming_the_selector() {
        let marker = Selector::css("#app");
        let page = FakePortal::empty(marker.clone());
        page.set_ready_marker_present(false);

        let err = until_present(&page, &marker, short_wait())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("#app"));
    }
}
