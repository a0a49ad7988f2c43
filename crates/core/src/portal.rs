use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::selector::Selector;

/// Browser-side operations the traversal engine needs.
///
/// Implementations treat a missing element as page state, not failure:
/// `click_first` reports `Ok(false)` and `click_each` reports `Ok(0)`
/// when nothing matches. Errors are reserved for driver and session
/// failures.
#[async_trait]
pub trait PortalPage: Send + Sync {
    /// Navigate the session to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &Selector) -> Result<usize>;

    /// Visible text of every element matching `selector`, in DOM order.
    async fn texts(&self, selector: &Selector) -> Result<Vec<String>>;

    /// Click the first element matching `selector`. Returns `false` when
    /// no element matched.
    async fn click_first(&self, selector: &Selector) -> Result<bool>;

    /// Click the match at `index` (DOM order). Returns `false` when the
    /// index is out of range.
    async fn click_nth(&self, selector: &Selector, index: usize) -> Result<bool>;

    /// Click every element matching `selector`, pausing between clicks.
    /// Returns the number of elements clicked.
    async fn click_each(&self, selector: &Selector, pause: Duration) -> Result<usize>;
}
