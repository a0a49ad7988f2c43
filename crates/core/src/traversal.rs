use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::portal::PortalPage;
use crate::reaction::ReactionPolicy;
use crate::selector::Selector;
use crate::wait::{self, WaitConfig};

/// What to do when the proceed control never shows up (or will not
/// click) on a detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// End the run, reporting how far it got.
    Abort,
    /// Re-navigate to the listing and pick up the next pending item.
    #[default]
    Relist,
}

/// Everything one traversal run needs to know.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// Listing URL, used by relist recovery.
    pub listing_url: String,
    /// Marker polled before each pending re-query.
    pub listing_ready: Selector,
    /// The pending-item predicate.
    pub pending: Selector,
    /// The proceed control on a detail page. Doubles as the detail-page
    /// readiness signal.
    pub proceed: Selector,
    pub reaction_policy: ReactionPolicy,
    pub recovery: RecoveryPolicy,
    /// Bounds shared by every readiness poll.
    pub wait: WaitConfig,
    /// Pause between individual icon clicks.
    pub icon_pause: Duration,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The pending query came back empty.
    Drained,
    /// A missing-proceed event under the abort policy.
    ProceedLost,
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraversalReport {
    pub items_processed: usize,
    pub reactions_applied: usize,
    pub relists: usize,
    pub outcome: Outcome,
}

/// Sequential drain of a pending-items listing.
///
/// The caller positions the session on the listing page first; the run
/// itself only navigates during relist recovery. Work items are
/// re-queried every iteration, so no element handle outlives the
/// iteration that found it.
pub struct Traversal {
    config: TraversalConfig,
    rng: StdRng,
}

impl Traversal {
    pub fn new(config: TraversalConfig) -> Self {
        Traversal {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for reproducible runs.
    pub fn with_seed(config: TraversalConfig, seed: u64) -> Self {
        Traversal {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub async fn run(&mut self, page: &dyn PortalPage) -> Result<TraversalReport> {
        let cfg = self.config.clone();
        let mut report = TraversalReport {
            items_processed: 0,
            reactions_applied: 0,
            relists: 0,
            outcome: Outcome::Drained,
        };

        loop {
            wait::until_present(page, &cfg.listing_ready, cfg.wait).await?;

            let pending = page.count(&cfg.pending).await?;
            if pending == 0 {
                info!(target = "jarvis", items = report.items_processed, "pending queue drained");
                return Ok(report);
            }
            debug!(target = "jarvis", pending, "pending items on listing");

            if !page.click_first(&cfg.pending).await? {
                warn!(target = "jarvis", selector = %cfg.pending, "pending item vanished before click");
                continue;
            }

            // The proceed control appearing is what tells us the detail
            // page rendered.
            match wait::until_present(page, &cfg.proceed, cfg.wait).await {
                Ok(_) => {}
                Err(err) if err.is_timeout() => {
                    warn!(target = "jarvis", error = %err, "proceed control never appeared");
                    if !self.recover(page, &cfg, &mut report).await? {
                        report.outcome = Outcome::ProceedLost;
                        return Ok(report);
                    }
                    continue;
                }
                Err(err) => return Err(err),
            }

            let reaction = cfg.reaction_policy.pick(&mut self.rng);
            match page
                .click_each(&reaction.icon_selector(), cfg.icon_pause)
                .await
            {
                Ok(0) => debug!(target = "jarvis", %reaction, "no reaction icons on detail page"),
                Ok(clicked) => {
                    debug!(target = "jarvis", %reaction, clicked, "reaction applied");
                    report.reactions_applied += clicked;
                }
                Err(err) => {
                    warn!(target = "jarvis", %reaction, error = %err, "reaction step failed, proceeding anyway");
                }
            }

            match page.click_first(&cfg.proceed).await {
                Ok(true) => {
                    report.items_processed += 1;
                    debug!(target = "jarvis", items = report.items_processed, "item graded");
                }
                Ok(false) => {
                    warn!(target = "jarvis", "proceed control gone at click time");
                    if !self.recover(page, &cfg, &mut report).await? {
                        report.outcome = Outcome::ProceedLost;
                        return Ok(report);
                    }
                }
                Err(err) => {
                    warn!(target = "jarvis", error = %err, "proceed click failed");
                    if !self.recover(page, &cfg, &mut report).await? {
                        report.outcome = Outcome::ProceedLost;
                        return Ok(report);
                    }
                }
            }
        }
    }

    /// Apply the recovery policy to a missing-proceed event. `Ok(true)`
    /// means the outer loop should continue; `Ok(false)` ends the run.
    async fn recover(
        &self,
        page: &dyn PortalPage,
        cfg: &TraversalConfig,
        report: &mut TraversalReport,
    ) -> Result<bool> {
        match cfg.recovery {
            RecoveryPolicy::Abort => {
                warn!(target = "jarvis", "aborting run on missing proceed control");
                Ok(false)
            }
            RecoveryPolicy::Relist => {
                info!(target = "jarvis", url = %cfg.listing_url, "relisting after missing proceed control");
                page.goto(&cfg.listing_url).await?;
                report.relists += 1;
                Ok(true)
            }
        }
    }
}
