//! Scripted portal double for engine tests.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::portal::PortalPage;
use crate::reaction::Reaction;
use crate::selector::Selector;
use crate::traversal::TraversalConfig;

/// Everything the fake recorded, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeAction {
    Goto { url: String },
    OpenPending,
    Reaction { reaction: Reaction, clicked: usize },
    Proceed,
    OpenCard { index: usize },
}

#[derive(Debug)]
struct FakeState {
    on_detail: bool,
    pending_left: usize,
    detail_has_proceed: bool,
    missing_proceed_budget: usize,
    proceed_click_vanish_budget: usize,
    vanishing_pending_budget: usize,
    icons_per_detail: usize,
    fail_icon_clicks: bool,
    ready_marker_present: bool,
    course_card: Option<Selector>,
    course_cards: Vec<String>,
    actions: Vec<FakeAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    ListingReady,
    Pending,
    Proceed,
    Icon(Reaction),
    CourseCard,
    Unknown,
}

/// In-memory portal modeling just enough page state for the traversal:
/// a listing with a ready marker and N pending items, and a detail page
/// with reaction icons and a proceed control. The `set_*` knobs inject
/// the failure modes the engine has to survive.
pub struct FakePortal {
    listing_ready: Selector,
    pending: Selector,
    proceed: Selector,
    state: Mutex<FakeState>,
}

impl FakePortal {
    pub fn new(config: &TraversalConfig, pending: usize) -> Self {
        Self::with_selectors(
            config.listing_ready.clone(),
            config.pending.clone(),
            config.proceed.clone(),
            pending,
        )
    }

    /// A page with only a ready marker, for wait and course tests.
    pub fn empty(listing_ready: Selector) -> Self {
        Self::with_selectors(
            listing_ready,
            Selector::css(".fake-pending"),
            Selector::css(".fake-proceed"),
            0,
        )
    }

    fn with_selectors(
        listing_ready: Selector,
        pending: Selector,
        proceed: Selector,
        pending_left: usize,
    ) -> Self {
        FakePortal {
            listing_ready,
            pending,
            proceed,
            state: Mutex::new(FakeState {
                on_detail: false,
                pending_left,
                detail_has_proceed: true,
                missing_proceed_budget: 0,
                proceed_click_vanish_budget: 0,
                vanishing_pending_budget: 0,
                icons_per_detail: 1,
                fail_icon_clicks: false,
                ready_marker_present: true,
                course_card: None,
                course_cards: Vec::new(),
                actions: Vec::new(),
            }),
        }
    }

    /// Number of reaction icons each detail page renders.
    pub fn set_icons_per_detail(&self, icons: usize) {
        self.state.lock().unwrap().icons_per_detail = icons;
    }

    /// Make every icon click return a driver error.
    pub fn set_fail_icon_clicks(&self, fail: bool) {
        self.state.lock().unwrap().fail_icon_clicks = fail;
    }

    /// The next `pages` detail pages render without a proceed control.
    pub fn set_missing_proceed_budget(&self, pages: usize) {
        self.state.lock().unwrap().missing_proceed_budget = pages;
    }

    /// The next `clicks` proceed clicks miss even though the control
    /// was visible to the readiness poll.
    pub fn set_proceed_click_vanish_budget(&self, clicks: usize) {
        self.state.lock().unwrap().proceed_click_vanish_budget = clicks;
    }

    /// The next `clicks` pending clicks miss their element.
    pub fn set_vanishing_pending_budget(&self, clicks: usize) {
        self.state.lock().unwrap().vanishing_pending_budget = clicks;
    }

    /// Toggle the listing-ready marker.
    pub fn set_ready_marker_present(&self, present: bool) {
        self.state.lock().unwrap().ready_marker_present = present;
    }

    /// Render course cards with the given labels behind `card`.
    pub fn set_course_cards(&self, card: Selector, labels: Vec<String>) {
        let mut state = self.state.lock().unwrap();
        state.course_card = Some(card);
        state.course_cards = labels;
    }

    pub fn actions(&self) -> Vec<FakeAction> {
        self.state.lock().unwrap().actions.clone()
    }

    fn classify(&self, state: &FakeState, selector: &Selector) -> Target {
        if *selector == self.listing_ready {
            Target::ListingReady
        } else if *selector == self.pending {
            Target::Pending
        } else if *selector == self.proceed {
            Target::Proceed
        } else if let Some(reaction) = Reaction::ALL
            .iter()
            .copied()
            .find(|r| r.icon_selector() == *selector)
        {
            Target::Icon(reaction)
        } else if state.course_card.as_ref() == Some(selector) {
            Target::CourseCard
        } else {
            Target::Unknown
        }
    }
}

#[async_trait]
impl PortalPage for FakePortal {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.on_detail = false;
        state.actions.push(FakeAction::Goto {
            url: url.to_string(),
        });
        Ok(())
    }

    async fn count(&self, selector: &Selector) -> Result<usize> {
        let state = self.state.lock().unwrap();
        let found = match self.classify(&state, selector) {
            Target::ListingReady => {
                if !state.on_detail && state.ready_marker_present {
                    1
                } else {
                    0
                }
            }
            Target::Pending => {
                if state.on_detail {
                    0
                } else {
                    state.pending_left
                }
            }
            Target::Proceed => {
                if state.on_detail && state.detail_has_proceed {
                    1
                } else {
                    0
                }
            }
            Target::Icon(_) => {
                if state.on_detail {
                    state.icons_per_detail
                } else {
                    0
                }
            }
            Target::CourseCard => state.course_cards.len(),
            Target::Unknown => 0,
        };
        Ok(found)
    }

    async fn texts(&self, selector: &Selector) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        match self.classify(&state, selector) {
            Target::CourseCard => Ok(state.course_cards.clone()),
            _ => Ok(Vec::new()),
        }
    }

    async fn click_first(&self, selector: &Selector) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match self.classify(&state, selector) {
            Target::Pending => {
                if state.on_detail || state.pending_left == 0 {
                    return Ok(false);
                }
                if state.vanishing_pending_budget > 0 {
                    state.vanishing_pending_budget -= 1;
                    return Ok(false);
                }
                state.on_detail = true;
                state.detail_has_proceed = if state.missing_proceed_budget > 0 {
                    state.missing_proceed_budget -= 1;
                    false
                } else {
                    true
                };
                state.actions.push(FakeAction::OpenPending);
                Ok(true)
            }
            Target::Proceed => {
                if !state.on_detail || !state.detail_has_proceed {
                    return Ok(false);
                }
                if state.proceed_click_vanish_budget > 0 {
                    state.proceed_click_vanish_budget -= 1;
                    return Ok(false);
                }
                state.on_detail = false;
                state.pending_left = state.pending_left.saturating_sub(1);
                state.actions.push(FakeAction::Proceed);
                Ok(true)
            }
            Target::Icon(reaction) => {
                if state.on_detail && state.icons_per_detail > 0 {
                    state.actions.push(FakeAction::Reaction {
                        reaction,
                        clicked: 1,
                    });
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            _ => Ok(false),
        }
    }

    async fn click_nth(&self, selector: &Selector, index: usize) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match self.classify(&state, selector) {
            Target::CourseCard => {
                if index < state.course_cards.len() {
                    state.actions.push(FakeAction::OpenCard { index });
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            _ => Ok(false),
        }
    }

    async fn click_each(&self, selector: &Selector, _pause: Duration) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        match self.classify(&state, selector) {
            Target::Icon(reaction) => {
                if state.fail_icon_clicks {
                    return Err(Error::driver(anyhow!("icon click rejected")));
                }
                let clicked = if state.on_detail {
                    state.icons_per_detail
                } else {
                    0
                };
                if clicked > 0 {
                    state.actions.push(FakeAction::Reaction { reaction, clicked });
                }
                Ok(clicked)
            }
            _ => Ok(0),
        }
    }
}
