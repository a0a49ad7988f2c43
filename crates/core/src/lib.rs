//! jarvis: traversal engine for the campus grading portal
//!
//! This crate drains pending grading items on the portal: re-query the
//! pending buttons, open the first, apply a reaction, proceed, repeat
//! until the queue is empty. It is browser-agnostic; anything
//! implementing [`PortalPage`] can be driven, and
//! [`testing::FakePortal`] is a scripted double for tests. The real
//! WebDriver adapter lives in the CLI crate.
//!
//! # Example
//!
//! ```ignore
//! use jarvis::{Reaction, ReactionPolicy, RecoveryPolicy, Selector, Traversal, TraversalConfig};
//!
//! let config = TraversalConfig {
//!     listing_url: "https://camper.campuslands.com/calificaciones".into(),
//!     listing_ready: Selector::css("#app"),
//!     pending: Selector::button_text("btn-short", "Calificar"),
//!     proceed: Selector::css(".btn-medium.w-fit.mt-14"),
//!     reaction_policy: ReactionPolicy::Fixed(Reaction::Happy),
//!     recovery: RecoveryPolicy::Relist,
//!     wait: Default::default(),
//!     icon_pause: std::time::Duration::from_millis(100),
//! };
//!
//! // `page` is any PortalPage impl positioned on the listing.
//! let report = Traversal::new(config).run(&page).await?;
//! println!("graded {} items", report.items_processed);
//! ```

pub mod course;
pub mod error;
pub mod portal;
pub mod reaction;
pub mod selector;
pub mod testing;
pub mod traversal;
pub mod wait;

pub use course::{CourseConfig, open_latest};
pub use error::{Error, Result};
pub use portal::PortalPage;
pub use reaction::{Reaction, ReactionPolicy};
pub use selector::Selector;
pub use traversal::{Outcome, RecoveryPolicy, Traversal, TraversalConfig, TraversalReport};
pub use wait::{WaitConfig, until_present};
