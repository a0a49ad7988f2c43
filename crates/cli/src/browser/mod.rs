//! Browser plumbing: the managed chromedriver process, the wire client
//! that speaks to it, and the portal session built on top.

pub mod driver;
pub mod session;
pub mod webdriver;

pub use driver::DriverServer;
pub use session::PortalSession;
pub use webdriver::{DriverSession, StoredCookie, WebDriverClient};
