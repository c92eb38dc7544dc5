//! Remote page sessions
//!
//! Opens a single browser-controlled page per fetch, waits for a readiness
//! marker, returns the rendered document and always tears the page down.

pub mod chromium;
pub mod driver;
pub mod errors;
pub mod page_timeout;

pub use chromium::{ChromiumDriver, ChromiumPage};
pub use driver::{PageDriver, ReadinessMarker, RemotePage, SessionTimeouts, fetch_document};
pub use errors::{SessionError, SessionResult};
pub use page_timeout::with_page_timeout;
