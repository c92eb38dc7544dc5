pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{is_absolute_http_url, page_url, resolve_href};
