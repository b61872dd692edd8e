//! Shared utilities for the UI layer: Unicode-aware text measurement and
//! URL validation for links that get handed to the system browser.

mod text;
mod url_check;

pub use text::{summary_to_text, truncate_to_width};
pub use url_check::validate_browser_url;
