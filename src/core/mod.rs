//! Core types - pure abstractions shared across the codebase.

mod content;
mod locale;
mod state;
mod url;

pub use content::{ContentKey, ContentType};
pub use locale::{LocaleHints, Locales};
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
pub use url::UrlPath;
