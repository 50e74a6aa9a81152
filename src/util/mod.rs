//! Small helpers shared by the dashboard and the terminal UI.
//!
//! - **URL validation**: the API base URL and links opened in the browser
//! - **Text**: width-aware truncation and control character stripping for
//!   catalog strings rendered in the terminal
//! - **Tasks**: panic capture for spawned background work
//!
//! ```
//! use panchax::util::{display_width, truncate_to_width};
//!
//! assert_eq!(display_width("Amélie"), 6);
//! assert_eq!(truncate_to_width("Eternal Sunshine of the Spotless Mind", 12), "Eternal S...");
//! ```

mod task;
mod text;
mod url_validator;

pub use task::catch_task_panic;
pub use text::{display_width, format_rating, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_api_base, validate_url_for_open, UrlValidationError};

/// Longest search query the input box accepts.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
