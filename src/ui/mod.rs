//! Terminal User Interface module.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - keyboard input handling
//! - `events` - applies dashboard events and reports failures
//! - `render` - layout and header/tab/genre bars
//! - `movies` - movie list widget
//! - `details` - detail pane widget
//! - `status` - status bar widget
//! - `help` - key binding overlay

mod details;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod movies;
mod render;
mod status;

pub use loop_runner::{run, Action};
