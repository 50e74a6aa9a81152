//! Terminal client for the Panchax movie recommendation service.
//!
//! - [`api`]: REST gateways and their `reqwest` implementation
//! - [`dashboard`]: view state, favorite reconciliation and tab projection
//! - [`config`] and [`session`]: settings and the signed-in user
//! - [`util`]: text and URL helpers shared with the terminal UI

pub mod api;
pub mod config;
pub mod dashboard;
pub mod session;
pub mod util;
