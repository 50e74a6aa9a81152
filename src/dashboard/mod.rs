//! View-state orchestration for the dashboard.
//!
//! [`DashboardStore`] merges five remote sources (trending, recommendations,
//! favorites, watch history, genre list) into one [`ViewState`], switches
//! between them by [`Tab`], and keeps favorites and recommendations in step
//! after every favorite toggle (see [`reconcile`]).
//!
//! The store never blocks on the network. Gateway calls run as tokio tasks
//! that report back with a [`DashboardEvent`]:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use panchax::api::ApiClient;
//! # use panchax::dashboard::{DashboardStore, StoreOptions};
//! # use panchax::session::UserIdentity;
//! # async fn run(client: ApiClient, user: UserIdentity) {
//! let client = Arc::new(client);
//! let (tx, mut rx) = tokio::sync::mpsc::channel(32);
//! let mut store = DashboardStore::new(client.clone(), client, tx, StoreOptions::default());
//!
//! store.initialize(Some(user)).unwrap();
//! while let Some(event) = rx.recv().await {
//!     store.apply(event);
//!     if store.is_settled() {
//!         break;
//!     }
//! }
//! println!("{} trending", store.view().trending.len());
//! # }
//! ```

mod error;
mod events;
pub mod reconcile;
pub mod selector;
mod state;
mod store;

pub use error::{DashboardError, Failure, FailureKind, FetchTarget};
pub use events::{DashboardEvent, InitialLoad};
pub use selector::project;
pub use state::{MovieCollection, Tab, ViewState};
pub use store::{trailer_search_url, DashboardStore, DetailPane, StoreOptions, DEFAULT_DETAIL_CACHE_SIZE};
