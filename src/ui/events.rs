//! Dashboard event processing.
//!
//! Applies background task results to the store and turns newly recorded
//! failures into status bar messages.

use crate::app::App;
use panchax::api::MovieId;
use panchax::dashboard::{DashboardEvent, DetailPane};

pub(super) fn handle_dashboard_event(app: &mut App, event: DashboardEvent) {
    let was_loading = app.store.view().loading;
    let favorite_write = match &event {
        DashboardEvent::FavoriteWritten {
            movie_id,
            make_favorite,
            result: Ok(()),
            ..
        } => Some((*movie_id, *make_favorite)),
        _ => None,
    };
    let resynced = matches!(event, DashboardEvent::FavoritesResynced { .. });

    app.store.apply(event);

    if let Some(failure) = app.store.last_failure() {
        app.set_status(failure.to_string());
        app.store.clear_last_failure();
        if resynced {
            app.pending_favorite = None;
        }
    } else if let Some((movie_id, added)) = favorite_write {
        match (added, favorite_title(app, movie_id)) {
            (true, Some(title)) => app.set_status(format!("Added {} to favorites", title)),
            // Not cached locally; the title arrives with the favorites re-fetch.
            (true, None) => app.pending_favorite = Some(movie_id),
            (false, _) => app.set_status("Removed from favorites"),
        }
    } else if let Some(movie_id) = app.pending_favorite.filter(|_| resynced) {
        app.pending_favorite = None;
        let title = favorite_title(app, movie_id).unwrap_or_else(|| format!("#{}", movie_id));
        app.set_status(format!("Added {} to favorites", title));
    } else if was_loading && !app.store.view().loading {
        app.set_status("Dashboard loaded");
    }

    if matches!(app.store.details(), Some(DetailPane::Failed { .. })) {
        app.store.close_details();
    }

    app.clamp_selection();
}

fn favorite_title(app: &App, movie_id: MovieId) -> Option<String> {
    app.store
        .view()
        .favorites
        .find(movie_id)
        .map(|m| m.title.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use panchax::api::{ApiError, CatalogGateway, Movie, MovieDetails, MovieId, UserGateway};
    use panchax::dashboard::{DashboardStore, StoreOptions};
    use panchax::session::UserIdentity;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// Every endpoint fails, except trending.
    struct FlakyGateway;

    #[async_trait]
    impl CatalogGateway for FlakyGateway {
        async fn search(&self, _q: &str, _l: usize) -> Result<Vec<Movie>, ApiError> {
            Err(ApiError::Timeout)
        }
        async fn movie(&self, _id: MovieId) -> Result<MovieDetails, ApiError> {
            Err(ApiError::HttpStatus(404))
        }
        async fn recommend(&self, _s: Option<MovieId>, _l: usize) -> Result<Vec<Movie>, ApiError> {
            Err(ApiError::HttpStatus(500))
        }
        async fn trending(&self, _l: usize) -> Result<Vec<Movie>, ApiError> {
            Ok(vec![Movie::new(1, "Heat")])
        }
        async fn genres(&self) -> Result<Vec<String>, ApiError> {
            Err(ApiError::HttpStatus(500))
        }
        async fn movies_by_genre(&self, _g: &str, _l: usize) -> Result<Vec<Movie>, ApiError> {
            Err(ApiError::HttpStatus(500))
        }
    }

    #[async_trait]
    impl UserGateway for FlakyGateway {
        async fn favorites(&self) -> Result<Vec<Movie>, ApiError> {
            Ok(Vec::new())
        }
        async fn add_favorite(&self, _id: MovieId) -> Result<(), ApiError> {
            Err(ApiError::HttpStatus(500))
        }
        async fn remove_favorite(&self, _id: MovieId) -> Result<(), ApiError> {
            Ok(())
        }
        async fn history(&self) -> Result<Vec<Movie>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn app() -> (App, mpsc::Receiver<DashboardEvent>) {
        let gateway = Arc::new(FlakyGateway);
        let (tx, rx) = mpsc::channel(16);
        let store = DashboardStore::new(gateway.clone(), gateway, tx, StoreOptions::default());
        (App::new(store), rx)
    }

    async fn pump(app: &mut App, rx: &mut mpsc::Receiver<DashboardEvent>) {
        while !app.store.is_settled() {
            let event = rx.recv().await.unwrap();
            handle_dashboard_event(app, event);
        }
    }

    #[tokio::test]
    async fn test_partial_load_reported_in_status() {
        let (mut app, mut rx) = app();
        app.store.initialize(Some(UserIdentity::default())).unwrap();
        pump(&mut app, &mut rx).await;

        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Could not load recommended, genres");
        assert!(app.store.last_failure().is_none());
    }

    #[tokio::test]
    async fn test_failed_favorite_reported() {
        let (mut app, mut rx) = app();
        app.store.initialize(Some(UserIdentity::default())).unwrap();
        pump(&mut app, &mut rx).await;

        app.toggle_selected_favorite();
        pump(&mut app, &mut rx).await;

        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.starts_with("Favorite not saved"));
        assert!(!app.store.view().is_favorite(1));
    }

    #[tokio::test]
    async fn test_uncached_favorite_reported_with_title_after_resync() {
        let (mut app, mut rx) = app();
        app.store.initialize(Some(UserIdentity::default())).unwrap();
        pump(&mut app, &mut rx).await;
        app.status_message = None;

        handle_dashboard_event(
            &mut app,
            DashboardEvent::FavoriteWritten {
                session: 1,
                movie_id: 99,
                make_favorite: true,
                result: Ok(()),
            },
        );
        assert!(app.status_message.is_none());
        assert_eq!(app.pending_favorite, Some(99));

        handle_dashboard_event(
            &mut app,
            DashboardEvent::FavoritesResynced {
                session: 1,
                result: Ok(vec![Movie::new(99, "Spirited Away")]),
            },
        );
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Added Spirited Away to favorites");
        assert_eq!(app.pending_favorite, None);
    }

    #[tokio::test]
    async fn test_failed_details_close_pane() {
        let (mut app, mut rx) = app();
        app.store.initialize(Some(UserIdentity::default())).unwrap();
        pump(&mut app, &mut rx).await;

        app.open_selected_details();
        pump(&mut app, &mut rx).await;
        assert!(app.store.details().is_none());
    }
}
