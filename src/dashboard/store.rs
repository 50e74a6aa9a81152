use super::error::{DashboardError, Failure, FailureKind, FetchTarget};
use super::events::{DashboardEvent, InitialLoad};
use super::reconcile::{self, FollowUp};
use super::selector;
use super::state::{MovieCollection, Tab, ViewState};
use crate::api::{ApiError, CatalogGateway, Movie, MovieDetails, MovieId, UserGateway, DEFAULT_LIMIT};
use crate::session::UserIdentity;
use crate::util::catch_task_panic;
use lru::LruCache;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Default number of movie lookups kept for the detail pane.
pub const DEFAULT_DETAIL_CACHE_SIZE: usize = 32;

/// Tunables for [`DashboardStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// `limit` sent with every list request.
    pub page_limit: usize,
    pub detail_cache_size: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_LIMIT,
            detail_cache_size: DEFAULT_DETAIL_CACHE_SIZE,
        }
    }
}

/// Detail pane contents.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPane {
    Loading { movie_id: MovieId },
    Ready(MovieDetails),
    Failed { movie_id: MovieId },
}

impl DetailPane {
    pub fn movie_id(&self) -> MovieId {
        match self {
            DetailPane::Loading { movie_id } | DetailPane::Failed { movie_id } => *movie_id,
            DetailPane::Ready(details) => details.movie.movie_id,
        }
    }
}

/// Owner of the dashboard's [`ViewState`].
///
/// Operations mutate what they can synchronously and spawn a tokio task for
/// each gateway call. Each task reports back with exactly one
/// [`DashboardEvent`] on the channel given to [`DashboardStore::new`]; the
/// owner of the receiving end feeds those events to [`DashboardStore::apply`].
/// All mutation therefore happens wherever the store lives, never inside a
/// task.
pub struct DashboardStore {
    catalog: Arc<dyn CatalogGateway>,
    user: Arc<dyn UserGateway>,
    event_tx: mpsc::Sender<DashboardEvent>,
    options: StoreOptions,
    view: ViewState,
    identity: Option<UserIdentity>,
    /// Bumped by `initialize`; events from earlier sessions are ignored.
    session: u64,
    disposed: bool,
    /// Spawned tasks of the current session whose event has not been applied.
    in_flight: usize,
    search_generation: u64,
    details: Option<DetailPane>,
    detail_cache: LruCache<MovieId, MovieDetails>,
    last_failure: Option<Failure>,
}

impl DashboardStore {
    pub fn new(
        catalog: Arc<dyn CatalogGateway>,
        user: Arc<dyn UserGateway>,
        event_tx: mpsc::Sender<DashboardEvent>,
        options: StoreOptions,
    ) -> Self {
        let cache_size = NonZeroUsize::new(options.detail_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            catalog,
            user,
            event_tx,
            options,
            view: ViewState::new(),
            identity: None,
            session: 0,
            disposed: false,
            in_flight: 0,
            search_generation: 0,
            details: None,
            detail_cache: LruCache::new(cache_size),
            last_failure: None,
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Collection for the active tab.
    pub fn visible(&self) -> &MovieCollection {
        selector::project(&self.view)
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn details(&self) -> Option<&DetailPane> {
        self.details.as_ref()
    }

    pub fn last_failure(&self) -> Option<&Failure> {
        self.last_failure.as_ref()
    }

    pub fn clear_last_failure(&mut self) {
        self.last_failure = None;
    }

    /// True when no spawned gateway task is outstanding.
    pub fn is_settled(&self) -> bool {
        self.in_flight == 0
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Enters the dashboard for `user`, starting a fresh session.
    ///
    /// Issues the five initial reads as one task; `loading` stays `true` until
    /// its event is applied.
    pub fn initialize(&mut self, user: Option<UserIdentity>) -> Result<(), DashboardError> {
        if self.disposed {
            return Err(DashboardError::Disposed);
        }
        let Some(user) = user else {
            tracing::warn!(kind = %FailureKind::Unauthenticated, "Dashboard entered without a signed-in user");
            self.last_failure = Some(Failure {
                kind: FailureKind::Unauthenticated,
                targets: Vec::new(),
                message: String::new(),
                auth_rejected: false,
            });
            return Err(DashboardError::Unauthenticated);
        };

        tracing::info!(user = %user.email, "Initializing dashboard");
        self.session += 1;
        self.view = ViewState::new();
        self.identity = Some(user);
        self.in_flight = 0;
        self.search_generation = 0;
        self.details = None;
        self.detail_cache.clear();
        self.last_failure = None;

        let catalog = Arc::clone(&self.catalog);
        let user_gateway = Arc::clone(&self.user);
        let limit = self.options.page_limit;
        let session = self.session;
        self.spawn("initialize", async move {
            let (trending, recommended, favorites, history, genres) = tokio::join!(
                catalog.trending(limit),
                catalog.recommend(None, limit),
                user_gateway.favorites(),
                user_gateway.history(),
                catalog.genres(),
            );
            DashboardEvent::Initialized {
                session,
                load: Box::new(InitialLoad {
                    trending,
                    recommended,
                    favorites,
                    history,
                    genres,
                }),
            }
        });
        Ok(())
    }

    /// Leaves the dashboard. Results still in flight are ignored when they land.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        tracing::debug!(session = self.session, in_flight = self.in_flight, "Disposing dashboard");
        self.disposed = true;
        self.view = ViewState::new();
        self.identity = None;
        self.details = None;
        self.detail_cache.clear();
        self.in_flight = 0;
    }

    // ========================================================================
    // User actions
    // ========================================================================

    /// Submits a search. Blank queries are ignored.
    pub fn search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.disposed {
            return;
        }

        self.view.search_query = query.to_string();
        self.search_generation += 1;

        let generation = self.search_generation;
        let session = self.session;
        let catalog = Arc::clone(&self.catalog);
        let limit = self.options.page_limit;
        let query = query.to_string();
        tracing::debug!(query = %query, generation, "Searching catalog");
        self.spawn("search", async move {
            let result = catalog.search(&query, limit).await;
            DashboardEvent::SearchCompleted {
                session,
                generation,
                query,
                result,
            }
        });
    }

    /// Selects a genre and loads its movies. An empty genre clears the selection.
    pub fn select_genre(&mut self, genre: &str) {
        if self.disposed {
            return;
        }
        let genre = genre.trim();
        if genre.is_empty() {
            self.view.clear_selected_genre();
            return;
        }

        self.view.selected_genre = Some(genre.to_string());
        self.view.active_tab = Tab::Genre;

        let session = self.session;
        let catalog = Arc::clone(&self.catalog);
        let limit = self.options.page_limit;
        let genre = genre.to_string();
        tracing::debug!(genre = %genre, "Loading genre");
        self.spawn("genre", async move {
            let result = catalog.movies_by_genre(&genre, limit).await;
            DashboardEvent::GenreLoaded {
                session,
                genre,
                result,
            }
        });
    }

    /// Switches tabs. Tab clicks and genre selection reset each other, so the
    /// selected genre is cleared. The Genre tab cannot be entered this way:
    /// without a genre it falls back to Trending.
    pub fn select_tab(&mut self, tab: Tab) {
        if self.disposed {
            return;
        }
        self.view.active_tab = tab;
        self.view.clear_selected_genre();
    }

    pub fn select_tab_id(&mut self, id: &str) {
        self.select_tab(Tab::from_id(id));
    }

    /// Adds (`make_favorite = true`) or removes a favorite.
    ///
    /// Local favorites only change once the server has accepted the write.
    pub fn toggle_favorite(&mut self, movie_id: MovieId, make_favorite: bool) {
        if self.disposed {
            return;
        }
        let session = self.session;
        let user = Arc::clone(&self.user);
        tracing::debug!(movie_id, make_favorite, "Writing favorite");
        self.spawn("favorite_write", async move {
            let result = if make_favorite {
                user.add_favorite(movie_id).await
            } else {
                user.remove_favorite(movie_id).await
            };
            DashboardEvent::FavoriteWritten {
                session,
                movie_id,
                make_favorite,
                result,
            }
        });
    }

    /// Re-fetches recommendations (seeded by favorites server-side). A failure
    /// keeps the previous list.
    pub fn refresh_recommendations(&mut self) {
        if self.disposed {
            return;
        }
        let session = self.session;
        let catalog = Arc::clone(&self.catalog);
        let limit = self.options.page_limit;
        self.spawn("recommend", async move {
            let result = catalog.recommend(None, limit).await;
            DashboardEvent::RecommendationsRefreshed { session, result }
        });
    }

    /// Shows the detail pane for `movie_id`.
    ///
    /// A cached copy is shown at once, but the lookup is always sent: the
    /// server records every lookup as a view, and history follows it.
    pub fn open_details(&mut self, movie_id: MovieId) {
        if self.disposed {
            return;
        }
        self.details = match self.detail_cache.get(&movie_id) {
            Some(details) => {
                tracing::debug!(movie_id, "Showing cached details while refreshing");
                Some(DetailPane::Ready(details.clone()))
            }
            None => Some(DetailPane::Loading { movie_id }),
        };
        let session = self.session;
        let catalog = Arc::clone(&self.catalog);
        self.spawn("details", async move {
            let result = catalog.movie(movie_id).await;
            DashboardEvent::DetailsLoaded {
                session,
                movie_id,
                result,
            }
        });
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    // ========================================================================
    // Event application
    // ========================================================================

    /// Applies the result of a background task.
    pub fn apply(&mut self, event: DashboardEvent) {
        if self.disposed || event.session() != self.session {
            tracing::debug!(
                event_session = event.session(),
                session = self.session,
                disposed = self.disposed,
                "Ignoring event from a closed session"
            );
            return;
        }
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            DashboardEvent::Initialized { load, .. } => self.apply_initial_load(*load),
            DashboardEvent::SearchCompleted {
                generation,
                query,
                result,
                ..
            } => {
                if generation != self.search_generation {
                    tracing::debug!(
                        generation,
                        current = self.search_generation,
                        "Discarding stale search results"
                    );
                    return;
                }
                match result {
                    Ok(movies) => {
                        tracing::info!(query = %query, count = movies.len(), "Search completed");
                        self.view.search_results.replace(movies);
                        self.view.active_tab = Tab::Search;
                    }
                    Err(e) => self.record_fetch_failure(FetchTarget::Search, &e),
                }
            }
            DashboardEvent::GenreLoaded { genre, result, .. } => {
                if self.view.selected_genre.as_deref() != Some(genre.as_str()) {
                    tracing::debug!(genre = %genre, "Discarding movies for deselected genre");
                    return;
                }
                match result {
                    Ok(movies) => {
                        tracing::debug!(genre = %genre, count = movies.len(), "Genre loaded");
                        self.view.genre_movies.replace(movies);
                    }
                    Err(e) => self.record_fetch_failure(FetchTarget::GenreMovies, &e),
                }
            }
            DashboardEvent::FavoriteWritten {
                movie_id,
                make_favorite,
                result,
                ..
            } => self.apply_favorite_write(movie_id, make_favorite, result),
            DashboardEvent::FavoritesResynced { result, .. } => {
                match result {
                    Ok(movies) => {
                        tracing::debug!(count = movies.len(), "Favorites re-fetched");
                        self.view.favorites.replace(movies);
                    }
                    Err(e) => self.record_fetch_failure(FetchTarget::Favorites, &e),
                }
                // Recommendations follow favorites whether or not the re-fetch worked.
                self.refresh_recommendations();
            }
            DashboardEvent::RecommendationsRefreshed { result, .. } => match result {
                Ok(movies) => {
                    tracing::debug!(count = movies.len(), "Recommendations refreshed");
                    self.view.recommended.replace(movies);
                }
                Err(e) => self.record_fetch_failure(FetchTarget::Recommended, &e),
            },
            DashboardEvent::DetailsLoaded {
                movie_id, result, ..
            } => self.apply_details(movie_id, result),
            DashboardEvent::HistoryRefreshed { result, .. } => match result {
                Ok(movies) => self.view.recently_watched.replace(movies),
                Err(e) => self.record_fetch_failure(FetchTarget::History, &e),
            },
            DashboardEvent::TaskPanicked { task, error, .. } => {
                tracing::error!(task, error = %error, "Dashboard task panicked");
                if task == "initialize" {
                    self.view.loading = false;
                }
                self.last_failure = Some(Failure {
                    kind: FailureKind::TransientFetchFailure,
                    targets: Vec::new(),
                    message: format!("internal error in {}", task),
                    auth_rejected: false,
                });
            }
        }
    }

    /// Drains `event_rx` until every outstanding task has reported back.
    ///
    /// Returns immediately when already settled. The terminal UI applies
    /// events from its own loop instead.
    pub async fn settle(&mut self, event_rx: &mut mpsc::Receiver<DashboardEvent>) {
        while !self.is_settled() && !self.disposed {
            match event_rx.recv().await {
                Some(event) => self.apply(event),
                None => break,
            }
        }
    }

    fn apply_initial_load(&mut self, load: InitialLoad) {
        let mut failed = Vec::new();
        let mut auth_rejected = false;

        let collections = [
            (FetchTarget::Trending, load.trending),
            (FetchTarget::Recommended, load.recommended),
            (FetchTarget::Favorites, load.favorites),
            (FetchTarget::History, load.history),
        ];
        for (target, result) in collections {
            match result {
                Ok(movies) => self.initial_collection(target).replace(movies),
                Err(e) => {
                    log_fetch_failure(target, &e);
                    auth_rejected |= e.is_unauthorized();
                    failed.push(target);
                }
            }
        }
        match load.genres {
            Ok(genres) => self.view.set_genres(genres),
            Err(e) => {
                log_fetch_failure(FetchTarget::Genres, &e);
                auth_rejected |= e.is_unauthorized();
                failed.push(FetchTarget::Genres);
            }
        }

        self.view.loading = false;

        if failed.is_empty() {
            tracing::info!(
                trending = self.view.trending.len(),
                recommended = self.view.recommended.len(),
                favorites = self.view.favorites.len(),
                history = self.view.recently_watched.len(),
                genres = self.view.genres.len(),
                "Dashboard loaded"
            );
        } else {
            let names: Vec<&str> = failed.iter().map(|t| t.as_str()).collect();
            tracing::warn!(
                kind = %FailureKind::PartialInitializationFailure,
                failed = ?names,
                "Dashboard loaded with missing sections"
            );
            self.last_failure = Some(Failure {
                kind: FailureKind::PartialInitializationFailure,
                targets: failed,
                message: String::new(),
                auth_rejected,
            });
        }
    }

    fn initial_collection(&mut self, target: FetchTarget) -> &mut MovieCollection {
        match target {
            FetchTarget::Recommended => &mut self.view.recommended,
            FetchTarget::Favorites => &mut self.view.favorites,
            FetchTarget::History => &mut self.view.recently_watched,
            _ => &mut self.view.trending,
        }
    }

    fn apply_favorite_write(
        &mut self,
        movie_id: MovieId,
        make_favorite: bool,
        result: Result<(), ApiError>,
    ) {
        if let Err(e) = result {
            tracing::warn!(
                kind = %FailureKind::ReconciliationAbort,
                movie_id,
                make_favorite,
                error = %e,
                "Favorite write failed, nothing changed"
            );
            self.last_failure = Some(Failure {
                kind: FailureKind::ReconciliationAbort,
                targets: vec![FetchTarget::FavoriteWrite],
                message: e.to_string(),
                auth_rejected: e.is_unauthorized(),
            });
            return;
        }

        tracing::info!(movie_id, make_favorite, "Favorite saved");
        match reconcile::commit_write(&mut self.view, movie_id, make_favorite) {
            FollowUp::RefreshRecommendations => self.refresh_recommendations(),
            FollowUp::ResyncFavorites => {
                tracing::debug!(movie_id, "Movie not cached, re-fetching favorites");
                let session = self.session;
                let user = Arc::clone(&self.user);
                self.spawn("favorites", async move {
                    let result = user.favorites().await;
                    DashboardEvent::FavoritesResynced { session, result }
                });
            }
        }
    }

    fn apply_details(&mut self, movie_id: MovieId, result: Result<MovieDetails, ApiError>) {
        let showing = self.details.as_ref().map(DetailPane::movie_id) == Some(movie_id);
        match result {
            Ok(details) => {
                self.detail_cache.put(movie_id, details.clone());
                if showing {
                    self.details = Some(DetailPane::Ready(details));
                }
                // The lookup was recorded as a view server-side.
                self.refresh_history();
            }
            Err(e) => {
                self.record_fetch_failure(FetchTarget::MovieDetails, &e);
                // A cached copy already on screen stays up.
                if matches!(self.details, Some(DetailPane::Loading { movie_id: id }) if id == movie_id) {
                    self.details = Some(DetailPane::Failed { movie_id });
                }
            }
        }
    }

    fn refresh_history(&mut self) {
        let session = self.session;
        let user = Arc::clone(&self.user);
        self.spawn("history", async move {
            let result = user.history().await;
            DashboardEvent::HistoryRefreshed { session, result }
        });
    }

    fn record_fetch_failure(&mut self, target: FetchTarget, error: &ApiError) {
        log_fetch_failure(target, error);
        self.last_failure = Some(Failure {
            kind: FailureKind::TransientFetchFailure,
            targets: vec![target],
            message: error.to_string(),
            auth_rejected: error.is_unauthorized(),
        });
    }

    /// Runs `task` on the runtime and forwards its event. A panic is reported
    /// as `TaskPanicked` so the in-flight count still drops.
    fn spawn<F>(&mut self, task: &'static str, future: F)
    where
        F: Future<Output = DashboardEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let session = self.session;
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match catch_task_panic(future).await {
                Ok(event) => event,
                Err(error) => DashboardEvent::TaskPanicked {
                    session,
                    task,
                    error,
                },
            };
            // Receiver gone means the dashboard was torn down.
            let _ = tx.send(event).await;
        });
    }
}

fn log_fetch_failure(target: FetchTarget, error: &ApiError) {
    tracing::warn!(
        kind = %FailureKind::TransientFetchFailure,
        target = %target,
        status = ?error.status(),
        error = %error,
        "Fetch failed"
    );
}

impl std::fmt::Debug for DashboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardStore")
            .field("session", &self.session)
            .field("disposed", &self.disposed)
            .field("in_flight", &self.in_flight)
            .field("active_tab", &self.view.active_tab)
            .finish_non_exhaustive()
    }
}

/// Builds the YouTube search URL used by the "open trailer" action.
pub fn trailer_search_url(movie: &Movie) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("search_query", &format!("{} trailer", movie.title))
        .finish();
    format!("https://www.youtube.com/results?{}", query)
}
