use crate::api::{ApiError, Movie, MovieDetails, MovieId};

/// Outcome of the five concurrent reads issued when the dashboard opens.
#[derive(Debug)]
pub struct InitialLoad {
    pub trending: Result<Vec<Movie>, ApiError>,
    pub recommended: Result<Vec<Movie>, ApiError>,
    pub favorites: Result<Vec<Movie>, ApiError>,
    pub history: Result<Vec<Movie>, ApiError>,
    pub genres: Result<Vec<String>, ApiError>,
}

/// Events from background gateway tasks.
///
/// Every spawned task sends exactly one event. `session` is the store
/// session the task was spawned under; events from an earlier session are
/// dropped without touching state.
#[derive(Debug)]
pub enum DashboardEvent {
    /// The initial fan-out finished.
    Initialized {
        session: u64,
        load: Box<InitialLoad>,
    },
    /// Search completed.
    ///
    /// Fields:
    /// - `generation`: search generation when the query was submitted
    /// - `query`: the trimmed query that was sent
    /// - `result`: the matching movies, or the gateway error
    SearchCompleted {
        session: u64,
        generation: u64,
        query: String,
        result: Result<Vec<Movie>, ApiError>,
    },
    /// Movies for `genre` arrived. Discarded if another genre is selected by now.
    GenreLoaded {
        session: u64,
        genre: String,
        result: Result<Vec<Movie>, ApiError>,
    },
    /// The add/remove favorite call returned.
    ///
    /// Fields:
    /// - `movie_id`: the toggled movie
    /// - `make_favorite`: `true` for add, `false` for remove
    /// - `result`: server acknowledgement or the error that aborts reconciliation
    FavoriteWritten {
        session: u64,
        movie_id: MovieId,
        make_favorite: bool,
        result: Result<(), ApiError>,
    },
    /// Full favorites list re-fetched after adding a movie that was not cached.
    FavoritesResynced {
        session: u64,
        result: Result<Vec<Movie>, ApiError>,
    },
    RecommendationsRefreshed {
        session: u64,
        result: Result<Vec<Movie>, ApiError>,
    },
    /// Single-movie lookup for the detail pane.
    DetailsLoaded {
        session: u64,
        movie_id: MovieId,
        result: Result<MovieDetails, ApiError>,
    },
    HistoryRefreshed {
        session: u64,
        result: Result<Vec<Movie>, ApiError>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: name of the task that panicked (e.g. "search", "favorite_write")
    /// - `error`: the panic message extracted from the payload
    TaskPanicked {
        session: u64,
        task: &'static str,
        error: String,
    },
}

impl DashboardEvent {
    pub fn session(&self) -> u64 {
        match self {
            DashboardEvent::Initialized { session, .. }
            | DashboardEvent::SearchCompleted { session, .. }
            | DashboardEvent::GenreLoaded { session, .. }
            | DashboardEvent::FavoriteWritten { session, .. }
            | DashboardEvent::FavoritesResynced { session, .. }
            | DashboardEvent::RecommendationsRefreshed { session, .. }
            | DashboardEvent::DetailsLoaded { session, .. }
            | DashboardEvent::HistoryRefreshed { session, .. }
            | DashboardEvent::TaskPanicked { session, .. } => *session,
        }
    }
}
