//! Remote gateways of the Panchax service.
//!
//! The dashboard talks to two external boundaries, both reached only through
//! the REST contract under `/api`:
//!
//! - [`CatalogGateway`] - search, trending, genres, recommendations and
//!   single-movie lookup. Stateless.
//! - [`UserGateway`] - favorites and watch history of the signed-in user.
//!
//! [`ApiClient`] implements both over HTTP. The traits are the seam the
//! dashboard store is written against, so the store never sees `reqwest`.

mod client;
mod error;
mod types;

pub use client::{ApiClient, DEFAULT_LIMIT};
pub use error::ApiError;
pub use types::{HealthStatus, Movie, MovieDetails, MovieId};

/// Catalog side of the service.
#[async_trait::async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Title search (`GET /search?q=&limit=`).
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Movie>, ApiError>;

    /// Single movie with its similar titles (`GET /movie/{id}`).
    ///
    /// The server records the lookup in the caller's watch history.
    async fn movie(&self, movie_id: MovieId) -> Result<MovieDetails, ApiError>;

    /// Recommendations, optionally seeded by a movie (`GET /recommend`).
    ///
    /// Without a seed the service answers from the caller's favorites.
    async fn recommend(&self, seed: Option<MovieId>, limit: usize)
        -> Result<Vec<Movie>, ApiError>;

    /// Highest rated titles (`GET /trending?limit=`).
    async fn trending(&self, limit: usize) -> Result<Vec<Movie>, ApiError>;

    /// Genre vocabulary of the catalog (`GET /genres`).
    async fn genres(&self) -> Result<Vec<String>, ApiError>;

    /// Titles in one genre (`GET /movies/genre?genre=&limit=`).
    async fn movies_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<Movie>, ApiError>;
}

/// User side of the service, scoped to the bearer token.
#[async_trait::async_trait]
pub trait UserGateway: Send + Sync {
    /// Full favorites list (`GET /user/favorites`).
    async fn favorites(&self) -> Result<Vec<Movie>, ApiError>;

    /// `POST /user/favorites` with `{ movie_id }`.
    async fn add_favorite(&self, movie_id: MovieId) -> Result<(), ApiError>;

    /// `DELETE /user/favorites/{movie_id}`.
    async fn remove_favorite(&self, movie_id: MovieId) -> Result<(), ApiError>;

    /// Recently watched titles (`GET /user/history`).
    async fn history(&self) -> Result<Vec<Movie>, ApiError>;
}
