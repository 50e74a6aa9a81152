use std::fmt;
use thiserror::Error;

/// Errors the dashboard returns to its caller.
///
/// Gateway failures never show up here: the store absorbs them and records a
/// [`Failure`] instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// The dashboard was entered without a signed-in user.
    #[error("Not signed in")]
    Unauthenticated,
    /// The store was disposed and accepts no further operations.
    #[error("Dashboard has been closed")]
    Disposed,
}

/// Classification of a failure absorbed by the store. Logged as the `kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Unauthenticated,
    /// A gateway read failed; the affected state kept its previous value.
    TransientFetchFailure,
    /// At least one of the five initial reads failed.
    PartialInitializationFailure,
    /// A favorite write failed; nothing was changed locally.
    ReconciliationAbort,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Unauthenticated => "Unauthenticated",
            FailureKind::TransientFetchFailure => "TransientFetchFailure",
            FailureKind::PartialInitializationFailure => "PartialInitializationFailure",
            FailureKind::ReconciliationAbort => "ReconciliationAbort",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a gateway call was fetching or writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchTarget {
    Trending,
    Recommended,
    Favorites,
    History,
    Genres,
    Search,
    GenreMovies,
    FavoriteWrite,
    MovieDetails,
}

impl FetchTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchTarget::Trending => "trending",
            FetchTarget::Recommended => "recommended",
            FetchTarget::Favorites => "favorites",
            FetchTarget::History => "history",
            FetchTarget::Genres => "genres",
            FetchTarget::Search => "search",
            FetchTarget::GenreMovies => "genre_movies",
            FetchTarget::FavoriteWrite => "favorite_write",
            FetchTarget::MovieDetails => "movie_details",
        }
    }
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Most recent absorbed failure, for the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub targets: Vec<FetchTarget>,
    pub message: String,
    /// The server answered 401/403: the stored token is no longer accepted.
    pub auth_rejected: bool,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = match self.kind {
            FailureKind::PartialInitializationFailure => {
                let names: Vec<&str> = self.targets.iter().map(|t| t.as_str()).collect();
                write!(f, "Could not load {}", names.join(", "))
            }
            FailureKind::ReconciliationAbort => {
                write!(f, "Favorite not saved: {}", self.message)
            }
            FailureKind::Unauthenticated => f.write_str("Not signed in"),
            FailureKind::TransientFetchFailure => match self.targets.first() {
                Some(target) => write!(f, "Failed to load {}: {}", target, self.message),
                None => write!(f, "Request failed: {}", self.message),
            },
        };
        summary?;
        if self.auth_rejected {
            f.write_str(" (session rejected, sign in again)")?;
        }
        Ok(())
    }
}
