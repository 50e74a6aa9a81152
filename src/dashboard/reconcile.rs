//! Favorite reconciliation.
//!
//! A favorite toggle runs as a strict sequence:
//!
//! 1. write to the server (add or remove); a failed write aborts with no
//!    local change,
//! 2. bring `favorites` in line with the write: push the movie if it is
//!    cached in one of the lookup collections, otherwise re-fetch the whole
//!    list; removal just filters,
//! 3. refresh `recommended`, since recommendations are seeded by favorites.
//!
//! This module holds the state transitions. The store drives the gateway
//! calls between them.

use super::state::ViewState;
use crate::api::{Movie, MovieId};

/// What has to happen after a successful favorite write has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// `favorites` is settled; refresh recommendations next.
    RefreshRecommendations,
    /// The movie was not cached; re-fetch favorites, then refresh recommendations.
    ResyncFavorites,
}

/// Finds a cached copy of `movie_id`, searching `trending`, `recommended`,
/// `search_results` and `genre_movies` in that order.
///
/// Watch history is deliberately not searched: a movie only seen there is
/// sourced by re-fetching favorites.
pub fn locate_movie(view: &ViewState, movie_id: MovieId) -> Option<&Movie> {
    [
        &view.trending,
        &view.recommended,
        &view.search_results,
        &view.genre_movies,
    ]
    .into_iter()
    .find_map(|collection| collection.find(movie_id))
}

/// Applies a write the server has accepted to the local favorites.
pub fn commit_write(view: &mut ViewState, movie_id: MovieId, make_favorite: bool) -> FollowUp {
    if !make_favorite {
        view.favorites.remove(movie_id);
        return FollowUp::RefreshRecommendations;
    }

    match locate_movie(view, movie_id).cloned() {
        Some(movie) => {
            view.favorites.push(movie);
            FollowUp::RefreshRecommendations
        }
        None => FollowUp::ResyncFavorites,
    }
}
