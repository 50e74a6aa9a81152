use crate::api::{Movie, MovieId};
use std::collections::HashSet;

// ============================================================================
// Tabs
// ============================================================================

/// Which collection the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Trending,
    Recommended,
    Favorites,
    History,
    Search,
    Genre,
}

impl Tab {
    /// Tabs that are always reachable from the tab bar. `Search` and `Genre`
    /// are entered by submitting a query or picking a genre.
    pub const BROWSABLE: [Tab; 4] = [Tab::Trending, Tab::Recommended, Tab::Favorites, Tab::History];

    /// Stable identifier used by `select_tab_id`.
    pub fn id(self) -> &'static str {
        match self {
            Tab::Trending => "trending",
            Tab::Recommended => "recommended",
            Tab::Favorites => "favorites",
            Tab::History => "history",
            Tab::Search => "search",
            Tab::Genre => "genre",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Trending => "Trending",
            Tab::Recommended => "For You",
            Tab::Favorites => "Favorites",
            Tab::History => "History",
            Tab::Search => "Search",
            Tab::Genre => "Genre",
        }
    }

    /// Parses a tab id. Anything unrecognized lands on `Trending`.
    pub fn from_id(id: &str) -> Tab {
        match id.trim().to_ascii_lowercase().as_str() {
            "recommended" => Tab::Recommended,
            "favorites" => Tab::Favorites,
            "history" => Tab::History,
            "search" => Tab::Search,
            "genre" => Tab::Genre,
            _ => Tab::Trending,
        }
    }
}

// ============================================================================
// Movie Collections
// ============================================================================

/// Ordered list of movies, unique by `movie_id`.
///
/// The first occurrence of an id wins; later duplicates are dropped on
/// insert. Collections are not disjoint from each other: the same movie
/// can be trending, recommended and a favorite at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieCollection {
    movies: Vec<Movie>,
}

impl MovieCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection, as every successful fetch does.
    pub fn replace(&mut self, movies: Vec<Movie>) {
        *self = movies.into_iter().collect();
    }

    /// Appends `movie` unless a movie with the same id is already present.
    ///
    /// Returns `true` when the movie was added.
    pub fn push(&mut self, movie: Movie) -> bool {
        if self.contains(movie.movie_id) {
            return false;
        }
        self.movies.push(movie);
        true
    }

    /// Removes the movie with `movie_id`, if present.
    pub fn remove(&mut self, movie_id: MovieId) -> Option<Movie> {
        let index = self.movies.iter().position(|m| m.movie_id == movie_id)?;
        Some(self.movies.remove(index))
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.find(movie_id).is_some()
    }

    pub fn find(&self, movie_id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.movie_id == movie_id)
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Movie> {
        self.movies.iter()
    }

    pub fn as_slice(&self) -> &[Movie] {
        &self.movies
    }

    pub fn ids(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.movies.iter().map(|m| m.movie_id)
    }
}

impl FromIterator<Movie> for MovieCollection {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let movies = iter
            .into_iter()
            .filter(|m| seen.insert(m.movie_id))
            .collect();
        Self { movies }
    }
}

impl<'a> IntoIterator for &'a MovieCollection {
    type Item = &'a Movie;
    type IntoIter = std::slice::Iter<'a, Movie>;

    fn into_iter(self) -> Self::IntoIter {
        self.movies.iter()
    }
}

// ============================================================================
// View State
// ============================================================================

/// Everything the dashboard renders.
///
/// Only [`DashboardStore`](super::DashboardStore) mutates a `ViewState`;
/// everyone else sees it through `&ViewState`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub trending: MovieCollection,
    pub recommended: MovieCollection,
    /// Client-side belief about the user's favorites. Stale between a
    /// favorite write and its reconciliation.
    pub favorites: MovieCollection,
    pub recently_watched: MovieCollection,
    pub search_results: MovieCollection,
    pub genre_movies: MovieCollection,
    /// Genre vocabulary of the catalog, sorted and unique.
    pub genres: Vec<String>,
    /// Never `Some("")`.
    pub selected_genre: Option<String>,
    pub active_tab: Tab,
    pub loading: bool,
    pub search_query: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Fresh state for a newly entered dashboard: everything empty, loading.
    pub fn new() -> Self {
        Self {
            trending: MovieCollection::new(),
            recommended: MovieCollection::new(),
            favorites: MovieCollection::new(),
            recently_watched: MovieCollection::new(),
            search_results: MovieCollection::new(),
            genre_movies: MovieCollection::new(),
            genres: Vec::new(),
            selected_genre: None,
            active_tab: Tab::Trending,
            loading: true,
            search_query: String::new(),
        }
    }

    /// Favorite membership by id, which is what every favorite marker shows.
    pub fn is_favorite(&self, movie_id: MovieId) -> bool {
        self.favorites.contains(movie_id)
    }

    pub fn set_genres(&mut self, mut genres: Vec<String>) {
        genres.retain(|g| !g.trim().is_empty());
        genres.sort();
        genres.dedup();
        self.genres = genres;
    }

    /// Clears the selected genre. The Genre tab cannot stay active without
    /// a genre, so it falls back to Trending.
    pub fn clear_selected_genre(&mut self) {
        self.selected_genre = None;
        if self.active_tab == Tab::Genre {
            self.active_tab = Tab::Trending;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn movie(id: MovieId) -> Movie {
        Movie::new(id, format!("Movie {}", id))
    }

    #[test]
    fn test_tab_ids_round_trip() {
        for tab in [
            Tab::Trending,
            Tab::Recommended,
            Tab::Favorites,
            Tab::History,
            Tab::Search,
            Tab::Genre,
        ] {
            assert_eq!(Tab::from_id(tab.id()), tab);
        }
    }

    #[test]
    fn test_unknown_tab_id_is_trending() {
        assert_eq!(Tab::from_id("watchlist"), Tab::Trending);
        assert_eq!(Tab::from_id(""), Tab::Trending);
        assert_eq!(Tab::from_id(" Favorites "), Tab::Favorites);
    }

    #[test]
    fn test_collection_push_ignores_duplicates() {
        let mut collection = MovieCollection::new();
        assert!(collection.push(Movie::new(1, "First")));
        assert!(!collection.push(Movie::new(1, "Second")));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.find(1).map(|m| m.title.as_str()), Some("First"));
    }

    #[test]
    fn test_collection_remove_absent_is_noop() {
        let mut collection: MovieCollection = vec![movie(1), movie(2)].into_iter().collect();
        assert!(collection.remove(3).is_none());
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec![1, 2]);
        assert!(collection.remove(1).is_some());
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_collection_replace_is_wholesale() {
        let mut collection: MovieCollection = vec![movie(1), movie(2)].into_iter().collect();
        collection.replace(vec![movie(7)]);
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_new_view_is_loading_and_empty() {
        let view = ViewState::new();
        assert!(view.loading);
        assert!(view.trending.is_empty());
        assert_eq!(view.active_tab, Tab::Trending);
        assert_eq!(view.selected_genre, None);
    }

    #[test]
    fn test_is_favorite_compares_ids() {
        let mut view = ViewState::new();
        view.favorites.push(Movie::new(42, "Arrival"));
        // A different record with the same id still counts.
        assert!(view.is_favorite(Movie::new(42, "Arrival (2016)").movie_id));
        assert!(!view.is_favorite(43));
    }

    #[test]
    fn test_set_genres_sorts_and_dedups() {
        let mut view = ViewState::new();
        view.set_genres(vec![
            "Drama".to_string(),
            "Comedy".to_string(),
            "Drama".to_string(),
            " ".to_string(),
        ]);
        assert_eq!(view.genres, vec!["Comedy", "Drama"]);
    }

    #[test]
    fn test_clear_genre_leaves_genre_tab() {
        let mut view = ViewState::new();
        view.selected_genre = Some("Comedy".to_string());
        view.active_tab = Tab::Genre;
        view.clear_selected_genre();
        assert_eq!(view.active_tab, Tab::Trending);

        view.active_tab = Tab::Favorites;
        view.clear_selected_genre();
        assert_eq!(view.active_tab, Tab::Favorites);
    }

    proptest! {
        #[test]
        fn collection_ids_are_unique(ids in proptest::collection::vec(0i64..20, 0..40)) {
            let collection: MovieCollection = ids.iter().map(|&id| movie(id)).collect();
            let mut seen = HashSet::new();
            prop_assert!(collection.ids().all(|id| seen.insert(id)));

            // First occurrence order is preserved.
            let mut expected = Vec::new();
            for id in &ids {
                if !expected.contains(id) {
                    expected.push(*id);
                }
            }
            prop_assert_eq!(collection.ids().collect::<Vec<_>>(), expected);
        }
    }
}
