use super::state::{MovieCollection, Tab, ViewState};

/// The collection the active tab shows.
///
/// Pure: the same state always projects to the same collection.
pub fn project(view: &ViewState) -> &MovieCollection {
    match view.active_tab {
        Tab::Trending => &view.trending,
        Tab::Recommended => &view.recommended,
        Tab::Favorites => &view.favorites,
        Tab::History => &view.recently_watched,
        Tab::Search => &view.search_results,
        Tab::Genre => &view.genre_movies,
    }
}

/// Title line for the projected collection, e.g. `Genre: Comedy`.
pub fn heading(view: &ViewState) -> String {
    match (view.active_tab, view.selected_genre.as_deref()) {
        (Tab::Genre, Some(genre)) => format!("Genre: {}", genre),
        (Tab::Search, _) if !view.search_query.is_empty() => {
            format!("Results for \"{}\"", view.search_query)
        }
        (tab, _) => tab.label().to_string(),
    }
}
