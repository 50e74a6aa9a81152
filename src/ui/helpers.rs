//! Helper functions shared across the UI layer.

use crate::app::App;
use panchax::dashboard::trailer_search_url;
use panchax::util::validate_url_for_open;

pub(super) const ERR_NO_MOVIE: &str = "No movie selected";
pub(super) const ERR_NO_IMDB: &str = "No IMDb link for this movie";

/// Opens `url` in the system browser after validating it.
pub(super) fn open_link(app: &mut App, url: &str, label: &str) {
    match validate_url_for_open(url) {
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Refusing to open link");
            app.set_status(e.to_string());
        }
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => app.set_status(format!("Opening {}...", label)),
            Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
        },
    }
}

/// Opens the IMDb page of the focused movie.
pub(super) fn open_imdb(app: &mut App) {
    let Some(movie) = app.focused_movie() else {
        app.set_status(ERR_NO_MOVIE);
        return;
    };
    match movie.imdb_url.clone() {
        Some(url) => {
            let label = format!("IMDb page for {}", movie.title);
            open_link(app, &url, &label);
        }
        None => app.set_status(ERR_NO_IMDB),
    }
}

/// Opens a YouTube trailer search for the focused movie.
pub(super) fn open_trailer(app: &mut App) {
    let Some(movie) = app.focused_movie() else {
        app.set_status(ERR_NO_MOVIE);
        return;
    };
    let url = trailer_search_url(movie);
    let label = format!("trailer search for {}", movie.title);
    open_link(app, &url, &label);
}
