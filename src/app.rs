use panchax::api::{Movie, MovieId};
use panchax::dashboard::{DashboardStore, DetailPane, Tab};
use panchax::util::MAX_SEARCH_QUERY_LENGTH;
use std::borrow::Cow;
use std::time::{Duration, Instant};

/// How long a status message stays in the status bar.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Number of frames in the loading spinner animation.
pub const SPINNER_FRAMES: usize = 10;

// ============================================================================
// Input Mode
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keys navigate and act on the movie list.
    Browse,
    /// Keys edit the search box.
    Search,
}

// ============================================================================
// Application State
// ============================================================================

/// Terminal-side state wrapped around the dashboard store.
///
/// The store owns everything fetched from the service; `App` only tracks
/// what the terminal needs on top of it (cursor, input box, overlays).
pub struct App {
    pub store: DashboardStore,

    pub mode: Mode,
    pub search_input: String,
    /// Cursor into the visible collection.
    pub selected: usize,
    pub show_help: bool,
    /// Favorite added before its title was known; reported once favorites
    /// have been re-fetched.
    pub pending_favorite: Option<MovieId>,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub spinner_frame: usize,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(store: DashboardStore) -> Self {
        Self {
            store,
            mode: Mode::Browse,
            search_input: String::new(),
            selected: 0,
            show_help: false,
            pending_favorite: None,
            status_message: None,
            spinner_frame: 0,
            needs_redraw: true,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clears an expired status message. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, at)) = &self.status_message {
            if at.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// True while anything is loading, which drives the spinner.
    pub fn is_busy(&self) -> bool {
        self.store.view().loading
            || !self.store.is_settled()
            || matches!(self.store.details(), Some(DetailPane::Loading { .. }))
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.store.visible().get(self.selected)
    }

    /// Keeps the cursor inside the visible collection after it changed.
    pub fn clamp_selection(&mut self) {
        let len = self.store.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self) {
        let len = self.store.visible().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.store.visible().len().saturating_sub(1);
    }

    // ========================================================================
    // Tabs and Genres
    // ========================================================================

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.store.view().active_tab != tab {
            self.selected = 0;
        }
        self.store.select_tab(tab);
    }

    /// Moves to the next (or previous) browsable tab. From Search or Genre
    /// the cycle restarts at Trending.
    pub fn cycle_tab(&mut self, forward: bool) {
        let tabs = Tab::BROWSABLE;
        let current = self.store.view().active_tab;
        let next = match tabs.iter().position(|t| *t == current) {
            Some(i) if forward => tabs[(i + 1) % tabs.len()],
            Some(i) => tabs[(i + tabs.len() - 1) % tabs.len()],
            None => Tab::Trending,
        };
        self.switch_tab(next);
    }

    /// Steps through the genre vocabulary. Stepping past either end clears
    /// the genre.
    pub fn cycle_genre(&mut self, forward: bool) {
        let view = self.store.view();
        if view.genres.is_empty() {
            self.set_status("No genres loaded");
            return;
        }
        let count = view.genres.len();
        let current = view
            .selected_genre
            .as_ref()
            .and_then(|g| view.genres.iter().position(|x| x == g));

        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(count - 1),
            (Some(i), true) if i + 1 < count => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            _ => None,
        };

        self.selected = 0;
        match next {
            Some(i) => {
                let genre = view.genres[i].clone();
                self.store.select_genre(&genre);
            }
            None => self.store.select_genre(""),
        }
    }

    pub fn clear_genre(&mut self) {
        if self.store.view().selected_genre.is_some() {
            self.selected = 0;
            self.store.select_genre("");
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub fn enter_search(&mut self) {
        self.mode = Mode::Search;
        self.search_input = self.store.view().search_query.clone();
    }

    pub fn cancel_search(&mut self) {
        self.mode = Mode::Browse;
        self.search_input.clear();
    }

    pub fn push_search_char(&mut self, c: char) {
        if self.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            self.set_status(format!(
                "Search query too long (max {} chars)",
                MAX_SEARCH_QUERY_LENGTH
            ));
            return;
        }
        self.search_input.push(c);
    }

    pub fn submit_search(&mut self) {
        self.mode = Mode::Browse;
        let query = std::mem::take(&mut self.search_input);
        if query.trim().is_empty() {
            return;
        }
        self.selected = 0;
        self.set_status(format!("Searching for \"{}\"...", query.trim()));
        self.store.search(&query);
    }

    // ========================================================================
    // Favorites and Details
    // ========================================================================

    /// Toggles the selected movie's favorite membership.
    pub fn toggle_selected_favorite(&mut self) {
        let Some(movie) = self.selected_movie() else {
            return;
        };
        let movie_id = movie.movie_id;
        let make_favorite = !self.store.view().is_favorite(movie_id);
        let msg = if make_favorite {
            format!("Adding \"{}\" to favorites...", movie.title)
        } else {
            format!("Removing \"{}\" from favorites...", movie.title)
        };
        self.set_status(msg);
        self.store.toggle_favorite(movie_id, make_favorite);
    }

    pub fn open_selected_details(&mut self) {
        if let Some(movie_id) = self.selected_movie().map(|m| m.movie_id) {
            self.store.open_details(movie_id);
        }
    }

    /// Movie the link actions apply to: the open detail pane, else the cursor.
    pub fn focused_movie(&self) -> Option<&Movie> {
        match self.store.details() {
            Some(DetailPane::Ready(details)) => Some(&details.movie),
            _ => self.selected_movie(),
        }
    }
}
