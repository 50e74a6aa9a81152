//! Keyboard input handling.
//!
//! Routes keys to the help overlay, the search box or the browse handler
//! depending on what is on screen.

use crate::app::{App, Mode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use panchax::dashboard::Tab;

use super::helpers::{open_imdb, open_trailer};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    match app.mode {
        Mode::Search => Ok(handle_search_input(app, code)),
        Mode::Browse => Ok(handle_browse_input(app, code)),
    }
}

fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
        app.show_help = false;
    }
    Action::Continue
}

fn handle_search_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Enter => app.submit_search(),
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
    Action::Continue
}

fn handle_browse_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => {
            if app.store.details().is_some() {
                app.store.close_details();
            } else {
                app.clear_genre();
            }
        }

        KeyCode::Char('/') => app.enter_search(),

        KeyCode::Tab => app.cycle_tab(true),
        KeyCode::BackTab => app.cycle_tab(false),
        KeyCode::Char(c @ '1'..='4') => {
            let index = (c as usize) - ('1' as usize);
            app.switch_tab(Tab::BROWSABLE[index]);
        }
        KeyCode::Char('s') => {
            if app.store.view().search_query.is_empty() {
                app.set_status("No search yet, press / to search");
            } else {
                app.switch_tab(Tab::Search);
            }
        }

        KeyCode::Char('g') => app.cycle_genre(true),
        KeyCode::Char('G') => app.cycle_genre(false),
        KeyCode::Char('0') => app.clear_genre(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Char('f') => app.toggle_selected_favorite(),
        KeyCode::Enter => app.open_selected_details(),
        KeyCode::Char('t') => open_trailer(app),
        KeyCode::Char('i') => open_imdb(app),
        KeyCode::Char('r') => {
            app.set_status("Refreshing recommendations...");
            app.store.refresh_recommendations();
        }
        _ => {}
    }
    Action::Continue
}
