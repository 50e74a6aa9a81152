//! Render functions for the TUI.
//!
//! Layout, top to bottom: header (user and search box), tab bar, genre bar,
//! the movie list (with the detail pane beside it when open), status bar.

use crate::app::{App, Mode};
use panchax::dashboard::Tab;
use panchax::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::{details, help, movies, status};

pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_tabs(f, app, chunks[1]);
    render_genres(f, app, chunks[2]);
    render_body(f, app, chunks[3]);
    status::render(f, app, chunks[4]);

    if app.show_help {
        help::render(f);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let user = app
        .store
        .identity()
        .map(|u| strip_control_chars(u.display_name()).into_owned())
        .unwrap_or_default();

    let (search_text, search_style) = match app.mode {
        Mode::Search => (
            format!("{}_", app.search_input),
            Style::default().fg(Color::Yellow),
        ),
        Mode::Browse if app.store.view().search_query.is_empty() => (
            "press / to search".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Mode::Browse => (
            app.store.view().search_query.clone(),
            Style::default().fg(Color::Gray),
        ),
    };

    let max = area.width.saturating_sub(4) as usize;
    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(truncate_to_width(&search_text, max.saturating_sub(8)).into_owned(), search_style),
    ]);

    let title = if user.is_empty() {
        " Panchax ".to_string()
    } else {
        format!(" Panchax - {} ", user)
    };
    let border = if app.mode == Mode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    );
    f.render_widget(paragraph, area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let view = app.store.view();
    let mut tabs: Vec<Tab> = Tab::BROWSABLE.to_vec();
    if !view.search_query.is_empty() {
        tabs.push(Tab::Search);
    }
    if view.selected_genre.is_some() {
        tabs.push(Tab::Genre);
    }

    let titles: Vec<Line> = tabs
        .iter()
        .map(|tab| {
            let count = match tab {
                Tab::Trending => view.trending.len(),
                Tab::Recommended => view.recommended.len(),
                Tab::Favorites => view.favorites.len(),
                Tab::History => view.recently_watched.len(),
                Tab::Search => view.search_results.len(),
                Tab::Genre => view.genre_movies.len(),
            };
            Line::from(format!("{} ({})", tab.label(), count))
        })
        .collect();

    let selected = tabs.iter().position(|t| *t == view.active_tab).unwrap_or(0);
    let widget = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(widget, area);
}

fn render_genres(f: &mut Frame, app: &App, area: Rect) {
    let view = app.store.view();
    let mut spans = vec![Span::styled(" Genre: ", Style::default().fg(Color::DarkGray))];

    match view.selected_genre.as_deref() {
        Some(genre) => spans.push(Span::styled(
            strip_control_chars(genre).into_owned(),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::styled("all", Style::default().fg(Color::Gray))),
    }
    if !view.genres.is_empty() {
        spans.push(Span::styled(
            format!("  [g/G] cycle {} genres  [0] clear", view.genres.len()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(f: &mut Frame, app: &App, area: Rect) {
    if app.store.details().is_some() {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        movies::render(f, app, chunks[0]);
        details::render(f, app, chunks[1]);
    } else {
        movies::render(f, app, area);
    }
}
