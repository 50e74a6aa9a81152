use crate::app::App;
use panchax::api::Movie;
use panchax::dashboard::selector::heading;
use panchax::util::{display_width, format_rating, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// One-line summary shown after the title: rating and the first two genres.
pub fn movie_meta(movie: &Movie) -> String {
    let genres: Vec<&str> = movie.genres.iter().take(2).map(String::as_str).collect();
    if genres.is_empty() {
        format!("★ {}", format_rating(movie.avg_rating))
    } else {
        format!("★ {}  {}", format_rating(movie.avg_rating), genres.join(", "))
    }
}

/// Render the movie list for the active tab.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let view = app.store.view();
    let collection = app.store.visible();

    let items: Vec<ListItem> = if view.loading {
        vec![ListItem::new(format!(
            "{} Loading dashboard...",
            SPINNER[app.spinner_frame % SPINNER.len()]
        ))]
    } else if collection.is_empty() {
        vec![ListItem::new(Span::styled(
            "No movies here",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        collection
            .iter()
            .map(|movie| {
                let marker = if view.is_favorite(movie.movie_id) {
                    Span::styled("♥ ", Style::default().fg(Color::Red))
                } else {
                    Span::raw("  ")
                };

                let meta = movie_meta(movie);
                // Borders and marker take 4 columns, two spaces separate the meta.
                let room = (area.width as usize)
                    .saturating_sub(4)
                    .saturating_sub(display_width(&meta) + 2);
                let title = strip_control_chars(&movie.title);
                let title = truncate_to_width(&title, room).into_owned();

                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("  {}", strip_control_chars(&meta)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };

    let mut title = format!(" {} ", heading(view));
    if !view.loading && !app.store.is_settled() {
        title.push_str(SPINNER[app.spinner_frame % SPINNER.len()]);
        title.push(' ');
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    if !view.loading && !collection.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_meta() {
        let mut movie = Movie::new(1, "Toy Story");
        movie.avg_rating = 3.92;
        assert_eq!(movie_meta(&movie), "★ 3.9");

        movie.genres = vec!["Adventure".into(), "Animation".into(), "Children".into()];
        assert_eq!(movie_meta(&movie), "★ 3.9  Adventure, Animation");
    }
}
