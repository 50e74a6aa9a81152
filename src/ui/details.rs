use crate::app::App;
use panchax::dashboard::DetailPane;
use panchax::util::{format_rating, strip_control_chars};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the detail pane: the movie, its links, and similar titles.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(pane) = app.store.details() else {
        return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let lines: Vec<Line> = match pane {
        DetailPane::Loading { movie_id } => vec![Line::from(format!("Loading movie #{}...", movie_id))],
        DetailPane::Failed { movie_id } => vec![Line::from(format!("Could not load movie #{}", movie_id))],
        DetailPane::Ready(details) => {
            let movie = &details.movie;
            let mut lines = vec![
                Line::from(Span::styled(
                    strip_control_chars(&movie.title).into_owned(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Rating  ", label),
                    Span::raw(format_rating(movie.avg_rating)),
                ]),
                Line::from(vec![
                    Span::styled("Genres  ", label),
                    Span::raw(strip_control_chars(&movie.genres.join(", ")).into_owned()),
                ]),
            ];
            if app.store.view().is_favorite(movie.movie_id) {
                lines.push(Line::from(Span::styled(
                    "♥ In your favorites",
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::from(""));
            let mut links = vec![Span::styled("[t] trailer", label)];
            if movie.imdb_url.is_some() {
                links.push(Span::styled("  [i] IMDb", label));
            }
            lines.push(Line::from(links));

            if !details.similar_movies.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Similar",
                    Style::default().add_modifier(Modifier::UNDERLINED),
                )));
                for similar in &details.similar_movies {
                    lines.push(Line::from(format!(
                        "  {}  ★ {}",
                        strip_control_chars(&similar.title),
                        format_rating(similar.avg_rating)
                    )));
                }
            }
            lines
        }
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" Details (Esc to close) "),
    );
    f.render_widget(paragraph, area);
}
