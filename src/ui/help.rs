//! Help overlay listing the key bindings.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

const SECTIONS: [(&str, &[(&str, &str)]); 3] = [
    (
        "Browse",
        &[
            ("j / k", "Move down / up"),
            ("Home / End", "First / last movie"),
            ("Tab / S-Tab", "Next / previous tab"),
            ("1-4", "Trending, For You, Favorites, History"),
            ("s", "Back to search results"),
            ("g / G", "Next / previous genre"),
            ("0", "Clear genre"),
            ("r", "Refresh recommendations"),
        ],
    ),
    (
        "Movie",
        &[
            ("f", "Add to / remove from favorites"),
            ("Enter", "Show details"),
            ("t", "Search for the trailer"),
            ("i", "Open IMDb page"),
            ("Esc", "Close details"),
        ],
    ),
    (
        "General",
        &[
            ("/", "Search the catalog"),
            ("?", "Toggle this help"),
            ("q / Ctrl+c", "Quit"),
        ],
    ),
];

/// Render the help overlay on top of the dashboard.
pub fn render(f: &mut Frame) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (label, bindings) in SECTIONS {
        rows.push(Row::new(vec![
            Line::from(Span::styled(
                format!("-- {} --", label),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ]));
        for (key, description) in bindings {
            rows.push(Row::new(vec![format!("  {}", key), description.to_string()]));
        }
        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(20)]).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help (? to close) "),
    );
    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
