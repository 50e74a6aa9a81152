use crate::app::{App, Mode};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match app.mode {
            Mode::Search => Cow::Borrowed("Type to search | ESC cancel | ENTER search"),
            Mode::Browse if app.store.details().is_some() => {
                Cow::Borrowed("[t]railer [i]mdb [f]avorite [Esc]close [q]uit")
            }
            Mode::Browse => Cow::Borrowed(
                "[/]search [Tab/1-4]tabs [g/G]genre [f]avorite [Enter]details [?]help [q]uit",
            ),
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
