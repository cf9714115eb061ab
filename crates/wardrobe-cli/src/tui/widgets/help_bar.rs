use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::tui::app::{InputMode, Screen};

/// Bottom help bar showing context-sensitive key bindings.
pub struct HelpBar<'a> {
    pub screen: &'a Screen,
    pub input_mode: &'a InputMode,
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::DarkGray);
        let key_style = Style::default().fg(Color::Cyan);

        let bindings: &[(&str, &str)] = match (self.screen, self.input_mode) {
            (Screen::Wardrobe, InputMode::Normal) => &[
                ("j/k", "navigate"),
                ("Enter", "open"),
                ("/", "search"),
                ("f", "facets"),
                ("o", "outfits"),
                ("Tab", "recommendations"),
                ("r", "reload"),
                ("Esc", "clear"),
                ("q", "quit"),
            ],
            (Screen::Wardrobe, InputMode::Search) => &[("Enter/Esc", "done")],
            (Screen::Wardrobe, InputMode::Filter) => &[
                ("←/→", "cycle value"),
                ("↑/↓", "switch facet"),
                ("Enter/Esc", "done"),
            ],
            (Screen::Detail, _) => &[("Esc", "back"), ("q", "quit")],
            (Screen::Recommendations, _) => &[
                ("j/k", "navigate"),
                ("PgUp/PgDn", "page"),
                ("o", "outfits"),
                ("Tab", "status"),
                ("Esc", "wardrobe"),
                ("q", "quit"),
            ],
            (Screen::Outfits, _) => &[("j/k", "navigate"), ("Esc", "back"), ("q", "quit")],
            (Screen::Status, _) => &[("Tab/Esc", "back to wardrobe"), ("q", "quit")],
        };

        let mut spans: Vec<Span> = Vec::with_capacity(bindings.len() * 2);
        for (i, (key, label)) in bindings.iter().enumerate() {
            spans.push(Span::styled(*key, key_style));
            let sep = if i + 1 < bindings.len() { "  " } else { "" };
            spans.push(Span::styled(format!(" {label}{sep}"), style));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
