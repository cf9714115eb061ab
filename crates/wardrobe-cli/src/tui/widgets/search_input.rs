use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::tui::views::list::swatch;

/// Wardrobe search box. The query matches item types and hex colors; the
/// border shows how many items survive all active filters.
pub struct SearchInput<'a> {
    pub query: &'a str,
    /// Byte offset into `query`.
    pub cursor: usize,
    pub editing: bool,
    pub shown: usize,
    pub total: usize,
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = if self.editing {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let count = Line::from(Span::styled(
            format!(" {}/{} ", self.shown, self.total),
            Style::default().fg(accent),
        ))
        .right_aligned();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(" Search ")
            .title(count);

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.query.is_empty() && !self.editing {
            let hint = Line::from(Span::styled(
                "press / to search by type or #hex",
                Style::default().fg(Color::DarkGray),
            ));
            buf.set_line(inner.x, inner.y, &hint, inner.width);
            return;
        }

        let mut spans = Vec::new();
        if is_hex_color(self.query) {
            spans.push(Span::styled("██ ", Style::default().fg(swatch(self.query))));
        }
        let prefix_width: usize = spans.iter().map(|s| s.width()).sum();
        let room = (inner.width as usize).saturating_sub(prefix_width);

        let (before, after) = visible_window(self.query, self.cursor, room);
        spans.push(Span::raw(before));
        if self.editing {
            let mut rest = after.chars();
            let under = rest.next().unwrap_or(' ');
            spans.push(Span::styled(
                under.to_string(),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(rest.as_str()));
        } else {
            spans.push(Span::raw(after));
        }

        buf.set_line(inner.x, inner.y, &Line::from(spans), inner.width);
    }
}

/// `#RRGGBB`, the only form the backend stores.
fn is_hex_color(query: &str) -> bool {
    query.len() == 7
        && query.starts_with('#')
        && query[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Split `query` at `cursor`, dropping leading characters until the text
/// before the cursor plus the cursor cell fits in `width` columns.
fn visible_window(query: &str, cursor: usize, width: usize) -> (&str, &str) {
    let cursor = cursor.min(query.len());
    let (mut before, after) = query.split_at(cursor);
    let mut chars = before.chars();
    while chars.as_str().chars().count() + 1 > width && chars.next().is_some() {}
    before = chars.as_str();
    (before, after)
}
