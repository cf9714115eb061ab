use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use wardrobe_core::catalog::{FilterQuery, ALL};

use crate::tui::app::FacetField;

/// One-line summary of the facet filters; highlights the focused facet in filter mode.
pub struct FilterBar<'a> {
    pub filter: &'a FilterQuery,
    pub focused: FacetField,
    pub active: bool,
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans: Vec<Span> = vec![Span::styled(
            if self.active { "Filter: " } else { "Facets: " },
            dim,
        )];

        for (i, field) in FacetField::ALL.iter().enumerate() {
            let value = match field {
                FacetField::Category => &self.filter.category,
                FacetField::Color => &self.filter.color,
                FacetField::Thickness => &self.filter.thickness,
            };

            let value_style = if self.active && *field == self.focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if value != ALL {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                dim
            };

            spans.push(Span::styled(format!(" {} ", field.label()), dim));
            let shown = if self.active && *field == self.focused {
                format!("‹ {value} ›")
            } else {
                format!(" {value} ")
            };
            spans.push(Span::styled(shown, value_style));

            if i < FacetField::ALL.len() - 1 {
                spans.push(Span::styled("│", dim));
            }
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
