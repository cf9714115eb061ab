use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use wardrobe_core::model::{CompatibilityBand, Outfit};

use crate::tui::{app::TuiApp, views::list::swatch, widgets::help_bar::HelpBar};

pub fn render(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let layout = Layout::vertical([
        Constraint::Min(5),    // table
        Constraint::Length(1), // help bar
    ])
    .split(area);

    let (rows, total) = match app.outfits {
        Some(ref resp) if !resp.outfits.is_empty() => (
            resp.outfits.iter().map(make_outfit_row).collect(),
            resp.total_combinations,
        ),
        Some(ref resp) => (
            vec![Row::new(vec![Cell::from(Span::styled(
                "  No outfit pairs were scored.",
                Style::default().fg(Color::DarkGray),
            ))])],
            resp.total_combinations,
        ),
        None => (Vec::new(), 0),
    };

    let header = Row::new(vec![
        Cell::from("Top"),
        Cell::from("Bottom"),
        Cell::from("Score"),
        Cell::from("Match"),
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let widths = [
        Constraint::Min(20),
        Constraint::Min(20),
        Constraint::Length(7),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" Outfits (from {total} combinations) ")),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Indexed(236))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = TableState::default();
    state.select(Some(app.outfit_selected));
    frame.render_stateful_widget(table, layout[0], &mut state);

    frame.render_widget(
        HelpBar {
            screen: &app.screen,
            input_mode: &app.input_mode,
        },
        layout[1],
    );
}

fn make_outfit_row(outfit: &Outfit) -> Row<'static> {
    let piece = |class_name: &str, hex: &str| {
        Cell::from(ratatui::text::Line::from(vec![
            Span::styled("■ ", Style::default().fg(swatch(hex))),
            Span::raw(class_name.to_string()),
        ]))
    };

    let band = CompatibilityBand::from_score(outfit.compatibility_score);
    let band_color = match band {
        CompatibilityBand::Excellent => Color::Green,
        CompatibilityBand::Good => Color::Cyan,
        CompatibilityBand::Fair => Color::Yellow,
        CompatibilityBand::Poor => Color::Red,
    };

    Row::new(vec![
        piece(&outfit.top.class_name, &outfit.top.color_hex),
        piece(&outfit.bottom.class_name, &outfit.bottom.color_hex),
        Cell::from(Span::styled(
            format!("{:.0}%", outfit.compatibility_score * 100.0),
            Style::default().fg(band_color),
        )),
        Cell::from(Span::styled(band.to_string(), Style::default().fg(band_color))),
    ])
}
