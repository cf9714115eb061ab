use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table, TableState},
    Frame,
};
use wardrobe_core::model::WardrobeItem;

use crate::tui::{
    app::{InputMode, TuiApp},
    widgets::{filter_bar::FilterBar, help_bar::HelpBar, search_input::SearchInput},
};

pub fn render(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let layout = Layout::vertical([
        Constraint::Length(3), // search bar
        Constraint::Length(1), // filter bar
        Constraint::Min(5),    // table
        Constraint::Length(1), // help bar
    ])
    .split(area);

    frame.render_widget(
        SearchInput {
            query: &app.filter.query,
            cursor: app.search_cursor,
            editing: app.input_mode == InputMode::Search,
            shown: app.visible.len(),
            total: app.catalog.len(),
        },
        layout[0],
    );

    frame.render_widget(
        FilterBar {
            filter: &app.filter,
            focused: app.filter_field,
            active: app.input_mode == InputMode::Filter,
        },
        layout[1],
    );

    render_table(frame, app, layout[2]);

    frame.render_widget(
        HelpBar {
            screen: &app.screen,
            input_mode: &app.input_mode,
        },
        layout[3],
    );
}

fn render_table(frame: &mut Frame, app: &TuiApp, area: Rect) {
    if app.loading && app.catalog.is_empty() {
        let loading = Line::from(vec![Span::styled(
            "  Loading wardrobe...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]);
        frame.render_widget(loading, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Type"),
        Cell::from("Color"),
        Cell::from("Thickness"),
        Cell::from("Conf"),
        Cell::from("Added"),
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let rows: Vec<Row> = if app.catalog.is_empty() {
        vec![empty_row(
            "  Your wardrobe is empty. Add items with `wardrobe upload <image>`.",
        )]
    } else if app.visible.is_empty() {
        vec![empty_row(
            "  No items match the current filters. Press Esc to clear.",
        )]
    } else {
        app.visible.iter().map(make_item_row).collect()
    };

    let widths = [
        Constraint::Length(10),
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(12),
    ];

    let title = if app.filter.is_active() {
        format!(" Wardrobe ({} of {}) ", app.visible.len(), app.catalog.len())
    } else {
        format!(" Wardrobe ({}) ", app.catalog.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            ratatui::widgets::Block::default()
                .borders(ratatui::widgets::Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Indexed(236))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = TableState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn empty_row(message: &'static str) -> Row<'static> {
    Row::new(vec![Cell::from(Span::styled(
        message,
        Style::default().fg(Color::DarkGray),
    ))])
}

/// Terminal color for a `#RRGGBB` hex string.
pub fn swatch(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color::DarkGray;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::DarkGray,
    }
}

fn make_item_row(item: &WardrobeItem) -> Row<'static> {
    let short_id: String = item.id.chars().take(8).collect();
    let id_cell = Cell::from(Span::styled(short_id, Style::default().fg(Color::Cyan)));

    let type_cell = Cell::from(Span::styled(
        item.class_name.clone(),
        Style::default().fg(Color::Magenta),
    ));

    let color_cell = Cell::from(Line::from(vec![
        Span::styled("■ ", Style::default().fg(swatch(&item.color_hex))),
        Span::raw(item.color_hex.clone()),
    ]));

    let thickness = if item.thickness.is_empty() {
        "—".to_string()
    } else {
        item.thickness.clone()
    };
    let thickness_cell = Cell::from(Span::styled(thickness, Style::default().fg(Color::Gray)));

    let conf_color = if item.confidence >= 0.7 {
        Color::Green
    } else if item.confidence >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    };
    let conf_cell = Cell::from(Span::styled(
        format!("{:.0}%", item.confidence * 100.0),
        Style::default().fg(conf_color),
    ));

    let date = item
        .created_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let date_cell = Cell::from(Span::styled(date, Style::default().fg(Color::DarkGray)));

    Row::new(vec![
        id_cell,
        type_cell,
        color_cell,
        thickness_cell,
        conf_cell,
        date_cell,
    ])
}
