use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::{app::TuiApp, widgets::help_bar::HelpBar};

pub fn render(frame: &mut Frame, app: &TuiApp, area: Rect, base_url: &str) {
    let layout = Layout::vertical([
        Constraint::Length(7), // info block
        Constraint::Min(5),    // category breakdown
        Constraint::Length(1), // help bar
    ])
    .split(area);

    let counts = app.category_counts();
    let label = Style::default().fg(Color::DarkGray);
    let info_lines = vec![
        Line::from(vec![
            Span::styled("  Backend:    ", label),
            Span::styled(base_url.to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("  Items:      ", label),
            Span::styled(
                app.catalog.len().to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Categories: ", label),
            Span::styled(counts.len().to_string(), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("  Shop:       ", label),
            Span::styled(
                format!(
                    "{} loaded, {} loading",
                    app.shop.resolved_keys().len(),
                    app.shop.loading_count()
                ),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Lookahead:  ", label),
            Span::styled(
                format!("{} units", app.trigger.margin()),
                Style::default().fg(Color::Green),
            ),
        ]),
    ];

    let info = Paragraph::new(info_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Status "),
    );
    frame.render_widget(info, layout[0]);

    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(1);
    let bar_width = layout[1].width.saturating_sub(25) as usize;

    let bar_lines: Vec<Line> = if counts.is_empty() {
        vec![Line::from(Span::styled(
            "  No items yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        counts
            .iter()
            .map(|(category, count)| {
                let filled = if max_count > 0 {
                    (*count as f64 / max_count as f64 * bar_width as f64) as usize
                } else {
                    0
                }
                .max(1);

                let bar = "█".repeat(filled);
                let empty = "░".repeat(bar_width.saturating_sub(filled));

                Line::from(vec![
                    Span::styled(
                        format!("  {:<14}", category),
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(bar, Style::default().fg(Color::Cyan)),
                    Span::styled(empty, Style::default().fg(Color::DarkGray)),
                    Span::styled(format!(" {count}"), Style::default().fg(Color::Green)),
                ])
            })
            .collect()
    };

    let bars = Paragraph::new(bar_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" By Category "),
    );
    frame.render_widget(bars, layout[1]);

    frame.render_widget(
        HelpBar {
            screen: &app.screen,
            input_mode: &app.input_mode,
        },
        layout[2],
    );
}
