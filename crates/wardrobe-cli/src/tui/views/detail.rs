use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use wardrobe_core::candidates;
use wardrobe_core::model::WardrobeItem;

use crate::tui::{app::TuiApp, views::list::swatch, widgets::help_bar::HelpBar};

pub fn render(frame: &mut Frame, app: &TuiApp, area: Rect, base_url: &str) {
    let Some(ref item) = app.detail else {
        let msg = Paragraph::new("No item selected.").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(msg, area);
        return;
    };

    let layout = Layout::vertical([
        Constraint::Length(2), // title
        Constraint::Length(1), // meta line
        Constraint::Min(5),    // details
        Constraint::Length(1), // help bar
    ])
    .split(area);

    let title_text = Line::from(vec![
        Span::styled(
            format!(" {} ", role(item)),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            item.class_name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    let title_widget = Paragraph::new(title_text).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(title_widget, layout[0]);

    let added = item
        .created_at
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let meta = Line::from(vec![
        Span::styled(format!(" {} ", item.id), Style::default().fg(Color::Cyan)),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(added, Style::default().fg(Color::DarkGray)),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled("■ ", Style::default().fg(swatch(&item.color_hex))),
        Span::raw(item.color_hex.as_str()),
        Span::styled(" │ conf: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{:.0}%", item.confidence * 100.0),
            Style::default().fg(Color::Green),
        ),
    ]);
    frame.render_widget(Paragraph::new(meta), layout[1]);

    render_details(frame, app, item, layout[2], base_url);

    frame.render_widget(
        HelpBar {
            screen: &app.screen,
            input_mode: &app.input_mode,
        },
        layout[3],
    );
}

fn role(item: &WardrobeItem) -> &'static str {
    match (
        candidates::is_top(&item.class_name),
        candidates::is_bottom(&item.class_name),
    ) {
        (true, true) => "top/bottom",
        (true, false) => "top",
        (false, true) => "bottom",
        (false, false) => "other",
    }
}

fn section(title: String) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn render_details(
    frame: &mut Frame,
    app: &TuiApp,
    item: &WardrobeItem,
    area: Rect,
    base_url: &str,
) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(section("─── Details ───".to_string()));
    lines.push(Line::from(""));
    lines.push(Line::from(format!("  File: {}", item.filename)));
    lines.push(Line::from(format!(
        "  Image: {}/image/{}",
        base_url, item.filename
    )));
    lines.push(Line::from(format!(
        "  Thickness: {}",
        if item.thickness.is_empty() {
            "—"
        } else {
            item.thickness.as_str()
        }
    )));

    let featured: Vec<&str> = app
        .recommendations()
        .iter()
        .filter(|r| r.wardrobe_items.iter().any(|w| w.id == item.id))
        .map(|r| r.item.as_str())
        .collect();
    if !featured.is_empty() {
        lines.push(Line::from(""));
        lines.push(section(format!(
            "─── Recommended as ({}) ───",
            featured.len()
        )));
        for name in featured {
            lines.push(Line::from(Span::styled(
                format!("  • {name}"),
                Style::default().fg(Color::Green),
            )));
        }
    }

    if let Some(ref meta) = item.meta {
        lines.push(Line::from(""));
        lines.push(section("─── Metadata ───".to_string()));
        let pretty = serde_json::to_string_pretty(meta).unwrap_or_else(|_| meta.to_string());
        for line in pretty.lines() {
            lines.push(Line::from(Span::styled(
                format!("  {line}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Item "),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
