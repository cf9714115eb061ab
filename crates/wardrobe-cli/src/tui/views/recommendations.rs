use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use wardrobe_core::lazy_fetch::FetchState;
use wardrobe_core::model::{FaceRecommendationResponse, RankedRecommendation};

use crate::tui::{
    app::{TuiApp, ENTRY_ROWS, SHOP_PREVIEW},
    widgets::help_bar::HelpBar,
};

/// Rows around the entry list: analysis panel, list borders and help bar.
pub const CHROME_ROWS: u16 = 7;

pub fn render(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let layout = Layout::vertical([
        Constraint::Length(4), // analysis summary
        Constraint::Min(5),    // entries
        Constraint::Length(1), // help bar
    ])
    .split(area);

    match app.face {
        Some(ref face) => {
            render_summary(frame, face, layout[0]);
            render_entries(frame, app, layout[1]);
        }
        None => {
            let text = if app.analyzing {
                Span::styled(
                    "  Analyzing face photo...",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    "  No face analysis yet. Start with `wardrobe tui --photo <image>`.",
                    Style::default().fg(Color::DarkGray),
                )
            };
            frame.render_widget(Paragraph::new(Line::from(text)), layout[1]);
        }
    }

    frame.render_widget(
        HelpBar {
            screen: &app.screen,
            input_mode: &app.input_mode,
        },
        layout[2],
    );
}

fn render_summary(frame: &mut Frame, face: &FaceRecommendationResponse, area: Rect) {
    let analysis = &face.face_analysis;
    let dim = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Magenta);

    let mut lines = vec![Line::from(vec![
        Span::styled("  Skin tone: ", dim),
        Span::styled(analysis.skin_tone.category.as_str(), value),
        Span::styled(
            format!(" ({})", analysis.skin_tone.undertone_label()),
            dim,
        ),
        Span::styled("   Face shape: ", dim),
        Span::styled(analysis.face_shape.as_str(), value),
    ])];
    if !face.style_tips.colors.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("  Colors: ", dim),
            Span::raw(face.style_tips.colors.join(", ")),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Analysis ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_entries(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let recs = app.recommendations();
    let mut lines: Vec<Line> = Vec::with_capacity(recs.len() * ENTRY_ROWS as usize);

    for (i, rec) in recs.iter().enumerate() {
        let mut entry = vec![header_line(rec, i == app.rec_selected)];
        entry.extend(shop_lines(app.shop.state(&rec.item)));
        entry.resize(ENTRY_ROWS as usize, Line::from(""));
        lines.extend(entry);
    }

    let title = format!(
        " Recommendations ({}) · shop {} loaded, {} loading ",
        recs.len(),
        app.shop.resolved_keys().len(),
        app.shop.loading_count()
    );
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title),
        )
        .scroll((app.rec_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn header_line(rec: &RankedRecommendation, selected: bool) -> Line<'_> {
    let score_color = if rec.score >= 7.0 {
        Color::Green
    } else if rec.score >= 4.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    let mut spans = vec![
        Span::styled(
            if selected { "▸ " } else { "  " },
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            rec.item.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {:.1}/10", rec.score),
            Style::default().fg(score_color),
        ),
    ];
    if !rec.thickness.is_empty() {
        spans.push(Span::styled(
            format!("  · {}", rec.thickness),
            Style::default().fg(Color::Gray),
        ));
    }
    spans.push(Span::styled(
        format!("  · {} in wardrobe", rec.wardrobe_items.len()),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

fn shop_lines(state: FetchState<'_>) -> Vec<Line<'_>> {
    let dim = Style::default().fg(Color::DarkGray);
    match state {
        FetchState::Absent => vec![Line::from(Span::styled("    ⋯", dim))],
        FetchState::Pending => vec![Line::from(Span::styled(
            "    Loading shop suggestions...",
            Style::default().fg(Color::Yellow),
        ))],
        FetchState::Resolved([]) => {
            vec![Line::from(Span::styled("    No shop suggestions", dim))]
        }
        FetchState::Resolved(products) => products
            .iter()
            .take(SHOP_PREVIEW)
            .map(|p| {
                Line::from(vec![
                    Span::styled("    ◦ ", dim),
                    Span::raw(p.title.as_str()),
                    Span::styled(format!("  {}", p.price), Style::default().fg(Color::Green)),
                ])
            })
            .collect(),
    }
}
