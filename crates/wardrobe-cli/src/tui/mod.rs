pub mod app;
pub mod event;
mod views;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self as ct_event, Event};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use wardrobe_core::api::{HttpWardrobeApi, WardrobeApi};
use wardrobe_core::candidates::SelectionLimits;
use wardrobe_core::config::WardrobeConfig;
use wardrobe_core::outfit;

use self::app::{Screen, TuiApp};
use self::event::{AsyncAction, AsyncResult};

/// Entry point for the interactive TUI mode.
pub async fn run_tui(config: &WardrobeConfig, photo: Option<PathBuf>) -> Result<()> {
    let api = Arc::new(
        HttpWardrobeApi::from_config(&config.api).context("failed to create API client")?,
    );
    let base_url = api.base_url().to_string();

    // Channels for async communication
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AsyncAction>();
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<AsyncResult>();

    let worker_api = api.clone();
    let limits = SelectionLimits::from(&config.candidates);
    tokio::spawn(async move {
        worker_loop(worker_api, limits, &mut action_rx, &result_tx).await;
    });

    action_tx.send(AsyncAction::LoadWardrobe {
        limit: config.catalog.limit,
    })?;

    let mut app = TuiApp::new(api, config);
    if let Some(path) = photo {
        app.analyzing = true;
        action_tx.send(AsyncAction::AnalyzeFace { path })?;
    }

    let mut terminal = ratatui::init();

    let result = run_loop(&mut terminal, &mut app, &action_tx, &mut result_rx, &base_url);

    ratatui::restore();

    result
}

fn run_loop(
    terminal: &mut DefaultTerminal,
    app: &mut TuiApp,
    action_tx: &mpsc::UnboundedSender<AsyncAction>,
    result_rx: &mut mpsc::UnboundedReceiver<AsyncResult>,
    base_url: &str,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.viewport_rows = size
            .height
            .saturating_sub(views::recommendations::CHROME_ROWS);
        app.sync_visibility();

        terminal.draw(|frame| render(frame, app, base_url))?;

        // Poll for async results (non-blocking)
        while let Ok(result) = result_rx.try_recv() {
            app.handle_result(result);
        }
        app.poll_shop();

        // Poll for keyboard events (50ms timeout for responsive UI)
        if ct_event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = ct_event::read()? {
                if let Some(action) = app.handle_key(key) {
                    let _ = action_tx.send(action);
                }
            }
        }

        app.tick_error();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn render(frame: &mut Frame, app: &TuiApp, base_url: &str) {
    let area = frame.area();

    match app.screen {
        Screen::Wardrobe => views::list::render(frame, app, area),
        Screen::Detail => views::detail::render(frame, app, area, base_url),
        Screen::Recommendations => views::recommendations::render(frame, app, area),
        Screen::Outfits => views::outfits::render(frame, app, area),
        Screen::Status => views::status::render(frame, app, area, base_url),
    }

    // Render error toast overlay if present
    if let Some(ref msg) = app.error_message {
        render_error_toast(frame, msg);
    }
}

fn render_error_toast(frame: &mut Frame, msg: &str) {
    use ratatui::{
        layout::{Constraint, Flex, Layout},
        style::{Color, Style},
        widgets::{Block, Borders, Clear, Paragraph, Wrap},
    };

    let area = frame.area();
    let [toast_area] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(area);
    let [toast_area] = Layout::vertical([Constraint::Length(4)])
        .flex(Flex::End)
        .areas(toast_area);

    frame.render_widget(Clear, toast_area);
    let toast = Paragraph::new(format!(" ✗ {msg}"))
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        );
    frame.render_widget(toast, toast_area);
}

/// Async worker loop: runs the blocking-path requests off the UI thread.
async fn worker_loop(
    api: Arc<HttpWardrobeApi>,
    limits: SelectionLimits,
    action_rx: &mut mpsc::UnboundedReceiver<AsyncAction>,
    result_tx: &mpsc::UnboundedSender<AsyncResult>,
) {
    while let Some(action) = action_rx.recv().await {
        let result = match action {
            AsyncAction::LoadWardrobe { limit } => match api.list_wardrobe(limit).await {
                Ok(items) => AsyncResult::Wardrobe(items),
                Err(e) => AsyncResult::Error(format!("Failed to load wardrobe: {e}")),
            },
            AsyncAction::AnalyzeFace { path } => match analyze_face(api.as_ref(), &path).await {
                Ok(response) => AsyncResult::Face(Box::new(response)),
                Err(e) => AsyncResult::Error(format!("Face analysis failed: {e:#}")),
            },
            AsyncAction::RecommendOutfits { recommendations } => {
                match outfit::recommend_outfits(api.as_ref(), &recommendations, limits).await {
                    Ok(response) => AsyncResult::Outfits(response),
                    Err(e) => AsyncResult::Error(e.to_string()),
                }
            }
        };
        if result_tx.send(result).is_err() {
            break; // UI closed
        }
    }
}

async fn analyze_face(
    api: &HttpWardrobeApi,
    path: &std::path::Path,
) -> Result<wardrobe_core::model::FaceRecommendationResponse> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo.jpg");
    Ok(api.face_recommendations(filename, bytes).await?)
}
