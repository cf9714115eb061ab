mod tui;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use wardrobe_core::api::{HttpWardrobeApi, WardrobeApi};
use wardrobe_core::candidates::{self, SelectionLimits};
use wardrobe_core::catalog::{CatalogStore, FilterQuery, ALL};
use wardrobe_core::config::WardrobeConfig;
use wardrobe_core::lazy_fetch::{FetchState, LazyFetchCache};
use wardrobe_core::model::*;
use wardrobe_core::outfit;
use wardrobe_core::preferences::{
    FilePreferenceStore, PreferenceStore, StylePreferences, QUIZ_QUESTIONS, STYLE_PREFERENCES_KEY,
};

#[derive(Parser)]
#[command(
    name = "wardrobe",
    about = "Wardrobe: browse your clothes and get outfit recommendations",
    version
)]
enum Cli {
    /// List wardrobe items with optional search and facet filters
    List {
        /// Case-insensitive substring of the item type or hex color
        #[arg(short, long)]
        query: Option<String>,
        /// Exact category (lowercase item type), or "all"
        #[arg(short, long)]
        category: Option<String>,
        /// Exact hex color, e.g. "#1A2B3C", or "all"
        #[arg(long)]
        color: Option<String>,
        /// Exact thickness, or "all"
        #[arg(short, long)]
        thickness: Option<String>,
        /// Maximum number of items fetched (default from config)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output raw JSON instead of table
        #[arg(long)]
        json: bool,
    },
    /// Show the category, color and thickness facets of the wardrobe
    Facets {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one item's full details
    Item {
        /// Item ID
        id: String,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a clothing photo to the wardrobe
    Upload {
        /// Image file
        path: PathBuf,
    },
    /// Analyze a face photo and list ranked clothing recommendations
    Face {
        /// Face photo
        photo: PathBuf,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Score top/bottom pairs picked from your face-based recommendations
    Outfits {
        /// Face photo
        photo: PathBuf,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch shop suggestions for one or more item types
    Shop {
        /// Item types, e.g. "Hoodie" "Jeans"
        #[arg(required = true)]
        names: Vec<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Weather-based outfit suggestion
    Weather {
        /// City name (default from config)
        #[arg(long)]
        city: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or edit saved style quiz answers
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Launch interactive TUI for browsing the wardrobe
    Tui {
        /// Face photo to analyze on startup for the recommendations screen
        #[arg(long)]
        photo: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Show saved answers
    Show {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Record answers as question=option pairs
    Set {
        /// e.g. style=casual season=winter
        #[arg(required = true)]
        answers: Vec<String>,
    },
    /// List quiz questions and their options
    Questions,
    /// Delete all saved answers
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = WardrobeConfig::load(Some(&std::env::current_dir()?))
        .context("failed to load configuration")?;

    run(cli, &config).await
}

async fn run(cli: Cli, config: &WardrobeConfig) -> Result<()> {
    match cli {
        Cli::List {
            query,
            category,
            color,
            thickness,
            limit,
            json,
        } => {
            let api = make_api(config)?;
            let filter = make_filter(query, category, color, thickness);
            cmd_list(
                &api,
                &filter,
                limit.unwrap_or(config.catalog.limit),
                json,
            )
            .await
        }
        Cli::Facets { json } => {
            let api = make_api(config)?;
            cmd_facets(&api, config.catalog.limit, json).await
        }
        Cli::Item { id, json } => {
            let api = make_api(config)?;
            cmd_item(&api, &id, json).await
        }
        Cli::Upload { path } => {
            let api = make_api(config)?;
            cmd_upload(&api, &path).await
        }
        Cli::Face { photo, json } => {
            let api = make_api(config)?;
            cmd_face(&api, &photo, json).await
        }
        Cli::Outfits { photo, json } => {
            let api = make_api(config)?;
            cmd_outfits(&api, &photo, SelectionLimits::from(&config.candidates), json).await
        }
        Cli::Shop { names, json } => {
            let api = Arc::new(make_api(config)?);
            cmd_shop(api, &names, json).await
        }
        Cli::Weather { city, json } => {
            let api = make_api(config)?;
            let city = city.unwrap_or_else(|| config.api.default_city.clone());
            let key = config.openweather_key();
            let store = make_store(config)?;
            cmd_weather(&api, &store, &city, key.as_deref(), json).await
        }
        Cli::Prefs { action } => {
            let mut store = make_store(config)?;
            match action {
                PrefsAction::Show { json } => cmd_prefs_show(&store, json),
                PrefsAction::Set { answers } => cmd_prefs_set(&mut store, &answers),
                PrefsAction::Questions => {
                    cmd_prefs_questions();
                    Ok(())
                }
                PrefsAction::Clear => cmd_prefs_clear(&mut store),
            }
        }
        Cli::Tui { photo } => tui::run_tui(config, photo).await,
    }
}

fn make_api(config: &WardrobeConfig) -> Result<HttpWardrobeApi> {
    HttpWardrobeApi::from_config(&config.api).context("failed to create API client")
}

fn make_store(config: &WardrobeConfig) -> Result<FilePreferenceStore> {
    let path = config
        .preferences
        .resolved_path()
        .context("failed to resolve preferences path")?;
    Ok(FilePreferenceStore::new(path))
}

fn make_filter(
    query: Option<String>,
    category: Option<String>,
    color: Option<String>,
    thickness: Option<String>,
) -> FilterQuery {
    let mut filter = FilterQuery::default();
    if let Some(q) = query {
        filter = filter.with_query(q);
    }
    if let Some(c) = category {
        filter = filter.with_category(c.to_lowercase());
    }
    if let Some(c) = color {
        filter = filter.with_color(c);
    }
    if let Some(t) = thickness {
        filter = filter.with_thickness(t);
    }
    filter
}

async fn read_photo(path: &Path) -> Result<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo.jpg")
        .to_string();
    Ok((filename, bytes))
}

fn score_colored(score: f32, good: f32, fair: f32, width: usize, precision: usize) -> String {
    let text = format!("{score:<width$.precision$}");
    if score >= good {
        text.green().to_string()
    } else if score >= fair {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

async fn cmd_list<A: WardrobeApi>(
    api: &A,
    filter: &FilterQuery,
    limit: usize,
    json: bool,
) -> Result<()> {
    let store = CatalogStore::load(api, limit)
        .await
        .context("failed to load wardrobe")?;
    let items = store.filter(filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        if store.is_empty() {
            println!(
                "{}",
                "Your wardrobe is empty. Add items with `wardrobe upload <photo>`.".dimmed()
            );
        } else {
            println!("{}", "No items match the current filters.".dimmed());
        }
        return Ok(());
    }

    print_item_table(&items);

    println!();
    println!(
        "{}",
        format!("{} of {} items", items.len(), store.len()).dimmed()
    );

    Ok(())
}

fn print_item_table(items: &[WardrobeItem]) {
    println!(
        "{:<12} {:<18} {:<9} {:<10} {:<6} {}",
        "ID".dimmed(),
        "Type".dimmed(),
        "Color".dimmed(),
        "Thickness".dimmed(),
        "Conf".dimmed(),
        "Role".dimmed()
    );
    println!("{}", "─".repeat(78).dimmed());

    for item in items {
        let short_id: String = item.id.chars().take(12).collect();
        let role = role_label(&item.class_name);
        println!(
            "{:<12} {:<18} {:<9} {:<10} {} {}",
            short_id.cyan(),
            truncate(&item.class_name, 18).magenta(),
            item.color_hex,
            item.thickness,
            score_colored(item.confidence, 0.8, 0.5, 6, 2),
            role.dimmed()
        );
    }
}

fn role_label(label: &str) -> &'static str {
    match (candidates::is_top(label), candidates::is_bottom(label)) {
        (true, true) => "top/bottom",
        (true, false) => "top",
        (false, true) => "bottom",
        (false, false) => "",
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// facets
// ---------------------------------------------------------------------------

async fn cmd_facets<A: WardrobeApi>(api: &A, limit: usize, json: bool) -> Result<()> {
    let store = CatalogStore::load(api, limit)
        .await
        .context("failed to load wardrobe")?;
    let facets = store.facets();

    if json {
        println!("{}", serde_json::to_string_pretty(&facets)?);
        return Ok(());
    }

    let without_all = |values: &[String]| -> Vec<String> {
        values.iter().filter(|v| *v != ALL).cloned().collect()
    };

    println!("{}", "Wardrobe facets".bold());
    println!("  {:<12} {}", "Items:".dimmed(), store.len().to_string().cyan());
    for (label, values) in [
        ("Categories:", without_all(&facets.categories)),
        ("Colors:", without_all(&facets.colors)),
        ("Thickness:", without_all(&facets.thicknesses)),
    ] {
        let shown = if values.is_empty() {
            "-".dimmed().to_string()
        } else {
            values.join(", ")
        };
        println!("  {:<12} {}", label.dimmed(), shown);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// item
// ---------------------------------------------------------------------------

async fn cmd_item(api: &HttpWardrobeApi, id: &str, json: bool) -> Result<()> {
    let item = api.get_item(id).await.context("item lookup failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&item)?);
        return Ok(());
    }

    println!("{}", item.class_name.bold());
    println!(
        "{} {}",
        format!("confidence: {:.0}%", item.confidence * 100.0).dimmed(),
        role_label(&item.class_name).magenta()
    );
    println!();
    println!("{}", "--- Details ---".dimmed());
    println!("  {}  {}", "ID:".dimmed(), item.id.cyan());
    println!("  {}  {}", "Color:".dimmed(), item.color_hex);
    if !item.thickness.is_empty() {
        println!("  {}  {}", "Thickness:".dimmed(), item.thickness);
    }
    if let Some(created) = item.created_at {
        println!(
            "  {}  {}",
            "Added:".dimmed(),
            created.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!("  {}  {}", "Image:".dimmed(), api.image_url(&item.filename));
    if let Some(ref meta) = item.meta {
        println!();
        println!("{}", "--- Meta ---".dimmed());
        println!("{}", serde_json::to_string_pretty(meta)?);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// upload
// ---------------------------------------------------------------------------

async fn cmd_upload<A: WardrobeApi>(api: &A, path: &Path) -> Result<()> {
    let (filename, bytes) = read_photo(path).await?;
    let item = api
        .upload_item(&filename, bytes)
        .await
        .context("upload failed")?;

    println!(
        "{} {} {} ({})",
        "Added".green(),
        item.class_name.bold(),
        item.id.cyan(),
        item.color_hex
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// face
// ---------------------------------------------------------------------------

async fn analyze_face<A: WardrobeApi>(api: &A, photo: &Path) -> Result<FaceRecommendationResponse> {
    let (filename, bytes) = read_photo(photo).await?;
    api.face_recommendations(&filename, bytes)
        .await
        .context("face analysis failed")
}

async fn cmd_face<A: WardrobeApi>(api: &A, photo: &Path, json: bool) -> Result<()> {
    let response = analyze_face(api, photo).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let analysis = &response.face_analysis;
    println!("{}", "Face analysis".bold());
    println!(
        "  {}  {} ({} undertone)",
        "Skin tone:".dimmed(),
        analysis.skin_tone.category.cyan(),
        analysis.skin_tone.undertone_label()
    );
    println!("  {}  {}", "Face shape:".dimmed(), analysis.face_shape.cyan());
    if !response.style_tips.colors.is_empty() {
        println!(
            "  {}  {}",
            "Colors:".dimmed(),
            response.style_tips.colors.join(", ")
        );
    }
    let tips = &response.style_tips.face_shape_tips;
    for (label, values) in [
        ("Necklines:", &tips.necklines),
        ("Collars:", &tips.collars),
        ("Accessories:", &tips.accessories),
    ] {
        if let Some(values) = values.as_ref().filter(|v| !v.is_empty()) {
            println!("  {}  {}", label.dimmed(), values.join(", "));
        }
    }
    println!();

    if response.recommendations.is_empty() {
        println!("{}", "No recommendations returned.".dimmed());
        return Ok(());
    }

    println!(
        "{:<4} {:<20} {:<7} {:<10} {}",
        "#".dimmed(),
        "Item".dimmed(),
        "Score".dimmed(),
        "Thickness".dimmed(),
        "In wardrobe".dimmed()
    );
    println!("{}", "─".repeat(78).dimmed());
    for (i, rec) in response.recommendations.iter().enumerate() {
        println!(
            "{:<4} {:<20} {} {:<10} {}",
            (i + 1).to_string().dimmed(),
            truncate(&rec.item, 20).magenta(),
            score_colored(rec.score, 7.0, 4.0, 7, 1),
            rec.thickness,
            rec.wardrobe_items.len().to_string().cyan()
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// outfits
// ---------------------------------------------------------------------------

async fn cmd_outfits<A: WardrobeApi>(
    api: &A,
    photo: &Path,
    limits: SelectionLimits,
    json: bool,
) -> Result<()> {
    let face = analyze_face(api, photo).await?;
    let response = outfit::recommend_outfits(api, &face.recommendations, limits)
        .await
        .context("outfit recommendation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.outfits.is_empty() {
        println!("{}", "No outfit combinations returned.".dimmed());
        return Ok(());
    }

    println!(
        "{:<4} {:<22} {:<22} {:<7} {}",
        "#".dimmed(),
        "Top".dimmed(),
        "Bottom".dimmed(),
        "Score".dimmed(),
        "Match".dimmed()
    );
    println!("{}", "─".repeat(78).dimmed());
    for (i, o) in response.outfits.iter().enumerate() {
        let top = format!("{} {}", o.top.class_name, o.top.color_hex);
        let bottom = format!("{} {}", o.bottom.class_name, o.bottom.color_hex);
        println!(
            "{:<4} {:<22} {:<22} {} {}",
            (i + 1).to_string().dimmed(),
            truncate(&top, 22),
            truncate(&bottom, 22),
            score_colored(o.compatibility_score, 0.8, 0.6, 7, 2),
            CompatibilityBand::from_score(o.compatibility_score)
                .to_string()
                .dimmed()
        );
    }
    println!();
    println!(
        "{}",
        format!("{} combinations scored", response.total_combinations).dimmed()
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// shop
// ---------------------------------------------------------------------------

async fn cmd_shop<A: WardrobeApi + 'static>(api: Arc<A>, names: &[String], json: bool) -> Result<()> {
    let mut cache = LazyFetchCache::new(api);
    for name in names {
        cache.request(name);
    }
    while cache.next_completion().await.is_some() {}

    if json {
        let results: serde_json::Map<String, serde_json::Value> = names
            .iter()
            .map(|name| {
                let products = match cache.state(name) {
                    FetchState::Resolved(products) => products.to_vec(),
                    _ => Vec::new(),
                };
                Ok((name.clone(), serde_json::to_value(products)?))
            })
            .collect::<Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for name in names {
        println!("{}", name.bold());
        match cache.state(name) {
            FetchState::Resolved(products) if !products.is_empty() => {
                for p in products {
                    println!(
                        "  {:<40} {:<12} {}",
                        truncate(&p.title, 40),
                        p.price.green(),
                        p.link.as_deref().unwrap_or("").dimmed()
                    );
                }
            }
            _ => println!("  {}", "No shop suggestions".dimmed()),
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// weather
// ---------------------------------------------------------------------------

async fn cmd_weather<A: WardrobeApi>(
    api: &A,
    store: &impl PreferenceStore,
    city: &str,
    openweather_key: Option<&str>,
    json: bool,
) -> Result<()> {
    let rec = api
        .weather_recommendation(city, openweather_key)
        .await
        .context("weather recommendation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rec)?);
        return Ok(());
    }

    println!(
        "{} {:.1}°C, {}",
        city.bold(),
        rec.weather.temp_c,
        rec.weather.main.cyan()
    );
    println!();
    for (label, item) in [
        ("Top:", &rec.suggestion.shirt),
        ("Bottom:", &rec.suggestion.pant),
        ("Outer:", &rec.suggestion.outer),
    ] {
        match item {
            Some(item) => println!(
                "  {:<8} {} {} {}",
                label.dimmed(),
                item.class_name.magenta(),
                item.color_hex,
                item.id.dimmed()
            ),
            None => println!("  {:<8} {}", label.dimmed(), "-".dimmed()),
        }
    }

    if !rec.notes.is_empty() {
        println!();
        for note in &rec.notes {
            println!("  {} {}", "•".dimmed(), note);
        }
    }

    match StylePreferences::load(store) {
        Ok(Some(prefs)) if !prefs.is_empty() => {
            let summary: Vec<String> = prefs.iter().map(|(q, a)| format!("{q}={a}")).collect();
            println!();
            println!(
                "{} {}",
                "Style preferences:".dimmed(),
                summary.join(", ")
            );
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "could not read style preferences"),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// prefs
// ---------------------------------------------------------------------------

fn cmd_prefs_show(store: &impl PreferenceStore, json: bool) -> Result<()> {
    let prefs = StylePreferences::load(store)
        .context("failed to read preferences")?
        .unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&prefs)?);
        return Ok(());
    }

    if prefs.is_empty() {
        println!(
            "{}",
            "No style preferences saved. Use `wardrobe prefs set question=option`.".dimmed()
        );
        return Ok(());
    }

    for q in QUIZ_QUESTIONS {
        let answer = prefs.get(q.id).unwrap_or("-");
        println!("  {:<18} {}", q.id.dimmed(), answer.cyan());
    }
    if !prefs.is_complete() {
        println!();
        println!("{}", "Quiz incomplete.".yellow());
    }

    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(q, a)| (q.trim(), a.trim()))
        .filter(|(q, a)| !q.is_empty() && !a.is_empty())
        .ok_or_else(|| anyhow::anyhow!("expected question=option, got '{raw}'"))
}

fn cmd_prefs_set(store: &mut impl PreferenceStore, answers: &[String]) -> Result<()> {
    let mut prefs = StylePreferences::load(store)
        .context("failed to read preferences")?
        .unwrap_or_default();

    // Validate everything before writing anything.
    for raw in answers {
        let (question, option) = parse_assignment(raw)?;
        prefs.answer(question, option)?;
    }
    prefs.save(store).context("failed to save preferences")?;

    println!(
        "{} {} answer(s)",
        "Saved".green(),
        answers.len().to_string().cyan()
    );

    Ok(())
}

fn cmd_prefs_questions() {
    for q in QUIZ_QUESTIONS {
        println!("{} {}", q.id.cyan(), q.question.dimmed());
        println!("  {}", q.options.join(", "));
    }
}

fn cmd_prefs_clear(store: &mut impl PreferenceStore) -> Result<()> {
    store
        .remove(STYLE_PREFERENCES_KEY)
        .context("failed to clear preferences")?;
    println!("{}", "Style preferences cleared.".green());
    Ok(())
}
