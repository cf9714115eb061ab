use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use wardrobe_core::api::{HttpWardrobeApi, WardrobeApi};
use wardrobe_core::catalog::{CatalogStore, Facets, FilterQuery};
use wardrobe_core::config::WardrobeConfig;
use wardrobe_core::lazy_fetch::LazyFetchCache;
use wardrobe_core::model::*;
use wardrobe_core::visibility::{ElementHandle, Span, ViewportObserver, Viewport, VisibilityTrigger};

use super::event::{AsyncAction, AsyncResult};

/// Layout units per terminal row, so the configured margin reads in the
/// same units a graphical front end would use.
pub const ROW_UNITS: u32 = 20;
/// Rows each recommendation entry occupies: header, three product lines, gap.
pub const ENTRY_ROWS: u16 = 5;
/// Product lines shown per entry.
pub const SHOP_PREVIEW: usize = 3;

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Wardrobe,
    Detail,
    Recommendations,
    Outfits,
    Status,
}

/// Input mode within the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Filter,
}

/// Facet focused while in filter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetField {
    Category,
    Color,
    Thickness,
}

impl FacetField {
    pub const ALL: [FacetField; 3] = [Self::Category, Self::Color, Self::Thickness];

    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Color => "Color",
            Self::Thickness => "Thickness",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Category => Self::Color,
            Self::Color => Self::Thickness,
            Self::Thickness => Self::Category,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Category => Self::Thickness,
            Self::Color => Self::Category,
            Self::Thickness => Self::Color,
        }
    }
}

/// The application as driven by the real backend.
pub type TuiApp = App<HttpWardrobeApi>;

/// Central application state.
pub struct App<A> {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub loading: bool,

    // -- Wardrobe state --
    pub catalog_limit: usize,
    pub catalog: CatalogStore,
    pub facets: Facets,
    pub filter: FilterQuery,
    pub filter_field: FacetField,
    pub visible: Vec<WardrobeItem>,
    pub selected: usize,
    pub search_cursor: usize,

    // -- Detail state --
    pub detail: Option<WardrobeItem>,

    // -- Recommendations state --
    pub face: Option<FaceRecommendationResponse>,
    pub analyzing: bool,
    pub rec_selected: usize,
    pub rec_scroll: u16,
    pub viewport_rows: u16,
    pub shop: LazyFetchCache<A>,
    pub trigger: VisibilityTrigger,
    entered_tx: mpsc::UnboundedSender<String>,
    entered_rx: mpsc::UnboundedReceiver<String>,

    // -- Outfit state --
    pub outfits: Option<OutfitRecommendationResponse>,
    pub outfit_selected: usize,

    // -- Error toast --
    pub error_message: Option<String>,
    pub error_timer: u8, // ticks remaining
}

impl<A: WardrobeApi + 'static> App<A> {
    pub fn new(api: Arc<A>, config: &WardrobeConfig) -> Self {
        let catalog = CatalogStore::default();
        let (entered_tx, entered_rx) = mpsc::unbounded_channel();
        Self {
            screen: Screen::Wardrobe,
            input_mode: InputMode::Normal,
            should_quit: false,
            loading: true,

            catalog_limit: config.catalog.limit,
            facets: catalog.facets(),
            catalog,
            filter: FilterQuery::default(),
            filter_field: FacetField::Category,
            visible: Vec::new(),
            selected: 0,
            search_cursor: 0,

            detail: None,

            face: None,
            analyzing: false,
            rec_selected: 0,
            rec_scroll: 0,
            viewport_rows: 0,
            shop: LazyFetchCache::new(api),
            trigger: VisibilityTrigger::new(config.visibility.margin),
            entered_tx,
            entered_rx,

            outfits: None,
            outfit_selected: 0,

            error_message: None,
            error_timer: 0,
        }
    }

    /// Process an async result from the worker.
    pub fn handle_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::Wardrobe(items) => {
                self.catalog = CatalogStore::new(items);
                self.facets = self.catalog.facets();
                self.refilter();
                self.loading = false;
            }
            AsyncResult::Face(response) => {
                self.face = Some(*response);
                self.analyzing = false;
                self.rec_selected = 0;
                self.rec_scroll = 0;
                if self.screen == Screen::Recommendations {
                    self.arm_trigger();
                } else {
                    self.set_screen(Screen::Recommendations);
                }
            }
            AsyncResult::Outfits(response) => {
                self.outfits = Some(response);
                self.outfit_selected = 0;
                self.loading = false;
                self.set_screen(Screen::Outfits);
            }
            AsyncResult::Error(msg) => {
                self.error_message = Some(msg);
                self.error_timer = 100; // ~5s at 50ms tick
                self.loading = false;
                self.analyzing = false;
            }
        }
    }

    /// Feed the current recommendations viewport to the visibility trigger and
    /// start shop lookups for entries that scrolled into view.
    pub fn sync_visibility(&mut self) {
        if self.screen != Screen::Recommendations || self.viewport_rows == 0 {
            return;
        }
        let viewport = Viewport::new(
            u32::from(self.rec_scroll) * ROW_UNITS,
            u32::from(self.viewport_rows) * ROW_UNITS,
        );
        self.trigger.update_viewport(viewport);
        while let Ok(key) = self.entered_rx.try_recv() {
            self.shop.request(&key);
        }
    }

    /// Apply shop lookups that finished since the last frame.
    pub fn poll_shop(&mut self) {
        self.shop.poll_completions();
    }

    pub fn recommendations(&self) -> &[RankedRecommendation] {
        self.face
            .as_ref()
            .map(|f| f.recommendations.as_slice())
            .unwrap_or_default()
    }

    /// Observe every recommendation entry; entries that scroll into view are
    /// queued for the shop cache through the enter callback.
    fn arm_trigger(&mut self) {
        self.trigger.disconnect();
        let tx = self.entered_tx.clone();
        self.trigger.on_enter(Box::new(move |event| {
            let _ = tx.send(event.key.clone());
        }));
        let keys: Vec<String> = self
            .recommendations()
            .iter()
            .map(|r| r.item.clone())
            .collect();
        for (i, key) in keys.iter().enumerate() {
            self.trigger
                .observe(key, ElementHandle(i as u64), entry_span(i));
        }
    }

    /// Switch screens. Observations live only while recommendations are shown.
    fn set_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        if self.screen == Screen::Recommendations {
            self.trigger.disconnect();
        } else if screen == Screen::Recommendations {
            self.arm_trigger();
        }
        self.screen = screen;
    }

    /// Handle a key event. Returns an optional async action to dispatch.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match (&self.screen, &self.input_mode) {
            (Screen::Wardrobe, InputMode::Normal) => self.handle_wardrobe_normal(key),
            (Screen::Wardrobe, InputMode::Search) => {
                self.handle_wardrobe_search(key);
                None
            }
            (Screen::Wardrobe, InputMode::Filter) => {
                self.handle_wardrobe_filter(key);
                None
            }
            (Screen::Detail, _) => {
                self.handle_detail(key);
                None
            }
            (Screen::Recommendations, _) => self.handle_recommendations(key),
            (Screen::Outfits, _) => {
                self.handle_outfits(key);
                None
            }
            (Screen::Status, _) => {
                self.handle_status(key);
                None
            }
        }
    }

    fn handle_wardrobe_normal(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('G') => {
                let len = self.visible.len();
                if len > 0 {
                    self.selected = len - 1;
                }
                None
            }
            KeyCode::Char('g') => {
                self.selected = 0;
                None
            }
            KeyCode::PageDown => {
                self.move_selection(20);
                None
            }
            KeyCode::PageUp => {
                self.move_selection(-20);
                None
            }
            KeyCode::Enter => {
                if let Some(item) = self.visible.get(self.selected) {
                    self.detail = Some(item.clone());
                    self.screen = Screen::Detail;
                }
                None
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.search_cursor = self.filter.query.len();
                None
            }
            KeyCode::Char('f') => {
                self.input_mode = InputMode::Filter;
                None
            }
            KeyCode::Tab => {
                self.set_screen(Screen::Recommendations);
                None
            }
            KeyCode::Char('r') => {
                self.loading = true;
                Some(AsyncAction::LoadWardrobe {
                    limit: self.catalog_limit,
                })
            }
            KeyCode::Char('o') => self.request_outfits(),
            KeyCode::Esc => {
                if self.filter.is_active() {
                    self.filter.clear();
                    self.search_cursor = 0;
                    self.refilter();
                }
                None
            }
            _ => None,
        }
    }

    fn handle_wardrobe_search(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                if let Some(c) = self.filter.query[..self.search_cursor].chars().next_back() {
                    self.search_cursor -= c.len_utf8();
                    self.filter.query.remove(self.search_cursor);
                    self.refilter();
                }
            }
            KeyCode::Left => {
                if let Some(c) = self.filter.query[..self.search_cursor].chars().next_back() {
                    self.search_cursor -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = self.filter.query[self.search_cursor..].chars().next() {
                    self.search_cursor += c.len_utf8();
                }
            }
            KeyCode::Char(c) => {
                self.filter.query.insert(self.search_cursor, c);
                self.search_cursor += c.len_utf8();
                self.refilter();
            }
            _ => {}
        }
    }

    fn handle_wardrobe_filter(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('f') => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Right | KeyCode::Char('l') => self.cycle_facet(1),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_facet(-1),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.filter_field = self.filter_field.next();
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                self.filter_field = self.filter_field.prev();
            }
            _ => {}
        }
    }

    fn handle_detail(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => {
                self.screen = Screen::Wardrobe;
                self.detail = None;
            }
            _ => {}
        }
    }

    fn handle_recommendations(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        let len = self.recommendations().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if len > 0 {
                    self.rec_selected = (self.rec_selected + 1).min(len - 1);
                }
                self.scroll_to_selected();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.rec_selected = self.rec_selected.saturating_sub(1);
                self.scroll_to_selected();
            }
            KeyCode::Char('G') => {
                self.rec_selected = len.saturating_sub(1);
                self.scroll_to_selected();
            }
            KeyCode::Char('g') => {
                self.rec_selected = 0;
                self.scroll_to_selected();
            }
            KeyCode::PageDown => {
                self.rec_scroll = self
                    .rec_scroll
                    .saturating_add(self.viewport_rows)
                    .min(self.max_rec_scroll());
            }
            KeyCode::PageUp => {
                self.rec_scroll = self.rec_scroll.saturating_sub(self.viewport_rows);
            }
            KeyCode::Char('o') => return self.request_outfits(),
            KeyCode::Tab => self.set_screen(Screen::Status),
            KeyCode::Esc => self.set_screen(Screen::Wardrobe),
            _ => {}
        }
        None
    }

    fn handle_outfits(&mut self, key: KeyEvent) {
        let len = self.outfits.as_ref().map_or(0, |o| o.outfits.len());
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if len > 0 {
                    self.outfit_selected = (self.outfit_selected + 1).min(len - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.outfit_selected = self.outfit_selected.saturating_sub(1);
            }
            KeyCode::Esc => {
                let back = if self.face.is_some() {
                    Screen::Recommendations
                } else {
                    Screen::Wardrobe
                };
                self.set_screen(back);
            }
            _ => {}
        }
    }

    fn handle_status(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Tab => self.screen = Screen::Wardrobe,
            _ => {}
        }
    }

    fn request_outfits(&mut self) -> Option<AsyncAction> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(AsyncAction::RecommendOutfits {
            recommendations: self.recommendations().to_vec(),
        })
    }

    fn cycle_facet(&mut self, delta: isize) {
        let (values, current) = match self.filter_field {
            FacetField::Category => (&self.facets.categories, &mut self.filter.category),
            FacetField::Color => (&self.facets.colors, &mut self.filter.color),
            FacetField::Thickness => (&self.facets.thicknesses, &mut self.filter.thickness),
        };
        if values.is_empty() {
            return;
        }
        let len = values.len() as isize;
        let index = values.iter().position(|v| v == current).unwrap_or(0) as isize;
        let next = (index + delta).rem_euclid(len) as usize;
        *current = values[next].clone();
        self.refilter();
    }

    fn scroll_to_selected(&mut self) {
        let top = self.rec_selected as u16 * ENTRY_ROWS;
        let bottom = top + ENTRY_ROWS;
        if top < self.rec_scroll {
            self.rec_scroll = top;
        } else if self.viewport_rows > 0 && bottom > self.rec_scroll + self.viewport_rows {
            self.rec_scroll = bottom.saturating_sub(self.viewport_rows);
        }
    }

    fn max_rec_scroll(&self) -> u16 {
        let total = self.recommendations().len() as u16 * ENTRY_ROWS;
        total.saturating_sub(self.viewport_rows)
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.visible.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let current = self.selected as i32;
        let new = (current + delta).clamp(0, len as i32 - 1);
        self.selected = new as usize;
    }

    /// Recompute the visible items from the current filter.
    pub fn refilter(&mut self) {
        self.visible = self.catalog.filter(&self.filter);
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    /// Category counts for the status view, most common first.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        use std::collections::HashMap;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for item in self.catalog.items() {
            *counts.entry(item.category()).or_default() += 1;
        }
        let mut sorted: Vec<_> = counts.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted
    }

    /// Value currently selected for a facet.
    pub fn facet_value(&self, field: FacetField) -> &str {
        match field {
            FacetField::Category => &self.filter.category,
            FacetField::Color => &self.filter.color,
            FacetField::Thickness => &self.filter.thickness,
        }
    }

    /// Tick the error timer down.
    pub fn tick_error(&mut self) {
        if self.error_timer > 0 {
            self.error_timer -= 1;
            if self.error_timer == 0 {
                self.error_message = None;
            }
        }
    }
}

/// Layout extent of the `index`th recommendation entry.
pub fn entry_span(index: usize) -> Span {
    let rows = u32::from(ENTRY_ROWS);
    Span::new(index as u32 * rows * ROW_UNITS, rows * ROW_UNITS)
}
