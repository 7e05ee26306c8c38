// App state and main event loop.
// Manages tabs, the blog store, background loads and keyboard input handling.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::archive::{self, YearGroup};
use crate::config::{Config, Features};
use crate::content::{ContentStore, Post, SkillLevel};
use crate::render;
use crate::search::SearchIndex;
use crate::state::{
    BlogStore, LoadingState, MAX_QUERY_CHARS, NavigationStack, SelectableList, ViewLevel,
};
use crate::ui;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Posts,
    Categories,
    Archive,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Posts => "Posts",
            Tab::Categories => "Categories",
            Tab::Archive => "Archive",
        }
    }

    /// Tabs shown for the given feature set, in display order.
    pub fn enabled(features: &Features) -> Vec<Tab> {
        let mut tabs = vec![Tab::Posts];
        if features.categories {
            tabs.push(Tab::Categories);
        }
        if features.archive {
            tabs.push(Tab::Archive);
        }
        tabs
    }

    pub fn next(&self, features: &Features) -> Self {
        let tabs = Tab::enabled(features);
        let i = tabs.iter().position(|t| t == self).unwrap_or(0);
        tabs[(i + 1) % tabs.len()]
    }

    pub fn prev(&self, features: &Features) -> Self {
        let tabs = Tab::enabled(features);
        let i = tabs.iter().position(|t| t == self).unwrap_or(0);
        tabs[(i + tabs.len() - 1) % tabs.len()]
    }
}

/// A row in the archive tab; what it holds depends on the navigation level.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveItem {
    Year { year: i32, count: usize },
    Month { year: i32, month: u32, name: &'static str, count: usize },
    Post(Post),
}

/// The post overlay.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub body: Vec<Line<'static>>,
    pub scroll: u16,
}

/// Results of background work, delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    PostsLoaded(Vec<Post>),
    ConnectionChecked(bool),
}

/// Main application state.
pub struct App {
    pub config: Config,
    store: Arc<ContentStore>,
    /// Blog view state; every change goes through `blog.update`.
    pub blog: BlogStore,
    pub index: SearchIndex,
    /// Currently active tab.
    pub active_tab: Tab,
    /// Current page of the filtered posts.
    pub posts: SelectableList<Post>,
    /// Number of posts passing the active filter.
    pub visible_total: usize,
    /// Categories with their post counts.
    pub categories: SelectableList<(String, usize)>,
    pub archive: Vec<YearGroup>,
    pub archive_nav: NavigationStack,
    pub archive_items: SelectableList<ArchiveItem>,
    pub post_view: Option<PostView>,
    pub search_active: bool,
    pub search_input: String,
    /// Whether the remote host answered the last probe.
    pub online: LoadingState<bool>,
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: Config, store: Arc<ContentStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut blog = BlogStore::new();
        blog.subscribe(|state| {
            debug!(
                posts = state.posts.len(),
                filter = ?state.filter(),
                page = state.current_page,
                loading = state.loading,
                "view state updated"
            );
        });

        Self {
            config,
            store,
            blog,
            index: SearchIndex::new(),
            active_tab: Tab::default(),
            posts: SelectableList::new(),
            visible_total: 0,
            categories: SelectableList::new(),
            archive: Vec::new(),
            archive_nav: NavigationStack::default(),
            archive_items: SelectableList::new(),
            post_view: None,
            search_active: false,
            search_input: String::new(),
            online: LoadingState::Idle,
            show_help: false,
            should_quit: false,
            tx,
            rx,
        }
    }

    /// Main event loop. Must be called inside a tokio runtime.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.reload();
        while !self.should_quit {
            self.drain_events();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Start loading posts and probing the host in the background.
    pub fn reload(&mut self) {
        self.blog.update(|s| {
            s.loading = true;
            s.error = None;
        });
        self.online = LoadingState::Loading;

        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let online = store.check_connection().await;
            let _ = tx.send(AppEvent::ConnectionChecked(online));
            let posts = store.get_posts().await;
            let _ = tx.send(AppEvent::PostsLoaded(posts));
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
        }
    }

    /// Fold a background result into the state.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PostsLoaded(posts) => {
                self.index.rebuild(&posts);
                info!(posts = posts.len(), words = self.index.word_count(), "posts indexed");
                self.blog.update(|s| s.set_posts(posts));
                self.archive_nav.reset();
                self.refresh();
            }
            AppEvent::ConnectionChecked(online) => {
                self.online = LoadingState::Loaded(online);
            }
        }
    }

    /// Recompute every derived list from the current snapshot.
    fn refresh(&mut self) {
        let state = self.blog.state();
        let per_page = self.config.content.posts_per_page;

        let visible = state.visible_posts(&self.index);
        self.visible_total = visible.len();
        self.posts.set_items(state.page(&visible, per_page).to_vec());

        let categories = state
            .categories
            .iter()
            .map(|c| (c.clone(), archive::posts_by_category(&state.posts, c).len()))
            .collect();
        self.categories.set_items(categories);

        self.archive = archive::organize_by_year(&state.posts);
        self.refresh_archive();
    }

    fn refresh_archive(&mut self) {
        let state = self.blog.state();
        let items = match self.archive_nav.current() {
            ViewLevel::Years => self
                .archive
                .iter()
                .map(|y| ArchiveItem::Year {
                    year: y.year,
                    count: y.post_count(),
                })
                .collect(),
            ViewLevel::Months { year } => self
                .archive
                .iter()
                .filter(|y| y.year == *year)
                .flat_map(|y| y.months.iter())
                .map(|m| ArchiveItem::Month {
                    year: *year,
                    month: m.month,
                    name: m.name,
                    count: m.post_ids.len(),
                })
                .collect(),
            ViewLevel::Posts { year, month } => {
                let mut posts = archive::posts_by_month(&state.posts, *year, *month);
                posts.sort_by(|a, b| b.date.cmp(&a.date));
                posts.into_iter().map(ArchiveItem::Post).collect()
            }
        };
        self.archive_items.set_items(items);
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.search_active {
            self.handle_search_key(key.code);
        } else if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
        } else if self.post_view.is_some() {
            self.handle_post_key(key.code);
        } else {
            self.handle_list_key(key.code);
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.search_active = false;
                self.search_input.clear();
            }
            KeyCode::Enter => {
                self.search_active = false;
                let query = std::mem::take(&mut self.search_input);
                self.blog.update(|s| s.set_search_query(&query));
                self.active_tab = Tab::Posts;
                self.refresh();
            }
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(c) if self.search_input.chars().count() < MAX_QUERY_CHARS => {
                self.search_input.push(c)
            }
            _ => {}
        }
    }

    fn handle_post_key(&mut self, code: KeyCode) {
        let Some(view) = self.post_view.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.post_view = None,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => view.scroll = view.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => view.scroll = view.scroll.saturating_sub(1),
            KeyCode::PageDown => view.scroll = view.scroll.saturating_add(20),
            KeyCode::PageUp => view.scroll = view.scroll.saturating_sub(20),
            KeyCode::Home | KeyCode::Char('g') => view.scroll = 0,
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        let features = self.config.features.clone();
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.active_tab = self.active_tab.next(&features),
            KeyCode::BackTab => self.active_tab = self.active_tab.prev(&features),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Enter => self.activate(),
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('/') if features.search => {
                self.search_active = true;
                self.search_input = self.blog.state().search_query.clone();
            }
            KeyCode::Char('c') if features.categories => self.cycle_category(),
            KeyCode::Char('l') if features.skill_levels => self.cycle_skill_level(),
            KeyCode::Char('n') | KeyCode::Right => {
                let (total, per_page) = (self.visible_total, self.config.content.posts_per_page);
                self.blog.update(|s| s.next_page(total, per_page));
                self.refresh();
            }
            KeyCode::Char('p') | KeyCode::Left => {
                self.blog.update(|s| s.prev_page());
                self.refresh();
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('x') => {
                self.store.clear_cache();
                self.reload();
            }
            _ => {}
        }
    }

    fn select_next(&mut self) {
        match self.active_tab {
            Tab::Posts => self.posts.select_next(),
            Tab::Categories => self.categories.select_next(),
            Tab::Archive => self.archive_items.select_next(),
        }
    }

    fn select_prev(&mut self) {
        match self.active_tab {
            Tab::Posts => self.posts.select_prev(),
            Tab::Categories => self.categories.select_prev(),
            Tab::Archive => self.archive_items.select_prev(),
        }
    }

    /// Enter: open a post, apply a category or drill into the archive.
    fn activate(&mut self) {
        match self.active_tab {
            Tab::Posts => {
                if let Some(id) = self.posts.selected_item().map(|p| p.id) {
                    self.open_post(id);
                }
            }
            Tab::Categories => {
                if let Some((category, _)) = self.categories.selected_item().cloned() {
                    self.blog.update(|s| s.select_category(Some(category)));
                    self.active_tab = Tab::Posts;
                    self.refresh();
                }
            }
            Tab::Archive => match self.archive_items.selected_item().cloned() {
                Some(ArchiveItem::Year { year, .. }) => {
                    self.archive_nav.push(ViewLevel::Months { year });
                    self.refresh_archive();
                }
                Some(ArchiveItem::Month { year, month, .. }) => {
                    self.archive_nav.push(ViewLevel::Posts { year, month });
                    self.refresh_archive();
                }
                Some(ArchiveItem::Post(post)) => self.open_post(post.id),
                None => {}
            },
        }
    }

    /// Esc: leave an archive level, otherwise drop the active filter.
    fn go_back(&mut self) {
        if self.active_tab == Tab::Archive && self.archive_nav.pop() {
            self.refresh_archive();
        } else {
            self.blog.update(|s| s.clear_filters());
            self.refresh();
        }
    }

    pub fn open_post(&mut self, id: u64) {
        let mut opened = None;
        self.blog.update(|s| opened = s.open_post(id));
        self.post_view = opened.map(|post| PostView {
            body: render::to_lines(&post.content),
            post,
            scroll: 0,
        });
    }

    /// Step the category filter through every category, then back to none.
    fn cycle_category(&mut self) {
        let state = self.blog.state();
        let next = match &state.active_category {
            None => state.categories.first().cloned(),
            Some(current) => state
                .categories
                .iter()
                .skip_while(|c| *c != current)
                .nth(1)
                .cloned(),
        };
        self.blog.update(|s| s.select_category(next));
        self.refresh();
    }

    /// Step the skill level filter through every level, then back to none.
    fn cycle_skill_level(&mut self) {
        let state = self.blog.state();
        let levels = archive::available_skill_levels(&state.posts);
        let next: Option<SkillLevel> = match state.active_skill_level {
            None => levels.first().copied(),
            Some(current) => levels.iter().skip_while(|l| **l != current).nth(1).copied(),
        };
        self.blog.update(|s| s.select_skill_level(next));
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fallback_posts;
    use crossterm::event::KeyModifiers;

    fn app_with(config: Config) -> App {
        let store = Arc::new(ContentStore::new(&config).unwrap());
        let mut app = App::new(config, store);
        app.apply(AppEvent::PostsLoaded(fallback_posts()));
        app
    }

    fn app() -> App {
        app_with(Config::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_tab_cycle_respects_features() {
        let mut features = Features::default();
        assert_eq!(Tab::Posts.next(&features), Tab::Categories);
        assert_eq!(Tab::Posts.prev(&features), Tab::Archive);

        features.categories = false;
        assert_eq!(Tab::Posts.next(&features), Tab::Archive);
        assert_eq!(Tab::Archive.next(&features), Tab::Posts);

        features.archive = false;
        assert_eq!(Tab::Posts.next(&features), Tab::Posts);
    }

    #[test]
    fn test_posts_loaded_fills_views() {
        let app = app();
        assert_eq!(app.visible_total, 3);
        assert_eq!(app.posts.len(), 3);
        assert!(!app.blog.state().loading);
        assert_eq!(app.categories.len(), app.blog.state().categories.len());
        assert!(!app.archive_items.is_empty());
    }

    #[test]
    fn test_search_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert!(app.search_active);

        type_text(&mut app, "pythonx");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert!(!app.search_active);
        assert_eq!(app.blog.state().search_query, "python");
        assert_eq!(app.visible_total, 1);
        assert_eq!(app.blog.state().posts.len(), 3);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.visible_total, 3);
    }

    #[test]
    fn test_search_input_is_capped() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, &"a".repeat(MAX_QUERY_CHARS + 50));
        assert_eq!(app.search_input.chars().count(), MAX_QUERY_CHARS);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.blog.state().search_query.chars().count(), MAX_QUERY_CHARS);
    }

    #[test]
    fn test_search_disabled() {
        let mut config = Config::default();
        config.features.search = false;
        let mut app = app_with(config);
        press(&mut app, KeyCode::Char('/'));
        assert!(!app.search_active);
    }

    #[test]
    fn test_open_and_close_post() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        let view = app.post_view.as_ref().unwrap();
        assert_eq!(view.post.id, app.posts.items[0].id);
        assert!(!view.body.is_empty());

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.post_view.as_ref().unwrap().scroll, 1);

        press(&mut app, KeyCode::Esc);
        assert!(app.post_view.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_open_missing_post() {
        let mut app = app();
        app.open_post(404);
        assert!(app.post_view.is_none());
        assert_eq!(
            app.blog.state().error.as_deref(),
            Some(crate::state::NOT_FOUND_MESSAGE)
        );
    }

    #[test]
    fn test_category_selection_switches_to_posts() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_tab, Tab::Categories);

        let (category, count) = app.categories.items[0].clone();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.active_tab, Tab::Posts);
        assert_eq!(app.visible_total, count);
        assert_eq!(app.blog.state().section_title(), format!("Category: {}", category));
    }

    #[test]
    fn test_cycle_category_wraps_to_none() {
        let mut app = app();
        let categories = app.blog.state().categories.clone();
        for category in &categories {
            press(&mut app, KeyCode::Char('c'));
            assert_eq!(app.blog.state().active_category.as_ref(), Some(category));
        }
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.blog.state().active_category, None);
    }

    #[test]
    fn test_archive_drill_down() {
        let mut app = app();
        app.active_tab = Tab::Archive;

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.archive_nav.current(), ViewLevel::Months { .. }));
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.archive_nav.current(), ViewLevel::Posts { .. }));
        assert!(matches!(
            app.archive_items.selected_item(),
            Some(ArchiveItem::Post(_))
        ));

        press(&mut app, KeyCode::Enter);
        assert!(app.post_view.is_some());
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.archive_nav.current(), &ViewLevel::Years);
    }

    #[test]
    fn test_pagination_keys() {
        let mut config = Config::default();
        config.content.posts_per_page = 2;
        let mut app = app_with(config);
        assert_eq!(app.posts.len(), 2);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.blog.state().current_page, 1);
        assert_eq!(app.posts.len(), 1);

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.posts.len(), 2);
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
