// Blog view state and the store that owns it.
// Changes apply to a copy that is swapped in, then listeners are notified in order.

use std::fmt;
use std::sync::Arc;

use crate::archive;
use crate::content::{Post, SkillLevel};
use crate::search::SearchIndex;

/// Shown when a post cannot be found in the loaded set.
pub const NOT_FOUND_MESSAGE: &str = "Post not found. Please try again.";

/// Longest search query kept, in characters.
pub const MAX_QUERY_CHARS: usize = 1000;

/// The filter currently narrowing the post list. Only one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    None,
    Category(String),
    SkillLevel(SkillLevel),
    Search(String),
}

/// One immutable view of the blog.
#[derive(Debug, Clone, Default)]
pub struct BlogState {
    /// Every loaded post, newest first. Filters never replace this.
    pub posts: Vec<Post>,
    pub categories: Vec<String>,
    pub search_query: String,
    pub active_category: Option<String>,
    pub active_skill_level: Option<SkillLevel>,
    /// Zero-based page of the visible list.
    pub current_page: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl BlogState {
    /// Install a freshly loaded post list.
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.categories = archive::available_categories(&posts);
        self.posts = posts;
        self.current_page = 0;
        self.loading = false;
    }

    pub fn filter(&self) -> Filter {
        if !self.search_query.is_empty() {
            Filter::Search(self.search_query.clone())
        } else if let Some(category) = &self.active_category {
            Filter::Category(category.clone())
        } else if let Some(level) = self.active_skill_level {
            Filter::SkillLevel(level)
        } else {
            Filter::None
        }
    }

    /// Filter by category, clearing any other filter. `None` shows everything.
    pub fn select_category(&mut self, category: Option<String>) {
        self.clear_filters();
        self.active_category = category;
    }

    /// Filter by skill level, clearing any other filter.
    pub fn select_skill_level(&mut self, level: Option<SkillLevel>) {
        self.clear_filters();
        self.active_skill_level = level;
    }

    /// Search for `query`, clearing any other filter. A blank query clears the search.
    /// The query is trimmed and cut to `MAX_QUERY_CHARS`.
    pub fn set_search_query(&mut self, query: &str) {
        self.clear_filters();
        self.search_query = query.trim().chars().take(MAX_QUERY_CHARS).collect();
    }

    pub fn clear_filters(&mut self) {
        self.search_query.clear();
        self.active_category = None;
        self.active_skill_level = None;
        self.current_page = 0;
        self.error = None;
    }

    /// Heading for the visible list.
    pub fn section_title(&self) -> String {
        match self.filter() {
            Filter::None => "Featured Posts".to_string(),
            Filter::Category(category) => format!("Category: {}", category),
            Filter::SkillLevel(level) => format!("Skill Level: {}", level),
            Filter::Search(query) => format!("Search Results for \"{}\"", query),
        }
    }

    /// Posts passing the active filter, in `posts` order.
    /// `index` must have been built from `self.posts`.
    pub fn visible_posts(&self, index: &SearchIndex) -> Vec<Post> {
        match self.filter() {
            Filter::None => self.posts.clone(),
            Filter::Category(category) => archive::posts_by_category(&self.posts, &category),
            Filter::SkillLevel(level) => archive::posts_by_skill_level(&self.posts, level),
            Filter::Search(query) => index.search(&query, &self.posts),
        }
    }

    pub fn find_post(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Look up a post to open, recording the not-found message when it is missing.
    pub fn open_post(&mut self, id: u64) -> Option<Post> {
        let post = self.find_post(id).cloned();
        self.error = match post {
            Some(_) => None,
            None => Some(NOT_FOUND_MESSAGE.to_string()),
        };
        post
    }

    /// The current page of `visible`.
    pub fn page<'a>(&self, visible: &'a [Post], per_page: usize) -> &'a [Post] {
        let per_page = per_page.max(1);
        let start = (self.current_page * per_page).min(visible.len());
        let end = (start + per_page).min(visible.len());
        &visible[start..end]
    }

    pub fn next_page(&mut self, total: usize, per_page: usize) {
        if self.current_page + 1 < page_count(total, per_page) {
            self.current_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1);
    }
}

/// Number of pages needed for `total` posts; at least one.
pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

/// Called with the new snapshot after every update.
pub type Listener = Box<dyn Fn(&BlogState) + Send + Sync>;

/// State container for the blog view.
pub struct BlogStore {
    state: Arc<BlogState>,
    listeners: Vec<Listener>,
}

impl BlogStore {
    pub fn new() -> Self {
        Self::with_state(BlogState::default())
    }

    pub fn with_state(state: BlogState) -> Self {
        Self {
            state: Arc::new(state),
            listeners: Vec::new(),
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<BlogState> {
        Arc::clone(&self.state)
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&BlogState) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Apply `change` to a copy of the state, publish it and notify listeners.
    pub fn update<F>(&mut self, change: F) -> Arc<BlogState>
    where
        F: FnOnce(&mut BlogState),
    {
        let mut next = BlogState::clone(&self.state);
        change(&mut next);
        self.state = Arc::new(next);
        for listener in &self.listeners {
            listener(&self.state);
        }
        self.state()
    }
}

impl Default for BlogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BlogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlogStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
