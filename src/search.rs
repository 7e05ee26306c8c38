// Keyword search over posts.
// An inverted word index with an OR query, plus a field-scoped substring search.

use std::collections::{BTreeSet, HashMap};

use crate::content::Post;

/// Tokens this short carry no signal.
const MIN_TOKEN_LEN: usize = 3;

/// Split text on runs of non-word characters, lower-cased, dropping short tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
        .collect()
}

fn searchable_text(post: &Post) -> String {
    [
        post.title.as_str(),
        post.excerpt.as_str(),
        post.category.as_str(),
        post.content.plain_text().as_str(),
        post.tags.join(" ").as_str(),
    ]
    .join("\n")
}

/// A post field that `advanced_search` can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchField {
    Title,
    Excerpt,
    Content,
    Category,
    Tags,
}

impl SearchField {
    fn matches(&self, post: &Post, needle: &str) -> bool {
        let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
        match self {
            SearchField::Title => contains(&post.title),
            SearchField::Excerpt => contains(&post.excerpt),
            SearchField::Content => contains(&post.content.plain_text()),
            SearchField::Category => contains(&post.category),
            SearchField::Tags => post.tags.iter().any(|tag| contains(tag)),
        }
    }
}

/// Word → positions of the posts containing it.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    index: HashMap<String, BTreeSet<usize>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index for `posts`.
    pub fn build(posts: &[Post]) -> Self {
        let mut index: HashMap<String, BTreeSet<usize>> = HashMap::new();
        for (position, post) in posts.iter().enumerate() {
            for word in tokenize(&searchable_text(post)) {
                index.entry(word).or_default().insert(position);
            }
        }
        Self { index }
    }

    /// Replace the index with one built from `posts`.
    /// The new index is built aside and swapped in whole.
    pub fn rebuild(&mut self, posts: &[Post]) {
        *self = Self::build(posts);
    }

    pub fn word_count(&self) -> usize {
        self.index.len()
    }

    /// Posts containing any query token, in `posts` order.
    /// Falls back to a substring match on title, excerpt and category when
    /// the index finds nothing. An empty query returns `posts` unchanged.
    pub fn search(&self, query: &str, posts: &[Post]) -> Vec<Post> {
        if query.trim().is_empty() {
            return posts.to_vec();
        }

        let mut hits = BTreeSet::new();
        for term in tokenize(query) {
            if let Some(positions) = self.index.get(&term) {
                hits.extend(positions.iter().copied());
            }
        }

        let results: Vec<Post> = hits
            .into_iter()
            .filter_map(|position| posts.get(position).cloned())
            .collect();

        if !results.is_empty() {
            return results;
        }

        let needle = query.trim().to_lowercase();
        posts
            .iter()
            .filter(|post| {
                [SearchField::Title, SearchField::Excerpt, SearchField::Category]
                    .iter()
                    .any(|field| field.matches(post, &needle))
            })
            .cloned()
            .collect()
    }
}

/// Case-insensitive substring search restricted to `fields`, independent of any index.
pub fn advanced_search(query: &str, posts: &[Post], fields: &[SearchField]) -> Vec<Post> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return posts.to_vec();
    }
    posts
        .iter()
        .filter(|post| fields.iter().any(|field| field.matches(post, &needle)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, ContentBlock, SkillLevel, fallback_posts};
    use chrono::NaiveDate;
    use clap::ValueEnum;

    fn post(id: u64, title: &str, excerpt: &str, category: &str, tags: &[&str]) -> Post {
        Post {
            id,
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            content: Content::Markup(String::new()),
            category: category.to_string(),
            skill_level: SkillLevel::Beginner,
            date: NaiveDate::from_ymd_opt(2024, 1, id as u32).unwrap(),
            read_time: "1 min read".to_string(),
            slug: format!("post-{}", id),
            published: true,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            icon: None,
        }
    }

    fn corpus() -> Vec<Post> {
        let mut with_blocks = post(4, "Loops", "Repeat things", "Basics", &[]);
        with_blocks.content = Content::Blocks(vec![ContentBlock::Paragraph {
            text: "A Python for-loop walks a list.".to_string(),
        }]);
        vec![
            post(1, "Python Basics", "Start here", "Python Basics", &["python"]),
            post(2, "HTML & CSS", "Your first page", "Web Development", &["html"]),
            post(3, "Git for beginners", "Version control", "Tools", &["git", "PYTHON"]),
            with_blocks,
        ]
    }

    fn ids(posts: &[Post]) -> Vec<u64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Hello, World! an id_x C++ rust-lang"),
            vec!["hello", "world", "id_x", "rust", "lang"]
        );
    }

    #[test]
    fn test_search_matches_every_field() {
        let posts = corpus();
        let index = SearchIndex::build(&posts);

        // title/category, tags (case-insensitive), block content
        assert_eq!(ids(&index.search("python", &posts)), vec![1, 3, 4]);
    }

    #[test]
    fn test_search_or_semantics_without_duplicates() {
        let posts = corpus();
        let index = SearchIndex::build(&posts);
        assert_eq!(ids(&index.search("html python", &posts)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_query_returns_input() {
        let posts = corpus();
        let index = SearchIndex::build(&posts);
        assert_eq!(index.search("", &posts), posts);
        assert_eq!(index.search("   ", &posts), posts);
    }

    #[test]
    fn test_short_query_falls_back_to_substring() {
        let posts = corpus();
        let index = SearchIndex::build(&posts);
        // "ML" is dropped by the tokenizer; the substring check finds "HTML".
        assert_eq!(ids(&index.search("ML", &posts)), vec![2]);
        assert!(index.search("zzz", &posts).is_empty());
    }

    #[test]
    fn test_rebuild_replaces_index() {
        let posts = corpus();
        let mut index = SearchIndex::build(&posts);
        let words = index.word_count();

        let fallback = fallback_posts();
        index.rebuild(&fallback);
        assert_ne!(index.word_count(), words);
        assert!(index.search("loop", &fallback).is_empty());
        assert_eq!(ids(&index.search("python", &fallback)), vec![2]);
    }

    #[test]
    fn test_advanced_search_scoped() {
        let posts = corpus();
        assert_eq!(
            ids(&advanced_search("python", &posts, &[SearchField::Title])),
            vec![1]
        );
        assert_eq!(
            ids(&advanced_search("python", &posts, &[SearchField::Tags])),
            vec![1, 3]
        );
        assert_eq!(
            ids(&advanced_search("for-loop", &posts, SearchField::value_variants())),
            vec![4]
        );
        assert_eq!(advanced_search("", &posts, SearchField::value_variants()), posts);
    }
}
