// Archive organisation.
// Pure grouping, faceting and statistics over a post list; inputs are never mutated.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Month, NaiveDate};

use crate::content::{Post, SkillLevel};

/// Posts published in one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup {
    /// 1-based month number.
    pub month: u32,
    pub name: &'static str,
    /// Newest first.
    pub post_ids: Vec<u64>,
}

/// Posts published in one year, months newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGroup {
    pub year: i32,
    pub months: Vec<MonthGroup>,
}

impl YearGroup {
    pub fn post_count(&self) -> usize {
        self.months.iter().map(|m| m.post_ids.len()).sum()
    }
}

/// Aggregate counts over a post list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArchiveStats {
    pub total_posts: usize,
    pub categories: usize,
    pub years: usize,
    pub skill_levels: usize,
    pub latest_post: Option<NaiveDate>,
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

fn newest_first(posts: &[Post]) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Group posts into year → month buckets; years and months newest first.
pub fn organize_by_year(posts: &[Post]) -> Vec<YearGroup> {
    let mut buckets: BTreeMap<i32, BTreeMap<u32, Vec<u64>>> = BTreeMap::new();
    for post in newest_first(posts) {
        buckets
            .entry(post.date.year())
            .or_default()
            .entry(post.date.month())
            .or_default()
            .push(post.id);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(year, months)| YearGroup {
            year,
            months: months
                .into_iter()
                .rev()
                .map(|(month, post_ids)| MonthGroup {
                    month,
                    name: month_name(month),
                    post_ids,
                })
                .collect(),
        })
        .collect()
}

/// The `count` newest posts.
pub fn recent_posts(posts: &[Post], count: usize) -> Vec<Post> {
    let mut sorted = newest_first(posts);
    sorted.truncate(count);
    sorted
}

pub fn posts_by_category(posts: &[Post], category: &str) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| p.category == category)
        .cloned()
        .collect()
}

pub fn posts_by_skill_level(posts: &[Post], level: SkillLevel) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| p.skill_level == level)
        .cloned()
        .collect()
}

pub fn posts_by_year(posts: &[Post], year: i32) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| p.date.year() == year)
        .cloned()
        .collect()
}

pub fn posts_by_month(posts: &[Post], year: i32, month: u32) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| p.date.year() == year && p.date.month() == month)
        .cloned()
        .collect()
}

/// Distinct years, newest first.
pub fn available_years(posts: &[Post]) -> Vec<i32> {
    let years: BTreeSet<i32> = posts.iter().map(|p| p.date.year()).collect();
    years.into_iter().rev().collect()
}

/// Distinct categories, ascending.
pub fn available_categories(posts: &[Post]) -> Vec<String> {
    let categories: BTreeSet<&str> = posts.iter().map(|p| p.category.as_str()).collect();
    categories.into_iter().map(str::to_string).collect()
}

/// Distinct skill levels, beginner first.
pub fn available_skill_levels(posts: &[Post]) -> Vec<SkillLevel> {
    SkillLevel::ALL
        .into_iter()
        .filter(|level| posts.iter().any(|p| p.skill_level == *level))
        .collect()
}

pub fn stats(posts: &[Post]) -> ArchiveStats {
    ArchiveStats {
        total_posts: posts.len(),
        categories: available_categories(posts).len(),
        years: available_years(posts).len(),
        skill_levels: available_skill_levels(posts).len(),
        latest_post: posts.iter().map(|p| p.date).max(),
    }
}
