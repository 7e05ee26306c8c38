// Non-interactive subcommands.
// Each one loads through the content store and prints plain text to `out`.

use std::io::Write;

use crate::archive;
use crate::content::{ContentStore, Post, SkillLevel};
use crate::error::{QuillError, Result};
use crate::render;
use crate::search::{SearchField, SearchIndex, advanced_search};

fn write_post_line(out: &mut impl Write, post: &Post) -> Result<()> {
    writeln!(
        out,
        "{}  {:<36} {} [{}, {}]",
        post.date,
        post.slug,
        post.title,
        post.category,
        post.skill_level
    )?;
    Ok(())
}

/// Print published posts, optionally narrowed to one category or skill level.
pub async fn list(
    store: &ContentStore,
    category: Option<&str>,
    level: Option<SkillLevel>,
    out: &mut impl Write,
) -> Result<()> {
    let mut posts = store.get_posts().await;
    if let Some(category) = category {
        posts = archive::posts_by_category(&posts, category);
    }
    if let Some(level) = level {
        posts = archive::posts_by_skill_level(&posts, level);
    }
    for post in &posts {
        write_post_line(out, post)?;
    }
    Ok(())
}

/// Print one post with its body as markup or as plain text.
pub async fn show(store: &ContentStore, slug: &str, html: bool, out: &mut impl Write) -> Result<()> {
    let posts = store.get_posts().await;
    let Some(post) = posts.iter().find(|p| p.slug == slug) else {
        return Err(QuillError::PostNotFound(slug.to_string()));
    };

    let content = store.content_for(post).await;
    writeln!(out, "{} {}", post.display_icon(), post.title)?;
    writeln!(
        out,
        "{} · {} · {} · {}",
        post.category,
        post.skill_level,
        post.display_date(),
        post.read_time
    )?;
    writeln!(out)?;
    if html {
        writeln!(out, "{}", render::render(&content))?;
    } else {
        for line in render::to_lines(&content) {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

/// Print posts matching `query`. With `fields`, only those fields are searched.
pub async fn search(
    store: &ContentStore,
    query: &str,
    fields: &[SearchField],
    out: &mut impl Write,
) -> Result<()> {
    let posts = store.get_posts().await;
    let results = if fields.is_empty() {
        SearchIndex::build(&posts).search(query, &posts)
    } else {
        advanced_search(query, &posts, fields)
    };

    writeln!(out, "Search Results for \"{}\" ({})", query.trim(), results.len())?;
    for post in &results {
        write_post_line(out, post)?;
    }
    Ok(())
}

/// Print the year/month archive and aggregate stats.
pub async fn archive(store: &ContentStore, out: &mut impl Write) -> Result<()> {
    let posts = store.get_posts().await;

    for year in archive::organize_by_year(&posts) {
        writeln!(out, "{} ({})", year.year, year.post_count())?;
        for month in &year.months {
            writeln!(out, "  {}", month.name)?;
            for id in &month.post_ids {
                if let Some(post) = posts.iter().find(|p| p.id == *id) {
                    writeln!(out, "    {}  {}", post.date, post.title)?;
                }
            }
        }
    }

    let stats = archive::stats(&posts);
    writeln!(out)?;
    writeln!(
        out,
        "{} posts · {} categories · {} years · {} skill levels",
        stats.total_posts, stats.categories, stats.years, stats.skill_levels
    )?;
    if let Some(latest) = stats.latest_post {
        writeln!(out, "Latest post: {}", latest)?;
    }
    Ok(())
}

/// Probe the remote host. Returns whether it answered.
pub async fn check(store: &ContentStore, out: &mut impl Write) -> Result<bool> {
    let online = store.check_connection().await;
    let status = if online { "online" } else { "offline" };
    writeln!(out, "{}: {}", store.base_url(), status)?;
    Ok(online)
}
