// Local fallback data.
// Sample posts served whenever the remote source is unreachable or invalid.

use chrono::NaiveDate;

use super::types::{Content, Post, SkillLevel};

/// Shown in place of a post body that could not be fetched.
pub const PLACEHOLDER_CONTENT: &str =
    "<h1>Post content not available</h1><p>Please check your internet connection.</p>";

const FALLBACK_BODY: &str = "<p>This is a fallback post content. In production, posts would be loaded from JSON files on GitHub.</p>";

/// Glyph for a category card.
pub fn category_icon(category: &str) -> &'static str {
    match category {
        "Getting Started" => "👋",
        "Python Basics" => "🐍",
        "Web Development" => "🌐",
        "Tools & Setup" => "🛠️",
        "Projects" => "🚀",
        "Learning Tips" => "💡",
        _ => "📄",
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: u64,
    title: &str,
    excerpt: &str,
    category: &str,
    date: NaiveDate,
    read_time: &str,
    slug: &str,
    tags: &[&str],
) -> Post {
    Post {
        id,
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        content: Content::Markup(FALLBACK_BODY.to_string()),
        category: category.to_string(),
        skill_level: SkillLevel::Beginner,
        date,
        read_time: read_time.to_string(),
        slug: slug.to_string(),
        published: true,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        icon: Some(category_icon(category).to_string()),
    }
}

/// The fixed fallback list, newest first.
pub fn fallback_posts() -> Vec<Post> {
    vec![
        sample(
            1,
            "Getting Started with Programming",
            "Absolute beginner's guide to starting your coding journey. Learn what programming is and how to choose your first language.",
            "Getting Started",
            date(2023, 11, 15),
            "8 min read",
            "getting-started-programming",
            &["programming", "beginner", "tutorial"],
        ),
        sample(
            2,
            "Python Basics: Your First Program",
            "Learn Python fundamentals with hands-on examples. Perfect for complete beginners with no prior experience.",
            "Python Basics",
            date(2023, 11, 10),
            "12 min read",
            "python-basics-first-program",
            &["python", "basics", "tutorial"],
        ),
        sample(
            3,
            "HTML & CSS: Build Your First Website",
            "Step-by-step guide to creating your first webpage. No prior web development knowledge required.",
            "Web Development",
            date(2023, 11, 5),
            "15 min read",
            "html-css-first-website",
            &["html", "css", "web development"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let posts = fallback_posts();
        let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(posts.iter().all(|p| p.published));
        assert!(posts.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_category_icon() {
        assert_eq!(category_icon("Projects"), "🚀");
        assert_eq!(category_icon("Rust"), "📄");
    }
}
