// Case-insensitive substring search over fixture users and posts.

use super::models::{Post, User};
use super::MockFeed;

/// Queries shorter than this (after trimming) return no results.
pub const MIN_QUERY_LEN: usize = 2;

fn normalize(query: &str) -> Option<String> {
    let q = query.trim();
    if q.chars().count() < MIN_QUERY_LEN {
        return None;
    }
    Some(q.to_lowercase())
}

impl MockFeed {
    /// Users whose username or display name contains `query`.
    pub fn search_users(&self, query: &str) -> Vec<&User> {
        let Some(q) = normalize(query) else {
            return Vec::new();
        };
        self.users()
            .iter()
            .filter(|u| {
                u.username.to_lowercase().contains(&q) || u.display_name.to_lowercase().contains(&q)
            })
            .collect()
    }

    /// Posts whose content contains `query`.
    pub fn search_posts(&self, query: &str) -> Vec<&Post> {
        let Some(q) = normalize(query) else {
            return Vec::new();
        };
        self.posts()
            .iter()
            .filter(|p| p.content.to_lowercase().contains(&q))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_users_by_display_name() {
        let feed = MockFeed::new();
        let found = feed.search_users("DUST");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "stardust");
    }

    #[test]
    fn test_search_users_by_username() {
        let feed = MockFeed::new();
        let found = feed.search_users("nebula_");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display_name, "Nebula Dreamer");
    }

    #[test]
    fn test_search_posts_by_content() {
        let feed = MockFeed::new();
        let found = feed.search_posts("#nightphilosophy");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "post4");
    }

    #[test]
    fn test_short_query_returns_nothing() {
        let feed = MockFeed::new();
        assert!(feed.search_users("s").is_empty());
        assert!(feed.search_posts(" a ").is_empty());
        assert!(feed.search_posts("").is_empty());
    }
}
