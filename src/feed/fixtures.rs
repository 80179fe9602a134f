// Static fixture data served by the mock feed.

use chrono::{DateTime, TimeZone, Utc};

use super::models::{Comment, Media, MediaKind, Post, User};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn user(
    id: &str,
    username: &str,
    email: &str,
    display_name: &str,
    bio: &str,
    followers: u32,
    following: u32,
    created_at: DateTime<Utc>,
) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        display_name: display_name.to_string(),
        avatar: format!("https://images.example.com/avatars/{username}.jpeg"),
        bio: bio.to_string(),
        followers,
        following,
        created_at,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(
            "user1",
            "cosmicwanderer",
            "cosmic@example.com",
            "Cosmic Wanderer",
            "Exploring the digital cosmos ✨",
            1024,
            256,
            at(2024, 1, 1, 0, 0),
        ),
        user(
            "user2",
            "stardust",
            "stardust@example.com",
            "Star Dust",
            "Digital artist and night owl 🦉",
            3500,
            420,
            at(2023, 11, 15, 0, 0),
        ),
        user(
            "user3",
            "nebula_dreamer",
            "nebula@example.com",
            "Nebula Dreamer",
            "Finding beauty in the chaos of the universe",
            892,
            150,
            at(2023, 12, 20, 0, 0),
        ),
    ]
}

fn image(url: &str) -> Vec<Media> {
    vec![Media {
        kind: MediaKind::Image,
        url: url.to_string(),
    }]
}

pub fn posts(users: &[User]) -> Vec<Post> {
    let post = |id: &str,
                author: &User,
                content: &str,
                media: Vec<Media>,
                likes: u32,
                comments: u32,
                has_liked: bool,
                created_at: DateTime<Utc>| Post {
        id: id.to_string(),
        user_id: author.id.clone(),
        author: author.clone(),
        content: content.to_string(),
        media,
        likes,
        comments,
        has_liked,
        created_at,
    };

    vec![
        post(
            "post1",
            &users[1],
            "Just finished my latest digital artwork. What do you think? #digitalart #nightwalker",
            image("https://images.example.com/posts/1820770.jpeg"),
            248,
            42,
            true,
            at(2024, 6, 15, 18, 30),
        ),
        post(
            "post2",
            &users[2],
            "The night sky was absolutely breathtaking yesterday. Spent hours just gazing at the stars ✨",
            image("https://images.example.com/posts/1624438.jpeg"),
            189,
            24,
            false,
            at(2024, 6, 14, 23, 45),
        ),
        post(
            "post3",
            &users[0],
            "Working on a new project that combines AI and artistic expression. Can't wait to share more details!",
            Vec::new(),
            156,
            31,
            false,
            at(2024, 6, 13, 14, 20),
        ),
        post(
            "post4",
            &users[1],
            "Sometimes the most beautiful moments happen in the darkest hours. #nightphilosophy",
            image("https://images.example.com/posts/1144694.jpeg"),
            302,
            47,
            false,
            at(2024, 6, 12, 2, 10),
        ),
    ]
}

pub fn comments(users: &[User]) -> Vec<Comment> {
    let comment = |id: &str,
                   post_id: &str,
                   author: &User,
                   content: &str,
                   likes: u32,
                   created_at: DateTime<Utc>| Comment {
        id: id.to_string(),
        post_id: post_id.to_string(),
        user_id: author.id.clone(),
        author: author.clone(),
        content: content.to_string(),
        likes,
        created_at,
        replies: Vec::new(),
    };

    vec![
        comment(
            "comment1",
            "post1",
            &users[0],
            "This is absolutely stunning! The colors are otherworldly.",
            24,
            at(2024, 6, 15, 19, 10),
        ),
        comment(
            "comment2",
            "post1",
            &users[2],
            "You've outdone yourself with this one. What software do you use?",
            16,
            at(2024, 6, 15, 19, 30),
        ),
        comment(
            "comment3",
            "post2",
            &users[0],
            "There's something magical about stargazing. Great capture!",
            18,
            at(2024, 6, 15, 0, 15),
        ),
    ]
}
