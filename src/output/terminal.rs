// Colored terminal output for verdicts, comment lists and search results.
//
// main.rs delegates all display formatting here.

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::feed::models::{Post, User};
use crate::moderation::{CommentState, Highlight, ModerationPanel, ScanSummary};
use crate::toxicity::model::Category;
use crate::toxicity::traits::{ScoreSet, Verdict};

/// Display the verdict for a single piece of text.
pub fn display_verdict(text: &str, verdict: &Verdict) {
    println!("\n{}", "=== Verdict ===".bold());
    println!("  Text: {}", super::truncate_chars(text, 120).dimmed());

    let label = if verdict.is_toxic {
        "TOXIC".red().bold()
    } else {
        "clean".green()
    };
    println!("  Result: {label}");

    match &verdict.scores {
        ScoreSet::Sentiment(s) => {
            println!("  Score: {}  Comparative: {:.3}", s.score, s.comparative);
            if !s.negative.is_empty() {
                println!("  Negative terms: {}", s.negative.join(", ").red());
            }
            if !s.positive.is_empty() {
                println!("  Positive terms: {}", s.positive.join(", ").green());
            }
        }
        ScoreSet::Toxicity(t) => {
            for category in Category::ALL {
                let p = t.get(category);
                let line = format!("    {:<16} {:.3}", category.as_str(), p);
                if t.matched.contains(&category) {
                    println!("{}", line.red());
                } else {
                    println!("{line}");
                }
            }
        }
    }
}

/// Display the panel's comment list, with highlights and flag details.
pub fn display_comments(panel: &ModerationPanel, now: DateTime<Utc>) {
    let comments = panel.comments();
    println!(
        "\n{}",
        format!(
            "=== Comments on {} ({}) ===",
            panel.post_id(),
            comments.len()
        )
        .bold()
    );

    if comments.is_empty() {
        println!("  No comments yet. Be the first to comment!");
        return;
    }

    for entry in comments {
        let c = &entry.comment;
        let marker = match entry.highlight() {
            Highlight::Plain => "·".dimmed(),
            Highlight::Neutral => "○".normal(),
            Highlight::Positive => "●".green(),
            Highlight::Toxic => "●".red().bold(),
        };

        println!(
            "\n  {} {} {}",
            marker,
            c.author.display_name.bold(),
            format!("@{} · {}", c.author.username, super::format_age(c.created_at, now)).dimmed()
        );

        let body = super::truncate_chars(&c.content, 140);
        match entry.highlight() {
            Highlight::Toxic => println!("    {}", body.red()),
            _ => println!("    {body}"),
        }

        let state = match &entry.state {
            CommentState::Unscanned => "unscanned".dimmed().to_string(),
            CommentState::Scanning => "scanning…".yellow().to_string(),
            CommentState::Scored(v) if v.is_toxic => "flagged".red().to_string(),
            CommentState::Scored(_) => "clean".green().to_string(),
        };
        println!(
            "    {}  {}  {}",
            format!("♥ {}", c.likes).dimmed(),
            format!("[{}]", c.id).dimmed(),
            state
        );

        if let Some(verdict) = entry.verdict().filter(|v| v.is_toxic) {
            println!("    {} This comment has been flagged as toxic", "!".red().bold());
            let rationale = verdict.rationale();
            if !rationale.is_empty() {
                let label = match verdict.scores {
                    ScoreSet::Sentiment(_) => "Negative terms",
                    ScoreSet::Toxicity(_) => "Flagged categories",
                };
                println!("    {}: {}", label, rationale.join(", ").red());
            }
        }
    }
    println!();
}

/// Display what a batch scan did.
pub fn display_scan_summary(summary: &ScanSummary) {
    if let Some(reason) = &summary.unavailable {
        println!("{} Scanning unavailable: {}", "Warning:".yellow(), reason);
        return;
    }

    println!("\n{}", "Scan complete.".bold());
    println!("  Comments scanned: {}", summary.scanned);
    if summary.skipped > 0 {
        println!("  Already scored:   {}", summary.skipped);
    }
    if summary.toxic > 0 {
        println!("  {} {} flagged as toxic", "!!".red().bold(), summary.toxic);
    } else {
        println!("  {}", "Nothing flagged.".green());
    }
    if summary.failed > 0 {
        println!(
            "  {} {} could not be classified and stay unscanned",
            "~".yellow(),
            summary.failed
        );
    }
}

/// Display user and post search results.
pub fn display_search(query: &str, users: &[&User], posts: &[&Post]) {
    println!("\n{}", format!("=== Search: \"{query}\" ===").bold());

    if users.is_empty() && posts.is_empty() {
        println!("  No results.");
        return;
    }

    if !users.is_empty() {
        println!("\n  {}", "People".bold());
        for user in users {
            println!(
                "    {} {}  {}",
                user.display_name,
                format!("@{}", user.username).dimmed(),
                format!("{} followers", user.followers).dimmed()
            );
        }
    }

    if !posts.is_empty() {
        println!("\n  {}", "Posts".bold());
        for post in posts {
            println!(
                "    {} {}",
                format!("[{}] @{}:", post.id, post.author.username).dimmed(),
                super::truncate_chars(&post.content, 100)
            );
        }
    }
    println!();
}
