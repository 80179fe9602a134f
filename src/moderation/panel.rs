// Comment moderation panel.
//
// Holds the visible comment list for one post, each comment with its own
// scan state (Unscanned → Scanning → Scored). A scan is an explicit batch
// action: every unscored comment is classified concurrently, results land
// in whatever order they finish, and the shared ScanStatus reports the batch
// as running until the last one settles. Flagged comments can be removed
// from the local list; nothing is ever sent back to the feed.

use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::feed::models::Comment;
use crate::feed::CommentSource;
use crate::toxicity::traits::{ScoreSet, TextClassifier, Verdict};

/// Lexical scores above this get the positive highlight.
pub const POSITIVE_HIGHLIGHT_SCORE: i32 = 2;

/// Default number of classifier calls in flight during a batch scan.
pub const DEFAULT_SCAN_CONCURRENCY: usize = 8;

/// Where a single comment is in the scan lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentState {
    Unscanned,
    Scanning,
    Scored(Verdict),
}

/// How a comment bubble should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Not scored yet.
    Plain,
    Neutral,
    Positive,
    Toxic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModeratedComment {
    pub comment: Comment,
    pub state: CommentState,
}

impl ModeratedComment {
    pub fn new(comment: Comment) -> Self {
        Self {
            comment,
            state: CommentState::Unscanned,
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.state {
            CommentState::Scored(v) => Some(v),
            _ => None,
        }
    }

    /// True once the comment has a toxic verdict.
    pub fn is_flagged(&self) -> bool {
        self.verdict().is_some_and(|v| v.is_toxic)
    }

    pub fn highlight(&self) -> Highlight {
        match self.verdict() {
            None => Highlight::Plain,
            Some(v) if v.is_toxic => Highlight::Toxic,
            Some(Verdict {
                scores: ScoreSet::Sentiment(s),
                ..
            }) if s.score > POSITIVE_HIGHLIGHT_SCORE => Highlight::Positive,
            Some(_) => Highlight::Neutral,
        }
    }
}

/// Live status of the current (or last) batch scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanStatus {
    /// True while classifier calls from the batch are still outstanding.
    pub running: bool,
    /// Calls issued by the current batch.
    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
    /// Set when the classifier could not be made ready.
    pub unavailable: Option<String>,
}

/// What a finished batch scan did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    /// Comments that received a verdict in this batch.
    pub scanned: usize,
    /// Comments that already had a verdict and were left alone.
    pub skipped: usize,
    pub toxic: usize,
    /// Comments whose classification failed; they stay unscanned.
    pub failed: usize,
    /// Why scanning was unavailable, if it was.
    pub unavailable: Option<String>,
}

/// Result of asking to remove a comment from the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// The comment exists but has no toxic verdict.
    NotFlagged,
    /// No comment with that id (including one removed earlier).
    NotFound,
}

pub struct ModerationPanel {
    post_id: String,
    classifier: Arc<dyn TextClassifier>,
    comments: Vec<ModeratedComment>,
    status: Arc<RwLock<ScanStatus>>,
    concurrency: usize,
}

impl ModerationPanel {
    pub fn new(
        post_id: impl Into<String>,
        classifier: Arc<dyn TextClassifier>,
        comments: Vec<Comment>,
    ) -> Self {
        Self {
            post_id: post_id.into(),
            classifier,
            comments: comments.into_iter().map(ModeratedComment::new).collect(),
            status: Arc::new(RwLock::new(ScanStatus::default())),
            concurrency: DEFAULT_SCAN_CONCURRENCY,
        }
    }

    /// Fetch a post's comments from `source` and build a panel over them.
    pub async fn load(
        source: &dyn CommentSource,
        post_id: &str,
        classifier: Arc<dyn TextClassifier>,
    ) -> Result<Self> {
        let comments = source.post_comments(post_id).await?;
        info!(post_id, count = comments.len(), "Loaded comments");
        Ok(Self::new(post_id, classifier, comments))
    }

    /// Cap on concurrent classifier calls per batch (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn comments(&self) -> &[ModeratedComment] {
        &self.comments
    }

    pub fn get(&self, comment_id: &str) -> Option<&ModeratedComment> {
        self.comments.iter().find(|c| c.comment.id == comment_id)
    }

    pub fn flagged(&self) -> impl Iterator<Item = &ModeratedComment> {
        self.comments.iter().filter(|c| c.is_flagged())
    }

    /// Shared handle to the scan status, readable while a scan is running.
    pub fn status_handle(&self) -> Arc<RwLock<ScanStatus>> {
        Arc::clone(&self.status)
    }

    pub async fn is_scanning(&self) -> bool {
        self.status.read().await.running
    }

    /// Submit a new comment. It goes to the top of the list, unscanned.
    /// Blank input is ignored.
    pub async fn submit(
        &mut self,
        source: &dyn CommentSource,
        content: &str,
    ) -> Result<Option<&ModeratedComment>> {
        if content.trim().is_empty() {
            return Ok(None);
        }

        let comment = source.add_comment(&self.post_id, content).await?;
        debug!(comment_id = %comment.id, "Comment submitted");
        self.comments.insert(0, ModeratedComment::new(comment));
        Ok(self.comments.first())
    }

    /// Classify every comment that doesn't have a verdict yet.
    pub async fn scan(&mut self) -> ScanSummary {
        let mut summary = ScanSummary::default();

        if let Err(e) = self.classifier.ensure_ready().await {
            let reason = format!("{e:#}");
            warn!(classifier = self.classifier.name(), error = %reason, "Scanning unavailable");
            self.status.write().await.unavailable = Some(reason.clone());
            summary.skipped = self.comments.iter().filter(|c| c.verdict().is_some()).count();
            summary.unavailable = Some(reason);
            return summary;
        }

        let pending: Vec<(usize, String)> = self
            .comments
            .iter_mut()
            .enumerate()
            .filter(|(_, c)| c.state == CommentState::Unscanned)
            .map(|(i, c)| {
                c.state = CommentState::Scanning;
                (i, c.comment.content.clone())
            })
            .collect();

        summary.skipped = self.comments.len() - pending.len();
        if pending.is_empty() {
            debug!("Nothing to scan");
            return summary;
        }

        info!(
            classifier = self.classifier.name(),
            pending = pending.len(),
            skipped = summary.skipped,
            "Scanning comments"
        );

        *self.status.write().await = ScanStatus {
            running: true,
            pending: pending.len(),
            ..ScanStatus::default()
        };

        let classifier = Arc::clone(&self.classifier);
        let mut results = stream::iter(pending.into_iter().map(|(index, text)| {
            let classifier = Arc::clone(&classifier);
            async move { (index, classifier.analyze(&text).await) }
        }))
        .buffer_unordered(self.concurrency);

        // Apply each verdict as soon as it arrives.
        while let Some((index, result)) = results.next().await {
            let entry = &mut self.comments[index];
            let mut status = self.status.write().await;
            match result {
                Ok(verdict) => {
                    if verdict.is_toxic {
                        summary.toxic += 1;
                    }
                    entry.state = CommentState::Scored(verdict);
                    summary.scanned += 1;
                    status.completed += 1;
                }
                Err(e) => {
                    warn!(
                        comment_id = %entry.comment.id,
                        error = %e,
                        "Failed to classify comment, leaving it unscanned"
                    );
                    entry.state = CommentState::Unscanned;
                    summary.failed += 1;
                    status.failed += 1;
                }
            }
        }

        self.status.write().await.running = false;

        info!(
            scanned = summary.scanned,
            toxic = summary.toxic,
            failed = summary.failed,
            "Scan complete"
        );
        summary
    }

    /// Remove a flagged comment from the local list. Removing something that
    /// is already gone is a no-op.
    pub fn remove(&mut self, comment_id: &str) -> Removal {
        let Some(pos) = self.comments.iter().position(|c| c.comment.id == comment_id) else {
            return Removal::NotFound;
        };
        if !self.comments[pos].is_flagged() {
            return Removal::NotFlagged;
        }
        self.comments.remove(pos);
        debug!(comment_id, "Removed flagged comment");
        Removal::Removed
    }

    /// Remove every flagged comment. Returns how many were removed.
    pub fn purge_flagged(&mut self) -> usize {
        let before = self.comments.len();
        self.comments.retain(|c| !c.is_flagged());
        before - self.comments.len()
    }

    /// Drop a comment's verdict so the next scan classifies it again.
    pub fn invalidate(&mut self, comment_id: &str) -> bool {
        match self.comments.iter_mut().find(|c| c.comment.id == comment_id) {
            Some(entry) if matches!(entry.state, CommentState::Scored(_)) => {
                entry.state = CommentState::Unscanned;
                true
            }
            _ => false,
        }
    }
}
