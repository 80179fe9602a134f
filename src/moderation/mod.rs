// Comment moderation: per-comment scan state and the batch scan driver.

pub mod panel;

pub use panel::{
    CommentState, Highlight, ModeratedComment, ModerationPanel, Removal, ScanStatus, ScanSummary,
};
