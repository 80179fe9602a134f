// Night Walker: comment toxicity screening for the social feed.
//
// This is the library root. Each module corresponds to one part of the
// moderation flow: fetching comments, classifying them, and acting on the
// verdicts.

pub mod config;
pub mod feed;
pub mod moderation;
pub mod output;
pub mod status;
pub mod toxicity;
