// Lexical sentiment scorer.
//
// Splits text into lowercase tokens, looks each one up in the built-in
// polarity lexicon and sums the weights. A comment is flagged when the raw
// sum drops below the configured threshold (default -2). Pure and
// synchronous: the same text always produces the same scores.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use regex_lite::Regex;

use super::lexicon::LEXICON;
use super::traits::{ScoreSet, SentimentScores, TextClassifier, Verdict};

/// Default cutoff: a raw score below this flags the comment.
pub const DEFAULT_LEXICAL_THRESHOLD: i32 = -2;

/// Anything that isn't whitespace or common punctuation is part of a token.
const TOKEN_PATTERN: &str = r#"[^\s.,/#!$%^&*;:{}=_`"~()?\[\]<>|\\+@]+"#;

pub struct LexicalScorer {
    lexicon: HashMap<&'static str, i32>,
    token_re: Regex,
    threshold: i32,
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self::new(DEFAULT_LEXICAL_THRESHOLD)
    }
}

impl LexicalScorer {
    pub fn new(threshold: i32) -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            token_re: Regex::new(TOKEN_PATTERN).expect("valid token pattern"),
            threshold,
        }
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Lowercased tokens of `text`, with surrounding quotes and dashes removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.token_re
            .find_iter(&lower)
            .map(|m| m.as_str().trim_matches(|c| c == '\'' || c == '-'))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Score a text against the lexicon.
    pub fn score(&self, text: &str) -> SentimentScores {
        let tokens = self.tokenize(text);

        let mut scores = SentimentScores::default();
        for token in &tokens {
            let Some(&weight) = self.lexicon.get(token.as_str()) else {
                continue;
            };
            scores.score += weight;
            if weight < 0 {
                scores.negative.push(token.clone());
            } else {
                scores.positive.push(token.clone());
            }
        }

        scores.comparative = scores.score as f64 / tokens.len().max(1) as f64;
        scores
    }

    /// Score a text and apply the toxicity threshold.
    pub fn verdict(&self, text: &str) -> Verdict {
        let scores = self.score(text);
        Verdict {
            is_toxic: scores.score < self.threshold,
            scores: ScoreSet::Sentiment(scores),
        }
    }
}

#[async_trait]
impl TextClassifier for LexicalScorer {
    fn name(&self) -> &'static str {
        "lexical"
    }

    async fn analyze(&self, text: &str) -> Result<Verdict> {
        Ok(self.verdict(text))
    }
}
