// Text classifier trait, the seam between the panel and the backends.
//
// Both backends (the lexical sentiment scorer and the ONNX toxicity model)
// implement TextClassifier and return the same Verdict shape, so the
// moderation panel never needs to know which one is configured.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::model::Category;

/// The classification result for one comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_toxic: bool,
    pub scores: ScoreSet,
}

/// Backend-specific supporting scores for a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreSet {
    Sentiment(SentimentScores),
    Toxicity(ToxicityScores),
}

/// Lexical sentiment aggregate.
///
/// `negative` and `positive` hold every matched token (once per occurrence),
/// so the two lists are disjoint and their weights sum to `score`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub score: i32,
    /// `score / token_count`, or 0.0 for text with no tokens.
    pub comparative: f64,
    pub negative: Vec<String>,
    pub positive: Vec<String>,
}

/// Per-category probabilities from the toxicity model (all 0.0 to 1.0).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToxicityScores {
    pub toxicity: f64,
    pub severe_toxicity: f64,
    pub identity_attack: f64,
    pub insult: f64,
    pub threat: f64,
    /// Categories whose match flag was set by the model.
    pub matched: Vec<Category>,
}

impl ToxicityScores {
    /// Probability for a single category.
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Toxicity => self.toxicity,
            Category::SevereToxicity => self.severe_toxicity,
            Category::IdentityAttack => self.identity_attack,
            Category::Insult => self.insult,
            Category::Threat => self.threat,
        }
    }

    pub(crate) fn set(&mut self, category: Category, probability: f64) {
        match category {
            Category::Toxicity => self.toxicity = probability,
            Category::SevereToxicity => self.severe_toxicity = probability,
            Category::IdentityAttack => self.identity_attack = probability,
            Category::Insult => self.insult = probability,
            Category::Threat => self.threat = probability,
        }
    }
}

impl Verdict {
    /// The verdict returned when the toxicity model is unavailable:
    /// clean, with every probability at zero.
    pub fn safe_default() -> Self {
        Self {
            is_toxic: false,
            scores: ScoreSet::Toxicity(ToxicityScores::default()),
        }
    }

    /// Why a comment was flagged: the matched negative terms for the
    /// lexical backend, or the matched category names for the model.
    pub fn rationale(&self) -> Vec<String> {
        match &self.scores {
            ScoreSet::Sentiment(s) => s.negative.clone(),
            ScoreSet::Toxicity(t) => t.matched.iter().map(|c| c.as_str().to_string()).collect(),
        }
    }
}

/// Trait for classifying comment text. Implementations are async because
/// the model backend may need to load (and run inference) off the caller's
/// thread; the lexical backend simply returns immediately.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Short backend name for logs and terminal output.
    fn name(&self) -> &'static str;

    /// Make sure the backend can classify. Idempotent. An error here means
    /// scanning is unavailable for the rest of the process.
    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Classify a single text.
    async fn analyze(&self, text: &str) -> Result<Verdict>;
}
