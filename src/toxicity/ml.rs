// ML toxicity classifier adapter.
//
// Wraps the shared ModelHandle behind the TextClassifier trait. Once the
// model is loaded, each category's match flag comes straight from the model
// and the comment is toxic if any category matched. If the model could not
// be loaded, every call returns the safe default verdict instead of failing.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::model::{CategoryPrediction, ModelHandle, ModelStatus};
use super::traits::{ScoreSet, TextClassifier, ToxicityScores, Verdict};

pub struct MlClassifier {
    handle: Arc<ModelHandle>,
}

impl MlClassifier {
    pub fn new(handle: Arc<ModelHandle>) -> Self {
        Self { handle }
    }

    pub fn status(&self) -> ModelStatus {
        self.handle.status()
    }
}

#[async_trait]
impl TextClassifier for MlClassifier {
    fn name(&self) -> &'static str {
        "onnx"
    }

    async fn ensure_ready(&self) -> Result<()> {
        self.handle.ensure_loaded().await
    }

    async fn analyze(&self, text: &str) -> Result<Verdict> {
        let Some(model) = self.handle.model().await else {
            warn!("Toxicity model unavailable, returning safe default verdict");
            return Ok(Verdict::safe_default());
        };

        let predictions = model.classify(text).await?;
        let verdict = map_predictions(&predictions);

        debug!(
            is_toxic = verdict.is_toxic,
            text_preview = %crate::output::truncate_chars(text, 50),
            "Model classified text"
        );

        Ok(verdict)
    }
}

/// Collapse per-category predictions into a verdict.
pub fn map_predictions(predictions: &[CategoryPrediction]) -> Verdict {
    let mut scores = ToxicityScores::default();
    for p in predictions {
        scores.set(p.category, p.probability);
        if p.is_match() {
            scores.matched.push(p.category);
        }
    }

    Verdict {
        is_toxic: !scores.matched.is_empty(),
        scores: ScoreSet::Toxicity(scores),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toxicity::model::Category;

    fn prediction(category: Category, probability: f64) -> CategoryPrediction {
        CategoryPrediction::decide(category, probability, 0.8)
    }

    #[test]
    fn test_map_predictions_clean() {
        let verdict = map_predictions(&[
            prediction(Category::Toxicity, 0.1),
            prediction(Category::Insult, 0.05),
        ]);
        assert!(!verdict.is_toxic);
        assert!(verdict.rationale().is_empty());
    }

    #[test]
    fn test_map_predictions_single_match_is_toxic() {
        let verdict = map_predictions(&[
            prediction(Category::Toxicity, 0.6),
            prediction(Category::Insult, 0.92),
        ]);
        assert!(verdict.is_toxic);
        assert_eq!(verdict.rationale(), vec!["insult"]);
        let ScoreSet::Toxicity(scores) = verdict.scores else {
            panic!("expected toxicity scores");
        };
        assert!((scores.toxicity - 0.6).abs() < 1e-10);
        assert!((scores.get(Category::Insult) - 0.92).abs() < 1e-10);
    }

    #[test]
    fn test_map_predictions_undecided_is_not_toxic() {
        let verdict = map_predictions(&[prediction(Category::Threat, 0.5)]);
        assert!(!verdict.is_toxic);
    }

    #[test]
    fn test_map_predictions_empty() {
        let verdict = map_predictions(&[]);
        assert_eq!(verdict, Verdict::safe_default());
    }
}
