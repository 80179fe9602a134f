// Local ONNX toxicity model using Detoxify's unbiased-toxic-roberta.
//
// Runs entirely on the local CPU: no API calls, no rate limits. The model
// emits seven multi-label logits; we read the five categories the moderation
// panel cares about and decide each one's match flag against the threshold
// fixed at load time.
//
// Model: protectai/unbiased-toxic-roberta-onnx (quantized, ~126MB)

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::download::{TOXICITY_MODEL_FILE, TOXICITY_TOKENIZER_FILE};
use super::model::{Category, CategoryPrediction, ModelLoader, ModelSettings, ToxicityModel};

/// Labels output by unbiased-toxic-roberta, in the order the model returns them.
const LABEL_ORDER: [&str; 7] = [
    "toxicity",
    "severe_toxicity",
    "obscene",
    "identity_attack",
    "insult",
    "threat",
    "sexual_explicit",
];

/// Longest token sequence the model accepts (RoBERTa has 514 position
/// embeddings, two of them reserved).
const MAX_SEQUENCE_LENGTH: usize = 512;

/// Position of a category in the model's output row.
fn label_index(category: Category) -> usize {
    LABEL_ORDER
        .iter()
        .position(|l| *l == category.as_str())
        .unwrap_or(0)
}

/// Loaded ONNX session and tokenizer.
pub struct OnnxToxicityModel {
    // ort::Session::run takes &mut self, and inference runs on spawn_blocking,
    // so the session sits behind Arc<Mutex>.
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    threshold: f64,
    categories: Vec<Category>,
}

impl OnnxToxicityModel {
    /// Load the ONNX model and tokenizer from the given directory.
    ///
    /// Expects `model_quantized.onnx` and `tokenizer.json` in `model_dir`.
    pub fn load(model_dir: &Path, settings: &ModelSettings) -> Result<Self> {
        let model_path = model_dir.join(TOXICITY_MODEL_FILE);
        let tokenizer_path = model_dir.join(TOXICITY_TOKENIZER_FILE);

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nRun `nightwalker download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}\nRun `nightwalker download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        debug!("Loaded ONNX toxicity model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            threshold: settings.threshold,
            categories: settings.categories.clone(),
        })
    }
}

#[async_trait]
impl ToxicityModel for OnnxToxicityModel {
    async fn classify(&self, text: &str) -> Result<Vec<CategoryPrediction>> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();
        let threshold = self.threshold;
        let categories = self.categories.clone();

        // Tokenization and inference are CPU-bound; keep them off the runtime.
        tokio::task::spawn_blocking(move || {
            let encoding = tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

            let (input_ids, attention_mask) =
                model_inputs(encoding.get_ids(), encoding.get_attention_mask());
            let shape = [1_i64, input_ids.len() as i64];

            let input_ids_tensor = Tensor::from_array((shape, input_ids))
                .context("Failed to create input_ids tensor")?;
            let attention_mask_tensor = Tensor::from_array((shape, attention_mask))
                .context("Failed to create attention_mask tensor")?;

            let logits = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! {
                        "input_ids" => input_ids_tensor,
                        "attention_mask" => attention_mask_tensor
                    })
                    .context("ONNX inference failed")?;

                // Output shape: [1, 7], raw logits (pre-sigmoid)
                let (_out_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;

                data.to_vec()
            };

            if logits.len() < LABEL_ORDER.len() {
                anyhow::bail!(
                    "Model returned {} logits, expected {}",
                    logits.len(),
                    LABEL_ORDER.len()
                );
            }

            Ok(predictions_from_logits(&logits, &categories, threshold))
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Convert an encoding to model inputs, cutting it down to
/// `MAX_SEQUENCE_LENGTH`. Long texts keep their head and the closing
/// special token, so any comment can be classified.
fn model_inputs(ids: &[u32], mask: &[u32]) -> (Vec<i64>, Vec<i64>) {
    let keep = |values: &[u32]| -> Vec<i64> {
        if values.len() <= MAX_SEQUENCE_LENGTH {
            return values.iter().map(|&v| v as i64).collect();
        }
        values[..MAX_SEQUENCE_LENGTH - 1]
            .iter()
            .chain(values.last())
            .map(|&v| v as i64)
            .collect()
    };
    (keep(ids), keep(mask))
}

/// Sigmoid activation: maps any real number to (0, 1).
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Turn one row of raw logits into predictions for the requested categories.
fn predictions_from_logits(
    logits: &[f32],
    categories: &[Category],
    threshold: f64,
) -> Vec<CategoryPrediction> {
    categories
        .iter()
        .map(|&category| {
            let probability = sigmoid(logits[label_index(category)] as f64);
            CategoryPrediction::decide(category, probability, threshold)
        })
        .collect()
}

/// Loads `OnnxToxicityModel` from a model directory on a blocking thread.
pub struct OnnxLoader {
    model_dir: PathBuf,
}

impl OnnxLoader {
    pub fn new(model_dir: PathBuf) -> Self {
        Self { model_dir }
    }
}

#[async_trait]
impl ModelLoader for OnnxLoader {
    async fn load(&self, settings: &ModelSettings) -> Result<Arc<dyn ToxicityModel>> {
        let model_dir = self.model_dir.clone();
        let settings = settings.clone();
        let model =
            tokio::task::spawn_blocking(move || OnnxToxicityModel::load(&model_dir, &settings))
                .await
                .context("spawn_blocking panicked")??;
        Ok(Arc::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_zero() {
        let result = sigmoid(0.0);
        assert!((result - 0.5).abs() < 1e-10, "sigmoid(0) should be 0.5");
    }

    #[test]
    fn test_sigmoid_symmetry() {
        for x in [0.5, 1.0, 2.0, 5.0] {
            let sum = sigmoid(x) + sigmoid(-x);
            assert!(
                (sum - 1.0).abs() < 1e-10,
                "sigmoid({x}) + sigmoid(-{x}) should equal 1.0"
            );
        }
    }

    #[test]
    fn test_label_index_skips_unused_labels() {
        // obscene sits between severe_toxicity and identity_attack
        assert_eq!(label_index(Category::Toxicity), 0);
        assert_eq!(label_index(Category::SevereToxicity), 1);
        assert_eq!(label_index(Category::IdentityAttack), 3);
        assert_eq!(label_index(Category::Insult), 4);
        assert_eq!(label_index(Category::Threat), 5);
    }

    #[test]
    fn test_predictions_from_logits() {
        // toxicity, severe_toxicity, obscene, identity_attack, insult, threat, sexual_explicit
        let logits = [4.0_f32, -4.0, 9.0, -4.0, 3.0, 0.0, 9.0];
        let preds = predictions_from_logits(&logits, &Category::ALL, 0.8);

        assert_eq!(preds.len(), 5);
        assert_eq!(preds[0].category, Category::Toxicity);
        assert!(preds[0].is_match());
        assert_eq!(preds[1].matched, Some(false));
        assert_eq!(preds[2].category, Category::IdentityAttack);
        assert_eq!(preds[2].matched, Some(false));
        assert!(preds[3].is_match());
        // sigmoid(0) = 0.5: neither side is confident
        assert_eq!(preds[4].matched, None);
    }

    #[test]
    fn test_model_inputs_short_text_unchanged() {
        let (ids, mask) = model_inputs(&[0, 713, 16, 2], &[1, 1, 1, 1]);
        assert_eq!(ids, vec![0, 713, 16, 2]);
        assert_eq!(mask, vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_model_inputs_long_text_fits_the_model() {
        // <s>, 2000 word pieces, </s>
        let mut raw: Vec<u32> = vec![0];
        raw.extend((0..2000).map(|i| 100 + i));
        raw.push(2);
        let ones = vec![1_u32; raw.len()];

        let (ids, mask) = model_inputs(&raw, &ones);
        assert_eq!(ids.len(), MAX_SEQUENCE_LENGTH);
        assert_eq!(mask.len(), MAX_SEQUENCE_LENGTH);
        assert_eq!(ids[0], 0);
        assert_eq!(ids[1], 100);
        assert_eq!(*ids.last().unwrap(), 2, "closing token is kept");
        assert!(mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_model_inputs_exactly_at_limit_unchanged() {
        let raw: Vec<u32> = (0..MAX_SEQUENCE_LENGTH as u32).collect();
        let (ids, _) = model_inputs(&raw, &raw);
        assert_eq!(ids.len(), MAX_SEQUENCE_LENGTH);
        assert_eq!(ids[MAX_SEQUENCE_LENGTH - 1], MAX_SEQUENCE_LENGTH as i64 - 1);
    }

    #[tokio::test]
    async fn test_loader_fails_without_model_files() {
        let dir = std::env::temp_dir().join("nightwalker-test-no-model");
        let loader = OnnxLoader::new(dir);
        let err = loader.load(&ModelSettings::default()).await.err();
        assert!(err.is_some_and(|e| e.to_string().contains("Model file not found")));
    }
}
