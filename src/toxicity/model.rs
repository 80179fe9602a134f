// Shared toxicity model handle.
//
// The model is expensive to load, so one instance is loaded lazily on first
// use and shared by every caller for the rest of the process. All callers
// that arrive while the load is in flight await the same load. A failed (or
// timed-out) load is recorded and never retried; the handle then reports the
// model as unavailable and the ML classifier falls back to a safe verdict.
// The load itself runs on a spawned task, so callers that give up waiting
// never cause a second attempt.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Default per-category match threshold.
pub const DEFAULT_CATEGORY_THRESHOLD: f64 = 0.8;

/// Default upper bound on how long a model load may take.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// One output dimension of the toxicity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Toxicity,
    SevereToxicity,
    IdentityAttack,
    Insult,
    Threat,
}

impl Category {
    /// The categories checked by the classifier, in reporting order.
    pub const ALL: [Category; 5] = [
        Category::Toxicity,
        Category::SevereToxicity,
        Category::IdentityAttack,
        Category::Insult,
        Category::Threat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Toxicity => "toxicity",
            Category::SevereToxicity => "severe_toxicity",
            Category::IdentityAttack => "identity_attack",
            Category::Insult => "insult",
            Category::Threat => "threat",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings handed to the model at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    /// Probability a category must exceed to count as a match.
    pub threshold: f64,
    pub categories: Vec<Category>,
    pub load_timeout: Duration,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CATEGORY_THRESHOLD,
            categories: Category::ALL.to_vec(),
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }
}

/// The model's output for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPrediction {
    pub category: Category,
    /// Probability that the text belongs to the category.
    pub probability: f64,
    /// `Some(true)` above the threshold, `Some(false)` when the opposite
    /// probability is above it, `None` when neither side is confident.
    pub matched: Option<bool>,
}

impl CategoryPrediction {
    /// Build a prediction, deciding the match flag against `threshold`.
    pub fn decide(category: Category, probability: f64, threshold: f64) -> Self {
        let matched = if probability > threshold {
            Some(true)
        } else if 1.0 - probability > threshold {
            Some(false)
        } else {
            None
        };
        Self {
            category,
            probability,
            matched,
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched == Some(true)
    }
}

/// A loaded toxicity model. Read-only after load and safe to share across
/// concurrent calls.
#[async_trait]
pub trait ToxicityModel: Send + Sync {
    /// Predictions for each configured category, in configured order.
    async fn classify(&self, text: &str) -> Result<Vec<CategoryPrediction>>;
}

/// Knows how to produce a loaded model. Swapped for a fake in tests.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, settings: &ModelSettings) -> Result<Arc<dyn ToxicityModel>>;
}

/// Where the shared model is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelStatus {
    /// No caller has asked for the model yet.
    NotLoaded,
    Loading,
    Ready,
    /// The one load attempt failed; the message explains why.
    Failed(String),
}

type LoadOutcome = std::result::Result<Arc<dyn ToxicityModel>, String>;

/// Lazily loaded, process-lifetime handle to the toxicity model.
pub struct ModelHandle {
    inner: Arc<LoadState>,
}

struct LoadState {
    loader: Box<dyn ModelLoader>,
    settings: ModelSettings,
    started: AtomicBool,
    cell: OnceCell<LoadOutcome>,
}

static SHARED: OnceLock<Arc<ModelHandle>> = OnceLock::new();

impl ModelHandle {
    pub fn new(loader: Box<dyn ModelLoader>, settings: ModelSettings) -> Self {
        Self {
            inner: Arc::new(LoadState {
                loader,
                settings,
                started: AtomicBool::new(false),
                cell: OnceCell::new(),
            }),
        }
    }

    /// The process-wide handle backed by the local ONNX model.
    ///
    /// The first call decides the model directory and settings; later calls
    /// get the same handle regardless of their arguments.
    pub fn shared(model_dir: PathBuf, settings: ModelSettings) -> Arc<ModelHandle> {
        SHARED
            .get_or_init(|| {
                let loader = super::onnx::OnnxLoader::new(model_dir);
                Arc::new(ModelHandle::new(Box::new(loader), settings))
            })
            .clone()
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.inner.settings
    }

    /// Load the model if nobody has yet, waiting for an in-flight load
    /// otherwise. Returns the load error on every call after a failure.
    ///
    /// Cancel safe: a caller that stops waiting does not abort the load.
    pub async fn ensure_loaded(&self) -> Result<()> {
        match self.outcome().await {
            Ok(_) => Ok(()),
            Err(msg) => Err(anyhow::anyhow!("{msg}")),
        }
    }

    /// The loaded model, or `None` if loading failed.
    pub async fn model(&self) -> Option<Arc<dyn ToxicityModel>> {
        self.outcome().await.as_ref().ok().cloned()
    }

    pub fn status(&self) -> ModelStatus {
        match self.inner.cell.get() {
            Some(Ok(_)) => ModelStatus::Ready,
            Some(Err(msg)) => ModelStatus::Failed(msg.clone()),
            None if self.inner.started.load(Ordering::Acquire) => ModelStatus::Loading,
            None => ModelStatus::NotLoaded,
        }
    }

    async fn outcome(&self) -> &LoadOutcome {
        if let Some(outcome) = self.inner.cell.get() {
            return outcome;
        }

        // The load runs in its own task so that dropping this future (a
        // caller-side timeout, say) leaves it running for everyone else.
        self.inner.started.store(true, Ordering::Release);
        let state = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            state.cell.get_or_init(|| state.load()).await;
        });

        // A load task that panicked or was aborted counts as a failed load.
        let msg = match task.await {
            Ok(()) => "Toxicity model load did not finish".to_string(),
            Err(e) => {
                error!(error = %e, "Toxicity model load task failed");
                format!("Toxicity model load task failed: {e}")
            }
        };
        self.inner.cell.get_or_init(|| async { Err(msg) }).await
    }
}

impl LoadState {
    async fn load(&self) -> LoadOutcome {
        info!(
            threshold = self.settings.threshold,
            categories = self.settings.categories.len(),
            "Loading toxicity model"
        );

        let load = self.loader.load(&self.settings);
        match tokio::time::timeout(self.settings.load_timeout, load).await {
            Ok(Ok(model)) => {
                info!("Toxicity model ready");
                Ok(model)
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to load toxicity model");
                Err(format!("Failed to load toxicity model: {e:#}"))
            }
            Err(_) => {
                error!(
                    timeout_secs = self.settings.load_timeout.as_secs(),
                    "Toxicity model load timed out"
                );
                Err(format!(
                    "Toxicity model load timed out after {}s",
                    self.settings.load_timeout.as_secs()
                ))
            }
        }
    }
}
