use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::moderation::panel::DEFAULT_SCAN_CONCURRENCY;
use crate::toxicity::lexical::DEFAULT_LEXICAL_THRESHOLD;
use crate::toxicity::model::{
    Category, ModelSettings, DEFAULT_CATEGORY_THRESHOLD, DEFAULT_LOAD_TIMEOUT,
};

/// Which text classifier backs the moderation panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    /// Built-in sentiment lexicon (default), no model files needed
    Lexical,
    /// Local ONNX toxicity model, requires `download-model` first
    Onnx,
}

impl ClassifierBackend {
    /// Parse a backend name. Unset or empty means the lexical default.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim) {
            None | Some("") => Ok(ClassifierBackend::Lexical),
            Some(v) if v.eq_ignore_ascii_case("lexical") => Ok(ClassifierBackend::Lexical),
            Some(v) if v.eq_ignore_ascii_case("onnx") => Ok(ClassifierBackend::Onnx),
            Some(other) => anyhow::bail!("Unknown classifier '{other}'. Use 'lexical' or 'onnx'."),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierBackend::Lexical => "lexical",
            ClassifierBackend::Onnx => "onnx",
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; every setting has a
/// default so the tool runs with no configuration at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub classifier: ClassifierBackend,
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    /// Lexical score below which a comment is flagged
    pub lexical_threshold: i32,
    /// Probability above which a model category counts as a match
    pub category_threshold: f64,
    /// Classifier calls in flight per batch scan
    pub scan_concurrency: usize,
    /// How long the one model load attempt may take
    pub model_load_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let classifier =
            ClassifierBackend::parse(env::var("NIGHTWALKER_CLASSIFIER").ok().as_deref())?;

        let model_dir = env::var("NIGHTWALKER_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::toxicity::download::default_model_dir());

        let lexical_threshold =
            parse_var("NIGHTWALKER_LEXICAL_THRESHOLD", DEFAULT_LEXICAL_THRESHOLD)?;

        let category_threshold =
            parse_var("NIGHTWALKER_CATEGORY_THRESHOLD", DEFAULT_CATEGORY_THRESHOLD)?;
        validate_probability("NIGHTWALKER_CATEGORY_THRESHOLD", category_threshold)?;

        let scan_concurrency: usize =
            parse_var("NIGHTWALKER_SCAN_CONCURRENCY", DEFAULT_SCAN_CONCURRENCY)?;

        let timeout_secs = parse_var(
            "NIGHTWALKER_MODEL_LOAD_TIMEOUT_SECS",
            DEFAULT_LOAD_TIMEOUT.as_secs(),
        )?;

        Ok(Self {
            classifier,
            model_dir,
            lexical_threshold,
            category_threshold,
            scan_concurrency: scan_concurrency.max(1),
            model_load_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Settings handed to the toxicity model when it loads.
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            threshold: self.category_threshold,
            categories: Category::ALL.to_vec(),
            load_timeout: self.model_load_timeout,
        }
    }

    /// Validate that the chosen classifier has what it needs.
    /// For ONNX: model files must exist (or user should run download-model).
    pub fn require_classifier(&self) -> Result<()> {
        match self.classifier {
            ClassifierBackend::Lexical => Ok(()),
            ClassifierBackend::Onnx => {
                if !crate::toxicity::download::model_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "ONNX model files not found in {}\n\
                         Run `nightwalker download-model` to download them.\n\
                         Or set NIGHTWALKER_CLASSIFIER=lexical to use the built-in lexicon instead.",
                        self.model_dir.display()
                    );
                }
                Ok(())
            }
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_value(name, env::var(name).ok().as_deref(), default)
}

fn parse_value<T>(name: &str, raw: Option<&str>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v
            .parse()
            .with_context(|| format!("Invalid value for {name}: '{v}'")),
    }
}

fn validate_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        anyhow::bail!("{name} must be between 0 and 1, got {value}");
    }
    Ok(())
}
