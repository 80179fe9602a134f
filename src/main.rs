use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use nightwalker::config::{ClassifierBackend, Config};
use nightwalker::feed::MockFeed;
use nightwalker::moderation::{ModerationPanel, Removal};
use nightwalker::toxicity::lexical::LexicalScorer;
use nightwalker::toxicity::ml::MlClassifier;
use nightwalker::toxicity::model::ModelHandle;
use nightwalker::toxicity::traits::TextClassifier;

/// Night Walker: comment toxicity screening for the social feed.
///
/// Scans a post's comments with a pluggable classifier, flags the toxic
/// ones, and lets you purge them from the view.
#[derive(Parser)]
#[command(name = "nightwalker", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single piece of text
    Analyze {
        /// The text to classify
        text: String,

        /// Classifier to use: lexical or onnx (overrides NIGHTWALKER_CLASSIFIER)
        #[arg(long)]
        classifier: Option<String>,

        /// Print the verdict as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Run the purge protocol over a post's comments
    Scan {
        /// Post whose comments to scan
        #[arg(long, default_value = "post1")]
        post: String,

        /// Submit a comment before scanning (repeatable)
        #[arg(long = "add")]
        add: Vec<String>,

        /// Remove every flagged comment after the scan
        #[arg(long)]
        purge: bool,

        /// Remove a single flagged comment by id after the scan (repeatable)
        #[arg(long = "remove")]
        remove: Vec<String>,

        /// Classifier to use: lexical or onnx (overrides NIGHTWALKER_CLASSIFIER)
        #[arg(long)]
        classifier: Option<String>,

        /// Number of comments to classify in parallel
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Search people and posts in the feed
    Search {
        /// At least two characters
        query: String,
    },

    /// Download the ONNX toxicity model (~126 MB)
    DownloadModel,

    /// Show classifier settings and model files
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("nightwalker=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            text,
            classifier,
            json,
        } => {
            let config = load_config(classifier.as_deref())?;
            let classifier = create_classifier(&config);

            if let Err(e) = classifier.ensure_ready().await {
                eprintln!(
                    "{} Scanning unavailable ({e:#}). Falling back to a clean verdict.",
                    "Warning:".yellow()
                );
            }

            let verdict = classifier.analyze(&text).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                nightwalker::output::terminal::display_verdict(&text, &verdict);
            }
        }

        Commands::Scan {
            post,
            add,
            purge,
            remove,
            classifier,
            concurrency,
        } => {
            let config = load_config(classifier.as_deref())?;
            let feed = MockFeed::new();

            if feed.post(&post).is_none() {
                anyhow::bail!("Post not found: {post}. Try one of: post1, post2, post3, post4.");
            }

            let classifier = create_classifier(&config);
            let mut panel = ModerationPanel::load(&feed, &post, classifier)
                .await?
                .with_concurrency(concurrency.unwrap_or(config.scan_concurrency));

            for text in &add {
                if panel.submit(&feed, text).await?.is_none() {
                    println!("{}", "Skipping empty comment.".dimmed());
                }
            }

            if panel.comments().is_empty() {
                nightwalker::output::terminal::display_comments(&panel, Utc::now());
                return Ok(());
            }

            println!(
                "Running purge protocol with the {} classifier...",
                panel.classifier_name()
            );
            let summary = panel.scan().await;
            nightwalker::output::terminal::display_comments(&panel, Utc::now());
            nightwalker::output::terminal::display_scan_summary(&summary);

            let mut removed = 0;
            for id in &remove {
                match panel.remove(id) {
                    Removal::Removed => removed += 1,
                    Removal::NotFlagged => {
                        println!("  {} {} is not flagged, keeping it", "~".yellow(), id)
                    }
                    Removal::NotFound => println!("  {} {} not found", "~".yellow(), id),
                }
            }
            if purge {
                removed += panel.purge_flagged();
            }

            if removed > 0 {
                info!(removed, "Removed flagged comments");
                println!(
                    "\n{}",
                    format!("Removed {removed} flagged comment(s) from the view.").bold()
                );
                nightwalker::output::terminal::display_comments(&panel, Utc::now());
            }
        }

        Commands::Search { query } => {
            let feed = MockFeed::new();
            let users = feed.search_users(&query);
            let posts = feed.search_posts(&query);
            nightwalker::output::terminal::display_search(&query, &users, &posts);
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX toxicity model...");
            println!("  Destination: {}", model_dir.display());

            nightwalker::toxicity::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("Set NIGHTWALKER_CLASSIFIER=onnx or pass `--classifier onnx` to use it.");
        }

        Commands::Status => {
            let config = Config::load()?;
            nightwalker::status::show(&config);
        }
    }

    Ok(())
}

/// Load configuration, applying a `--classifier` override if given.
fn load_config(classifier: Option<&str>) -> Result<Config> {
    let mut config = Config::load()?;
    if classifier.is_some() {
        config.classifier = ClassifierBackend::parse(classifier)?;
    }
    if let Err(e) = config.require_classifier() {
        // Not fatal: the model load fails once and scanning reports unavailable.
        warn!(error = %e, "Classifier is not ready");
    }
    Ok(config)
}

/// Create the text classifier selected by configuration.
fn create_classifier(config: &Config) -> Arc<dyn TextClassifier> {
    match config.classifier {
        ClassifierBackend::Lexical => {
            info!("Using lexical sentiment classifier");
            Arc::new(LexicalScorer::new(config.lexical_threshold))
        }
        ClassifierBackend::Onnx => {
            info!("Using local ONNX toxicity classifier");
            let handle = ModelHandle::shared(config.model_dir.clone(), config.model_settings());
            Arc::new(MlClassifier::new(handle))
        }
    }
}
