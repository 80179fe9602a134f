// System status display: classifier settings and model files.

use colored::Colorize;

use crate::config::{ClassifierBackend, Config};
use crate::toxicity::download::{TOXICITY_MODEL_FILE, TOXICITY_TOKENIZER_FILE};

/// Display system status to the terminal.
pub fn show(config: &Config) {
    println!("Classifier: {}", config.classifier.as_str().bold());
    println!(
        "Thresholds: lexical score < {}, model category > {}",
        config.lexical_threshold, config.category_threshold
    );
    println!("Scan concurrency: {}", config.scan_concurrency);
    println!(
        "Model load timeout: {}s",
        config.model_load_timeout.as_secs()
    );

    println!("Model directory: {}", config.model_dir.display());
    let mut missing = false;
    for file in [TOXICITY_MODEL_FILE, TOXICITY_TOKENIZER_FILE] {
        match std::fs::metadata(config.model_dir.join(file)) {
            Ok(meta) => println!("  {} ({})", file, format_bytes(meta.len())),
            Err(_) => {
                missing = true;
                println!("  {} {}", file, "(missing)".dimmed());
            }
        }
    }

    if missing {
        let hint = "Run `nightwalker download-model` to enable the onnx classifier.";
        if config.classifier == ClassifierBackend::Onnx {
            println!("\n{} {}", "Warning:".yellow(), hint);
        } else {
            println!("\n{}", hint.dimmed());
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
