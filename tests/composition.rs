// End-to-end composition: mock feed -> moderation panel -> classifier ->
// removal, the way the `scan` command wires them together.

use std::sync::Arc;

use chrono::{Duration, Utc};

use nightwalker::config::{ClassifierBackend, Config};
use nightwalker::feed::{CommentSource, MockFeed};
use nightwalker::moderation::panel::{Highlight, ModerationPanel, Removal};
use nightwalker::output::format_age;
use nightwalker::toxicity::lexical::LexicalScorer;
use nightwalker::toxicity::traits::TextClassifier;

#[tokio::test]
async fn purge_protocol_over_a_post() {
    let feed = MockFeed::new();
    let classifier: Arc<dyn TextClassifier> = Arc::new(LexicalScorer::default());
    let mut panel = ModerationPanel::load(&feed, "post1", classifier)
        .await
        .unwrap();

    let hostile = panel
        .submit(&feed, "I hate this terrible awful post")
        .await
        .unwrap()
        .map(|c| c.comment.id.clone())
        .unwrap();
    panel.submit(&feed, "Gorgeous, love the palette").await.unwrap();

    let summary = panel.scan().await;
    assert_eq!(summary.scanned, 4);
    assert_eq!(summary.toxic, 1);
    assert!(summary.unavailable.is_none());

    let flagged: Vec<&str> = panel.flagged().map(|c| c.comment.id.as_str()).collect();
    assert_eq!(flagged, vec![hostile.as_str()]);
    assert_eq!(
        panel.get(&hostile).unwrap().verdict().unwrap().rationale(),
        vec!["hate", "terrible", "awful"]
    );

    assert_eq!(panel.remove(&hostile), Removal::Removed);
    assert_eq!(panel.flagged().count(), 0);
    assert!(panel
        .comments()
        .iter()
        .all(|c| c.highlight() != Highlight::Toxic));

    // Removal only touches the local view.
    assert_eq!(feed.post_comments("post1").await.unwrap().len(), 2);
}

#[tokio::test]
async fn classifier_choice_does_not_change_the_panel_contract() {
    let feed = MockFeed::new();
    let strict: Arc<dyn TextClassifier> = Arc::new(LexicalScorer::new(0));
    let mut panel = ModerationPanel::load(&feed, "post1", strict).await.unwrap();
    panel.submit(&feed, "so sad").await.unwrap();

    panel.scan().await;
    // -2 is below a threshold of 0.
    assert_eq!(panel.flagged().count(), 1);
    assert_eq!(panel.purge_flagged(), 1);
    assert_eq!(panel.comments().len(), 2);
}

#[test]
fn default_config_selects_lexical_backend() {
    assert_eq!(
        ClassifierBackend::parse(None).unwrap(),
        ClassifierBackend::Lexical
    );
    assert_eq!(
        ClassifierBackend::parse(Some("ONNX")).unwrap(),
        ClassifierBackend::Onnx
    );
    assert!(ClassifierBackend::parse(Some("perspective")).is_err());
}

#[test]
fn model_settings_follow_config() {
    let config = Config {
        classifier: ClassifierBackend::Onnx,
        model_dir: std::env::temp_dir().join("nightwalker-test-models"),
        lexical_threshold: -2,
        category_threshold: 0.9,
        scan_concurrency: 4,
        model_load_timeout: std::time::Duration::from_secs(5),
    };
    let settings = config.model_settings();
    assert_eq!(settings.threshold, 0.9);
    assert_eq!(settings.load_timeout, std::time::Duration::from_secs(5));
    assert_eq!(settings.categories.len(), 5);
    assert!(config.require_classifier().is_err(), "no model files in temp dir");
}

#[test]
fn comment_ages_render_relative_to_now() {
    let now = Utc::now();
    assert_eq!(format_age(now - Duration::minutes(3), now), "3 minutes ago");
    assert_eq!(format_age(now - Duration::days(1), now), "1 day ago");
}
