// Unit tests for the lexical sentiment scorer.
//
// Covers the toxicity threshold boundary, comparative scoring, empty and
// odd input, determinism, and the matched-token lists.

use std::collections::HashMap;

use nightwalker::toxicity::lexical::LexicalScorer;
use nightwalker::toxicity::lexicon::LEXICON;
use nightwalker::toxicity::traits::{ScoreSet, TextClassifier};

// ============================================================
// Scenarios
// ============================================================

#[test]
fn hostile_comment_is_flagged_with_negative_terms() {
    let scorer = LexicalScorer::default();
    let verdict = scorer.verdict("I hate this terrible awful post");

    assert!(verdict.is_toxic);
    let ScoreSet::Sentiment(s) = &verdict.scores else {
        panic!("expected sentiment scores");
    };
    assert!(s.score <= -2, "score should be at most -2, got {}", s.score);
    assert_eq!(s.negative, vec!["hate", "terrible", "awful"]);
    assert!(s.positive.is_empty());
    assert_eq!(verdict.rationale(), vec!["hate", "terrible", "awful"]);
}

#[test]
fn friendly_comment_is_clean() {
    let scorer = LexicalScorer::default();
    let verdict = scorer.verdict("What a lovely wonderful day");

    assert!(!verdict.is_toxic);
    let ScoreSet::Sentiment(s) = &verdict.scores else {
        panic!("expected sentiment scores");
    };
    assert!(s.score > 0);
    assert_eq!(s.positive, vec!["lovely", "wonderful"]);
    assert!(s.negative.is_empty());
}

// ============================================================
// Threshold boundary: toxic iff score < -2
// ============================================================

#[test]
fn weight_minus_three_is_toxic() {
    let scorer = LexicalScorer::default();
    let s = scorer.score("that was bad");
    assert_eq!(s.score, -3);
    assert!(scorer.verdict("that was bad").is_toxic);
}

#[test]
fn weight_minus_two_is_not_toxic() {
    let scorer = LexicalScorer::default();
    assert_eq!(scorer.score("so sad").score, -2);
    assert!(!scorer.verdict("so sad").is_toxic);
}

#[test]
fn no_lexicon_matches_is_clean() {
    let scorer = LexicalScorer::default();
    let verdict = scorer.verdict("What software do you use?");
    assert!(!verdict.is_toxic);
    let ScoreSet::Sentiment(s) = verdict.scores else {
        panic!("expected sentiment scores");
    };
    assert_eq!(s.score, 0);
    assert!(s.negative.is_empty() && s.positive.is_empty());
}

#[test]
fn positive_words_offset_negative_ones() {
    let scorer = LexicalScorer::default();
    // hate (-3) + love (+3)
    let verdict = scorer.verdict("love it or hate it");
    assert!(!verdict.is_toxic);
}

// ============================================================
// comparative = score / token_count
// ============================================================

#[test]
fn comparative_divides_by_token_count() {
    let scorer = LexicalScorer::default();
    let s = scorer.score("bad day");
    assert!((s.comparative - (-1.5)).abs() < 1e-10, "got {}", s.comparative);

    let s = scorer.score("What a lovely wonderful day");
    let tokens = scorer.tokenize("What a lovely wonderful day").len();
    assert_eq!(tokens, 5);
    assert!((s.comparative - s.score as f64 / tokens as f64).abs() < 1e-10);
}

#[test]
fn empty_text_is_neutral() {
    let scorer = LexicalScorer::default();
    for text in ["", "   ", "?!...", "\n\t"] {
        let s = scorer.score(text);
        assert_eq!(s.score, 0, "text {text:?}");
        assert_eq!(s.comparative, 0.0, "text {text:?}");
        assert!(s.negative.is_empty() && s.positive.is_empty());
        assert!(!scorer.verdict(text).is_toxic);
    }
}

#[test]
fn unusual_input_does_not_panic() {
    let scorer = LexicalScorer::default();
    let long = "awful ".repeat(10_000);
    for text in ["✨🦉", "ñandú CAFÉ", "\u{0}\u{1}", "a-b-c--d'e'", long.as_str()] {
        let _ = scorer.verdict(text);
    }
    assert_eq!(scorer.score(&long).score, -30_000);
}

#[test]
fn lookup_is_case_insensitive() {
    let scorer = LexicalScorer::default();
    assert_eq!(scorer.score("HATE").score, scorer.score("hate").score);
    assert_eq!(scorer.score("HATE").negative, vec!["hate"]);
}

// ============================================================
// Purity and token-list invariants
// ============================================================

#[test]
fn scoring_is_deterministic_regardless_of_call_order() {
    let scorer = LexicalScorer::default();
    let first = scorer.verdict("You are a stupid idiot but a nice one");
    let _ = scorer.verdict("something else entirely, great stuff");
    let _ = scorer.verdict("");
    let second = scorer.verdict("You are a stupid idiot but a nice one");
    assert_eq!(first, second);

    let other = LexicalScorer::default();
    assert_eq!(first, other.verdict("You are a stupid idiot but a nice one"));
}

#[test]
fn token_lists_are_disjoint_and_sum_to_score() {
    let lexicon: HashMap<&str, i32> = LEXICON.iter().copied().collect();
    let scorer = LexicalScorer::default();

    for text in [
        "love hate love",
        "This is absolutely stunning! The colors are otherworldly.",
        "Ugly, stupid, pathetic... but thanks anyway, great effort",
        "nothing to see here",
    ] {
        let s = scorer.score(text);
        assert!(
            s.negative.iter().all(|n| !s.positive.contains(n)),
            "lists overlap for {text:?}"
        );
        let sum: i32 = s
            .negative
            .iter()
            .chain(s.positive.iter())
            .map(|t| lexicon[t.as_str()])
            .sum();
        assert_eq!(sum, s.score, "token weights should sum to score for {text:?}");
        assert!(s.negative.iter().all(|t| lexicon[t.as_str()] < 0));
        assert!(s.positive.iter().all(|t| lexicon[t.as_str()] > 0));
    }
}

// ============================================================
// Through the TextClassifier trait
// ============================================================

#[tokio::test]
async fn analyze_through_trait_matches_verdict() {
    let scorer = LexicalScorer::default();
    let text = "I hate this terrible awful post";
    let verdict = scorer.analyze(text).await.unwrap();
    assert_eq!(verdict, scorer.verdict(text));
    assert_eq!(scorer.name(), "lexical");
    assert!(scorer.ensure_ready().await.is_ok());
}
