// Built-in polarity lexicon for the lexical sentiment scorer.
//
// Weights follow the AFINN convention: integers from -5 (very negative) to
// +5 (very positive). Entries are lowercase; lookups lowercase the token
// first. Words missing from the table contribute nothing.

/// Word → signed polarity weight.
pub const LEXICON: &[(&str, i32)] = &[
    // --- negative ---
    ("abandon", -2),
    ("abandoned", -2),
    ("abhor", -3),
    ("abuse", -3),
    ("abused", -3),
    ("abusive", -3),
    ("afraid", -2),
    ("aggressive", -2),
    ("angry", -3),
    ("annoy", -2),
    ("annoying", -2),
    ("anxious", -2),
    ("arrogant", -2),
    ("ashamed", -2),
    ("asshole", -4),
    ("attack", -1),
    ("awful", -3),
    ("bad", -3),
    ("bastard", -5),
    ("bitch", -5),
    ("boring", -3),
    ("broken", -1),
    ("brutal", -3),
    ("bullshit", -4),
    ("cheat", -3),
    ("clueless", -2),
    ("crap", -3),
    ("crazy", -2),
    ("cruel", -3),
    ("cry", -1),
    ("damn", -4),
    ("dead", -3),
    ("despise", -3),
    ("destroy", -3),
    ("die", -3),
    ("disappointed", -2),
    ("disgusting", -3),
    ("dislike", -2),
    ("dumb", -3),
    ("fail", -2),
    ("fake", -3),
    ("fool", -2),
    ("fraud", -4),
    ("fuck", -4),
    ("fucking", -4),
    ("garbage", -1),
    ("greedy", -2),
    ("hate", -3),
    ("hated", -3),
    ("hateful", -3),
    ("hates", -3),
    ("hating", -3),
    ("hell", -4),
    ("horrible", -3),
    ("hurt", -2),
    ("idiot", -3),
    ("idiotic", -3),
    ("ignorant", -2),
    ("insult", -2),
    ("kill", -3),
    ("killed", -3),
    ("lame", -2),
    ("liar", -3),
    ("loathe", -3),
    ("loser", -3),
    ("moron", -3),
    ("nasty", -3),
    ("no", -1),
    ("pathetic", -2),
    ("pissed", -4),
    ("poor", -2),
    ("racist", -3),
    ("ridiculous", -3),
    ("ruin", -2),
    ("sad", -2),
    ("scum", -3),
    ("shit", -4),
    ("sick", -2),
    ("stupid", -2),
    ("suck", -3),
    ("sucks", -3),
    ("terrible", -3),
    ("threat", -2),
    ("ugly", -3),
    ("useless", -2),
    ("violent", -3),
    ("waste", -1),
    ("weak", -2),
    ("worst", -3),
    ("worthless", -2),
    ("wtf", -4),
    // --- positive ---
    ("accept", 1),
    ("admire", 3),
    ("adorable", 3),
    ("agree", 1),
    ("amazing", 4),
    ("appreciate", 2),
    ("awesome", 4),
    ("beautiful", 3),
    ("best", 3),
    ("breathtaking", 5),
    ("brilliant", 4),
    ("care", 2),
    ("cool", 1),
    ("delight", 3),
    ("excellent", 3),
    ("fabulous", 4),
    ("fantastic", 4),
    ("fun", 4),
    ("funny", 4),
    ("gorgeous", 3),
    ("great", 3),
    ("happy", 3),
    ("helpful", 2),
    ("hilarious", 2),
    ("impressive", 3),
    ("inspire", 2),
    ("inspired", 2),
    ("inspiring", 3),
    ("joy", 3),
    ("like", 2),
    ("lol", 3),
    ("love", 3),
    ("loved", 3),
    ("lovely", 3),
    ("masterpiece", 4),
    ("nice", 3),
    ("outstanding", 5),
    ("perfect", 3),
    ("pretty", 1),
    ("stunning", 4),
    ("superb", 5),
    ("thank", 2),
    ("thanks", 2),
    ("win", 4),
    ("wonderful", 4),
    ("wow", 4),
    ("yes", 1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lexicon_has_no_duplicates() {
        let mut seen = HashSet::new();
        for (word, _) in LEXICON {
            assert!(seen.insert(*word), "duplicate lexicon entry: {word}");
        }
    }

    #[test]
    fn test_lexicon_entries_are_lowercase_and_nonzero() {
        for (word, weight) in LEXICON {
            assert_eq!(*word, word.to_lowercase(), "entry must be lowercase: {word}");
            assert!(*weight != 0, "zero weight for {word}");
            assert!((-5..=5).contains(weight), "weight out of range for {word}");
        }
    }
}
