//! Line-level cleaning of text chunks.
//!
//! Scraped pages are dumped one element per line with structural labels
//! (`H2:`, `LI:`, `P:`, `URL:`). Chunks of that text carry the labels, repeated
//! navigation lines and separator debris such as `---`. [`clean`] strips all of
//! that and flattens the chunk into a single space-joined paragraph.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Default word threshold for [`filter_short`].
pub const DEFAULT_MIN_WORDS: usize = 20;

/// Characters that end a line. `\r\n` yields an empty line in between,
/// which is dropped like any other empty line.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:H\d:|LI:|P:|URL:)\s*").expect("prefix pattern is valid")
});

static TRIVIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[.,\- ]*$").expect("trivial pattern is valid"));

/// Strip at most one structural label from the start of a line.
pub fn strip_prefix(line: &str) -> &str {
    match PREFIX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// A line is trivial when it only holds dots, commas, dashes and spaces.
pub fn is_trivial(line: &str) -> bool {
    TRIVIAL.is_match(line)
}

/// Clean a single chunk.
///
/// Each line is label-stripped and trimmed; empty, trivial and already-seen
/// lines are dropped. Survivors are joined with a single space in their
/// original order. Deduplication only looks at lines of this chunk.
pub fn clean(chunk: &str) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();

    for line in chunk.split(LINE_BREAKS) {
        let line = strip_prefix(line).trim();

        if line.is_empty() || is_trivial(line) {
            continue;
        }

        if seen.insert(line) {
            kept.push(line);
        }
    }

    kept.join(" ")
}

/// Whitespace-tokenized word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep only chunks with strictly more than `min_words` words.
pub fn filter_short<I, S>(chunks: I, min_words: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    chunks
        .into_iter()
        .map(Into::into)
        .filter(|c| word_count(c) > min_words)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_labels_stripped_and_duplicates_dropped() {
        let chunk = "P: Live Jazz tonight\nP: Live Jazz tonight\nLI: Free admission";
        assert_eq!(clean(chunk), "Live Jazz tonight Free admission");
    }

    #[test]
    fn test_heading_and_url_prefixes() {
        let chunk = "H2: Weekend picks\nURL: https://example.com/events\n  H3:Parade";
        assert_eq!(
            clean(chunk),
            "Weekend picks https://example.com/events Parade"
        );
    }

    #[test]
    fn test_only_one_prefix_stripped() {
        assert_eq!(clean("P: LI: nested"), "LI: nested");
    }

    #[test]
    fn test_prefix_only_at_line_start() {
        assert_eq!(clean("Read the P: section"), "Read the P: section");
    }

    #[test]
    fn test_trivial_lines_dropped() {
        assert_eq!(clean("---"), "");
        assert_eq!(clean(", ."), "");
        assert_eq!(clean("P: ..."), "");
        assert_eq!(clean("Keep me\n- - -\nAnd me"), "Keep me And me");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("\n\n   \n"), "");
    }

    #[test]
    fn test_dedup_compares_after_strip_and_trim() {
        assert_eq!(clean("LI: Tacos\n  Tacos  \nP:Tacos"), "Tacos");
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        assert_eq!(clean("Jazz\njazz"), "Jazz jazz");
    }

    #[test]
    fn test_dedup_does_not_leak_between_chunks() {
        assert_eq!(clean("Same line"), "Same line");
        assert_eq!(clean("Same line"), "Same line");
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(clean("P: one\r\nP: two\r\n"), "one two");
    }

    #[test]
    fn test_bare_cr_and_unicode_line_breaks() {
        assert_eq!(clean("P: Live jazz\rP: Live jazz\rLI: Free"), "Live jazz Free");
        assert_eq!(clean("P: Live jazz\u{2028}P: Live jazz"), "Live jazz");
        assert_eq!(
            clean("H2: Events\u{0c}LI: Free\u{85}URL: x.com\u{2029}---"),
            "Events Free x.com"
        );
    }

    #[test]
    fn test_filter_short_threshold() {
        let chunks = vec![words(15), words(20), words(21)];
        let kept = filter_short(chunks, DEFAULT_MIN_WORDS);
        assert_eq!(kept, vec![words(21)]);
    }

    #[test]
    fn test_filter_short_preserves_order_and_duplicates() {
        let chunks = vec!["a b c", "x", "a b c"];
        assert_eq!(filter_short(chunks, 2), vec!["a b c", "a b c"]);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one\ttwo\nthree  "), 3);
        assert_eq!(word_count(""), 0);
    }

    proptest! {
        #[test]
        fn clean_never_adds_words(chunk in "[a-zA-Z0-9.,:\\- \n]{0,400}") {
            prop_assert!(word_count(&clean(&chunk)) <= word_count(&chunk));
        }

        #[test]
        fn clean_is_idempotent_without_labels(chunk in "[a-z.,\\- \n]{0,400}") {
            let once = clean(&chunk);
            prop_assert_eq!(clean(&once), once);
        }

        #[test]
        fn clean_output_is_single_line(chunk in "\\PC{0,300}") {
            prop_assert!(!clean(&chunk).contains('\n'));
        }
    }
}
