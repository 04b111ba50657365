use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_ALPHA: Regex = Regex::new(r"[^A-Za-z]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Exact membership in the fixed English stop-word list.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Collapse every maximal run of non-alphabetic characters to a single space
/// and lowercase. NFKC runs first so full-width letters survive the filter.
fn collapse(text: &str) -> String {
    let normalized = text.nfkc().collect::<String>();
    NON_ALPHA.replace_all(&normalized, " ").to_lowercase()
}

/// Tokenize `text` into an ordered sequence of terms, stemmed when `stem`
/// is set. Empty tokens at the string boundaries are preserved so that
/// stemmed and raw sequences stay index-aligned; an empty input yields an
/// empty sequence.
pub fn normalize(text: &str, stem: bool) -> Vec<String> {
    let collapsed = collapse(text);
    if collapsed.is_empty() {
        return Vec::new();
    }
    collapsed
        .split(' ')
        .map(|t| {
            if stem {
                STEMMER.stem(t).to_string()
            } else {
                t.to_string()
            }
        })
        .collect()
}

/// Produce the stemmed and raw token sequences from a single pass over the
/// same input. The two sequences have identical length and alignment, which
/// the chunker relies on for shared cut points.
pub fn normalize_pair(text: &str) -> (Vec<String>, Vec<String>) {
    let collapsed = collapse(text);
    if collapsed.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let raw: Vec<String> = collapsed.split(' ').map(str::to_string).collect();
    let stemmed = raw.iter().map(|t| STEMMER.stem(t).to_string()).collect();
    (stemmed, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_and_lowercases() {
        let toks = normalize("Don't STOP me now!!", false);
        assert_eq!(toks, vec!["don", "t", "stop", "me", "now", ""]);
    }

    #[test]
    fn stems_inflected_forms() {
        let toks = normalize("placebos tables", true);
        assert_eq!(toks[0], "placebo");
        assert_eq!(toks[1], normalize("table", true)[0]);
    }

    #[test]
    fn raw_and_stemmed_stay_aligned() {
        let (stemmed, raw) = normalize_pair("Running, runners ran near the tables.");
        assert_eq!(stemmed.len(), raw.len());
        assert_eq!(raw[0], "running");
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(normalize("", true).is_empty());
        let (s, r) = normalize_pair("");
        assert!(s.is_empty() && r.is_empty());
    }

    #[test]
    fn classifies_stopwords() {
        assert!(is_stopword("the"));
        assert!(is_stopword("and"));
        assert!(!is_stopword("placebo"));
    }
}
