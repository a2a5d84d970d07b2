use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fmt;

/// Normalized token used as an index key.
pub type Term = String;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = STOPWORD_LIST.iter().copied().collect();
    static ref UNSTEMMED: HashSet<&'static str> = SNOWBALL_STOPWORDS.iter().copied().collect();
}

/// Words dropped after lowercasing. Fixed, English only.
pub const STOPWORD_LIST: &[&str] = &["a", "and", "be", "have", "i", "in", "of", "that", "the", "to"];

/// Snowball's English stopword list. These survive filtering but are never
/// stemmed, so `does` stays apart from `doe`.
pub const SNOWBALL_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "did", "do", "does", "doing", "don", "down", "during",
    "each", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself",
    "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such",
    "t", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "you", "your", "yours", "yourself", "yourselves",
];

/// Split text into runs of letters and digits. Every other code point is a separator.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> + '_ {
    RE.find_iter(text).map(|m| m.as_str())
}

pub fn lowercase_filter<'a, I>(tokens: I) -> impl Iterator<Item = String> + 'a
where
    I: IntoIterator + 'a,
    I::Item: AsRef<str>,
{
    tokens.into_iter().map(|t| lowercase(t.as_ref()))
}

/// Per-char lowercase: one char in, one char out. `İ` becomes `i` and a
/// final `Σ` becomes `σ`, unlike `str::to_lowercase`.
pub fn lowercase(token: &str) -> String {
    token.chars().map(|c| c.to_lowercase().next().unwrap_or(c)).collect()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

pub fn stopword_filter<'a, I>(tokens: I) -> impl Iterator<Item = String> + 'a
where
    I: IntoIterator<Item = String> + 'a,
{
    tokens.into_iter().filter(|t| !is_stopword(t))
}

/// Text analysis pipeline: tokenize, lowercase, drop stopwords, stem.
///
/// The same analyzer must be used for indexing and for queries, otherwise
/// query terms will not line up with indexed terms.
pub struct Analyzer {
    stemmer: Stemmer,
}

impl Analyzer {
    pub fn new() -> Self {
        Self { stemmer: Stemmer::create(Algorithm::English) }
    }

    /// Snowball English stem of an already lowercased token. Snowball
    /// stopwords come back unchanged.
    pub fn stem(&self, token: &str) -> Term {
        if UNSTEMMED.contains(token) {
            return token.to_string();
        }
        self.stemmer.stem(token).into_owned()
    }

    pub fn stem_filter<'a, I>(&'a self, tokens: I) -> impl Iterator<Item = Term> + 'a
    where
        I: IntoIterator<Item = String> + 'a,
    {
        tokens.into_iter().map(move |t| self.stem(&t))
    }

    /// Run the full pipeline. Output order follows the source text and
    /// repeated terms are kept; dedup happens at index insertion.
    pub fn analyze(&self, text: &str) -> Vec<Term> {
        let tokens = tokenize(text);
        let tokens = lowercase_filter(tokens);
        let tokens = stopword_filter(tokens);
        self.stem_filter(tokens).collect()
    }
}

impl Default for Analyzer {
    fn default() -> Self { Self::new() }
}

impl Clone for Analyzer {
    fn clone(&self) -> Self { Self::new() }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("algorithm", &"english")
            .field("stopwords", &STOPWORD_LIST)
            .finish()
    }
}
