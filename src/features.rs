//! Feature rows in the column layout the CRF++ model was trained on:
//! `token  I<pos>  L<bucket>  YesCAP|NoCAP  NoPAREN`, tab separated.

use std::fmt;

use crate::tokenize::tokenize;

const LENGTH_BUCKETS: [usize; 5] = [4, 8, 12, 16, 20];

/// Coarse token-count class of the line a token came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LengthBucket {
    Under(usize),
    Overflow,
}

impl LengthBucket {
    /// First threshold strictly greater than `len`, else [`LengthBucket::Overflow`].
    pub fn for_len(len: usize) -> Self {
        let mut bucketed = LengthBucket::Overflow;
        for bucket in LENGTH_BUCKETS {
            if len < bucket {
                bucketed = LengthBucket::Under(bucket);
                break;
            }
        }
        bucketed
    }
}

impl fmt::Display for LengthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthBucket::Under(n) => write!(f, "{n}"),
            LengthBucket::Overflow => f.write_str("X"),
        }
    }
}

/// One token plus its derived features.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeatureRow {
    pub token: String,
    /// 1-based position within the source line.
    pub index: usize,
    pub bucket: LengthBucket,
    pub capitalized: bool,
    /// Always false; the trained model only ever saw `NoPAREN`.
    pub parenthesized: bool,
}

impl fmt::Display for FeatureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\tI{}\tL{}\t{}CAP\t{}PAREN",
            self.token,
            self.index,
            self.bucket,
            if self.capitalized { "Yes" } else { "No" },
            if self.parenthesized { "Yes" } else { "No" },
        )
    }
}

pub fn starts_with_capital(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Feature rows for an already tokenized line.
pub fn feature_rows<S: AsRef<str>>(tokens: &[S]) -> Vec<FeatureRow> {
    let bucket = LengthBucket::for_len(tokens.len());
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let token = token.as_ref();
            FeatureRow {
                token: token.to_string(),
                index: i + 1,
                bucket,
                capitalized: starts_with_capital(token),
                parenthesized: false,
            }
        })
        .collect()
}

/// Feature rows for a raw ingredient line.
pub fn line_features(line: &str) -> Vec<FeatureRow> {
    feature_rows(&tokenize(line))
}

/// Render newline-separated ingredient lines as a tagger input table.
///
/// Each line contributes its rows followed by one empty entry, and entries are
/// joined with `\n`, so the table ends with a single newline after the last
/// row rather than a blank line.
pub fn encode(ingredients: &str) -> String {
    let mut parsed: Vec<String> = Vec::new();
    for line in ingredients.split('\n') {
        parsed.extend(line_features(line).iter().map(ToString::to_string));
        parsed.push(String::new());
    }
    parsed.join("\n")
}
