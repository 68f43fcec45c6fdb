//! Reversible escaping that keeps mixed-number quantities (`1 1/2`) in one
//! piece while the tokenizer splits on whitespace and slashes.
//!
//! The clump marker is `!`, which is also how clumped quantities appear in the
//! tagger's input and output tables (`1!1/2`). The slash sentinel never leaves
//! the tokenizer, so it lives in the private-use area.

use once_cell::sync::Lazy;
use regex::Regex;

/// Stands in for the space between the whole and fractional part.
// A literal `2!1/2` in the input is indistinguishable and decodes as `2 1/2`.
pub const CLUMP_MARK: char = '!';

/// Stands in for a fraction's slash while other slashes are split apart.
pub const SLASH_SENTINEL: char = '\u{E000}';

static MIXED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)\s+([0-9]+)/([0-9]+)").expect("valid mixed number regex")
});

static CLUMPED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)!([0-9]+)/([0-9]+)").expect("valid clumped number regex")
});

static FRACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+!)?([0-9]+)/([0-9]+)").expect("valid fraction regex")
});

/// `"aaa 1 2/3 bbb"` becomes `"aaa 1!2/3 bbb"`.
pub fn clump(text: &str) -> String {
    MIXED_NUMBER
        .replace_all(text, "${1}!${2}/${3}")
        .into_owned()
}

/// Reverse of [`clump`] for a single token: `"1!2/3"` becomes `"1 2/3"`.
pub fn unclump(token: &str) -> String {
    CLUMPED_NUMBER
        .replace_all(token, "${1} ${2}/${3}")
        .into_owned()
}

/// Swap the slash of every (possibly clumped) fraction for [`SLASH_SENTINEL`].
pub fn hide_slash(text: &str) -> String {
    FRACTION
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!(
                "{}{}{}{}",
                caps.get(1).map_or("", |m| m.as_str()),
                &caps[2],
                SLASH_SENTINEL,
                &caps[3]
            )
        })
        .into_owned()
}

/// Reverse of [`hide_slash`].
pub fn restore_slash(text: &str) -> String {
    text.replace(SLASH_SENTINEL, "/")
}
