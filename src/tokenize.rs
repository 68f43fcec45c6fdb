use once_cell::sync::Lazy;
use regex::Regex;

use crate::fraction::{CLUMP_MARK, clump, hide_slash, restore_slash};

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").expect("valid markup regex"));

// Fractions first so `1!1/2` is not split at the clump mark.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:[0-9]+{CLUMP_MARK})?[0-9]+/[0-9]+|[0-9]+|[A-Za-z*?!']+|[(),]"
    ))
    .expect("valid token regex")
});

/// Split one ingredient line into tagger tokens.
///
/// Markup such as `<b>` is dropped, mixed numbers stay clumped (`1!1/2`), and
/// slashes outside fractions separate tokens. Case is preserved.
pub fn tokenize(line: &str) -> Vec<String> {
    let cleaned = MARKUP.replace_all(line, "");
    let hidden = hide_slash(&clump(&cleaned));
    let split = restore_slash(&hidden.replace('/', " "));

    TOKEN
        .find_iter(&split)
        .map(|m| m.as_str().to_string())
        .collect()
}
