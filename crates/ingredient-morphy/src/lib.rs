//! Noun singularization tuned for the words that show up as ingredient units.
//!
//! Follows the morphy recipe minus the dictionary lookup: normalize, check an
//! exception list, then apply the first matching noun suffix rule. Without a
//! lemma dictionary to veto candidates the rule table is deliberately short;
//! anything irregular belongs in the exception list instead.
//!
//! # How it works
//! 1. Lower-case and trim the surface form.
//! 2. Return the exception entry if one exists (`leaves` -> `leaf`).
//! 3. Leave `ss`/`us` endings alone (`glass`, `asparagus`).
//! 4. Apply the first rule whose suffix matches (`pinches` -> `pinch`).
//!
//! # Example
//! ```
//! use ingredient_morphy::{Morphy, Source};
//!
//! let morph = Morphy::builtin();
//! let cand = morph.singular("Tablespoons").unwrap();
//! assert_eq!(cand.lemma, "tablespoon");
//! assert!(matches!(cand.source, Source::Rule { suffix: "s", .. }));
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Where a singular form came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    Surface,
    Exception,
    Rule {
        suffix: &'static str,
        replacement: &'static str,
    },
}

/// A singular form paired with its provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Singular {
    pub lemma: String,
    pub source: Source,
}

const BUILTIN_EXCEPTIONS: &[(&str, &str)] = &[
    ("leaves", "leaf"),
    ("halves", "half"),
    ("loaves", "loaf"),
    ("knives", "knife"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("cookies", "cookie"),
    ("buses", "bus"),
    ("topazes", "topaz"),
    ("men", "man"),
    ("women", "woman"),
    ("tbs", "tbs"),
];

const NOUN_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("s", ""),
];

/// Exception-first singularizer.
#[derive(Clone, Debug)]
pub struct Morphy {
    exceptions: HashMap<String, String>,
}

impl Default for Morphy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Morphy {
    /// Singularizer with only the built-in exception list.
    pub fn builtin() -> Self {
        Self {
            exceptions: BUILTIN_EXCEPTIONS
                .iter()
                .map(|(plural, single)| (plural.to_string(), single.to_string()))
                .collect(),
        }
    }

    /// Built-ins plus the entries of a `noun.exc`-style file, which override
    /// built-ins with the same plural.
    ///
    /// A missing file is treated as empty.
    pub fn load(exc_path: impl AsRef<Path>) -> Result<Self> {
        let mut morph = Self::builtin();
        morph.exceptions.extend(load_exc(exc_path.as_ref())?);
        Ok(morph)
    }

    /// Singular form of `surface`.
    ///
    /// Errors on empty input or on anything that is not a word (digits,
    /// punctuation), so callers can fall back to the surface text.
    pub fn singular(&self, surface: &str) -> Result<Singular> {
        let norm = normalize(surface);
        if norm.is_empty() {
            bail!("cannot singularize an empty word");
        }
        if let Some(bad) = norm
            .chars()
            .find(|c| !c.is_alphabetic() && *c != '-' && *c != '\'')
        {
            bail!("cannot singularize {surface:?}: unexpected character {bad:?}");
        }

        if let Some(lemma) = self.exceptions.get(&norm) {
            return Ok(Singular {
                lemma: lemma.clone(),
                source: Source::Exception,
            });
        }

        if norm.ends_with("ss") || norm.ends_with("us") {
            return Ok(Singular {
                lemma: norm,
                source: Source::Surface,
            });
        }

        for &(suffix, replacement) in NOUN_RULES {
            if let Some(lemma) = apply_rule(&norm, suffix, replacement) {
                return Ok(Singular {
                    lemma,
                    source: Source::Rule {
                        suffix,
                        replacement,
                    },
                });
            }
        }

        Ok(Singular {
            lemma: norm,
            source: Source::Surface,
        })
    }
}

fn load_exc(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file =
        File::open(path).with_context(|| format!("open exception file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let mut parts = line.split_whitespace();
        let (Some(plural), Some(single)) = (parts.next(), parts.next()) else {
            continue;
        };
        map.insert(normalize(plural), normalize(single));
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

// Stems shorter than two characters are never produced ("is", "as").
fn apply_rule(surface: &str, suffix: &str, replacement: &str) -> Option<String> {
    let stem = surface.strip_suffix(suffix)?;
    if stem.chars().count() < 2 {
        return None;
    }
    Some(format!("{stem}{replacement}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_of(morph: &Morphy, word: &str) -> (String, &'static str) {
        let cand = morph.singular(word).unwrap();
        match cand.source {
            Source::Rule { suffix, .. } => (cand.lemma, suffix),
            other => panic!("{word} resolved via {other:?}"),
        }
    }

    #[test]
    fn each_rule_fires_on_its_suffix() {
        let morph = Morphy::builtin();
        assert_eq!(rule_of(&morph, "berries"), ("berry".into(), "ies"));
        assert_eq!(rule_of(&morph, "glasses"), ("glass".into(), "sses"));
        assert_eq!(rule_of(&morph, "pinches"), ("pinch".into(), "ches"));
        assert_eq!(rule_of(&morph, "dashes"), ("dash".into(), "shes"));
        assert_eq!(rule_of(&morph, "boxes"), ("box".into(), "xes"));
        assert_eq!(rule_of(&morph, "cups"), ("cup".into(), "s"));
    }

    #[test]
    fn plain_s_rule_keeps_e_endings() {
        let morph = Morphy::builtin();
        assert_eq!(morph.singular("cases").unwrap().lemma, "case");
        assert_eq!(morph.singular("cheeses").unwrap().lemma, "cheese");
        assert_eq!(morph.singular("sizes").unwrap().lemma, "size");
        assert_eq!(morph.singular("ramen").unwrap().lemma, "ramen");
    }

    #[test]
    fn irregular_plurals_come_from_exceptions() {
        let morph = Morphy::builtin();
        for (plural, single) in [
            ("buses", "bus"),
            ("topazes", "topaz"),
            ("women", "woman"),
            ("men", "man"),
        ] {
            let cand = morph.singular(plural).unwrap();
            assert_eq!(cand.lemma, single);
            assert_eq!(cand.source, Source::Exception);
        }
    }

    #[test]
    fn strips_regular_plurals() {
        let morph = Morphy::builtin();
        assert_eq!(morph.singular("teaspoons").unwrap().lemma, "teaspoon");
        assert_eq!(morph.singular("pinches").unwrap().lemma, "pinch");
        assert_eq!(morph.singular("dashes").unwrap().lemma, "dash");
        assert_eq!(morph.singular("boxes").unwrap().lemma, "box");
        assert_eq!(morph.singular("berries").unwrap().lemma, "berry");
        assert_eq!(morph.singular("glasses").unwrap().lemma, "glass");
        assert_eq!(morph.singular("lbs").unwrap().lemma, "lb");
    }

    #[test]
    fn leaves_singulars_alone() {
        let morph = Morphy::builtin();
        let cand = morph.singular("teaspoon").unwrap();
        assert_eq!(cand.lemma, "teaspoon");
        assert_eq!(cand.source, Source::Surface);
        assert_eq!(morph.singular("glass").unwrap().lemma, "glass");
        assert_eq!(morph.singular("asparagus").unwrap().lemma, "asparagus");
        assert_eq!(morph.singular("is").unwrap().lemma, "is");
    }

    #[test]
    fn exceptions_win_over_rules() {
        let morph = Morphy::builtin();
        let cand = morph.singular("Leaves").unwrap();
        assert_eq!(cand.lemma, "leaf");
        assert_eq!(cand.source, Source::Exception);
        assert_eq!(morph.singular("cloves").unwrap().source, Source::Rule {
            suffix: "s",
            replacement: "",
        });
    }

    #[test]
    fn rejects_non_words() {
        let morph = Morphy::builtin();
        assert!(morph.singular("").is_err());
        assert!(morph.singular("   ").is_err());
        assert!(morph.singular("1!1/2").is_err());
        assert!(morph.singular(",").is_err());
        assert_eq!(morph.singular("half-pints").unwrap().lemma, "half-pint");
    }
}
