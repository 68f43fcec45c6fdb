//! Turns `crf_test -v 1` output back into ingredients.
//!
//! ```text
//! # 0.950492
//! 1	I1	L4	NoCAP	NoPAREN	B-QTY/0.979304
//! cup	I2	L4	NoCAP	NoPAREN	B-UNIT/0.978106
//! sugar	I3	L4	NoCAP	NoPAREN	B-NAME/0.984194
//!
//! ```
//!
//! `#` lines are ignored, every other non-empty line adds one token to the
//! current ingredient, and an empty line seals it. An ingredient whose rows
//! are not followed by an empty line is never sealed and is dropped.

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::Labels;
use crate::fraction::unclump;
use crate::ingredient::Ingredient;
use crate::singular::Singularize;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed tagger row at line {line}: expected a token and a tag, got {row:?}")]
    MalformedRow { line: usize, row: String },
}

/// One tagged token row.
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedToken {
    /// Token with mixed numbers unclumped (`1 1/2`).
    pub token: String,
    /// Lower-cased tag with any `B-`/`I-` prefix removed.
    pub category: String,
    pub confidence: Option<f64>,
}

/// Split a token row into token, category and confidence.
///
/// Returns `None` when the row has fewer than two tab-separated columns.
pub fn parse_row(row: &str) -> Option<TaggedToken> {
    let columns: Vec<&str> = row.trim_matches(' ').split('\t').collect();
    if columns.len() < 2 {
        return None;
    }
    let token = unclump(columns[0].trim_matches(' '));

    let mut tag = columns[columns.len() - 1].split('/');
    let label = tag.next().unwrap_or_default();
    let label = label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .unwrap_or(label);
    let confidence = tag.next().and_then(|c| c.trim().parse::<f64>().ok());

    Some(TaggedToken {
        token,
        category: label.to_lowercase(),
        confidence,
    })
}

/// Decode tagger output into one ingredient per sealed block, in order.
pub fn decode(
    output: &str,
    labels: &Labels,
    singularizer: &dyn Singularize,
) -> Result<Vec<Ingredient>, DecodeError> {
    let mut ingredients = Vec::new();
    let mut current: Option<Ingredient> = None;

    for (idx, line) in output.split('\n').enumerate() {
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            if let Some(done) = current.take() {
                ingredients.push(done);
            }
            continue;
        }

        let tagged = parse_row(line).ok_or_else(|| DecodeError::MalformedRow {
            line: idx + 1,
            row: line.to_string(),
        })?;
        trace!(
            token = %tagged.token,
            category = %tagged.category,
            confidence = ?tagged.confidence,
            "tagged token"
        );
        let ingredient = current.get_or_insert_with(Ingredient::new);
        assign(ingredient, tagged, labels, singularizer);
    }

    if let Some(unsealed) = current {
        warn!(
            tokens = unsealed.names().len() + unsealed.notes().len(),
            "tagger output ended without a blank line; dropping last ingredient"
        );
    }

    Ok(ingredients)
}

fn assign(
    ingredient: &mut Ingredient,
    tagged: TaggedToken,
    labels: &Labels,
    singularizer: &dyn Singularize,
) {
    let TaggedToken {
        token, category, ..
    } = tagged;

    if category == labels.unit {
        let unit = singularizer.singularize(&token).unwrap_or_else(|err| {
            debug!(token = %token, error = %err, "keeping unit as written");
            token.clone()
        });
        ingredient.set_unit(unit);
    } else if category == labels.quantity {
        ingredient.set_quantity(token);
    } else if category == labels.name {
        ingredient.add_name(token);
    } else {
        ingredient.add_note(token);
    }
}
