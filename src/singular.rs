use ingredient_morphy::Morphy;

/// Plural-to-singular normalization for unit tokens.
///
/// Best effort: the decoder keeps the original token whenever this fails.
pub trait Singularize: Send + Sync {
    fn singularize(&self, word: &str) -> anyhow::Result<String>;
}

impl Singularize for Morphy {
    fn singularize(&self, word: &str) -> anyhow::Result<String> {
        Ok(self.singular(word)?.lemma)
    }
}

/// Passes words through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Singularize for Identity {
    fn singularize(&self, word: &str) -> anyhow::Result<String> {
        Ok(word.to_string())
    }
}
