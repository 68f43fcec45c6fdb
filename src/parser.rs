use std::sync::Arc;

use ingredient_morphy::Morphy;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, Labels, ParserConfig};
use crate::decode::{DecodeError, decode};
use crate::features::encode;
use crate::ingredient::Ingredient;
use crate::singular::Singularize;
use crate::tagger::{CrfTestTagger, Tagger, TaggerError};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("parser has not been configured: no model file path")]
    NotConfigured,
    #[error(transparent)]
    Tagging(#[from] TaggerError),
    #[error(transparent)]
    Decoding(#[from] DecodeError),
}

/// Parses ingredient lists by round-tripping them through a CRF++ model.
///
/// ```text
/// 1 cup sugar
/// 500 grams flour
/// ```
/// becomes two [`Ingredient`]s, one per input line.
#[derive(Clone)]
pub struct IngredientParser {
    config: ParserConfig,
    labels: Labels,
    tagger: Arc<dyn Tagger>,
    singularizer: Arc<dyn Singularize>,
}

impl IngredientParser {
    /// A parser that shells out to `crf_test` and singularizes units with
    /// the built-in exception list, extended by `unitexceptions` when set.
    pub fn new(config: ParserConfig) -> Result<Self, ConfigError> {
        let morph = match config.unit_exceptions_path() {
            Some(path) => {
                debug!(path = %path.display(), "loading unit exceptions");
                Morphy::load(path).map_err(|err| ConfigError::Exceptions {
                    path: path.to_path_buf(),
                    message: format!("{err:#}"),
                })?
            }
            None => Morphy::builtin(),
        };
        let tagger = CrfTestTagger::new(config.crf_test_path());
        Ok(Self::with_components(config, Arc::new(tagger), Arc::new(morph)))
    }

    pub fn with_components(
        config: ParserConfig,
        tagger: Arc<dyn Tagger>,
        singularizer: Arc<dyn Singularize>,
    ) -> Self {
        let labels = config.labels();
        Self {
            config,
            labels,
            tagger,
            singularizer,
        }
    }

    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        Self::new(ParserConfig::from_json(data)?)
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Parse newline-separated ingredient lines, e.g. `1 cup sugar\n500 grams flour`.
    ///
    /// A tagger failure aborts the whole call; no partial list is returned.
    pub fn parse(&self, ingredients: &str) -> Result<Vec<Ingredient>, ParseError> {
        let model = self.config.model_file_path().ok_or(ParseError::NotConfigured)?;

        let table = self.encode(ingredients);
        debug!(bytes = table.len(), model = %model.display(), "tagging ingredients");
        let output = self.tagger.tag(model, &table)?;

        Ok(self.decode(&output)?)
    }

    /// The tagger input table for `ingredients`.
    pub fn encode(&self, ingredients: &str) -> String {
        encode(ingredients)
    }

    /// Decode output that was already produced by the tagger.
    pub fn decode(&self, output: &str) -> Result<Vec<Ingredient>, DecodeError> {
        decode(output, &self.labels, self.singularizer.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    use crate::singular::Identity;

    struct Recording {
        seen: Mutex<Vec<(String, String)>>,
        reply: String,
    }

    impl Tagger for Recording {
        fn tag(&self, model: &Path, input: &str) -> Result<String, TaggerError> {
            self.seen
                .lock()
                .unwrap()
                .push((model.display().to_string(), input.to_string()));
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn refuses_to_tag_without_model() {
        let tagger = Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
            reply: String::new(),
        });
        let parser =
            IngredientParser::with_components(ParserConfig::default(), tagger.clone(), Arc::new(Identity));
        assert!(!parser.is_configured());
        assert!(matches!(parser.parse("1 cup sugar"), Err(ParseError::NotConfigured)));
        assert!(tagger.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn sends_encoded_table_untouched() {
        let tagger = Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
            reply: "1\tB-QTY/0.9\ncup\tB-UNIT/0.9\nsugar\tB-NAME/0.9\n\n".to_string(),
        });
        let config = ParserConfig::default().with_model("/models/ingredients.crf");
        let parser = IngredientParser::with_components(config, tagger.clone(), Arc::new(Identity));

        let ingredients = parser.parse("1 cup sugar").unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].name(), "sugar");

        let seen = tagger.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "/models/ingredients.crf");
        assert_eq!(seen[0].1, encode("1 cup sugar"));
    }

    #[test]
    fn unit_exceptions_file_feeds_decoder() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"geese goose\n").unwrap();
        let config = ParserConfig {
            unit_exceptions_path: Some(file.path().to_path_buf()),
            ..ParserConfig::default()
        };
        let parser = IngredientParser::new(config).unwrap();

        let ingredients = parser.decode("2\tB-QTY/0.9\ngeese\tB-UNIT/0.9\n\n").unwrap();
        assert_eq!(ingredients[0].unit(), Some("goose"));
    }

    #[test]
    fn unreadable_unit_exceptions_fail_construction() {
        let dir = tempfile::tempdir().unwrap();
        let config = ParserConfig {
            unit_exceptions_path: Some(dir.path().to_path_buf()),
            ..ParserConfig::default()
        };
        let err = IngredientParser::new(config).err().unwrap();
        assert!(matches!(err, ConfigError::Exceptions { path, .. } if path == dir.path()));
    }

    #[test]
    fn builds_from_json() {
        let parser = IngredientParser::from_json(
            br#"{"parsertype": "crfppParser", "modelfilepath": "/path/to/file"}"#,
        )
        .unwrap();
        assert!(parser.is_configured());
        assert_eq!(parser.labels(), &Labels::default());
    }
}
