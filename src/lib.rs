pub mod config;
pub mod decode;
pub mod features;
pub mod fraction;
pub mod handlers;
pub mod ingredient;
pub mod parser;
pub mod singular;
pub mod tagger;
pub mod tokenize;

pub use config::{ConfigError, Labels, ParserConfig};
pub use decode::{DecodeError, TaggedToken, decode};
pub use features::{FeatureRow, LengthBucket, encode};
pub use handlers::{AppState, router};
pub use ingredient::Ingredient;
pub use parser::{IngredientParser, ParseError};
pub use singular::Singularize;
pub use tagger::{CrfTestTagger, Tagger, TaggerError};
pub use tokenize::tokenize;
