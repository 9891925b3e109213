//! Reading and writing the catalog's array-literal text format.

pub mod duration;
pub mod lexer;
pub mod record;
pub mod repair;
pub mod scan;
pub mod serialize;
pub mod video_id;

pub use record::{Decoded, RecordParser, parse};
pub use repair::repair_text;
pub use serialize::{serialize, serialize_with};

use crate::config::CatalogConfig;
use thiserror::Error;

/// Structural failures. Anything below the array level degrades to a dropped
/// record or a repaired string instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("array literal `{0}` not found")]
    ArrayNotFound(String),

    #[error("array literal `{name}` opened at byte {offset} is never closed")]
    Unterminated { name: String, offset: usize },
}

/// Names used in the generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub array_name: String,
    pub type_name: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            array_name: "scenarios".to_string(),
            type_name: "Scenario".to_string(),
        }
    }
}

impl Layout {
    #[must_use]
    pub fn from_config(catalog: &CatalogConfig) -> Self {
        Self {
            array_name: catalog.array_name.clone(),
            type_name: catalog.type_name.clone(),
        }
    }

    /// `scenarios` becomes `featuredScenarios`.
    #[must_use]
    pub fn featured_name(&self) -> String {
        let mut chars = self.array_name.chars();
        chars.next().map_or_else(
            || "featured".to_string(),
            |first| format!("featured{}{}", first.to_uppercase(), chars.as_str()),
        )
    }

    #[must_use]
    pub fn hero_name(&self) -> String {
        format!("hero{}", self.type_name)
    }
}
