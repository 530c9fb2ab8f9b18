//! Script language marker
//!
//! A templated document records which script dialect its embedded script
//! regions use. The mode comes from stored document metadata when present,
//! from a script element's declared `lang` otherwise, and defaults to plain
//! JavaScript. See [`crate::Document::lang_mode`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Script dialect of a document's embedded script regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LangMode {
    /// Plain JavaScript - the default when nothing declares otherwise
    #[default]
    Js,
    /// TypeScript
    Ts,
}

impl LangMode {
    /// Get the string representation of the lang mode
    pub fn as_str(&self) -> &'static str {
        match self {
            LangMode::Js => "js",
            LangMode::Ts => "ts",
        }
    }

    /// Get all lang modes
    pub fn all() -> &'static [LangMode] {
        &[LangMode::Js, LangMode::Ts]
    }
}

impl FromStr for LangMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "js" | "javascript" | "jsx" => Ok(LangMode::Js),
            "ts" | "typescript" | "tsx" => Ok(LangMode::Ts),
            _ => Err(Error::UnknownLangMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for LangMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
