//! # Configuração do Reconhecedor
//!
//! Tudo é opcional: um JSON vazio (`{}`) produz o reconhecedor padrão.
//!
//! ```json
//! {
//!   "supported_language": "pt",
//!   "context": ["data", "nascimento"],
//!   "flags": { "case_insensitive": true },
//!   "patterns": [
//!     { "name": "dd/mm/aaaa", "regex": "\\b\\d{2}/\\d{2}/\\d{4}\\b", "score": 0.65 }
//!   ]
//! }
//! ```
//!
//! Quando `patterns` está presente, **substitui** o catálogo embutido por inteiro.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RecognizerError, Result};
use crate::pattern::{PatternSpec, RegexFlags};
use crate::result::DATE_TIME;

/// Palavras de contexto padrão, expostas para o melhorador de contexto externo.
pub const DEFAULT_CONTEXT: &[&str] = &["date", "birthday"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub supported_entity: String,
    pub supported_language: String,
    pub context: Vec<String>,
    pub flags: RegexFlags,
    /// Catálogo substituto. `None` usa o embutido.
    pub patterns: Option<Vec<PatternSpec>>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            supported_entity: DATE_TIME.to_string(),
            supported_language: "en".to_string(),
            context: DEFAULT_CONTEXT.iter().map(|s| s.to_string()).collect(),
            flags: RegexFlags::default(),
            patterns: None,
        }
    }
}

impl RecognizerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RecognizerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
