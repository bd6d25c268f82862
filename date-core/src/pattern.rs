//! # Catálogo de Padrões de Data
//!
//! Um [`PatternSet`] é a lista ordenada de gramáticas de data que o reconhecedor
//! conhece. Cada [`Pattern`] tem um nome, uma expressão regular compilada e um
//! **score base**: a confiança atribuída apenas pela forma do texto, sem olhar o contexto.
//!
//! ## Gramáticas embutidas
//!
//! | Nome                        | Exemplo       |
//! |-----------------------------|---------------|
//! | `mm/dd/yyyy or mm/dd/yy`    | `5/20/2021`   |
//! | `dd/mm/yyyy or dd/mm/yy`    | `20/5/2021`   |
//! | `yyyy/mm/dd`                | `2021/5/20`   |
//! | `mm-dd-yyyy`                | `5-20-2021`   |
//! | `dd-mm-yyyy`                | `20-5-2021`   |
//! | `yyyy-mm-dd`                | `2021-05-21`  |
//! | `dd.mm.yyyy or dd.mm.yy`    | `21.5.2021`   |
//! | `dd-MMM-yyyy or dd-MMM-yy`  | `5-MAY-2021`  |
//! | `MMM-yyyy or MMM-yy`        | `MAY-2021`    |
//! | `dd-MMM`                    | `5-MAY`       |
//!
//! Nenhuma validação de calendário é feita aqui: `31-02-2021` casa com `dd-mm-yyyy`.
//! O score 0.6 reflete "plausível, mas não confirmado pelo contexto", já que
//! sequências numéricas curtas também podem ser versões ou frações.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RecognizerError, Result};

/// Menor score base dos padrões embutidos.
pub const MIN_SYNTACTIC_SCORE: f64 = 0.6;
/// Teto de confiança para padrões puramente sintáticos (sem contexto).
pub const MAX_SYNTACTIC_SCORE: f64 = 0.81;

/// Definição textual dos padrões embutidos: (nome, regex, score base).
///
/// Dia: `1-9 | 01-09 | 10-29 | 30-31`. Mês: `1-9 | 01-09 | 10-12`.
const BUILTIN_PATTERNS: &[(&str, &str, f64)] = &[
    (
        "mm/dd/yyyy or mm/dd/yy",
        r"\b(([1-9]|0[1-9]|1[0-2])/([1-9]|0[1-9]|[1-2][0-9]|3[0-1])/(\d{4}|\d{2}))\b",
        0.6,
    ),
    (
        "dd/mm/yyyy or dd/mm/yy",
        r"\b(([1-9]|0[1-9]|[1-2][0-9]|3[0-1])/([1-9]|0[1-9]|1[0-2])/(\d{4}|\d{2}))\b",
        0.6,
    ),
    (
        "yyyy/mm/dd",
        r"\b(\d{4}/([1-9]|0[1-9]|1[0-2])/([1-9]|0[1-9]|[1-2][0-9]|3[0-1]))\b",
        0.6,
    ),
    (
        "mm-dd-yyyy",
        r"\b(([1-9]|0[1-9]|1[0-2])-([1-9]|0[1-9]|[1-2][0-9]|3[0-1])-\d{4})\b",
        0.6,
    ),
    (
        "dd-mm-yyyy",
        r"\b(([1-9]|0[1-9]|[1-2][0-9]|3[0-1])-([1-9]|0[1-9]|1[0-2])-\d{4})\b",
        0.6,
    ),
    (
        "yyyy-mm-dd",
        r"\b(\d{4}-([1-9]|0[1-9]|1[0-2])-([1-9]|0[1-9]|[1-2][0-9]|3[0-1]))\b",
        0.6,
    ),
    (
        "dd.mm.yyyy or dd.mm.yy",
        r"\b(([1-9]|0[1-9]|[1-2][0-9]|3[0-1])\.([1-9]|0[1-9]|1[0-2])\.(\d{4}|\d{2}))\b",
        0.6,
    ),
    (
        "dd-MMM-yyyy or dd-MMM-yy",
        r"\b(([1-9]|0[1-9]|[1-2][0-9]|3[0-1])-(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)-(\d{4}|\d{2}))\b",
        0.6,
    ),
    (
        "MMM-yyyy or MMM-yy",
        r"\b((JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)-(\d{4}|\d{2}))\b",
        0.6,
    ),
    (
        "dd-MMM",
        r"\b(([1-9]|0[1-9]|[1-2][0-9]|3[0-1])-(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC))\b",
        0.6,
    ),
];

// As regexes embutidas são constantes do código: se não compilarem, é erro de programação.
static BUILTIN: Lazy<Arc<PatternSet>> = Lazy::new(|| {
    let specs = BUILTIN_PATTERNS
        .iter()
        .map(|(name, regex, score)| PatternSpec::new(name, regex, *score))
        .collect();
    Arc::new(
        PatternSet::from_specs(specs, RegexFlags::default())
            .expect("catálogo embutido de datas deve compilar"),
    )
});

/// Flags aplicadas a todas as regexes de um catálogo.
///
/// Os padrões de mês (`MAY`, `DEC`) dependem de `case_insensitive` para casar `5-May-2021`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexFlags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_all: bool,
}

impl Default for RegexFlags {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            multi_line: true,
            dot_all: true,
        }
    }
}

/// Definição ainda não compilada de um padrão (formato de configuração).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub name: String,
    pub regex: String,
    pub score: f64,
}

impl PatternSpec {
    pub fn new(name: &str, regex: &str, score: f64) -> Self {
        Self {
            name: name.to_string(),
            regex: regex.to_string(),
            score,
        }
    }
}

/// Um padrão compilado. Imutável depois de construído.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    regex: Regex,
    base_score: f64,
}

impl Pattern {
    /// Compila um padrão, validando nome, regex e score.
    pub fn compile(spec: &PatternSpec, flags: RegexFlags) -> Result<Self> {
        if spec.name.trim().is_empty() {
            return Err(RecognizerError::EmptyPatternName);
        }
        if !(0.0..=1.0).contains(&spec.score) {
            return Err(RecognizerError::InvalidScore {
                name: spec.name.clone(),
                score: spec.score,
            });
        }
        let regex = RegexBuilder::new(&spec.regex)
            .case_insensitive(flags.case_insensitive)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_all)
            .build()
            .map_err(|source| RecognizerError::InvalidPattern {
                name: spec.name.clone(),
                source,
            })?;

        Ok(Self {
            name: spec.name.clone(),
            regex,
            base_score: spec.score,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Volta ao formato de configuração (regex em texto).
    pub fn to_spec(&self) -> PatternSpec {
        PatternSpec::new(&self.name, self.regex.as_str(), self.base_score)
    }
}

/// Catálogo ordenado e imutável de padrões.
///
/// Ou o catálogo inteiro compila, ou a construção falha: nunca existe um
/// `PatternSet` parcialmente utilizável.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
    flags: RegexFlags,
}

impl PatternSet {
    /// Catálogo embutido, compilado uma única vez por processo e compartilhado.
    pub fn builtin() -> Arc<PatternSet> {
        Arc::clone(&BUILTIN)
    }

    /// Compila um catálogo a partir de definições fornecidas pelo chamador.
    pub fn from_specs(specs: Vec<PatternSpec>, flags: RegexFlags) -> Result<Self> {
        if specs.is_empty() {
            return Err(RecognizerError::EmptyPatternSet);
        }

        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(specs.len());
        for spec in &specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(RecognizerError::DuplicatePattern {
                    name: spec.name.clone(),
                });
            }
            patterns.push(Pattern::compile(spec, flags)?);
        }

        debug!(count = patterns.len(), "catálogo de padrões compilado");
        Ok(Self { patterns, flags })
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn specs(&self) -> Vec<PatternSpec> {
        self.patterns.iter().map(Pattern::to_spec).collect()
    }
}
