//! # Reconhecedor de Datas
//!
//! Orquestra o fluxo completo de uma chamada:
//!
//! 1. **Portão de entidades**: se `"DATE_TIME"` não foi pedido, retorna vazio.
//! 2. **Varredura** ([`DateRecognizer::scan`]): cada padrão percorre o texto da esquerda
//!    para a direita; matches do mesmo padrão nunca se sobrepõem (o primeiro vence e a
//!    busca continua depois do seu fim). Padrões diferentes podem gerar o mesmo span.
//! 3. **Calibração** ([`ScoreAdjuster`]).
//! 4. **Montagem** ([`ResultAssembler`]): resolve sobreposições e ordena por início.
//!
//! O reconhecedor não tem estado mutável: o catálogo é compartilhado via `Arc` e
//! `regex::Regex` é reentrante, então a mesma instância pode ser usada por várias
//! threads sem trava.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use date_core::DateRecognizer;
//!
//! let recognizer = DateRecognizer::new();
//! let results = recognizer.analyze("Today is 5-MAY-2021", &["DATE_TIME"]);
//!
//! assert_eq!(results.len(), 1);
//! assert_eq!((results[0].start, results[0].end), (9, 19));
//! ```

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RecognizerConfig;
use crate::error::Result;
use crate::pattern::{Pattern, PatternSet};
use crate::result::{RecognizerResult, ResultAssembler};
use crate::score::ScoreAdjuster;

/// Nome do reconhecedor, usado nos metadados dos resultados.
pub const RECOGNIZER_NAME: &str = "DateRecognizer";

/// Um match bruto de um padrão. Offsets em bytes, `end` exclusivo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    pub pattern_name: String,
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
    pub base_score: f64,
}

/// Reconhecedor de expressões de data (`DATE_TIME`).
#[derive(Debug, Clone)]
pub struct DateRecognizer {
    patterns: Arc<PatternSet>,
    assembler: ResultAssembler,
    supported_entity: String,
    supported_language: String,
    context: Vec<String>,
}

impl DateRecognizer {
    /// Cria o reconhecedor com o catálogo embutido.
    pub fn new() -> Self {
        Self::with_patterns(PatternSet::builtin())
    }

    /// Cria o reconhecedor com um catálogo que substitui o embutido por inteiro.
    pub fn with_patterns(patterns: impl Into<Arc<PatternSet>>) -> Self {
        let defaults = RecognizerConfig::default();
        Self {
            patterns: patterns.into(),
            assembler: ResultAssembler::new(&defaults.supported_entity, RECOGNIZER_NAME),
            supported_entity: defaults.supported_entity,
            supported_language: defaults.supported_language,
            context: defaults.context,
        }
    }

    /// Cria o reconhecedor a partir de uma configuração.
    ///
    /// Falha se algum padrão (embutido recompilado com outras flags, ou substituto)
    /// não compilar.
    pub fn from_config(config: &RecognizerConfig) -> Result<Self> {
        let patterns = match &config.patterns {
            Some(specs) => Arc::new(PatternSet::from_specs(specs.clone(), config.flags)?),
            None if config.flags == PatternSet::builtin().flags() => PatternSet::builtin(),
            None => Arc::new(PatternSet::from_specs(
                PatternSet::builtin().specs(),
                config.flags,
            )?),
        };

        Ok(Self {
            patterns,
            assembler: ResultAssembler::new(&config.supported_entity, RECOGNIZER_NAME),
            supported_entity: config.supported_entity.clone(),
            supported_language: config.supported_language.clone(),
            context: config.context.clone(),
        })
    }

    pub fn name(&self) -> &'static str {
        RECOGNIZER_NAME
    }

    pub fn supported_entities(&self) -> Vec<&str> {
        vec![self.supported_entity.as_str()]
    }

    pub fn supported_language(&self) -> &str {
        &self.supported_language
    }

    /// Palavras de contexto para o melhorador externo. Não afetam o score aqui.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Analisa o texto e retorna as datas encontradas, ordenadas por início.
    ///
    /// Retorna vazio se a entidade suportada não estiver em `entities`.
    pub fn analyze<I, S>(&self, text: &str, entities: I) -> Vec<RecognizerResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.analyze_with_context(text, entities, 0.0)
    }

    /// Igual a [`analyze`](Self::analyze), somando um bônus de contexto calculado
    /// pelo chamador a cada score (limitado a [0, 1]).
    pub fn analyze_with_context<I, S>(
        &self,
        text: &str,
        entities: I,
        context_bonus: f64,
    ) -> Vec<RecognizerResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.is_requested(entities) {
            return vec![];
        }

        let raw = self.scan(text);
        let found = raw.len();
        let adjusted = ScoreAdjuster::with_context_bonus(context_bonus).adjust_all(raw);
        let results = self.assembler.assemble(text, adjusted, &self.patterns);

        debug!(
            bytes = text.len(),
            raw_matches = found,
            results = results.len(),
            "análise de datas concluída"
        );
        results
    }

    /// Executa todos os padrões sobre o texto e agrega os matches brutos.
    ///
    /// A saída segue a ordem do catálogo (e, dentro de um padrão, a ordem no texto),
    /// mas nenhuma garantia de ordem é dada aos consumidores.
    pub fn scan(&self, text: &str) -> Vec<RawMatch> {
        if text.is_empty() {
            return vec![];
        }

        let per_pattern: Vec<Vec<RawMatch>> = self
            .patterns
            .patterns()
            .par_iter()
            .map(|pattern| scan_pattern(pattern, text))
            .collect();

        per_pattern.into_iter().flatten().collect()
    }

    fn is_requested<I, S>(&self, entities: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entities
            .into_iter()
            .any(|e| e.as_ref() == self.supported_entity)
    }
}

impl Default for DateRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Matches não sobrepostos de um único padrão. Matches vazios são ignorados.
fn scan_pattern(pattern: &Pattern, text: &str) -> Vec<RawMatch> {
    pattern
        .regex()
        .find_iter(text)
        .filter(|m| m.start() < m.end())
        .map(|m| RawMatch {
            pattern_name: pattern.name().to_string(),
            start: m.start(),
            end: m.end(),
            matched_text: m.as_str().to_string(),
            base_score: pattern.base_score(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{PatternSpec, RegexFlags, MAX_SYNTACTIC_SCORE, MIN_SYNTACTIC_SCORE};
    use crate::result::DATE_TIME;

    const ENTITIES: &[&str] = &[DATE_TIME];

    fn assert_single(text: &str, start: usize, end: usize) {
        let recognizer = DateRecognizer::new();
        let results = recognizer.analyze(text, ENTITIES);
        assert_eq!(results.len(), 1, "esperava 1 resultado em {:?}: {:?}", text, results);
        let r = &results[0];
        assert_eq!(r.entity_type, DATE_TIME);
        assert_eq!((r.start, r.end), (start, end), "span errado em {:?}", text);
        assert!(
            (MIN_SYNTACTIC_SCORE..=MAX_SYNTACTIC_SCORE).contains(&r.score),
            "score {} fora da faixa",
            r.score
        );
    }

    #[test]
    fn test_dash_date() {
        assert_single("Today is 5-20-2021", 9, 18);
    }

    #[test]
    fn test_slash_date() {
        assert_single("Today is 5/20/2021", 9, 18);
    }

    #[test]
    fn test_iso_date() {
        assert_single("Today is 2021-05-21", 9, 19);
    }

    #[test]
    fn test_dot_date() {
        assert_single("Today is 21.5.2021", 9, 18);
    }

    #[test]
    fn test_month_abbreviation_date() {
        assert_single("Today is 5-MAY-2021", 9, 19);
    }

    #[test]
    fn test_empty_text() {
        let recognizer = DateRecognizer::new();
        assert!(recognizer.analyze("", ENTITIES).is_empty());
        assert!(recognizer.scan("").is_empty());
    }

    #[test]
    fn test_no_dates() {
        let recognizer = DateRecognizer::new();
        assert!(recognizer
            .analyze("Nenhuma data aqui, só a versão 3 e 42 itens.", ENTITIES)
            .is_empty());
    }

    #[test]
    fn test_entity_gating() {
        let recognizer = DateRecognizer::new();
        let text = "Today is 5-20-2021";
        assert!(recognizer.analyze(text, Vec::<String>::new()).is_empty());
        assert!(recognizer.analyze(text, ["PERSON", "EMAIL_ADDRESS"]).is_empty());
        assert_eq!(recognizer.analyze(text, vec!["PERSON".to_string(), "DATE_TIME".to_string()]).len(), 1);
    }

    #[test]
    fn test_scan_keeps_same_span_from_different_grammars() {
        let set = PatternSet::from_specs(
            vec![
                PatternSpec::new("iso", r"\b\d{4}-\d{2}-\d{2}\b", 0.6),
                PatternSpec::new("traco", r"\b\d+-\d+-\d+\b", 0.6),
            ],
            RegexFlags::default(),
        )
        .unwrap();
        let recognizer = DateRecognizer::with_patterns(set);

        let raw = recognizer.scan("Today is 2021-05-21");
        assert_eq!(raw.len(), 2);
        assert!(raw.iter().all(|m| (m.start, m.end) == (9, 19)));

        let results = recognizer.analyze("Today is 2021-05-21", ENTITIES);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].recognition_metadata.pattern_name, "iso");
    }

    #[test]
    fn test_scan_same_pattern_never_overlaps() {
        let recognizer = DateRecognizer::new();
        let raw = recognizer.scan("1-2-2021-3-4-2022");
        let mut by_pattern: Vec<&RawMatch> = raw.iter().filter(|m| m.pattern_name == "mm-dd-yyyy").collect();
        by_pattern.sort_by_key(|m| m.start);
        for pair in by_pattern.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_multiple_dates_sorted_without_overlap() {
        let recognizer = DateRecognizer::new();
        let text = "De 21.5.2021 até 2021-06-30, revisão em 5-MAY-2022 e entrega 12/31/2022.";
        let results = recognizer.analyze(text, ENTITIES);
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert!(!pair[0].overlaps(&pair[1]));
        }
        let total = text.chars().count();
        for r in &results {
            assert!(r.start < r.end && r.end <= total);
        }
        let texts: Vec<&str> = results.iter().map(|r| r.analysis_explanation.matched_text.as_str()).collect();
        assert_eq!(texts, vec!["21.5.2021", "2021-06-30", "5-MAY-2022", "12/31/2022"]);
    }

    #[test]
    fn test_idempotent() {
        let recognizer = DateRecognizer::new();
        let text = "Reunião 5/20/2021 e 21.5.2021";
        assert_eq!(recognizer.analyze(text, ENTITIES), recognizer.analyze(text, ENTITIES));
    }

    #[test]
    fn test_context_bonus_is_clamped() {
        let recognizer = DateRecognizer::new();
        let results = recognizer.analyze_with_context("Today is 5-20-2021", ENTITIES, 0.7);
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[0].analysis_explanation.original_score, 0.6);
    }

    #[test]
    fn test_nan_context_bonus_keeps_base_score() {
        let recognizer = DateRecognizer::new();
        let results = recognizer.analyze_with_context("Today is 5-20-2021", ENTITIES, f64::NAN);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 0.6);
    }

    #[test]
    fn test_long_text_with_many_dates() {
        let recognizer = DateRecognizer::new();
        let text = "1-2-2021 ".repeat(20_000);
        let results = recognizer.analyze(&text, ENTITIES);
        assert_eq!(results.len(), 20_000);
        assert!(results.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn test_from_config_override() {
        let config = RecognizerConfig::from_json_str(
            r#"{ "patterns": [{ "name": "ano", "regex": "\\b\\d{4}\\b", "score": 0.7 }] }"#,
        )
        .unwrap();
        let recognizer = DateRecognizer::from_config(&config).unwrap();
        assert_eq!(recognizer.patterns().len(), 1);

        // O catálogo embutido foi substituído por inteiro
        let results = recognizer.analyze("Today is 5-20-2021", ENTITIES);
        assert_eq!(results.len(), 1);
        assert_eq!((results[0].start, results[0].end), (14, 18));
        assert_eq!(results[0].score, 0.7);
    }

    #[test]
    fn test_from_config_with_flags_recompiles_builtin() {
        let config = RecognizerConfig {
            flags: RegexFlags { case_insensitive: false, ..RegexFlags::default() },
            ..RecognizerConfig::default()
        };
        let recognizer = DateRecognizer::from_config(&config).unwrap();
        assert!(recognizer.analyze("Today is 5-May-2021", ENTITIES).is_empty());
        assert_eq!(recognizer.analyze("Today is 5-MAY-2021", ENTITIES).len(), 1);
    }

    #[test]
    fn test_from_config_invalid_pattern() {
        let config = RecognizerConfig::from_json_str(
            r#"{ "patterns": [{ "name": "quebrado", "regex": "[0-9", "score": 0.6 }] }"#,
        )
        .unwrap();
        assert!(DateRecognizer::from_config(&config).is_err());
    }

    #[test]
    fn test_custom_entity_type() {
        let config = RecognizerConfig {
            supported_entity: "DATA".to_string(),
            ..RecognizerConfig::default()
        };
        let recognizer = DateRecognizer::from_config(&config).unwrap();
        assert!(recognizer.analyze("Today is 5-20-2021", ENTITIES).is_empty());
        let results = recognizer.analyze("Today is 5-20-2021", ["DATA"]);
        assert_eq!(results[0].entity_type, "DATA");
    }

    #[test]
    fn test_recognizer_metadata() {
        let recognizer = DateRecognizer::new();
        assert_eq!(recognizer.name(), "DateRecognizer");
        assert_eq!(recognizer.supported_entities(), vec!["DATE_TIME"]);
        assert_eq!(recognizer.supported_language(), "en");
        assert!(recognizer.context().iter().any(|c| c == "birthday"));
    }

    #[test]
    fn test_shared_across_threads() {
        let recognizer = Arc::new(DateRecognizer::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let r = Arc::clone(&recognizer);
                std::thread::spawn(move || r.analyze("Today is 2021-05-21", ENTITIES).len())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 1);
        }
    }
}
