//! # Resultados do Reconhecedor e Resolução de Sobreposição
//!
//! O mesmo trecho pode casar com várias gramáticas (`2021-05-21` é ISO; `5-MAY-2021`
//! contém `5-MAY` e `MAY-2021`). Cada gramática é avaliada de forma independente e a
//! ambiguidade é resolvida **num único passo**, aqui:
//!
//! 1. Ordena os candidatos por score (maior primeiro), depois início (menor primeiro),
//!    depois comprimento (maior primeiro).
//! 2. Aceita cada candidato que não se sobrepõe a nenhum já aceito.
//! 3. Devolve os aceitos em ordem de posição inicial.
//!
//! Os offsets internos são em bytes (como o `regex` devolve); os resultados públicos
//! usam offsets de **caractere**.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::pattern::PatternSet;
use crate::recognizer::RECOGNIZER_NAME;
use crate::score::AdjustedMatch;

/// Tipo de entidade emitido por este reconhecedor.
pub const DATE_TIME: &str = "DATE_TIME";

/// Quem produziu o resultado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionMetadata {
    pub recognizer_name: String,
    pub pattern_name: String,
}

/// Explicação do resultado: qual padrão casou e como o score foi obtido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisExplanation {
    pub recognizer: String,
    pub pattern_name: String,
    /// Regex do padrão, em texto
    pub pattern: String,
    /// Score base do padrão
    pub original_score: f64,
    /// Score depois da calibração
    pub score: f64,
    pub matched_text: String,
}

/// Uma data encontrada no texto. Unidade final de saída.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizerResult {
    /// Sempre [`DATE_TIME`] para o reconhecedor embutido
    pub entity_type: String,
    /// Offset de caractere inicial (inclusivo)
    pub start: usize,
    /// Offset de caractere final (exclusivo)
    pub end: usize,
    pub score: f64,
    pub recognition_metadata: RecognitionMetadata,
    pub analysis_explanation: AnalysisExplanation,
}

impl RecognizerResult {
    pub fn overlaps(&self, other: &RecognizerResult) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Converte offsets de byte em offsets de caractere.
///
/// Consultas em ordem crescente reaproveitam a contagem anterior.
struct CharIndexer<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharIndexer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, byte: 0, chars: 0 }
    }

    fn char_offset(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// Score usado na ordenação; `NaN` fica abaixo de qualquer score válido.
fn rank(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Ordem de prioridade: score maior, início menor, span maior.
fn priority(a: &AdjustedMatch, b: &AdjustedMatch) -> Ordering {
    rank(b.final_score)
        .total_cmp(&rank(a.final_score))
        .then(a.start().cmp(&b.start()))
        .then(b.len().cmp(&a.len()))
}

/// Mantém apenas os matches que vencem seus conflitos, ordenados por início.
///
/// A ordenação é estável: em empate total (mesmo span, mesmo score) vence o padrão
/// que aparece antes no catálogo.
pub fn resolve_overlaps(mut matches: Vec<AdjustedMatch>) -> Vec<AdjustedMatch> {
    matches.sort_by(priority);

    // Aceitos indexados pelo início. São disjuntos, então o único que pode colidir
    // com [s, e) é o último que começa antes de `e`.
    let mut kept: BTreeMap<usize, AdjustedMatch> = BTreeMap::new();
    for candidate in matches {
        let winner = kept
            .range(..candidate.end())
            .next_back()
            .map(|(_, k)| k)
            .filter(|k| k.overlaps(&candidate));
        if let Some(winner) = winner {
            trace!(
                dropped = %candidate.raw.pattern_name,
                kept = %winner.raw.pattern_name,
                start = candidate.start(),
                end = candidate.end(),
                "match sobreposto descartado"
            );
            continue;
        }
        kept.insert(candidate.start(), candidate);
    }

    kept.into_values().collect()
}

/// Monta os [`RecognizerResult`] públicos a partir dos matches ajustados.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultAssembler {
    entity_type: String,
    recognizer_name: String,
}

impl ResultAssembler {
    pub fn new(entity_type: &str, recognizer_name: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            recognizer_name: recognizer_name.to_string(),
        }
    }

    /// Resolve sobreposições e converte para a saída pública.
    ///
    /// `text` deve ser o mesmo texto usado na varredura: os offsets de byte dos
    /// matches são convertidos contra ele.
    pub fn assemble(
        &self,
        text: &str,
        matches: Vec<AdjustedMatch>,
        patterns: &PatternSet,
    ) -> Vec<RecognizerResult> {
        let resolved = resolve_overlaps(matches);
        let mut indexer = CharIndexer::new(text);

        resolved
            .into_iter()
            .map(|m| {
                let start = indexer.char_offset(m.raw.start);
                let end = indexer.char_offset(m.raw.end);
                let pattern = patterns
                    .get(&m.raw.pattern_name)
                    .map(|p| p.regex().as_str().to_string())
                    .unwrap_or_default();

                RecognizerResult {
                    entity_type: self.entity_type.clone(),
                    start,
                    end,
                    score: m.final_score,
                    recognition_metadata: RecognitionMetadata {
                        recognizer_name: self.recognizer_name.clone(),
                        pattern_name: m.raw.pattern_name.clone(),
                    },
                    analysis_explanation: AnalysisExplanation {
                        recognizer: self.recognizer_name.clone(),
                        pattern_name: m.raw.pattern_name,
                        pattern,
                        original_score: m.raw.base_score,
                        score: m.final_score,
                        matched_text: m.raw.matched_text,
                    },
                }
            })
            .collect()
    }
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new(DATE_TIME, RECOGNIZER_NAME)
    }
}
