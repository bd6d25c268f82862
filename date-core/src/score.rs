//! # Calibração de Score
//!
//! Padrões puramente sintáticos mantêm o score base: a faixa 0.6–0.81 já é o teto
//! desenhado para datas sem contexto. O único ajuste previsto é um **bônus de contexto**
//! calculado fora deste crate (ex: a palavra "nascimento" perto do match), que é somado
//! e limitado a [0, 1].

use serde::{Deserialize, Serialize};

use crate::recognizer::RawMatch;

/// Um [`RawMatch`] com o score final já calibrado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedMatch {
    pub raw: RawMatch,
    /// Score final (0.0 a 1.0)
    pub final_score: f64,
}

impl AdjustedMatch {
    pub fn start(&self) -> usize {
        self.raw.start
    }

    pub fn end(&self) -> usize {
        self.raw.end
    }

    pub fn len(&self) -> usize {
        self.raw.end - self.raw.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dois matches se sobrepõem se compartilham ao menos uma posição.
    pub fn overlaps(&self, other: &AdjustedMatch) -> bool {
        self.raw.start < other.raw.end && other.raw.start < self.raw.end
    }
}

/// Ajustador de score. Função pura sobre cada [`RawMatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAdjuster {
    context_bonus: f64,
}

impl ScoreAdjuster {
    /// Ajustador sem bônus: `final_score == base_score`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajustador com bônus de contexto fornecido pelo chamador.
    ///
    /// Bônus não finito (`NaN`, infinito) é tratado como zero.
    pub fn with_context_bonus(context_bonus: f64) -> Self {
        let context_bonus = if context_bonus.is_finite() { context_bonus } else { 0.0 };
        Self { context_bonus }
    }

    pub fn context_bonus(&self) -> f64 {
        self.context_bonus
    }

    pub fn adjust(&self, raw: RawMatch) -> AdjustedMatch {
        let final_score = if self.context_bonus == 0.0 {
            raw.base_score
        } else {
            (raw.base_score + self.context_bonus).clamp(0.0, 1.0)
        };
        AdjustedMatch { raw, final_score }
    }

    pub fn adjust_all(&self, raws: Vec<RawMatch>) -> Vec<AdjustedMatch> {
        raws.into_iter().map(|r| self.adjust(r)).collect()
    }
}
