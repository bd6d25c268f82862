//! # date-core — Reconhecedor de Datas em Texto Livre
//!
//! Este crate identifica expressões de data (`DATE_TIME`) em texto livre e reporta,
//! para cada ocorrência, o span em caracteres e um score de confiança que indica o quão
//! provável é que o trecho seja uma data de verdade, e não um número qualquer.
//!
//! Ele é **um** reconhecedor dentro de um pipeline maior de detecção de entidades:
//! orquestração entre reconhecedores, detecção de idioma e reforço por palavras de
//! contexto ficam fora daqui.
//!
//! ## Arquitetura
//!
//! 1.  **Entrada**: Texto bruto e o conjunto de entidades pedidas.
//! 2.  **Catálogo** ([`pattern`]): gramáticas de data (barra, traço, ponto, ISO, mês abreviado).
//! 3.  **Varredura** ([`recognizer`]): cada gramática gera matches brutos de forma independente.
//! 4.  **Calibração** ([`score`]): score base → score final.
//! 5.  **Montagem** ([`result`]): resolve sobreposições e produz [`RecognizerResult`]s ordenados.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use date_core::{DateRecognizer, DATE_TIME};
//!
//! let recognizer = DateRecognizer::new();
//! let results = recognizer.analyze("Today is 2021-05-21", [DATE_TIME]);
//!
//! for r in &results {
//!     println!("{} [{}..{}] score={:.2}", r.entity_type, r.start, r.end, r.score);
//! }
//! assert_eq!((results[0].start, results[0].end), (9, 19));
//! ```
//!
//! ## Módulos Principais
//!
//! - [`recognizer`]: Ponto de entrada (`analyze`).
//! - [`pattern`]: Catálogo imutável de padrões.
//! - [`config`]: Configuração via JSON, incluindo catálogo substituto.
//! - [`error`]: Erros de construção.

pub mod config;
pub mod error;
pub mod pattern;
pub mod recognizer;
pub mod result;
pub mod score;

pub use config::RecognizerConfig;
pub use error::{RecognizerError, Result};
pub use pattern::{Pattern, PatternSet, PatternSpec, RegexFlags};
pub use recognizer::{DateRecognizer, RawMatch};
pub use result::{RecognizerResult, ResultAssembler, DATE_TIME};
pub use score::{AdjustedMatch, ScoreAdjuster};
