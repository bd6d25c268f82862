//! # Erros de Construção do Reconhecedor
//!
//! Todo erro deste crate acontece na **construção** (compilação do catálogo de padrões
//! ou leitura da configuração). A análise de texto em si não falha: qualquer `&str`,
//! inclusive vazio, produz uma lista (possivelmente vazia) de resultados.

use std::path::PathBuf;

use thiserror::Error;

/// Falhas ao montar um [`PatternSet`](crate::pattern::PatternSet) ou carregar a configuração.
#[derive(Error, Debug)]
pub enum RecognizerError {
    /// A expressão regular de um padrão não compila.
    #[error("padrão '{name}' inválido: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Score base fora do intervalo [0, 1].
    #[error("padrão '{name}' com score {score} fora de [0, 1]")]
    InvalidScore { name: String, score: f64 },

    /// Padrão sem nome (o nome é usado na explicação dos resultados).
    #[error("padrão sem nome")]
    EmptyPatternName,

    /// Dois padrões com o mesmo nome no mesmo catálogo.
    #[error("padrão '{name}' duplicado")]
    DuplicatePattern { name: String },

    /// Catálogo sem nenhum padrão.
    #[error("catálogo de padrões vazio")]
    EmptyPatternSet,

    /// JSON de configuração malformado.
    #[error("configuração inválida: {0}")]
    Config(#[from] serde_json::Error),

    /// Arquivo de configuração ilegível.
    #[error("falha ao ler {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RecognizerError>;
