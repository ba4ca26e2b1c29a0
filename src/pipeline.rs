//! The per-request pipeline: fetch, validate, extract, summarize.
//!
//! Each stage raises a tagged error; the HTTP layer is the single recovery
//! boundary and maps errors to status codes via [`PipelineError::status`].
//! Nothing is retried and no partial result is returned on failure.

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::openai::Summarizer;
use crate::utils::{fetch, pdf, sniff};

// Display messages are the wire contract; clients see them verbatim in the
// `erro` field.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Erro ao baixar o arquivo: {0}")]
    Download(String),

    #[error("O arquivo não é um PDF válido. Tipo detectado: {0}")]
    InvalidFileType(String),

    #[error("Erro ao extrair texto do PDF: {0}")]
    Extraction(String),

    #[error("Não foi possível extrair texto do PDF")]
    NoText,

    #[error("Erro ao analisar o extrato bancário com OpenAI: {0}")]
    Summarization(String),
}

impl PipelineError {
    /// A PDF with no extractable text is a client error (the input is
    /// unusable); every other stage failure maps to a server error.
    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::NoText => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Successful pipeline output, serialized as-is in the HTTP response.
/// Lengths are character counts; `tamanho_original` is measured before the
/// summarizer's truncation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub resumo: String,
    pub tamanho_original: usize,
    pub tamanho_resumo: usize,
}

/// Runs the four stages in sequence for a single URL. No state survives the
/// call; concurrent requests are fully independent.
pub async fn run(url: &str, summarizer: &Summarizer) -> Result<Report, PipelineError> {
    let content = fetch::download(url)
        .await
        .map_err(|e| PipelineError::Download(e.to_string()))?;

    sniff::ensure_pdf(&content)
        .map_err(|detected| PipelineError::InvalidFileType(detected.to_string()))?;

    let text = pdf::extract_text(&content).map_err(|e| PipelineError::Extraction(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(PipelineError::NoText);
    }

    info!(url = %url, text_chars = text.chars().count(), "Text extracted; summarizing");

    let resumo = summarizer
        .summarize(&text)
        .await
        .map_err(|e| PipelineError::Summarization(e.to_string()))?;

    Ok(Report {
        tamanho_original: text.chars().count(),
        tamanho_resumo: resumo.chars().count(),
        resumo,
    })
}
