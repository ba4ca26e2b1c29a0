use serde::{Deserialize, Serialize};

/// Body accepted by `POST /resumir`. The field is optional so that its
/// absence can be reported with the service's own error envelope instead of
/// a framework rejection.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub url: Option<String>,
}

/// Error envelope returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub erro: String,
}

impl ErrorBody {
    pub fn new(erro: impl Into<String>) -> Self {
        Self { erro: erro.into() }
    }
}
