use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::types::{ErrorBody, SummarizeRequest};
use crate::openai::Summarizer;
use crate::pipeline;

const MISSING_URL_MESSAGE: &str = "URL do PDF não fornecida";

/// Shared application state. The summarizer (and its API client) is built
/// once at startup and reused across requests; nothing else is shared.
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<Summarizer>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/status", get(status_handler))
        .route("/resumir", post(summarize_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /` - static description of the API and its endpoints.
async fn index_handler() -> Json<serde_json::Value> {
    Json(json!({
        "api": "API de Análise de Extratos Bancários com OpenAI",
        "descricao": "Esta API permite analisar extratos bancários em PDF e gerar relatórios detalhados utilizando IA",
        "endpoints": {
            "/status": {
                "metodo": "GET",
                "descricao": "Verifica se a API está funcionando corretamente"
            },
            "/resumir": {
                "metodo": "POST",
                "descricao": "Recebe a URL de um PDF de extrato bancário, baixa o arquivo, extrai o texto e gera uma análise detalhada",
                "parametros": {
                    "url": "URL do arquivo PDF do extrato bancário a ser analisado"
                },
                "exemplo": {
                    "requisicao": {
                        "url": "https://exemplo.com/extrato-bancario.pdf"
                    }
                }
            }
        }
    }))
}

/// `GET /status` - static liveness indicator, independent of credential state.
async fn status_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "online" }))
}

/// `POST /resumir` - runs the full pipeline for the URL in the JSON body.
///
/// The body is parsed by hand so that an empty body, malformed JSON and a
/// missing `url` all produce the same 400 envelope.
async fn summarize_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let url = serde_json::from_slice::<SummarizeRequest>(&body)
        .ok()
        .and_then(|request| request.url)
        .filter(|url| !url.is_empty());

    let Some(url) = url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(MISSING_URL_MESSAGE)),
        )
            .into_response();
    };

    info!(url = %url, "Processing /resumir request");

    match pipeline::run(&url, &state.summarizer).await {
        Ok(report) => Json(report).into_response(),
        Err(error) => {
            warn!(url = %url, error = %error, "Pipeline failed");
            (error.status(), Json(ErrorBody::new(error.to_string()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::{build_router, AppState};
    use crate::openai::{ChatApi, ChatRequest, OpenAiError, Summarizer, SummaryProfile};
    use crate::utils::pdf::fixtures;

    const CANNED_REPORT: &str = "# Relatório de teste";

    struct CannedChat;

    #[async_trait::async_trait]
    impl ChatApi for CannedChat {
        async fn chat_completion(&self, _request: ChatRequest) -> Result<String, OpenAiError> {
            Ok(CANNED_REPORT.to_string())
        }
    }

    /// Serves `bytes` on an ephemeral local port and returns the file URL.
    async fn serve_bytes(bytes: Vec<u8>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let app = axum::Router::new().route(
            "/arquivo.pdf",
            axum::routing::get(move || {
                let bytes = bytes.clone();
                async move { bytes }
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fixture server");
        });

        format!("http://{}/arquivo.pdf", addr)
    }

    fn test_router() -> axum::Router {
        let summarizer = Summarizer::new(
            Arc::new(CannedChat),
            "gpt-3.5-turbo",
            SummaryProfile::BankStatement,
        );
        build_router(AppState {
            summarizer: Arc::new(summarizer),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("valid JSON body")
    }

    fn post_resumir(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/resumir")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn status_is_always_online() {
        let response = test_router()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"status": "online"}));
    }

    #[tokio::test]
    async fn index_describes_the_endpoints() {
        let response = test_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["api"].is_string());
        assert!(body["endpoints"]["/resumir"]["parametros"]["url"].is_string());
    }

    #[tokio::test]
    async fn missing_url_is_a_bad_request() {
        let response = test_router().oneshot(post_resumir("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["erro"], "URL do PDF não fornecida");
    }

    #[tokio::test]
    async fn empty_and_malformed_bodies_are_bad_requests() {
        for raw in ["", "not json at all", "{\"url\": \"\"}", "{\"url\": null}"] {
            let response = test_router().oneshot(post_resumir(raw)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {raw:?}");
            let body = body_json(response).await;
            assert!(body["erro"].is_string(), "body: {raw:?}");
        }
    }

    #[tokio::test]
    async fn unreachable_url_maps_to_download_error() {
        let response = test_router()
            .oneshot(post_resumir("{\"url\": \"http://127.0.0.1:1/extrato.pdf\"}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let erro = body["erro"].as_str().expect("erro field");
        assert!(erro.starts_with("Erro ao baixar o arquivo:"), "erro: {erro}");
    }

    #[tokio::test]
    async fn pdf_without_text_layer_is_a_bad_request() {
        let url = serve_bytes(fixtures::blank_pdf()).await;
        let response = test_router()
            .oneshot(post_resumir(&format!("{{\"url\": \"{url}\"}}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["erro"], "Não foi possível extrair texto do PDF");
    }

    #[tokio::test]
    async fn non_pdf_content_names_the_detected_type() {
        let url = serve_bytes(b"<html><body>pagina de erro</body></html>".to_vec()).await;
        let response = test_router()
            .oneshot(post_resumir(&format!("{{\"url\": \"{url}\"}}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body["erro"],
            "O arquivo não é um PDF válido. Tipo detectado: text/html"
        );
    }

    #[tokio::test]
    async fn valid_pdf_reports_summary_and_lengths() {
        let pdf = fixtures::text_pdf("Saldo 100");
        // tamanho_original must match the full extracted text, pre-truncation.
        let expected_chars = crate::utils::pdf::extract_text(&pdf)
            .expect("valid PDF")
            .chars()
            .count();

        let url = serve_bytes(pdf).await;
        let response = test_router()
            .oneshot(post_resumir(&format!("{{\"url\": \"{url}\"}}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["resumo"], CANNED_REPORT);
        assert_eq!(body["tamanho_original"], expected_chars as u64);
        assert_eq!(body["tamanho_resumo"], CANNED_REPORT.chars().count() as u64);
    }

    #[tokio::test]
    async fn invalid_url_maps_to_download_error() {
        let response = test_router()
            .oneshot(post_resumir("{\"url\": \"isto não é uma url\"}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["erro"]
            .as_str()
            .unwrap()
            .starts_with("Erro ao baixar o arquivo:"));
    }
}
