use std::sync::Arc;

use tracing::info;

use super::client::{ChatApi, ChatRequest, Message, OpenAiError};
use crate::utils::text::truncate_chars;

/// Hard bound on the statement text embedded into the prompt, in characters.
/// Text beyond this is cut before the API call to keep cost and latency bounded.
pub const MAX_INPUT_CHARS: usize = 15_000;

const BANK_STATEMENT_SYSTEM_PROMPT: &str = "\
Você é um analista financeiro especializado em extratos bancários.
Sua tarefa é analisar extratos bancários e criar relatórios detalhados usando formatação markdown.
Identifique e categorize todas as transações, destacando entradas, saídas, tarifas bancárias e outros movimentos relevantes.
Faça cálculos precisos de totais e saldos.
Ao final, apresente uma avaliação da saúde financeira baseada nos padrões de gastos, receitas e saldo,
com recomendações práticas e específicas para melhorar a gestão financeira.";

const BANK_STATEMENT_USER_TEMPLATE: &str = "\
Analise detalhadamente o seguinte extrato bancário e crie um relatório completo em formato markdown:

1. Comece com um título e resumo geral das informações do extrato (período, conta, instituição bancária, etc);

2. Detalhe todas as ENTRADAS (créditos, depósitos, transferências recebidas, etc) em uma tabela organizada com data, descrição e valor;

3. Detalhe todas as SAÍDAS (débitos, pagamentos, transferências enviadas, etc) categorizadas (exemplo: alimentação, transporte, moradia) em uma tabela organizada com data, descrição, categoria e valor;

4. Liste todas as TARIFAS bancárias cobradas separadamente;

5. Apresente um RESUMO FINANCEIRO com:
   - Total de entradas
   - Total de saídas
   - Total de tarifas
   - Saldo inicial e final
   - Diferença entre entradas e saídas
   - Maiores despesas por categoria
   - Gráfico de distribuição de gastos (representado em markdown)

6. Finalize com uma ANÁLISE DE SAÚDE FINANCEIRA detalhada que inclua:
   - Indicadores de saúde financeira
   - Pontos positivos identificados
   - Pontos críticos ou de atenção
   - Sugestões práticas e específicas para melhorar a gestão financeira
   - Previsões para os próximos meses se mantido o mesmo padrão

Extrato bancário:
";

const GENERIC_SYSTEM_PROMPT: &str =
    "Você é um assistente especializado em resumir documentos de forma clara e objetiva.";

const GENERIC_USER_TEMPLATE: &str = "Crie um resumo detalhado do seguinte texto:\n\n";

/// Selects the prompt pair and output token cap for a summarization run.
/// Both variants share one pipeline; only the prompt contract differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryProfile {
    /// Full bank-statement analysis: categorized tables, totals and a
    /// financial-health narrative with recommendations.
    BankStatement,
    /// Plain detailed summary of the document text.
    Generic,
}

impl SummaryProfile {
    pub fn max_tokens(self) -> u32 {
        match self {
            SummaryProfile::BankStatement => 1500,
            SummaryProfile::Generic => 1000,
        }
    }

    fn system_prompt(self) -> &'static str {
        match self {
            SummaryProfile::BankStatement => BANK_STATEMENT_SYSTEM_PROMPT,
            SummaryProfile::Generic => GENERIC_SYSTEM_PROMPT,
        }
    }

    fn user_prompt(self, text: &str) -> String {
        let template = match self {
            SummaryProfile::BankStatement => BANK_STATEMENT_USER_TEMPLATE,
            SummaryProfile::Generic => GENERIC_USER_TEMPLATE,
        };
        format!("{}{}", template, text)
    }
}

/// Sends extracted statement text to a chat-completion API and returns the
/// generated markdown report. The API is injected so tests can use a fake.
pub struct Summarizer {
    api: Arc<dyn ChatApi>,
    model: String,
    profile: SummaryProfile,
}

impl Summarizer {
    pub fn new(api: Arc<dyn ChatApi>, model: impl Into<String>, profile: SummaryProfile) -> Self {
        Self {
            api,
            model: model.into(),
            profile,
        }
    }

    pub async fn summarize(&self, text: &str) -> Result<String, OpenAiError> {
        let excerpt = truncate_chars(text, MAX_INPUT_CHARS);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(self.profile.system_prompt()),
                Message::user(self.profile.user_prompt(excerpt)),
            ],
            max_tokens: Some(self.profile.max_tokens()),
        };

        info!(
            model = %self.model,
            profile = ?self.profile,
            input_chars = excerpt.chars().count(),
            "Requesting summary from OpenAI"
        );

        self.api.chat_completion(request).await
    }
}
