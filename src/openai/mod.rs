pub mod client;
pub mod summarizer;

pub use client::{ChatApi, ChatRequest, Message, OpenAiClient, OpenAiError};
pub use summarizer::{Summarizer, SummaryProfile};
