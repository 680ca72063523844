//! Remote language-model API: transcription, summarization, speech synthesis, chat.

pub mod http;
pub mod model;
