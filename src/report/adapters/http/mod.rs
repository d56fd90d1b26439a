//! HTTP adapter for the external text-generation service.

mod openai;

pub use openai::OpenAiChatGenerator;
