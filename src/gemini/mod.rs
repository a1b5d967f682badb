pub mod client;
pub mod content;
pub mod request;
pub mod response;

pub use client::{GeminiClient, GenerativeClient, UpstreamError};
pub use content::{GeminiContent, GeminiInlineData, GeminiPart};
pub use request::GenerateContentRequest;
pub use response::GenerateContentResponse;
