use serde::{Deserialize, Serialize};

use crate::gemini::content::GeminiContent;

/// Body of a `models/<model>:generateContent` call. The model name travels in
/// the URL path, not in the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
}
