use serde::{Deserialize, Serialize};

/// One transcript entry as the browser client holds it. The `image` field is
/// display-only; for historical messages it is never forwarded upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "isUser")]
    pub is_user: bool,
    #[serde(default)]
    pub image: Option<String>,
}

/// Body of `POST /api/chat`: the prior transcript plus the new turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnRequest {
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
