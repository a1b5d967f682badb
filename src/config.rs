use anyhow::bail;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_FALLBACK_PROMPT: &str = "Describe this image.";

/// Settings the relay reads once at startup. The credential is required; the
/// process must not begin serving without it.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub fallback_prompt: Option<String>,
}

impl RelayConfig {
    pub fn new(
        api_base: String,
        api_key_flag: Option<String>,
        model: String,
        no_image_fallback: bool,
    ) -> anyhow::Result<Self> {
        let api_key = resolve_api_key(api_key_flag, std::env::var("GEMINI_API_KEY").ok())?;
        Ok(Self {
            api_base,
            api_key,
            model,
            fallback_prompt: if no_image_fallback {
                None
            } else {
                Some(DEFAULT_FALLBACK_PROMPT.to_string())
            },
        })
    }
}

fn resolve_api_key(flag: Option<String>, env: Option<String>) -> anyhow::Result<String> {
    match flag.or(env) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => bail!("Gemini API key is not set; pass --api-key or set GEMINI_API_KEY"),
    }
}
