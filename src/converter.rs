use regex::Regex;
use std::sync::LazyLock;

use crate::gemini::{GeminiContent, GeminiPart};
use crate::models::Message;

// Matches everything between "data:" and ";base64," as the mime type.
static DATA_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:(.*);base64,").expect("valid data URI pattern"));

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("Invalid image format")]
    InvalidImageFormat,
}

/// Splits a data URI into its mime type and base64 payload.
pub fn parse_data_uri(uri: &str) -> Result<(&str, &str), ConvertError> {
    let captures = DATA_URI
        .captures(uri)
        .ok_or(ConvertError::InvalidImageFormat)?;
    let mime_type = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let payload = uri
        .splitn(2, ',')
        .nth(1)
        .ok_or(ConvertError::InvalidImageFormat)?;
    Ok((mime_type, payload))
}

/// Reshapes the client-held transcript plus the new turn into the content
/// sequence the `generateContent` API expects.
///
/// Historical messages become one text part each; their display-only images
/// are dropped. The new turn is appended last as a `user` entry carrying, in
/// order, the inline image (if any) and the prompt text. When only an image
/// is sent and `fallback_prompt` is configured, that instruction stands in
/// for the missing prompt. An empty prompt/image pair produces an empty
/// parts list, forwarded as-is.
pub fn build_contents(
    history: &[Message],
    prompt: Option<&str>,
    image: Option<&str>,
    fallback_prompt: Option<&str>,
) -> Result<Vec<GeminiContent>, ConvertError> {
    let mut contents: Vec<GeminiContent> = history
        .iter()
        .map(|msg| GeminiContent {
            role: if msg.is_user { "user" } else { "model" }.to_string(),
            parts: vec![GeminiPart::text(msg.text.clone().unwrap_or_default())],
        })
        .collect();

    let mut parts: Vec<GeminiPart> = Vec::new();

    if let Some(image) = image {
        let (mime_type, payload) = parse_data_uri(image)?;
        parts.push(GeminiPart::inline_data(mime_type, payload));
    }

    match prompt {
        Some(prompt) if !prompt.is_empty() => parts.push(GeminiPart::text(prompt)),
        _ => {
            if let (Some(_), Some(fallback)) = (image, fallback_prompt) {
                parts.push(GeminiPart::text(fallback));
            }
        }
    }

    contents.push(GeminiContent {
        role: "user".to_string(),
        parts,
    });
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "Describe this image.";

    fn message(text: &str, is_user: bool) -> Message {
        Message {
            text: Some(text.to_string()),
            is_user,
            image: None,
        }
    }

    #[test]
    fn parses_well_formed_data_uri() {
        let (mime, payload) = parse_data_uri("data:image/png;base64,AAAA").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "AAAA");
    }

    #[test]
    fn rejects_non_data_uri() {
        for bad in ["AAAA", "http://example.com/cat.png", "data:image/png,AAAA"] {
            assert_eq!(parse_data_uri(bad), Err(ConvertError::InvalidImageFormat));
        }
    }

    #[test]
    fn maps_history_roles_and_appends_new_turn() {
        let history = vec![message("hi", true), message("hello", false)];
        let contents =
            build_contents(&history, Some("how are you?"), None, Some(FALLBACK)).unwrap();

        assert_eq!(
            contents,
            vec![
                GeminiContent {
                    role: "user".to_string(),
                    parts: vec![GeminiPart::text("hi")],
                },
                GeminiContent {
                    role: "model".to_string(),
                    parts: vec![GeminiPart::text("hello")],
                },
                GeminiContent {
                    role: "user".to_string(),
                    parts: vec![GeminiPart::text("how are you?")],
                },
            ]
        );
    }

    #[test]
    fn historical_images_are_never_forwarded() {
        let history = vec![Message {
            text: Some("look".to_string()),
            is_user: true,
            image: Some("data:image/png;base64,AAAA".to_string()),
        }];
        let contents = build_contents(&history, Some("nice?"), None, Some(FALLBACK)).unwrap();

        assert_eq!(contents[0].parts, vec![GeminiPart::text("look")]);
    }

    #[test]
    fn history_message_without_text_becomes_empty_string_part() {
        let history = vec![Message {
            text: None,
            is_user: false,
            image: None,
        }];
        let contents = build_contents(&history, Some("hi"), None, None).unwrap();
        assert_eq!(contents[0].parts, vec![GeminiPart::text("")]);
    }

    #[test]
    fn image_part_precedes_prompt_text() {
        let contents = build_contents(
            &[],
            Some("what is this?"),
            Some("data:image/jpeg;base64,QUJD"),
            Some(FALLBACK),
        )
        .unwrap();

        assert_eq!(
            contents,
            vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![
                    GeminiPart::inline_data("image/jpeg", "QUJD"),
                    GeminiPart::text("what is this?"),
                ],
            }]
        );
    }

    #[test]
    fn image_only_turn_gets_fallback_prompt() {
        let contents = build_contents(
            &[],
            None,
            Some("data:image/png;base64,AAAA"),
            Some(FALLBACK),
        )
        .unwrap();

        assert_eq!(contents[0].parts.len(), 2);
        assert_eq!(contents[0].parts[1], GeminiPart::text(FALLBACK));
    }

    #[test]
    fn image_only_turn_without_fallback_sends_image_alone() {
        let contents =
            build_contents(&[], None, Some("data:image/png;base64,AAAA"), None).unwrap();
        assert_eq!(
            contents[0].parts,
            vec![GeminiPart::inline_data("image/png", "AAAA")]
        );
    }

    #[test]
    fn empty_prompt_counts_as_absent() {
        let contents = build_contents(
            &[],
            Some(""),
            Some("data:image/png;base64,AAAA"),
            Some(FALLBACK),
        )
        .unwrap();
        assert_eq!(contents[0].parts[1], GeminiPart::text(FALLBACK));
    }

    #[test]
    fn empty_turn_produces_empty_parts_and_is_idempotent() {
        let contents = build_contents(&[], None, None, Some(FALLBACK)).unwrap();
        assert_eq!(contents.len(), 1);
        assert!(contents[0].parts.is_empty());

        let again = build_contents(&[], None, None, Some(FALLBACK)).unwrap();
        assert_eq!(contents, again);
    }

    #[test]
    fn invalid_image_aborts_before_history_mapping_matters() {
        let history = vec![message("hi", true)];
        let result = build_contents(&history, Some("ok"), Some("not-a-data-uri"), None);
        assert_eq!(result, Err(ConvertError::InvalidImageFormat));
    }
}
