//! System instructions for the research assistant.
//!
//! Contains one template per request type plus the optional language
//! instruction appended to summary and chat templates.

use crate::gateway::ChatMessage;
use crate::languages::DEFAULT_LANGUAGE;

/// What the caller wants from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestType {
    /// Platform help and general questions
    #[default]
    Chat,
    /// Summary of a single publication
    Summary,
    /// Translation of supplied content
    Translation,
}

impl RequestType {
    /// Map the wire tag onto a request type. Unknown or missing tags are chat.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("summary") => RequestType::Summary,
            Some("translation") => RequestType::Translation,
            _ => RequestType::Chat,
        }
    }
}

/// System prompt for publication summaries
/// Placeholders: {language_instruction}
pub const SUMMARY_PROMPT: &str = r#"You are an expert space bioscience research analyst. Generate concise, informative summaries of scientific publications.
Focus on: key findings, methodology, implications for space exploration, and potential applications.
Keep summaries clear and accessible to a general audience while maintaining scientific accuracy.
{language_instruction}"#;

/// System prompt for translations
/// Placeholders: {language}
pub const TRANSLATION_PROMPT: &str = r#"You are a multilingual scientific translator specializing in space bioscience research.
Translate the content to {language} while preserving technical accuracy and scientific terminology.
Maintain the original meaning and context. Use appropriate scientific terms in the target language.
Ensure the translation is natural and fluent in {language}."#;

/// System prompt for the platform assistant
/// Placeholders: {language_instruction}
pub const CHAT_PROMPT: &str = r#"You are a helpful space bioscience research assistant.
Help users navigate the platform, understand research papers, and answer questions about the bioscience publications in the catalog.
Provide clear, friendly, and informative responses. Guide users on how to use features like AI summaries, filters, and translations.
{language_instruction}"#;

/// Appended to summary prompts for non-English output
pub const SUMMARY_LANGUAGE_TEMPLATE: &str = "Generate the summary in {language} language. Use proper scientific terminology in {language} while maintaining accuracy.";

/// Appended to chat prompts for non-English output
pub const CHAT_LANGUAGE_TEMPLATE: &str =
    "Please respond in {language} language. Provide clear, friendly responses in {language}.";

/// Translation target when the caller names none
const UNSPECIFIED_TARGET: &str = "the requested language";

/// User prompt template for the "get summary" action
/// Placeholders: {title}
pub const SUMMARY_REQUEST_TEMPLATE: &str = r#"Generate a detailed, accurate summary for this space bioscience research paper: "{title}". Focus on key findings, methodology, and implications for space exploration. Be scientifically precise and comprehensive."#;

/// The language, if it calls for an explicit instruction.
fn non_default_language(language: Option<&str>) -> Option<&str> {
    language
        .map(str::trim)
        .filter(|l| !l.is_empty() && *l != DEFAULT_LANGUAGE)
}

fn language_instruction(template: &str, language: Option<&str>) -> String {
    non_default_language(language)
        .map(|l| template.replace("{language}", l))
        .unwrap_or_default()
}

/// Build the system instruction for a request.
pub fn system_prompt(request_type: RequestType, language: Option<&str>) -> String {
    match request_type {
        RequestType::Summary => SUMMARY_PROMPT.replace(
            "{language_instruction}",
            &language_instruction(SUMMARY_LANGUAGE_TEMPLATE, language),
        ),
        RequestType::Translation => {
            let target = language
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or(UNSPECIFIED_TARGET);
            TRANSLATION_PROMPT.replace("{language}", target)
        }
        RequestType::Chat => CHAT_PROMPT.replace(
            "{language_instruction}",
            &language_instruction(CHAT_LANGUAGE_TEMPLATE, language),
        ),
    }
}

/// User message asking for a summary of `title`.
pub fn summary_request(title: &str) -> ChatMessage {
    ChatMessage::user(SUMMARY_REQUEST_TEMPLATE.replace("{title}", title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Role;

    #[test]
    fn test_from_tag() {
        assert_eq!(RequestType::from_tag(Some("summary")), RequestType::Summary);
        assert_eq!(RequestType::from_tag(Some("translation")), RequestType::Translation);
        assert_eq!(RequestType::from_tag(Some("chat")), RequestType::Chat);
        assert_eq!(RequestType::from_tag(Some("poem")), RequestType::Chat);
        assert_eq!(RequestType::from_tag(None), RequestType::Chat);
    }

    #[test]
    fn test_summary_with_language() {
        let prompt = system_prompt(RequestType::Summary, Some("Hindi"));
        assert!(prompt.contains("Generate the summary in Hindi language."));
        assert!(prompt.contains("scientific terminology in Hindi"));
        assert!(prompt.contains("key findings, methodology"));
    }

    #[test]
    fn test_summary_without_language_instruction() {
        for language in [None, Some("English")] {
            let prompt = system_prompt(RequestType::Summary, language);
            assert!(!prompt.contains("Generate the summary in"));
            assert!(!prompt.contains("{language_instruction}"));
        }
    }

    #[test]
    fn test_chat_language_instruction() {
        let prompt = system_prompt(RequestType::Chat, Some("Tamil"));
        assert!(prompt.contains("Please respond in Tamil language."));
        assert!(prompt.contains("navigate the platform"));

        let english = system_prompt(RequestType::Chat, Some("English"));
        assert!(!english.contains("Please respond in"));
    }

    #[test]
    fn test_translation_target() {
        let prompt = system_prompt(RequestType::Translation, Some("Japanese"));
        assert!(prompt.contains("Translate the content to Japanese"));
        assert!(prompt.contains("natural and fluent in Japanese"));

        let fallback = system_prompt(RequestType::Translation, None);
        assert!(fallback.contains("Translate the content to the requested language"));
        assert!(!fallback.contains("{language}"));
    }

    #[test]
    fn test_summary_request() {
        let message = summary_request("Bone loss in orbit");
        assert_eq!(message.role, Role::User);
        assert!(message.content.contains("\"Bone loss in orbit\""));
    }
}
