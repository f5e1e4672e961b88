//! Prompt enhancement contract shared by every provider client.

use async_trait::async_trait;
use thiserror::Error;

use crate::category::Category;

const BASE_INSTRUCTION: &str = r#"You are a world-class prompt engineer, acting with the capabilities of Gemini 2.5 Flash. Your task is to take a user's raw idea or keywords and transform it into a highly detailed, clear, and effective prompt for a generative AI.

Your goal is to "enhance" the user's text, not replace it. Build upon their original idea by:
- Adding rich, descriptive details and sensory language.
- Clarifying the context, audience, and desired tone.
- Suggesting a specific format or structure if it would improve the output.
- Incorporating creative constraints or parameters that will lead to a more interesting result.
- Expanding on the core concept to make it more comprehensive and inspiring.

The final output should be a single, cohesive paragraph or a few paragraphs of text, written as a direct instruction to another AI. **Do not use a rigid, multi-section markdown structure.** Instead, weave these elements naturally into the enhanced prompt.

Generate ONLY the enhanced prompt. Do not include any conversational filler, introductions, or explanations. Just give me the prompt."#;

/// Why an enhancement attempt produced no prompt.
///
/// The `Display` text is what the user sees in the error panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnhanceError {
    #[error("An error occurred: The API_KEY environment variable is not set. Please configure it in your deployment settings.")]
    MissingApiKey,

    #[error("An error occurred while communicating with the AI. Please try again. Details: {0}")]
    Provider(String),

    #[error("An unknown error occurred. Please check the console for more details.")]
    Unknown,
}

/// Something that can turn raw keywords into an enhanced prompt
#[async_trait]
pub trait Enhancer: Send + Sync {
    /// Callers reject blank keywords before getting here.
    async fn enhance(
        &self,
        category: Option<&'static Category>,
        keywords: &str,
    ) -> Result<String, EnhanceError>;
}

/// Build the system instruction, biased toward `category` when one is selected
pub fn system_instruction(category: Option<&Category>) -> String {
    match category {
        Some(category) => format!(
            "{}\n\nFocus the enhancement on the user's selected category: \"{}\". Make sure the language and details are appropriate for that domain.",
            BASE_INSTRUCTION, category.name
        ),
        None => format!(
            "{}\n\nInfer the user's intent from their keywords (e.g., coding, image generation, writing) and tailor the enhancement to be most effective for that type of task.",
            BASE_INSTRUCTION
        ),
    }
}

/// The user turn sent next to the system instruction
pub fn user_content(keywords: &str) -> String {
    format!("User Keywords: \"{}\"", keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryId;

    #[test]
    fn test_instruction_names_selected_category() {
        let category = CategoryId::ImageGen.category();
        let instruction = system_instruction(Some(category));

        assert!(instruction.starts_with("You are a world-class prompt engineer"));
        assert!(instruction.ends_with(
            "Focus the enhancement on the user's selected category: \"Image Gen\". Make sure the language and details are appropriate for that domain."
        ));
        assert!(!instruction.contains("Infer the user's intent"));
    }

    #[test]
    fn test_instruction_without_category_asks_to_infer() {
        let instruction = system_instruction(None);

        assert!(instruction.contains("Generate ONLY the enhanced prompt."));
        assert!(instruction.contains("\n\nInfer the user's intent from their keywords"));
        assert!(!instruction.contains("Focus the enhancement"));
    }

    #[test]
    fn test_user_content_quotes_keywords_verbatim() {
        assert_eq!(
            user_content("a cat, \"noir\" style"),
            "User Keywords: \"a cat, \"noir\" style\""
        );
    }

    #[test]
    fn test_error_messages() {
        assert!(EnhanceError::MissingApiKey.to_string().starts_with("An error occurred: The API_KEY"));
        assert_eq!(
            EnhanceError::Provider("timeout".to_string()).to_string(),
            "An error occurred while communicating with the AI. Please try again. Details: timeout"
        );
        assert_eq!(
            EnhanceError::Unknown.to_string(),
            "An unknown error occurred. Please check the console for more details."
        );
    }
}
