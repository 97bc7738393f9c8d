pub mod anthropic;
pub mod openai;
pub mod registry;
pub mod summarizer;

/// Shared system instruction; the length expectation is appended per call.
const SYSTEM_PROMPT: &str = include_str!("./prompts/system_0.txt");

pub(crate) fn system_prompt(max_tokens: u32) -> String {
    format!(
        "{} Keep the summary within roughly {max_tokens} tokens.",
        SYSTEM_PROMPT.trim()
    )
}
