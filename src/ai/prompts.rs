use crate::model::settings::Settings;

/// Placeholder tokens the user can keep in custom templates
pub const TOKENS_PLACEHOLDER: &str = "{TOKENS_TO_GENERATE}";
pub const CONTEXT_NOTES_PLACEHOLDER: &str = "{CONTEXT_NOTES}";
pub const DOCUMENTS_PLACEHOLDER: &str = "{DOCUMENTS_CONTEXT}";
pub const RECENT_TEXT_PLACEHOLDER: &str = "{RECENT_TEXT}";

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a creative writing assistant helping to continue a story.
{CONTEXT_NOTES}
{DOCUMENTS_CONTEXT}

Generate approximately {TOKENS_TO_GENERATE} tokens that naturally continue \
the narrative. Match the writing style, tone, and voice of the existing \
text. Do not repeat content from the existing text.";

pub const DEFAULT_USER_PROMPT: &str = "Here is the story so far:\n\n{RECENT_TEXT}\n\nPlease continue the story naturally from where it left off.";

pub const IMPROVE_SYSTEM_PROMPT: &str = "\
You are a professional editor. Improve the provided text based on the \
user's specific instructions while maintaining the original meaning and \
voice. Return only the improved text without any preamble or explanation.";

pub const DEFAULT_IDEAS_PROMPT: &str = "\
You are a creative writing assistant. Generate 5 creative ideas for \
continuing or enhancing the story.
{CONTEXT_NOTES}
{DOCUMENTS_CONTEXT}

Format your response as a numbered list.";

/// Continuation system prompt: user override or built-in default, with the
/// three placeholders substituted. Absent context collapses to nothing.
pub fn continuation_system(
    settings: &Settings,
    tokens_to_generate: u32,
    context_notes: &str,
    documents_context: &str,
) -> String {
    let template = settings
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let notes = if context_notes.is_empty() {
        String::new()
    } else {
        format!("\n\nContext about the story:\n{context_notes}")
    };
    template
        .replace(TOKENS_PLACEHOLDER, &tokens_to_generate.to_string())
        .replace(CONTEXT_NOTES_PLACEHOLDER, &notes)
        .replace(DOCUMENTS_PLACEHOLDER, documents_context)
}

/// Continuation user prompt with the recent excerpt substituted
pub fn continuation_user(settings: &Settings, recent_text: &str) -> String {
    let template = settings
        .user_prompt
        .as_deref()
        .unwrap_or(DEFAULT_USER_PROMPT);
    template.replace(RECENT_TEXT_PLACEHOLDER, recent_text)
}

/// Improvement user prompt (the system half is fixed)
pub fn improve_user(selected_text: &str, instructions: &str) -> String {
    format!(
        "Original text:\n{selected_text}\n\nInstructions: {instructions}\n\nProvide the improved version:"
    )
}

/// Ideas/brainstorm system prompt
pub fn ideas_system(settings: &Settings, context_notes: &str, documents_context: &str) -> String {
    let template = settings
        .ideas_prompt
        .as_deref()
        .unwrap_or(DEFAULT_IDEAS_PROMPT);
    let notes = if context_notes.is_empty() {
        String::new()
    } else {
        format!("\n\nContext:\n{context_notes}")
    };
    template
        .replace(CONTEXT_NOTES_PLACEHOLDER, &notes)
        .replace(DOCUMENTS_PLACEHOLDER, documents_context)
}

/// Ideas user prompt, excerpt-aware
pub fn ideas_user(excerpt: &str) -> String {
    if excerpt.is_empty() {
        "Provide 5 creative story ideas or writing prompts.".to_string()
    } else {
        format!(
            "Based on this story excerpt:\n\n{excerpt}\n\nProvide 5 creative ideas for what could happen next or how to develop the narrative."
        )
    }
}
