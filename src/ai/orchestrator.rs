use crate::ai::client::{AiError, CompletionClient, ModelParams};
use crate::ai::prompts;
use crate::markup::convert::{extract_plain_text, looks_like_html};
use crate::model::settings::Settings;
use crate::model::store::Store;

/// Character budget for the "story so far" excerpt sent with requests
pub const RECENT_EXCERPT_CHARS: usize = 2000;

/// Format the enabled-document context block: every enabled document of the
/// project except the active one, in display order, plain text extracted
/// from any legacy HTML content. Empty when nothing is enabled.
pub fn documents_context(store: &Store, project_id: u64, active_doc: Option<u64>) -> String {
    let docs = store.enabled_documents(project_id, active_doc);
    if docs.is_empty() {
        return String::new();
    }
    let sections: Vec<String> = docs
        .iter()
        .map(|doc| {
            let text = if looks_like_html(&doc.content) {
                extract_plain_text(&doc.content)
            } else {
                doc.content.clone()
            };
            format!("--- {}: {} ---\n{}\n", doc.kind.name(), doc.title, text)
        })
        .collect();
    format!("\n\nAdditional Context:\n{}", sections.join("\n"))
}

/// The trailing excerpt of the text, bounded by characters not bytes
pub fn recent_excerpt(text: &str, max_chars: usize) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take(max_chars)
        .last()
        .map_or(text.len(), |(i, _)| i);
    &text[start..]
}

/// Continue the narrative from the text before the cursor. Returns the
/// completion text; the caller streams it into the editor.
pub fn request_continuation(
    client: &CompletionClient,
    settings: &Settings,
    store: &Store,
    project_id: u64,
    active_doc: Option<u64>,
    preceding_text: &str,
    context_notes: &str,
) -> Result<String, AiError> {
    let docs = documents_context(store, project_id, active_doc);
    let system = prompts::continuation_system(settings, settings.max_tokens, context_notes, &docs);
    let user = prompts::continuation_user(
        settings,
        recent_excerpt(preceding_text, RECENT_EXCERPT_CHARS),
    );
    let params = ModelParams::from_settings(settings);
    client.complete(&params, &system, &user)
}

/// Rework a selection according to the user's instructions. Returns the
/// replacement text.
pub fn request_improvement(
    client: &CompletionClient,
    settings: &Settings,
    selected_text: &str,
    instructions: &str,
) -> Result<String, AiError> {
    let user = prompts::improve_user(selected_text, instructions);
    let params = ModelParams {
        // Give the edit room to grow: twice the selection, with a floor
        max_tokens: Some((selected_text.len() as u32 * 2).max(1024)),
        ..ModelParams::from_settings(settings)
    };
    client.complete(&params, prompts::IMPROVE_SYSTEM_PROMPT, &user)
}

/// Brainstorm ideas from the current excerpt and context documents
pub fn request_ideas(
    client: &CompletionClient,
    settings: &Settings,
    store: &Store,
    project_id: u64,
    active_doc: Option<u64>,
    current_text: &str,
    context_notes: &str,
) -> Result<String, AiError> {
    let docs = documents_context(store, project_id, active_doc);
    let system = prompts::ideas_system(settings, context_notes, &docs);
    let user = prompts::ideas_user(recent_excerpt(current_text, RECENT_EXCERPT_CHARS));
    let params = ModelParams {
        // Idea lists run short; let the service pick the budget
        max_tokens: None,
        ..ModelParams::from_settings(settings)
    };
    client.complete(&params, &system, &user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::{DocKind, Document};
    use crate::model::project::Project;

    fn store_with_context() -> (Store, u64, u64) {
        let mut store = Store::new();
        let pid = store.allocate_id();
        store.projects.push(Project::new(pid, "Novel".into()));

        let chapter = store.allocate_id();
        let mut doc = Document::new(chapter, pid, "Chapter 1".into(), DocKind::Chapter);
        doc.content = "The chapter text.".into();
        store.documents.push(doc);

        let synopsis = store.allocate_id();
        let mut doc = Document::new(synopsis, pid, "Synopsis".into(), DocKind::Synopsis);
        doc.content = "A thief plans one last job.".into();
        doc.order = 1.0;
        store.documents.push(doc);

        let characters = store.allocate_id();
        let mut doc = Document::new(characters, pid, "Cast".into(), DocKind::Characters);
        doc.content = "<p>Mara: the <b>thief</b></p>".into();
        doc.order = 2.0;
        store.documents.push(doc);

        (store, pid, chapter)
    }

    #[test]
    fn context_excludes_active_doc_and_extracts_html() {
        let (store, pid, chapter) = store_with_context();
        let context = documents_context(&store, pid, Some(chapter));
        assert!(context.starts_with("\n\nAdditional Context:\n"));
        assert!(context.contains("--- Synopsis: Synopsis ---\nA thief plans one last job."));
        // Legacy HTML content arrives as plain text
        assert!(context.contains("--- Characters: Cast ---\nMara: the thief"));
        // The active chapter itself is not context
        assert!(!context.contains("The chapter text."));
    }

    #[test]
    fn context_empty_when_nothing_enabled() {
        let (mut store, pid, chapter) = store_with_context();
        for doc in store.documents.iter_mut() {
            doc.enabled = false;
        }
        assert_eq!(documents_context(&store, pid, Some(chapter)), "");
    }

    #[test]
    fn context_respects_disabled_documents() {
        let (mut store, pid, chapter) = store_with_context();
        let synopsis_id = store
            .documents
            .iter()
            .find(|d| d.kind == DocKind::Synopsis)
            .unwrap()
            .id;
        store.document_mut(synopsis_id).unwrap().enabled = false;

        let context = documents_context(&store, pid, Some(chapter));
        assert!(!context.contains("Synopsis"));
        assert!(context.contains("Cast"));
    }

    #[test]
    fn excerpt_bounds_by_characters() {
        let text = "x".repeat(3000);
        assert_eq!(recent_excerpt(&text, 2000).len(), 2000);

        let short = "short text";
        assert_eq!(recent_excerpt(short, 2000), short);
    }

    #[test]
    fn excerpt_is_utf8_safe() {
        let text = "é".repeat(1500); // 3000 bytes, 1500 chars
        let excerpt = recent_excerpt(&text, 1000);
        assert_eq!(excerpt.chars().count(), 1000);
    }
}
