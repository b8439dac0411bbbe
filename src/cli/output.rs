use crate::model::document::Document;
use crate::model::folder::Folder;
use crate::model::project::Project;
use crate::model::store::Store;
use crate::ops::project_ops;
use crate::util::text::truncate_graphemes;

const TITLE_WIDTH: usize = 40;

/// One project line: title, genre, progress toward the target
pub fn project_line(store: &Store, project: &Project) -> String {
    let words = project_ops::project_word_count(store, project.id);
    let progress = if project.target_word_count > 0 {
        format!(
            " ({}%)",
            (words * 100) / project.target_word_count.max(1)
        )
    } else {
        String::new()
    };
    let genre = if project.genre.is_empty() {
        String::new()
    } else {
        format!(" [{}]", project.genre)
    };
    format!(
        "{}{}  {} words{}",
        truncate_graphemes(&project.title, TITLE_WIDTH),
        genre,
        words,
        progress
    )
}

/// One document line inside the tree
pub fn document_line(doc: &Document, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let marker = if doc.enabled { "" } else { " (off)" };
    format!(
        "{}{} {}{}  [{} words]",
        indent,
        doc.kind.glyph(),
        truncate_graphemes(&doc.title, TITLE_WIDTH),
        marker,
        doc.word_count
    )
}

/// One folder line inside the tree
pub fn folder_line(folder: &Folder, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let state = if folder.collapsed { "▸" } else { "▾" };
    format!(
        "{}{} {}/",
        indent,
        state,
        truncate_graphemes(&folder.name, TITLE_WIDTH)
    )
}

/// Render a project's full tree: folders (recursively) then documents at
/// each level, both in display order.
pub fn render_tree(store: &Store, project_id: u64) -> Vec<String> {
    let mut lines = Vec::new();
    render_level(store, project_id, None, 0, &mut lines);
    lines
}

fn render_level(
    store: &Store,
    project_id: u64,
    folder_id: Option<u64>,
    depth: usize,
    lines: &mut Vec<String>,
) {
    for fid in store.folder_group(project_id, folder_id) {
        if let Some(folder) = store.folder(fid) {
            lines.push(folder_line(folder, depth));
            render_level(store, project_id, Some(fid), depth + 1, lines);
        }
    }
    for did in store.document_group(project_id, folder_id) {
        if let Some(doc) = store.document(did) {
            lines.push(document_line(doc, depth));
        }
    }
}
