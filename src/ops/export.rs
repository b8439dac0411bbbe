use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::io::blob::{PersistenceError, SaveFile, atomic_write};
use crate::markup::convert::{looks_like_html, to_markdown_lossy};
use crate::model::store::Store;
use crate::ops::order::TreeError;
use crate::util::text::sanitize_filename;

/// Backup filename: `Folio_Backup_<YYYY-MM-DD>.folio`
pub fn backup_filename(now: DateTime<Utc>) -> String {
    format!("Folio_Backup_{}.folio", now.format("%Y-%m-%d"))
}

/// Write an unencrypted, pretty-printed backup of the whole store.
/// Returns the path written.
pub fn write_backup(store: &Store, target_dir: &Path) -> Result<PathBuf, PersistenceError> {
    let path = target_dir.join(backup_filename(Utc::now()));
    let save = SaveFile::from_store(store);
    let json =
        serde_json::to_vec_pretty(&save).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
    atomic_write(&path, &json).map_err(|e| PersistenceError::Write {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

/// Restore a backup file: parse, default any missing top-level key, and
/// replace the in-memory collections wholesale. The caller persists the
/// result.
pub fn restore_backup(path: &Path) -> Result<Store, PersistenceError> {
    let json = fs::read_to_string(path).map_err(|e| PersistenceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let save: SaveFile =
        serde_json::from_str(&json).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
    Ok(save.into_store())
}

/// Filename for the compiled draft: sanitized title + `_full_draft.md`
pub fn draft_filename(project_title: &str) -> String {
    format!("{}_full_draft.md", sanitize_filename(project_title))
}

/// Flatten a project into one markdown document: title as H1 (description
/// italicized under it), then each enabled document in display order as
/// its own H1 section, horizontal rules between sections. Legacy HTML
/// content is converted on the way out.
pub fn compile_draft(store: &Store, project_id: u64) -> Result<String, TreeError> {
    let project = store
        .project(project_id)
        .ok_or_else(|| TreeError::NotFound(format!("project {project_id}")))?;

    let docs = store.enabled_documents(project_id, None);
    if docs.is_empty() {
        return Err(TreeError::Validation("enabled document set"));
    }

    let mut out = format!("# {}\n", project.title);
    if !project.description.is_empty() {
        out.push_str(&format!("*{}*\n", project.description));
    }
    out.push_str("\n---\n\n");

    for doc in docs {
        out.push_str(&format!("# {}\n\n", doc.title));
        let content = if looks_like_html(&doc.content) {
            to_markdown_lossy(&doc.content)
        } else {
            doc.content.clone()
        };
        out.push_str(&content);
        out.push_str("\n\n\n***\n\n\n");
    }

    Ok(out)
}
