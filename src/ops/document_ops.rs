use crate::markup::words::count_words;
use crate::model::document::{DocKind, Document};
use crate::model::store::{GroupKey, Store};
use crate::ops::order::{self, TreeError};

/// Fields supplied by the new-document form
#[derive(Debug, Clone)]
pub struct DocumentFields {
    pub title: String,
    pub kind: DocKind,
}

/// Create a document at the end of its sibling group. Returns its id.
pub fn create_document(
    store: &mut Store,
    project_id: u64,
    folder_id: Option<u64>,
    fields: DocumentFields,
) -> Result<u64, TreeError> {
    let title = fields.title.trim().to_string();
    if title.is_empty() {
        return Err(TreeError::Validation("document title"));
    }
    if store.project(project_id).is_none() {
        return Err(TreeError::NotFound(format!("project {project_id}")));
    }
    if let Some(fid) = folder_id {
        if store.folder(fid).is_none() {
            return Err(TreeError::NotFound(format!("folder {fid}")));
        }
    }

    let id = store.allocate_id();
    let mut doc = Document::new(id, project_id, title, fields.kind);
    doc.folder_id = folder_id;
    doc.order = order::next_order(
        store,
        GroupKey::Documents {
            project_id,
            folder_id,
        },
    );
    store.documents.push(doc);
    Ok(id)
}

/// Edit title/kind metadata
pub fn update_document(
    store: &mut Store,
    document_id: u64,
    fields: DocumentFields,
) -> Result<(), TreeError> {
    let title = fields.title.trim().to_string();
    if title.is_empty() {
        return Err(TreeError::Validation("document title"));
    }
    let doc = store
        .document_mut(document_id)
        .ok_or_else(|| TreeError::NotFound(format!("document {document_id}")))?;
    doc.title = title;
    doc.kind = fields.kind;
    doc.touch();
    Ok(())
}

/// Overwrite content from the editor's canonical string and refresh the
/// cached word count.
pub fn save_content(store: &mut Store, document_id: u64, content: &str) -> Result<(), TreeError> {
    let doc = store
        .document_mut(document_id)
        .ok_or_else(|| TreeError::NotFound(format!("document {document_id}")))?;
    doc.content = content.to_string();
    doc.word_count = count_words(content);
    doc.touch();
    Ok(())
}

pub fn delete_document(store: &mut Store, document_id: u64) -> Result<(), TreeError> {
    let (project_id, folder_id) = {
        let doc = store
            .document(document_id)
            .ok_or_else(|| TreeError::NotFound(format!("document {document_id}")))?;
        (doc.project_id, doc.folder_id)
    };
    store.documents.retain(|d| d.id != document_id);
    order::renumber(
        store,
        GroupKey::Documents {
            project_id,
            folder_id,
        },
    );
    Ok(())
}

pub fn toggle_enabled(store: &mut Store, document_id: u64) -> Result<(), TreeError> {
    let doc = store
        .document_mut(document_id)
        .ok_or_else(|| TreeError::NotFound(format!("document {document_id}")))?;
    doc.enabled = !doc.enabled;
    doc.touch();
    Ok(())
}

/// Master toggle: set every document of a project at once
pub fn set_all_enabled(store: &mut Store, project_id: u64, enabled: bool) {
    for doc in store
        .documents
        .iter_mut()
        .filter(|d| d.project_id == project_id)
    {
        doc.enabled = enabled;
    }
}

/// Duplicate a document. The copy is titled `"<title> (Copy)"` and inserted
/// immediately after the source via a half-increment order, which the
/// immediate full-group renumber heals back to dense integers before
/// anything persists.
pub fn duplicate_document(store: &mut Store, document_id: u64) -> Result<u64, TreeError> {
    let source = store
        .document(document_id)
        .ok_or_else(|| TreeError::NotFound(format!("document {document_id}")))?
        .clone();

    let id = store.allocate_id();
    let mut copy = source.clone();
    copy.id = id;
    copy.title = format!("{} (Copy)", source.title);
    copy.order = source.order + 0.5;
    copy.touch();
    store.documents.push(copy);

    order::renumber(
        store,
        GroupKey::Documents {
            project_id: source.project_id,
            folder_id: source.folder_id,
        },
    );
    Ok(id)
}

/// Move a document into `folder_id` (None = top level), appended at the end
/// of the target group.
pub fn move_document_to_folder(
    store: &mut Store,
    document_id: u64,
    folder_id: Option<u64>,
) -> Result<(), TreeError> {
    if let Some(fid) = folder_id {
        if store.folder(fid).is_none() {
            return Err(TreeError::NotFound(format!("folder {fid}")));
        }
    }
    let (project_id, old_folder) = {
        let doc = store
            .document(document_id)
            .ok_or_else(|| TreeError::NotFound(format!("document {document_id}")))?;
        (doc.project_id, doc.folder_id)
    };
    if old_folder == folder_id {
        return Ok(());
    }

    let end = order::next_order(
        store,
        GroupKey::Documents {
            project_id,
            folder_id,
        },
    );
    let doc = store.document_mut(document_id).expect("checked above");
    doc.folder_id = folder_id;
    doc.order = end;
    doc.touch();

    order::renumber(
        store,
        GroupKey::Documents {
            project_id,
            folder_id: old_folder,
        },
    );
    order::renumber(
        store,
        GroupKey::Documents {
            project_id,
            folder_id,
        },
    );
    Ok(())
}

/// Place a document at `target_index` within the sibling group of
/// `folder_id`, changing its folder first when needed. Both affected groups
/// end up renumbered 0..N-1.
pub fn reorder_document(
    store: &mut Store,
    document_id: u64,
    folder_id: Option<u64>,
    target_index: usize,
) -> Result<(), TreeError> {
    let (project_id, old_folder) = {
        let doc = store
            .document(document_id)
            .ok_or_else(|| TreeError::NotFound(format!("document {document_id}")))?;
        (doc.project_id, doc.folder_id)
    };

    let mut ids: Vec<u64> = store
        .document_group(project_id, folder_id)
        .into_iter()
        .filter(|id| *id != document_id)
        .collect();
    let at = target_index.min(ids.len());
    ids.insert(at, document_id);

    for (i, id) in ids.iter().enumerate() {
        if let Some(d) = store.document_mut(*id) {
            d.order = i as f64;
            if *id == document_id {
                d.folder_id = folder_id;
            }
        }
    }

    if old_folder != folder_id {
        order::renumber(
            store,
            GroupKey::Documents {
                project_id,
                folder_id: old_folder,
            },
        );
    }
    Ok(())
}
