use crate::markup::words::count_words;
use crate::model::document::DocKind;
use crate::model::project::Project;
use crate::model::store::{GroupKey, Store};
use crate::ops::order::{self, TreeError};

/// Fields supplied by the new-project form
#[derive(Debug, Clone, Default)]
pub struct ProjectFields {
    pub title: String,
    pub genre: String,
    pub description: String,
    pub target_word_count: u32,
}

/// Create a project at the end of the project list. Returns its id.
pub fn create_project(store: &mut Store, fields: ProjectFields) -> Result<u64, TreeError> {
    let title = fields.title.trim().to_string();
    if title.is_empty() {
        return Err(TreeError::Validation("project title"));
    }

    let id = store.allocate_id();
    let mut project = Project::new(id, title);
    project.genre = fields.genre;
    project.description = fields.description;
    project.target_word_count = fields.target_word_count;
    project.order = order::next_order(store, GroupKey::Projects);
    store.projects.push(project);
    Ok(id)
}

/// Edit project metadata
pub fn update_project(
    store: &mut Store,
    project_id: u64,
    fields: ProjectFields,
) -> Result<(), TreeError> {
    let title = fields.title.trim().to_string();
    if title.is_empty() {
        return Err(TreeError::Validation("project title"));
    }
    let project = store
        .project_mut(project_id)
        .ok_or_else(|| TreeError::NotFound(format!("project {project_id}")))?;
    project.title = title;
    project.genre = fields.genre;
    project.description = fields.description;
    project.target_word_count = fields.target_word_count;
    project.touch();
    Ok(())
}

/// Delete a project and everything in it. The cascade is atomic: either the
/// whole subtree goes or nothing does.
pub fn delete_project(store: &mut Store, project_id: u64) -> Result<(), TreeError> {
    if store.project(project_id).is_none() {
        return Err(TreeError::NotFound(format!("project {project_id}")));
    }
    store.projects.retain(|p| p.id != project_id);
    store.documents.retain(|d| d.project_id != project_id);
    store.folders.retain(|f| f.project_id != project_id);
    order::renumber(store, GroupKey::Projects);
    Ok(())
}

/// Move a project to `target_index` in the display sequence, then renumber
/// all projects to 0..N-1.
pub fn reorder_project(
    store: &mut Store,
    project_id: u64,
    target_index: usize,
) -> Result<(), TreeError> {
    let mut ids = store.project_group();
    let from = ids
        .iter()
        .position(|id| *id == project_id)
        .ok_or_else(|| TreeError::NotFound(format!("project {project_id}")))?;
    ids.remove(from);
    let at = target_index.min(ids.len());
    ids.insert(at, project_id);
    for (i, id) in ids.iter().enumerate() {
        if let Some(p) = store.project_mut(*id) {
            p.order = i as f64;
        }
    }
    Ok(())
}

/// Duplicate a project with all its folders and documents. Returns the new
/// project id. The copy lands at the end of the project list.
pub fn duplicate_project(store: &mut Store, project_id: u64) -> Result<u64, TreeError> {
    let source = store
        .project(project_id)
        .ok_or_else(|| TreeError::NotFound(format!("project {project_id}")))?
        .clone();

    let new_pid = store.allocate_id();
    let mut copy = source.clone();
    copy.id = new_pid;
    copy.title = format!("{} (Copy)", source.title);
    copy.order = order::next_order(store, GroupKey::Projects);
    copy.touch();
    store.projects.push(copy);

    // Clone folders first so documents can be re-pointed at the new ids
    let source_folders: Vec<_> = store
        .folders
        .iter()
        .filter(|f| f.project_id == project_id)
        .cloned()
        .collect();
    let mut folder_map = std::collections::HashMap::new();
    for folder in &source_folders {
        let new_id = store.allocate_id();
        folder_map.insert(folder.id, new_id);
    }
    for folder in source_folders {
        let mut f = folder.clone();
        f.id = folder_map[&folder.id];
        f.project_id = new_pid;
        f.parent_id = folder.parent_id.map(|p| folder_map[&p]);
        store.folders.push(f);
    }

    let source_docs: Vec<_> = store
        .documents
        .iter()
        .filter(|d| d.project_id == project_id)
        .cloned()
        .collect();
    for doc in source_docs {
        let mut d = doc.clone();
        d.id = store.allocate_id();
        d.project_id = new_pid;
        d.folder_id = doc.folder_id.map(|f| folder_map[&f]);
        d.touch();
        store.documents.push(d);
    }

    Ok(new_pid)
}

/// Aggregate word total for a project: Chapter documents only, recomputed
/// from content. The cached per-document counts are display hints.
pub fn project_word_count(store: &Store, project_id: u64) -> u32 {
    store
        .documents
        .iter()
        .filter(|d| d.project_id == project_id && d.kind == DocKind::Chapter)
        .map(|d| count_words(&d.content))
        .sum()
}

/// Refresh the cached aggregate on the project record
pub fn refresh_word_count(store: &mut Store, project_id: u64) {
    let total = project_word_count(store, project_id);
    if let Some(project) = store.project_mut(project_id) {
        project.current_word_count = total;
    }
}
