use crate::model::folder::Folder;
use crate::model::store::{GroupKey, Store};
use crate::ops::order::{self, TreeError};

/// Create a folder at the end of its sibling group. Returns its id.
pub fn create_folder(
    store: &mut Store,
    project_id: u64,
    name: &str,
    parent_id: Option<u64>,
) -> Result<u64, TreeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TreeError::Validation("folder name"));
    }
    if store.project(project_id).is_none() {
        return Err(TreeError::NotFound(format!("project {project_id}")));
    }
    if let Some(pid) = parent_id {
        if store.folder(pid).is_none() {
            return Err(TreeError::NotFound(format!("folder {pid}")));
        }
    }

    let id = store.allocate_id();
    let mut folder = Folder::new(id, project_id, name.to_string(), parent_id);
    folder.order = order::next_order(
        store,
        GroupKey::Folders {
            project_id,
            parent_id,
        },
    );
    store.folders.push(folder);
    Ok(id)
}

pub fn rename_folder(store: &mut Store, folder_id: u64, name: &str) -> Result<(), TreeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TreeError::Validation("folder name"));
    }
    let folder = store
        .folder_mut(folder_id)
        .ok_or_else(|| TreeError::NotFound(format!("folder {folder_id}")))?;
    folder.name = name.to_string();
    Ok(())
}

pub fn toggle_collapsed(store: &mut Store, folder_id: u64) -> Result<(), TreeError> {
    let folder = store
        .folder_mut(folder_id)
        .ok_or_else(|| TreeError::NotFound(format!("folder {folder_id}")))?;
    folder.collapsed = !folder.collapsed;
    Ok(())
}

/// True when `folder_id` sits somewhere below `ancestor_id`. Walks the
/// parent chain upward from `folder_id`.
pub fn is_descendant(store: &Store, folder_id: u64, ancestor_id: u64) -> bool {
    let mut current = store.folder(folder_id);
    while let Some(folder) = current {
        if folder.parent_id == Some(ancestor_id) {
            return true;
        }
        current = folder.parent_id.and_then(|p| store.folder(p));
    }
    false
}

/// Check a prospective reparent for cycles before any state changes
fn check_reparent(store: &Store, folder_id: u64, new_parent: Option<u64>) -> Result<(), TreeError> {
    if let Some(parent) = new_parent {
        if parent == folder_id || is_descendant(store, parent, folder_id) {
            return Err(TreeError::Cycle);
        }
        if store.folder(parent).is_none() {
            return Err(TreeError::NotFound(format!("folder {parent}")));
        }
    }
    Ok(())
}

/// Make `folder_id` a child of `new_parent` (None = top level), appended at
/// the end of the new sibling group. Fails with `Cycle`, leaving the tree
/// untouched, when the target is the folder itself or one of its
/// descendants.
pub fn reparent_folder(
    store: &mut Store,
    folder_id: u64,
    new_parent: Option<u64>,
) -> Result<(), TreeError> {
    check_reparent(store, folder_id, new_parent)?;
    let (project_id, old_parent) = {
        let folder = store
            .folder(folder_id)
            .ok_or_else(|| TreeError::NotFound(format!("folder {folder_id}")))?;
        (folder.project_id, folder.parent_id)
    };
    if old_parent == new_parent {
        return Ok(());
    }

    let end = order::next_order(
        store,
        GroupKey::Folders {
            project_id,
            parent_id: new_parent,
        },
    );
    let folder = store.folder_mut(folder_id).expect("checked above");
    folder.parent_id = new_parent;
    folder.order = end;

    order::renumber(
        store,
        GroupKey::Folders {
            project_id,
            parent_id: old_parent,
        },
    );
    order::renumber(
        store,
        GroupKey::Folders {
            project_id,
            parent_id: new_parent,
        },
    );
    Ok(())
}

/// Place `folder_id` at `target_index` among the children of `new_parent`,
/// reparenting first when the parent differs. Both affected groups are
/// renumbered to 0..N-1.
pub fn reorder_folder(
    store: &mut Store,
    folder_id: u64,
    new_parent: Option<u64>,
    target_index: usize,
) -> Result<(), TreeError> {
    check_reparent(store, folder_id, new_parent)?;
    let (project_id, old_parent) = {
        let folder = store
            .folder(folder_id)
            .ok_or_else(|| TreeError::NotFound(format!("folder {folder_id}")))?;
        (folder.project_id, folder.parent_id)
    };

    let mut ids: Vec<u64> = store
        .folder_group(project_id, new_parent)
        .into_iter()
        .filter(|id| *id != folder_id)
        .collect();
    let at = target_index.min(ids.len());
    ids.insert(at, folder_id);

    for (i, id) in ids.iter().enumerate() {
        if let Some(f) = store.folder_mut(*id) {
            f.order = i as f64;
            if *id == folder_id {
                f.parent_id = new_parent;
            }
        }
    }

    if old_parent != new_parent {
        order::renumber(
            store,
            GroupKey::Folders {
                project_id,
                parent_id: old_parent,
            },
        );
    }
    Ok(())
}

/// Delete a folder. Its child folders and documents are reparented to the
/// deleted folder's own parent: folders organize, they never own content.
pub fn delete_folder(store: &mut Store, folder_id: u64) -> Result<(), TreeError> {
    let (project_id, parent_id) = {
        let folder = store
            .folder(folder_id)
            .ok_or_else(|| TreeError::NotFound(format!("folder {folder_id}")))?;
        (folder.project_id, folder.parent_id)
    };

    for doc in store
        .documents
        .iter_mut()
        .filter(|d| d.folder_id == Some(folder_id))
    {
        doc.folder_id = parent_id;
    }
    for folder in store
        .folders
        .iter_mut()
        .filter(|f| f.parent_id == Some(folder_id))
    {
        folder.parent_id = parent_id;
    }

    store.folders.retain(|f| f.id != folder_id);

    order::renumber(
        store,
        GroupKey::Folders {
            project_id,
            parent_id,
        },
    );
    order::renumber(
        store,
        GroupKey::Documents {
            project_id,
            folder_id: parent_id,
        },
    );
    Ok(())
}
