use std::cmp::Ordering;

use crate::model::store::{GroupKey, Store};

/// Error type for tree mutations
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("{0} cannot be empty")]
    Validation(&'static str),
    #[error("cannot move a folder into its own subtree")]
    Cycle,
    #[error("not found: {0}")]
    NotFound(String),
}

fn by_order(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Renumber one sibling group to a contiguous 0..N-1 sequence in current
/// display order. Ties (and the transient half-increment a duplicate leaves
/// behind) resolve by insertion position; the sort is stable.
pub fn renumber(store: &mut Store, key: GroupKey) {
    match key {
        GroupKey::Projects => {
            let mut ids: Vec<(u64, f64)> =
                store.projects.iter().map(|p| (p.id, p.order)).collect();
            ids.sort_by(|a, b| by_order(a.1, b.1));
            for (i, (id, _)) in ids.iter().enumerate() {
                if let Some(p) = store.project_mut(*id) {
                    p.order = i as f64;
                }
            }
        }
        GroupKey::Folders {
            project_id,
            parent_id,
        } => {
            let mut ids: Vec<(u64, f64)> = store
                .folders
                .iter()
                .filter(|f| f.project_id == project_id && f.parent_id == parent_id)
                .map(|f| (f.id, f.order))
                .collect();
            ids.sort_by(|a, b| by_order(a.1, b.1));
            for (i, (id, _)) in ids.iter().enumerate() {
                if let Some(f) = store.folder_mut(*id) {
                    f.order = i as f64;
                }
            }
        }
        GroupKey::Documents {
            project_id,
            folder_id,
        } => {
            let mut ids: Vec<(u64, f64)> = store
                .documents
                .iter()
                .filter(|d| d.project_id == project_id && d.folder_id == folder_id)
                .map(|d| (d.id, d.order))
                .collect();
            ids.sort_by(|a, b| by_order(a.1, b.1));
            for (i, (id, _)) in ids.iter().enumerate() {
                if let Some(d) = store.document_mut(*id) {
                    d.order = i as f64;
                }
            }
        }
    }
}

/// Next order value for an append at the end of a group: max + 1, or 0 for
/// an empty group.
pub fn next_order(store: &Store, key: GroupKey) -> f64 {
    let max = match key {
        GroupKey::Projects => store.projects.iter().map(|p| p.order).fold(None, fold_max),
        GroupKey::Folders {
            project_id,
            parent_id,
        } => store
            .folders
            .iter()
            .filter(|f| f.project_id == project_id && f.parent_id == parent_id)
            .map(|f| f.order)
            .fold(None, fold_max),
        GroupKey::Documents {
            project_id,
            folder_id,
        } => store
            .documents
            .iter()
            .filter(|d| d.project_id == project_id && d.folder_id == folder_id)
            .map(|d| d.order)
            .fold(None, fold_max),
    };
    match max {
        Some(m) => m + 1.0,
        None => 0.0,
    }
}

fn fold_max(acc: Option<f64>, v: f64) -> Option<f64> {
    match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    }
}

/// Check that a group's orders are exactly 0..N-1. Used by tests and by
/// `ops::check` to validate a loaded store.
pub fn is_dense(store: &Store, key: GroupKey) -> bool {
    let orders: Vec<f64> = match key {
        GroupKey::Projects => {
            let ids = store.project_group();
            ids.iter()
                .map(|id| store.project(*id).unwrap().order)
                .collect()
        }
        GroupKey::Folders {
            project_id,
            parent_id,
        } => {
            let ids = store.folder_group(project_id, parent_id);
            ids.iter()
                .map(|id| store.folder(*id).unwrap().order)
                .collect()
        }
        GroupKey::Documents {
            project_id,
            folder_id,
        } => {
            let ids = store.document_group(project_id, folder_id);
            ids.iter()
                .map(|id| store.document(*id).unwrap().order)
                .collect()
        }
    };
    orders
        .iter()
        .enumerate()
        .all(|(i, o)| (*o - i as f64).abs() < f64::EPSILON)
}
