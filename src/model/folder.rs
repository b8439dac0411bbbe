use serde::{Deserialize, Serialize};

/// A folder inside a project. Folders are organizational only: deleting one
/// reparents its children one level up, never destroys content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    /// None = top level. The parent graph within one project must stay
    /// acyclic; every reparent checks before committing.
    pub parent_id: Option<u64>,
    /// Position among siblings. Dense 0..N-1 after any reorder.
    #[serde(default)]
    pub order: f64,
    #[serde(default)]
    pub collapsed: bool,
}

impl Folder {
    pub fn new(id: u64, project_id: u64, name: String, parent_id: Option<u64>) -> Self {
        Folder {
            id,
            project_id,
            name,
            parent_id,
            order: 0.0,
            collapsed: false,
        }
    }
}
