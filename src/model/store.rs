use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::chat::ChatMessage;
use super::document::Document;
use super::folder::Folder;
use super::project::Project;
use super::settings::Settings;

/// Identifies a sibling group: the set of items ordered together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// All projects
    Projects,
    /// Folders of one project sharing a parent (None = top level)
    Folders {
        project_id: u64,
        parent_id: Option<u64>,
    },
    /// Documents of one project sharing a folder (None = top level)
    Documents {
        project_id: u64,
        folder_id: Option<u64>,
    },
}

/// The canonical in-memory collections. All mutation goes through the
/// `ops` layer, which keeps sibling orders dense and the folder graph
/// acyclic; the store itself only offers lookups and id allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub projects: Vec<Project>,
    pub folders: Vec<Folder>,
    pub documents: Vec<Document>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    /// Monotonic id allocator, seeded from the creation time and bumped
    /// past every imported id. Timestamp-derived ids alone collide under
    /// rapid bulk operations.
    pub next_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Store {
            projects: Vec::new(),
            folders: Vec::new(),
            documents: Vec::new(),
            settings: Settings::default(),
            chat_history: Vec::new(),
            next_id: Utc::now().timestamp_millis() as u64,
        }
    }
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Hand out a fresh unique id
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Bump the allocator past every id currently in the collections.
    /// Called after a wholesale import so new ids cannot collide.
    pub fn reseat_allocator(&mut self) {
        let max_seen = self
            .projects
            .iter()
            .map(|p| p.id)
            .chain(self.folders.iter().map(|f| f.id))
            .chain(self.documents.iter().map(|d| d.id))
            .max()
            .unwrap_or(0);
        if self.next_id <= max_seen {
            self.next_id = max_seen + 1;
        }
    }

    pub fn project(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_mut(&mut self, id: u64) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    pub fn folder(&self, id: u64) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn folder_mut(&mut self, id: u64) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    pub fn document(&self, id: u64) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn document_mut(&mut self, id: u64) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Folder ids belonging to a sibling group, sorted by order
    pub fn folder_group(&self, project_id: u64, parent_id: Option<u64>) -> Vec<u64> {
        let mut group: Vec<&Folder> = self
            .folders
            .iter()
            .filter(|f| f.project_id == project_id && f.parent_id == parent_id)
            .collect();
        group.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap_or(std::cmp::Ordering::Equal));
        group.iter().map(|f| f.id).collect()
    }

    /// Document ids belonging to a sibling group, sorted by order
    pub fn document_group(&self, project_id: u64, folder_id: Option<u64>) -> Vec<u64> {
        let mut group: Vec<&Document> = self
            .documents
            .iter()
            .filter(|d| d.project_id == project_id && d.folder_id == folder_id)
            .collect();
        group.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap_or(std::cmp::Ordering::Equal));
        group.iter().map(|d| d.id).collect()
    }

    /// Project ids sorted by order
    pub fn project_group(&self) -> Vec<u64> {
        let mut group: Vec<&Project> = self.projects.iter().collect();
        group.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap_or(std::cmp::Ordering::Equal));
        group.iter().map(|p| p.id).collect()
    }

    /// Append a message to the persisted brainstorm transcript
    pub fn append_chat(&mut self, message: ChatMessage) {
        self.chat_history.push(message);
    }

    pub fn clear_chat(&mut self) {
        self.chat_history.clear();
    }

    /// Enabled documents of a project, excluding `skip`, sorted by order.
    /// This is the AI-context provider set and the export order.
    pub fn enabled_documents(&self, project_id: u64, skip: Option<u64>) -> Vec<&Document> {
        let mut docs: Vec<&Document> = self
            .documents
            .iter()
            .filter(|d| d.project_id == project_id && d.enabled && Some(d.id) != skip)
            .collect();
        docs.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap_or(std::cmp::Ordering::Equal));
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::DocKind;

    #[test]
    fn allocate_id_is_monotonic() {
        let mut store = Store::new();
        let a = store.allocate_id();
        let b = store.allocate_id();
        assert!(b > a);
    }

    #[test]
    fn reseat_allocator_skips_imported_ids() {
        let mut store = Store::new();
        let high = store.next_id + 1000;
        store.projects.push(Project::new(high, "Imported".into()));
        store.reseat_allocator();
        assert_eq!(store.allocate_id(), high + 1);
    }

    #[test]
    fn document_group_sorts_by_order() {
        let mut store = Store::new();
        let pid = store.allocate_id();
        store.projects.push(Project::new(pid, "P".into()));

        for (i, order) in [(0u64, 2.0), (1, 0.0), (2, 1.0)] {
            let id = store.allocate_id();
            let mut doc = Document::new(id, pid, format!("D{i}"), DocKind::Chapter);
            doc.order = order;
            store.documents.push(doc);
        }

        let group = store.document_group(pid, None);
        let orders: Vec<f64> = group
            .iter()
            .map(|id| store.document(*id).unwrap().order)
            .collect();
        assert_eq!(orders, [0.0, 1.0, 2.0]);
    }

    #[test]
    fn chat_transcript_appends_and_clears() {
        let mut store = Store::new();
        store.append_chat(ChatMessage::user("give me three twist ideas"));
        store.append_chat(ChatMessage::assistant("1. ..."));
        assert_eq!(store.chat_history.len(), 2);
        store.clear_chat();
        assert!(store.chat_history.is_empty());
    }

    #[test]
    fn enabled_documents_filters_and_skips() {
        let mut store = Store::new();
        let pid = store.allocate_id();
        store.projects.push(Project::new(pid, "P".into()));

        let a = store.allocate_id();
        store
            .documents
            .push(Document::new(a, pid, "A".into(), DocKind::Synopsis));
        let b = store.allocate_id();
        let mut doc_b = Document::new(b, pid, "B".into(), DocKind::Chapter);
        doc_b.enabled = false;
        doc_b.order = 1.0;
        store.documents.push(doc_b);
        let c = store.allocate_id();
        let mut doc_c = Document::new(c, pid, "C".into(), DocKind::Notes);
        doc_c.order = 2.0;
        store.documents.push(doc_c);

        let docs = store.enabled_documents(pid, Some(c));
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, a);
    }
}
