/// Mutable editor-session context: which project/document is open, whether
/// there are unsaved edits, and whether a streaming insert is running.
/// Passed to controllers explicitly so tests stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub project_id: Option<u64>,
    pub document_id: Option<u64>,
    pub unsaved: bool,
    pub streaming: bool,
}

impl Session {
    pub fn open_project(&mut self, project_id: u64) {
        self.project_id = Some(project_id);
        self.document_id = None;
    }

    pub fn open_document(&mut self, project_id: u64, document_id: u64) {
        self.project_id = Some(project_id);
        self.document_id = Some(document_id);
    }

    pub fn close_document(&mut self) {
        self.document_id = None;
        self.unsaved = false;
    }

    pub fn mark_unsaved(&mut self) {
        self.unsaved = true;
    }

    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close_flow() {
        let mut session = Session::default();
        session.open_project(1);
        assert_eq!(session.project_id, Some(1));
        assert_eq!(session.document_id, None);

        session.open_document(1, 2);
        session.mark_unsaved();
        assert!(session.unsaved);

        session.close_document();
        assert_eq!(session.document_id, None);
        assert!(!session.unsaved);
        // The project stays open
        assert_eq!(session.project_id, Some(1));
    }

    #[test]
    fn opening_a_document_in_another_project_switches_both() {
        let mut session = Session::default();
        session.open_document(1, 2);
        session.open_document(3, 4);
        assert_eq!(session.project_id, Some(3));
        assert_eq!(session.document_id, Some(4));
    }
}
