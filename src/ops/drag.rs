use crate::model::store::Store;
use crate::ops::folder_ops::{self, is_descendant};
use crate::ops::order::TreeError;
use crate::ops::{document_ops, project_ops};

/// Half-height of the dead-zone band around a folder row's vertical center.
/// A pointer inside the band nests; outside it reorders beside the target.
pub const NEST_DEAD_ZONE: f32 = 10.0;

/// What kind of item a drag gesture is carrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Project,
    Folder,
    Document,
}

/// What kind of row the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    ProjectCard,
    FolderRow,
    DocumentCard,
}

/// Geometry of a rendered row, in whatever pixel space the shell uses.
/// The controller only ever compares the pointer against top/height.
#[derive(Debug, Clone, Copy)]
pub struct RowBox {
    pub kind: RowKind,
    pub id: u64,
    pub top: f32,
    pub height: f32,
}

impl RowBox {
    fn midpoint(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Where a drop would land relative to the hovered row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropHint {
    Before,
    After,
    /// Document into a folder, or folder nested under a folder
    Into,
}

/// Explicit drop regions outside the rows themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// End of a folder's document list (None = project top level)
    FolderEnd(Option<u64>),
}

/// Hover indicator the shell renders (border above/below or nest outline)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub row: RowKind,
    pub row_id: u64,
    pub hint: DropHint,
}

/// Result of a drop, for the caller to persist and/or toast on
#[derive(Debug)]
pub enum DropOutcome {
    /// One store mutation fired; persist now
    Moved,
    /// Self-drop or irrelevant target; nothing changed
    Ignored,
    /// Illegal move; state unchanged, message for the user
    Rejected(TreeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging { kind: DragKind, id: u64 },
}

/// Interprets one pointer-driven drag gesture at a time into exactly one
/// tree mutation. Holds the transient visual state (dimmed source row,
/// hover indicator) that the shell renders; both are unconditionally
/// cleared when the gesture ends, whatever path it ends through.
#[derive(Debug)]
pub struct DragController {
    state: DragState,
    /// Source row the shell should render dimmed while dragging
    pub dimmed: Option<(DragKind, u64)>,
    /// Current hover indicator, if any
    pub indicator: Option<Indicator>,
}

impl Default for DragController {
    fn default() -> Self {
        DragController {
            state: DragState::Idle,
            dimmed: None,
            indicator: None,
        }
    }
}

impl DragController {
    pub fn new() -> Self {
        DragController::default()
    }

    pub fn dragging(&self) -> Option<(DragKind, u64)> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { kind, id } => Some((kind, id)),
        }
    }

    /// Gesture start: capture kind + id, dim the source row
    pub fn start(&mut self, kind: DragKind, id: u64) {
        self.state = DragState::Dragging { kind, id };
        self.dimmed = Some((kind, id));
        self.indicator = None;
    }

    /// Pointer-over a candidate row. Recomputes the indicator from scratch
    /// each event (previous indicators are dropped, matching a clear-all
    /// before re-apply). Returns the hint for convenience.
    pub fn hover(&mut self, row: RowBox, pointer_y: f32) -> Option<DropHint> {
        let (kind, id) = self.dragging()?;
        self.indicator = None;

        let hint = match (kind, row.kind) {
            // Document over a folder row: drop into the folder, no split
            (DragKind::Document, RowKind::FolderRow) => DropHint::Into,
            (DragKind::Document, RowKind::DocumentCard) => before_after(row, pointer_y),
            // Folder over folder: dead-zone band nests, otherwise reorder
            (DragKind::Folder, RowKind::FolderRow) => {
                if id == row.id {
                    return None;
                }
                if (pointer_y - row.midpoint()).abs() <= NEST_DEAD_ZONE {
                    DropHint::Into
                } else {
                    before_after(row, pointer_y)
                }
            }
            (DragKind::Project, RowKind::ProjectCard) => {
                if id == row.id {
                    return None;
                }
                before_after(row, pointer_y)
            }
            // Anything else is not a drop target for this drag kind
            _ => return None,
        };

        self.indicator = Some(Indicator {
            row: row.kind,
            row_id: row.id,
            hint,
        });
        Some(hint)
    }

    /// Drop on a row. Fires at most one store mutation, then always clears
    /// the gesture's visual state, even when the mutation is rejected, so
    /// a failed drop can never leave a stuck dimmed row.
    pub fn drop_on_row(&mut self, store: &mut Store, row: RowBox, pointer_y: f32) -> DropOutcome {
        let outcome = match self.dragging() {
            // Drop arriving after a cancel already cleared state
            None => DropOutcome::Ignored,
            Some((kind, id)) => apply_row_drop(store, kind, id, row, pointer_y),
        };
        self.end();
        outcome
    }

    /// Drop on an explicit zone (end of a folder's list)
    pub fn drop_on_zone(&mut self, store: &mut Store, zone: DropZone) -> DropOutcome {
        let outcome = match self.dragging() {
            None => DropOutcome::Ignored,
            Some((kind, id)) => apply_zone_drop(store, kind, id, zone),
        };
        self.end();
        outcome
    }

    /// Cancel (escape, pointer released off-target). Same cleanup as drop.
    pub fn cancel(&mut self) {
        self.end();
    }

    fn end(&mut self) {
        self.state = DragState::Idle;
        self.dimmed = None;
        self.indicator = None;
    }
}

fn before_after(row: RowBox, pointer_y: f32) -> DropHint {
    if pointer_y < row.midpoint() {
        DropHint::Before
    } else {
        DropHint::After
    }
}

fn apply_row_drop(
    store: &mut Store,
    kind: DragKind,
    id: u64,
    row: RowBox,
    pointer_y: f32,
) -> DropOutcome {
    match (kind, row.kind) {
        (DragKind::Document, RowKind::FolderRow) => {
            match document_ops::move_document_to_folder(store, id, Some(row.id)) {
                Ok(()) => DropOutcome::Moved,
                Err(e) => DropOutcome::Rejected(e),
            }
        }
        (DragKind::Document, RowKind::DocumentCard) => {
            if row.id == id {
                return DropOutcome::Ignored;
            }
            let Some(target) = store.document(row.id) else {
                return DropOutcome::Ignored;
            };
            let Some(dragged) = store.document(id) else {
                return DropOutcome::Ignored;
            };
            if target.project_id != dragged.project_id {
                return DropOutcome::Ignored;
            }
            let folder_id = target.folder_id;
            let project_id = target.project_id;
            let index = insert_index(
                &store
                    .document_group(project_id, folder_id)
                    .into_iter()
                    .filter(|x| *x != id)
                    .collect::<Vec<_>>(),
                row.id,
                before_after(row, pointer_y),
            );
            match document_ops::reorder_document(store, id, folder_id, index) {
                Ok(()) => DropOutcome::Moved,
                Err(e) => DropOutcome::Rejected(e),
            }
        }
        (DragKind::Folder, RowKind::FolderRow) => {
            if row.id == id {
                return DropOutcome::Ignored;
            }
            // Check before any state changes; surfaced to the user as a toast
            if is_descendant(store, row.id, id) {
                return DropOutcome::Rejected(TreeError::Cycle);
            }
            let Some(target) = store.folder(row.id) else {
                return DropOutcome::Ignored;
            };
            let parent_id = target.parent_id;
            let project_id = target.project_id;

            if (pointer_y - row.midpoint()).abs() <= NEST_DEAD_ZONE {
                match folder_ops::reparent_folder(store, id, Some(row.id)) {
                    Ok(()) => DropOutcome::Moved,
                    Err(e) => DropOutcome::Rejected(e),
                }
            } else {
                let index = insert_index(
                    &store
                        .folder_group(project_id, parent_id)
                        .into_iter()
                        .filter(|x| *x != id)
                        .collect::<Vec<_>>(),
                    row.id,
                    before_after(row, pointer_y),
                );
                match folder_ops::reorder_folder(store, id, parent_id, index) {
                    Ok(()) => DropOutcome::Moved,
                    Err(e) => DropOutcome::Rejected(e),
                }
            }
        }
        (DragKind::Project, RowKind::ProjectCard) => {
            if row.id == id {
                return DropOutcome::Ignored;
            }
            let index = insert_index(
                &store
                    .project_group()
                    .into_iter()
                    .filter(|x| *x != id)
                    .collect::<Vec<_>>(),
                row.id,
                before_after(row, pointer_y),
            );
            match project_ops::reorder_project(store, id, index) {
                Ok(()) => DropOutcome::Moved,
                Err(e) => DropOutcome::Rejected(e),
            }
        }
        _ => DropOutcome::Ignored,
    }
}

fn apply_zone_drop(store: &mut Store, kind: DragKind, id: u64, zone: DropZone) -> DropOutcome {
    let DropZone::FolderEnd(folder_id) = zone;
    match kind {
        DragKind::Document => match document_ops::move_document_to_folder(store, id, folder_id) {
            Ok(()) => DropOutcome::Moved,
            Err(e) => DropOutcome::Rejected(e),
        },
        DragKind::Folder => {
            if folder_id == Some(id) {
                return DropOutcome::Ignored;
            }
            if let Some(target) = folder_id {
                if is_descendant(store, target, id) {
                    return DropOutcome::Rejected(TreeError::Cycle);
                }
            }
            match folder_ops::reparent_folder(store, id, folder_id) {
                Ok(()) => DropOutcome::Moved,
                Err(e) => DropOutcome::Rejected(e),
            }
        }
        DragKind::Project => DropOutcome::Ignored,
    }
}

/// Index to insert at, given the target group with the dragged item already
/// filtered out: before = the target's slot, after = one past it.
fn insert_index(group: &[u64], target_id: u64, hint: DropHint) -> usize {
    let pos = group
        .iter()
        .position(|id| *id == target_id)
        .unwrap_or(group.len());
    match hint {
        DropHint::Before => pos,
        _ => pos + 1,
    }
}
