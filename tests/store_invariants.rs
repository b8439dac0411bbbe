use folio::io::blob::{load_store, save_store};
use folio::io::vault::Base64Armor;
use folio::model::document::DocKind;
use folio::model::store::{GroupKey, Store};
use folio::ops::document_ops::{
    self, DocumentFields, create_document, duplicate_document, reorder_document, save_content,
};
use folio::ops::drag::{DragController, DragKind, DropOutcome, RowBox, RowKind};
use folio::ops::folder_ops::{create_folder, delete_folder, reparent_folder};
use folio::ops::order::{TreeError, is_dense};
use folio::ops::project_ops::{ProjectFields, create_project};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn seeded_store() -> (Store, u64, Vec<u64>) {
    let mut store = Store::new();
    let pid = create_project(
        &mut store,
        ProjectFields {
            title: "Novel".into(),
            ..Default::default()
        },
    )
    .unwrap();
    let mut docs = Vec::new();
    for title in ["One", "Two", "Three", "Four"] {
        docs.push(
            create_document(
                &mut store,
                pid,
                None,
                DocumentFields {
                    title: title.into(),
                    kind: DocKind::Chapter,
                },
            )
            .unwrap(),
        );
    }
    (store, pid, docs)
}

fn doc_key(pid: u64, folder: Option<u64>) -> GroupKey {
    GroupKey::Documents {
        project_id: pid,
        folder_id: folder,
    }
}

// ---------------------------------------------------------------------------
// Sibling-order density
// ---------------------------------------------------------------------------

#[test]
fn orders_stay_dense_across_a_burst_of_mutations() {
    let (mut store, pid, docs) = seeded_store();
    let folder = create_folder(&mut store, pid, "Part I", None).unwrap();

    reorder_document(&mut store, docs[3], None, 0).unwrap();
    document_ops::move_document_to_folder(&mut store, docs[0], Some(folder)).unwrap();
    duplicate_document(&mut store, docs[1]).unwrap();
    document_ops::delete_document(&mut store, docs[2]).unwrap();
    reorder_document(&mut store, docs[1], Some(folder), 0).unwrap();

    assert!(is_dense(&store, doc_key(pid, None)));
    assert!(is_dense(&store, doc_key(pid, Some(folder))));
    assert!(is_dense(
        &store,
        GroupKey::Folders {
            project_id: pid,
            parent_id: None
        }
    ));
}

#[test]
fn duplicate_half_increment_heals_to_consecutive_integers() {
    let (mut store, pid, docs) = seeded_store();
    let copy = duplicate_document(&mut store, docs[1]).unwrap();

    // Copy sits immediately after the original, orders back to 0..N-1
    let group = store.document_group(pid, None);
    assert_eq!(group, vec![docs[0], docs[1], copy, docs[2], docs[3]]);
    let orders: Vec<f64> = group
        .iter()
        .map(|id| store.document(*id).unwrap().order)
        .collect();
    assert_eq!(orders, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

// ---------------------------------------------------------------------------
// Folder acyclicity and deletion
// ---------------------------------------------------------------------------

#[test]
fn no_folder_is_ever_its_own_ancestor() {
    let (mut store, pid, _) = seeded_store();
    let a = create_folder(&mut store, pid, "A", None).unwrap();
    let b = create_folder(&mut store, pid, "B", Some(a)).unwrap();
    let c = create_folder(&mut store, pid, "C", Some(b)).unwrap();

    for (folder, target) in [(a, a), (a, b), (a, c), (b, c)] {
        let before: Vec<_> = store
            .folders
            .iter()
            .map(|f| (f.id, f.parent_id, f.order))
            .collect();
        let result = reparent_folder(&mut store, folder, Some(target));
        assert!(matches!(result, Err(TreeError::Cycle)), "{folder}->{target}");
        let after: Vec<_> = store
            .folders
            .iter()
            .map(|f| (f.id, f.parent_id, f.order))
            .collect();
        assert_eq!(before, after, "tree must be unchanged after a rejected move");
    }
}

#[test]
fn deleting_a_folder_lifts_children_to_its_parent() {
    let (mut store, pid, docs) = seeded_store();
    let top = create_folder(&mut store, pid, "Part", None).unwrap();
    let mid = create_folder(&mut store, pid, "Act", Some(top)).unwrap();
    let sub = create_folder(&mut store, pid, "Scenes", Some(mid)).unwrap();
    document_ops::move_document_to_folder(&mut store, docs[0], Some(mid)).unwrap();

    delete_folder(&mut store, mid).unwrap();

    assert!(store.folder(mid).is_none());
    assert_eq!(store.document(docs[0]).unwrap().folder_id, Some(top));
    assert_eq!(store.folder(sub).unwrap().parent_id, Some(top));
    // Both survivors are still present
    assert!(store.folder(sub).is_some());
    assert!(store.document(docs[0]).is_some());
}

// ---------------------------------------------------------------------------
// Drag gestures drive the same invariants
// ---------------------------------------------------------------------------

#[test]
fn drag_reorder_sequence_keeps_groups_dense() {
    let (mut store, pid, docs) = seeded_store();
    let folder = create_folder(&mut store, pid, "Drafts", None).unwrap();
    let mut ctl = DragController::new();

    // Drag "One" into the folder
    ctl.start(DragKind::Document, docs[0]);
    let outcome = ctl.drop_on_row(
        &mut store,
        RowBox {
            kind: RowKind::FolderRow,
            id: folder,
            top: 0.0,
            height: 40.0,
        },
        20.0,
    );
    assert!(matches!(outcome, DropOutcome::Moved));

    // Drag "Four" above "Two" at top level
    ctl.start(DragKind::Document, docs[3]);
    let outcome = ctl.drop_on_row(
        &mut store,
        RowBox {
            kind: RowKind::DocumentCard,
            id: docs[1],
            top: 100.0,
            height: 40.0,
        },
        105.0,
    );
    assert!(matches!(outcome, DropOutcome::Moved));

    assert_eq!(store.document_group(pid, None), vec![docs[3], docs[1], docs[2]]);
    assert!(is_dense(&store, doc_key(pid, None)));
    assert!(is_dense(&store, doc_key(pid, Some(folder))));
}

// ---------------------------------------------------------------------------
// Persistence reflects every committed mutation
// ---------------------------------------------------------------------------

#[test]
fn mutations_survive_a_save_load_cycle() {
    let tmp = TempDir::new().unwrap();
    let cipher = Base64Armor;
    let (mut store, pid, docs) = seeded_store();

    let folder = create_folder(&mut store, pid, "Part I", None).unwrap();
    document_ops::move_document_to_folder(&mut store, docs[0], Some(folder)).unwrap();
    save_content(&mut store, docs[1], "some chapter text here").unwrap();
    let copy = duplicate_document(&mut store, docs[1]).unwrap();

    save_store(tmp.path(), &store, &cipher).unwrap();
    let loaded = load_store(tmp.path(), &cipher).unwrap();

    assert_eq!(loaded.document(docs[0]).unwrap().folder_id, Some(folder));
    assert_eq!(loaded.document(copy).unwrap().title, "Two (Copy)");
    assert_eq!(loaded.document(copy).unwrap().content, "some chapter text here");
    assert_eq!(
        loaded.document_group(pid, None),
        store.document_group(pid, None)
    );
    assert!(is_dense(&loaded, doc_key(pid, None)));

    // New ids minted after reload never collide with stored ones
    let mut loaded = loaded;
    let fresh = loaded.allocate_id();
    assert!(loaded.document(fresh).is_none());
    assert!(loaded.folder(fresh).is_none());
    assert!(loaded.project(fresh).is_none());
}
