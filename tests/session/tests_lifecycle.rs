//! Open, change, save and close as the editor drives them.

use std::path::Path;

use svindex::session::{DocumentState, SessionError};
use svindex::{SessionMode, TextChange};

use crate::helpers::TestWorkspace;
use crate::helpers::source_fixtures::*;

const RENAMED: &str = "module m3;\nendmodule\n";

#[test]
fn test_unsaved_edits_invisible_to_index() {
    let mut ws = TestWorkspace::new(&[("a.sv", TWO_MODULES)]);
    let path = ws.open("a.sv");
    ws.manager
        .did_change(&path, &[TextChange::full(RENAMED)])
        .unwrap();

    assert_eq!(ws.declaring_files("m1"), vec!["a.sv"]);
    assert_eq!(ws.declaring_files("m2"), vec!["a.sv"]);
    assert!(ws.manager.lookup_symbol("m3").is_empty());
    assert!(ws.manager.get_document(&path).unwrap().is_dirty());
}

#[test]
fn test_save_replaces_indexed_symbols() {
    let mut ws = TestWorkspace::new(&[("a.sv", TWO_MODULES)]);
    let path = ws.open("a.sv");
    ws.manager
        .did_change(&path, &[TextChange::full(RENAMED)])
        .unwrap();
    ws.manager.did_save(&path, None).unwrap();

    assert!(ws.manager.lookup_symbol("m1").is_empty());
    assert!(ws.manager.lookup_symbol("m2").is_empty());
    assert_eq!(ws.declaring_files("m3"), vec!["a.sv"]);
    assert!(!ws.manager.get_document(&path).unwrap().is_dirty());
}

#[test]
fn test_save_of_new_file_indexes_it() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    let path = ws.path("scratch.sv");
    ws.manager.did_open(&path, LEAF);
    assert!(ws.manager.lookup_symbol("leaf").is_empty());

    ws.manager.did_save(&path, None).unwrap();
    assert_eq!(ws.declaring_files("leaf"), vec!["scratch.sv"]);
}

#[cfg(unix)]
#[test]
fn test_save_of_new_file_through_symlinked_directory() {
    let mut ws = TestWorkspace::new(&[("real/top.sv", TOP)]);
    std::os::unix::fs::symlink(ws.path("real"), ws.path("link")).unwrap();
    let path = ws.path("link/new.sv");
    ws.manager.did_open(&path, LEAF);

    ws.write("link/new.sv", LEAF);
    ws.manager.did_save(&path, None).unwrap();

    assert_eq!(ws.declaring_files("leaf"), vec!["new.sv"]);
    assert_eq!(
        ws.manager.document_state(&ws.path("real/new.sv")),
        DocumentState::Open
    );
}

#[test]
fn test_save_of_new_file_with_relative_path() {
    let dir = tempfile::Builder::new()
        .prefix("svindex-rel")
        .tempdir_in(".")
        .unwrap();
    let relative = Path::new(dir.path().file_name().unwrap()).join("rel.sv");
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    ws.manager.did_open(&relative, LEAF);

    std::fs::write(&relative, LEAF).unwrap();
    ws.manager.did_save(&relative, None).unwrap();

    assert_eq!(ws.declaring_files("leaf"), vec!["rel.sv"]);
    assert_eq!(ws.manager.document_state(&relative), DocumentState::Open);
}

#[test]
fn test_save_with_mismatched_text_uses_editor_copy() {
    let mut ws = TestWorkspace::new(&[("a.sv", TWO_MODULES)]);
    let path = ws.open("a.sv");
    ws.manager.did_save(&path, Some(RENAMED)).unwrap();

    let document = ws.manager.get_document(&path).unwrap();
    assert_eq!(document.text(), RENAMED);
    assert!(!document.is_dirty());
    assert_eq!(ws.declaring_files("m3"), vec!["a.sv"]);
    assert!(ws.manager.lookup_symbol("m1").is_empty());
}

#[test]
fn test_close_keeps_saved_history() {
    let mut ws = TestWorkspace::new(&[("a.sv", TWO_MODULES)]);
    let path = ws.open("a.sv");
    ws.manager
        .did_change(&path, &[TextChange::full(RENAMED)])
        .unwrap();
    ws.manager.did_save(&path, None).unwrap();
    ws.manager.did_close(&path);

    assert_eq!(ws.manager.document_state(&path), DocumentState::Known);
    assert_eq!(ws.manager.get_document(&path).unwrap().text(), RENAMED);
    assert_eq!(ws.declaring_files("m3"), vec!["a.sv"]);

    ws.manager.did_open(&path, RENAMED);
    assert_eq!(ws.manager.document_state(&path), DocumentState::Open);
    assert!(!ws.manager.get_document(&path).unwrap().is_dirty());
}

#[test]
fn test_change_unknown_document_errors() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    let path = ws.path("never_opened.sv");
    let err = ws
        .manager
        .did_change(&path, &[TextChange::full(LEAF)])
        .unwrap_err();
    assert!(matches!(err, SessionError::DocumentNotFound(_)));
    assert!(matches!(
        ws.manager.did_save(&path, None),
        Err(SessionError::DocumentNotFound(_))
    ));
}

#[test]
fn test_document_state_transitions() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    let top = ws.path("top.sv");
    assert_eq!(ws.manager.document_state(&top), DocumentState::Known);
    assert_eq!(
        ws.manager.document_state(&ws.path("missing.sv")),
        DocumentState::Unknown
    );

    ws.open("top.sv");
    assert_eq!(ws.manager.document_state(&top), DocumentState::Open);
    ws.manager.did_close(&top);
    assert_eq!(ws.manager.document_state(&top), DocumentState::Known);
}

#[test]
fn test_open_documents_start_in_explore() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    let top = ws.open("top.sv");
    assert_eq!(ws.manager.active_session().mode(), &SessionMode::Explore);
    assert!(ws.manager.active_session().is_empty());
    assert!(ws.manager.diagnostics(&top).is_empty());
}
