//! External file-system changes reported by the editor's watcher.

use svindex::FileEvent;
use svindex::session::DocumentState;

use crate::helpers::TestWorkspace;
use crate::helpers::source_fixtures::*;

#[test]
fn test_created_file_indexed() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    let leaf = ws.write("leaf.sv", LEAF);
    assert!(ws.manager.lookup_symbol("leaf").is_empty());

    ws.manager.did_change_watched_files(&[FileEvent::created(&leaf)]);
    assert_eq!(ws.declaring_files("leaf"), vec!["leaf.sv"]);
}

#[test]
fn test_created_non_source_file_ignored() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    let notes = ws.write("notes.txt", "module not_source; endmodule\n");
    ws.manager.did_change_watched_files(&[FileEvent::created(&notes)]);
    assert!(ws.manager.lookup_symbol("not_source").is_empty());
}

#[test]
fn test_changed_file_reindexed() {
    let mut ws = TestWorkspace::new(&[("leaf.sv", LEAF)]);
    let path = ws.write("leaf.sv", "module renamed_leaf;\nendmodule\n");
    ws.manager.did_change_watched_files(&[FileEvent::changed(&path)]);

    assert!(ws.manager.lookup_symbol("leaf").is_empty());
    assert_eq!(ws.declaring_files("renamed_leaf"), vec!["leaf.sv"]);
}

#[test]
fn test_changed_open_document_ignored() {
    let mut ws = TestWorkspace::new(&[("leaf.sv", LEAF)]);
    let path = ws.open("leaf.sv");
    ws.write("leaf.sv", "module from_disk;\nendmodule\n");
    ws.manager.did_change_watched_files(&[FileEvent::changed(&path)]);

    assert_eq!(ws.declaring_files("leaf"), vec!["leaf.sv"]);
    assert!(ws.manager.lookup_symbol("from_disk").is_empty());
    assert_eq!(ws.manager.get_document(&path).unwrap().text(), LEAF);
}

#[test]
fn test_deleted_file_removed() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    let path = ws.path("leaf.sv");
    std::fs::remove_file(&path).unwrap();
    ws.manager.did_change_watched_files(&[FileEvent::deleted(&path)]);

    assert!(ws.manager.lookup_symbol("leaf").is_empty());
    assert_eq!(ws.manager.document_state(&path), DocumentState::Unknown);
    assert_eq!(ws.manager.index().file_count(), 1);
}

#[test]
fn test_deleted_member_refreshes_session() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    let top = ws.path("top.sv");
    let leaf = ws.path("leaf.sv");
    ws.manager.set_top_level(&top).unwrap();
    assert!(ws.manager.diagnostics(&top).is_empty());
    assert_eq!(ws.manager.active_session().len(), 2);

    std::fs::remove_file(&leaf).unwrap();
    ws.manager.did_change_watched_files(&[FileEvent::deleted(&leaf)]);

    assert_eq!(ws.manager.active_session().len(), 1);
    let diagnostics = ws.client.last_for(&top).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("leaf"));
}

#[test]
fn test_changed_member_reloaded() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    let top = ws.path("top.sv");
    ws.manager.set_top_level(&top).unwrap();

    let leaf = ws.write("leaf.sv", "module leaf;\n  ghost u_ghost();\nendmodule\n");
    ws.manager.did_change_watched_files(&[FileEvent::changed(&leaf)]);

    assert_eq!(ws.manager.active_session().len(), 2);
    assert_eq!(ws.manager.diagnostics(&leaf).len(), 1);
    assert!(ws.manager.diagnostics(&top).is_empty());
}

#[test]
fn test_changed_file_with_other_extension_reindexed() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    let props = ws.write("props.sva", "module old_name;\nendmodule\n");
    ws.manager.add_documents(std::slice::from_ref(&props));
    assert_eq!(ws.declaring_files("old_name"), vec!["props.sva"]);

    ws.write("props.sva", "module new_name;\nendmodule\n");
    ws.manager.did_change_watched_files(&[FileEvent::changed(&props)]);

    assert!(ws.manager.lookup_symbol("old_name").is_empty());
    assert_eq!(ws.declaring_files("new_name"), vec!["props.sva"]);
}

#[test]
fn test_changed_unreadable_file_drops_record() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    let leaf = ws.path("leaf.sv");
    std::fs::remove_file(&leaf).unwrap();
    ws.manager.did_change_watched_files(&[FileEvent::changed(&leaf)]);

    assert!(ws.manager.lookup_symbol("leaf").is_empty());
    assert_eq!(ws.manager.index().file_count(), 1);
}

#[cfg(unix)]
#[test]
fn test_deleted_through_symlinked_directory() {
    let mut ws = TestWorkspace::new(&[("real/top.sv", TOP), ("real/leaf.sv", LEAF)]);
    std::os::unix::fs::symlink(ws.path("real"), ws.path("link")).unwrap();
    let via_link = ws.path("link/leaf.sv");
    ws.manager.add_documents(std::slice::from_ref(&via_link));
    assert_eq!(ws.manager.index().file_count(), 2);

    std::fs::remove_file(&via_link).unwrap();
    ws.manager.did_change_watched_files(&[FileEvent::deleted(&via_link)]);

    assert!(ws.manager.lookup_symbol("leaf").is_empty());
    assert_eq!(ws.manager.index().file_count(), 1);
}
