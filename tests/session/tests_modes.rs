//! Switching between explore, top-level and build-file sessions.

use rstest::rstest;
use svindex::session::{DocumentState, SessionError};
use svindex::{SessionMode, TextChange};

use crate::helpers::source_fixtures::*;
use crate::helpers::{TestWorkspace, workspace::file_name};

fn member_names(ws: &TestWorkspace) -> Vec<String> {
    ws.manager
        .active_session()
        .members()
        .map(|doc| file_name(doc.path()))
        .collect()
}

#[test]
fn test_top_level_collects_dependencies() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF), ("broken.sv", BROKEN)]);
    let top = ws.path("top.sv");
    ws.manager.set_top_level(&top).unwrap();

    let session = ws.manager.active_session();
    assert!(session.is_full());
    match session.mode() {
        SessionMode::TopLevel { root, top: name } => {
            assert_eq!(*root, ws.manager.interner().get(&top).unwrap());
            assert_eq!(name, "top");
        }
        other => panic!("expected top-level mode, got {other:?}"),
    }
    assert_eq!(member_names(&ws), vec!["top.sv", "leaf.sv"]);
    assert!(ws.manager.diagnostics(&top).is_empty());
}

#[test]
fn test_top_level_package_cycle_terminates() {
    let mut ws = TestWorkspace::new(&[
        ("pkg_top.sv", USES_PKG_A),
        ("a_pkg.sv", PKG_A),
        ("b_pkg.sv", PKG_B),
    ]);
    let root = ws.path("pkg_top.sv");
    ws.manager.set_top_level(&root).unwrap();

    assert_eq!(member_names(&ws), vec!["pkg_top.sv", "a_pkg.sv", "b_pkg.sv"]);
    assert!(ws.manager.diagnostics(&root).is_empty());
}

#[rstest]
#[case::all_instantiated(MUTUAL)]
#[case::package_only(ONLY_PACKAGE)]
fn test_top_level_without_top_module_falls_back(#[case] source: &str) {
    let mut ws = TestWorkspace::new(&[("root.sv", source), ("top.sv", TOP)]);
    let top = ws.path("top.sv");
    ws.manager.set_top_level(&top).unwrap();

    let err = ws.manager.set_top_level(&ws.path("root.sv")).unwrap_err();
    assert!(matches!(err, SessionError::NoTopModules(_)));
    assert_eq!(ws.manager.active_session().mode(), &SessionMode::Explore);
    assert!(ws.manager.active_session().is_empty());
}

#[test]
fn test_top_level_missing_file_falls_back() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    let err = ws
        .manager
        .set_top_level(&ws.path("does_not_exist.sv"))
        .unwrap_err();
    assert!(matches!(err, SessionError::FrontEnd(_)));
    assert_eq!(ws.manager.active_session().mode(), &SessionMode::Explore);
}

#[test]
fn test_top_level_change_reelaborates_before_save() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    let top = ws.open("top.sv");
    ws.manager.set_top_level(&top).unwrap();

    let edited = format!("{TOP}module other;\n  ghost u_ghost();\nendmodule\n");
    ws.manager.did_change(&top, &[TextChange::full(edited)]).unwrap();
    assert_eq!(ws.manager.diagnostics(&top).len(), 1);
    assert!(ws.manager.lookup_symbol("other").is_empty());
}

#[test]
fn test_top_level_save_resolves_new_dependencies() {
    let mut ws = TestWorkspace::new(&[
        ("top.sv", TOP),
        ("leaf.sv", LEAF),
        ("extra.sv", "module extra;\nendmodule\n"),
    ]);
    let top = ws.open("top.sv");
    ws.manager.set_top_level(&top).unwrap();
    assert_eq!(ws.manager.active_session().len(), 2);

    let edited = "module top;\n  leaf u_leaf();\n  extra u_extra();\nendmodule\n";
    ws.manager.did_change(&top, &[TextChange::full(edited)]).unwrap();
    assert_eq!(ws.manager.diagnostics(&top).len(), 1);

    ws.manager.did_save(&top, None).unwrap();
    assert_eq!(member_names(&ws), vec!["top.sv", "leaf.sv", "extra.sv"]);
    assert!(ws.manager.diagnostics(&top).is_empty());
}

#[test]
fn test_build_file_mode() {
    let mut ws = TestWorkspace::new(&[
        ("rtl/top.sv", TOP),
        ("rtl/leaf.sv", LEAF),
        ("rtl/broken.sv", BROKEN),
    ]);
    let build = ws.write(
        "design.f",
        "// design sources\n+incdir+include\n-D SIM\nrtl/leaf.sv\nrtl/top.sv\n",
    );
    ws.manager.set_build_file(&build).unwrap();

    match ws.manager.active_session().mode() {
        SessionMode::BuildFile { build_file, files } => {
            assert_eq!(build_file, &build);
            assert_eq!(files.len(), 2);
        }
        other => panic!("expected build-file mode, got {other:?}"),
    }
    assert_eq!(member_names(&ws), vec!["leaf.sv", "top.sv"]);
    assert!(ws.manager.diagnostics(&ws.path("rtl/top.sv")).is_empty());
}

#[test]
fn test_build_file_skips_missing_entries() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    let build = ws.write("design.f", "top.sv\nmissing.sv\n");
    ws.manager.set_build_file(&build).unwrap();

    assert_eq!(member_names(&ws), vec!["top.sv"]);
    assert_eq!(ws.manager.diagnostics(&ws.path("top.sv")).len(), 1);
}

#[test]
fn test_missing_build_file_falls_back() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    let top = ws.path("top.sv");
    ws.manager.set_top_level(&top).unwrap();

    let err = ws
        .manager
        .set_build_file(&ws.path("missing.f"))
        .unwrap_err();
    assert!(matches!(err, SessionError::BuildFile(_)));
    assert_eq!(ws.manager.active_session().mode(), &SessionMode::Explore);
}

#[test]
fn test_initialize_enters_configured_build_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    std::fs::write(root.join("top.sv"), TOP).unwrap();
    std::fs::write(root.join("leaf.sv"), LEAF).unwrap();
    std::fs::write(root.join("design.f"), "top.sv leaf.sv\n").unwrap();

    let mut ws = TestWorkspace::with_config(&[], |config| {
        config
            .with_index_globs([format!("{}/**/*.sv", root.display())])
            .with_build_file(root.join("design.f"))
    });
    ws.manager.initialize().unwrap();

    assert!(matches!(
        ws.manager.active_session().mode(),
        SessionMode::BuildFile { .. }
    ));
    assert_eq!(member_names(&ws), vec!["top.sv", "leaf.sv"]);
}

#[test]
fn test_mode_switch_keeps_unsaved_edits() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF), ("broken.sv", BROKEN)]);
    let broken = ws.open("broken.sv");
    let fixed = "module broken;\nendmodule\n";
    ws.manager.did_change(&broken, &[TextChange::full(fixed)]).unwrap();

    ws.manager.set_top_level(&ws.path("top.sv")).unwrap();
    ws.manager.set_explore();

    assert_eq!(ws.manager.document_state(&broken), DocumentState::Open);
    let document = ws.manager.get_document(&broken).unwrap();
    assert_eq!(document.text(), fixed);
    assert!(document.is_dirty());
    assert!(ws.manager.diagnostics(&broken).is_empty());
}

#[test]
fn test_unsaved_member_edits_used_by_top_level() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    let top = ws.open("top.sv");
    let edited = "module top;\n  leaf u_leaf();\n  ghost u_ghost();\nendmodule\n";
    ws.manager.did_change(&top, &[TextChange::full(edited)]).unwrap();

    ws.manager.set_top_level(&top).unwrap();
    let top_id = ws.manager.interner().get(&top).unwrap();
    let member = ws.manager.active_session().member(top_id).unwrap();
    assert_eq!(member.text(), edited);
    assert_eq!(ws.manager.diagnostics(&top).len(), 1);
}
