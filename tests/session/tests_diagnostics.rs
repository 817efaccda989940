//! What the client is shown, and when it is told to forget it.

use svindex::TextChange;
use svindex::hir::codes;

use crate::helpers::TestWorkspace;
use crate::helpers::source_fixtures::*;

#[test]
fn test_explore_reports_open_document() {
    let mut ws = TestWorkspace::new(&[("broken.sv", BROKEN)]);
    let broken = ws.open("broken.sv");

    let diagnostics = ws.client.last_for(&broken).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::UNRESOLVED_REFERENCE));
    assert!(diagnostics[0].message.contains("ghost"));
}

#[test]
fn test_explore_resolves_through_index() {
    let mut ws = TestWorkspace::new(&[
        ("top.sv", TOP),
        ("leaf.sv", LEAF),
        ("pkg_top.sv", USES_PKG_A),
        ("a_pkg.sv", PKG_A),
        ("b_pkg.sv", PKG_B),
    ]);
    let top = ws.open("top.sv");
    let pkg_top = ws.open("pkg_top.sv");
    assert!(ws.manager.diagnostics(&top).is_empty());
    assert!(ws.manager.diagnostics(&pkg_top).is_empty());
    assert!(ws.client.counts_for(&ws.path("leaf.sv")).is_empty());
}

#[test]
fn test_fixing_error_publishes_empty() {
    let mut ws = TestWorkspace::new(&[("broken.sv", BROKEN)]);
    let broken = ws.open("broken.sv");
    ws.manager
        .did_change(&broken, &[TextChange::full("module broken;\nendmodule\n")])
        .unwrap();

    assert_eq!(ws.client.counts_for(&broken), vec![1, 0]);
    assert!(ws.manager.diagnostics(&broken).is_empty());
}

#[test]
fn test_explore_close_clears_diagnostics() {
    let mut ws = TestWorkspace::new(&[("broken.sv", BROKEN)]);
    let broken = ws.open("broken.sv");
    ws.manager.did_close(&broken);

    assert_eq!(ws.client.counts_for(&broken), vec![1, 0]);
}

#[test]
fn test_explore_to_top_level_clears_stale_diagnostics() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF), ("broken.sv", BROKEN)]);
    let broken = ws.open("broken.sv");
    ws.client.take();

    ws.manager.set_top_level(&ws.path("top.sv")).unwrap();

    assert_eq!(ws.client.last_for(&broken).unwrap().len(), 0);
    assert!(ws.manager.diagnostics(&broken).is_empty());
    assert_eq!(ws.client.counts_for(&broken), vec![0]);
}

#[test]
fn test_top_level_to_explore_clears_member_diagnostics() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("broken.sv", BROKEN)]);
    let top = ws.path("top.sv");
    ws.manager.set_top_level(&top).unwrap();
    assert_eq!(ws.manager.diagnostics(&top).len(), 1);
    ws.client.take();

    ws.manager.set_explore();

    assert_eq!(ws.client.counts_for(&top), vec![0]);
    assert!(ws.client.counts_for(&ws.path("broken.sv")).is_empty());
}

#[test]
fn test_explore_republishes_open_documents() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF), ("broken.sv", BROKEN)]);
    let broken = ws.open("broken.sv");
    ws.manager.set_top_level(&ws.path("top.sv")).unwrap();
    ws.client.take();

    ws.manager.set_explore();
    assert_eq!(ws.client.counts_for(&broken), vec![1]);
}

#[test]
fn test_switching_roots_clears_previous_members() {
    let mut ws = TestWorkspace::new(&[("broken.sv", BROKEN), ("top.sv", TOP), ("leaf.sv", LEAF)]);
    let broken = ws.path("broken.sv");
    ws.manager.set_top_level(&broken).unwrap();
    assert_eq!(ws.manager.diagnostics(&broken).len(), 1);
    ws.client.take();

    ws.manager.set_top_level(&ws.path("top.sv")).unwrap();
    assert_eq!(ws.client.counts_for(&broken), vec![0]);
    assert!(ws.manager.diagnostics(&broken).is_empty());
}

#[test]
fn test_each_switch_publishes_once_per_path() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF), ("broken.sv", BROKEN)]);
    ws.open("broken.sv");
    ws.client.take();

    ws.manager.set_top_level(&ws.path("top.sv")).unwrap();
    let published = ws.client.take();
    let mut paths: Vec<_> = published.iter().map(|p| p.path.clone()).collect();
    let total = paths.len();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), total);
}

#[test]
fn test_duplicate_definition_in_session() {
    let mut ws = TestWorkspace::new(&[
        ("top.sv", "module top;\n  leaf u_leaf();\nendmodule\nmodule leaf;\nendmodule\n"),
        ("leaf.sv", LEAF),
    ]);
    let top = ws.path("top.sv");
    let build = ws.write("design.f", "top.sv\nleaf.sv\n");
    ws.manager.set_build_file(&build).unwrap();

    let diagnostics = ws.manager.diagnostics(&ws.path("leaf.sv"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::DUPLICATE_DEFINITION));
    assert!(ws.manager.diagnostics(&top).is_empty());
}

#[test]
fn test_build_file_save_republishes_every_member() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    let top = ws.path("top.sv");
    let build = ws.write("design.f", "top.sv\nleaf.sv\n");
    ws.manager.set_build_file(&build).unwrap();
    let leaf = ws.open("leaf.sv");
    ws.manager
        .did_change(&leaf, &[TextChange::full("module renamed;\nendmodule\n")])
        .unwrap();
    assert_eq!(ws.manager.diagnostics(&top).len(), 1);
    ws.client.take();

    ws.manager.did_save(&leaf, None).unwrap();

    assert_eq!(ws.client.counts_for(&top), vec![1]);
    assert_eq!(ws.client.counts_for(&leaf), vec![0]);
    assert_eq!(ws.manager.diagnostics(&top)[0].code, Some(codes::UNRESOLVED_REFERENCE));
}

#[test]
fn test_explore_save_republishes_only_saved_document() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF), ("broken.sv", BROKEN)]);
    ws.open("top.sv");
    let broken = ws.open("broken.sv");
    ws.client.take();

    ws.manager.did_save(&broken, None).unwrap();

    let published: Vec<_> = ws.client.take().into_iter().map(|p| p.path).collect();
    assert_eq!(published, vec![broken.clone()]);
    assert_eq!(ws.manager.diagnostics(&broken).len(), 1);
}
