//! Workspace index behavior observed through the session manager.

use rstest::rstest;
use svindex::syntax::DeclKind;

use crate::helpers::source_fixtures::*;
use crate::helpers::{TestWorkspace, workspace::file_name};

#[test]
fn test_top_level_modules_indexed_nested_ignored() {
    let mut ws = TestWorkspace::new(&[("a.sv", TWO_MODULES)]);
    let path = ws.path("a.sv");

    assert_eq!(ws.declaring_files("m1"), vec!["a.sv"]);
    assert_eq!(ws.declaring_files("m2"), vec!["a.sv"]);
    assert!(ws.manager.lookup_symbol("nested").is_empty());
    assert_eq!(ws.manager.modules_in_file(&path), vec!["m1", "m2"]);

    let kinds: Vec<_> = ws
        .manager
        .lookup_symbol("m1")
        .iter()
        .map(|location| location.kind)
        .collect();
    assert_eq!(kinds, vec![DeclKind::Module]);
}

#[test]
fn test_files_containing_module() {
    let mut ws = TestWorkspace::new(&[
        ("top.sv", TOP),
        ("leaf.sv", LEAF),
        ("leaf_copy.sv", LEAF),
        ("pkg.sv", ONLY_PACKAGE),
    ]);
    let mut files: Vec<String> = ws
        .manager
        .files_containing_module("leaf")
        .iter()
        .map(|path| file_name(path))
        .collect();
    files.sort();
    assert_eq!(files, vec!["leaf.sv", "leaf_copy.sv"]);
    assert!(ws.manager.files_containing_module("lonely_pkg").is_empty());
}

#[rstest]
#[case::header_only(MACRO_HEADER, "WIDTH", true)]
#[case::header_second_macro(MACRO_HEADER, "DEPTH", true)]
#[case::file_with_module(MACROS_WITH_MODULE, "LOCAL_ONLY", false)]
fn test_macros_indexed_only_without_declarations(
    #[case] source: &str,
    #[case] name: &str,
    #[case] indexed: bool,
) {
    let mut ws = TestWorkspace::new(&[("defs.svh", source)]);
    assert_eq!(!ws.manager.lookup_macro(name).is_empty(), indexed);
}

#[test]
fn test_macro_file_contributes_no_symbols() {
    let mut ws = TestWorkspace::new(&[("defs.svh", MACRO_HEADER), ("m.sv", MACROS_WITH_MODULE)]);
    assert_eq!(ws.manager.lookup_macro("WIDTH").len(), 1);
    assert_eq!(ws.declaring_files("with_macro"), vec!["m.sv"]);
    assert!(ws.manager.lookup_macro("LOCAL_ONLY").is_empty());
}

#[test]
fn test_reindexing_same_content_is_idempotent() {
    let mut ws = TestWorkspace::new(&[("a.sv", TWO_MODULES), ("top.sv", TOP)]);
    let before_files = ws.manager.index().file_count();
    let before_symbols = ws.manager.index().symbol_count();
    let before_m1 = ws.manager.lookup_symbol("m1");
    let before_refs = ws.manager.lookup_referencing_files("leaf");

    let paths = vec![ws.path("a.sv"), ws.path("top.sv")];
    ws.manager.add_documents(&paths);
    ws.manager.add_documents(&paths);

    assert_eq!(ws.manager.index().file_count(), before_files);
    assert_eq!(ws.manager.index().symbol_count(), before_symbols);
    assert_eq!(ws.manager.lookup_symbol("m1"), before_m1);
    assert_eq!(ws.manager.lookup_referencing_files("leaf"), before_refs);
}

#[test]
fn test_referencing_files() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    let refs: Vec<String> = ws
        .manager
        .lookup_referencing_files("leaf")
        .iter()
        .map(|path| file_name(path))
        .collect();
    assert_eq!(refs, vec!["top.sv"]);
    assert!(ws.manager.lookup_referencing_files("top").is_empty());
}

#[test]
fn test_remove_documents() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP), ("leaf.sv", LEAF)]);
    ws.manager.remove_documents(&[ws.path("leaf.sv")]);

    assert!(ws.manager.lookup_symbol("leaf").is_empty());
    assert_eq!(ws.declaring_files("top"), vec!["top.sv"]);
    assert_eq!(ws.manager.index().file_count(), 1);
}

#[test]
fn test_excluded_directories_not_indexed() {
    let mut ws = TestWorkspace::with_config(
        &[("rtl/top.sv", TOP), ("third_party/leaf.sv", LEAF)],
        |config| config.with_exclude_dirs(["third_party"]),
    );
    assert_eq!(ws.declaring_files("top"), vec!["top.sv"]);
    assert!(ws.manager.lookup_symbol("leaf").is_empty());
}

#[test]
fn test_workspace_symbols_case_insensitive() {
    let mut ws = TestWorkspace::new(&[("a.sv", TWO_MODULES), ("top.sv", TOP)]);
    let names: Vec<String> = ws
        .manager
        .workspace_symbols("M")
        .into_iter()
        .map(|symbol| symbol.name.to_string())
        .collect();
    assert_eq!(names, vec!["m1", "m2"]);
    assert_eq!(ws.manager.workspace_symbols("").len(), 3);
}

#[test]
fn test_indexing_completes_before_queries() {
    let mut ws = TestWorkspace::new(&[("top.sv", TOP)]);
    for i in 0..8 {
        ws.write(&format!("gen/m{i}.sv"), &format!("module gen_{i};\nendmodule\n"));
    }
    ws.manager.start_indexing();
    assert_eq!(ws.declaring_files("gen_7"), vec!["m7.sv"]);
    assert!(!ws.manager.is_indexing());
    assert_eq!(ws.manager.index().file_count(), 9);
}
