use compact_str::CompactString;
use sql_param_lint::{
    fix::{EditOp, EditScript, Fix, apply_fix},
    syntax::{Arg, NodeId, SyntaxTree, TreeBuilder}
};

fn chain_tree() -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new();
    let class = b.class("UserDao");
    let method = b.method(class, "findUser", &[]);
    let site = b
        .chain("db")
        .call("statement", vec![Arg::str("users/find.sql")])
        .call("param", vec![Arg::str("region"), Arg::ident("region")])
        .call("queryList", vec![])
        .attach(method);
    (b.finish(), site)
}

fn find_call(tree: &SyntaxTree, method: &str) -> NodeId {
    tree.calls()
        .find(|&c| tree.method_name(c) == Some(method))
        .unwrap()
}

#[test]
fn test_rename_replaces_literal_text() {
    let (mut tree, _) = chain_tree();
    let param = find_call(&tree, "param");
    let literal = tree.argument_at(param, 0).unwrap();
    assert_eq!(tree.name(literal), "region");

    let fix = Fix::rename(literal, "id");
    assert_eq!(fix.label, "id");
    assert!(apply_fix(&mut tree, &fix));
    assert_eq!(tree.name(literal), "id");
    assert!(tree.validate().is_ok());
}

#[test]
fn test_remove_param_splices_chain() {
    let (mut tree, site) = chain_tree();
    let param = find_call(&tree, "param");

    let fix = Fix::remove_param(param, "region");
    assert_eq!(fix.label, "Remove redundant region");
    assert!(apply_fix(&mut tree, &fix));

    // The surviving chain skips the removed link.
    assert_eq!(tree.chain_names(site), vec!["queryList", "statement", "db"]);
    assert!(tree.validate().is_ok());
}

#[test]
fn test_remove_same_link_twice_fails_second_time() {
    let (mut tree, _) = chain_tree();
    let param = find_call(&tree, "param");

    let fix = Fix::remove_param(param, "region");
    assert!(apply_fix(&mut tree, &fix));
    assert!(!apply_fix(&mut tree, &fix));
}

#[test]
fn test_rename_on_non_literal_is_rejected() {
    let (mut tree, site) = chain_tree();
    let before = tree.name(site).to_string();

    let fix = Fix::rename(site, "id");
    assert!(!apply_fix(&mut tree, &fix));
    assert_eq!(tree.name(site), before);
}

#[test]
fn test_rename_on_missing_node_is_rejected() {
    let (mut tree, _) = chain_tree();
    let fix = Fix::rename(NodeId(9999), "id");
    assert!(!apply_fix(&mut tree, &fix));
}

#[test]
fn test_remove_on_non_param_link_is_rejected() {
    let (mut tree, site) = chain_tree();
    let fix = Fix::remove_param(site, "queryList");
    assert!(!apply_fix(&mut tree, &fix));
    assert_eq!(
        tree.chain_names(site),
        vec!["queryList", "param", "statement", "db"]
    );
}

#[test]
fn test_script_applies_all_or_nothing() {
    let (mut tree, _) = chain_tree();
    let param = find_call(&tree, "param");
    let literal = tree.argument_at(param, 0).unwrap();

    // Second op targets the literal instead of a call, so the whole
    // script must be rejected and the valid first op rolled off too.
    let script = EditScript::new(vec![
        EditOp::ReplaceLiteral {
            node: literal,
            text: CompactString::from("id")
        },
        EditOp::RemoveChainLink { call: literal },
    ]);

    assert!(script.apply(&mut tree).is_err());
    assert_eq!(tree.name(literal), "region");
}
