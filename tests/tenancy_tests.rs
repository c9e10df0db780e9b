use std::collections::HashMap;

use sql_param_lint::{
    inspect::TenancyClassifier,
    project::{FileId, ModuleDef, Project, ProjectIndex, SourceFile},
    syntax::{Arg, SyntaxTree, TreeBuilder}
};

fn project(trees: Vec<SyntaxTree>) -> ProjectIndex {
    ProjectIndex::new(Project {
        modules: vec![ModuleDef {
            name:      "app".into(),
            deps:      vec![],
            resources: HashMap::new()
        }],
        files:   trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| SourceFile {
                module: "app".into(),
                path: format!("src/main/java/File{}.java", i),
                tree
            })
            .collect()
    })
}

#[test]
fn test_company_link_in_receiver_chain_is_single_tenant() {
    let mut b = TreeBuilder::new();
    let class = b.class("UserDao");
    let method = b.method(class, "find", &[]);
    let site = b
        .chain("ctx")
        .call("company", vec![])
        .call("statement", vec![Arg::str("users/find.sql")])
        .attach(method);
    let index = project(vec![b.finish()]);

    let classifier = TenancyClassifier::new(&index);
    assert!(classifier.is_single_tenant(FileId(0), site));
}

#[test]
fn test_company_call_in_ancestors_is_single_tenant() {
    let mut b = TreeBuilder::new();
    let class = b.class("UserDao");
    let method = b.method(class, "find", &[]);
    let inner = b
        .chain("db")
        .call("statement", vec![Arg::str("users/find.sql")])
        .into_expr();
    b.chain("registry")
        .call("company", vec![Arg::node(inner)])
        .attach(method);
    let index = project(vec![b.finish()]);

    let classifier = TenancyClassifier::new(&index);
    assert!(classifier.is_single_tenant(FileId(0), inner));
}

#[test]
fn test_plain_chain_is_multi_tenant() {
    let mut b = TreeBuilder::new();
    let class = b.class("UserDao");
    let method = b.method(class, "find", &[]);
    let site = b
        .chain("db")
        .call("statement", vec![Arg::str("users/find.sql")])
        .call("queryList", vec![])
        .attach(method);
    let index = project(vec![b.finish()]);

    let classifier = TenancyClassifier::new(&index);
    assert!(!classifier.is_single_tenant(FileId(0), site));
}

#[test]
fn test_parameter_root_propagates_from_single_tenant_caller() {
    // The dao method receives its statement source as a parameter; the
    // only caller passes a company-scoped argument.
    let mut dao = TreeBuilder::new();
    let class = dao.class("UserDao");
    let run = dao.method(class, "run", &["db"]);
    let site = dao
        .chain("db")
        .call("statement", vec![Arg::str("users/find.sql")])
        .attach(run);
    let dao_tree = dao.finish();

    let mut svc = TreeBuilder::new();
    let svc_class = svc.class("UserService");
    let caller = svc.method(svc_class, "loadUser", &[]);
    let arg = svc.chain("user").call("company", vec![]).into_expr();
    svc.invoke(caller, "run", vec![Arg::node(arg)]);
    let svc_tree = svc.finish();

    let index = project(vec![dao_tree, svc_tree]);
    let classifier = TenancyClassifier::new(&index);
    assert!(classifier.is_single_tenant(FileId(0), site));
}

#[test]
fn test_parameter_root_with_argless_caller_is_multi_tenant() {
    let mut dao = TreeBuilder::new();
    let class = dao.class("UserDao");
    let run = dao.method(class, "run", &["db"]);
    let site = dao
        .chain("db")
        .call("statement", vec![Arg::str("users/find.sql")])
        .attach(run);
    let dao_tree = dao.finish();

    let mut svc = TreeBuilder::new();
    let svc_class = svc.class("UserService");
    let caller = svc.method(svc_class, "loadUser", &[]);
    svc.invoke(caller, "run", vec![]);
    let svc_tree = svc.finish();

    let index = project(vec![dao_tree, svc_tree]);
    let classifier = TenancyClassifier::new(&index);
    assert!(!classifier.is_single_tenant(FileId(0), site));
}

#[test]
fn test_recursive_caller_does_not_loop_and_is_multi_tenant() {
    // `run` calls itself; the classifier must detect the revisit and
    // settle on multi-tenant instead of recursing forever.
    let mut dao = TreeBuilder::new();
    let class = dao.class("UserDao");
    let run = dao.method(class, "run", &["db"]);
    let site = dao
        .chain("db")
        .call("statement", vec![Arg::str("users/find.sql")])
        .attach(run);
    dao.invoke(run, "run", vec![Arg::ident("db")]);
    let index = project(vec![dao.finish()]);

    let classifier = TenancyClassifier::new(&index);
    assert!(!classifier.is_single_tenant(FileId(0), site));
}

#[test]
fn test_parameter_root_with_no_callers_is_single_tenant() {
    // Vacuous all-match over an empty caller set, preserved from the
    // original classification behavior.
    let mut dao = TreeBuilder::new();
    let class = dao.class("UserDao");
    let run = dao.method(class, "run", &["db"]);
    let site = dao
        .chain("db")
        .call("statement", vec![Arg::str("users/find.sql")])
        .attach(run);
    let index = project(vec![dao.finish()]);

    let classifier = TenancyClassifier::new(&index);
    assert!(classifier.is_single_tenant(FileId(0), site));
}
