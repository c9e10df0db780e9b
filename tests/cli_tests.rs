use std::{collections::HashMap, io::Write};

use assert_cmd::Command;
use predicates::prelude::*;
use sql_param_lint::{
    project::{ModuleDef, Project, SourceFile},
    syntax::{Arg, TreeBuilder}
};

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("sql-param-lint").unwrap();
    cmd.env_remove("SQL_PARAM_LINT_DISABLED");
    cmd.env_remove("SQL_PARAM_LINT_FORMAT");
    cmd
}

fn snapshot(sql: Option<&str>, param_name: &str) -> String {
    let mut b = TreeBuilder::new();
    let class = b.class("UserDao");
    let method = b.method(class, "queryUser", &[]);
    b.chain("db")
        .call("statement", vec![Arg::str("users/find.sql")])
        .call("param", vec![Arg::str(param_name), Arg::ident(param_name)])
        .call("queryList", vec![])
        .attach(method);

    let mut resources = HashMap::new();
    if let Some(sql) = sql {
        let mut main = HashMap::new();
        main.insert("users/find.sql".to_string(), sql.to_string());
        resources.insert("main".into(), main);
    }
    let project = Project {
        modules: vec![ModuleDef {
            name: "app".into(),
            deps: vec![],
            resources
        }],
        files:   vec![SourceFile {
            module: "app".into(),
            path: "src/main/java/UserDao.java".to_string(),
            tree: b.finish()
        }]
    };
    serde_json::to_string(&project).unwrap()
}

fn write_snapshot(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_help_lists_check_subcommand() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_clean_project_exits_zero() {
    let file = write_snapshot(&snapshot(Some("SELECT * FROM t WHERE id = :id"), "id"));
    cmd()
        .args(["check", "-p"])
        .arg(file.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found in 1 file(s)."));
}

#[test]
fn test_warning_exits_one() {
    let file = write_snapshot(&snapshot(Some("SELECT * FROM t WHERE id = :id"), "region"));
    cmd()
        .args(["check", "-p"])
        .arg(file.path())
        .arg("--no-color")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("SP001 No placeholder in sql for region"));
}

#[test]
fn test_missing_sql_file_exits_two() {
    let file = write_snapshot(&snapshot(None, "id"));
    cmd()
        .args(["check", "-p"])
        .arg(file.path())
        .arg("--no-color")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("SP004 Sql file does not exists"));
}

#[test]
fn test_json_output_round_trips() {
    let file = write_snapshot(&snapshot(None, "id"));
    let assert = cmd()
        .args(["check", "-f", "json", "-p"])
        .arg(file.path())
        .assert()
        .code(2);

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["problems"][0]["check_id"], "SP004");
}

#[test]
fn test_snapshot_from_stdin() {
    cmd()
        .args(["check", "--no-color", "-p", "-"])
        .write_stdin(snapshot(Some("SELECT 1"), "id"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No placeholder in sql for id"));
}

#[test]
fn test_invalid_snapshot_reports_error() {
    let file = write_snapshot("{ not json");
    cmd()
        .args(["check", "-p"])
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_verbose_shows_fix_labels() {
    let file = write_snapshot(&snapshot(Some("SELECT * FROM t WHERE id = :id"), "region"));
    cmd()
        .args(["check", "-v", "-p"])
        .arg(file.path())
        .arg("--no-color")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("fix: id"));
}

#[test]
fn test_disabled_env_var_filters_check() {
    let file = write_snapshot(&snapshot(Some("SELECT 1"), "region"));
    cmd()
        .env("SQL_PARAM_LINT_DISABLED", "SP001")
        .args(["check", "-p"])
        .arg(file.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found"));
}
