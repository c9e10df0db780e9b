//! Parameter binding collection and reconciliation against placeholders.
//!
//! Walks the fluent chain above a SQL call site, collects every
//! `.param*("name", ...)` binding with a literal name, and diffs the bound
//! names against the placeholder set of the SQL resource.

use compact_str::CompactString;
use indexmap::IndexSet;

use super::types::{CheckKind, Problem};
use crate::{
    fix::Fix,
    syntax::{NodeId, NodeKind, SyntaxTree}
};

/// Methods that bind one named parameter on the fluent chain.
pub const PARAM_METHODS: [&str; 3] = ["param", "paramNull", "paramArray"];

/// The tenant-scoping parameter that single-tenant calls must not bind.
pub const COMPANY_ID_PARAM: &str = "companyId";

/// Reconcile the call site's bindings against the SQL placeholder set.
///
/// `placeholders` is consumed because a single-tenant site drops
/// `companyId` from the expected set before matching.
pub fn reconcile(
    tree: &SyntaxTree,
    site: NodeId,
    mut placeholders: Vec<CompactString>,
    single_tenant: bool
) -> Vec<Problem> {
    if single_tenant {
        placeholders.retain(|p| p != COMPANY_ID_PARAM);
    }

    let mut problems = Vec::new();
    let mut matched: IndexSet<CompactString> = IndexSet::new();
    let mut saw_binding = false;

    for ancestor in tree.ancestors(site) {
        if tree.kind(ancestor) == NodeKind::Class {
            break;
        }
        if tree.kind(ancestor) != NodeKind::Call {
            continue;
        }
        let Some(method) = tree.method_name(ancestor) else {
            continue;
        };
        if !PARAM_METHODS.contains(&method) {
            continue;
        }
        let Some(literal) = tree.argument_at(ancestor, 0) else {
            continue;
        };
        if tree.kind(literal) != NodeKind::StringLiteral {
            continue;
        }
        saw_binding = true;
        let param = tree.name(literal);

        if param == COMPANY_ID_PARAM && single_tenant {
            problems.push(
                Problem::new(
                    CheckKind::RedundantCompanyId,
                    format!("Remove redundant {}", param),
                    literal
                )
                .with_fixes([Fix::remove_param(ancestor, param)])
            );
            continue;
        }

        if placeholders.iter().any(|p| p == param) {
            matched.insert(CompactString::from(param));
        } else {
            problems.push(
                Problem::new(
                    CheckKind::MissingPlaceholder,
                    format!("No placeholder in sql for {}", param),
                    literal
                )
                .with_fixes(placeholders.iter().map(|p| Fix::rename(literal, p)))
            );
        }
    }

    // Unbound placeholders are only meaningful when the chain binds
    // parameters explicitly at all; batch updates and map-based params
    // never reach here with saw_binding set.
    if saw_binding {
        let unmatched: Vec<&CompactString> = placeholders
            .iter()
            .filter(|p| !matched.contains(p.as_str()))
            .collect();
        if !unmatched.is_empty()
            && let Some(problem) = missing_in_params(tree, site, &unmatched)
        {
            problems.push(problem);
        }
    }

    problems
}

/// Build the unbound-placeholder problem, unless the surrounding context
/// rules it out.
///
/// Ancestor identifiers starting with `batchUpdate` or `params` mean the
/// parameters are supplied programmatically and cannot be verified; the
/// report is only raised on chains that read or update (`query*` or
/// exactly `update` in the context).
fn missing_in_params(
    tree: &SyntaxTree,
    site: NodeId,
    unmatched: &[&CompactString]
) -> Option<Problem> {
    let mut context: Vec<&str> = Vec::new();
    for ancestor in tree.ancestors(site) {
        let name = match tree.kind(ancestor) {
            NodeKind::Reference | NodeKind::Method => tree.name(ancestor),
            _ => continue
        };
        if name.starts_with("batchUpdate") || name.starts_with("params") {
            tracing::debug!(site = site.0, "dynamic params, skipping unbound check");
            return None;
        }
        context.push(name);
    }

    let qualifies = context
        .iter()
        .any(|name| name.starts_with("query") || *name == "update");
    if !qualifies {
        tracing::debug!(site = site.0, "ambiguous context, skipping unbound check");
        return None;
    }

    let joined = unmatched
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    Some(Problem::new(
        CheckKind::MissingPlaceholdersInParams,
        format!("Missing the following placeholders in params:\n {}", joined),
        site
    ))
}
