//! Single-tenant classification of call sites.
//!
//! A call already scoped to one tenant's data makes an explicit
//! `companyId` filter redundant. Classification is a pure function of the
//! syntax trees and is deliberately textual: an identifier literally named
//! `company` somewhere on the chain is the signal, not any type-level
//! notion of a tenant.

use std::collections::HashSet;

use crate::{
    project::{CallGraphIndex, FileId, SiteRef},
    syntax::{NodeId, NodeKind, SyntaxTree}
};

/// Classifies call sites as single-tenant or multi-tenant.
pub struct TenancyClassifier<'a> {
    graph: &'a dyn CallGraphIndex
}

impl<'a> TenancyClassifier<'a> {
    pub fn new(graph: &'a dyn CallGraphIndex) -> Self {
        Self { graph }
    }

    /// Decide whether a call site operates on a single tenant's data.
    ///
    /// When the chain's root receiver is a parameter of the enclosing
    /// method, the classification propagates from every caller of that
    /// method; otherwise the site's own ancestor chain and receiver chain
    /// are scanned for a `company` identifier.
    pub fn is_single_tenant(&self, file: FileId, call: NodeId) -> bool {
        let tree = self.graph.tree_of(file);
        if let (Some(root), Some(method)) =
            (tree.root_receiver_name(call), tree.enclosing_method(call))
            && tree.parameter_names(method).any(|p| p == root)
        {
            let mut visited = HashSet::new();
            return self.single_tenant_via_callers(file, method, &mut visited);
        }
        single_tenant_on_ancestors(tree, call) || single_tenant_on_chain(tree, call)
    }

    /// The enclosing method received its statement source as a parameter:
    /// the site is single-tenant only if every caller of the method is.
    ///
    /// The visited set guards against mutual recursion through the call
    /// graph; a revisited method classifies as multi-tenant.
    fn single_tenant_via_callers(
        &self,
        file: FileId,
        method: NodeId,
        visited: &mut HashSet<(FileId, NodeId)>
    ) -> bool {
        if !visited.insert((file, method)) {
            return false;
        }
        let name = self.graph.tree_of(file).name(method).to_owned();
        self.graph
            .callers_of(&name)
            .into_iter()
            .all(|site| self.caller_is_single_tenant(site, visited))
    }

    fn caller_is_single_tenant(
        &self,
        site: SiteRef,
        visited: &mut HashSet<(FileId, NodeId)>
    ) -> bool {
        let tree = self.graph.tree_of(site.file);
        let args = tree.arguments(site.call);
        if args.is_empty() {
            return false;
        }
        let has_company = args
            .iter()
            .copied()
            .filter(|&arg| tree.kind(arg) == NodeKind::Call)
            .any(|arg| single_tenant_on_ancestors(tree, arg));
        if has_company {
            return true;
        }
        // The caller itself may have received the argument from its own
        // caller; keep propagating.
        match tree.enclosing_method(site.call) {
            Some(method) => self.single_tenant_via_callers(site.file, method, visited),
            None => false
        }
    }
}

/// Scan a node and its ancestors up to the enclosing class for a call
/// invoking a method named `company`.
pub(crate) fn single_tenant_on_ancestors(tree: &SyntaxTree, node: NodeId) -> bool {
    let mut cur = Some(node);
    while let Some(n) = cur {
        if tree.kind(n) == NodeKind::Class {
            break;
        }
        if tree.kind(n) == NodeKind::Call && tree.method_name(n) == Some("company") {
            return true;
        }
        cur = tree.parent(n);
    }
    false
}

/// Scan the receiver chain of the call itself for a link named `company`.
pub(crate) fn single_tenant_on_chain(tree: &SyntaxTree, call: NodeId) -> bool {
    tree.chain_names(call).iter().any(|&name| name == "company")
}
