//! Quick-fix planning and transactional application.
//!
//! Fixes are attached to problems during analysis but applied later, on
//! demand, against the host's editable replica of the tree. Application
//! is modeled as an edit script that validates every operation before
//! mutating anything: either the whole script applies or the tree is left
//! untouched. A script built against a tree that has since changed fails
//! with a recoverable error.

use compact_str::CompactString;
use serde::Serialize;

use crate::{
    error::{AppResult, fix_error},
    inspect::PARAM_METHODS,
    syntax::{NodeId, NodeKind, SyntaxTree}
};

/// What a fix does when applied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    /// Replace a parameter-name literal with a known placeholder name
    RenameParam { to: CompactString },
    /// Remove an entire `.param*("name", expr)` link from the chain
    RemoveParamCall
}

/// A suggested remediation for a reported problem.
#[derive(Debug, Clone, Serialize)]
pub struct Fix {
    /// Short user-facing label
    pub label:  String,
    /// Node the fix operates on: the literal for a rename, the chain
    /// link call for a removal
    pub target: NodeId,
    pub kind:   FixKind
}

impl Fix {
    /// Rename a mismatched parameter literal to `placeholder`.
    pub fn rename(literal: NodeId, placeholder: &str) -> Self {
        Self {
            label:  placeholder.to_string(),
            target: literal,
            kind:   FixKind::RenameParam {
                to: CompactString::from(placeholder)
            }
        }
    }

    /// Remove the whole `.param*(...)` call that binds `param`.
    pub fn remove_param(call: NodeId, param: &str) -> Self {
        Self {
            label:  format!("Remove redundant {}", param),
            target: call,
            kind:   FixKind::RemoveParamCall
        }
    }
}

/// One primitive tree edit.
#[derive(Debug, Clone)]
pub enum EditOp {
    ReplaceLiteral { node: NodeId, text: CompactString },
    RemoveChainLink { call: NodeId }
}

/// Ordered edits applied as a unit.
#[derive(Debug, Clone)]
pub struct EditScript {
    ops: Vec<EditOp>
}

impl EditScript {
    pub fn new(ops: Vec<EditOp>) -> Self {
        Self { ops }
    }

    /// Plan the edit script for a fix.
    pub fn for_fix(fix: &Fix) -> Self {
        let ops = match &fix.kind {
            FixKind::RenameParam { to } => vec![EditOp::ReplaceLiteral {
                node: fix.target,
                text: to.clone()
            }],
            FixKind::RemoveParamCall => vec![EditOp::RemoveChainLink { call: fix.target }]
        };
        Self { ops }
    }

    /// Apply all edits, or none if any precondition fails.
    pub fn apply(&self, tree: &mut SyntaxTree) -> AppResult<()> {
        for op in &self.ops {
            Self::check(tree, op)?;
        }
        for op in &self.ops {
            Self::run(tree, op);
        }
        Ok(())
    }

    fn check(tree: &SyntaxTree, op: &EditOp) -> AppResult<()> {
        match op {
            EditOp::ReplaceLiteral { node, .. } => {
                if node.index() >= tree.nodes.len() {
                    return Err(fix_error("target node no longer exists"));
                }
                if tree.kind(*node) != NodeKind::StringLiteral {
                    return Err(fix_error("target is no longer a string literal"));
                }
            }
            EditOp::RemoveChainLink { call } => {
                if call.index() >= tree.nodes.len() {
                    return Err(fix_error("chain link no longer exists"));
                }
                if tree.kind(*call) != NodeKind::Call {
                    return Err(fix_error("chain link is no longer a call"));
                }
                let is_param = tree
                    .method_name(*call)
                    .is_some_and(|m| PARAM_METHODS.contains(&m));
                if !is_param {
                    return Err(fix_error("chain link is not a param binding anymore"));
                }
                if tree.receiver(*call).is_none() {
                    return Err(fix_error("chain link has no receiver to splice to"));
                }
                if tree.parent(*call).is_none() {
                    return Err(fix_error("chain link is detached"));
                }
            }
        }
        Ok(())
    }

    fn run(tree: &mut SyntaxTree, op: &EditOp) {
        match op {
            EditOp::ReplaceLiteral { node, text } => {
                tree.nodes[node.index()].name = text.clone();
            }
            EditOp::RemoveChainLink { call } => {
                // Preconditions checked; splice the receiver into the
                // removed call's place so the rest of the chain survives.
                // Detached nodes stay in the arena but become unreachable.
                let Some(receiver) = tree.receiver(*call) else {
                    return;
                };
                let Some(parent) = tree.parent(*call) else {
                    return;
                };
                let Some(callee) = tree.callee(*call) else {
                    return;
                };
                if let Some(slot) = tree.nodes[parent.index()]
                    .children
                    .iter()
                    .position(|&c| c == *call)
                {
                    tree.nodes[parent.index()].children[slot] = receiver;
                }
                tree.nodes[receiver.index()].parent = Some(parent);
                tree.nodes[callee.index()].children.retain(|c| *c != receiver);
                tree.nodes[call.index()].parent = None;
            }
        }
    }
}

/// Apply a fix, logging and swallowing a stale-tree failure.
///
/// Returns `true` when the tree was modified.
pub fn apply_fix(tree: &mut SyntaxTree, fix: &Fix) -> bool {
    match EditScript::for_fix(fix).apply(tree) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(fix = %fix.label, error = %err, "quick fix failed to apply");
            false
        }
    }
}
