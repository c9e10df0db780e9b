//! Arena syntax model for the analyzed source.
//!
//! The inspection never sees a real IDE parse tree. Host front ends export
//! the shape the engine needs - classes, methods, parameters and fluent
//! call chains - into this arena model, either programmatically through
//! [`TreeBuilder`] or as part of a serialized project snapshot.
//!
//! All engine logic goes through semantic accessors ([`SyntaxTree::callee`],
//! [`SyntaxTree::receiver`], [`SyntaxTree::argument_at`],
//! [`SyntaxTree::chain_names`], ...) rather than positional child walking,
//! so the tree shape stays an implementation detail of this module.

mod build;

use compact_str::CompactString;
pub use build::{Arg, ChainBuilder, TreeBuilder};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Index of a node inside its [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NodeKind {
    /// Root of a source file
    File,
    /// Class declaration, `name` holds the class name
    Class,
    /// Method declaration, `name` holds the method name
    Method,
    /// Method parameter declaration, `name` holds the parameter name
    Parameter,
    /// Method body
    Block,
    /// Call expression; children are `[Reference, ArgumentList]`
    Call,
    /// Member or variable reference; `name` is the referenced identifier,
    /// an optional single child is the receiver expression
    Reference,
    /// Argument list of a call; children are the argument expressions
    ArgumentList,
    /// String literal; `name` holds the unquoted text
    StringLiteral
}

/// One node of the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind:     NodeKind,
    /// Identifier text, literal text or declared name; empty for
    /// composite nodes
    #[serde(default)]
    pub name:     CompactString,
    #[serde(default)]
    pub parent:   Option<NodeId>,
    #[serde(default)]
    pub children: SmallVec<[NodeId; 4]>
}

/// Arena-backed syntax tree of one source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub nodes: Vec<SyntaxNode>
}

impl SyntaxTree {
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// Identifier/literal text of a node; empty for composites.
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// All call expressions of the file, in arena (document) order.
    pub fn calls(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Call)
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Ancestors of a node, nearest first, excluding the node itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cur = self.parent(id);
        std::iter::from_fn(move || {
            let next = cur?;
            cur = self.parent(next);
            Some(next)
        })
    }

    /// The method-reference expression of a call.
    pub fn callee(&self, call: NodeId) -> Option<NodeId> {
        self.children(call)
            .iter()
            .copied()
            .find(|&c| self.kind(c) == NodeKind::Reference)
    }

    /// Name of the method a call invokes.
    pub fn method_name(&self, call: NodeId) -> Option<&str> {
        self.callee(call).map(|c| self.name(c))
    }

    /// Receiver expression of a call (`recv` in `recv.method(..)`).
    pub fn receiver(&self, call: NodeId) -> Option<NodeId> {
        let callee = self.callee(call)?;
        self.children(callee).first().copied()
    }

    /// Argument expressions of a call.
    pub fn arguments(&self, call: NodeId) -> &[NodeId] {
        self.children(call)
            .iter()
            .copied()
            .find(|&c| self.kind(c) == NodeKind::ArgumentList)
            .map(|args| self.children(args))
            .unwrap_or(&[])
    }

    pub fn argument_at(&self, call: NodeId, index: usize) -> Option<NodeId> {
        self.arguments(call).get(index).copied()
    }

    /// Unquoted text of an argument when it is a string literal.
    pub fn string_argument(&self, call: NodeId, index: usize) -> Option<&str> {
        let arg = self.argument_at(call, index)?;
        (self.kind(arg) == NodeKind::StringLiteral).then(|| self.name(arg))
    }

    /// Identifier names along the callee chain of a call, from the invoked
    /// method name down to the root receiver.
    ///
    /// For `db.statement("x").param("id", id)` called on the `param` link
    /// this yields `["param", "statement", "db"]`.
    pub fn chain_names(&self, call: NodeId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut cur = self.callee(call);
        while let Some(node) = cur {
            match self.kind(node) {
                NodeKind::Reference => {
                    names.push(self.name(node));
                    cur = self.children(node).first().copied();
                }
                NodeKind::Call => cur = self.callee(node),
                _ => break
            }
        }
        names
    }

    /// The leftmost identifier of a call chain (`db` in
    /// `db.statement(..).param(..)`).
    pub fn root_receiver_name(&self, call: NodeId) -> Option<&str> {
        self.chain_names(call).last().copied()
    }

    /// Nearest enclosing node of the given kind.
    pub fn enclosing(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.kind(a) == kind)
    }

    pub fn enclosing_method(&self, id: NodeId) -> Option<NodeId> {
        self.enclosing(id, NodeKind::Method)
    }

    pub fn enclosing_class(&self, id: NodeId) -> Option<NodeId> {
        self.enclosing(id, NodeKind::Class)
    }

    /// Declared parameter names of a method.
    pub fn parameter_names(&self, method: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.children(method)
            .iter()
            .copied()
            .filter(|&c| self.kind(c) == NodeKind::Parameter)
            .map(|c| self.name(c))
    }

    /// Check that every parent/child link points inside the arena and
    /// agrees with the opposite direction.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                if parent.index() >= len {
                    return Err(format!("node {} has out-of-range parent {}", i, parent.0));
                }
                if !self.nodes[parent.index()].children.contains(&NodeId(i as u32)) {
                    return Err(format!("node {} is not a child of its parent {}", i, parent.0));
                }
            }
            for &child in &node.children {
                if child.index() >= len {
                    return Err(format!("node {} has out-of-range child {}", i, child.0));
                }
                if self.nodes[child.index()].parent != Some(NodeId(i as u32)) {
                    return Err(format!("child {} does not point back to node {}", child.0, i));
                }
            }
        }
        Ok(())
    }
}
