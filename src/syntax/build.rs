//! Programmatic construction of syntax trees.
//!
//! Hosts that feed the engine directly (and the crate's own tests) build
//! files as a class, methods with declared parameters, and fluent call
//! chains attached to method bodies.

use compact_str::CompactString;
use smallvec::SmallVec;

use super::{NodeId, NodeKind, SyntaxNode, SyntaxTree};

/// One argument of a built call.
#[derive(Debug, Clone)]
pub enum Arg {
    /// String literal argument
    Str(CompactString),
    /// Bare identifier argument
    Ident(CompactString),
    /// Already-built expression, e.g. a nested chain
    Node(NodeId)
}

impl Arg {
    pub fn str(text: &str) -> Self {
        Self::Str(CompactString::from(text))
    }

    pub fn ident(name: &str) -> Self {
        Self::Ident(CompactString::from(name))
    }

    pub fn node(id: NodeId) -> Self {
        Self::Node(id)
    }
}

/// Builder for one source file's [`SyntaxTree`].
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Start a new file; node 0 is the file root.
    pub fn new() -> Self {
        let mut b = Self { nodes: Vec::new() };
        b.push(NodeKind::File, "");
        b
    }

    fn push(&mut self, kind: NodeKind, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode {
            kind,
            name: CompactString::from(name),
            parent: None,
            children: SmallVec::new()
        });
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Add a class to the file root.
    pub fn class(&mut self, name: &str) -> NodeId {
        let class = self.push(NodeKind::Class, name);
        self.link(NodeId(0), class);
        class
    }

    /// Add a method with the given parameter names to a class.
    pub fn method(&mut self, class: NodeId, name: &str, params: &[&str]) -> NodeId {
        let method = self.push(NodeKind::Method, name);
        self.link(class, method);
        for param in params {
            let p = self.push(NodeKind::Parameter, param);
            self.link(method, p);
        }
        let block = self.push(NodeKind::Block, "");
        self.link(method, block);
        method
    }

    fn body(&self, method: NodeId) -> NodeId {
        self.nodes[method.index()]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c.index()].kind == NodeKind::Block)
            .unwrap_or(method)
    }

    /// Build a detached string literal expression.
    pub fn string(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::StringLiteral, text)
    }

    /// Build a detached identifier reference.
    pub fn ident(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Reference, name)
    }

    /// Build a detached call expression `receiver.method(args...)`.
    pub fn call_expr(
        &mut self,
        receiver: Option<NodeId>,
        method: &str,
        args: Vec<NodeId>
    ) -> NodeId {
        let call = self.push(NodeKind::Call, "");
        let callee = self.push(NodeKind::Reference, method);
        if let Some(recv) = receiver {
            self.link(callee, recv);
        }
        self.link(call, callee);
        let arg_list = self.push(NodeKind::ArgumentList, "");
        for arg in args {
            self.link(arg_list, arg);
        }
        self.link(call, arg_list);
        call
    }

    fn materialize(&mut self, arg: Arg) -> NodeId {
        match arg {
            Arg::Str(text) => self.string(&text),
            Arg::Ident(name) => self.ident(&name),
            Arg::Node(id) => id
        }
    }

    /// Start a fluent chain from a root identifier.
    pub fn chain(&mut self, root: &str) -> ChainBuilder<'_> {
        let cur = self.ident(root);
        ChainBuilder { builder: self, cur }
    }

    /// Continue a chain from an already-built expression.
    pub fn chain_from(&mut self, expr: NodeId) -> ChainBuilder<'_> {
        ChainBuilder {
            builder: self,
            cur: expr
        }
    }

    /// Add a receiverless call statement (`name(args...)`) to a method
    /// body and return it.
    pub fn invoke(&mut self, method: NodeId, name: &str, args: Vec<Arg>) -> NodeId {
        let args: Vec<NodeId> = args.into_iter().map(|a| self.materialize(a)).collect();
        let call = self.call_expr(None, name, args);
        let block = self.body(method);
        self.link(block, call);
        call
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree { nodes: self.nodes }
    }
}

/// Fluent-chain builder returned by [`TreeBuilder::chain`].
#[derive(Debug)]
pub struct ChainBuilder<'a> {
    builder: &'a mut TreeBuilder,
    cur:     NodeId
}

impl ChainBuilder<'_> {
    /// Append one `.method(args...)` link to the chain.
    pub fn call(mut self, method: &str, args: Vec<Arg>) -> Self {
        let args: Vec<NodeId> = args
            .into_iter()
            .map(|a| self.builder.materialize(a))
            .collect();
        self.cur = self.builder.call_expr(Some(self.cur), method, args);
        self
    }

    /// Attach the chain as a statement of a method body; returns the
    /// outermost expression of the chain.
    pub fn attach(self, method: NodeId) -> NodeId {
        let block = self.builder.body(method);
        self.builder.link(block, self.cur);
        self.cur
    }

    /// Keep the chain detached, for use as an argument of another call.
    pub fn into_expr(self) -> NodeId {
        self.cur
    }
}
