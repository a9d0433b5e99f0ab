//! Minimal statement-level control-flow graph.
//!
//! Every node carries one [`Stmt`]. Node `0` is a synthetic entry and the
//! exit is a synthetic node as well; both hold [`Stmt::Nop`].

use std::fmt;

use crate::ir::Stmt;
use crate::types::Var;

/// Index of a node in its [`Cfg`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Control-flow graph of one method body.
#[derive(Debug, Clone)]
pub struct Cfg {
    method: String,
    params: Vec<Var>,
    stmts: Vec<Stmt>,
    preds: Vec<Vec<NodeId>>,
    succs: Vec<Vec<NodeId>>,
    exit: NodeId,
}

impl Cfg {
    /// Creates a graph holding only the entry and exit nodes.
    pub fn new(method: &str, params: Vec<Var>) -> Self {
        let mut cfg = Cfg {
            method: method.to_string(),
            params,
            stmts: Vec::new(),
            preds: Vec::new(),
            succs: Vec::new(),
            exit: NodeId(0),
        };
        cfg.push(Stmt::Nop);
        cfg.exit = cfg.push(Stmt::Nop);
        cfg
    }

    /// Builds a graph from a linear statement list.
    ///
    /// Statement `i` becomes a node; control falls through to `i + 1` unless
    /// the statement is a `Goto` or `Return`. `If` and `Goto` targets are
    /// statement indices. The last statement falls through to exit.
    ///
    /// # Panics
    ///
    /// Panics if a jump target is out of range.
    pub fn from_stmts(method: &str, params: Vec<Var>, stmts: Vec<Stmt>) -> Self {
        let mut cfg = Cfg::new(method, params);
        let n = stmts.len();
        let ids: Vec<NodeId> = stmts.into_iter().map(|stmt| cfg.add_node(stmt)).collect();
        let at = |i: usize| -> NodeId {
            assert!(i < n, "Jump target {} out of range (method has {} statements)", i, n);
            ids[i]
        };

        match ids.first() {
            Some(&first) => cfg.add_edge(cfg.entry(), first),
            None => cfg.add_edge(cfg.entry(), cfg.exit()),
        }

        for i in 0..n {
            let node = ids[i];
            let fall_through = if i + 1 < n { ids[i + 1] } else { cfg.exit() };
            let stmt = cfg.stmt(node);
            let jump = stmt.jump_target();
            let next = match stmt {
                Stmt::Goto { .. } => None,
                Stmt::Return(_) => Some(cfg.exit()),
                Stmt::If { .. } | Stmt::Nop | Stmt::Assign { .. } | Stmt::Invoke { .. } => Some(fall_through),
            };
            if let Some(next) = next {
                cfg.add_edge(node, next);
            }
            if let Some(target) = jump {
                cfg.add_edge(node, at(target));
            }
        }

        log::debug!("Built CFG for '{}' with {} nodes", cfg.method, cfg.len());
        cfg
    }

    fn push(&mut self, stmt: Stmt) -> NodeId {
        let id = NodeId(self.stmts.len());
        self.stmts.push(stmt);
        self.preds.push(Vec::new());
        self.succs.push(Vec::new());
        id
    }

    /// Adds a statement node with no edges.
    pub fn add_node(&mut self, stmt: Stmt) -> NodeId {
        self.push(stmt)
    }

    /// Adds the edge `from -> to`. Duplicate edges are ignored.
    ///
    /// # Panics
    ///
    /// Panics if either node does not belong to this graph.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        assert!(from.0 < self.len() && to.0 < self.len(), "Edge {} -> {} leaves the graph", from, to);
        if !self.succs[from.0].contains(&to) {
            self.succs[from.0].push(to);
            self.preds[to.0].push(from);
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[Var] {
        &self.params
    }

    pub fn entry(&self) -> NodeId {
        NodeId(0)
    }

    pub fn exit(&self) -> NodeId {
        self.exit
    }

    pub fn is_entry(&self, node: NodeId) -> bool {
        node == self.entry()
    }

    pub fn is_exit(&self, node: NodeId) -> bool {
        node == self.exit
    }

    pub fn stmt(&self, node: NodeId) -> &Stmt {
        &self.stmts[node.0]
    }

    pub fn preds(&self, node: NodeId) -> &[NodeId] {
        &self.preds[node.0]
    }

    pub fn succs(&self, node: NodeId) -> &[NodeId] {
        &self.succs[node.0]
    }

    /// All nodes in insertion order, entry first.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.stmts.len()).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}
