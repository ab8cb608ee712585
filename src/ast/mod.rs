//! Dialect-neutral AST.
//!
//! Every statement lives in its own [`Tree`] arena. Nodes are addressed by
//! [`NodeId`]; a node's `parent` is a plain index back into the same arena and is
//! only ever used for upward lookups, never for ownership. Dropping the tree drops
//! the whole statement.

pub mod kind;

pub use kind::{BinaryOperator, DataType, NodeKind};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::tokenizer::Span;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Scalar argument values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// A named argument: a scalar, one owned child, or an ordered list of children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Arg {
    Scalar(Scalar),
    Node(NodeId),
    List(Vec<NodeId>),
}

impl From<NodeId> for Arg {
    fn from(id: NodeId) -> Self {
        Arg::Node(id)
    }
}

impl From<Vec<NodeId>> for Arg {
    fn from(ids: Vec<NodeId>) -> Self {
        Arg::List(ids)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Scalar(Scalar::Int(value))
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Scalar(Scalar::Text(value.to_string()))
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Scalar(Scalar::Text(value))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    args: BTreeMap<&'static str, Arg>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn args(&self) -> impl Iterator<Item = (&'static str, &Arg)> {
        self.args.iter().map(|(k, v)| (*k, v))
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Arena holding every node of one statement.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node.
    pub fn new_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            args: BTreeMap::new(),
            parent: None,
        });
        id
    }

    /// Allocate a node and attach the given arguments.
    pub fn add<I>(&mut self, kind: NodeKind, args: I) -> NodeId
    where
        I: IntoIterator<Item = (&'static str, Arg)>,
    {
        let id = self.new_node(kind);
        for (key, value) in args {
            self.set(id, key, value);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Set an argument, adopting any child nodes it carries.
    pub fn set(&mut self, id: NodeId, key: &'static str, value: impl Into<Arg>) {
        let value = value.into();
        match &value {
            Arg::Node(child) => self.adopt(id, *child),
            Arg::List(children) => {
                for child in children {
                    self.adopt(id, *child);
                }
            }
            Arg::Scalar(_) => {}
        }
        if let Some(old) = self.nodes[id.0].args.insert(key, value) {
            self.orphan(&old);
        }
    }

    /// Append a child to a list argument, creating the list if needed.
    pub fn push(&mut self, id: NodeId, key: &'static str, child: NodeId) {
        self.adopt(id, child);
        match self.nodes[id.0].args.get_mut(key) {
            Some(Arg::List(children)) => children.push(child),
            _ => {
                self.nodes[id.0].args.insert(key, Arg::List(vec![child]));
            }
        }
    }

    /// Remove an argument; removed children become detached.
    pub fn remove(&mut self, id: NodeId, key: &str) -> Option<Arg> {
        let old = self.nodes[id.0].args.remove(key)?;
        self.orphan(&old);
        Some(old)
    }

    /// Remove one child from a list argument, keeping the order of the rest.
    pub fn remove_from_list(&mut self, id: NodeId, key: &str, child: NodeId) -> bool {
        let removed = match self.nodes[id.0].args.get_mut(key) {
            Some(Arg::List(children)) => {
                let before = children.len();
                children.retain(|c| *c != child);
                before != children.len()
            }
            _ => false,
        };
        if removed {
            self.nodes[child.0].parent = None;
        }
        removed
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_ne!(parent, child, "a node cannot own itself");
        self.nodes[child.0].parent = Some(parent);
    }

    fn orphan(&mut self, arg: &Arg) {
        match arg {
            Arg::Node(child) => self.nodes[child.0].parent = None,
            Arg::List(children) => {
                for child in children {
                    self.nodes[child.0].parent = None;
                }
            }
            Arg::Scalar(_) => {}
        }
    }

    pub fn arg(&self, id: NodeId, key: &str) -> Option<&Arg> {
        self.nodes[id.0].args.get(key)
    }

    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        match self.arg(id, key) {
            Some(Arg::Node(child)) => Some(*child),
            _ => None,
        }
    }

    /// List argument as a slice; empty when absent.
    pub fn children(&self, id: NodeId, key: &str) -> &[NodeId] {
        match self.arg(id, key) {
            Some(Arg::List(children)) => children,
            _ => &[],
        }
    }

    pub fn text(&self, id: NodeId, key: &str) -> Option<&str> {
        match self.arg(id, key) {
            Some(Arg::Scalar(Scalar::Text(s))) => Some(s),
            _ => None,
        }
    }

    pub fn flag(&self, id: NodeId, key: &str) -> bool {
        matches!(self.arg(id, key), Some(Arg::Scalar(Scalar::Bool(true))))
    }

    /// Optional boolean: distinguishes "absent" from `false`.
    pub fn bool_arg(&self, id: NodeId, key: &str) -> Option<bool> {
        match self.arg(id, key) {
            Some(Arg::Scalar(Scalar::Bool(b))) => Some(*b),
            _ => None,
        }
    }

    pub fn int(&self, id: NodeId, key: &str) -> Option<i64> {
        match self.arg(id, key) {
            Some(Arg::Scalar(Scalar::Int(n))) => Some(*n),
            _ => None,
        }
    }

    /// Direct children in argument order (keys sorted, list order preserved).
    pub fn child_nodes(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for arg in self.nodes[id.0].args.values() {
            match arg {
                Arg::Node(child) => out.push(*child),
                Arg::List(children) => out.extend(children.iter().copied()),
                Arg::Scalar(_) => {}
            }
        }
        out
    }

    /// Depth-first, pre-order walk starting at (and including) `id`.
    pub fn walk(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut kids = self.child_nodes(next);
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    pub fn find(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.walk(id).into_iter().find(|n| self.kind(*n) == kind)
    }

    pub fn find_all(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.walk(id)
            .into_iter()
            .filter(|n| self.kind(*n) == kind)
            .collect()
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Nearest ancestor whose kind is one of `kinds`.
    pub fn find_ancestor(&self, id: NodeId, kinds: &[NodeKind]) -> Option<NodeId> {
        self.ancestors(id).find(|a| kinds.contains(&self.kind(*a)))
    }

    /// Nearest enclosing statement node (the node itself if it is one).
    pub fn enclosing_statement(&self, id: NodeId) -> Option<NodeId> {
        if self.kind(id).is_statement() {
            return Some(id);
        }
        self.ancestors(id).find(|a| self.kind(*a).is_statement())
    }

    /// Deep copy of a subtree. The copy is not listed in any parent's arguments,
    /// but keeps a lookup link to the original's parent so rendering it still
    /// sees the same context.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let copy = self.copy_detached(id);
        self.nodes[copy.0].parent = self.nodes[id.0].parent;
        copy
    }

    fn copy_detached(&mut self, id: NodeId) -> NodeId {
        let kind = self.kind(id);
        let args: Vec<(&'static str, Arg)> = self.nodes[id.0]
            .args
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        let copy = self.new_node(kind);
        for (key, value) in args {
            let value = match value {
                Arg::Node(child) => Arg::Node(self.copy_detached(child)),
                Arg::List(children) => {
                    Arg::List(children.into_iter().map(|c| self.copy_detached(c)).collect())
                }
                scalar => scalar,
            };
            self.set(copy, key, value);
        }
        copy
    }

    /// Nested JSON view of a subtree, for debugging and the CLI.
    pub fn to_json(&self, id: NodeId) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("kind".into(), serde_json::Value::String(self.kind(id).to_string()));
        for (key, arg) in self.node(id).args() {
            let value = match arg {
                Arg::Scalar(s) => serde_json::to_value(s).unwrap_or(serde_json::Value::Null),
                Arg::Node(child) => self.to_json(*child),
                Arg::List(children) => {
                    serde_json::Value::Array(children.iter().map(|c| self.to_json(*c)).collect())
                }
            };
            map.insert(key.to_string(), value);
        }
        serde_json::Value::Object(map)
    }

    // Convenience constructors used by the parser and by dialect transforms.

    pub fn identifier(&mut self, name: impl Into<String>, quoted: bool) -> NodeId {
        self.add(
            NodeKind::Identifier,
            [("this", Arg::from(name.into())), ("quoted", Arg::from(quoted))],
        )
    }

    pub fn string_literal(&mut self, value: impl Into<String>) -> NodeId {
        self.add(
            NodeKind::Literal,
            [("this", Arg::from(value.into())), ("is_string", Arg::from(true))],
        )
    }

    pub fn number_literal(&mut self, text: impl Into<String>) -> NodeId {
        self.add(
            NodeKind::Literal,
            [("this", Arg::from(text.into())), ("is_string", Arg::from(false))],
        )
    }

    /// Unquoted name of an `Identifier`, `Column` or `Table` node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier | NodeKind::Literal => self.text(id, "this"),
            NodeKind::Column | NodeKind::Table | NodeKind::Ordered | NodeKind::ColumnDef => {
                self.child(id, "this").and_then(|c| self.name(c))
            }
            _ => None,
        }
    }
}

/// Iterator over the parent chain of a node.
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// One parsed statement: its arena, root node and source span.
#[derive(Debug, Clone, Serialize)]
pub struct Ast {
    pub tree: Tree,
    pub root: NodeId,
    pub span: Span,
}

impl Ast {
    pub fn kind(&self) -> NodeKind {
        self.tree.kind(self.root)
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.tree.to_json(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_def(tree: &mut Tree, name: &str) -> NodeId {
        let ident = tree.identifier(name, false);
        tree.add(NodeKind::ColumnDef, [("this", Arg::from(ident))])
    }

    #[test]
    fn test_parent_links_follow_ownership() {
        let mut tree = Tree::new();
        let a = column_def(&mut tree, "a");
        let b = column_def(&mut tree, "b");
        let schema = tree.add(NodeKind::Schema, [("expressions", Arg::from(vec![a, b]))]);
        let create = tree.add(NodeKind::Create, [("this", Arg::from(schema))]);

        let ident = tree.child(a, "this").unwrap();
        assert_eq!(tree.parent(ident), Some(a));
        assert_eq!(tree.ancestors(ident).collect::<Vec<_>>(), vec![a, schema, create]);
        assert_eq!(tree.find_ancestor(ident, &[NodeKind::Create]), Some(create));
        assert_eq!(tree.enclosing_statement(ident), Some(create));
    }

    #[test]
    fn test_list_order_is_preserved() {
        let mut tree = Tree::new();
        let schema = tree.new_node(NodeKind::Schema);
        for name in ["z", "a", "m"] {
            let col = column_def(&mut tree, name);
            tree.push(schema, "expressions", col);
        }
        let names: Vec<_> = tree
            .children(schema, "expressions")
            .iter()
            .map(|c| tree.name(*c).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_deep_copy_leaves_original_untouched() {
        let mut tree = Tree::new();
        let col = column_def(&mut tree, "a");
        let schema = tree.add(NodeKind::Schema, [("expressions", Arg::from(vec![col]))]);

        let copy = tree.deep_copy(col);
        assert_ne!(copy, col);
        assert_eq!(tree.parent(copy), Some(schema));
        assert_eq!(tree.children(schema, "expressions"), &[col]);

        let renamed = tree.identifier("b", false);
        tree.set(copy, "this", renamed);
        assert_eq!(tree.name(col), Some("a"));
        assert_eq!(tree.name(copy), Some("b"));
    }

    #[test]
    fn test_remove_detaches_child() {
        let mut tree = Tree::new();
        let col = column_def(&mut tree, "a");
        let ident = tree.child(col, "this").unwrap();
        tree.remove(col, "this");
        assert_eq!(tree.parent(ident), None);
        assert!(tree.child(col, "this").is_none());
    }

    #[test]
    fn test_walk_is_preorder() {
        let mut tree = Tree::new();
        let a = column_def(&mut tree, "a");
        let schema = tree.add(NodeKind::Schema, [("expressions", Arg::from(vec![a]))]);
        let kinds: Vec<_> = tree.walk(schema).into_iter().map(|n| tree.kind(n)).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Schema, NodeKind::ColumnDef, NodeKind::Identifier]
        );
    }
}
