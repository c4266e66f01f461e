//! Single-pass precedence-driven tree builder.
//!
//! Consumes a validated token sequence once, left to right, and assembles a
//! binary tree whose shape encodes operator precedence: priority never
//! decreases from root to leaf, so a plain post-order walk evaluates the
//! formula with standard precedence and no operator stack.
//!
//! The builder keeps a cursor on the node most recently touched and decides
//! where each token attaches by comparing priorities: a lower-priority
//! operation splices in above the cursor (taking it as its left operand), a
//! higher-priority one walks down the operand spine and takes over the
//! subtree it stops at. Bracket nodes reset the ordering locally - inside a
//! bracket the walk starts over from the bracket's content - and are
//! spliced out of the finished tree, which therefore contains only
//! operations and argument leaves.
//!
//! Nodes live in an arena and reference each other by index; parent links
//! are plain back-indices used only for upward navigation during the build.

use std::collections::BTreeSet;

use formula_ir::{Item, Token};
use tracing::trace;

/// Index of a node in the tree's arena.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Node {
    item: Item,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    /// Meaningful on bracket nodes only: whether the matching close bracket
    /// has been seen.
    closed: bool,
}

/// The frozen result of a build: an arena of nodes, the root, and the
/// variables discovered along the way.
///
/// After construction the tree is immutable; bracket nodes have been
/// spliced out, so walkers only ever see operations, digits, and variables.
#[derive(Clone, Debug)]
pub struct FormulaTree {
    nodes: Vec<Node>,
    root: NodeId,
    variables: BTreeSet<char>,
}

impl FormulaTree {
    /// Root node of the tree.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The item a node wraps.
    #[inline]
    pub fn item(&self, id: NodeId) -> &Item {
        &self.nodes[id.index()].item
    }

    /// Left child (the only child of a unary operation).
    #[inline]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].left
    }

    /// Right child of a binary operation.
    #[inline]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].right
    }

    /// Distinct variable names discovered during the build, in stable
    /// (sorted) order.
    #[inline]
    pub fn variables(&self) -> &BTreeSet<char> {
        &self.variables
    }
}

/// Build a tree from a validated token sequence.
///
/// Construction cannot fail: every failure mode was excluded by the
/// validator, which must have accepted the sequence first.
///
/// # Panics
/// Panics on an empty token sequence - callers guard that before
/// validation.
pub fn build(tokens: &[Token]) -> FormulaTree {
    assert!(!tokens.is_empty(), "cannot build a tree from no tokens");
    let mut builder = Builder::new(&tokens[0]);
    for token in &tokens[1..] {
        builder.insert_token(token);
    }
    builder.finish()
}

/// Classification of the node an insertion starts from.
enum AtKind {
    /// An argument leaf or a closed bracket: a completed operand.
    Operand,
    /// A still-open bracket and its content, if any.
    OpenBracket { content: Option<NodeId> },
    /// An operation node.
    Operation { priority: u8, operand_empty: bool },
}

struct Builder {
    nodes: Vec<Node>,
    root: NodeId,
    cursor: NodeId,
    /// Innermost open bracket last; close brackets pop, and the new top is
    /// the scope the cursor falls back to.
    open_brackets: Vec<NodeId>,
    variables: BTreeSet<char>,
}

impl Builder {
    fn new(first: &Token) -> Self {
        let root = NodeId(0);
        let mut builder = Builder {
            nodes: Vec::new(),
            root,
            cursor: root,
            open_brackets: Vec::new(),
            variables: BTreeSet::new(),
        };
        builder.note_variable(&first.item);
        let id = builder.alloc(first.item.clone(), None);
        if builder.node(id).item.is_open_bracket() {
            builder.open_brackets.push(id);
        }
        builder
    }

    fn insert_token(&mut self, token: &Token) {
        trace!(token = %token, "insert");
        self.note_variable(&token.item);
        match &token.item {
            Item::Digit(_) | Item::Variable(_) => self.insert_argument(token.item.clone()),
            Item::Operation(op) => {
                let priority = op.priority();
                self.cursor = self.insert_operation(token.item.clone(), priority, self.cursor);
            }
            Item::OpenBracket => self.insert_open_bracket(),
            Item::CloseBracket => self.insert_close_bracket(),
        }
    }

    fn finish(mut self) -> FormulaTree {
        self.remove_brackets();
        FormulaTree {
            nodes: self.nodes,
            root: self.root,
            variables: self.variables,
        }
    }

    // ---- per-token insertion ----

    /// Attach an argument leaf under the cursor.
    ///
    /// Afterwards the cursor falls back to the innermost open bracket (the
    /// scope every following operation restarts from), or root when none is
    /// open; a bracket cursor keeps the cursor.
    fn insert_argument(&mut self, item: Item) {
        let cursor = self.cursor;
        match self.classify(cursor) {
            AtKind::Operation { .. } => {
                let leaf = self.alloc(item, Some(cursor));
                self.set_operand_child(cursor, leaf);
                self.cursor = self.open_brackets.last().copied().unwrap_or(self.root);
            }
            AtKind::OpenBracket { content } => {
                debug_assert!(content.is_none(), "argument joining non-empty bracket");
                let leaf = self.alloc(item, Some(cursor));
                self.node_mut(cursor).left = Some(leaf);
            }
            AtKind::Operand => unreachable!("validation rejects adjacent operands"),
        }
    }

    /// Insert an operation of the given priority, starting from `at`.
    /// Returns the node the cursor moves to.
    fn insert_operation(&mut self, item: Item, priority: u8, at: NodeId) -> NodeId {
        match self.classify(at) {
            // A completed operand becomes the new operation's left child.
            AtKind::Operand => self.splice_above(item, at),
            // An empty bracket takes the operation as its content; a
            // non-empty one delegates to its content, which is a fully
            // formed subtree. The cursor must not escape an open bracket,
            // so a result of "root" keeps the bracket as cursor.
            AtKind::OpenBracket { content } => match content {
                None => self.attach_left(item, at),
                Some(content) => {
                    let attached = self.insert_operation(item, priority, content);
                    if attached == self.root {
                        at
                    } else {
                        attached
                    }
                }
            },
            AtKind::Operation {
                priority: cursor_priority,
                operand_empty,
            } => {
                if operand_empty {
                    // A prefix chain like `--x`: the incoming operation is
                    // the pending operand of the one at the cursor.
                    self.attach_left(item, at)
                } else if priority > cursor_priority {
                    self.descend_insert(item, priority, at)
                } else {
                    self.climb_insert(item, priority, at)
                }
            }
        }
    }

    /// Walk down the operand spine while the next operand is an operation
    /// of priority ≤ `priority`, then take over the operand slot where the
    /// walk stops: the displaced subtree becomes the new node's left child.
    ///
    /// Leaves and closed brackets stop the walk - they are maximal-priority
    /// operands and never split.
    fn descend_insert(&mut self, item: Item, priority: u8, start: NodeId) -> NodeId {
        let mut at = start;
        while let Some(child) = self.operand_child(at) {
            let descends = match &self.node(child).item {
                Item::Operation(op) => op.priority() <= priority,
                _ => false,
            };
            if !descends {
                break;
            }
            at = child;
        }
        let displaced = self.operand_child(at);
        let new = self.alloc(item, Some(at));
        self.set_operand_child(at, new);
        self.node_mut(new).left = displaced;
        if let Some(displaced) = displaced {
            self.node_mut(displaced).parent = Some(new);
        }
        new
    }

    /// Walk up through operation parents of priority ≥ `priority`, then
    /// splice the new node in above the last of them.
    fn climb_insert(&mut self, item: Item, priority: u8, cursor: NodeId) -> NodeId {
        let mut at = cursor;
        while let Some(parent) = self.node(at).parent {
            let climbs = match &self.node(parent).item {
                Item::Operation(op) => op.priority() >= priority,
                _ => false,
            };
            if !climbs {
                break;
            }
            at = parent;
        }
        self.splice_above(item, at)
    }

    /// Open a bracket under the cursor and enter its scope.
    fn insert_open_bracket(&mut self) {
        let cursor = self.cursor;
        match self.classify(cursor) {
            AtKind::Operation { .. } => {
                let bracket = self.alloc(Item::OpenBracket, Some(cursor));
                self.set_operand_child(cursor, bracket);
                self.open_brackets.push(bracket);
                self.cursor = bracket;
            }
            AtKind::OpenBracket { content } => {
                debug_assert!(content.is_none(), "bracket joining non-empty bracket");
                let bracket = self.alloc(Item::OpenBracket, Some(cursor));
                self.node_mut(cursor).left = Some(bracket);
                self.open_brackets.push(bracket);
                self.cursor = bracket;
            }
            AtKind::Operand => unreachable!("validation rejects an operand before a bracket"),
        }
    }

    /// Close the innermost open bracket; the cursor falls back to the
    /// enclosing still-open bracket, or root when none is open.
    fn insert_close_bracket(&mut self) {
        let Some(bracket) = self.open_brackets.pop() else {
            unreachable!("validation balances brackets")
        };
        self.node_mut(bracket).closed = true;
        self.cursor = self.open_brackets.last().copied().unwrap_or(self.root);
    }

    // ---- structural helpers ----

    fn classify(&self, id: NodeId) -> AtKind {
        let node = self.node(id);
        match &node.item {
            Item::Digit(_) | Item::Variable(_) => AtKind::Operand,
            Item::OpenBracket if node.closed => AtKind::Operand,
            Item::OpenBracket => AtKind::OpenBracket { content: node.left },
            Item::Operation(op) => AtKind::Operation {
                priority: op.priority(),
                operand_empty: op.is_unary() && node.left.is_none(),
            },
            Item::CloseBracket => unreachable!("close brackets never become nodes"),
        }
    }

    fn alloc(&mut self, item: Item, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            item,
            parent,
            left: None,
            right: None,
            closed: false,
        });
        id
    }

    fn note_variable(&mut self, item: &Item) {
        if let Item::Variable(name) = item {
            self.variables.insert(*name);
        }
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// The operand slot of an operation node: right for binary (the left
    /// operand is already in place), left for unary.
    fn operand_child(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id);
        if node.item.is_binary_operation() {
            node.right
        } else {
            node.left
        }
    }

    fn set_operand_child(&mut self, id: NodeId, child: NodeId) {
        if self.node(id).item.is_binary_operation() {
            self.node_mut(id).right = Some(child);
        } else {
            self.node_mut(id).left = Some(child);
        }
    }

    /// Make a new node take `at`'s place: `at` becomes its left child and
    /// the grandparent's matching child slot (or the root) points at the
    /// new node.
    fn splice_above(&mut self, item: Item, at: NodeId) -> NodeId {
        let parent = self.node(at).parent;
        let new = self.alloc(item, parent);
        self.node_mut(new).left = Some(at);
        self.node_mut(at).parent = Some(new);
        match parent {
            Some(parent) => self.replace_child(parent, at, new),
            None => self.root = new,
        }
        new
    }

    fn attach_left(&mut self, item: Item, parent: NodeId) -> NodeId {
        let new = self.alloc(item, Some(parent));
        self.node_mut(parent).left = Some(new);
        new
    }

    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let node = self.node_mut(parent);
        if node.left == Some(old) {
            node.left = Some(new);
        } else {
            debug_assert_eq!(node.right, Some(old), "node is not a child of its parent");
            node.right = Some(new);
        }
    }

    /// Splice every bracket node out of the finished tree: its single child
    /// takes its place in the parent's slot (or as root).
    fn remove_brackets(&mut self) {
        let mut pending = vec![self.root];
        while let Some(mut id) = pending.pop() {
            while self.node(id).item.is_open_bracket() {
                let Some(child) = self.node(id).left else {
                    unreachable!("validation rejects empty brackets")
                };
                let parent = self.node(id).parent;
                self.node_mut(child).parent = parent;
                match parent {
                    Some(parent) => self.replace_child(parent, id, child),
                    None => self.root = child,
                }
                id = child;
            }
            if let Some(left) = self.node(id).left {
                pending.push(left);
            }
            if let Some(right) = self.node(id).right {
                pending.push(right);
            }
        }
    }
}
