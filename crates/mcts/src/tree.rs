//! Arena-allocated search tree.
//!
//! Nodes are stored in a contiguous vector and referenced by index, which
//! gives cheap parent back-references without a second owning pointer.
//! Pruning drops the owning edge from the parent's child mapping; detached
//! nodes stay in the arena but are unreachable, and the arena is reclaimed
//! wholesale when the tree is reset.

use crate::node::{Node, NodeId};
use coup_core::Action;

/// The search tree: a node arena plus the current root.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a new tree holding a single empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
            root: NodeId(0),
        }
    }

    /// The current root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Total number of nodes ever allocated, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach one child per action to `parent`. An empty action list is a
    /// no-op; an action already keyed under this parent is skipped, keeping
    /// child keys unique.
    pub(crate) fn add_children(&mut self, parent: NodeId, actions: &[Action]) {
        for &action in actions {
            if self
                .get(parent)
                .children
                .iter()
                .any(|(a, _)| *a == action)
            {
                continue;
            }
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node::new(Some(action), Some(parent)));
            self.get_mut(parent).children.push((action, id));
        }
    }

    /// UCB1-style score of a node.
    ///
    /// An unvisited node scores positive infinity so it is always preferred
    /// over any visited sibling. The root (no parent) has no exploration
    /// term and scores its plain average reward. Otherwise the score is
    /// `q/n + c * sqrt(ln(max(N, 1)) / n)` with `N` the parent's visit
    /// count; the `max` guard keeps the term finite under a not-yet-visited
    /// parent.
    pub fn ucb1(&self, id: NodeId, exploration: f64) -> f64 {
        let node = self.get(id);
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let exploit = node.mean_reward();
        match node.parent {
            None => exploit,
            Some(parent) => {
                let parent_visits = self.get(parent).visits.max(1) as f64;
                exploit + exploration * (parent_visits.ln() / node.visits as f64).sqrt()
            }
        }
    }

    /// The child of `id` maximizing the UCB1 score, or `None` if `id` has no
    /// children. Ties break deterministically: the first-encountered child
    /// (insertion order) wins.
    pub fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for &(_, child) in &self.get(id).children {
            let score = self.ucb1(child, exploration);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((child, score)),
            }
        }
        best.map(|(child, _)| child)
    }

    /// Drop the owning edge for `action` from `parent`, detaching the child
    /// and its whole subtree. Returns whether an edge was removed.
    pub(crate) fn detach(&mut self, parent: NodeId, action: &Action) -> bool {
        let children = &mut self.get_mut(parent).children;
        let before = children.len();
        children.retain(|(a, _)| a != action);
        children.len() != before
    }

    /// Make the child keyed by `action` the new root, preserving its subtree
    /// statistics. Returns false (and leaves the tree unchanged) when the
    /// root has no such child.
    pub(crate) fn advance_root(&mut self, action: &Action) -> bool {
        let child = self
            .get(self.root)
            .children
            .iter()
            .find(|(a, _)| a == action)
            .map(|&(_, id)| id);
        match child {
            Some(id) => {
                self.root = id;
                true
            }
            None => false,
        }
    }

    /// Discard everything and start over with a fresh empty root.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::root());
        self.root = NodeId(0);
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
