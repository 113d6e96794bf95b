//! Lazy walks over a [`Tree`].

use std::collections::VecDeque;
use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::node::TreeNode;
use crate::domain::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    /// Parent before its children.
    #[default]
    PreOrder,
    /// Children before their parent.
    PostOrder,
    /// Level by level.
    BreadthFirst,
}

/// Iterator over the nodes of a tree.
///
/// Borrowing the tree keeps it immutable while the walk is alive. A walk can
/// be cloned at any point, and [`Traversal::restart`] starts it over.
pub struct Traversal<'a, T> {
    tree: &'a Tree<T>,
    starts: Vec<Index>,
    order: Order,
    reverse: bool,
    prune: Option<&'a dyn Fn(&TreeNode<T>) -> bool>,
    /// Pending nodes; the flag marks post-order nodes whose children are queued
    pending: VecDeque<(Index, bool)>,
}

impl<'a, T> Traversal<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, starts: Vec<Index>, order: Order) -> Self {
        let mut traversal = Self {
            tree,
            starts,
            order,
            reverse: false,
            prune: None,
            pending: VecDeque::new(),
        };
        traversal.restart();
        traversal
    }

    /// Visits children (and roots) last to first.
    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self.restart();
        self
    }

    /// Skips every node failing `keep`, together with its descendants.
    pub fn prune(mut self, keep: &'a dyn Fn(&TreeNode<T>) -> bool) -> Self {
        self.prune = Some(keep);
        self.restart();
        self
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Rewinds the walk to its first node.
    pub fn restart(&mut self) {
        self.pending.clear();
        let starts = self.visit_order(&self.starts);
        match self.order {
            Order::BreadthFirst => self.pending.extend(starts.into_iter().map(|idx| (idx, false))),
            // stack: push last so the first start is popped first
            Order::PreOrder | Order::PostOrder => {
                self.pending.extend(starts.into_iter().rev().map(|idx| (idx, false)))
            }
        }
    }

    fn visit_order(&self, indices: &[Index]) -> Vec<Index> {
        if self.reverse {
            indices.iter().rev().copied().collect()
        } else {
            indices.to_vec()
        }
    }

    fn kept(&self, node: &TreeNode<T>) -> bool {
        self.prune.map_or(true, |keep| keep(node))
    }

    fn push_children_on_stack(&mut self, node: &TreeNode<T>) {
        let children = self.visit_order(&node.children);
        self.pending
            .extend(children.into_iter().rev().map(|idx| (idx, false)));
    }
}

impl<'a, T> Iterator for Traversal<'a, T> {
    type Item = &'a TreeNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        match self.order {
            Order::PreOrder => {
                while let Some((idx, _)) = self.pending.pop_back() {
                    let node = tree.node(idx);
                    if self.kept(node) {
                        self.push_children_on_stack(node);
                        return Some(node);
                    }
                }
                None
            }
            Order::PostOrder => {
                while let Some((idx, expanded)) = self.pending.pop_back() {
                    let node = tree.node(idx);
                    if expanded {
                        return Some(node);
                    }
                    if self.kept(node) {
                        self.pending.push_back((idx, true));
                        self.push_children_on_stack(node);
                    }
                }
                None
            }
            Order::BreadthFirst => {
                while let Some((idx, _)) = self.pending.pop_front() {
                    let node = tree.node(idx);
                    if self.kept(node) {
                        let children = self.visit_order(&node.children);
                        self.pending.extend(children.into_iter().map(|idx| (idx, false)));
                        return Some(node);
                    }
                }
                None
            }
        }
    }
}

impl<T> Clone for Traversal<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            starts: self.starts.clone(),
            order: self.order,
            reverse: self.reverse,
            prune: self.prune,
            pending: self.pending.clone(),
        }
    }
}

impl<T> fmt::Debug for Traversal<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traversal")
            .field("order", &self.order)
            .field("reverse", &self.reverse)
            .field("pending", &self.pending.len())
            .finish()
    }
}
