//! Tree store: an arena-backed forest of identified nodes.

use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{Key, NodeId, TreeNode};
use crate::domain::traversal::{Order, Traversal};

pub const DEFAULT_PATH_SEPARATOR: &str = ".";

/// What happens to the descendants of a deleted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove the whole subtree.
    Cascade,
    /// Remove only the node; its children take its place below its parent.
    PromoteChildren,
}

/// Arena-based forest with identifier lookup.
///
/// Uses a generational arena for node slots, so links to removed nodes can
/// never resolve to a recycled slot. Every public operation validates its
/// inputs first; a failed operation leaves the tree untouched.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode<T>>,
    /// Identifier lookup
    ids: HashMap<NodeId, Index>,
    /// Root nodes in insertion order
    roots: Vec<Index>,
    separator: String,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_PATH_SEPARATOR)
    }

    /// Empty tree whose paths are joined with `separator`.
    ///
    /// An empty separator falls back to the default.
    pub fn with_separator(separator: impl Into<String>) -> Self {
        let mut tree = Self {
            arena: Arena::new(),
            ids: HashMap::new(),
            roots: Vec::new(),
            separator: String::new(),
        };
        tree.set_separator(separator);
        tree
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) {
        let separator = separator.into();
        self.separator = if separator.is_empty() {
            DEFAULT_PATH_SEPARATOR.to_string()
        } else {
            separator
        };
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode<T>> {
        self.ids.get(id).and_then(|&idx| self.arena.get(idx))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TreeNode<T>> {
        let idx = *self.ids.get(id)?;
        self.arena.get_mut(idx)
    }

    pub fn roots(&self) -> Vec<&NodeId> {
        self.roots.iter().map(|&idx| &self.node(idx).id).collect()
    }

    /// First root, the tree's root when it is not a forest.
    pub fn root(&self) -> Option<&NodeId> {
        self.roots.first().map(|&idx| &self.node(idx).id)
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Appends a new node below `parent`, or as a new root when `parent` is None.
    pub fn insert(&mut self, parent: Option<&str>, id: impl Into<NodeId>, data: T) -> TreeResult<()> {
        let parent = self.optional_index(parent)?;
        self.attach(parent, None, None, id.into(), data).map(|_| ())
    }

    /// Appends a new node that `parent` references by `name`.
    pub fn insert_named(
        &mut self,
        parent: &str,
        name: impl Into<String>,
        id: impl Into<NodeId>,
        data: T,
    ) -> TreeResult<()> {
        let parent = self.index_of(parent)?;
        self.attach(Some(parent), None, Some(name.into()), id.into(), data)
            .map(|_| ())
    }

    /// Inserts a new node at `position` among the children of `parent`.
    ///
    /// Positions past the end append.
    pub fn insert_at(
        &mut self,
        parent: Option<&str>,
        position: usize,
        id: impl Into<NodeId>,
        data: T,
    ) -> TreeResult<()> {
        let parent = self.optional_index(parent)?;
        self.attach(parent, Some(position), None, id.into(), data)
            .map(|_| ())
    }

    /// Puts a new node in the place of `child` and moves `child` below it.
    ///
    /// The new node takes over the child's position and name; the child keeps
    /// its own name as the only child of the new node.
    pub fn insert_above(&mut self, child: &str, id: impl Into<NodeId>, data: T) -> TreeResult<()> {
        let id = id.into();
        let child_idx = self.index_of(child)?;
        if self.ids.contains_key(&id) {
            return Err(TreeError::DuplicateId(id));
        }
        debug!(child, id = %id, "insert above");

        let parent = self.node(child_idx).parent;
        let name = self.node(child_idx).name.clone();
        let position = self.position_in_parent(child_idx);
        let new_idx = self.arena.insert(TreeNode {
            id: id.clone(),
            name,
            data,
            parent,
            children: vec![child_idx],
        });
        self.ids.insert(id, new_idx);
        self.child_list_mut(parent)[position] = new_idx;
        if let Some(node) = self.arena.get_mut(child_idx) {
            node.parent = Some(new_idx);
        }
        Ok(())
    }

    /// Replaces the payload of `id`, returning the previous one.
    pub fn update(&mut self, id: &str, data: T) -> TreeResult<T> {
        let node = self
            .get_mut(id)
            .ok_or_else(|| TreeError::NotFound(NodeId::from(id)))?;
        Ok(std::mem::replace(&mut node.data, data))
    }

    /// Re-parents `id` below `new_parent`, appending it to the new child list.
    ///
    /// `None` turns the node into a root.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&mut self, id: &str, new_parent: Option<&str>) -> TreeResult<()> {
        let idx = self.index_of(id)?;
        let target = self.optional_index(new_parent)?;
        if let Some(target_idx) = target {
            if target_idx == idx || self.is_ancestor(idx, target_idx) {
                return Err(TreeError::Cycle {
                    node: NodeId::from(id),
                    parent: self.node(target_idx).id.clone(),
                });
            }
        }
        if let Some(name) = self.node(idx).name.clone() {
            self.ensure_name_free(target, &name, Some(idx))?;
        }

        self.detach(idx);
        self.child_list_mut(target).push(idx);
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = target;
        }
        Ok(())
    }

    /// Removes `id` and returns its payload.
    ///
    /// With [`DeleteMode::PromoteChildren`] the children are spliced into the
    /// parent's child list (or the root list) at the deleted node's position.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: &str, mode: DeleteMode) -> TreeResult<T> {
        let idx = self.index_of(id)?;
        match mode {
            DeleteMode::Cascade => {
                let mut nodes = self.take_subtree(idx).into_iter();
                // the subtree root comes first in pre-order
                match nodes.next() {
                    Some((_, node)) => Ok(node.data),
                    None => Err(TreeError::NotFound(NodeId::from(id))),
                }
            }
            DeleteMode::PromoteChildren => {
                let parent = self.node(idx).parent;
                let children = self.node(idx).children.clone();
                if parent.is_some() {
                    for &child in &children {
                        if let Some(name) = self.node(child).name.clone() {
                            self.ensure_name_free(parent, &name, Some(idx))?;
                        }
                    }
                }

                let position = self.position_in_parent(idx);
                self.child_list_mut(parent)
                    .splice(position..=position, children.iter().copied());
                for &child in &children {
                    if let Some(node) = self.arena.get_mut(child) {
                        node.parent = parent;
                    }
                }
                let node = self
                    .arena
                    .remove(idx)
                    .ok_or_else(|| TreeError::NotFound(NodeId::from(id)))?;
                self.ids.remove(&node.id);
                Ok(node.data)
            }
        }
    }

    /// Detaches the subtree rooted at `id` and returns it as its own tree.
    #[instrument(level = "debug", skip(self))]
    pub fn drop_subtree(&mut self, id: &str) -> TreeResult<Tree<T>> {
        let idx = self.index_of(id)?;
        let mut tree = Tree::with_separator(self.separator.clone());
        let nodes = self.take_subtree(idx);
        tree.adopt(None, nodes);
        Ok(tree)
    }

    /// Grafts every root of `tree` (with its subtree) below `parent`, or as
    /// new roots when `parent` is None.
    #[instrument(level = "debug", skip(self, tree), fields(nodes = tree.len()))]
    pub fn insert_tree(&mut self, parent: Option<&str>, mut tree: Tree<T>) -> TreeResult<()> {
        let parent = self.optional_index(parent)?;
        let tops = tree.roots.clone();
        self.check_graft(parent, &tree, &tops)?;
        for top in tops {
            let nodes = tree.take_subtree(top);
            self.adopt(parent, nodes);
        }
        Ok(())
    }

    /// Pastes the children of `tree`'s roots below `onto` (default: first root).
    ///
    /// The roots of `tree` themselves are discarded. When this tree is empty
    /// and `onto` is None, `tree` is taken over whole.
    #[instrument(level = "debug", skip(self, tree), fields(nodes = tree.len()))]
    pub fn merge(&mut self, mut tree: Tree<T>, onto: Option<&str>) -> TreeResult<()> {
        if self.is_empty() && onto.is_none() {
            return self.insert_tree(None, tree);
        }
        let target = match onto {
            Some(id) => self.index_of(id)?,
            None => self.roots.first().copied().ok_or_else(|| {
                TreeError::NotFound(NodeId::from(""))
            })?,
        };
        let tops: Vec<Index> = tree
            .roots
            .iter()
            .flat_map(|&root| tree.node(root).children.iter().copied())
            .collect();
        self.check_graft(Some(target), &tree, &tops)?;
        for top in tops {
            let nodes = tree.take_subtree(top);
            self.adopt(Some(target), nodes);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn parent_id(&self, id: &str) -> TreeResult<Option<&NodeId>> {
        let idx = self.index_of(id)?;
        Ok(self.node(idx).parent.map(|p| &self.node(p).id))
    }

    pub fn children_ids(&self, id: &str) -> TreeResult<Vec<&NodeId>> {
        let idx = self.index_of(id)?;
        Ok(self.ids_of(&self.node(idx).children))
    }

    /// Other nodes sharing the parent of `id` (other roots for a root).
    pub fn siblings_ids(&self, id: &str) -> TreeResult<Vec<&NodeId>> {
        let idx = self.index_of(id)?;
        let siblings = self.child_list(self.node(idx).parent);
        Ok(siblings
            .iter()
            .filter(|&&sibling| sibling != idx)
            .map(|&sibling| &self.node(sibling).id)
            .collect())
    }

    pub fn is_leaf(&self, id: &str) -> TreeResult<bool> {
        let idx = self.index_of(id)?;
        Ok(self.node(idx).is_leaf())
    }

    /// Number of edges between `id` and its root.
    pub fn depth(&self, id: &str) -> TreeResult<usize> {
        let idx = self.index_of(id)?;
        Ok(self.lineage(idx).len() - 1)
    }

    /// Number of levels of the deepest root, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(Index, usize)> = self.roots.iter().map(|&root| (root, 1)).collect();
        while let Some((idx, level)) = stack.pop() {
            height = height.max(level);
            stack.extend(self.node(idx).children.iter().map(|&child| (child, level + 1)));
        }
        height
    }

    /// Ancestors of `id`, nearest first unless `from_root` is set.
    pub fn ancestors_ids(
        &self,
        id: &str,
        from_root: bool,
        include_current: bool,
    ) -> TreeResult<Vec<&NodeId>> {
        let idx = self.index_of(id)?;
        let mut lineage = self.lineage(idx);
        if !include_current {
            lineage.pop();
        }
        if !from_root {
            lineage.reverse();
        }
        Ok(self.ids_of(&lineage))
    }

    /// Leaves below `start` (whole forest when None), in pre-order.
    pub fn leaves_ids(&self, start: Option<&str>) -> TreeResult<Vec<&NodeId>> {
        let traversal = match start {
            Some(id) => self.traverse_from(id, Order::PreOrder)?,
            None => self.traverse(Order::PreOrder),
        };
        Ok(traversal
            .filter(|node| node.is_leaf())
            .map(|node| &node.id)
            .collect())
    }

    /// How the parent of `id` refers to it, None for roots.
    pub fn key(&self, id: &str) -> TreeResult<Option<Key>> {
        let idx = self.index_of(id)?;
        Ok(self.key_of(idx))
    }

    /// Keys from the root down to `id`, joined by the separator.
    pub fn path(&self, id: &str) -> TreeResult<String> {
        let idx = self.index_of(id)?;
        Ok(self.path_of(idx))
    }

    /// Resolves a path produced by [`Tree::path`] back to its node.
    pub fn id_by_path(&self, path: &str) -> TreeResult<&NodeId> {
        let idx = self.index_by_path(path)?;
        Ok(&self.node(idx).id)
    }

    /// Walks all roots in `order`.
    pub fn traverse(&self, order: Order) -> Traversal<'_, T> {
        Traversal::new(self, self.roots.clone(), order)
    }

    /// Walks the subtree rooted at `id` in `order`.
    pub fn traverse_from(&self, id: &str, order: Order) -> TreeResult<Traversal<'_, T>> {
        let idx = self.index_of(id)?;
        Ok(Traversal::new(self, vec![idx], order))
    }

    /// Pre-order iteration over all nodes.
    pub fn iter(&self) -> Traversal<'_, T> {
        self.traverse(Order::PreOrder)
    }

    // ---------------------------------------------------------------------
    // Crate internals
    // ---------------------------------------------------------------------

    pub(crate) fn index_of(&self, id: &str) -> TreeResult<Index> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| TreeError::NotFound(NodeId::from(id)))
    }

    /// Node at a live index; indices handed out by the tree always resolve.
    pub(crate) fn node(&self, idx: Index) -> &TreeNode<T> {
        &self.arena[idx]
    }

    pub(crate) fn root_indices(&self) -> &[Index] {
        &self.roots
    }

    pub(crate) fn key_of(&self, idx: Index) -> Option<Key> {
        let node = self.node(idx);
        node.parent?;
        Some(match &node.name {
            Some(name) => Key::Name(name.clone()),
            None => Key::Position(self.position_in_parent(idx)),
        })
    }

    /// Path of `idx`; separators and backslashes inside keys are escaped
    /// with a backslash.
    pub(crate) fn path_of(&self, idx: Index) -> String {
        let lineage = self.lineage(idx);
        let mut segments: Vec<String> = Vec::with_capacity(lineage.len());
        if self.roots.len() > 1 {
            segments.push(self.node(lineage[0]).id.to_string());
        }
        segments.extend(
            lineage
                .iter()
                .filter_map(|&i| self.key_of(i))
                .map(|key| key.to_string()),
        );
        segments
            .iter()
            .map(|segment| escape_segment(segment, &self.separator))
            .join(&self.separator)
    }

    pub(crate) fn index_by_path(&self, path: &str) -> TreeResult<Index> {
        let invalid = || TreeError::InvalidPath(path.to_string());
        let mut segments = split_path(path, &self.separator)
            .into_iter()
            .filter(|segment| !segment.is_empty());
        let mut current = if self.roots.len() > 1 {
            let first = segments.next().ok_or_else(invalid)?;
            self.roots
                .iter()
                .copied()
                .find(|&root| self.node(root).id.as_str() == first)
                .ok_or_else(invalid)?
        } else {
            self.roots.first().copied().ok_or_else(invalid)?
        };
        for segment in segments {
            current = self.child_by_key(current, &segment).ok_or_else(invalid)?;
        }
        trace!(path, id = %self.node(current).id, "resolved path");
        Ok(current)
    }

    /// Child of `parent` referenced by `segment`: a name, or the position of
    /// an unnamed child.
    pub(crate) fn child_by_key(&self, parent: Index, segment: &str) -> Option<Index> {
        let children = &self.node(parent).children;
        children
            .iter()
            .copied()
            .find(|&child| self.node(child).name.as_deref() == Some(segment))
            .or_else(|| {
                segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|position| children.get(position).copied())
                    .filter(|&child| self.node(child).name.is_none())
            })
    }

    /// Indices of the subtree rooted at `start`, in pre-order.
    pub(crate) fn subtree_indices(&self, start: Index) -> Vec<Index> {
        let mut indices = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            indices.push(idx);
            // reverse so the first child is popped first
            stack.extend(self.node(idx).children.iter().rev().copied());
        }
        indices
    }

    // ---------------------------------------------------------------------
    // Private helpers
    // ---------------------------------------------------------------------

    fn optional_index(&self, id: Option<&str>) -> TreeResult<Option<Index>> {
        id.map(|id| self.index_of(id)).transpose()
    }

    fn ids_of(&self, indices: &[Index]) -> Vec<&NodeId> {
        indices.iter().map(|&idx| &self.node(idx).id).collect()
    }

    fn child_list(&self, parent: Option<Index>) -> &Vec<Index> {
        match parent {
            Some(idx) => &self.node(idx).children,
            None => &self.roots,
        }
    }

    fn child_list_mut(&mut self, parent: Option<Index>) -> &mut Vec<Index> {
        match parent {
            Some(idx) => &mut self.arena[idx].children,
            None => &mut self.roots,
        }
    }

    fn position_in_parent(&self, idx: Index) -> usize {
        self.child_list(self.node(idx).parent)
            .iter()
            .position(|&sibling| sibling == idx)
            .unwrap_or(0)
    }

    /// Nodes from the root down to `idx`, both included.
    fn lineage(&self, idx: Index) -> Vec<Index> {
        let mut lineage = vec![idx];
        let mut current = self.node(idx).parent;
        while let Some(parent) = current {
            lineage.push(parent);
            current = self.node(parent).parent;
        }
        lineage.reverse();
        lineage
    }

    fn is_ancestor(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = self.node(idx).parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.node(parent).parent;
        }
        false
    }

    /// Fails when `name` is taken below `parent` by a node other than `except`.
    /// Roots carry no key, so the root list is never checked.
    fn ensure_name_free(&self, parent: Option<Index>, name: &str, except: Option<Index>) -> TreeResult<()> {
        let Some(parent_idx) = parent else {
            return Ok(());
        };
        let taken = self.node(parent_idx).children.iter().any(|&child| {
            Some(child) != except && self.node(child).name.as_deref() == Some(name)
        });
        if taken {
            return Err(TreeError::DuplicateKey {
                parent: self.node(parent_idx).id.clone(),
                key: name.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self, data))]
    fn attach(
        &mut self,
        parent: Option<Index>,
        position: Option<usize>,
        name: Option<String>,
        id: NodeId,
        data: T,
    ) -> TreeResult<Index> {
        if self.ids.contains_key(&id) {
            return Err(TreeError::DuplicateId(id));
        }
        if let Some(name) = &name {
            self.ensure_name_free(parent, name, None)?;
        }

        let idx = self.arena.insert(TreeNode {
            id: id.clone(),
            name,
            data,
            parent,
            children: Vec::new(),
        });
        self.ids.insert(id, idx);
        let siblings = self.child_list_mut(parent);
        let at = position.map_or(siblings.len(), |p| p.min(siblings.len()));
        siblings.insert(at, idx);
        Ok(idx)
    }

    /// Unlinks `idx` from its parent's child list (or the root list).
    fn detach(&mut self, idx: Index) {
        let parent = self.node(idx).parent;
        self.child_list_mut(parent).retain(|&sibling| sibling != idx);
    }

    /// Unlinks and removes the subtree rooted at `idx`, returning its nodes
    /// in pre-order keyed by their former index.
    fn take_subtree(&mut self, idx: Index) -> Vec<(Index, TreeNode<T>)> {
        self.detach(idx);
        self.subtree_indices(idx)
            .into_iter()
            .filter_map(|i| {
                let node = self.arena.remove(i)?;
                self.ids.remove(&node.id);
                Some((i, node))
            })
            .collect()
    }

    /// Re-inserts nodes taken with [`Tree::take_subtree`]; the first node is
    /// appended below `parent`.
    fn adopt(&mut self, parent: Option<Index>, nodes: Vec<(Index, TreeNode<T>)>) {
        let mut remap: HashMap<Index, Index> = HashMap::with_capacity(nodes.len());
        for (position, (old_idx, node)) in nodes.into_iter().enumerate() {
            let new_parent = if position == 0 {
                parent
            } else {
                node.parent.and_then(|p| remap.get(&p).copied())
            };
            let TreeNode { id, name, data, .. } = node;
            let new_idx = self.arena.insert(TreeNode {
                id: id.clone(),
                name,
                data,
                parent: new_parent,
                children: Vec::new(),
            });
            self.ids.insert(id, new_idx);
            self.child_list_mut(new_parent).push(new_idx);
            remap.insert(old_idx, new_idx);
        }
    }

    /// Validates grafting the subtrees at `tops` of `source` below `parent`:
    /// no identifier may collide and names must stay unique among siblings.
    fn check_graft(&self, parent: Option<Index>, source: &Tree<T>, tops: &[Index]) -> TreeResult<()> {
        for &top in tops {
            for idx in source.subtree_indices(top) {
                let id = &source.node(idx).id;
                if self.ids.contains_key(id) {
                    return Err(TreeError::DuplicateId(id.clone()));
                }
            }
        }
        let Some(parent_idx) = parent else {
            return Ok(());
        };
        let mut seen = HashSet::new();
        for name in tops.iter().filter_map(|&top| source.node(top).name.as_deref()) {
            self.ensure_name_free(parent, name, None)?;
            if !seen.insert(name) {
                return Err(TreeError::DuplicateKey {
                    parent: self.node(parent_idx).id.clone(),
                    key: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<T: Clone> Tree<T> {
    /// Copy of the subtree rooted at `id`, as a tree of its own.
    #[instrument(level = "debug", skip(self))]
    pub fn subtree(&self, id: &str) -> TreeResult<Tree<T>> {
        let start = self.index_of(id)?;
        let nodes = self
            .subtree_indices(start)
            .into_iter()
            .map(|idx| (idx, self.node(idx).clone()))
            .collect();
        let mut tree = Tree::with_separator(self.separator.clone());
        tree.adopt(None, nodes);
        Ok(tree)
    }
}

/// Structural equality: same roots, identifiers, names, payloads and child
/// order. The path separator is not compared.
impl<T: PartialEq> PartialEq for Tree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(&a, &b)| self.same_subtree(a, other, b))
    }
}

impl<T: PartialEq> Tree<T> {
    fn same_subtree(&self, idx: Index, other: &Tree<T>, other_idx: Index) -> bool {
        let mut pairs = vec![(idx, other_idx)];
        while let Some((x, y)) = pairs.pop() {
            let (a, b) = (self.node(x), other.node(y));
            if a.id != b.id
                || a.name != b.name
                || a.data != b.data
                || a.children.len() != b.children.len()
            {
                return false;
            }
            pairs.extend(a.children.iter().copied().zip(b.children.iter().copied()));
        }
        true
    }
}

/// Escapes backslashes and `separator` inside one path segment.
fn escape_segment(segment: &str, separator: &str) -> String {
    segment
        .replace('\\', "\\\\")
        .replace(separator, &format!("\\{}", separator))
}

/// Splits `path` on unescaped separators and unescapes each segment.
///
/// A backslash keeps the following separator or character literally.
fn split_path(path: &str, separator: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut rest = path;
    while !rest.is_empty() {
        if let Some(escaped) = rest.strip_prefix('\\') {
            if let Some(after) = escaped.strip_prefix(separator) {
                current.push_str(separator);
                rest = after;
                continue;
            }
            let mut chars = escaped.chars();
            // a trailing backslash stands for itself
            current.push(chars.next().unwrap_or('\\'));
            rest = chars.as_str();
        } else if let Some(after) = rest.strip_prefix(separator) {
            segments.push(std::mem::take(&mut current));
            rest = after;
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                current.push(c);
            }
            rest = chars.as_str();
        }
    }
    segments.push(current);
    segments
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a TreeNode<T>;
    type IntoIter = Traversal<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree<i32> {
        let mut tree = Tree::new();
        tree.insert(None, "r", 0).unwrap();
        tree.insert(Some("r"), "a", 1).unwrap();
        tree.insert(Some("r"), "b", 2).unwrap();
        tree.insert(Some("a"), "a1", 11).unwrap();
        tree
    }

    #[test]
    fn given_removed_node_when_slot_reused_then_stale_index_does_not_resolve() {
        let mut tree = sample();
        let stale = tree.index_of("a1").unwrap();
        tree.delete("a1", DeleteMode::Cascade).unwrap();
        tree.insert(Some("b"), "b1", 21).unwrap();

        assert!(tree.arena.get(stale).is_none());
        assert!(tree.index_of("a1").is_err());
    }

    #[test]
    fn given_tree_when_subtree_indices_then_pre_order() {
        let tree = sample();
        let ids: Vec<&str> = tree
            .subtree_indices(tree.index_of("r").unwrap())
            .into_iter()
            .map(|idx| tree.node(idx).id.as_str())
            .collect();
        assert_eq!(ids, vec!["r", "a", "a1", "b"]);
    }

    #[test]
    fn given_promote_delete_when_done_then_parent_links_consistent() {
        let mut tree = sample();
        tree.delete("a", DeleteMode::PromoteChildren).unwrap();

        let a1 = tree.index_of("a1").unwrap();
        let r = tree.index_of("r").unwrap();
        assert_eq!(tree.node(a1).parent, Some(r));
        assert_eq!(tree.children_ids("r").unwrap(), vec!["a1", "b"]);
    }
}
