//! Attribute-style exploration of a tree.
//!
//! A [`TreeBrowser`] is a cursor over a borrowed tree. Children of the node
//! under the cursor are exposed as attributes: named children under their
//! name, positional children as `i{index}`.

use std::fmt;
use std::sync::OnceLock;

use generational_arena::Index;
use regex::Regex;
use tracing::debug;

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{Key, TreeNode};
use crate::domain::render::RenderOptions;
use crate::domain::tree::Tree;

pub const DEFAULT_REPR_NAME: &str = "Tree";

fn valid_attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("valid attribute pattern"))
}

fn invalid_char_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_]").expect("valid replacement pattern"))
}

/// Whether `attr` can be used as an attribute name.
///
/// Identifier characters only, no leading digit, no leading double
/// underscore, and not made of underscores alone.
pub fn is_valid_attr_name(attr: &str) -> bool {
    !attr.starts_with("__")
        && valid_attr_pattern().is_match(attr)
        && attr.chars().any(|c| c != '_')
}

/// Turns a key into a valid attribute name, if possible.
///
/// Non-ascii characters are dropped, other invalid characters become `_`,
/// and a leading digit gets a `_` prefix.
pub fn coerce_attr(attr: &str) -> Option<String> {
    let ascii: String = attr.chars().filter(char::is_ascii).collect();
    let mut coerced = invalid_char_pattern().replace_all(&ascii, "_").into_owned();
    if coerced.starts_with(|c: char| c.is_ascii_digit()) {
        coerced.insert(0, '_');
    }
    is_valid_attr_name(&coerced).then_some(coerced)
}

pub struct TreeBrowser<'a, T> {
    tree: &'a Tree<T>,
    /// None stands above the roots of a forest
    cursor: Option<Index>,
    name: String,
    coerce: bool,
}

impl<'a, T> TreeBrowser<'a, T> {
    /// Browser at the top of `tree`: its root, or above the roots of a forest.
    pub fn new(tree: &'a Tree<T>) -> Self {
        Self {
            tree,
            cursor: Self::top_of(tree),
            name: DEFAULT_REPR_NAME.to_string(),
            coerce: false,
        }
    }

    /// Name shown in the header of [`TreeBrowser::show`].
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Coerce child names into valid attribute names.
    pub fn coerce_attrs(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    fn top_of(tree: &Tree<T>) -> Option<Index> {
        match tree.root_indices() {
            [root] => Some(*root),
            _ => None,
        }
    }

    fn moved_to(&self, cursor: Option<Index>) -> Self {
        Self {
            tree: self.tree,
            cursor,
            name: self.name.clone(),
            coerce: self.coerce,
        }
    }

    pub fn tree(&self) -> &'a Tree<T> {
        self.tree
    }

    /// Node under the cursor, None above the roots.
    pub fn node(&self) -> Option<&'a TreeNode<T>> {
        self.cursor.map(|idx| self.tree.node(idx))
    }

    pub fn is_top(&self) -> bool {
        self.cursor == Self::top_of(self.tree)
    }

    pub fn to_top(&self) -> Self {
        self.moved_to(Self::top_of(self.tree))
    }

    /// Browser positioned on the node `id`.
    pub fn at(&self, id: &str) -> TreeResult<Self> {
        let idx = self.tree.index_of(id)?;
        Ok(self.moved_to(Some(idx)))
    }

    fn attr_name(&self, key: Key) -> String {
        match key {
            Key::Name(name) if self.coerce => coerce_attr(&name).unwrap_or(name),
            Key::Name(name) => name,
            Key::Position(position) => format!("i{}", position),
        }
    }

    fn entries(&self) -> Vec<(String, Index)> {
        match self.cursor {
            Some(idx) => self
                .tree
                .node(idx)
                .children
                .iter()
                .filter_map(|&child| {
                    let key = self.tree.key_of(child)?;
                    Some((self.attr_name(key), child))
                })
                .collect(),
            None => self
                .tree
                .root_indices()
                .iter()
                .map(|&root| {
                    let key = Key::Name(self.tree.node(root).id.to_string());
                    (self.attr_name(key), root)
                })
                .collect(),
        }
    }

    /// Attribute names of the children under the cursor, in child order.
    pub fn attrs(&self) -> Vec<String> {
        self.entries().into_iter().map(|(attr, _)| attr).collect()
    }

    /// Attributes starting with `prefix`.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        self.attrs()
            .into_iter()
            .filter(|attr| attr.starts_with(prefix))
            .collect()
    }

    /// Browser on the child exposed as `attr`; raw keys are accepted as well.
    pub fn child(&self, attr: &str) -> TreeResult<Self> {
        let found = self
            .entries()
            .into_iter()
            .find(|(name, _)| name == attr)
            .map(|(_, idx)| idx)
            .or_else(|| match self.cursor {
                Some(idx) => self.tree.child_by_key(idx, attr),
                None => None,
            });
        match found {
            Some(idx) => Ok(self.moved_to(Some(idx))),
            None => Err(TreeError::UnknownAttribute(attr.to_string())),
        }
    }

    /// Browser one level up; None at the top.
    pub fn parent(&self) -> Option<Self> {
        if self.is_top() {
            return None;
        }
        let idx = self.cursor?;
        Some(self.moved_to(self.tree.node(idx).parent))
    }

    /// Follows a `/`-separated list of attributes, `..` and `.`.
    ///
    /// A leading `/` starts from the top.
    pub fn resolve(&self, target: &str) -> TreeResult<Self> {
        let mut browser = if target.starts_with('/') {
            self.to_top()
        } else {
            self.moved_to(self.cursor)
        };
        for segment in target.split('/').filter(|s| !s.is_empty()) {
            browser = match segment {
                "." => browser,
                ".." => match browser.parent() {
                    Some(parent) => parent,
                    None => browser,
                },
                attr => browser.child(attr)?,
            };
        }
        debug!(target, path = %browser.path(), "resolved");
        Ok(browser)
    }

    /// Raw key path of the node under the cursor, empty at the top.
    pub fn path(&self) -> String {
        self.cursor
            .map(|idx| self.tree.path_of(idx))
            .unwrap_or_default()
    }

    pub fn header(&self) -> String {
        if self.is_top() {
            format!("<{}>", self.name)
        } else {
            format!("<{} subpart: {}>", self.name, self.path())
        }
    }
}

impl<T: fmt::Display> TreeBrowser<'_, T> {
    /// Header line followed by the rendering of the subtree under the cursor.
    pub fn show(&self, options: &RenderOptions) -> TreeResult<String> {
        let mut options = options.clone();
        options.start = self.node().map(|node| node.id.clone());
        let body = self.tree.render_with(&options)?;
        Ok(format!("{}\n{}", self.header(), body))
    }
}

impl<T: Clone> TreeBrowser<'_, T> {
    /// Copy of the subtree under the cursor (whole forest above the roots).
    pub fn subtree(&self) -> TreeResult<Tree<T>> {
        match self.node() {
            Some(node) => self.tree.subtree(node.id.as_str()),
            None => Ok(self.tree.clone()),
        }
    }
}

impl<T> Clone for TreeBrowser<'_, T> {
    fn clone(&self) -> Self {
        self.moved_to(self.cursor)
    }
}

impl<T: fmt::Display> fmt::Display for TreeBrowser<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.show(&RenderOptions::default()) {
            Ok(shown) => f.write_str(&shown),
            Err(_) => Err(fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("_salut", true)]
    #[case("salut", true)]
    #[case("salut_2", true)]
    #[case("__salut", false)]
    #[case("_", false)]
    #[case("___", false)]
    #[case("2salut", false)]
    #[case("sa-lut", false)]
    #[case("", false)]
    fn given_name_when_validated_then_matches_identifier_rules(#[case] attr: &str, #[case] valid: bool) {
        assert_eq!(is_valid_attr_name(attr), valid);
    }

    #[rstest]
    #[case("_salut", Some("_salut"))]
    #[case(".salut", Some("_salut"))]
    #[case("2salut", Some("_2salut"))]
    #[case("salut$", Some("salut_"))]
    #[case("salut-2022", Some("salut_2022"))]
    #[case("__salut", None)]
    #[case("_", None)]
    #[case("--", None)]
    #[case("", None)]
    fn given_key_when_coerced_then_valid_attr_or_none(#[case] attr: &str, #[case] expected: Option<&str>) {
        assert_eq!(coerce_attr(attr).as_deref(), expected);
    }
}
