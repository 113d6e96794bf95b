//! Ascii-art rendering of trees on top of `termtree`.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use termtree::{GlyphPalette, Tree as TermTree};
use tracing::instrument;

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{NodeId, TreeNode};
use crate::domain::tree::Tree;

/// Glyph set used to draw the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStyle {
    /// `|-- ` / `+-- `
    Ascii,
    /// `├── ` / `└── `
    #[default]
    AsciiEx,
    /// `├── ` / `╰── `
    AsciiExr,
    /// `╠══ ` / `╚══ `
    AsciiEm,
    /// `╟── ` / `╙── `
    AsciiEmv,
    /// `╞══ ` / `╘══ `
    AsciiEmh,
}

impl LineStyle {
    pub const ALL: [LineStyle; 6] = [
        LineStyle::Ascii,
        LineStyle::AsciiEx,
        LineStyle::AsciiExr,
        LineStyle::AsciiEm,
        LineStyle::AsciiEmv,
        LineStyle::AsciiEmh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LineStyle::Ascii => "ascii",
            LineStyle::AsciiEx => "ascii-ex",
            LineStyle::AsciiExr => "ascii-exr",
            LineStyle::AsciiEm => "ascii-em",
            LineStyle::AsciiEmv => "ascii-emv",
            LineStyle::AsciiEmh => "ascii-emh",
        }
    }

    pub fn glyphs(self) -> GlyphPalette {
        let (vertical, branch, corner, dash) = match self {
            LineStyle::Ascii => ("|", "|", "+", "-- "),
            LineStyle::AsciiEx => ("│", "├", "└", "── "),
            LineStyle::AsciiExr => ("│", "├", "╰", "── "),
            LineStyle::AsciiEm => ("║", "╠", "╚", "══ "),
            LineStyle::AsciiEmv => ("║", "╟", "╙", "── "),
            LineStyle::AsciiEmh => ("│", "╞", "╘", "══ "),
        };
        GlyphPalette {
            middle_item: branch,
            last_item: corner,
            item_indent: dash,
            middle_skip: vertical,
            last_skip: " ",
            skip_indent: "   ",
            ..GlyphPalette::new()
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LineStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = LineStyle::ALL.iter().map(|style| style.name()).collect();
                format!("unknown line style '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// Options for [`Tree::render_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub style: LineStyle,
    /// Maximum number of lines before the output is truncated
    pub limit: Option<usize>,
    /// Render only the subtree rooted here
    pub start: Option<NodeId>,
}

impl RenderOptions {
    pub fn style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn start(mut self, start: impl Into<NodeId>) -> Self {
        self.start = Some(start.into());
        self
    }
}

impl<T: fmt::Display> Tree<T> {
    /// Whole forest with default options.
    pub fn render(&self) -> String {
        self.render_from(self.root_indices(), &RenderOptions::default())
    }

    pub fn render_with(&self, options: &RenderOptions) -> TreeResult<String> {
        match &options.start {
            Some(id) => {
                let start = self.index_of(id.as_str())?;
                Ok(self.render_from(&[start], options))
            }
            None => Ok(self.render_from(self.root_indices(), options)),
        }
    }

    /// `termtree` view of the subtree rooted at `id`.
    ///
    /// Built bottom-up, children before their parent.
    pub fn to_termtree(&self, id: &str, style: LineStyle) -> TreeResult<TermTree<String>> {
        let start = self.index_of(id)?;
        let mut built: HashMap<Index, TermTree<String>> = HashMap::new();
        for idx in self.subtree_indices(start).into_iter().rev() {
            let node = self.node(idx);
            let label = if idx == start {
                node.data().to_string()
            } else {
                label_of(node)
            };
            let mut term = TermTree::new(label).with_glyphs(style.glyphs());
            for child in &node.children {
                if let Some(child_term) = built.remove(child) {
                    term.push(child_term);
                }
            }
            built.insert(idx, term);
        }
        built
            .remove(&start)
            .ok_or_else(|| TreeError::NotFound(NodeId::from(id)))
    }

    #[instrument(level = "debug", skip(self))]
    fn render_from(&self, starts: &[Index], options: &RenderOptions) -> String {
        let limit = options.limit.unwrap_or(usize::MAX);
        let mut lines = starts
            .iter()
            .flat_map(|&start| RenderLines::new(self, start, options.style));

        let mut rendered = String::new();
        for line in lines.by_ref().take(limit) {
            rendered.push_str(&line);
            rendered.push('\n');
        }
        if lines.next().is_some() {
            let total: usize = starts
                .iter()
                .map(|&start| self.subtree_indices(start).len())
                .sum();
            rendered.push_str("...\n");
            rendered.push_str(&format!("(truncated, total number of nodes: {})\n", total));
        }
        rendered
    }
}

/// `name: payload` for named nodes, the payload otherwise.
fn label_of<T: fmt::Display>(node: &TreeNode<T>) -> String {
    match node.name() {
        Some(name) => format!("{}: {}", name, node.data()),
        None => node.data().to_string(),
    }
}

/// Lazily drawn lines of one subtree, walked in pre-order with an explicit
/// stack so the depth of the tree never reaches the call stack.
///
/// The start node is drawn without its name.
struct RenderLines<'a, T> {
    tree: &'a Tree<T>,
    glyphs: GlyphPalette,
    /// (node, depth below the start, last among its siblings)
    pending: Vec<(Index, usize, bool)>,
    /// Indentation contributed by each open ancestor level
    indents: Vec<String>,
    /// Continuation lines of a multi-line payload
    buffered: VecDeque<String>,
}

impl<'a, T: fmt::Display> RenderLines<'a, T> {
    fn new(tree: &'a Tree<T>, start: Index, style: LineStyle) -> Self {
        Self {
            tree,
            glyphs: style.glyphs(),
            pending: vec![(start, 0, true)],
            indents: Vec::new(),
            buffered: VecDeque::new(),
        }
    }

    fn draw(&mut self, node: &TreeNode<T>, depth: usize, last: bool) {
        if depth == 0 {
            self.buffered
                .extend(node.data().to_string().split('\n').map(str::to_string));
            return;
        }

        self.indents.truncate(depth - 1);
        let prefix = self.indents.concat();
        let (item, skip) = if last {
            (self.glyphs.last_item, self.glyphs.last_skip)
        } else {
            (self.glyphs.middle_item, self.glyphs.middle_skip)
        };
        let label = label_of(node);
        let mut label_lines = label.split('\n');
        if let Some(first) = label_lines.next() {
            self.buffered
                .push_back(format!("{}{}{}{}", prefix, item, self.glyphs.item_indent, first));
        }
        for line in label_lines {
            self.buffered
                .push_back(format!("{}{}{}{}", prefix, skip, self.glyphs.skip_indent, line));
        }
        self.indents
            .push(format!("{}{}", skip, self.glyphs.skip_indent));
    }
}

impl<T: fmt::Display> Iterator for RenderLines<'_, T> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.buffered.pop_front() {
                return Some(line);
            }
            let (idx, depth, last) = self.pending.pop()?;
            let tree = self.tree;
            let node = tree.node(idx);
            self.draw(node, depth, last);
            let count = node.children.len();
            // push last so the first child is popped first
            self.pending.extend(
                node.children
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(i, &child)| (child, depth + 1, i + 1 == count)),
            );
        }
    }
}

impl<T: fmt::Display> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
