//! Interactive tree browser: a small command shell over a [`TreeBrowser`].

use std::fmt::Display;
use std::path::Path;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::{debug, instrument};

use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::domain::{Order, RenderOptions, TreeBrowser};
use crate::infrastructure::{InfraError, SelectionItem, Selector};

pub const SHELL_COMMANDS: [&str; 8] = ["cd", "exit", "find", "help", "ls", "pwd", "quit", "show"];

const HELP: &str = "\
ls            list child attributes
cd [PATH]     move to a child (a/b/i0), '..' for the parent, '/' or nothing for the top
pwd           print the path of the current node
show [N]      render the current subtree, at most N lines
find          pick any node below the current one with fuzzy search
help          this text
exit, quit    leave the browser";

/// Result of one shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    /// Text to print, possibly empty
    Output(String),
    Exit,
}

pub struct Shell<'a, T> {
    browser: TreeBrowser<'a, T>,
    render: RenderOptions,
    selector: &'a dyn Selector,
}

impl<'a, T: Display> Shell<'a, T> {
    pub fn new(browser: TreeBrowser<'a, T>, render: RenderOptions, selector: &'a dyn Selector) -> Self {
        Self {
            browser,
            render,
            selector,
        }
    }

    pub fn browser(&self) -> &TreeBrowser<'a, T> {
        &self.browser
    }

    pub fn prompt(&self) -> String {
        let path = self.browser.path();
        let location = if self.browser.is_top() { "/" } else { path.as_str() };
        format!("lighttree:{}> ", location)
    }

    /// Runs one input line. Tree errors (unknown attributes and the like)
    /// are returned so the caller can report them and keep going.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, line: &str) -> CliResult<ShellOutcome> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(ShellOutcome::Output(String::new()));
        };
        let argument = words.next();

        match command {
            "ls" => Ok(ShellOutcome::Output(self.browser.attrs().join("\n"))),
            "cd" => {
                self.browser = match argument {
                    Some(target) => self.browser.resolve(target)?,
                    None => self.browser.to_top(),
                };
                Ok(ShellOutcome::Output(String::new()))
            }
            "pwd" => {
                let path = self.browser.path();
                Ok(ShellOutcome::Output(if path.is_empty() { "/".to_string() } else { path }))
            }
            "show" => {
                let mut options = self.render.clone();
                if let Some(limit) = argument {
                    let limit = limit
                        .parse::<usize>()
                        .map_err(|_| CliError::InvalidArgs(format!("not a line count: {}", limit)))?;
                    options.limit = Some(limit);
                }
                let shown = self.browser.show(&options)?;
                Ok(ShellOutcome::Output(shown.trim_end().to_string()))
            }
            "find" => self.find(),
            "help" => Ok(ShellOutcome::Output(HELP.to_string())),
            "exit" | "quit" => Ok(ShellOutcome::Exit),
            other => Err(CliError::Usage(format!(
                "unknown command '{}', try 'help'",
                other
            ))),
        }
    }

    /// Lets the selector pick a node below the cursor and moves there.
    fn find(&mut self) -> CliResult<ShellOutcome> {
        let tree = self.browser.tree();
        let nodes: Vec<_> = match self.browser.node() {
            Some(node) => tree.traverse_from(node.id().as_str(), Order::PreOrder)?.collect(),
            None => tree.iter().collect(),
        };
        let items: Vec<SelectionItem> = nodes
            .into_iter()
            .map(|node| {
                let path = tree.path(node.id().as_str()).unwrap_or_default();
                let location = if path.is_empty() { "/".to_string() } else { path };
                SelectionItem::new(format!("{}  {}", location, node.data()), node.id().as_str())
            })
            .collect();

        let selected = self
            .selector
            .select_one(&items, "node> ")
            .map_err(|message| InfraError::Selection { message })?;
        match selected {
            Some(item) => {
                debug!(id = %item.value, "selected");
                self.browser = self.browser.at(&item.value)?;
                Ok(ShellOutcome::Output(self.browser.path()))
            }
            None => Ok(ShellOutcome::Output(String::new())),
        }
    }
}

/// Completion of the word before `pos`: command names for the first word,
/// child attributes (relative to an optional `a/b/` prefix) afterwards.
///
/// Returns the byte offset where the replacement starts and the candidates.
pub fn complete_line<T>(browser: &TreeBrowser<'_, T>, line: &str, pos: usize) -> (usize, Vec<String>) {
    let head = &line[..pos];
    let start = head.rfind(' ').map_or(0, |i| i + 1);
    let word = &head[start..];

    if head[..start].trim().is_empty() {
        let commands = SHELL_COMMANDS
            .iter()
            .filter(|command| command.starts_with(word))
            .map(|command| command.to_string())
            .collect();
        return (start, commands);
    }

    let (dir, partial, offset) = match word.rfind('/') {
        Some(i) => (&word[..=i], &word[i + 1..], start + i + 1),
        None => ("", word, start),
    };
    let base = if dir.is_empty() {
        Ok(browser.clone())
    } else {
        browser.resolve(dir)
    };
    match base {
        Ok(base) => (offset, base.completions(partial)),
        Err(_) => (offset, Vec::new()),
    }
}

/// Line editor helper completing against the browser position.
pub struct ShellHelper<'a, T> {
    browser: TreeBrowser<'a, T>,
}

impl<'a, T> ShellHelper<'a, T> {
    pub fn new(browser: TreeBrowser<'a, T>) -> Self {
        Self { browser }
    }

    pub fn follow(&mut self, browser: &TreeBrowser<'a, T>) {
        self.browser = browser.clone();
    }
}

impl<T> Completer for ShellHelper<'_, T> {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = complete_line(&self.browser, line, pos);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl<T> Hinter for ShellHelper<'_, T> {
    type Hint = String;
}

impl<T> Highlighter for ShellHelper<'_, T> {}

impl<T> Validator for ShellHelper<'_, T> {}

impl<T> Helper for ShellHelper<'_, T> {}

/// Reads commands until `exit` or end of input.
pub fn run_shell<T: Display>(shell: &mut Shell<'_, T>, history: Option<&Path>) -> CliResult<()> {
    let line_editor_err = |e: ReadlineError| InfraError::LineEditor {
        message: e.to_string(),
    };
    let mut editor: Editor<ShellHelper<'_, T>, DefaultHistory> = Editor::new().map_err(line_editor_err)?;
    editor.set_helper(Some(ShellHelper::new(shell.browser().clone())));
    if let Some(path) = history {
        if editor.load_history(path).is_err() {
            debug!(path = %path.display(), "no history loaded");
        }
    }

    output::header(&shell.browser().header());
    loop {
        if let Some(helper) = editor.helper_mut() {
            helper.follow(shell.browser());
        }
        match editor.readline(&shell.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.as_str()).map_err(line_editor_err)?;
                }
                match shell.execute(&line) {
                    Ok(ShellOutcome::Output(text)) if text.is_empty() => {}
                    Ok(ShellOutcome::Output(text)) => output::info(&text),
                    Ok(ShellOutcome::Exit) => break,
                    Err(e) => output::error(&e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(line_editor_err(e).into()),
        }
    }

    if let Some(path) = history {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
        }
        editor.save_history(path).map_err(line_editor_err)?;
    }
    Ok(())
}
