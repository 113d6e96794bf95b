//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{LineStyle, Order};

/// Show, walk and browse tree-shaped documents (JSON, TOML)
#[derive(Parser, Debug)]
#[command(name = "lighttree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -d -d, -d -d -d)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Directory holding the local .lighttree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a document as a tree
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Glyph set (ascii, ascii-ex, ascii-exr, ascii-em, ascii-emv, ascii-emh)
        #[arg(short, long)]
        style: Option<LineStyle>,

        /// Truncate after this many lines
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only render the subtree at this path
        #[arg(short, long)]
        from: Option<String>,
    },

    /// Print the path and value of every node
    Walk {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Traversal order
        #[arg(short, long, value_enum, default_value_t = OrderArg::Pre)]
        order: OrderArg,

        /// Only walk the subtree at this path
        #[arg(short, long)]
        from: Option<String>,

        /// Visit children last to first
        #[arg(short, long)]
        reverse: bool,
    },

    /// Print the paths of all leaves
    Leaves {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the sub-document at a path as JSON
    Get {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Node path, e.g. a.b.0 (empty for the root, `\` escapes the separator)
        path: String,
    },

    /// Explore a document interactively with tab completion
    Browse {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config instead of ./.lighttree.toml
        #[arg(short, long)]
        global: bool,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    Pre,
    Post,
    Breadth,
}

impl From<OrderArg> for Order {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Pre => Order::PreOrder,
            OrderArg::Post => Order::PostOrder,
            OrderArg::Breadth => Order::BreadthFirst,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_show_with_style_when_parsed_then_style_set() {
        let cli = Cli::try_parse_from(["lighttree", "show", "t.json", "--style", "ascii-em", "-l", "3"]).unwrap();
        match cli.command {
            Some(Commands::Show { style, limit, .. }) => {
                assert_eq!(style, Some(LineStyle::AsciiEm));
                assert_eq!(limit, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn given_repeated_debug_flag_when_parsed_then_counted() {
        let cli = Cli::try_parse_from(["lighttree", "-d", "-d", "leaves", "t.json"]).unwrap();
        assert_eq!(cli.debug, 2);
    }
}
