//! Command dispatch: one handler per subcommand

use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::load_json_tree;
use crate::cli::args::{Cli, Commands, ConfigCommands, OrderArg};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::shell::{run_shell, Shell};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{JsonTree, LineStyle, Order, RenderOptions, TreeBrowser};
use crate::infrastructure::{InfraError, SkimSelector};

/// Execute the parsed command line with the effective settings.
pub fn execute_command(cli: &Cli, settings: &Settings, local_dir: &Path) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show {
            file,
            style,
            limit,
            from,
        }) => cmd_show(settings, file, *style, *limit, from.as_deref()),
        Some(Commands::Walk {
            file,
            order,
            from,
            reverse,
        }) => cmd_walk(settings, file, *order, from.as_deref(), *reverse),
        Some(Commands::Leaves { file }) => cmd_leaves(settings, file),
        Some(Commands::Get { file, path }) => cmd_get(settings, file, path),
        Some(Commands::Browse { file }) => cmd_browse(settings, file),
        Some(Commands::Config { command }) => cmd_config(settings, command, local_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

fn load(settings: &Settings, file: &Path) -> CliResult<JsonTree> {
    Ok(load_json_tree(file, &settings.path_separator)?)
}

/// Resolves an optional `--from` path to a node id.
fn start_id(tree: &JsonTree, from: Option<&str>) -> CliResult<Option<String>> {
    match from {
        Some(path) => Ok(Some(tree.id_by_path(path)?.to_string())),
        None => Ok(None),
    }
}

#[instrument(level = "debug", skip(settings))]
fn cmd_show(
    settings: &Settings,
    file: &Path,
    style: Option<LineStyle>,
    limit: Option<usize>,
    from: Option<&str>,
) -> CliResult<()> {
    let tree = load(settings, file)?;
    let mut options = RenderOptions::default()
        .style(style.unwrap_or(settings.line_style))
        .limit(limit.or(settings.limit));
    if let Some(id) = start_id(&tree, from)? {
        options = options.start(id);
    }
    print!("{}", tree.render_with(&options)?);
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_walk(settings: &Settings, file: &Path, order: OrderArg, from: Option<&str>, reverse: bool) -> CliResult<()> {
    let tree = load(settings, file)?;
    let order = Order::from(order);
    let mut traversal = match start_id(&tree, from)? {
        Some(id) => tree.traverse_from(&id, order)?,
        None => tree.traverse(order),
    };
    if reverse {
        traversal = traversal.reverse();
    }
    for node in traversal {
        let path = tree.path(node.id().as_str())?;
        output::entry(&path, node.data());
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_leaves(settings: &Settings, file: &Path) -> CliResult<()> {
    let tree = load(settings, file)?;
    for id in tree.leaves_ids(None)? {
        output::info(&tree.path(id.as_str())?);
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_get(settings: &Settings, file: &Path, path: &str) -> CliResult<()> {
    let tree = load(settings, file)?;
    let id = tree.id_by_path(path)?;
    let value = tree.value_at(id.as_str())?;
    let pretty = serde_json::to_string_pretty(&value).map_err(|e| CliError::Usage(format!("cannot print value: {}", e)))?;
    output::info(&pretty);
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_browse(settings: &Settings, file: &Path) -> CliResult<()> {
    let tree = load(settings, file)?;
    let browser = TreeBrowser::new(&tree)
        .with_name(settings.repr_name.clone())
        .coerce_attrs(settings.coerce_attrs);
    let render = RenderOptions::default()
        .style(settings.line_style)
        .limit(settings.limit);
    let selector = SkimSelector;
    let mut shell = Shell::new(browser, render, &selector);
    run_shell(&mut shell, settings.history_file.as_deref())
}

fn cmd_config(settings: &Settings, command: &ConfigCommands, local_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path()
                    .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?
            } else {
                local_config_path(local_dir)
            };
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
            }
            fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            debug!(path = %path.display(), "config template written");
            output::action("Created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", &"(unavailable)"),
            }
            output::action("local", &local_config_path(local_dir).display());
            Ok(())
        }
    }
}
