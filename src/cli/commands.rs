//! Command dispatch: each subcommand loads trees into arenas and runs one
//! structural operation on them.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{load_tree, write_tree};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{NodeArena, NodeId, SubtreeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = effective_settings(cli)?;
    match &cli.command {
        Some(Commands::Size { file }) => cmd_size(&settings, file),
        Some(Commands::Show { file }) => cmd_show(&settings, file),
        Some(Commands::Copy { file, output }) => cmd_copy(&settings, file, output.as_deref()),
        Some(Commands::Assign {
            dest,
            source,
            output,
        }) => cmd_assign(&settings, dest, source, output.as_deref()),
        Some(Commands::Config { command }) => cmd_config(&settings, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage("no command given, see --help".to_string())),
    }
}

/// Config layers plus the `--max-nodes` flag on top.
fn effective_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(max_nodes) = cli.max_nodes {
        settings.arena.max_nodes = Some(max_nodes);
    }
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn load(settings: &Settings, file: &Path) -> CliResult<(NodeArena<String>, Option<NodeId>)> {
    let mut arena = settings.arena.new_arena();
    let root = load_tree(file, &mut arena)?;
    Ok((arena, root))
}

/// Show the subtree or write it to `output`.
fn emit(arena: &NodeArena<String>, root: Option<NodeId>, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            write_tree(path, arena, root)?;
            output::success(&format!("written to {}", path.display()));
        }
        None => output::info(&arena.to_tree_string(root)),
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_size(settings: &Settings, file: &Path) -> CliResult<()> {
    let (arena, root) = load(settings, file)?;
    output::info(&arena.size(root));
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_show(settings: &Settings, file: &Path) -> CliResult<()> {
    let (arena, root) = load(settings, file)?;
    output::info(&arena.to_tree_string(root));
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_copy(settings: &Settings, file: &Path, output: Option<&Path>) -> CliResult<()> {
    let (mut arena, root) = load(settings, file)?;
    let copied = arena.copy(root)?;
    debug!(original = ?root, ?copied, "copied tree");
    emit(&arena, copied, output)
}

#[instrument(skip(settings))]
fn cmd_assign(
    settings: &Settings,
    dest: &Path,
    source: &Path,
    output: Option<&Path>,
) -> CliResult<()> {
    let (mut dest_arena, mut dest_root) = load(settings, dest)?;
    let (source_arena, source_root) = load(settings, source)?;

    let report = dest_arena.assign_from(&mut dest_root, &source_arena, source_root)?;

    output::header("assign");
    output::action("reused", &report.reused);
    output::action("allocated", &report.allocated);
    output::action("cleared", &report.cleared);
    emit(&dest_arena, dest_root, output)
}

fn cmd_config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "no config directory on this platform".to_string(),
                ))
            }
        },
    }
    Ok(())
}
