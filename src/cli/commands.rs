//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{TreeNodeConvert, TreeSortType};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config {
            command: ConfigCommands::Path,
        }) => {
            match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::warning("no config directory available on this platform"),
            }
            Ok(())
        }
        Some(command) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let container = ServiceContainer::new(settings)?;
            match command {
                Commands::Tree { file, sort } => cmd_tree(&container, file, *sort),
                Commands::Check { file } => cmd_check(&container, file),
                Commands::Config {
                    command: ConfigCommands::Show,
                } => cmd_config_show(&container),
                Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
            }
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: &Path, sort: Option<TreeSortType>) -> CliResult<()> {
    let sort = sort.unwrap_or(container.settings.default_sort);
    debug!("sort: {}", sort);
    let source = container.loader.load(file)?;
    let tree = container.navigation.sorted_tree(source, sort);
    output::info(&tree.to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let source = container.loader.load(file)?;
    if container.navigation.has_temporal_data(&source) {
        output::success(&format!("{}: navigation dates found", file.display()));
    } else {
        output::warning(&format!(
            "{}: no navigation dates, date grouping would keep the source tree",
            file.display()
        ));
    }
    Ok(())
}

fn cmd_config_show(container: &ServiceContainer) -> CliResult<()> {
    output::header("Effective settings");
    output::info(&container.settings.to_toml()?);
    Ok(())
}
