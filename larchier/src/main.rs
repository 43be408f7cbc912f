//! Larchier: a command-line Minecraft launcher.
//!
//! Every command takes its input as arguments, see `larchier --help`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lr_core::{err, LauncherConfig};

mod commands;

#[derive(Parser)]
#[command(name = "larchier", version)]
#[command(about = "A command-line Minecraft launcher", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Install a new instance
    Add {
        /// Name of the instance
        name: String,
        /// Game version, eg. 1.20.4 or 24w14a
        version: String,
        /// Install into this existing folder
        /// instead of `instances/<name>/`
        #[arg(long)]
        game_path: Option<PathBuf>,
        /// Launch with this Java binary instead of
        /// a managed runtime
        #[arg(long)]
        java: Option<PathBuf>,
        #[command(flatten)]
        settings: commands::Settings,
    },
    /// Launch an instance with the profile in use
    Launch {
        name: String,
    },
    /// Show or change the launch settings of an instance
    Config {
        name: String,
        #[command(flatten)]
        settings: commands::Settings,
    },
    /// Manage offline profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Remove an instance
    Remove {
        name: String,
        /// Also delete the game folder
        #[arg(long)]
        delete_data: bool,
    },
    /// List installed instances
    List,
    /// List versions available to install
    Versions {
        /// Only this type of version (release, snapshot, old_beta, old_alpha)
        #[arg(long = "type")]
        version_type: Option<String>,
        /// Only show the latest release and snapshot
        #[arg(long, conflicts_with = "version_type")]
        latest: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Add a profile. The first one added is used by default
    Add {
        username: String,
        /// A fixed UUID, random otherwise
        #[arg(long)]
        uuid: Option<String>,
    },
    /// Delete a profile
    Remove {
        username: String,
    },
    /// Select the profile used for launching
    Use {
        username: String,
    },
    /// List profiles, marking the one in use
    List,
}

fn main() {
    let args = Args::parse();

    let config = match LauncherConfig::load() {
        Ok(n) => n,
        Err(error) => {
            err!("{error}");
            std::process::exit(1);
        }
    };
    lr_core::logger_init(&config.launcher_dir);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(n) => n,
        Err(error) => {
            err!("Could not start async runtime: {error}");
            lr_core::logger_finish();
            std::process::exit(1);
        }
    };

    let code = match runtime.block_on(run(args.command, &config)) {
        Ok(()) => 0,
        Err(error) => {
            err!("{error}");
            1
        }
    };
    lr_core::logger_finish();
    std::process::exit(code);
}

async fn run(command: Command, config: &LauncherConfig) -> Result<(), commands::CliError> {
    match command {
        Command::Add {
            name,
            version,
            game_path,
            java,
            settings,
        } => commands::cmd_add(config, name, version, game_path, java, &settings).await,
        Command::Launch { name } => commands::cmd_launch(config, &name).await,
        Command::Config { name, settings } => commands::cmd_config(config, &name, &settings).await,
        Command::Profile { command } => match command {
            ProfileCommand::Add { username, uuid } => {
                commands::cmd_profile_add(config, &username, uuid.as_deref()).await
            }
            ProfileCommand::Remove { username } => {
                commands::cmd_profile_remove(config, &username).await
            }
            ProfileCommand::Use { username } => commands::cmd_profile_use(config, &username).await,
            ProfileCommand::List => commands::cmd_profile_list(config).await,
        },
        Command::Remove { name, delete_data } => {
            commands::cmd_remove(config, &name, delete_data).await
        }
        Command::List => commands::cmd_list_instances(config).await,
        Command::Versions {
            version_type,
            latest,
        } => {
            if latest {
                commands::cmd_latest_versions(config).await
            } else {
                commands::cmd_list_available_versions(config, version_type.as_deref()).await
            }
        }
    }
}
