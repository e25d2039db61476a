use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sup", about = "package lifecycle manager for hardware build artifacts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a package manifest
    Check {
        /// Path to the `<name>.pkg.json` manifest
        #[arg(env = "MANIFEST")]
        manifest: PathBuf,
    },
    /// Publish a package into a registry
    Publish {
        /// Path to the `<name>.pkg.json` manifest
        #[arg(env = "MANIFEST")]
        manifest: PathBuf,
        /// Registry directory to publish into
        #[arg(long, env = "REGISTRY")]
        registry: PathBuf,
    },
    /// Rebuild a registry's lookup index
    Index {
        /// Registry directory to index
        #[arg(long, env = "REGISTRY")]
        registry: PathBuf,
    },
    /// Install a package by name from an indexed registry
    Install {
        /// Package reference, `name` or `name@version`
        #[arg(env = "PACKAGE")]
        package: String,
        /// Registry directory to install from
        #[arg(long, env = "REGISTRY")]
        registry: Option<PathBuf>,
    },
    /// Show metadata for an installed or available package
    Show {
        /// Package reference, `name` or `name@version`
        #[arg(env = "PACKAGE")]
        package: String,
        /// Registry to consult for packages that are not installed
        #[arg(long, env = "REGISTRY")]
        registry: Option<PathBuf>,
    },
    /// List installed packages
    List,
    /// Remove an installed package
    Uninstall {
        /// Package reference, `name` or `name@version`
        #[arg(env = "PACKAGE")]
        package: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Check { manifest } => sup_cli::commands::check::run_check(&manifest),
        Commands::Publish { manifest, registry } => {
            sup_cli::commands::publish::run_publish(&manifest, &registry)
        }
        Commands::Index { registry } => sup_cli::commands::index::run_index(&registry),
        Commands::Install { package, registry } => {
            sup_cli::commands::install::run_install(&package, registry)
        }
        Commands::Show { package, registry } => {
            sup_cli::commands::show::run_show(&package, registry)
        }
        Commands::List => sup_cli::commands::list::run_list(),
        Commands::Uninstall { package } => sup_cli::commands::uninstall::run_uninstall(&package),
    }
}
