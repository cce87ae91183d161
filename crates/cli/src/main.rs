use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gantry_core::session::BuildSession;

mod commands;

/// Gantry - A programmable build and deployment orchestrator
#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "A programmable build and deployment orchestration tool")]
#[command(version)]
struct Cli {
    /// Path to the buildfile
    #[arg(short, long, default_value = "gantry.yml")]
    buildfile: PathBuf,

    /// Show diagnostic output while running
    #[arg(short, long)]
    verbose: bool,

    /// Set a context property (KEY=VALUE); may be repeated
    #[arg(long = "set", value_name = "KEY=VALUE")]
    properties: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run targets and their dependencies (the default target when none given)
    Run {
        /// Target names to run, in order
        targets: Vec<String>,
    },
    /// List registered targets
    List {
        /// Include hidden targets
        #[arg(long)]
        all: bool,
    },
    /// Show the execution order for a target without running it
    Plan {
        /// Target to plan
        target: String,
    },
    /// Show the target dependency graph
    Graph,
    /// Print the JSON schema of the buildfile format
    Schema,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // The schema command describes the format itself; it needs no buildfile.
    if matches!(cli.command, Commands::Schema) {
        commands::schema::execute()?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut session = BuildSession::from_buildfile_path(&cli.buildfile)
        .map_err(|e| anyhow::anyhow!("Failed to load buildfile '{}': {}", cli.buildfile.display(), e))?;
    session.set_verbose(cli.verbose);
    for property in &cli.properties {
        let (key, value) = property
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid property '{}': expected KEY=VALUE", property))?;
        session.set_property(key, value);
    }

    // Execute command (CLI layer only handles presentation)
    match cli.command {
        Commands::Run { targets } => {
            let result = commands::run::execute(&session, &targets)?;
            Ok(ExitCode::from(u8::try_from(result.clamp(0, 255)).unwrap_or(1)))
        }
        Commands::List { all } => {
            commands::list::execute(&session, all);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Plan { target } => {
            commands::plan::execute(&session, &target)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Graph => {
            commands::graph::execute(&session)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Schema => Ok(ExitCode::SUCCESS),
    }
}
