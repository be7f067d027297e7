//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod agents;
mod run;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List known agents
    Agents,
    /// Start a run
    Start {
        /// Agent name, e.g. college-agent
        agent: String,

        /// Job input as a JSON object
        #[arg(short, long)]
        input: Option<String>,

        /// Input field as key=value; repeatable, overrides --input
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Follow the run until it finishes
        #[arg(short, long)]
        watch: bool,
    },
    /// Fetch the current state of a run once
    Status {
        agent: String,
        run_id: String,
    },
    /// Follow an existing run until it finishes
    Watch {
        agent: String,
        run_id: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure; a run that ends in failure is an error
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Agents => agents::list_agents(),
        Commands::Start {
            agent,
            input,
            fields,
            watch,
        } => run::start(config, &agent, input.as_deref(), &fields, watch).await,
        Commands::Status { agent, run_id } => run::status(config, &agent, &run_id).await,
        Commands::Watch { agent, run_id } => run::watch(config, &agent, &run_id).await,
    }
}
