//! Run command handlers
//!
//! Starting runs, fetching their state, and following them to the end.

use agentrun_client::{AgentState, AgentStatus, JobClient};
use agentrun_core::agents::{AgentKind, share_url};
use agentrun_poller::{HttpStateSink, Phase, PollEvent, PollingController, StateSink};
use anyhow::{Context, Result, bail};
use colored::*;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

use crate::config::Config;
use crate::input::parse_input;

/// Start a run, optionally following it
pub async fn start(
    config: &Config,
    agent: &str,
    input: Option<&str>,
    fields: &[String],
    watch: bool,
) -> Result<()> {
    let agent = resolve_agent(agent);
    let input = parse_input(input, fields)?;
    let client = JobClient::new(config.agent(&agent)?);

    if !watch {
        let state = client
            .start_agent(&input)
            .await
            .with_context(|| format!("Failed to start {}", agent))?;

        if let Some(sink) = sink(config, &agent) {
            if let Err(e) = sink.save(&state).await {
                warn!("Failed to save state of run {}: {}", state.run_id, e);
            }
        }

        print_started(config, &agent, &state);
        println!(
            "{}",
            format!("  Follow it with: agentrun watch {} {}", agent, state.run_id).dimmed()
        );
        return Ok(());
    }

    let controller = controller(config, &agent, client);
    let events = controller.subscribe();

    let state = controller
        .start(&input)
        .await
        .with_context(|| format!("Failed to start {}", agent))?;
    print_started(config, &agent, &state);

    follow(&controller, events).await
}

/// Fetch and print the current state of a run
pub async fn status(config: &Config, agent: &str, run_id: &str) -> Result<()> {
    let agent = resolve_agent(agent);
    let client = JobClient::new(config.agent(&agent)?);

    let state = client
        .get_status(run_id)
        .await
        .with_context(|| format!("Failed to get status of run {}", run_id))?;

    if let Some(sink) = sink(config, &agent) {
        if let Err(e) = sink.save(&state).await {
            warn!("Failed to save state of run {}: {}", state.run_id, e);
        }
    }

    print_state(&state);
    println!("  Link:    {}", share_url(&config.site_url, &agent, run_id).cyan());

    Ok(())
}

/// Follow an existing run until it finishes
pub async fn watch(config: &Config, agent: &str, run_id: &str) -> Result<()> {
    let agent = resolve_agent(agent);
    let client = JobClient::new(config.agent(&agent)?);

    let controller = controller(config, &agent, client);
    let events = controller.subscribe();
    controller.attach(run_id)?;

    println!(
        "{}",
        format!("Watching run {} of {}", run_id, agent).bold()
    );
    println!("  Link:    {}", share_url(&config.site_url, &agent, run_id).cyan());
    println!();

    follow(&controller, events).await
}

// =============================================================================
// Helpers
// =============================================================================

/// Known agents are matched case-insensitively; other names pass through
fn resolve_agent(name: &str) -> String {
    match AgentKind::from_name(name) {
        Some(kind) => kind.name().to_string(),
        None => {
            warn!("{} is not a known agent, using it as given", name);
            name.to_string()
        }
    }
}

fn sink(config: &Config, agent: &str) -> Option<Arc<dyn StateSink>> {
    config
        .save_url
        .as_ref()
        .map(|url| Arc::new(HttpStateSink::new(url, agent)) as Arc<dyn StateSink>)
}

fn controller(config: &Config, agent: &str, client: JobClient) -> PollingController {
    let builder = PollingController::builder(client);
    match sink(config, agent) {
        Some(sink) => builder.sink(sink).build(),
        None => builder.build(),
    }
}

/// Prints events until the run is terminal
///
/// Status updates are cumulative, so only the ones not printed yet are shown.
/// Ctrl-C stops watching; the remote run keeps going. Pending saves are
/// written before returning.
async fn follow(controller: &PollingController, events: UnboundedReceiver<PollEvent>) -> Result<()> {
    let result = print_events(controller, events).await;
    controller.flush().await;
    result
}

async fn print_events(
    controller: &PollingController,
    mut events: UnboundedReceiver<PollEvent>,
) -> Result<()> {
    let mut shown = 0;

    loop {
        let event = tokio::select! {
            event = events.recv() => event,
            _ = tokio::signal::ctrl_c() => {
                controller.cancel();
                println!();
                println!("{}", "Stopped watching. The run continues remotely.".yellow());
                return Ok(());
            }
        };

        let Some(event) = event else {
            bail!("Controller stopped without finishing the run");
        };

        match event {
            PollEvent::State(state) => {
                let updates = state.updates();
                for update in updates.iter().skip(shown) {
                    println!("  {} {}", "•".cyan(), update);
                }
                shown = shown.max(updates.len());
            }
            PollEvent::Error(e) => {
                println!("  {} {}", "✗".red(), e.to_string().red());
            }
            PollEvent::Transition { to, .. } => match to {
                Phase::Completed => {
                    println!();
                    println!("{}", "✓ Run completed".green().bold());
                    if let Some(state) = controller.latest() {
                        print_current_state(&state);
                    }
                    return Ok(());
                }
                Phase::Failed => match controller.latest() {
                    Some(state) if state.is_remote_error() => {
                        bail!("Run {} ended with status ERROR", state.run_id)
                    }
                    _ => bail!("Run failed: the agent could not be polled"),
                },
                _ => {}
            },
        }
    }
}

fn print_started(config: &Config, agent: &str, state: &AgentState) {
    println!("{}", format!("✓ Started {}", agent).green());
    println!("  Run ID:  {}", state.run_id.cyan());
    println!("  Status:  {}", colorize_status(state.status));
    println!(
        "  Link:    {}",
        share_url(&config.site_url, agent, &state.run_id).cyan()
    );
    println!();
}

/// Print the full state envelope
fn print_state(state: &AgentState) {
    println!("{}", "Run Details:".bold());
    println!("  Run ID:  {}", state.run_id.cyan());
    if let Some(thread_id) = &state.thread_id {
        println!("  Thread:  {}", thread_id.dimmed());
    }
    if let Some(agent) = &state.agent_name {
        println!("  Agent:   {}", agent);
    }
    println!("  Status:  {}", colorize_status(state.status));

    if let Some(started) = state.start_time {
        println!("  Started: {}", started.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(updated) = state.last_update {
        println!("  Updated: {}", updated.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = state.start_time {
            let seconds = updated.signed_duration_since(started).num_seconds();
            println!("  Elapsed: {}s", seconds);
        }
    }

    let updates = state.updates();
    if !updates.is_empty() {
        println!("\n{}", "Status Updates:".bold());
        for update in updates {
            println!("  {} {}", "•".cyan(), update);
        }
    }

    print_current_state(state);
}

fn print_current_state(state: &AgentState) {
    let empty = match &state.current_state {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return;
    }

    println!("\n{}", "Current State:".bold());
    match serde_json::to_string_pretty(&state.current_state) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{:?}", state.current_state),
    }
}

/// Colorize run status for display
fn colorize_status(status: AgentStatus) -> ColoredString {
    match status {
        AgentStatus::Running => status.as_str().cyan(),
        AgentStatus::Completed => status.as_str().green(),
        AgentStatus::Error => status.as_str().red(),
    }
}
