//! Agent listing

use agentrun_core::agents::AgentKind;
use anyhow::Result;
use colored::*;

pub fn list_agents() -> Result<()> {
    println!("{}", format!("{} known agent(s):", AgentKind::ALL.len()).bold());
    println!();

    for kind in AgentKind::ALL {
        println!("  {} {}", "▸".cyan(), kind.name().bold());
        println!("    {}", kind.description());
        println!("    Tool page: {}", format!("/tools/{}", kind.tool_path()).dimmed());
        println!();
    }

    Ok(())
}
