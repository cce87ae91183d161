use anyhow::Result;
use colored::*;
use gantry_core::session::BuildSession;

pub fn execute(session: &BuildSession, target: &str) -> Result<()> {
    println!("{} {}", "Execution plan for".bold(), target.cyan());

    let plan = session
        .execution_plan(target)
        .map_err(|e| anyhow::anyhow!("Failed to get execution plan: {}", e))?;

    println!("\n{}:", "Execution order".bold());
    for (i, name) in plan.order.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }

    Ok(())
}
