use anyhow::Result;
use colored::*;
use gantry_core::session::BuildSession;

pub fn execute(session: &BuildSession, targets: &[String]) -> Result<i32> {
    if targets.is_empty() {
        println!("{}", "Running default target".bold());
    } else {
        println!("{} {}", "Running targets".bold(), targets.join(", ").cyan());
    }
    println!();

    let result = session
        .run_targets(targets)
        .map_err(|e| anyhow::anyhow!("Run failed: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        format!("All targets completed (result {})", result)
            .green()
            .bold()
    );

    Ok(result)
}
