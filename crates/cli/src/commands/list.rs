use colored::*;
use gantry_core::session::BuildSession;

pub fn execute(session: &BuildSession, include_hidden: bool) {
    let result = session.list_targets(include_hidden);

    println!("{}", "Targets".bold().underline());

    if result.targets.is_empty() {
        println!("  {}", "No targets registered".dimmed());
        return;
    }

    for target in &result.targets {
        let mut line = if target.hidden {
            target.name.dimmed().to_string()
        } else {
            target.name.blue().bold().to_string()
        };
        if target.is_default {
            line = format!("{} {}", line, "(default)".green());
        }
        println!("{}", line);

        if let Some(description) = &target.description {
            println!("  {}", description.dimmed());
        }
        if !target.dependencies.is_empty() {
            println!(
                "  {} {}",
                "depends on:".dimmed(),
                target.dependencies.join(", ")
            );
        }
    }
}
