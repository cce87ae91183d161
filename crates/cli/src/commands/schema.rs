use anyhow::Result;
use gantry_core::configs::buildfile_schema;

pub fn execute() -> Result<()> {
    let schema = buildfile_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
