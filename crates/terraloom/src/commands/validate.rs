use super::{build_stack, print_summary};
use colored::Colorize;
use std::path::PathBuf;

pub fn handle(file: Option<PathBuf>) -> anyhow::Result<()> {
    let builder = build_stack(file)?;
    print_summary(&builder);

    println!("{}", "✓ Stack is valid".green().bold());
    Ok(())
}
