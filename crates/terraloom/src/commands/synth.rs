use super::{build_stack, print_summary};
use colored::Colorize;
use std::path::{Path, PathBuf};
use terraloom_graph::TerraformJson;

pub fn handle(file: Option<PathBuf>, out: &Path) -> anyhow::Result<()> {
    let builder = build_stack(file)?;
    print_summary(&builder);

    let artifact = builder.synthesize(&TerraformJson::new())?;
    let path = artifact.write_to(out)?;

    println!("{} {}", "✓ Synthesized".green().bold(), path.display());
    Ok(())
}
