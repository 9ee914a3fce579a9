pub mod synth;
pub mod validate;

use anyhow::Context;
use colored::Colorize;
use std::path::PathBuf;
use terraloom_alicloud::TopologyBuilder;
use terraloom_config::{find_stack_file, parse_stack_file};

/// Locate, parse and build the stack
pub(crate) fn build_stack(file: Option<PathBuf>) -> anyhow::Result<TopologyBuilder> {
    let path = match file {
        Some(path) => path,
        None => find_stack_file()?,
    };
    println!("{} {}", "Stack file:".dimmed(), path.display());

    let stack = parse_stack_file(&path)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let builder = stack
        .build()
        .with_context(|| format!("Failed to build stack '{}'", stack.name))?;

    Ok(builder)
}

pub(crate) fn print_summary(builder: &TopologyBuilder) {
    let summary = builder.graph().summary();
    println!(
        "{} {}",
        builder.graph().stack().cyan().bold(),
        format!("({} declarations)", summary.total).dimmed()
    );
    for (type_name, count) in &summary.by_type {
        println!("  {:<28} {}", type_name, count);
    }
}
