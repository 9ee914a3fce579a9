pub mod error;
pub mod parser;

pub use error::*;
pub use parser::{parse_stack_file, parse_stack_string};

use std::path::PathBuf;

/// Environment variable pointing directly at a stack file
pub const STACK_PATH_ENV: &str = "TERRALOOM_STACK_PATH";

const CANDIDATES: [&str; 4] = ["stack.local.kdl", ".stack.local.kdl", "stack.kdl", ".stack.kdl"];

/// terraloom's config directory (`~/.config/terraloom`), created if missing
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("terraloom");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Find the stack file to build
///
/// Search order:
/// 1. `TERRALOOM_STACK_PATH`
/// 2. current directory: stack.local.kdl, .stack.local.kdl, stack.kdl, .stack.kdl
/// 3. the same names in ./.terraloom/
/// 4. ~/.config/terraloom/stack.kdl
pub fn find_stack_file() -> Result<PathBuf> {
    if let Ok(stack_path) = std::env::var(STACK_PATH_ENV) {
        let path = PathBuf::from(stack_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!("{} points at a missing file: {}", STACK_PATH_ENV, path.display());
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let stack_dir = current_dir.join(".terraloom");
    if stack_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = stack_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_stack = config_dir.join("terraloom").join("stack.kdl");
        if global_stack.exists() {
            return Ok(global_stack);
        }
    }

    Err(ConfigError::StackFileNotFound)
}
