use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error(
        "Stack file not found. Checked:\n\
        - current directory: stack.local.kdl, .stack.local.kdl, stack.kdl, .stack.kdl\n\
        - ./.terraloom/ directory\n\
        - ~/.config/terraloom/stack.kdl\n\
        Set TERRALOOM_STACK_PATH to point at a file directly"
    )]
    StackFileNotFound,

    #[error("KDL parse error: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
