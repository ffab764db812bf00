mod exit_codes;
mod format;

pub use exit_codes::get_exit_code;
pub use format::format_error_chain;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Unsupported OS: {0}. Currently only Windows and POSIX-like systems are supported")]
    UnsupportedPlatform(String),

    #[error("Could not find runtime directory matching {pattern}")]
    RuntimeNotFound { pattern: String },

    #[error("Failed to rewrite runtime configuration: {0}")]
    ConfigRewrite(String),

    #[error("Prerequisite installation failed: {0}")]
    PrerequisiteInstall(String),

    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Configuration file error: {0}")]
    ConfigFile(String),

    #[error("System error: {0}")]
    SystemError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
