//! CLI error type.

use thiserror::Error;

use aura_core::{CartError, CheckoutError, StorageError};

use crate::config::ConfigError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Cart(#[from] CartError),

    #[error("{}", .0.user_message())]
    Checkout(#[from] CheckoutError),

    /// Writing command output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
