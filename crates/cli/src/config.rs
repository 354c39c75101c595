//! CLI configuration.
//!
//! Every setting is a global flag with an environment variable fallback,
//! so `.env` files (loaded via `dotenvy`) work the same as flags.
//!
//! # Environment Variables
//!
//! - `AURA_DATA_DIR` - Directory holding persisted cart and favorites (default: .aura)
//! - `AURA_STOREFRONT_URL` - Storefront service root (default: <http://127.0.0.1:3000>)
//! - `AURA_CHECKOUT_TIMEOUT_SECS` - Checkout request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

/// Global CLI options.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Directory holding persisted cart and favorites
    #[arg(long, global = true, env = "AURA_DATA_DIR", default_value = ".aura")]
    pub data_dir: PathBuf,

    /// Storefront service root URL
    #[arg(
        long,
        global = true,
        env = "AURA_STOREFRONT_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    pub storefront_url: String,

    /// Checkout request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "AURA_CHECKOUT_TIMEOUT_SECS",
        default_value_t = 30
    )]
    pub checkout_timeout_secs: u64,
}

/// Validated CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub storefront_url: Url,
    pub checkout_timeout: Duration,
}

impl TryFrom<ConfigArgs> for CliConfig {
    type Error = ConfigError;

    fn try_from(args: ConfigArgs) -> Result<Self, Self::Error> {
        let storefront_url = Url::parse(&args.storefront_url)
            .map_err(|e| ConfigError::Invalid("AURA_STOREFRONT_URL", e.to_string()))?;
        if !matches!(storefront_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(
                "AURA_STOREFRONT_URL",
                format!("unsupported scheme '{}'", storefront_url.scheme()),
            ));
        }
        if args.checkout_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "AURA_CHECKOUT_TIMEOUT_SECS",
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            data_dir: args.data_dir,
            storefront_url,
            checkout_timeout: Duration::from_secs(args.checkout_timeout_secs),
        })
    }
}
