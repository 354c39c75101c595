//! Aura CLI library.
//!
//! A terminal shopper for the Aura storefront: browse the catalog, keep a
//! cart and favorites on disk, and hand off to hosted checkout through the
//! storefront service.
//!
//! # Modules
//!
//! - [`config`] - Global flags with environment fallbacks
//! - [`storage`] - File-backed [`aura_core::StateStorage`]
//! - [`checkout`] - Storefront checkout client
//! - [`commands`] - Command implementations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod commands;
pub mod config;
pub mod error;
pub mod storage;

pub use checkout::{CheckoutClient, Redirects};
pub use config::{CliConfig, ConfigArgs};
pub use error::CliError;
pub use storage::FileStorage;
