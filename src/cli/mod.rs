//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the codec.

pub mod crypt;
pub mod setup;

pub use crypt::{handle_decrypt, handle_encrypt};
pub use setup::{handle_config, handle_init};
