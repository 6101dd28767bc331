//! Library root for `betty-bot`.
//!
//! Betty is a playful chat persona for Telegram groups. She:
//! - Answers any message that mentions her name, via an OpenAI completion
//! - Optionally reads her answer out loud as a voice note
//! - Tells jokes, gives advice and shares her mood on command
//! - Welcomes new members
//! - Lets admins delete messages with `/delete`
//!
//! The architecture is built around extensible traits that allow for
//! different implementations of the chat and LLM services.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the betty-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the LLM and chat clients
/// - Starts the main event loop for processing messages
pub async fn start(config: Config) -> Void {
    info!("Starting betty-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
