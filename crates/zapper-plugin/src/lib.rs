//! # zapper-plugin
//!
//! Zapper API integration for the agent runtime: resolves wallet
//! addresses to a formatted net-worth summary, and Farcaster usernames to
//! their linked wallets.
//!
//! ## Actions
//!
//! - `ZAPPER_PORTFOLIO` - portfolio lookup for one or more wallet
//!   addresses extracted from the message
//! - `FARCASTER_PORTFOLIO` - resolves a Farcaster username to wallet
//!   addresses, then hands off to `ZAPPER_PORTFOLIO`
//!
//! ## Usage
//!
//! ```rust,ignore
//! let runtime = AgentRuntime::builder()
//!     .provider(provider)
//!     .setting("ZAPPER_API_KEY", api_key)
//!     .plugin(zapper_plugin::plugin())
//!     .build()?;
//! ```

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod model;

pub use actions::{
    FarcasterPortfolioAction, PortfolioAction, FARCASTER_PORTFOLIO, ZAPPER_PORTFOLIO,
    ZAPPER_PORTFOLIO_RESPONSE,
};
pub use client::{ZapperClient, ZapperGateway, ZAPPER_API_URL};
pub use config::{ZapperConfig, ZAPPER_API_KEY};
pub use error::{Result, ZapperError};

use std::sync::Arc;

use agent_core::Plugin;

/// Build the Zapper plugin against the public API endpoint
pub fn plugin() -> Plugin {
    let client = Arc::new(ZapperClient::new());

    Plugin {
        name: "zapper",
        description: "A plugin for integrating the Zapper API with your application.",
        actions: vec![
            Arc::new(PortfolioAction::with_gateway(client.clone())),
            Arc::new(FarcasterPortfolioAction::with_gateway(client)),
        ],
    }
}
