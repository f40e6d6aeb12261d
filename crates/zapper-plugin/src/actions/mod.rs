//! Zapper Actions
//!
//! Two host-dispatched request handlers: portfolio lookup by wallet
//! address, and portfolio lookup by Farcaster username (which resolves
//! the username to wallets and hands off to the first).

pub mod farcaster;
pub mod portfolio;

pub use farcaster::FarcasterPortfolioAction;
pub use portfolio::PortfolioAction;

/// Action name for the wallet-address portfolio lookup
pub const ZAPPER_PORTFOLIO: &str = "ZAPPER_PORTFOLIO";

/// Action name for the Farcaster username portfolio lookup
pub const FARCASTER_PORTFOLIO: &str = "FARCASTER_PORTFOLIO";

/// Tag on the memory record carrying a finished portfolio report
pub const ZAPPER_PORTFOLIO_RESPONSE: &str = "ZAPPER_PORTFOLIO_RESPONSE";

/// Content attachment key for a resolved wallet address list
pub(crate) const ADDRESSES_KEY: &str = "addresses";
