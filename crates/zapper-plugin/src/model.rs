//! Zapper Wire Types
//!
//! Schema-validated shapes of the two GraphQL payloads this plugin
//! consumes. Required fields are required; optional sequences default to
//! empty so a malformed payload fails at the deserialization boundary
//! instead of deep inside formatting.

use rust_decimal::Decimal;
use serde::Deserialize;

/// `data` payload of the portfolio query
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioData {
    pub portfolio: Option<Portfolio>,
}

/// Aggregate holdings for one or more wallet addresses
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default)]
    pub token_balances: Vec<TokenBalance>,

    #[serde(default)]
    pub nft_balances: Vec<NftBalance>,

    pub totals: Totals,
}

/// One token position on one network
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    /// Wallet that holds the balance
    #[serde(default)]
    pub address: Option<String>,

    pub network: String,

    pub token: TokenHolding,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    /// Token quantity (the API serializes this as a string)
    pub balance: Decimal,

    #[serde(rename = "balanceUSD")]
    pub balance_usd: Decimal,

    pub base_token: BaseToken,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseToken {
    pub name: String,
    pub symbol: String,
}

/// NFT value held on one network
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftBalance {
    pub network: String,

    #[serde(rename = "balanceUSD")]
    pub balance_usd: Decimal,
}

/// Portfolio-wide USD totals
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total: Decimal,

    #[serde(rename = "totalWithNFT")]
    pub total_with_nft: Decimal,

    #[serde(default)]
    pub total_by_network: Vec<NetworkTotal>,

    /// Category breakdown, part of the wire contract but unused by
    /// formatting
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTotal {
    pub network: String,
    pub total: Decimal,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub label: String,

    #[serde(rename = "balanceUSD")]
    pub balance_usd: Decimal,

    pub pct: Decimal,
}

/// `data` payload of the Farcaster profile query
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterData {
    pub farcaster_profile: Option<FarcasterProfile>,
}

/// A Farcaster social identity with its linked wallets
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterProfile {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub fid: Option<u64>,

    #[serde(default)]
    pub metadata: Option<FarcasterMetadata>,

    #[serde(default)]
    pub connected_addresses: Vec<String>,

    #[serde(default)]
    pub custody_address: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterMetadata {
    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub warpcast: Option<String>,
}
