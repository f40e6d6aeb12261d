//! Zapper GraphQL Client
//!
//! Single fixed endpoint, two query shapes, one POST per handler call.
//! The gateway trait is the seam the actions depend on; the HTTP client
//! is its production implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ZapperConfig;
use crate::error::{Result, ZapperError};
use crate::model::{FarcasterData, FarcasterProfile, Portfolio, PortfolioData};

/// Public Zapper GraphQL endpoint
pub const ZAPPER_API_URL: &str = "https://public.zapper.xyz/graphql";

const PORTFOLIO_QUERY: &str = r#"
    query Portfolio($addresses: [Address!]!) {
        portfolio(addresses: $addresses) {
            tokenBalances {
                address
                network
                token {
                    balance
                    balanceUSD
                    baseToken {
                        name
                        symbol
                    }
                }
            }
            nftBalances {
                network
                balanceUSD
            }
            totals {
                total
                totalWithNFT
                totalByNetwork {
                    network
                    total
                }
                holdings {
                    label
                    balanceUSD
                    pct
                }
            }
        }
    }
"#;

const FARCASTER_QUERY: &str = r#"
    query GetFarcasterAddresses($username: String!) {
        farcasterProfile(username: $username) {
            username
            fid
            metadata {
                displayName
                description
                imageUrl
                warpcast
            }
            connectedAddresses
            custodyAddress
        }
    }
"#;

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Unwrap the envelope, failing when it carries errors.
    pub fn into_data(self) -> Result<Option<T>> {
        if let Some(errors) = self.errors {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            tracing::error!(?messages, "Zapper API returned errors");
            return Err(ZapperError::Upstream(messages.join("; ")));
        }

        Ok(self.data)
    }
}

/// Query seam for the two Zapper lookups the actions perform
#[async_trait]
pub trait ZapperGateway: Send + Sync {
    /// Fetch the aggregate portfolio for a set of wallet addresses
    async fn portfolio(&self, config: &ZapperConfig, addresses: &[String]) -> Result<Portfolio>;

    /// Fetch a Farcaster profile by username. An unknown username is
    /// `Ok(None)`, not a failure.
    async fn farcaster_profile(
        &self,
        config: &ZapperConfig,
        username: &str,
    ) -> Result<Option<FarcasterProfile>>;
}

/// HTTP implementation of the gateway
pub struct ZapperClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for ZapperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ZapperClient {
    /// Create a client against the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint(ZAPPER_API_URL)
    }

    /// Create with a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// POST one GraphQL query and unwrap the response envelope
    async fn query<T: DeserializeOwned>(
        &self,
        config: &ZapperConfig,
        query: &str,
        variables: Value,
    ) -> Result<Option<T>> {
        let headers = config.headers()?;

        let response = self
            .http
            .post(&self.endpoint)
            .headers(headers)
            .json(&json!({
                "query": query,
                "variables": variables
            }))
            .send()
            .await?;

        let body = response.text().await?;
        let envelope: GraphQlResponse<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "failed to decode Zapper response");
            ZapperError::MalformedResponse(e.to_string())
        })?;

        envelope.into_data()
    }
}

#[async_trait]
impl ZapperGateway for ZapperClient {
    async fn portfolio(&self, config: &ZapperConfig, addresses: &[String]) -> Result<Portfolio> {
        let data: Option<PortfolioData> = self
            .query(config, PORTFOLIO_QUERY, json!({ "addresses": addresses }))
            .await?;

        data.and_then(|d| d.portfolio).ok_or_else(|| {
            tracing::error!("Zapper response is missing the portfolio payload");
            ZapperError::MalformedResponse("missing data.portfolio".into())
        })
    }

    async fn farcaster_profile(
        &self,
        config: &ZapperConfig,
        username: &str,
    ) -> Result<Option<FarcasterProfile>> {
        let data: Option<FarcasterData> = self
            .query(config, FARCASTER_QUERY, json!({ "username": username }))
            .await?;

        Ok(data.and_then(|d| d.farcaster_profile))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted gateway for handler tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    pub(crate) struct MockGateway {
        pub portfolio: Option<Portfolio>,
        pub profile: Option<FarcasterProfile>,
        pub upstream_error: Option<String>,
        pub calls: AtomicUsize,
        pub last_addresses: Mutex<Vec<String>>,
    }

    impl MockGateway {
        pub fn with_portfolio(portfolio: Portfolio) -> Self {
            Self {
                portfolio: Some(portfolio),
                profile: None,
                upstream_error: None,
                calls: AtomicUsize::new(0),
                last_addresses: Mutex::new(Vec::new()),
            }
        }

        pub fn with_profile(profile: Option<FarcasterProfile>, portfolio: Option<Portfolio>) -> Self {
            Self {
                portfolio,
                profile,
                upstream_error: None,
                calls: AtomicUsize::new(0),
                last_addresses: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                portfolio: None,
                profile: None,
                upstream_error: Some(message.into()),
                calls: AtomicUsize::new(0),
                last_addresses: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ZapperGateway for MockGateway {
        async fn portfolio(
            &self,
            _config: &ZapperConfig,
            addresses: &[String],
        ) -> Result<Portfolio> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_addresses.lock().unwrap() = addresses.to_vec();
            if let Some(message) = &self.upstream_error {
                return Err(ZapperError::Upstream(message.clone()));
            }
            self.portfolio
                .clone()
                .ok_or_else(|| ZapperError::MalformedResponse("missing data.portfolio".into()))
        }

        async fn farcaster_profile(
            &self,
            _config: &ZapperConfig,
            _username: &str,
        ) -> Result<Option<FarcasterProfile>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = &self.upstream_error {
                return Err(ZapperError::Upstream(message.clone()));
            }
            Ok(self.profile.clone())
        }
    }
}
