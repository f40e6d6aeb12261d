//! Portfolio Action
//!
//! Resolves wallet addresses from the inbound message and answers with a
//! formatted net-worth summary from the Zapper API.

use std::sync::Arc;

use agent_core::{
    Action, ActionExample, AgentError, AgentRuntime, Content, HandlerCallback, HandlerOptions,
    Memory, ModelClass, State,
};
use async_trait::async_trait;

use crate::actions::{ADDRESSES_KEY, ZAPPER_PORTFOLIO, ZAPPER_PORTFOLIO_RESPONSE};
use crate::client::{ZapperClient, ZapperGateway};
use crate::config::ZapperConfig;
use crate::error::ZapperError;
use crate::format::{format_portfolio, parse_address_list};

/// Handler for `ZAPPER_PORTFOLIO`
pub struct PortfolioAction {
    gateway: Arc<dyn ZapperGateway>,
}

impl Default for PortfolioAction {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioAction {
    /// Create against the public Zapper endpoint
    pub fn new() -> Self {
        Self::with_gateway(Arc::new(ZapperClient::new()))
    }

    /// Create with a custom gateway
    pub fn with_gateway(gateway: Arc<dyn ZapperGateway>) -> Self {
        Self { gateway }
    }

    /// Addresses attached by an upstream action (e.g. the Farcaster
    /// handler), letting this handler skip language-model extraction.
    fn attached_addresses(message: &Memory) -> Option<Vec<String>> {
        message
            .content
            .extra
            .get(ADDRESSES_KEY)
            .and_then(|value| serde_json::from_value::<Vec<String>>(value.clone()).ok())
            .filter(|addresses| !addresses.is_empty())
    }

    /// Ask the language model for a comma-separated address list
    async fn extract_addresses(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
    ) -> agent_core::Result<Vec<String>> {
        let context = format!(
            "Extract only the blockchain wallet addresses from this text, \
             returning them as a comma-separated list with no other text or \
             explanations. The message is:\n{}",
            message.content.text
        );

        let extracted = runtime
            .generate_text(&context, ModelClass::Small, &["\n"])
            .await?;

        Ok(parse_address_list(&extracted))
    }

    /// Validate config, query Zapper, and format the report
    async fn fetch_report(
        &self,
        runtime: &AgentRuntime,
        addresses: &[String],
    ) -> crate::error::Result<String> {
        let config = ZapperConfig::validate(runtime)?;
        let portfolio = self.gateway.portfolio(&config, addresses).await?;
        Ok(format_portfolio(&portfolio))
    }

    async fn run(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        callback: Option<&HandlerCallback>,
    ) -> agent_core::Result<bool> {
        let addresses = match Self::attached_addresses(message) {
            Some(addresses) => addresses,
            None => self.extract_addresses(runtime, message).await?,
        };
        tracing::info!(?addresses, "extracted wallet addresses");

        if addresses.is_empty() {
            return Err(ZapperError::NoAddressesFound(
                "No wallet addresses found in the message".into(),
            )
            .into());
        }

        let report = self
            .fetch_report(runtime, &addresses)
            .await
            .map_err(AgentError::from)?;

        let mut content = Content::text(format!(
            "\u{26A1} Here is the portfolio for the provided addresses:\n\n{report}"
        ))
        .with_action(ZAPPER_PORTFOLIO_RESPONSE);
        content.source = message.content.source.clone();

        let reply = Memory::reply_to(message, content);
        let reply_content = reply.content.clone();
        runtime.create_memory(reply).await?;

        if let Some(callback) = callback {
            callback(&reply_content);
        }

        Ok(true)
    }
}

#[async_trait]
impl Action for PortfolioAction {
    fn name(&self) -> &'static str {
        ZAPPER_PORTFOLIO
    }

    fn description(&self) -> &'static str {
        "Get the portfolio from given address or addresses"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["GET_PORTFOLIO"]
    }

    fn examples(&self) -> Vec<Vec<ActionExample>> {
        vec![
            vec![
                ActionExample::user_turn(
                    "Show me the holdings for 0x187c7b0393ebe86378128f2653d0930e33218899",
                ),
                ActionExample::agent_turn(ZAPPER_PORTFOLIO),
            ],
            vec![
                ActionExample::user_turn(
                    "Check these wallets: 0xd8da6bf26964af9d7eed9e03e53415d37aa96045, \
                     0xadd746be46ff36f10c81d6e3ba282537f4c68077",
                ),
                ActionExample::agent_turn(ZAPPER_PORTFOLIO),
            ],
        ]
    }

    async fn handle(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        _state: &mut State,
        _options: &HandlerOptions,
        callback: Option<&HandlerCallback>,
    ) -> agent_core::Result<bool> {
        match self.run(runtime, message, callback).await {
            Ok(done) => Ok(done),
            Err(e) => {
                tracing::error!(error = %e, "error in portfolio action");
                Err(e)
            }
        }
    }
}
