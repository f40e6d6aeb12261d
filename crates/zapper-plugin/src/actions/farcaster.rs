//! Farcaster Portfolio Action
//!
//! Resolves a Farcaster username to its linked wallet addresses and hands
//! the portfolio lookup off to the `ZAPPER_PORTFOLIO` action. The
//! hand-off is an explicit re-entry through the runtime's dispatch, with
//! the resolved addresses attached to the intermediate memory.

use std::sync::Arc;

use agent_core::{
    Action, ActionExample, AgentError, AgentRuntime, Content, HandlerCallback, HandlerOptions,
    Memory, ModelClass, State,
};
use async_trait::async_trait;

use crate::actions::{ADDRESSES_KEY, FARCASTER_PORTFOLIO, ZAPPER_PORTFOLIO};
use crate::client::{ZapperClient, ZapperGateway};
use crate::config::ZapperConfig;
use crate::error::ZapperError;
use crate::format::wallet_addresses;

/// Handler for `FARCASTER_PORTFOLIO`
pub struct FarcasterPortfolioAction {
    gateway: Arc<dyn ZapperGateway>,
}

impl Default for FarcasterPortfolioAction {
    fn default() -> Self {
        Self::new()
    }
}

impl FarcasterPortfolioAction {
    /// Create against the public Zapper endpoint
    pub fn new() -> Self {
        Self::with_gateway(Arc::new(ZapperClient::new()))
    }

    /// Create with a custom gateway
    pub fn with_gateway(gateway: Arc<dyn ZapperGateway>) -> Self {
        Self { gateway }
    }

    /// Validate config, fetch the profile, and collect its wallets
    async fn fetch_addresses(
        &self,
        runtime: &AgentRuntime,
        username: &str,
    ) -> crate::error::Result<Vec<String>> {
        let config = ZapperConfig::validate(runtime)?;
        let profile = self.gateway.farcaster_profile(&config, username).await?;
        Ok(wallet_addresses(profile.as_ref()))
    }

    async fn run(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        state: &mut State,
        callback: Option<&HandlerCallback>,
    ) -> agent_core::Result<bool> {
        let context = format!(
            "Extract the Farcaster username from this text, returning it as a \
             string with no @ symbols or other text. The message is:\n{}",
            message.content.text
        );
        let username = runtime
            .generate_text(&context, ModelClass::Small, &["\n"])
            .await?;
        tracing::info!(username = %username, "extracted Farcaster username");

        let addresses = self
            .fetch_addresses(runtime, &username)
            .await
            .map_err(AgentError::from)?;

        if addresses.is_empty() {
            return Err(ZapperError::NoAddressesFound(
                "No addresses found for these Farcaster accounts".into(),
            )
            .into());
        }

        let mut content = Content::text(format!(
            "Fetching portfolio for addresses: {}",
            addresses.join(", ")
        ))
        .with_action(ZAPPER_PORTFOLIO)
        .with_extra(ADDRESSES_KEY, serde_json::json!(addresses));
        content.source = message.content.source.clone();

        let follow_up = Memory::reply_to(message, content);
        let follow_up_content = follow_up.content.clone();
        runtime.create_memory(follow_up.clone()).await?;

        if let Some(callback) = callback {
            callback(&follow_up_content);
        }

        // Hand off to the portfolio action against the resolved addresses
        runtime.process_actions(&follow_up, state, callback).await?;

        Ok(true)
    }
}

#[async_trait]
impl Action for FarcasterPortfolioAction {
    fn name(&self) -> &'static str {
        FARCASTER_PORTFOLIO
    }

    fn description(&self) -> &'static str {
        "Get the portfolio for one or more Farcaster usernames"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["GET_FARCASTER_PORTFOLIO"]
    }

    fn examples(&self) -> Vec<Vec<ActionExample>> {
        vec![
            vec![
                ActionExample::user_turn(
                    "Show me the holdings for Farcaster users @vitalik.eth and @jessepollak",
                ),
                ActionExample::agent_turn(FARCASTER_PORTFOLIO),
            ],
            vec![
                ActionExample::user_turn("What's the portfolio for @dwr.eth?"),
                ActionExample::agent_turn(FARCASTER_PORTFOLIO),
            ],
        ]
    }

    async fn handle(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        state: &mut State,
        _options: &HandlerOptions,
        callback: Option<&HandlerCallback>,
    ) -> agent_core::Result<bool> {
        match self.run(runtime, message, state, callback).await {
            Ok(done) => Ok(done),
            Err(e) => {
                tracing::error!(error = %e, "error in Farcaster portfolio action");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{PortfolioAction, ZAPPER_PORTFOLIO_RESPONSE};
    use crate::client::mock::MockGateway;
    use crate::config::ZAPPER_API_KEY;
    use crate::model::{FarcasterProfile, Portfolio, Totals};
    use agent_core::{MemoryManager as _, MockProvider};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;
    use uuid::Uuid;

    fn empty_portfolio() -> Portfolio {
        Portfolio {
            token_balances: Vec::new(),
            nft_balances: Vec::new(),
            totals: Totals {
                total: dec!(250),
                total_with_nft: dec!(250),
                total_by_network: Vec::new(),
                holdings: Vec::new(),
            },
        }
    }

    fn profile() -> FarcasterProfile {
        FarcasterProfile {
            username: Some("vitalik.eth".into()),
            fid: Some(5650),
            metadata: None,
            connected_addresses: vec!["0xA".into(), "0xB".into()],
            custody_address: Some("0xC".into()),
        }
    }

    fn runtime_with(gateway: Arc<MockGateway>, replies: Vec<&str>) -> AgentRuntime {
        AgentRuntime::builder()
            .provider(Arc::new(MockProvider::new(replies)))
            .setting(ZAPPER_API_KEY, "test-key")
            .action(Arc::new(FarcasterPortfolioAction::with_gateway(
                gateway.clone(),
            )))
            .action(Arc::new(PortfolioAction::with_gateway(gateway)))
            .build()
            .unwrap()
    }

    fn inbound(runtime: &AgentRuntime, text: &str) -> Memory {
        Memory::new(
            Uuid::new_v4(),
            runtime.agent_id(),
            Uuid::new_v4(),
            Content::text(text).with_action(FARCASTER_PORTFOLIO),
        )
    }

    #[tokio::test]
    async fn test_delegates_to_portfolio_action() {
        let gateway = Arc::new(MockGateway::with_profile(
            Some(profile()),
            Some(empty_portfolio()),
        ));
        // One scripted reply: the delegated lookup must reuse the attached
        // addresses instead of asking the model again
        let runtime = runtime_with(gateway.clone(), vec!["vitalik.eth"]);
        let message = inbound(&runtime, "What's the portfolio for @vitalik.eth?");

        let captured: Arc<Mutex<Vec<Content>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let callback = move |content: &Content| {
            sink.lock().unwrap().push(content.clone());
        };
        let callback_ref: &HandlerCallback = &callback;

        let mut state = State::default();
        let handled = runtime
            .process_actions(&message, &mut state, Some(callback_ref))
            .await
            .unwrap();
        assert!(handled);

        let recent = runtime.memories().recent(message.room_id, 10).await.unwrap();
        assert_eq!(recent.len(), 2);

        let intermediate = recent
            .iter()
            .find(|m| m.content.action.as_deref() == Some(ZAPPER_PORTFOLIO))
            .unwrap();
        assert_eq!(
            intermediate.content.text,
            "Fetching portfolio for addresses: 0xA, 0xB, 0xC"
        );
        assert_eq!(
            intermediate.content.extra.get(ADDRESSES_KEY).unwrap(),
            &serde_json::json!(["0xA", "0xB", "0xC"])
        );

        let response = recent
            .iter()
            .find(|m| m.content.action.as_deref() == Some(ZAPPER_PORTFOLIO_RESPONSE))
            .unwrap();
        assert!(response
            .content
            .text
            .contains("Total Value (excluding NFTs): $250.00"));

        // Profile lookup + portfolio lookup
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(*gateway.last_addresses.lock().unwrap(), vec!["0xA", "0xB", "0xC"]);
        // Both handlers invoked the callback once
        assert_eq!(captured.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_absent_profile_yields_no_addresses_error() {
        let gateway = Arc::new(MockGateway::with_profile(None, None));
        let runtime = runtime_with(gateway.clone(), vec!["ghost"]);
        let message = inbound(&runtime, "What's the portfolio for @ghost?");

        let mut state = State::default();
        let result = runtime.process_actions(&message, &mut state, None).await;

        assert!(matches!(
            result,
            Err(AgentError::ActionExecution(msg))
                if msg.contains("No addresses found for these Farcaster accounts")
        ));
        assert_eq!(gateway.call_count(), 1);
        assert!(runtime
            .memories()
            .recent(message.room_id, 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let gateway = Arc::new(MockGateway::failing("rate limited"));
        let runtime = runtime_with(gateway, vec!["vitalik.eth"]);
        let message = inbound(&runtime, "What's the portfolio for @vitalik.eth?");

        let mut state = State::default();
        let result = runtime.process_actions(&message, &mut state, None).await;

        assert!(matches!(
            result,
            Err(AgentError::ActionExecution(msg)) if msg.contains("rate limited")
        ));
    }
}
