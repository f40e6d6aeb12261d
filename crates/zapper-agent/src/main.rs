//! zapper-agent demo binary
//!
//! Wires the Zapper actions to an Ollama-backed runtime and dispatches a
//! single inbound message from the command line:
//!
//! ```text
//! zapper-agent ZAPPER_PORTFOLIO "Show me holdings for 0x187c..."
//! zapper-agent FARCASTER_PORTFOLIO "What's the portfolio for @dwr.eth?"
//! ```

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use agent_core::{AgentRuntime, Content, LlmProvider, Memory, State};
use agent_runtime::OllamaProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(action), Some(text)) = (args.next(), args.next()) else {
        eprintln!("Usage: zapper-agent <ACTION> <MESSAGE>");
        eprintln!("  zapper-agent ZAPPER_PORTFOLIO \"Show me holdings for 0x187c...\"");
        eprintln!("  zapper-agent FARCASTER_PORTFOLIO \"What's the portfolio for @dwr.eth?\"");
        std::process::exit(2);
    };

    // Initialize LLM provider
    let provider = Arc::new(OllamaProvider::from_env());
    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Ollama"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - address extraction will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    let runtime = AgentRuntime::builder()
        .provider(provider)
        .plugin(zapper_plugin::plugin())
        .build()?;

    tracing::info!("Registered {} actions:", runtime.actions().len());
    for name in runtime.actions().names() {
        tracing::info!("  • {}", name);
    }

    let message = Memory::new(
        Uuid::new_v4(),
        runtime.agent_id(),
        Uuid::new_v4(),
        Content::text(text).with_action(action),
    );

    let print_content = |content: &Content| {
        println!("{}", content.text);
    };

    let mut state = State::default();
    match runtime
        .process_actions(&message, &mut state, Some(&print_content))
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::warn!("no action handled the message");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "dispatch failed");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
