use std::sync::Arc;
use tokio::net::TcpListener;

use marketmood_backend::app;
use marketmood_backend::config::{PriceConfig, ServerConfig};
use marketmood_backend::external::price_provider::PriceProvider;
use marketmood_backend::external::yahoofinance::YahooFinanceProvider;
use marketmood_backend::logging::{init_logging, LoggingConfig};
use marketmood_backend::services::chat_service::ChatService;
use marketmood_backend::services::llm_service::{GeminiProvider, LlmConfig, LlmProvider};
use marketmood_backend::services::transcript_store::TranscriptStore;
use marketmood_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let server_config = ServerConfig::from_env()?;
    let llm_config = LlmConfig::from_env().map_err(|e| {
        tracing::error!("Refusing to start: {}", e);
        e
    })?;
    let price_config = PriceConfig::from_env();

    tracing::info!("Using language model {} at {}", llm_config.model, llm_config.base_url);
    tracing::info!("Using price provider: Yahoo Finance at {}", price_config.yahoo_base_url);

    let llm: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::new(&llm_config)?);
    let price_provider: Arc<dyn PriceProvider> =
        Arc::new(YahooFinanceProvider::new(price_config.yahoo_base_url));

    let state = AppState {
        price_provider,
        chat: ChatService::new(llm, TranscriptStore::new(), llm_config.max_output_tokens),
    };
    let app = app::create_app(state);

    let addr = server_config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Market mood backend running at http://{}/", addr);
    axum::serve(listener, app)
        .await?;

    Ok(())
}
