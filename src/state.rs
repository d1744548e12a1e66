use std::sync::Arc;
use crate::external::price_provider::PriceProvider;
use crate::services::chat_service::ChatService;

#[derive(Clone)]
pub struct AppState {
    pub price_provider: Arc<dyn PriceProvider>,
    pub chat: ChatService,
}
