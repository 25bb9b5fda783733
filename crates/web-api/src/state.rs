use std::sync::Arc;

use application::{ChatRoomRepository, ChatService, ConnectionRegistry, UserRepository};
use config::WebSocketConfig;

/// 路由层共享状态。
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub registry: Arc<ConnectionRegistry>,
    pub user_repository: Arc<dyn UserRepository>,
    pub room_repository: Arc<dyn ChatRoomRepository>,
    pub websocket: WebSocketConfig,
}

impl AppState {
    pub fn new(
        chat_service: Arc<ChatService>,
        registry: Arc<ConnectionRegistry>,
        user_repository: Arc<dyn UserRepository>,
        room_repository: Arc<dyn ChatRoomRepository>,
        websocket: WebSocketConfig,
    ) -> Self {
        Self {
            chat_service,
            registry,
            user_repository,
            room_repository,
            websocket,
        }
    }
}
