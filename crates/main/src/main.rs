//! 主应用程序入口
//!
//! 装配实时核心与内存存储协作方，启动 Axum Web API 服务。

use std::sync::Arc;

use application::{ChatService, ChatServiceDependencies, ConnectionRegistry, MessageLog, SystemClock};
use config::AppConfig;
use infrastructure::InMemoryStorage;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();

    // 外部存储协作方：演示用内存实现，预置 general/random 房间和演示用户
    let storage = Arc::new(InMemoryStorage::with_demo_data(chrono::Utc::now())?);

    // 构造实时核心：注册表、消息日志、会话协议
    let registry = Arc::new(ConnectionRegistry::new());
    let chat_service = Arc::new(ChatService::new(ChatServiceDependencies {
        registry: registry.clone(),
        message_log: Arc::new(MessageLog::new(config.websocket.history_limit)),
        message_repository: storage.clone(),
        room_repository: storage.clone(),
        clock: Arc::new(SystemClock),
    }));

    let state = AppState::new(
        chat_service,
        registry,
        storage.clone(),
        storage,
        config.websocket.clone(),
    );

    // 启动 Web 服务器
    let app = router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("聊天服务器启动在 http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
