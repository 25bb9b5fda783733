use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::websocket::websocket_handler;

/// 组装路由。
///
/// 这里只有 WebSocket 升级入口和运维端点；用户与房间的
/// CRUD 属于外部协作方，不在本服务内。
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ws/{user_id}", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 服务信息。
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Chat App API",
        "version": env!("CARGO_PKG_VERSION"),
        "features": [
            "Real-time WebSocket Chat",
            "Multiple Chat Rooms",
            "Message Broadcasting",
            "Connection Management"
        ]
    }))
}

/// 健康检查：活跃连接数和已知房间。
async fn health(State(state): State<AppState>) -> Json<Value> {
    let rooms: Vec<String> = state
        .room_repository
        .list()
        .await
        .iter()
        .map(|room_id| room_id.to_string())
        .collect();
    Json(json!({
        "status": "healthy",
        "service": "chat-app",
        "active_connections": state.registry.connection_count().await,
        "rooms": rooms,
    }))
}
