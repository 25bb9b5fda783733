//! Web API 层
//!
//! 持有具体的 WebSocket 传输：升级端点、每连接的帧泵送，
//! 以及少量运维端点。核心逻辑全部在 application 层。

pub mod error;
pub mod routes;
pub mod state;
pub mod websocket;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
