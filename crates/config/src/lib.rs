//! 服务配置
//!
//! 从环境变量加载；所有配置项都有默认值，本服务没有必须提供的机密配置。

use serde::{Deserialize, Serialize};
use std::env;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 监听配置
    pub server: ServerConfig,
    /// WebSocket 队列与历史回放配置
    pub websocket: WebSocketConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// WebSocket 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketConfig {
    /// 单个连接的出站队列容量；队列打满按连接死亡处理
    pub outbound_capacity: usize,
    /// 每房间保留并在加入时回放的消息条数
    pub history_limit: usize,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("CHAT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("CHAT_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8000),
            },
            websocket: WebSocketConfig {
                outbound_capacity: env::var("WS_OUTBOUND_CAPACITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(32),
                history_limit: env::var("ROOM_HISTORY_LIMIT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(20),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            websocket: WebSocketConfig::default(),
        }
    }
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            outbound_capacity: 32,
            history_limit: 20,
        }
    }
}
