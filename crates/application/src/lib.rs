//! 实时核心的应用层。
//!
//! 提供四个核心组件：连接注册表、调度器、会话协议和消息日志，
//! 以及对外部存储协作方（用户目录、房间目录、消息落库）的抽象。
//! 具体传输由 web-api 层持有，这里只通过连接句柄发帧。

pub mod clock;
pub mod connection;
pub mod dispatcher;
pub mod message_log;
pub mod registry;
pub mod repository;
pub mod session;

#[cfg(test)]
mod message_log_tests;
#[cfg(test)]
mod registry_tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use connection::{ConnectionHandle, SendError};
pub use dispatcher::Dispatcher;
pub use message_log::{MessageLog, DEFAULT_HISTORY_LIMIT};
pub use registry::{ConnectionRegistry, JoinOutcome};
pub use repository::{ChatRoomRepository, MessageRepository, UserRepository};
pub use session::{ChatService, ChatServiceDependencies};
