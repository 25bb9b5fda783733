//! 实时聊天核心领域模型
//!
//! 包含用户与房间标识、消息记录，以及 WebSocket 入站事件和出站帧的定义。
//! 该层不做任何 I/O。

pub mod errors;
pub mod events;
pub mod frames;
pub mod message;
pub mod value_objects;

pub use errors::{DomainError, RepositoryError};
pub use events::ClientEvent;
pub use frames::ServerFrame;
pub use message::ChatMessage;
pub use value_objects::{RoomId, Timestamp, UserId};
