//! # 数据模型模块
//!
//! 定义了与前端 TypeScript 类型一一对应的 Rust 数据结构。
//! 所有结构体均派生 `Serialize`，用于 Tauri IPC 传输和事件推送。
//! - `profile` - 名片资料、统计项、社交链接
//! - `chat` - 对话消息、对话快照和流式事件载荷
//! - `card` - 名片视图的本地状态快照

pub mod card;
pub mod chat;
pub mod profile;
