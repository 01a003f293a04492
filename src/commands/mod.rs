//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数。
//! 每个子模块对应一个功能域：
//! - `profile` - 名片资料与社交链接
//! - `chat` - 神经链接终端（流式对话）
//! - `card` - 名片视图交互（二维码、复制、头像、导出）

pub mod card;
pub mod chat;
pub mod profile;
