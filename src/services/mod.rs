//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 Tauri command 层解耦：
//! - `profile_store` - 名片静态资料
//! - `persona` - 根据资料构造对话系统指令
//! - `sse` - Server-Sent Events 增量解码
//! - `gemini` - Gemini 流式对话客户端
//! - `transcript` - 对话记录与单请求控制器
//! - `card` - 名片视图本地状态（头像、二维码、复制提示、导出）
//! - `clipboard` - 系统剪贴板适配
//! - `qr` - 微信二维码渲染
//! - `avatar` - 本地头像加载
//! - `export` - 名片图片导出

pub mod avatar;
pub mod card;
pub mod clipboard;
pub mod export;
pub mod gemini;
pub mod persona;
pub mod profile_store;
pub mod qr;
pub mod sse;
pub mod transcript;
