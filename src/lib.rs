//! # TianSuan Digital Card - Tauri 应用核心初始化模块
//!
//! 本模块负责 Tauri 应用的完整初始化流程，包括：
//! - 注册 Tauri 官方插件（对话框、Opener、日志）
//! - 构造应用全局状态（名片资料、对话控制器、名片视图、系统剪贴板）
//! - 注册自定义 Tauri commands（名片资料、神经链接终端、名片交互）
//! - 生成应用上下文并启动事件循环
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层）
//! - `models/` - 数据模型（对应前端 TypeScript 类型）
//! - `services/` - 核心业务逻辑（资料、流式对话、名片状态、导出）
//! - `utils/` - 配置与路径工具

mod commands;
mod models;
mod services;
mod utils;

use std::sync::Arc;

use tauri::Manager;

use services::card::CardView;
use services::clipboard::SystemClipboard;
use services::gemini::ChatClient;
use services::profile_store::ProfileStore;
use services::transcript::ChatController;
use utils::config::ChatConfig;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 1. 注册对话框和 Opener 插件
/// 2. 注册所有自定义 Tauri commands
/// 3. 在 `setup` 钩子中启用日志插件（仅调试构建），
///    随后从环境变量读取配置并构造全局状态，保证构造过程的日志可见
/// 4. 生成应用上下文并启动主事件循环
///
/// # Panics
/// 如果 Tauri 应用启动失败（例如窗口创建失败），将通过 `.expect()` 触发 panic。
pub fn run() {
    tauri::Builder::default()
        // 对话框插件：头像文件选择、导出失败提示框
        .plugin(tauri_plugin_dialog::init())
        // Opener 插件：打开社交链接、在文件管理器中定位导出图片
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            // 名片资料 commands
            commands::profile::get_profile,
            commands::profile::open_link,
            // 神经链接终端 commands
            commands::chat::get_transcript,
            commands::chat::send_chat_message,
            // 名片交互 commands
            commands::card::get_card_state,
            commands::card::toggle_qr,
            commands::card::get_qr_svg,
            commands::card::copy_contact,
            commands::card::pick_avatar,
            commands::card::reset_avatar,
            commands::card::begin_card_export,
            commands::card::finish_card_export,
            commands::card::abort_card_export,
        ])
        .setup(|app| {
            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            let store = ProfileStore::load();
            let client = ChatClient::from_config(&ChatConfig::from_env(), &store);
            app.manage(Arc::new(ChatController::new(Arc::new(client))));
            app.manage(Arc::new(CardView::new(&store)));
            app.manage(SystemClipboard::new());
            app.manage(store);
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
