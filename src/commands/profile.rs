//! # 名片资料 Tauri Commands
//!
//! - `get_profile` - 获取名片页面的完整静态资料
//! - `open_link` - 在系统浏览器中打开社交链接

use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;

use crate::models::profile::ProfileView;
use crate::services::profile_store::ProfileStore;

/// 获取名片资料
#[tauri::command]
pub async fn get_profile(store: State<'_, ProfileStore>) -> Result<ProfileView, String> {
    Ok(store.view())
}

/// 打开社交链接
///
/// 只接受资料中已配置的链接地址。
///
/// # 错误
/// 地址不在资料中或系统浏览器打开失败时返回错误
#[tauri::command]
pub async fn open_link(
    app: AppHandle,
    url: String,
    store: State<'_, ProfileStore>,
) -> Result<(), String> {
    if !store.is_known_link(&url) {
        return Err(format!("未知的链接: {}", url));
    }
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| format!("打开链接失败: {}", e))
}
