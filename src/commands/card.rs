//! # 名片视图 Tauri Commands
//!
//! 提供名片页面本地交互的 command 处理函数：
//! - `get_card_state` - 获取名片视图状态
//! - `toggle_qr` / `get_qr_svg` - 二维码面板
//! - `copy_contact` - 复制微信号（2 秒后自动清除"已复制"提示）
//! - `pick_avatar` / `reset_avatar` - 本地头像替换（仅本次会话）
//! - `begin_card_export` / `finish_card_export` / `abort_card_export` - 名片图片导出
//!
//! 视图状态变化时推送 `card://changed` 事件，载荷为最新的 `CardSnapshot`。

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{error, warn};
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use tauri_plugin_opener::OpenerExt;

use crate::models::card::CardSnapshot;
use crate::services::avatar;
use crate::services::card::CardView;
use crate::services::clipboard::SystemClipboard;
use crate::services::export::{self, ExportPlan};
use crate::utils::path;

/// 视图状态变化事件名
pub const CARD_CHANGED_EVENT: &str = "card://changed";

/// "已复制"提示的显示时长
const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

/// 获取名片视图状态
#[tauri::command]
pub async fn get_card_state(card: State<'_, Arc<CardView>>) -> Result<CardSnapshot, String> {
    Ok(card.snapshot())
}

/// 切换二维码面板
#[tauri::command]
pub async fn toggle_qr(card: State<'_, Arc<CardView>>) -> Result<CardSnapshot, String> {
    Ok(card.toggle_qr())
}

/// 获取微信二维码 SVG
#[tauri::command]
pub async fn get_qr_svg(card: State<'_, Arc<CardView>>) -> Result<String, String> {
    card.qr_svg()
}

/// 复制微信号到系统剪贴板
///
/// 成功后显示"已复制"提示，2 秒后自动清除并推送 `card://changed`。
///
/// # 错误
/// 剪贴板不可用时返回错误
#[tauri::command]
pub async fn copy_contact(
    app: AppHandle,
    card: State<'_, Arc<CardView>>,
    clipboard: State<'_, SystemClipboard>,
) -> Result<CardSnapshot, String> {
    let generation = card.copy_contact(clipboard.inner())?;

    let card_handle = Arc::clone(&card);
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(COPIED_FEEDBACK).await;
        if card_handle.clear_copied(generation) {
            emit_changed(&app, card_handle.snapshot());
        }
    });

    Ok(card.snapshot())
}

/// 选择本地图片替换头像
///
/// 用户取消选择时返回当前状态不变。
///
/// # 错误
/// 文件路径无效、格式不支持或读取失败时返回错误
#[tauri::command]
pub async fn pick_avatar(
    app: AppHandle,
    card: State<'_, Arc<CardView>>,
) -> Result<CardSnapshot, String> {
    let picked = app
        .dialog()
        .file()
        .add_filter("Image", &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"])
        .blocking_pick_file();

    let Some(file) = picked else {
        return Ok(card.snapshot());
    };
    let file_path = file
        .into_path()
        .map_err(|e| format!("无效的头像文件路径: {}", e))?;

    let data_url = avatar::load_data_url(&file_path).await?;
    Ok(card.replace_avatar(data_url))
}

/// 恢复默认头像
#[tauri::command]
pub async fn reset_avatar(card: State<'_, Arc<CardView>>) -> Result<CardSnapshot, String> {
    Ok(card.reset_avatar())
}

/// 开始导出名片图片
///
/// 隐藏二维码面板并标记导出中，返回截图参数（2x 像素密度、深色背景）。
///
/// # 错误
/// 已有导出在进行中时返回错误
#[tauri::command]
pub async fn begin_card_export(
    app: AppHandle,
    card: State<'_, Arc<CardView>>,
) -> Result<ExportPlan, String> {
    let snapshot = card.begin_export()?;
    emit_changed(&app, snapshot.clone());
    Ok(ExportPlan::new(snapshot))
}

/// 保存前端栅格化好的名片 PNG
///
/// 写入下载目录并在文件管理器中定位。失败时弹出阻塞提示框，
/// 并把错误返回给前端；无论成功与否都会结束导出状态。
///
/// # 参数
/// - `data_url` - `data:image/png;base64,...` 格式的图片数据
///
/// # 返回值
/// 导出文件的绝对路径
#[tauri::command]
pub async fn finish_card_export(
    app: AppHandle,
    data_url: String,
    card: State<'_, Arc<CardView>>,
) -> Result<String, String> {
    let result = save_export(&data_url).await;
    emit_changed(&app, card.finish_export());

    match result {
        Ok(file_path) => {
            if let Err(e) = app.opener().reveal_item_in_dir(&file_path) {
                warn!("在文件管理器中定位导出文件失败: {}", e);
            }
            Ok(file_path.to_string_lossy().to_string())
        }
        Err(e) => {
            error!("名片图片导出失败: {}", e);
            alert_export_failed(&app);
            Err(e)
        }
    }
}

/// 前端栅格化失败时结束导出并提示用户
#[tauri::command]
pub async fn abort_card_export(
    app: AppHandle,
    reason: String,
    card: State<'_, Arc<CardView>>,
) -> Result<CardSnapshot, String> {
    error!("名片图片栅格化失败: {}", reason);
    let snapshot = card.finish_export();
    emit_changed(&app, snapshot.clone());
    alert_export_failed(&app);
    Ok(snapshot)
}

async fn save_export(data_url: &str) -> Result<std::path::PathBuf, String> {
    let png = export::decode_png_data_url(data_url)?;
    let dir = path::get_export_dir()?;
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    export::save_png(&dir, &png, timestamp).await
}

fn alert_export_failed(app: &AppHandle) {
    app.dialog()
        .message(export::EXPORT_FAILED_ALERT)
        .title("TianSuan Digital Card")
        .kind(MessageDialogKind::Error)
        .blocking_show();
}

fn emit_changed(app: &AppHandle, snapshot: CardSnapshot) {
    if let Err(e) = app.emit(CARD_CHANGED_EVENT, snapshot) {
        warn!("推送名片状态失败: {}", e);
    }
}
