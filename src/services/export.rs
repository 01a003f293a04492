//! # 名片图片导出服务
//!
//! 前端以 2 倍像素密度、固定深色背景把名片区域栅格化为 PNG，
//! 以 data URL 形式交给 Rust；本模块负责解码、校验并写入下载目录。
//!
//! ## 导出参数
//! - 像素密度：2x
//! - 背景色：`#020617`（slate-950）
//! - 文件名：`TianSuan_ShenSiTing_<Unix 毫秒>.png`

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::info;
use serde::Serialize;

use crate::models::card::CardSnapshot;
use crate::utils::path;

/// 栅格化像素密度
pub const PIXEL_RATIO: u32 = 2;

/// 导出图片的背景色
pub const BACKGROUND_COLOR: &str = "#020617";

/// 导出失败时弹窗提示的文本
pub const EXPORT_FAILED_ALERT: &str = "Failed to generate image. Please try again.";

/// PNG 文件签名
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// 一次导出的参数，由 `begin_card_export` 返回给前端
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    /// 截图时必须使用的视图状态（二维码面板已隐藏）
    pub snapshot: CardSnapshot,
    pub pixel_ratio: u32,
    pub background_color: String,
}

impl ExportPlan {
    pub fn new(snapshot: CardSnapshot) -> Self {
        Self {
            snapshot,
            pixel_ratio: PIXEL_RATIO,
            background_color: BACKGROUND_COLOR.to_string(),
        }
    }
}

/// 把 `data:image/png;base64,...` 解码为 PNG 字节
///
/// 也接受不带前缀的纯 base64 文本。
///
/// # 错误
/// base64 解码失败或内容不是 PNG 时返回错误
pub fn decode_png_data_url(data_url: &str) -> Result<Vec<u8>, String> {
    let encoded = match data_url.split_once(',') {
        Some((header, body)) => {
            if !header.starts_with("data:image/png") {
                return Err(format!("导出数据不是 PNG: {}", header));
            }
            body
        }
        None => data_url,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| format!("解码导出图片失败: {}", e))?;

    if !bytes.starts_with(PNG_SIGNATURE) {
        return Err("导出数据不是有效的 PNG 图片".to_string());
    }
    Ok(bytes)
}

/// 把 PNG 写入指定目录，返回文件路径
///
/// # 错误
/// 目录创建失败或文件写入失败时返回错误
pub async fn save_png(dir: &Path, png: &[u8], timestamp_ms: u64) -> Result<PathBuf, String> {
    if !dir.exists() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| format!("创建导出目录失败: {}", e))?;
    }

    let file_path = dir.join(path::export_file_name(timestamp_ms));
    tokio::fs::write(&file_path, png)
        .await
        .map_err(|e| format!("写入名片图片失败: {}", e))?;

    info!("名片图片已导出: {}", file_path.display());
    Ok(file_path)
}
