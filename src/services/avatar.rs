//! # 本地头像加载
//!
//! 把用户选择的本地图片读入内存并编码为 `data:` URL，仅在本次会话中替换显示，
//! 不上传、不持久化。

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// 头像文件大小上限：10 MiB
const MAX_AVATAR_BYTES: u64 = 10 * 1024 * 1024;

/// 根据扩展名推断图片 MIME 类型
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// 读取图片文件并编码为 data URL
///
/// # 错误
/// 扩展名不是支持的图片格式、文件过大或读取失败时返回错误
pub async fn load_data_url(path: &Path) -> Result<String, String> {
    let mime = image_mime(path)
        .ok_or_else(|| format!("不支持的头像格式: {}", path.display()))?;

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| format!("读取头像文件信息失败: {}", e))?;
    if metadata.len() > MAX_AVATAR_BYTES {
        return Err(format!("头像文件过大: {} 字节", metadata.len()));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("读取头像文件失败: {}", e))?;

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
