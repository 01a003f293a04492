//! # 路径工具函数
//!
//! 提供名片图片导出相关的路径工具：
//! - 获取导出目录（系统下载目录，缺失时回退到用户主目录）
//! - 生成带时间戳后缀的导出文件名

use std::path::PathBuf;

/// 导出文件名前缀
const EXPORT_FILE_PREFIX: &str = "TianSuan_ShenSiTing";

/// 获取名片图片的导出目录
///
/// 使用 `dirs` crate 获取跨平台的下载目录；
/// 部分 Linux 桌面环境未配置 XDG 下载目录，此时回退到主目录。
///
/// # 错误
/// 下载目录和主目录都无法确定时返回错误信息
pub fn get_export_dir() -> Result<PathBuf, String> {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| "无法获取下载目录或用户主目录".to_string())
}

/// 生成导出文件名
///
/// # 示例
/// ```ignore
/// assert_eq!(export_file_name(1700000000000), "TianSuan_ShenSiTing_1700000000000.png");
/// ```
pub fn export_file_name(timestamp_ms: u64) -> String {
    format!("{}_{}.png", EXPORT_FILE_PREFIX, timestamp_ms)
}
